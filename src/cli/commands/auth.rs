use chrono::Utc;
use clap::Subcommand;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::config::{load_cli_config, save_cli_config};
use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::config::config;
use crate::gate::{landing_route, AuthContext, AuthState, LOGIN_ROUTE};
use crate::models::Role;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Store a session token after the session service accepts it")]
    Login {
        #[arg(long, help = "Session token issued by the UaiFood backend")]
        token: String,
        #[arg(long, help = "REST API base URL (default: API_BASE_URL)")]
        api_url: Option<String>,
        #[arg(long, help = "Session service base URL (default: http://localhost:<UAIFOOD_PORT>)")]
        session_url: Option<String>,
    },

    #[command(about = "Forget the stored session")]
    Logout,

    #[command(about = "Show the identity behind the stored session")]
    Whoami,

    #[command(about = "Mint a development token signed with JWT_SECRET")]
    Mint {
        #[arg(long, help = "User id")]
        id: i64,
        #[arg(long, help = "Display name")]
        name: String,
        #[arg(long, help = "E-mail")]
        email: String,
        #[arg(long, default_value = "CLIENT", help = "ADMIN or CLIENT")]
        role: Role,
        #[arg(long, help = "Lifetime in hours (default: SESSION_TOKEN_EXPIRY_HOURS)")]
        hours: Option<u64>,
    },
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { token, api_url, session_url } => {
            let mut cli_config = load_cli_config()?;
            if api_url.is_some() {
                cli_config.api_url = api_url;
            }
            if session_url.is_some() {
                cli_config.session_url = session_url;
            }

            let identity = match cli_config.session_client()?.open(&token).await {
                Ok(identity) => identity,
                Err(e) => {
                    output_error(&output_format, &e.notice(), Some("LOGIN_FAILED"))?;
                    return Err(anyhow::anyhow!("login failed: {}", e));
                }
            };

            cli_config.token = Some(token);
            cli_config.identity = Some(identity.clone());
            cli_config.logged_in_at = Some(Utc::now());
            save_cli_config(&cli_config)?;

            let state = AuthState::Authenticated(identity.clone());
            output_success(
                &output_format,
                &format!("Logged in as {} ({})", identity.name, identity.role),
                Some(json!({ "user": identity, "route": landing_route(&state) })),
            )
        }
        AuthCommands::Logout => {
            let mut cli_config = load_cli_config()?;

            let mut auth = AuthContext::new(cli_config.session_client()?);
            // Clearing the cookie server-side is best effort; the local token goes regardless.
            if let Err(e) = auth.source().logout().await {
                tracing::warn!("Session service logout failed: {}", e);
            }
            let route = auth.logout();

            cli_config.clear_session();
            save_cli_config(&cli_config)?;

            output_success(&output_format, "Logged out", Some(json!({ "route": route })))
        }
        AuthCommands::Whoami => {
            let cli_config = load_cli_config()?;
            let mut auth = AuthContext::new(cli_config.session_client()?);

            match auth.load().await {
                AuthState::Authenticated(identity) => match output_format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&json!({ "user": identity }))?);
                        Ok(())
                    }
                    OutputFormat::Text => {
                        println!("{} <{}>", identity.name, identity.email);
                        println!("ID: {}", identity.id);
                        println!("Role: {}", identity.role);
                        Ok(())
                    }
                },
                _ => {
                    output_error(&output_format, "Usuário não logado", Some("NOT_LOGGED_IN"))?;
                    Err(anyhow::anyhow!("not logged in (see {})", LOGIN_ROUTE))
                }
            }
        }
        AuthCommands::Mint { id, name, email, role, hours } => {
            let session = &config().session;
            if session.jwt_secret.is_empty() {
                return Err(anyhow::anyhow!("JWT_SECRET is not set"));
            }

            let claims = Claims::new(id, name, email, role, hours.unwrap_or(session.token_expiry_hours))?;
            let token = generate_jwt(&claims, &session.jwt_secret)?;

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "token": token, "claims": claims }))?);
                }
                OutputFormat::Text => println!("{}", token),
            }
            Ok(())
        }
    }
}
