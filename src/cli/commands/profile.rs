use clap::Subcommand;
use serde_json::json;

use crate::cli::commands::users::{submit_update, EditArgs};
use crate::cli::config::load_cli_config;
use crate::cli::utils::{output_notice, require_access};
use crate::cli::OutputFormat;
use crate::models::User;

#[derive(Subcommand)]
pub enum ProfileCommands {
    #[command(about = "Show your own user record")]
    Show,

    #[command(about = "Edit your own profile; only the given fields change")]
    Update(EditArgs),
}

/// Any logged-in identity may use these; the record is always the caller's own.
pub async fn handle(cmd: ProfileCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let cli_config = load_cli_config()?;
    let identity = require_access(&cli_config, None).await?;
    let api = cli_config.api_client()?;

    match cmd {
        ProfileCommands::Show => match api.fetch_user(identity.id).await {
            Ok(user) => print_profile(&user, &output_format),
            Err(e) => {
                output_notice(&output_format, &e)?;
                Err(e.into())
            }
        },
        ProfileCommands::Update(fields) => submit_update(&cli_config, &api, identity.id, fields, &output_format).await,
    }
}

fn print_profile(user: &User, output_format: &OutputFormat) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json!({ "user": user }))?),
        OutputFormat::Text => {
            println!("Meu Perfil");
            println!("  #{} {} ({})", user.id, user.name, user.role);
            println!("  {} | {}", user.email, user.phone);
            match &user.address {
                Some(address) => {
                    println!("  {}, {} - {}", address.street, address.number, address.district);
                    println!("  {}/{} CEP {}", address.city, address.state, address.zip_code);
                }
                None => println!("  Endereço não cadastrado"),
            }
        }
    }
    Ok(())
}
