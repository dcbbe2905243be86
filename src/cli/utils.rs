use std::future::Future;

use serde::Serialize;
use serde_json::{json, Value};

use crate::auth::Identity;
use crate::cli::config::CliConfig;
use crate::cli::OutputFormat;
use crate::client::ClientError;
use crate::gate::{Access, AuthContext, ACCESS_DENIED_MESSAGE, ACCESS_DENIED_TITLE};
use crate::models::Role;
use crate::pagination::{Page, Paginator};

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(Value::Object(extra)) = data {
                if let Some(object) = response.as_object_mut() {
                    object.extend(extra);
                }
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Show a fetch failure the way the dashboard does: a notice with the
/// server's message, or the generic one.
pub fn output_notice(output_format: &OutputFormat, error: &ClientError) -> anyhow::Result<()> {
    output_error(output_format, &error.notice(), None)
}

/// Print one page of a listing. Text rows come from `row`.
pub fn output_page<T: Serialize>(
    output_format: &OutputFormat,
    page: &Page<T>,
    empty_message: &str,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(page)?);
        }
        OutputFormat::Text => {
            if page.is_empty() {
                println!("{}", empty_message);
            }
            for record in &page.data {
                println!("{}", row(record));
            }
            let meta = &page.meta;
            println!(
                "Página {} de {} ({} registros, {} por página)",
                meta.current_page.max(1),
                meta.last_page.max(1),
                meta.total,
                meta.per_page
            );
        }
    }
    Ok(())
}

/// Resolve the caller through the session service and gate the command.
///
/// `roles: None` admits any logged-in identity.
pub async fn require_access(cli_config: &CliConfig, roles: Option<&[Role]>) -> anyhow::Result<Identity> {
    let mut auth = AuthContext::new(cli_config.session_client()?);
    auth.load().await;

    match auth.gate(roles) {
        Access::Granted(identity) => Ok(identity.clone()),
        Access::Denied => Err(anyhow::anyhow!("{}: {}", ACCESS_DENIED_TITLE, ACCESS_DENIED_MESSAGE)),
        Access::Redirect(route) => Err(anyhow::anyhow!(
            "Usuário não logado. Faça login com `uaifood auth login --token <TOKEN>` ({})",
            route
        )),
        Access::Pending => Err(anyhow::anyhow!("Identity still loading")),
    }
}

/// Fetch `requested` without ever asking for a page outside the known bounds.
///
/// A page inside the paginator's current bounds is fetched directly. Otherwise
/// the current page is fetched first to learn `last_page`, and the clamped
/// request follows if it differs.
pub async fn fetch_within_bounds<T, F, Fut>(
    paginator: &mut Paginator,
    requested: u32,
    fetch: F,
) -> Result<Page<T>, ClientError>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>, ClientError>>,
{
    if requested >= 1 && paginator.clamp(requested) == requested {
        let page = fetch(paginator.go_to(requested)).await?;
        paginator.sync(&page.meta);
        return Ok(page);
    }

    let first = paginator.page();
    let mut page = fetch(first).await?;
    paginator.sync(&page.meta);

    if paginator.go_to(requested) != first {
        page = fetch(paginator.page()).await?;
        paginator.sync(&page.meta);
    }

    Ok(page)
}

pub fn money(value: rust_decimal::Decimal) -> String {
    format!("R$ {:.2}", value.round_dp(2))
}
