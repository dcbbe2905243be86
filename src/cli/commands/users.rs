use async_trait::async_trait;
use clap::{Args, Subcommand};
use serde_json::json;

use crate::cep::normalize_cep;
use crate::cli::config::{load_cli_config, CliConfig};
use crate::cli::utils::{fetch_within_bounds, output_error, output_notice, output_page, output_success, require_access};
use crate::cli::watch::{watch_search, Listing};
use crate::cli::OutputFormat;
use crate::client::{ApiClient, ClientError, UsersQuery};
use crate::config::config;
use crate::models::{Address, Role, UpdateUserPayload, User, UsersFilter};
use crate::pagination::{Page, Paginator};
use crate::validation::validate_user_update;

const ADMINS: &[Role] = &[Role::Admin];

#[derive(Subcommand)]
pub enum UsersCommands {
    #[command(about = "List one page of users")]
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, help = "Page size: 5, 10, 20 or 50")]
        limit: Option<u32>,
        #[arg(long, help = "Matches name, e-mail or phone")]
        query: Option<String>,
    },

    #[command(about = "Interactive listing; type a search on stdin (/help for commands)")]
    Watch {
        #[arg(long, help = "Page size: 5, 10, 20 or 50")]
        limit: Option<u32>,
    },

    #[command(about = "Edit a user; only the given fields change")]
    Update(UpdateArgs),

    #[command(about = "Delete a user")]
    Delete { id: i64 },
}

#[derive(Args)]
pub struct UpdateArgs {
    pub id: i64,
    #[command(flatten)]
    pub fields: EditArgs,
}

/// Editable profile fields; absent flags leave the field untouched
#[derive(Args)]
pub struct EditArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long, help = "(XX) XXXXX-XXXX")]
    pub phone: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long, help = "Postal code; street, district, city and state are filled from it")]
    pub cep: Option<String>,
    #[arg(long, help = "House number (required with --cep)")]
    pub number: Option<String>,
}

pub async fn handle(cmd: UsersCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let cli_config = load_cli_config()?;
    require_access(&cli_config, Some(ADMINS)).await?;
    let api = cli_config.api_client()?;

    match cmd {
        UsersCommands::List { page, limit, query } => {
            let mut paginator = Paginator::new(limit.unwrap_or(config().filter.default_page_size));
            let base = UsersQuery {
                page: 1,
                limit: paginator.page_size(),
                filter: UsersFilter { query },
            };

            let result = fetch_within_bounds(&mut paginator, page, |page| {
                let query = UsersQuery { page, ..base.clone() };
                let api = &api;
                async move { api.fetch_users(&query).await }
            })
            .await;

            let page = result.unwrap_or_else(|e| {
                let _ = output_notice(&output_format, &e);
                Page::empty()
            });
            output_page(&output_format, &page, UsersListing::EMPTY_MESSAGE, user_row)
        }
        UsersCommands::Watch { limit } => {
            let limit = limit.unwrap_or(config().filter.default_page_size);
            watch_search(
                UsersListing,
                api,
                limit,
                config().filter.users_debounce(),
                output_format,
                |filter: &mut UsersFilter, text| filter.query = Some(text),
            )
            .await
        }
        UsersCommands::Update(args) => {
            submit_update(&cli_config, &api, args.id, args.fields, &output_format).await
        }
        UsersCommands::Delete { id } => match api.delete_user(id).await {
            Ok(()) => output_success(&output_format, &format!("Usuário #{} excluído", id), Some(json!({ "id": id }))),
            Err(e) => {
                output_notice(&output_format, &e)?;
                Err(e.into())
            }
        },
    }
}

pub struct UsersListing;

#[async_trait]
impl Listing for UsersListing {
    type Filters = UsersFilter;
    type Key = UsersQuery;
    type Record = User;

    const EMPTY_MESSAGE: &'static str = "Nenhum usuário encontrado.";

    fn key(&self, filter: &UsersFilter, page: u32, limit: u32) -> UsersQuery {
        UsersQuery {
            page,
            limit,
            filter: filter.clone(),
        }
    }

    async fn fetch(&self, api: &ApiClient, key: &UsersQuery) -> Result<Page<User>, ClientError> {
        api.fetch_users(key).await
    }

    fn row(user: &User) -> String {
        user_row(user)
    }
}

/// Fill the address from the CEP, validate, then `PUT /users/{id}`
pub(crate) async fn submit_update(
    cli_config: &CliConfig,
    api: &ApiClient,
    id: i64,
    fields: EditArgs,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    let address = match (&fields.cep, &fields.number) {
        (Some(cep), Some(number)) => {
            if normalize_cep(cep).is_none() {
                output_error(output_format, "CEP inválido, use o formato 00000-000", Some("VALIDATION"))?;
                return Err(anyhow::anyhow!("invalid CEP '{}'", cep));
            }
            match cli_config.cep_client()?.lookup(cep).await {
                Ok(found) => Some(found.into_address(number.clone())),
                Err(e) => {
                    output_notice(output_format, &e)?;
                    return Err(e.into());
                }
            }
        }
        (Some(_), None) => return Err(anyhow::anyhow!("--number is required with --cep")),
        _ => None,
    };

    let payload = build_payload(id, fields, address);
    if let Err(errors) = validate_user_update(&payload) {
        output_error(output_format, &errors.to_string(), Some("VALIDATION"))?;
        return Err(errors.into());
    }

    match api.update_user(&payload).await {
        Ok(()) => output_success(
            output_format,
            &format!("Usuário #{} atualizado", payload.id),
            Some(json!({ "user": payload_summary(&payload) })),
        ),
        Err(e) => {
            output_notice(output_format, &e)?;
            Err(e.into())
        }
    }
}

fn build_payload(id: i64, fields: EditArgs, address: Option<Address>) -> UpdateUserPayload {
    UpdateUserPayload {
        id,
        name: fields.name,
        email: fields.email,
        phone: fields.phone,
        password: fields.password,
        address,
    }
}

/// Echo of what was sent, minus the password
fn payload_summary(payload: &UpdateUserPayload) -> serde_json::Value {
    let mut value = json!(payload);
    if let Some(object) = value.as_object_mut() {
        object.remove("password");
    }
    value
}

fn user_row(user: &User) -> String {
    let city = user
        .address
        .as_ref()
        .map(|a| format!("{}/{}", a.city, a.state))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "#{:<6} {:<24} {:<28} {:<16} {:<7} {}",
        user.id, user.name, user.email, user.phone, user.role, city
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_never_echoes_the_password() {
        let payload = UpdateUserPayload {
            id: 4,
            name: Some("Manu".into()),
            password: Some("supersecret".into()),
            ..Default::default()
        };
        let summary = payload_summary(&payload);
        assert_eq!(summary["name"], "Manu");
        assert!(summary.get("password").is_none());
    }

    #[test]
    fn search_text_lands_in_the_users_query() {
        let filter = UsersFilter { query: Some("manu".into()) };
        let key = UsersListing.key(&filter, 2, 20);
        assert_eq!(key.params().get_all("query").collect::<Vec<_>>(), ["manu"]);
        assert_eq!(key.page, 2);
    }
}
