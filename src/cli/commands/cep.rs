use clap::Subcommand;
use serde_json::json;

use crate::cep::{format_cep, normalize_cep};
use crate::cli::config::load_cli_config;
use crate::cli::utils::{output_error, output_notice};
use crate::cli::OutputFormat;
use crate::client::ClientError;

#[derive(Subcommand)]
pub enum CepCommands {
    #[command(about = "Look up the address of a CEP")]
    Lookup {
        #[arg(help = "Eight digits, with or without the dash")]
        cep: String,
        #[arg(long, default_value = "", help = "House number to include in the address")]
        number: String,
    },
}

pub async fn handle(cmd: CepCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        CepCommands::Lookup { cep, number } => {
            let Some(digits) = normalize_cep(&cep) else {
                output_error(&output_format, "CEP inválido, use o formato 00000-000", Some("VALIDATION"))?;
                return Err(anyhow::anyhow!("invalid CEP '{}'", cep));
            };

            let client = load_cli_config()?.cep_client()?;
            let address = match client.lookup(&digits).await {
                Ok(found) => found.into_address(number),
                Err(ClientError::NotFound(_)) => {
                    output_error(&output_format, "CEP não encontrado", Some("NOT_FOUND"))?;
                    return Err(anyhow::anyhow!("CEP {} not found", format_cep(&digits)));
                }
                Err(e) => {
                    output_notice(&output_format, &e)?;
                    return Err(e.into());
                }
            };

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "address": address }))?);
                }
                OutputFormat::Text => {
                    println!("{}, {}", address.street, address.number);
                    println!("{} - {}/{}", address.district, address.city, address.state);
                    println!("CEP {}", address.zip_code);
                }
            }
            Ok(())
        }
    }
}
