pub mod commands;
pub mod config;
pub mod utils;
pub mod watch;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "uaifood")]
#[command(about = "UaiFood CLI - operator console for the UaiFood admin dashboard")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Session login, logout and identity")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Order listing and management (ADMIN or CLIENT)")]
    Orders {
        #[command(subcommand)]
        cmd: commands::orders::OrdersCommands,
    },

    #[command(about = "User management (ADMIN)")]
    Users {
        #[command(subcommand)]
        cmd: commands::users::UsersCommands,
    },

    #[command(about = "Your own profile (any logged-in user)")]
    Profile {
        #[command(subcommand)]
        cmd: commands::profile::ProfileCommands,
    },

    #[command(about = "Menu item catalogue (ADMIN)")]
    Items {
        #[command(subcommand)]
        cmd: commands::items::ItemsCommands,
    },

    #[command(about = "Postal code (CEP) lookup")]
    Cep {
        #[command(subcommand)]
        cmd: commands::cep::CepCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
        Commands::Orders { cmd } => commands::orders::handle(cmd, output_format).await,
        Commands::Users { cmd } => commands::users::handle(cmd, output_format).await,
        Commands::Profile { cmd } => commands::profile::handle(cmd, output_format).await,
        Commands::Items { cmd } => commands::items::handle(cmd, output_format).await,
        Commands::Cep { cmd } => commands::cep::handle(cmd, output_format).await,
    }
}
