use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Identity;
use crate::cep::CepClient;
use crate::client::{ApiClient, SessionClient};
use crate::config::config;

/// Local CLI state, persisted as `env.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// REST API base URL; falls back to `API_BASE_URL`
    pub api_url: Option<String>,
    /// Session service base URL (`/api/me`)
    pub session_url: Option<String>,
    pub token: Option<String>,
    #[serde(default)]
    pub identity: Option<Identity>,
    #[serde(default)]
    pub logged_in_at: Option<DateTime<Utc>>,
}

impl CliConfig {
    pub fn api_url(&self) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| config().api.base_url.clone())
    }

    pub fn session_url(&self) -> String {
        self.session_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", config().server.port))
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(config().api.request_timeout_secs)
    }

    pub fn api_client(&self) -> anyhow::Result<ApiClient> {
        Ok(ApiClient::new(&self.api_url(), self.timeout())?.with_token(self.token.clone()))
    }

    pub fn session_client(&self) -> anyhow::Result<SessionClient> {
        let session = SessionClient::new(&self.session_url(), &config().session.cookie_name, self.timeout())?;
        Ok(session.with_token(self.token.clone()))
    }

    pub fn cep_client(&self) -> anyhow::Result<CepClient> {
        Ok(CepClient::new(&config().cep.base_url, self.timeout())?)
    }

    pub fn clear_session(&mut self) {
        self.token = None;
        self.identity = None;
        self.logged_in_at = None;
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("UAIFOOD_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("uaifood").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_cli_config() -> anyhow::Result<CliConfig> {
    let env_file = get_config_dir()?.join("env.json");

    if !env_file.exists() {
        return Ok(CliConfig::default());
    }

    let content = fs::read_to_string(env_file)?;
    let config: CliConfig = serde_json::from_str(&content)?;
    Ok(config)
}

pub fn save_cli_config(config: &CliConfig) -> anyhow::Result<()> {
    let env_file = get_config_dir()?.join("env.json");

    let content = serde_json::to_string_pretty(config)?;
    fs::write(env_file, content)?;
    Ok(())
}
