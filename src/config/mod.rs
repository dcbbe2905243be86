use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub api: ApiConfig,
    pub cep: CepConfig,
    pub filter: FilterConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// HS256 secret shared with the backend that issues session tokens
    pub jwt_secret: String,
    pub cookie_name: String,
    pub cookie_secure: bool,
    /// Lifetime of tokens minted locally (`uaifood auth mint`)
    pub token_expiry_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CepConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub orders_debounce_ms: u64,
    pub users_debounce_ms: u64,
    pub items_debounce_ms: u64,
    pub default_page_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(port) = env::var("UAIFOOD_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }

        // Session overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.session.jwt_secret = v;
        }
        if let Ok(v) = env::var("SESSION_COOKIE_NAME") {
            if !v.trim().is_empty() {
                self.session.cookie_name = v.trim().to_string();
            }
        }
        if let Ok(v) = env::var("SESSION_COOKIE_SECURE") {
            self.session.cookie_secure = v.parse().unwrap_or(self.session.cookie_secure);
        }
        if let Ok(v) = env::var("SESSION_TOKEN_EXPIRY_HOURS") {
            self.session.token_expiry_hours = v.parse().unwrap_or(self.session.token_expiry_hours);
        }

        // API overrides
        if let Ok(v) = env::var("API_BASE_URL") {
            self.api.base_url = v;
        }
        if let Ok(v) = env::var("API_REQUEST_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().unwrap_or(self.api.request_timeout_secs);
        }
        if let Ok(v) = env::var("CEP_BASE_URL") {
            self.cep.base_url = v;
        }

        // Filter overrides
        if let Ok(v) = env::var("FILTER_ORDERS_DEBOUNCE_MS") {
            self.filter.orders_debounce_ms = v.parse().unwrap_or(self.filter.orders_debounce_ms);
        }
        if let Ok(v) = env::var("FILTER_USERS_DEBOUNCE_MS") {
            self.filter.users_debounce_ms = v.parse().unwrap_or(self.filter.users_debounce_ms);
        }
        if let Ok(v) = env::var("FILTER_ITEMS_DEBOUNCE_MS") {
            self.filter.items_debounce_ms = v.parse().unwrap_or(self.filter.items_debounce_ms);
        }
        if let Ok(v) = env::var("FILTER_DEFAULT_PAGE_SIZE") {
            self.filter.default_page_size = v.parse().unwrap_or(self.filter.default_page_size);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 3000 },
            session: SessionConfig {
                jwt_secret: String::new(),
                cookie_name: "uaifoodtoken".to_string(),
                cookie_secure: false,
                token_expiry_hours: 24 * 7, // 1 week
            },
            api: ApiConfig {
                base_url: "http://localhost:3333".to_string(),
                request_timeout_secs: 30,
            },
            cep: CepConfig {
                base_url: "https://viacep.com.br/ws".to_string(),
            },
            filter: FilterConfig::default(),
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 3000 },
            session: SessionConfig {
                jwt_secret: String::new(),
                cookie_name: "uaifoodtoken".to_string(),
                cookie_secure: true,
                token_expiry_hours: 24,
            },
            api: ApiConfig {
                base_url: "https://api.staging.uaifood.com.br".to_string(),
                request_timeout_secs: 15,
            },
            cep: CepConfig {
                base_url: "https://viacep.com.br/ws".to_string(),
            },
            filter: FilterConfig::default(),
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.uaifood.com.br".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 3000 },
            session: SessionConfig {
                jwt_secret: String::new(),
                cookie_name: "uaifoodtoken".to_string(),
                cookie_secure: true,
                token_expiry_hours: 4,
            },
            api: ApiConfig {
                base_url: "https://api.uaifood.com.br".to_string(),
                request_timeout_secs: 10,
            },
            cep: CepConfig {
                base_url: "https://viacep.com.br/ws".to_string(),
            },
            filter: FilterConfig::default(),
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://admin.uaifood.com.br".to_string()],
            },
        }
    }

    /// Development defaults with the given secret, no env lookups
    pub fn for_tests(jwt_secret: impl Into<String>) -> Self {
        let mut config = Self::development();
        config.session.jwt_secret = jwt_secret.into();
        config
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            orders_debounce_ms: 300,
            users_debounce_ms: 500,
            items_debounce_ms: 500,
            default_page_size: 10,
        }
    }
}

impl FilterConfig {
    pub fn orders_debounce(&self) -> Duration {
        Duration::from_millis(self.orders_debounce_ms)
    }

    pub fn users_debounce(&self) -> Duration {
        Duration::from_millis(self.users_debounce_ms)
    }

    pub fn items_debounce(&self) -> Duration {
        Duration::from_millis(self.items_debounce_ms)
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}
