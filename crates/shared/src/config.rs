//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Token and cookie configuration.
    pub auth: AuthConfig,
    /// Cash-flow engine configuration.
    #[serde(default)]
    pub flow: FlowConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Token and cookie configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_token_expiry")]
    pub token_expiry_secs: u64,
    /// Name of the cookie carrying the access token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Whether the cookie is flagged `Secure` (HTTPS only).
    #[serde(default)]
    pub cookie_secure: bool,
}

fn default_token_expiry() -> u64 {
    86400 // 1 day
}

fn default_cookie_name() -> String {
    "access_token".to_string()
}

/// Cash-flow engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FlowConfig {
    /// IANA time zone used to decide the current month.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// Layers `config/default`, `config/{RUN_MODE}`, then `FLUXO__SECTION__KEY` variables.
fn sources() -> Result<config::Config, config::ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

    config::Config::builder()
        .add_source(config::File::with_name("config/default").required(false))
        .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
        .add_source(
            config::Environment::with_prefix("FLUXO")
                .separator("__")
                .try_parsing(true),
        )
        .build()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        sources()?.try_deserialize()
    }
}

impl FlowConfig {
    /// Loads only the `flow` section, for tools that have no server settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the section is present but malformed.
    pub fn load() -> Result<Self, config::ConfigError> {
        match sources()?.get::<Self>("flow") {
            Err(config::ConfigError::NotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment_with_defaults() {
        temp_env::with_vars(
            [
                ("FLUXO__DATABASE__URL", Some("postgres://localhost/fluxo_test")),
                ("FLUXO__AUTH__SECRET", Some("test-secret")),
                ("FLUXO__SERVER__PORT", Some("9090")),
            ],
            || {
                let config = AppConfig::load().unwrap();

                assert_eq!(config.database.url, "postgres://localhost/fluxo_test");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.auth.secret, "test-secret");
                assert_eq!(config.auth.cookie_name, "access_token");
                assert!(!config.auth.cookie_secure);
                assert_eq!(config.flow.timezone, "UTC");
            },
        );
    }

    #[test]
    fn test_flow_timezone_override() {
        temp_env::with_vars(
            [
                ("FLUXO__DATABASE__URL", Some("postgres://localhost/fluxo_test")),
                ("FLUXO__AUTH__SECRET", Some("test-secret")),
                ("FLUXO__SERVER__HOST", Some("127.0.0.1")),
                ("FLUXO__FLOW__TIMEZONE", Some("America/Sao_Paulo")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.flow.timezone, "America/Sao_Paulo");
            },
        );
    }

    #[test]
    fn test_missing_secret_fails() {
        temp_env::with_vars(
            [
                ("FLUXO__DATABASE__URL", Some("postgres://localhost/fluxo_test")),
                ("FLUXO__SERVER__HOST", Some("127.0.0.1")),
                ("FLUXO__AUTH__SECRET", None),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }

    #[test]
    fn test_flow_section_loads_without_server_settings() {
        temp_env::with_vars(
            [
                ("FLUXO__DATABASE__URL", None),
                ("FLUXO__AUTH__SECRET", None),
                ("FLUXO__FLOW__TIMEZONE", Some("America/Sao_Paulo")),
            ],
            || {
                assert_eq!(FlowConfig::load().unwrap().timezone, "America/Sao_Paulo");
            },
        );
    }

    #[test]
    fn test_flow_section_defaults_to_utc() {
        temp_env::with_vars(
            [("FLUXO__FLOW__TIMEZONE", None::<&str>)],
            || {
                assert_eq!(FlowConfig::load().unwrap().timezone, "UTC");
            },
        );
    }
}
