/// Configuration management for Post Service
///
/// This module handles loading configuration from environment variables
/// (optionally seeded from a `.env` file by the binary).
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Token validation settings
    pub auth: AuthConfig,
    /// Log output settings
    pub logging: LoggingConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

impl CorsConfig {
    pub fn origins(&self) -> impl Iterator<Item = &str> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
}

/// Token validation settings
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret shared with the authentication service
    pub jwt_secret: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app = AppConfig {
            env: lookup("APP_ENV").unwrap_or_else(|| "development".to_string()),
            host: lookup("POST_SERVICE_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or_default(&lookup, "POST_SERVICE_PORT", 5000)?,
        };

        let cors = {
            let allowed_origins = match lookup("CORS_ALLOWED_ORIGINS").or_else(|| {
                if app.is_production() {
                    lookup("FRONTEND_URL")
                } else {
                    None
                }
            }) {
                Some(value) => value,
                None if app.is_production() => {
                    return Err(
                        "CORS_ALLOWED_ORIGINS or FRONTEND_URL must be set in production"
                            .to_string(),
                    )
                }
                None => "http://localhost:3000".to_string(),
            };

            if app.is_production() && allowed_origins.split(',').any(|o| o.trim() == "*") {
                return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
            }

            CorsConfig { allowed_origins }
        };

        let database = DatabaseConfig {
            url: lookup("DATABASE_URL")
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| "DATABASE_URL is not defined".to_string())?,
            max_connections: parse_or_default(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
        };

        let auth = AuthConfig {
            jwt_secret: lookup("JWT_SECRET")
                .filter(|v| !v.is_empty())
                .ok_or_else(|| "JWT_SECRET is not defined".to_string())?,
        };

        let logging = LoggingConfig {
            format: match lookup("LOG_FORMAT").as_deref() {
                None | Some("text") => LogFormat::Text,
                Some("json") => LogFormat::Json,
                Some(other) => return Err(format!("Unsupported LOG_FORMAT '{}'", other)),
            },
        };

        Ok(Config {
            app,
            cors,
            database,
            auth,
            logging,
        })
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> Result<T, String>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(val) => val
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/posts"),
        ("JWT_SECRET", "secret"),
    ];

    #[test]
    fn development_defaults() {
        let config = load(&REQUIRED).unwrap();
        assert_eq!(config.app.port, 5000);
        assert_eq!(config.cors.allowed_origins, "http://localhost:3000");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn database_url_and_secret_are_required() {
        assert!(load(&[("JWT_SECRET", "secret")])
            .unwrap_err()
            .contains("DATABASE_URL"));
        assert!(load(&[("DATABASE_URL", "postgres://x")])
            .unwrap_err()
            .contains("JWT_SECRET"));
    }

    #[test]
    fn production_uses_frontend_url_and_rejects_wildcard() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("APP_ENV", "production"));
        assert!(load(&vars).is_err());

        vars.push(("FRONTEND_URL", "https://app.example.com"));
        let config = load(&vars).unwrap();
        assert_eq!(
            config.cors.origins().collect::<Vec<_>>(),
            ["https://app.example.com"]
        );

        vars.push(("CORS_ALLOWED_ORIGINS", "*"));
        assert!(load(&vars).is_err());
    }

    #[test]
    fn rejects_malformed_numbers() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("POST_SERVICE_PORT", "eighty"));
        assert!(load(&vars).unwrap_err().contains("POST_SERVICE_PORT"));
    }
}
