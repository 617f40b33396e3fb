//! Application configuration
//!
//! Everything comes from environment variables, after loading a `.env` file
//! when one is present. Only `API_PORT`, `DATABASE_URL` and `JWT_SECRET` are
//! required.

use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub nutritionix: NutritionixConfig,
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `host:port` to bind; the host may be a name
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds
    pub access_token_expiry: i64,
}

/// Global request budget shared by all clients
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst: u32,
}

#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Nutritionix calorie lookup; disabled unless both credentials are set
#[derive(Debug, Clone)]
pub struct NutritionixConfig {
    pub app_id: Option<String>,
    pub app_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl NutritionixConfig {
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.app_id.as_deref(), self.app_key.as_deref()) {
            (Some(id), Some(key)) if !id.is_empty() && !key.is_empty() => Some((id, key)),
            _ => None,
        }
    }
}

const DEFAULT_APP_NAME: &str = "calorie-counter";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_MIN_CONNECTIONS: u32 = 5;
const DEFAULT_TOKEN_EXPIRY_SECS: i64 = 86_400;
const DEFAULT_REQUESTS_PER_SECOND: u32 = 10;
const DEFAULT_BURST: u32 = 50;
const DEFAULT_NUTRITIONIX_URL: &str = "https://trackapi.nutritionix.com";
const DEFAULT_NUTRITIONIX_TIMEOUT_SECS: u64 = 5;

/// Typed access to a variable source; blank values count as unset
struct Vars<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    fn optional(&self, name: &'static str) -> Option<String> {
        (self.lookup)(name).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.optional(name).ok_or(ConfigError::MissingVar(name))
    }

    /// Parsed value, or `None` when unset; a value that does not parse is an error
    fn parsed<T: FromStr>(&self, name: &'static str) -> Result<Option<T>, ConfigError> {
        self.optional(name)
            .map(|raw| {
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue(name, raw))
            })
            .transpose()
    }

    fn parsed_or<T: FromStr>(&self, name: &'static str, default: T) -> Result<T, ConfigError> {
        Ok(self.parsed(name)?.unwrap_or(default))
    }

    fn list(&self, name: &'static str) -> Vec<String> {
        self.optional(name)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars { lookup };

        Ok(Self {
            app: AppSettings {
                name: vars
                    .optional("APP_NAME")
                    .unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
                env: vars.parsed_or("APP_ENV", Environment::default())?,
            },
            api: ServerConfig {
                host: vars
                    .optional("API_HOST")
                    .unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: vars
                    .parsed("API_PORT")?
                    .ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            database: DatabaseConfig {
                url: vars.required("DATABASE_URL")?,
                max_connections: vars
                    .parsed_or("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
                min_connections: vars
                    .parsed_or("DATABASE_MIN_CONNECTIONS", DEFAULT_MIN_CONNECTIONS)?,
            },
            jwt: JwtConfig {
                secret: vars.required("JWT_SECRET")?,
                access_token_expiry: vars
                    .parsed_or("JWT_ACCESS_TOKEN_EXPIRY", DEFAULT_TOKEN_EXPIRY_SECS)?,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: vars
                    .parsed_or("RATE_LIMIT_REQUESTS_PER_SECOND", DEFAULT_REQUESTS_PER_SECOND)?,
                burst: vars.parsed_or("RATE_LIMIT_BURST", DEFAULT_BURST)?,
            },
            cors: CorsConfig {
                allowed_origins: vars.list("CORS_ALLOWED_ORIGINS"),
            },
            nutritionix: NutritionixConfig {
                app_id: vars.optional("NUTRITIONIX_APP_ID"),
                app_key: vars.optional("NUTRITIONIX_APP_KEY"),
                base_url: vars
                    .optional("NUTRITIONIX_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_NUTRITIONIX_URL.to_string()),
                timeout_secs: vars
                    .parsed_or("NUTRITIONIX_TIMEOUT_SECS", DEFAULT_NUTRITIONIX_TIMEOUT_SECS)?,
            },
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
