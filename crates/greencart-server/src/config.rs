//! Server configuration
//!
//! Values come from Shuttle's `SecretStore` in production and from a plain
//! map in tests; both go through [`AppConfig::from_lookup`].

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_JWT_EXPIRE: &str = "24h";
/// Longest accepted token lifetime (10 years)
pub const MAX_JWT_EXPIRE: Duration = Duration::from_secs(3650 * 24 * 60 * 60);
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 15 * 60;
pub const DEFAULT_RATE_LIMIT_API_MAX: u32 = 100;
pub const DEFAULT_RATE_LIMIT_AUTH_MAX: u32 = 5;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Credentials for the Cloudinary upload API
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub api_max: u32,
    pub auth_max: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
            api_max: DEFAULT_RATE_LIMIT_API_MAX,
            auth_max: DEFAULT_RATE_LIMIT_AUTH_MAX,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub jwt_expire: Duration,
    pub frontend_url: String,
    /// `None` disables image uploads
    pub cloudinary: Option<CloudinaryConfig>,
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    /// Build the configuration from a key lookup (e.g. `SecretStore::get`)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let jwt_expire_raw = get("JWT_EXPIRE").unwrap_or_else(|| DEFAULT_JWT_EXPIRE.to_string());
        let jwt_expire = parse_duration(&jwt_expire_raw)
            .filter(|lifetime| *lifetime <= MAX_JWT_EXPIRE)
            .ok_or(ConfigError::Invalid {
            key: "JWT_EXPIRE",
            value: jwt_expire_raw,
        })?;

        let cloudinary = match (
            get("CLOUDINARY_CLOUD_NAME"),
            get("CLOUDINARY_API_KEY"),
            get("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
            }),
            _ => None,
        };

        let defaults = RateLimitConfig::default();
        let rate_limit = RateLimitConfig {
            window: match get("RATE_LIMIT_WINDOW_SECS") {
                Some(v) => Duration::from_secs(parse_number("RATE_LIMIT_WINDOW_SECS", v)?),
                None => defaults.window,
            },
            api_max: match get("RATE_LIMIT_API_MAX") {
                Some(v) => parse_number("RATE_LIMIT_API_MAX", v)?,
                None => defaults.api_max,
            },
            auth_max: match get("RATE_LIMIT_AUTH_MAX") {
                Some(v) => parse_number("RATE_LIMIT_AUTH_MAX", v)?,
                None => defaults.auth_max,
            },
        };

        Ok(Self {
            jwt_secret,
            jwt_expire,
            frontend_url: get("FRONTEND_URL").unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string()),
            cloudinary,
            rate_limit,
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

/// Parse `30s`, `15m`, `24h`, `7d` or a bare number of seconds
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let (digits, multiplier) = match raw.chars().last()? {
        's' => (&raw[..raw.len() - 1], 1),
        'm' => (&raw[..raw.len() - 1], 60),
        'h' => (&raw[..raw.len() - 1], 60 * 60),
        'd' => (&raw[..raw.len() - 1], 24 * 60 * 60),
        c if c.is_ascii_digit() => (raw, 1),
        _ => return None,
    };
    let value: u64 = digits.trim().parse().ok()?;
    if value == 0 {
        return None;
    }
    value.checked_mul(multiplier).map(Duration::from_secs)
}
