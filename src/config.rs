use chrono::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set to a non-empty value")]
    MissingSecret,
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Thirty days.
const MAX_TOKEN_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
    pub image_folder: String,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::MissingSecret)?;

        let port = parse_or(&lookup, "PORT", 3000u16)?;
        let ttl_secs = parse_or(&lookup, "TOKEN_TTL_SECS", 3600i64)?;
        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", 10u32)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }
        if ttl_secs <= 0 || ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(ConfigError::Invalid {
                key: "TOKEN_TTL_SECS",
                value: ttl_secs.to_string(),
            });
        }

        Ok(AppConfig {
            port,
            jwt_secret,
            token_ttl: Duration::seconds(ttl_secs),
            bcrypt_cost,
            image_folder: lookup("IMAGE_FOLDER").unwrap_or_else(|| "travel-uploads".to_string()),
            cors_origins: origins(lookup("CORS_ORIGINS")),
        })
    }
}

/// Comma-separated list; unset or blank falls back to the local dev frontend.
fn origins(raw: Option<String>) -> Vec<String> {
    let list: Vec<String> = raw
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect();
    if list.is_empty() {
        vec!["http://localhost:5173".to_string()]
    } else {
        list
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
