use crate::auth::jwt::ttl_seconds;
use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::{env, fs};

#[derive(Deserialize)]
pub struct SSLConfig {
    pub private_key_file: PathBuf,
    pub certificate_chain_file: PathBuf,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    #[serde(default = "default_token_ttl_days")]
    pub token_ttl_days: u64,
}

/// OTLP trace export. `headers` are sent as gRPC metadata, e.g. an API key.
#[derive(Deserialize)]
pub struct TelemetryConfig {
    pub endpoint: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

#[derive(Deserialize)]
pub struct Config {
    pub database_url: String,
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: u32,
    #[serde(default = "default_signups_enabled")]
    pub signups_enabled: bool,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    pub cors_allowed_origin: Option<String>,
    pub jwt: JwtConfig,
    pub telemetry: Option<TelemetryConfig>,
    pub ssl: Option<SSLConfig>,
}

fn default_max_pool_size() -> u32 {
    10
}

fn default_signups_enabled() -> bool {
    true
}

fn default_bind_address() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_token_ttl_days() -> u64 {
    30
}

impl Config {
    pub fn from_file(path: PathBuf) -> Result<Config, anyhow::Error> {
        let config = fs::read_to_string(path).context("Unable to read config file")?;
        Self::from_toml(&config)
    }

    pub fn from_toml(config: &str) -> Result<Config, anyhow::Error> {
        let config: Config = toml::from_str(config).with_context(|| "Unable to parse config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Config, anyhow::Error> {
        let database_url = read_env("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: read_env("JWT_SECRET")?,
            issuer: read_env("JWT_ISSUER")?,
            audience: read_env("JWT_AUDIENCE")?,
            token_ttl_days: parse_optional_env("TOKEN_TTL_DAYS")?
                .unwrap_or_else(default_token_ttl_days),
        };

        let config = Config {
            database_url,
            max_pool_size: parse_optional_env("MAX_POOL_SIZE")?
                .unwrap_or_else(default_max_pool_size),
            signups_enabled: parse_optional_env("SIGNUPS_ENABLED")?
                .unwrap_or_else(default_signups_enabled),
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| default_bind_address()),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN").ok(),
            jwt,
            telemetry: None,
            ssl: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// A server without a usable signing key must not start.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt.secret.trim().is_empty() {
            bail!("jwt.secret must not be empty");
        }
        if self.jwt.issuer.trim().is_empty() {
            bail!("jwt.issuer must not be empty");
        }
        if self.jwt.audience.trim().is_empty() {
            bail!("jwt.audience must not be empty");
        }
        if self.jwt.token_ttl_days == 0 {
            bail!("jwt.token_ttl_days must be at least 1");
        }
        if ttl_seconds(self.jwt.token_ttl_days).is_none() {
            bail!(
                "jwt.token_ttl_days is too large: {}",
                self.jwt.token_ttl_days
            );
        }
        Ok(())
    }
}

fn read_env(key: &str) -> Result<String, anyhow::Error> {
    env::var(key).with_context(|| format!("Unable to read env var: {}", key))
}

fn parse_optional_env<T>(key: &str) -> Result<Option<T>, anyhow::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map(Some)
            .with_context(|| format!("Unable to parse {} value", key)),
        Err(_) => Ok(None),
    }
}
