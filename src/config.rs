use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

pub const DEFAULT_JSEARCH_BASE_URL: &str = "https://jsearch.p.rapidapi.com";
pub const DEFAULT_JSEARCH_HOST: &str = "jsearch.p.rapidapi.com";

/// Maximum number of JSearch credentials read from the environment
/// (`RAPIDAPI_KEY`, `RAPIDAPI_KEY_2` .. `RAPIDAPI_KEY_10`).
pub const MAX_JSEARCH_KEYS: usize = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub openai_api_key: String,
    pub public_rps: u32,
    pub jsearch_api_keys: Vec<String>,
    pub jsearch_base_url: String,
    pub jsearch_host: String,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            openai_api_key: get_env("OPENAI_API_KEY")?,
            public_rps: get_env_parse("PUBLIC_RPS")?,
            jsearch_api_keys: load_jsearch_keys(),
            jsearch_base_url: env::var("JSEARCH_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_JSEARCH_BASE_URL.to_string()),
            jsearch_host: env::var("JSEARCH_HOST")
                .unwrap_or_else(|_| DEFAULT_JSEARCH_HOST.to_string()),
        })
    }
}

/// Collects the configured JSearch credentials in pool order. Unset and blank
/// slots are skipped, so the pool may legitimately be empty; the search
/// service reports that as a configuration failure rather than panicking here.
fn load_jsearch_keys() -> Vec<String> {
    (1..=MAX_JSEARCH_KEYS)
        .filter_map(|n| {
            let name = if n == 1 {
                "RAPIDAPI_KEY".to_string()
            } else {
                format!("RAPIDAPI_KEY_{}", n)
            };
            env::var(name).ok()
        })
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .collect()
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(name)?;
    raw.parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
