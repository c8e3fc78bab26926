use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub port: u16,
    pub rust_log: String,
    /// How many trending skills the resume analyzer compares against.
    pub trending_limit: usize,
    /// Monthly periods projected by the skill demand forecast.
    pub forecast_periods: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: PathBuf::from("job_data.csv"),
            port: 8080,
            rust_log: "info".to_string(),
            trending_limit: 20,
            forecast_periods: 6,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            data_path: std::env::var("CAREERPULSE_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            port: parse_or("PORT", std::env::var("PORT").ok(), defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            trending_limit: parse_or(
                "TRENDING_LIMIT",
                std::env::var("TRENDING_LIMIT").ok(),
                defaults.trending_limit,
            )?,
            forecast_periods: parse_or(
                "FORECAST_PERIODS",
                std::env::var("FORECAST_PERIODS").ok(),
                defaults.forecast_periods,
            )?,
        })
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{value}'")),
    }
}
