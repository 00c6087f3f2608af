use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::info;

use wall_db::StoreOptions;

pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub static_dir: PathBuf,
    /// Unset means the schema resources compiled into the binary.
    pub migrations_dir: Option<PathBuf>,
    pub store: StoreOptions,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: var("WALL_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or("WALL_PORT", var("WALL_PORT").or_else(|| var("PORT")), 8000)?,
            db_path: var("WALL_DB_PATH")
                .or_else(|| var("DB_PATH"))
                .unwrap_or_else(|| "wall.db".into())
                .into(),
            static_dir: var("WALL_STATIC_DIR").unwrap_or_else(|| "static".into()).into(),
            migrations_dir: var("WALL_MIGRATIONS_DIR").map(PathBuf::from),
            store: StoreOptions {
                ignore_schema_errors: parse_or(
                    "WALL_IGNORE_SCHEMA_ERRORS",
                    var("WALL_IGNORE_SCHEMA_ERRORS"),
                    false,
                )?,
                degrade_on_read_error: parse_or(
                    "WALL_DEGRADE_ON_READ_ERROR",
                    var("WALL_DEGRADE_ON_READ_ERROR"),
                    false,
                )?,
            },
        })
    }
}

/// Set, non-empty environment variable.
fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr + std::fmt::Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("invalid {key} value {value:?}")),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
