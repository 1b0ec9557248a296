//! Server configuration parsed from environment variables.
//!
//! Every knob has a default so the server starts with no environment at all:
//!
//! - `PORT`: listen port (default 3000)
//! - `PUBLIC_DIR`: public root served as static files and holding uploads (default `./public`)
//! - `UPLOAD_TEMP_DIR`: scratch directory for incoming files (default `./uploads-temp`)
//! - `UPLOAD_MAX_BYTES`: request body limit for `/upload` (default 16 MiB)

use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PUBLIC_DIR: &str = "public";
pub const DEFAULT_UPLOAD_TEMP_DIR: &str = "uploads-temp";
pub const DEFAULT_UPLOAD_MAX_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub public_dir: PathBuf,
    pub upload_temp_dir: PathBuf,
    pub upload_max_bytes: usize,
}

impl ServerConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Unparseable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: parse_or(&lookup, "PORT", DEFAULT_PORT),
            public_dir: path_or(&lookup, "PUBLIC_DIR", DEFAULT_PUBLIC_DIR),
            upload_temp_dir: path_or(&lookup, "UPLOAD_TEMP_DIR", DEFAULT_UPLOAD_TEMP_DIR),
            upload_max_bytes: parse_or(&lookup, "UPLOAD_MAX_BYTES", DEFAULT_UPLOAD_MAX_BYTES),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn path_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> PathBuf {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .map_or_else(|| PathBuf::from(default), PathBuf::from)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
