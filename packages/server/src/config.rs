//! Server configuration from environment variables
//!
//! # Environment Variables
//!
//! - `ARBOR_PORT`: Server port (default: 3001)
//! - `ARBOR_DB_PATH`: Database file (default: `~/.arbor/database/arbor.db`)
//! - `CORS_ALLOW_ORIGIN`: Single allowed browser origin (default: local dev ports)
//! - `ARBOR_SEED_DEMO`: Seed the demo forest into an empty store (default: false)
//! - `ARBOR_MAX_PATH_DEPTH`: Parent hops followed by path lookups (default: 10000)

use arbor_core::services::TreeServiceConfig;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3001;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("Failed to get home directory; set ARBOR_DB_PATH explicitly")]
    MissingHomeDir,
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            var,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Runtime settings for the HTTP server binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub db_path: PathBuf,
    pub cors_allow_origin: Option<String>,
    pub seed_demo: bool,
    pub tree: TreeServiceConfig,
}

impl ServerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_var(&lookup, "ARBOR_PORT")?.unwrap_or(DEFAULT_PORT);

        let db_path = match lookup("ARBOR_DB_PATH").filter(|p| !p.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };

        let cors_allow_origin = lookup("CORS_ALLOW_ORIGIN").filter(|o| !o.trim().is_empty());

        let seed_demo = match lookup("ARBOR_SEED_DEMO") {
            Some(value) => parse_flag("ARBOR_SEED_DEMO", &value)?,
            None => false,
        };

        let mut tree = TreeServiceConfig::default();
        if let Some(depth) = parse_var::<usize, _>(&lookup, "ARBOR_MAX_PATH_DEPTH")? {
            if depth == 0 {
                return Err(ConfigError::invalid(
                    "ARBOR_MAX_PATH_DEPTH",
                    "0",
                    "must be at least 1",
                ));
            }
            tree.max_path_depth = depth;
        }

        Ok(Self {
            port,
            db_path,
            cors_allow_origin,
            seed_demo,
            tree,
        })
    }
}

/// Default: ~/.arbor/database/arbor.db
fn default_db_path() -> Result<PathBuf, ConfigError> {
    let home_dir = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
    Ok(home_dir.join(".arbor").join("database").join("arbor.db"))
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::invalid(var, &value, e.to_string()))
        })
        .transpose()
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::invalid(var, value, "expected true or false")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[("ARBOR_DB_PATH", "/tmp/a.db")]))
            .unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.db_path, PathBuf::from("/tmp/a.db"));
        assert_eq!(config.cors_allow_origin, None);
        assert!(!config.seed_demo);
        assert_eq!(config.tree, TreeServiceConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("ARBOR_PORT", "8080"),
            ("ARBOR_DB_PATH", "/data/trees.db"),
            ("CORS_ALLOW_ORIGIN", "http://localhost:5173"),
            ("ARBOR_SEED_DEMO", "yes"),
            ("ARBOR_MAX_PATH_DEPTH", "64"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_allow_origin.as_deref(), Some("http://localhost:5173"));
        assert!(config.seed_demo);
        assert_eq!(config.tree.max_path_depth, 64);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let err = ServerConfig::from_lookup(lookup_from(&[
            ("ARBOR_DB_PATH", "/tmp/a.db"),
            ("ARBOR_PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: "ARBOR_PORT", .. }));

        let err = ServerConfig::from_lookup(lookup_from(&[
            ("ARBOR_DB_PATH", "/tmp/a.db"),
            ("ARBOR_SEED_DEMO", "maybe"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: "ARBOR_SEED_DEMO", .. }));

        let err = ServerConfig::from_lookup(lookup_from(&[
            ("ARBOR_DB_PATH", "/tmp/a.db"),
            ("ARBOR_MAX_PATH_DEPTH", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { var: "ARBOR_MAX_PATH_DEPTH", .. }
        ));
    }
}
