use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

use colcrypt_crypto::ColumnKey;
use colcrypt_crypto::keys::key_from_base64;

pub const DB_PATH: &str = "COLCRYPT_DB_PATH";
pub const HOST: &str = "COLCRYPT_HOST";
pub const PORT: &str = "COLCRYPT_PORT";
pub const COLUMN_KEY: &str = "COLCRYPT_COLUMN_KEY";
pub const SEED: &str = "COLCRYPT_SEED";

/// Path value selecting an in-memory database.
pub const IN_MEMORY: &str = ":memory:";

#[derive(Debug)]
pub struct Config {
    pub db_path: PathBuf,
    pub addr: SocketAddr,
    /// `None` when no key is configured; the caller generates an ephemeral one.
    pub column_key: Option<ColumnKey>,
    pub seed: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let get = |name: &str, default: &str| {
            vars.get(name).cloned().unwrap_or_else(|| default.to_string())
        };

        let db_path = PathBuf::from(get(DB_PATH, "colcrypt.db"));
        let host = get(HOST, "0.0.0.0");
        let port: u16 = get(PORT, "3000")
            .parse()
            .with_context(|| format!("{} must be a port number", PORT))?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", host, port))?;

        let column_key = vars
            .get(COLUMN_KEY)
            .filter(|v| !v.trim().is_empty())
            .map(|v| key_from_base64(v))
            .transpose()
            .with_context(|| format!("{} must be a base64 encoded 32-byte key", COLUMN_KEY))?;

        let seed = match get(SEED, "true").to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            other => anyhow::bail!("{} must be a boolean, got '{}'", SEED, other),
        };

        Ok(Self {
            db_path,
            addr,
            column_key,
            seed,
        })
    }

    pub fn in_memory(&self) -> bool {
        self.db_path.as_os_str() == IN_MEMORY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colcrypt_crypto::keys::{generate_column_key, key_to_base64};

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults() {
        let config = Config::from_vars(&HashMap::new()).unwrap();
        assert_eq!(config.db_path, PathBuf::from("colcrypt.db"));
        assert_eq!(config.addr.port(), 3000);
        assert!(config.column_key.is_none());
        assert!(config.seed);
        assert!(!config.in_memory());
    }

    #[test]
    fn reads_overrides() {
        let key = generate_column_key();
        let config = Config::from_vars(&vars(&[
            (DB_PATH, IN_MEMORY),
            (HOST, "127.0.0.1"),
            (PORT, "8081"),
            (COLUMN_KEY, &key_to_base64(&key)),
            (SEED, "off"),
        ]))
        .unwrap();

        assert!(config.in_memory());
        assert_eq!(config.addr.to_string(), "127.0.0.1:8081");
        assert_eq!(config.column_key.unwrap().as_bytes(), key.as_bytes());
        assert!(!config.seed);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Config::from_vars(&vars(&[(PORT, "http")])).is_err());
        assert!(Config::from_vars(&vars(&[(COLUMN_KEY, "c2hvcnQ=")])).is_err());
        assert!(Config::from_vars(&vars(&[(SEED, "maybe")])).is_err());
    }
}
