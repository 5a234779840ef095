//! Credential file: `{ "<exchange>": { "AccessKeyId": "...", "SecretKeyId": "..." } }`

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use adapters::ExchangeKey;
use anyhow::{Context, Result};
use tracing::{debug, info};

pub struct KeyStore {
    path: PathBuf,
    keys: BTreeMap<String, ExchangeKey>,
}

impl KeyStore {
    /// Loads `path`, or starts empty when the file does not exist yet.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            debug!(path = %path.display(), "no credential file, starting empty");
            return Ok(Self {
                path,
                keys: BTreeMap::new(),
            });
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading credential file {}", path.display()))?;
        let keys = if raw.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing credential file {}", path.display()))?
        };
        Ok(Self { path, keys })
    }

    pub fn get(&self, exchange: &str) -> Option<&ExchangeKey> {
        self.keys.get(exchange)
    }

    /// Validates, stores and persists a key pair.
    pub fn set(&mut self, exchange: &str, key: ExchangeKey) -> Result<()> {
        key.validate()?;
        self.keys.insert(exchange.to_string(), key);
        let raw = serde_json::to_string_pretty(&self.keys)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("writing credential file {}", self.path.display()))?;
        info!(exchange, path = %self.path.display(), "credentials saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bcex-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let store = KeyStore::load(temp_path("missing")).unwrap();
        assert!(store.get("binance").is_none());
    }

    #[test]
    fn test_set_persists_original_layout() {
        let path = temp_path("persist");
        let mut store = KeyStore::load(&path).unwrap();
        store.set("okex", ExchangeKey::new("ak", "sk")).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"AccessKeyId\": \"ak\""));
        assert!(raw.contains("\"SecretKeyId\": \"sk\""));

        let reloaded = KeyStore::load(&path).unwrap();
        assert_eq!(reloaded.get("okex").map(|k| k.secret_key_id.as_str()), Some("sk"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_empty_key_rejected() {
        let path = temp_path("reject");
        let mut store = KeyStore::load(&path).unwrap();
        assert!(store.set("okex", ExchangeKey::new("", "sk")).is_err());
        assert!(!path.exists());
    }
}
