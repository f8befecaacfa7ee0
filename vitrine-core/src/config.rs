//! # Configuration
//!
//! A flat string key/value store. Keys are dotted (`blob.public_url`) and the
//! environment loader maps `VITRINE__BLOB__PUBLIC_URL` onto that form:
//!
//! ```rust
//! use vitrine_core::VitrineConfig;
//!
//! let mut config = VitrineConfig::new();
//! config.set("stepup.ttl_secs", "300");
//!
//! let snapshot = config.snapshot();
//! assert_eq!(snapshot.get_u64("stepup.ttl_secs"), Some(300));
//! ```
//!
//! Typed settings (S3 credentials, admin backend selection) are read by the
//! crates that need them; this store only covers the shared knobs.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct VitrineConfig {
    values: HashMap<String, String>,
}

impl VitrineConfig {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Import every `{prefix}SECTION__KEY` variable from the process environment.
    pub fn load_env(&mut self, prefix: &str) {
        self.load_pairs(prefix, std::env::vars());
    }

    /// Same mapping as [`load_env`](Self::load_env) over an explicit iterator.
    pub fn load_pairs<I>(&mut self, prefix: &str, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(prefix) {
                let normalized = stripped.to_lowercase().replace("__", ".");
                if normalized.is_empty() {
                    continue;
                }
                tracing::debug!(key = %normalized, "config value loaded from environment");
                self.values.insert(normalized, value);
            }
        }
    }

    pub fn snapshot(&self) -> VitrineConfigSnapshot {
        VitrineConfigSnapshot {
            map: self.values.clone(),
        }
    }
}

/// Read-only copy handed to components at construction time.
#[derive(Debug, Clone, Default)]
pub struct VitrineConfigSnapshot {
    map: HashMap<String, String>,
}

impl VitrineConfigSnapshot {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.parse::<usize>().ok())
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.parse::<u64>().ok())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.parse::<bool>().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_pairs_are_normalized_to_dotted_keys() {
        let mut config = VitrineConfig::new();
        config.load_pairs(
            "VITRINE__",
            vec![
                ("VITRINE__BLOB__PUBLIC_URL".to_string(), "https://cdn.example.org".to_string()),
                ("VITRINE__STEPUP__TTL_SECS".to_string(), "120".to_string()),
                ("HOME".to_string(), "/root".to_string()),
            ],
        );

        assert_eq!(config.get("blob.public_url"), Some("https://cdn.example.org"));
        assert!(!config.has("home"));
        assert_eq!(config.snapshot().get_u64("stepup.ttl_secs"), Some(120));
    }

    #[test]
    fn typed_getters_reject_garbage() {
        let mut config = VitrineConfig::new();
        config.set("flag", "maybe");
        let snap = config.snapshot();
        assert_eq!(snap.get_bool("flag"), None);
        assert_eq!(snap.get_usize("missing"), None);
    }
}
