use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Server configuration persisted as TOML.
///
/// Fields:
/// - bind: address to listen on
/// - port: first port to try; the next free one within 100 is used if taken
/// - concluded_ttl_secs: how long a concluded session is kept (0 keeps it forever)
/// - sweep_interval_secs: how often the eviction sweeper runs
/// - static_dir: optional directory served at `/` for a browser UI
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub bind: String,
    pub port: u16,
    pub concluded_ttl_secs: u64,
    pub sweep_interval_secs: u64,
    pub static_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind: "127.0.0.1".to_string(),
            port: 3000,
            concluded_ttl_secs: 3600,
            sweep_interval_secs: 60,
            static_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from `path`. If the file does not exist, create it
    /// with reasonable defaults and return the default config.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let s = fs::read_to_string(path)
                .with_context(|| format!("reading config file '{}'", path.display()))?;
            let cfg: Config = toml::from_str(&s)
                .with_context(|| format!("parsing TOML config '{}'", path.display()))?;
            Ok(cfg)
        } else {
            let cfg = Config::default();
            cfg.save(path)
                .with_context(|| format!("writing default config to '{}'", path.display()))?;
            Ok(cfg)
        }
    }

    /// Save the current config state back to the provided path (overwrites).
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("creating config directory '{}'", parent.display())
                })?;
            }
        }
        let toml_text =
            toml::to_string_pretty(&self).with_context(|| "serializing config to TOML")?;
        fs::write(path, toml_text)
            .with_context(|| format!("writing config to '{}'", path.display()))?;
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<IpAddr> {
        self.bind
            .parse()
            .with_context(|| format!("parsing bind address '{}'", self.bind))
    }

    /// TTL for concluded sessions, `None` when eviction is disabled.
    pub fn concluded_ttl(&self) -> Option<Duration> {
        (self.concluded_ttl_secs > 0).then(|| Duration::from_secs(self.concluded_ttl_secs))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("ttt-config-{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    #[test]
    fn creates_default_file_when_missing() {
        let path = scratch_path("ttt-server.toml");
        let cfg = Config::load_or_create(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let again = Config::load_or_create(&path).unwrap();
        assert_eq!(again, cfg);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let path = scratch_path("partial.toml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "port = 4100\nconcluded_ttl_secs = 0\n").unwrap();

        let cfg = Config::load_or_create(&path).unwrap();
        assert_eq!(cfg.port, 4100);
        assert_eq!(cfg.bind, "127.0.0.1");
        assert_eq!(cfg.concluded_ttl(), None);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn rejects_bad_bind_address() {
        let cfg = Config {
            bind: "not-an-ip".into(),
            ..Config::default()
        };
        assert!(cfg.bind_addr().is_err());
    }
}
