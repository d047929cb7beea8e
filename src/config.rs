use serde::{Deserialize, Serialize};

/// Tunables for the bounce gate, loadable from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Budget handed to the SPF capability for its DNS-dependent work. An
    /// implementation whose lookups exceed it must report `TempError`.
    pub spf_timeout_seconds: u64,
    /// Write a `vette` audit entry for each suppressed bounce.
    pub audit_suppressions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            spf_timeout_seconds: 20,
            audit_suppressions: true,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_audits_suppressions() {
        let config = Config::default();
        assert!(config.audit_suppressions);
        assert_eq!(config.spf_timeout_seconds, 20);
    }

    #[test]
    fn yaml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bounce-guard.yaml");
        let path = path.to_str().unwrap();

        let config = Config {
            spf_timeout_seconds: 5,
            audit_suppressions: false,
        };
        config.to_file(path).unwrap();

        let loaded = Config::from_file(path).unwrap();
        assert_eq!(loaded.spf_timeout_seconds, 5);
        assert!(!loaded.audit_suppressions);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Config::from_file("/nonexistent/bounce-guard.yaml").is_err());
    }
}
