use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};
use crate::history::HistoryMode;

pub const ENV_MODE: &str = "SAYR_REACT_MODE";
pub const ENV_ROUND_LIMIT: &str = "SAYR_REACT_ROUND_LIMIT";

/// Loop settings that can come from a TOML file or the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentSettings {
    #[serde(default)]
    pub mode: HistoryMode,
    #[serde(default = "default_round_limit")]
    pub round_limit: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            mode: HistoryMode::default(),
            round_limit: default_round_limit(),
        }
    }
}

fn default_round_limit() -> usize {
    6
}

impl AgentSettings {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let settings: Self = toml::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_env_or_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file(path)?.apply_env()
    }

    /// Overrides fields from `SAYR_REACT_MODE` and `SAYR_REACT_ROUND_LIMIT`.
    pub fn apply_env(mut self) -> Result<Self> {
        if let Ok(mode) = env::var(ENV_MODE) {
            self.mode = mode.parse()?;
        }
        if let Ok(limit) = env::var(ENV_ROUND_LIMIT) {
            self.round_limit = limit.trim().parse::<usize>().map_err(|err| {
                AgentError::Configuration(format!("invalid {ENV_ROUND_LIMIT} `{limit}`: {err}"))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.round_limit == 0 {
            return Err(AgentError::Configuration(
                "round_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_when_empty() {
        let settings = AgentSettings::from_toml_str("").unwrap();
        assert_eq!(settings, AgentSettings::default());
        assert_eq!(settings.mode, HistoryMode::Scratchpad);
        assert_eq!(settings.round_limit, 6);
    }

    #[test]
    fn loads_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "mode = 'messages'\nround_limit = 3").unwrap();

        let settings = AgentSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.mode, HistoryMode::Messages);
        assert_eq!(settings.round_limit, 3);
    }

    #[test]
    fn rejects_unknown_keys_and_zero_limit() {
        assert!(matches!(
            AgentSettings::from_toml_str("rounds = 3"),
            Err(AgentError::ConfigParse(_))
        ));
        assert!(matches!(
            AgentSettings::from_toml_str("round_limit = 0"),
            Err(AgentError::Configuration(_))
        ));
    }

    #[test]
    fn environment_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "mode = 'scratchpad'\nround_limit = 3").unwrap();

        env::set_var(ENV_MODE, "messages");
        env::set_var(ENV_ROUND_LIMIT, "9");
        let settings = AgentSettings::from_env_or_file(file.path());
        env::remove_var(ENV_MODE);
        env::remove_var(ENV_ROUND_LIMIT);

        let settings = settings.unwrap();
        assert_eq!(settings.mode, HistoryMode::Messages);
        assert_eq!(settings.round_limit, 9);
    }
}
