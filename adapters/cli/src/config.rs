//! Optional TOML overrides for the game tunables.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use robot_chase_model::Config;
use serde::Deserialize;

/// Overrides read from a `--config` file. Missing keys keep the defaults.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    season_interval_ms: Option<u64>,
    stuck_turns: Option<u8>,
}

impl FileConfig {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid config toml")
    }

    pub(crate) fn apply(&self, mut config: Config) -> Config {
        if let Some(millis) = self.season_interval_ms {
            config = config.with_season_interval(Duration::from_millis(millis));
        }
        if let Some(turns) = self.stuck_turns {
            config = config.with_stuck_turns(turns);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_only_present_keys() {
        let file = FileConfig::parse("season_interval_ms = 1500\n").expect("valid toml");
        let config = file.apply(Config::default());

        assert_eq!(config.season_interval(), Duration::from_millis(1500));
        assert_eq!(config.stuck_turns(), 3);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(FileConfig::parse("seasons = 2\n").is_err());
        assert_eq!(FileConfig::parse("").expect("empty toml"), FileConfig::default());
    }
}
