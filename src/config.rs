use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_starting_bankroll() -> u32 {
    1000
}

fn default_min_bet() -> u32 {
    10
}

fn default_max_bet() -> u32 {
    100
}

fn default_overlay_delay_ms() -> u32 {
    1200
}

/// Table limits. Missing fields in a deserialized config fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    #[serde(default = "default_starting_bankroll")]
    pub starting_bankroll: u32,
    #[serde(default = "default_min_bet")]
    pub min_bet: u32,
    #[serde(default = "default_max_bet")]
    pub max_bet: u32,
    /// How long the presentation layer waits before showing the bankroll-exhausted overlay.
    #[serde(default = "default_overlay_delay_ms")]
    pub overlay_delay_ms: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            starting_bankroll: default_starting_bankroll(),
            min_bet: default_min_bet(),
            max_bet: default_max_bet(),
            overlay_delay_ms: default_overlay_delay_ms(),
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_bet == 0 {
            return Err(ConfigError::ZeroMinimumBet);
        }
        if self.min_bet > self.max_bet {
            return Err(ConfigError::InvertedBetRange {
                min_bet: self.min_bet,
                max_bet: self.max_bet,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_house_table() {
        let config = TableConfig::default();
        assert_eq!(config.starting_bankroll, 1000);
        assert_eq!(config.min_bet, 10);
        assert_eq!(config.max_bet, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: TableConfig = serde_json::from_str(r#"{"maxBet": 250}"#).unwrap();
        assert_eq!(config.max_bet, 250);
        assert_eq!(config.min_bet, 10);
        assert_eq!(config.starting_bankroll, 1000);
        assert_eq!(config.overlay_delay_ms, 1200);
    }

    #[test]
    fn rejects_bad_limits() {
        let zero = TableConfig {
            min_bet: 0,
            ..TableConfig::default()
        };
        assert_eq!(zero.validate(), Err(ConfigError::ZeroMinimumBet));

        let inverted = TableConfig {
            min_bet: 50,
            max_bet: 20,
            ..TableConfig::default()
        };
        assert_eq!(
            inverted.validate(),
            Err(ConfigError::InvertedBetRange {
                min_bet: 50,
                max_bet: 20
            })
        );
    }
}
