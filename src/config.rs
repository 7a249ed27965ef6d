use crate::{
    model::mode_rules::{compile_pattern, ModeRuleMatcher},
    utils::time::DayBoundary
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::Path,
    sync::{Arc, PoisonError, RwLock}
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Mode rule {index} has an invalid {field} pattern: {source}")]
    InvalidModeRule {
        index: usize,
        field: &'static str,
        #[source]
        source: regex::Error
    },

    #[error("Reward bracket {index} has minRank {min_rank} above maxRank {max_rank}")]
    InvalidRewardBracket { index: usize, min_rank: u32, max_rank: u32 },

    #[error("minXpReward {min} is above maxXpReward {max}")]
    InvalidXpRange { min: u32, max: u32 },

    #[error("referenceUtcOffsetMinutes {0} is not a valid UTC offset")]
    InvalidUtcOffset(i32)
}

/// Patterns a (language, mode, mode2) triple must fully match to get a
/// daily leaderboard. A missing or empty pattern never matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeRule {
    pub language: Option<String>,
    pub mode: Option<String>,
    pub mode2: Option<String>
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardBracket {
    pub min_rank: u32,
    pub max_rank: u32,
    pub xp: u32
}

impl RewardBracket {
    pub fn contains(&self, rank: u32) -> bool {
        (self.min_rank..=self.max_rank).contains(&rank)
    }
}

/// The `dailyLeaderboards` section of the server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyLeaderboardsConfig {
    pub enabled: bool,
    /// Maximum number of daily leaderboards kept in memory
    pub daily_leaderboard_cache_size: usize,
    pub leaderboard_expiration_time_in_days: u32,
    pub valid_mode_rules: Vec<ModeRule>,
    /// Largest page `get_results` hands out
    pub max_results: usize,
    pub top_results_to_announce: u32,
    pub min_xp_reward: u32,
    pub max_xp_reward: u32,
    pub xp_reward_brackets: Vec<RewardBracket>,
    /// Reference timezone for day boundaries, minutes east of UTC
    pub reference_utc_offset_minutes: i32
}

impl Default for DailyLeaderboardsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            daily_leaderboard_cache_size: 1,
            leaderboard_expiration_time_in_days: 0,
            valid_mode_rules: Vec::new(),
            max_results: 0,
            top_results_to_announce: 0,
            min_xp_reward: 0,
            max_xp_reward: 0,
            xp_reward_brackets: Vec::new(),
            reference_utc_offset_minutes: 0
        }
    }
}

impl DailyLeaderboardsConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: DailyLeaderboardsConfig = serde_json::from_str(json)?;
        config.validate()?;

        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Rejects configuration that would otherwise only surface per request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, rule) in self.valid_mode_rules.iter().enumerate() {
            let fields = [
                ("language", &rule.language),
                ("mode", &rule.mode),
                ("mode2", &rule.mode2)
            ];
            for (field, pattern) in fields {
                if let Some(Err(source)) = pattern.as_deref().map(compile_pattern) {
                    return Err(ConfigError::InvalidModeRule { index, field, source });
                }
            }
        }

        for (index, bracket) in self.xp_reward_brackets.iter().enumerate() {
            if bracket.min_rank > bracket.max_rank {
                return Err(ConfigError::InvalidRewardBracket {
                    index,
                    min_rank: bracket.min_rank,
                    max_rank: bracket.max_rank
                });
            }
        }

        if self.min_xp_reward > self.max_xp_reward {
            return Err(ConfigError::InvalidXpRange {
                min: self.min_xp_reward,
                max: self.max_xp_reward
            });
        }

        if DayBoundary::from_offset_minutes(self.reference_utc_offset_minutes).is_none() {
            return Err(ConfigError::InvalidUtcOffset(self.reference_utc_offset_minutes));
        }

        Ok(())
    }
}

/// A configuration snapshot together with its compiled mode rules. Build one
/// whenever the configuration changes and hand it to every leaderboard call.
#[derive(Debug, Clone)]
pub struct LeaderboardSettings {
    pub config: DailyLeaderboardsConfig,
    pub matcher: ModeRuleMatcher,
    pub boundary: DayBoundary
}

impl LeaderboardSettings {
    pub fn new(config: DailyLeaderboardsConfig) -> LeaderboardSettings {
        let matcher = ModeRuleMatcher::new(&config.valid_mode_rules);
        let boundary = DayBoundary::from_offset_minutes(config.reference_utc_offset_minutes).unwrap_or_default();

        LeaderboardSettings {
            config,
            matcher,
            boundary
        }
    }
}

impl From<DailyLeaderboardsConfig> for LeaderboardSettings {
    fn from(config: DailyLeaderboardsConfig) -> Self {
        LeaderboardSettings::new(config)
    }
}

/// The settings snapshot currently in force, shared by request handling and
/// background work. Clones point at the same slot. Calls already holding a
/// snapshot finish on it after a [`replace`](Self::replace).
#[derive(Debug, Clone)]
pub struct SharedSettings {
    current: Arc<RwLock<Arc<LeaderboardSettings>>>
}

impl SharedSettings {
    pub fn new(settings: LeaderboardSettings) -> SharedSettings {
        SharedSettings {
            current: Arc::new(RwLock::new(Arc::new(settings)))
        }
    }

    pub fn current(&self) -> Arc<LeaderboardSettings> {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn replace(&self, settings: LeaderboardSettings) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(settings);
    }
}
