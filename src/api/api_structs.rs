use serde::{Deserialize, Serialize};

use crate::model::structures::{competition_key::CompetitionKey, leaderboard_entry::LeaderboardEntry};

/// A completed test, as handed over by the results endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub language: String,
    pub mode: String,
    pub mode2: String,
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
    #[serde(default)]
    pub banned: bool,
    /// The user asked to be left off leaderboards
    #[serde(default)]
    pub lb_opt_out: bool
}

impl ScoreSubmission {
    pub fn competition_key(&self) -> CompetitionKey {
        CompetitionKey::new(self.language.as_str(), self.mode.as_str(), self.mode2.as_str())
    }

    pub fn is_rankable(&self) -> bool {
        !self.banned && !self.lb_opt_out && self.entry.has_finite_scores()
    }
}

/// A user's places on the all-time leaderboards shown on their profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllTimeRanks {
    #[serde(rename = "time15English", skip_serializing_if = "Option::is_none")]
    pub time15_english: Option<u32>,
    #[serde(rename = "time60English", skip_serializing_if = "Option::is_none")]
    pub time60_english: Option<u32>
}
