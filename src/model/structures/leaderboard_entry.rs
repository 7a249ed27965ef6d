use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One participant's best qualifying result on a leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub uid: String,
    pub name: String,
    pub wpm: f64,
    pub raw: f64,
    pub acc: f64,
    pub consistency: f64,
    /// Submission time, epoch milliseconds
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discord_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discord_avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_id: Option<i32>
}

impl LeaderboardEntry {
    /// Ranking order without the store's insertion sequence: faster first,
    /// then more accurate, then whoever got there first.
    ///
    /// `Ordering::Less` means `self` ranks above `other`.
    pub fn cmp_rank(&self, other: &LeaderboardEntry) -> Ordering {
        other
            .wpm
            .total_cmp(&self.wpm)
            .then_with(|| other.acc.total_cmp(&self.acc))
            .then_with(|| self.timestamp.cmp(&other.timestamp))
    }

    /// Whether the ranked metrics are real numbers. Entries with NaN or
    /// infinite speed or accuracy are never ranked.
    pub fn has_finite_scores(&self) -> bool {
        self.wpm.is_finite() && self.acc.is_finite()
    }

    pub fn improves_on(&self, other: &LeaderboardEntry) -> bool {
        self.cmp_rank(other) == Ordering::Less
    }
}

/// An entry with its position on a leaderboard and, for announced places,
/// the XP it earns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub rank: u32,
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward: Option<u32>
}
