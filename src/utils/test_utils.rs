use crate::{
    config::{DailyLeaderboardsConfig, ModeRule, RewardBracket},
    model::structures::{competition_key::CompetitionKey, leaderboard_entry::LeaderboardEntry}
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub fn generate_entry(uid: &str, wpm: f64, acc: f64, timestamp: i64) -> LeaderboardEntry {
    LeaderboardEntry {
        uid: uid.to_string(),
        name: format!("user_{}", uid),
        wpm,
        raw: wpm + 2.0,
        acc,
        consistency: 80.0,
        timestamp,
        discord_id: None,
        discord_avatar: None,
        badge_id: None
    }
}

/// `n` entries with distinct uids and pseudo-random results. The same seed
/// always yields the same entries.
pub fn generate_entries(n: usize, seed: u64) -> Vec<LeaderboardEntry> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    (0..n)
        .map(|i| {
            let wpm = rng.random_range(20.0..=250.0);
            let acc = rng.random_range(75.0..=100.0);
            let timestamp = rng.random_range(0..86_400_000);

            generate_entry(&format!("user{}", i), wpm, acc, timestamp)
        })
        .collect()
}

pub fn generate_mode_rule(language: &str, mode: &str, mode2: &str) -> ModeRule {
    ModeRule {
        language: Some(language.to_string()),
        mode: Some(mode.to_string()),
        mode2: Some(mode2.to_string())
    }
}

pub fn generate_bracket(min_rank: u32, max_rank: u32, xp: u32) -> RewardBracket {
    RewardBracket { min_rank, max_rank, xp }
}

pub fn english_time_60() -> CompetitionKey {
    CompetitionKey::new("english", "time", "60")
}

/// Enabled config accepting english/spanish time 15/60, mirroring the
/// settings used by the production backend's own tests.
pub fn generate_config() -> DailyLeaderboardsConfig {
    DailyLeaderboardsConfig {
        enabled: true,
        max_results: 3,
        leaderboard_expiration_time_in_days: 1,
        valid_mode_rules: vec![generate_mode_rule("(english|spanish)", "time", "(15|60)")],
        daily_leaderboard_cache_size: 3,
        top_results_to_announce: 3,
        max_xp_reward: 0,
        min_xp_reward: 0,
        xp_reward_brackets: vec![],
        reference_utc_offset_minutes: 0
    }
}
