//! Daily leaderboard engine: which competitions qualify, how entries are
//! ranked and rewarded, and how per-day leaderboards live and die in memory.
pub mod constants;
pub mod daily_leaderboard;
pub mod entry_store;
pub mod mode_rules;
pub mod registry;
pub mod rewards;
pub mod structures;
pub mod sweeper;

pub use daily_leaderboard::DailyLeaderboard;
pub use mode_rules::{is_eligible, ModeRuleMatcher};
pub use registry::DailyLeaderboardRegistry;
pub use rewards::compute_reward;
