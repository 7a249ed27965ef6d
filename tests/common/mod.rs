use std::sync::{Arc, Once};

use daily_leaderboards::{
    config::{DailyLeaderboardsConfig, LeaderboardSettings, ModeRule},
    model::registry::DailyLeaderboardRegistry,
    utils::time::{ManualClock, MILLISECONDS_IN_DAY}
};

static INIT: Once = Once::new();

/// 2024-01-15T00:00:00Z
pub const TODAY: i64 = 19_737 * MILLISECONDS_IN_DAY;

/// Initialize test environment with RUST_LOG=WARN
pub fn init_test_env() {
    INIT.call_once(|| {
        std::env::set_var("RUST_LOG", "warn");
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

pub fn rule(language: &str, mode: &str, mode2: &str) -> ModeRule {
    ModeRule {
        language: Some(language.to_string()),
        mode: Some(mode.to_string()),
        mode2: Some(mode2.to_string())
    }
}

pub fn config() -> DailyLeaderboardsConfig {
    DailyLeaderboardsConfig {
        enabled: true,
        daily_leaderboard_cache_size: 3,
        leaderboard_expiration_time_in_days: 1,
        valid_mode_rules: vec![rule("(english|spanish)", "time", "(15|60)"), ModeRule::default()],
        max_results: 100,
        top_results_to_announce: 3,
        ..DailyLeaderboardsConfig::default()
    }
}

/// A fresh registry whose clock sits an hour into `TODAY`.
pub fn registry() -> (Arc<ManualClock>, DailyLeaderboardRegistry, LeaderboardSettings) {
    init_test_env();
    let clock = Arc::new(ManualClock::new(TODAY + 3_600_000));
    let registry = DailyLeaderboardRegistry::new(clock.clone());

    (clock, registry, LeaderboardSettings::new(config()))
}
