// Registry
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
// Paging
pub const DEFAULT_PAGE_LIMIT: u32 = 50;
pub const ALL_TIME_PAGE_LIMIT: u32 = 50;
// Leaderboards shown on user profiles
pub const PROFILE_LANGUAGE: &str = "english";
pub const PROFILE_MODE: &str = "time";
pub const PROFILE_MODE2_SHORT: &str = "15";
pub const PROFILE_MODE2_LONG: &str = "60";
