pub mod account_event;
pub mod competition_key;
pub mod day_selector;
pub mod insert_outcome;
pub mod leaderboard_entry;
pub mod leaderboard_query;
