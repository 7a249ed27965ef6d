pub mod all_time;

pub use all_time::{AllTimeRankGateway, InMemoryAllTimeLeaderboard};
