use serde::Serialize;

/// Outcome of a leaderboard read. Callers map these onto their transport:
/// `NotFound` is a miss, `Rebuilding` means "try again shortly".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "camelCase")]
pub enum LeaderboardQuery<T> {
    Available(T),
    NotFound,
    Rebuilding
}

impl<T> LeaderboardQuery<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, LeaderboardQuery::Available(_))
    }

    pub fn is_rebuilding(&self) -> bool {
        matches!(self, LeaderboardQuery::Rebuilding)
    }

    pub fn available(self) -> Option<T> {
        match self {
            LeaderboardQuery::Available(data) => Some(data),
            _ => None
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> LeaderboardQuery<U> {
        match self {
            LeaderboardQuery::Available(data) => LeaderboardQuery::Available(f(data)),
            LeaderboardQuery::NotFound => LeaderboardQuery::NotFound,
            LeaderboardQuery::Rebuilding => LeaderboardQuery::Rebuilding
        }
    }

    /// Lifts an optional value; `None` becomes `NotFound`.
    pub fn from_option(value: Option<T>) -> LeaderboardQuery<T> {
        value.map_or(LeaderboardQuery::NotFound, LeaderboardQuery::Available)
    }
}

impl<T> LeaderboardQuery<Option<T>> {
    /// Collapses a found leaderboard without data for the caller into `NotFound`.
    pub fn flatten(self) -> LeaderboardQuery<T> {
        match self {
            LeaderboardQuery::Available(Some(data)) => LeaderboardQuery::Available(data),
            LeaderboardQuery::Available(None) | LeaderboardQuery::NotFound => LeaderboardQuery::NotFound,
            LeaderboardQuery::Rebuilding => LeaderboardQuery::Rebuilding
        }
    }
}
