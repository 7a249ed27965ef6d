use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Account lifecycle changes that invalidate a user's leaderboard entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "snake_case")]
pub enum AccountEvent {
    DeleteUser,
    ResetUser,
    ClearPersonalBests
}

impl AccountEvent {
    /// Whether the user's all-time standing goes away too. Clearing personal
    /// bests leaves the all-time board to its next rebuild.
    pub fn clears_all_time(self) -> bool {
        matches!(self, AccountEvent::DeleteUser | AccountEvent::ResetUser)
    }
}
