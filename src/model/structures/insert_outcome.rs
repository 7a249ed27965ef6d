use serde::Serialize;
use strum_macros::Display;

/// What `add_or_update_entry` did with a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "snake_case")]
pub enum InsertOutcome {
    /// First entry for this user
    Inserted,
    /// Replaced a worse entry
    Improved,
    /// Not better than the stored entry; nothing changed
    Discarded
}

impl InsertOutcome {
    pub fn changed(self) -> bool {
        !matches!(self, InsertOutcome::Discarded)
    }
}
