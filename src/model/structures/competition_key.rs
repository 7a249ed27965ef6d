use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one leaderboard: a language plus a test mode and its sub-mode
/// (e.g. `english time 60`). Fields are stored lowercase, since mode rules
/// match without regard to case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompetitionKey {
    pub language: String,
    pub mode: String,
    pub mode2: String
}

impl CompetitionKey {
    pub fn new(language: impl Into<String>, mode: impl Into<String>, mode2: impl Into<String>) -> CompetitionKey {
        CompetitionKey {
            language: language.into().to_lowercase(),
            mode: mode.into().to_lowercase(),
            mode2: mode2.into().to_lowercase()
        }
    }

    /// Same key with every field lowercased. Keys built through
    /// [`new`](Self::new) are already normalized.
    pub fn normalized(&self) -> CompetitionKey {
        CompetitionKey::new(&*self.language, &*self.mode, &*self.mode2)
    }

    pub fn on_day(&self, day: i64) -> DailyKey {
        DailyKey {
            competition: self.normalized(),
            day
        }
    }
}

impl fmt::Display for CompetitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.language, self.mode, self.mode2)
    }
}

/// A competition key pinned to the start of one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DailyKey {
    pub competition: CompetitionKey,
    /// Day start, epoch milliseconds
    pub day: i64
}

impl fmt::Display for DailyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.competition, self.day)
    }
}
