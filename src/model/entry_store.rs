use indexmap::IndexMap;

use crate::model::structures::{insert_outcome::InsertOutcome, leaderboard_entry::LeaderboardEntry};

#[derive(Debug, Clone)]
struct StoredEntry {
    entry: LeaderboardEntry,
    // Settles exact ties between users: first stored ranks higher
    seq: u64
}

/// Best entry per user for one leaderboard, kept in rank order.
///
/// The map is sorted after every change, so the index of a user's entry is
/// always their rank minus one. Rank lookups are O(1) and a page of results
/// is a contiguous slice of the map.
#[derive(Debug, Clone, Default)]
pub struct EntryStore {
    entries: IndexMap<String, StoredEntry>,
    next_seq: u64
}

impl EntryStore {
    pub fn new() -> EntryStore {
        EntryStore::default()
    }

    /// Builds a store from an unordered batch, keeping each user's best entry.
    pub fn from_entries(entries: impl IntoIterator<Item = LeaderboardEntry>) -> EntryStore {
        let mut store = EntryStore::new();
        for entry in entries {
            store.stage(entry);
        }
        store.sort();

        store
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stores `entry` unless the user already has an entry at least as good.
    /// Entries without finite wpm and accuracy are discarded.
    pub fn add_or_update(&mut self, entry: LeaderboardEntry) -> InsertOutcome {
        let outcome = self.stage(entry);
        if outcome.changed() {
            self.sort();
        }

        outcome
    }

    /// Inserts or replaces without restoring order.
    fn stage(&mut self, entry: LeaderboardEntry) -> InsertOutcome {
        if !entry.has_finite_scores() {
            return InsertOutcome::Discarded;
        }

        let outcome = match self.entries.get(&entry.uid) {
            Some(existing) if !entry.improves_on(&existing.entry) => return InsertOutcome::Discarded,
            Some(_) => InsertOutcome::Improved,
            None => InsertOutcome::Inserted
        };

        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(entry.uid.clone(), StoredEntry { entry, seq });

        outcome
    }

    fn sort(&mut self) {
        self.entries
            .sort_by(|_, a, _, b| a.entry.cmp_rank(&b.entry).then_with(|| a.seq.cmp(&b.seq)));
    }

    pub fn remove(&mut self, uid: &str) -> Option<LeaderboardEntry> {
        // shift_remove keeps everyone else in rank order
        self.entries.shift_remove(uid).map(|stored| stored.entry)
    }

    pub fn get(&self, uid: &str) -> Option<&LeaderboardEntry> {
        self.entries.get(uid).map(|stored| &stored.entry)
    }

    /// 1-based rank of the user's entry.
    pub fn rank_of(&self, uid: &str) -> Option<(u32, &LeaderboardEntry)> {
        self.entries
            .get_full(uid)
            .map(|(index, _, stored)| (index as u32 + 1, &stored.entry))
    }

    /// Entries ranked `min_rank..=max_rank`, 1-based. A `min_rank` of 0 reads
    /// as 1; ranks past the end are simply missing.
    pub fn range(&self, min_rank: u32, max_rank: u32) -> impl Iterator<Item = (u32, &LeaderboardEntry)> + '_ {
        let min_rank = min_rank.max(1);
        let len = if max_rank < min_rank {
            0
        } else {
            (max_rank - min_rank) as usize + 1
        };

        self.entries
            .values()
            .enumerate()
            .skip(min_rank as usize - 1)
            .take(len)
            .map(|(index, stored)| (index as u32 + 1, &stored.entry))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &LeaderboardEntry)> + '_ {
        self.range(1, u32::MAX)
    }
}
