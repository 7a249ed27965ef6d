use std::{
    collections::{HashMap, HashSet},
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard}
};

use tracing::{debug, info, warn};

use crate::model::{
    entry_store::EntryStore,
    structures::{
        competition_key::CompetitionKey,
        leaderboard_entry::{LeaderboardEntry, RankedEntry},
        leaderboard_query::LeaderboardQuery
    }
};

/// Read access to the durable all-time leaderboards.
///
/// Implementations never block on a rebuild: while a leaderboard is being
/// regenerated they answer `Rebuilding` instead of waiting.
pub trait AllTimeRankGateway: Send + Sync {
    /// `limit` entries starting after the first `skip` (0-based).
    fn get_leaderboard(&self, key: &CompetitionKey, skip: u32, limit: u32) -> LeaderboardQuery<Vec<RankedEntry>>;

    /// `Available(None)` when the leaderboard exists but the user is not on it.
    fn get_rank(&self, key: &CompetitionKey, uid: &str) -> LeaderboardQuery<Option<RankedEntry>>;

    /// Drops the user from every all-time leaderboard, if the backend supports
    /// it outside a rebuild. Returns how many entries went. Backends that
    /// cannot remove users leave it to the next rebuild.
    fn remove_user(&self, uid: &str) -> usize {
        debug!(uid, "All-time backend defers user removal to the next rebuild");
        0
    }
}

#[derive(Debug, Default)]
struct AllTimeState {
    boards: HashMap<CompetitionKey, EntryStore>,
    rebuilding: HashSet<CompetitionKey>
}

/// All-time leaderboards held in memory. Rebuilds are staged outside the lock
/// and swapped in whole, so readers see either the old ranking or the new one.
#[derive(Debug, Default)]
pub struct InMemoryAllTimeLeaderboard {
    state: RwLock<AllTimeState>
}

impl InMemoryAllTimeLeaderboard {
    pub fn new() -> InMemoryAllTimeLeaderboard {
        InMemoryAllTimeLeaderboard::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, AllTimeState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, AllTimeState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks the leaderboard as regenerating; reads answer `Rebuilding` until
    /// [`finish_rebuild`](Self::finish_rebuild) or
    /// [`abort_rebuild`](Self::abort_rebuild).
    pub fn begin_rebuild(&self, key: &CompetitionKey) {
        self.write().rebuilding.insert(key.clone());
        info!(key = %key, "All-time leaderboard rebuild started");
    }

    /// Replaces the leaderboard with a ranking built from `entries`.
    pub fn finish_rebuild(&self, key: &CompetitionKey, entries: Vec<LeaderboardEntry>) {
        let store = EntryStore::from_entries(entries);
        let count = store.len();

        let mut state = self.write();
        state.boards.insert(key.clone(), store);
        state.rebuilding.remove(key);
        drop(state);

        info!(key = %key, entries = count, "All-time leaderboard rebuilt");
    }

    /// Ends a rebuild without touching the previous ranking.
    pub fn abort_rebuild(&self, key: &CompetitionKey) {
        if self.write().rebuilding.remove(key) {
            warn!(key = %key, "All-time leaderboard rebuild aborted");
        }
    }

    pub fn count(&self, key: &CompetitionKey) -> Option<usize> {
        self.read().boards.get(key).map(EntryStore::len)
    }
}

impl AllTimeRankGateway for InMemoryAllTimeLeaderboard {
    fn get_leaderboard(&self, key: &CompetitionKey, skip: u32, limit: u32) -> LeaderboardQuery<Vec<RankedEntry>> {
        let state = self.read();
        if state.rebuilding.contains(key) {
            return LeaderboardQuery::Rebuilding;
        }

        LeaderboardQuery::from_option(state.boards.get(key)).map(|store| {
            if limit == 0 {
                return Vec::new();
            }

            store
                .range(skip.saturating_add(1), skip.saturating_add(limit))
                .map(|(rank, entry)| RankedEntry {
                    rank,
                    entry: entry.clone(),
                    reward: None
                })
                .collect()
        })
    }

    fn get_rank(&self, key: &CompetitionKey, uid: &str) -> LeaderboardQuery<Option<RankedEntry>> {
        let state = self.read();
        if state.rebuilding.contains(key) {
            return LeaderboardQuery::Rebuilding;
        }

        LeaderboardQuery::from_option(state.boards.get(key)).map(|store| {
            store.rank_of(uid).map(|(rank, entry)| RankedEntry {
                rank,
                entry: entry.clone(),
                reward: None
            })
        })
    }

    fn remove_user(&self, uid: &str) -> usize {
        self.write()
            .boards
            .values_mut()
            .filter_map(|store| store.remove(uid))
            .count()
    }
}
