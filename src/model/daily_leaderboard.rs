use std::{
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard
    },
    fmt
};

use crate::{
    config::DailyLeaderboardsConfig,
    model::{
        entry_store::EntryStore,
        rewards::announced_reward,
        structures::{
            competition_key::DailyKey,
            insert_outcome::InsertOutcome,
            leaderboard_entry::{LeaderboardEntry, RankedEntry}
        }
    },
    utils::time::Clock
};

/// The leaderboard of one competition for one day.
///
/// Instances are shared through `Arc`; once the registry drops one, anyone
/// still holding it keeps a consistent, detached copy until they let go.
pub struct DailyLeaderboard {
    key: DailyKey,
    created_at: i64,
    // Milliseconds, bumped by every registry lookup and every write
    last_access: AtomicI64,
    clock: Arc<dyn Clock>,
    store: RwLock<EntryStore>
}

impl fmt::Debug for DailyLeaderboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DailyLeaderboard")
            .field("key", &self.key)
            .field("created_at", &self.created_at)
            .field("last_access", &self.last_access())
            .field("entries", &self.count())
            .finish()
    }
}

impl DailyLeaderboard {
    pub fn new(key: DailyKey, clock: Arc<dyn Clock>) -> DailyLeaderboard {
        let now = clock.now_ms();

        DailyLeaderboard {
            key,
            created_at: now,
            last_access: AtomicI64::new(now),
            clock,
            store: RwLock::new(EntryStore::new())
        }
    }

    pub fn key(&self) -> &DailyKey {
        &self.key
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn last_access(&self) -> i64 {
        self.last_access.load(Ordering::Relaxed)
    }

    pub(crate) fn touch(&self) {
        self.last_access.fetch_max(self.clock.now_ms(), Ordering::Relaxed);
    }

    // The store is left sorted after every write, so a poisoned lock still
    // guards a usable store.
    fn read_store(&self) -> RwLockReadGuard<'_, EntryStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_store(&self) -> RwLockWriteGuard<'_, EntryStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn count(&self) -> usize {
        self.read_store().len()
    }

    /// Records `entry` if it is the user's first or best result today.
    pub fn add_or_update_entry(&self, entry: LeaderboardEntry) -> InsertOutcome {
        self.touch();
        self.write_store().add_or_update(entry)
    }

    /// Ranked entries from `min_rank` to `max_rank` (1-based, inclusive), at
    /// most `max_results` of them. Announced places carry their XP reward.
    pub fn get_results(&self, min_rank: u32, max_rank: u32, config: &DailyLeaderboardsConfig) -> Vec<RankedEntry> {
        let store = self.read_store();

        store
            .range(min_rank, max_rank)
            .take(config.max_results)
            .map(|(rank, entry)| RankedEntry {
                rank,
                entry: entry.clone(),
                reward: announced_reward(rank, config)
            })
            .collect()
    }

    pub fn get_rank(&self, uid: &str, config: &DailyLeaderboardsConfig) -> Option<RankedEntry> {
        let store = self.read_store();

        store.rank_of(uid).map(|(rank, entry)| RankedEntry {
            rank,
            entry: entry.clone(),
            reward: announced_reward(rank, config)
        })
    }

    pub fn remove_user(&self, uid: &str) -> Option<LeaderboardEntry> {
        self.write_store().remove(uid)
    }
}
