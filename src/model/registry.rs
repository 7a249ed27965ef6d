use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, PoisonError
};

use dashmap::{mapref::entry::Entry, DashMap};
use tracing::{debug, info};

use crate::{
    config::{DailyLeaderboardsConfig, LeaderboardSettings},
    model::{
        daily_leaderboard::DailyLeaderboard,
        structures::{
            competition_key::{CompetitionKey, DailyKey},
            day_selector::DaySelector
        }
    },
    utils::time::{Clock, DayBoundary}
};

#[derive(Debug, Clone)]
struct Resident {
    leaderboard: Arc<DailyLeaderboard>,
    // Creation order, settles LRU ties when timestamps collide
    generation: u64
}

/// Owns every live daily leaderboard.
///
/// Leaderboards live in a [`DashMap`], so unrelated competitions never wait
/// on each other. Creation for one key happens under that key's entry lock,
/// so concurrent callers always see the same instance.
///
/// Instances leave the registry in two ways:
/// - expiration, once their day is more than
///   `leaderboardExpirationTimeInDays` behind today
/// - eviction, when more than `dailyLeaderboardCacheSize` are resident; the
///   least recently used goes first
///
/// Removal only drops the registry's `Arc`, so callers mid-read or mid-write
/// finish against the detached instance.
pub struct DailyLeaderboardRegistry {
    leaderboards: DashMap<DailyKey, Resident>,
    generation: AtomicU64,
    // Serializes eviction scans; never taken on the lookup path
    eviction: Mutex<()>,
    clock: Arc<dyn Clock>
}

impl DailyLeaderboardRegistry {
    pub fn new(clock: Arc<dyn Clock>) -> DailyLeaderboardRegistry {
        DailyLeaderboardRegistry {
            leaderboards: DashMap::new(),
            generation: AtomicU64::new(0),
            eviction: Mutex::new(()),
            clock
        }
    }

    /// Creates an empty registry for the given settings.
    pub fn initialize(settings: &LeaderboardSettings, clock: Arc<dyn Clock>) -> DailyLeaderboardRegistry {
        let config = &settings.config;
        info!(
            enabled = config.enabled,
            capacity = config.daily_leaderboard_cache_size,
            expiration_days = config.leaderboard_expiration_time_in_days,
            rules = settings.matcher.active_rules(),
            "Daily leaderboards initialized"
        );

        Self::new(clock)
    }

    /// Drops every resident leaderboard.
    pub fn clear(&self) {
        self.leaderboards.clear();
        debug!("Daily leaderboards cleared");
    }

    pub fn len(&self) -> usize {
        self.leaderboards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaderboards.is_empty()
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    fn is_expired(day: i64, today: i64, config: &DailyLeaderboardsConfig) -> bool {
        DayBoundary::days_between(day, today) > config.leaderboard_expiration_time_in_days as i64
    }

    fn accepts(key: &CompetitionKey, settings: &LeaderboardSettings) -> bool {
        settings.config.enabled && settings.matcher.is_key_eligible(key)
    }

    /// Returns the leaderboard for `key` on the day containing
    /// `day_timestamp`, creating it if needed. `None` if daily leaderboards
    /// are off, the key is not eligible, or the day has already expired or
    /// cannot be represented.
    pub fn get_or_create(
        &self,
        key: &CompetitionKey,
        day_timestamp: i64,
        settings: &LeaderboardSettings
    ) -> Option<Arc<DailyLeaderboard>> {
        if !Self::accepts(key, settings) {
            return None;
        }

        let boundary = &settings.boundary;
        let day = boundary.day_start(day_timestamp)?;
        let today = boundary.current_day(self.clock.as_ref())?;
        if Self::is_expired(day, today, &settings.config) {
            return None;
        }

        let (leaderboard, created) = match self.leaderboards.entry(key.on_day(day)) {
            Entry::Occupied(occupied) => {
                let leaderboard = occupied.get().leaderboard.clone();
                leaderboard.touch();
                (leaderboard, false)
            }
            Entry::Vacant(vacant) => {
                let leaderboard = Arc::new(DailyLeaderboard::new(vacant.key().clone(), self.clock.clone()));
                vacant.insert(Resident {
                    leaderboard: leaderboard.clone(),
                    generation: self.generation.fetch_add(1, Ordering::SeqCst)
                });
                (leaderboard, true)
            }
        };

        if created {
            debug!(key = %leaderboard.key(), "Created daily leaderboard");
            self.sweep_expired(settings);
            self.evict_over_capacity(settings.config.daily_leaderboard_cache_size);
        }

        Some(leaderboard)
    }

    /// Looks up an existing leaderboard without creating one. Expired
    /// leaderboards found here are dropped on the spot; days that cannot be
    /// represented count as expired.
    pub fn get(
        &self,
        key: &CompetitionKey,
        day: DaySelector,
        settings: &LeaderboardSettings
    ) -> Option<Arc<DailyLeaderboard>> {
        if !Self::accepts(key, settings) {
            return None;
        }

        let boundary = &settings.boundary;
        let today = boundary.current_day(self.clock.as_ref())?;
        let daily_key = key.on_day(day.resolve(boundary, self.clock.as_ref())?);

        if Self::is_expired(daily_key.day, today, &settings.config) {
            if self.leaderboards.remove(&daily_key).is_some() {
                debug!(key = %daily_key, "Expired daily leaderboard on access");
            }
            return None;
        }

        self.leaderboards.get(&daily_key).map(|resident| {
            resident.leaderboard.touch();
            resident.leaderboard.clone()
        })
    }

    /// Every resident leaderboard at this moment, with its creation order.
    fn snapshot(&self) -> Vec<(u64, Arc<DailyLeaderboard>)> {
        self.leaderboards
            .iter()
            .map(|resident| (resident.generation, resident.leaderboard.clone()))
            .collect()
    }

    pub fn leaderboards(&self) -> Vec<Arc<DailyLeaderboard>> {
        self.snapshot().into_iter().map(|(_, leaderboard)| leaderboard).collect()
    }

    /// Removes `leaderboard` if it is still the resident instance for its key.
    fn detach(&self, leaderboard: &Arc<DailyLeaderboard>) -> bool {
        self.leaderboards
            .remove_if(leaderboard.key(), |_, resident| Arc::ptr_eq(&resident.leaderboard, leaderboard))
            .is_some()
    }

    fn evict_over_capacity(&self, capacity: usize) {
        if self.len() <= capacity {
            return;
        }

        let _eviction = self.eviction.lock().unwrap_or_else(PoisonError::into_inner);
        while self.len() > capacity {
            let victim = self
                .snapshot()
                .into_iter()
                .min_by_key(|(generation, lb)| (lb.last_access(), lb.created_at(), *generation));

            let Some((_, victim)) = victim else {
                break;
            };

            if self.detach(&victim) {
                info!(key = %victim.key(), capacity, "Evicted least recently used daily leaderboard");
            }
        }
    }

    /// Removes the user from every resident leaderboard, returning how many
    /// entries were dropped. Safe to repeat.
    pub fn purge_user(&self, uid: &str) -> usize {
        let removed = self
            .leaderboards()
            .iter()
            .filter(|leaderboard| leaderboard.remove_user(uid).is_some())
            .count();

        if removed > 0 {
            info!(uid, removed, "Purged user from daily leaderboards");
        }

        removed
    }

    /// Drops every leaderboard whose day has fallen out of the retention
    /// window, returning how many went.
    pub fn sweep_expired(&self, settings: &LeaderboardSettings) -> usize {
        let Some(today) = settings.boundary.current_day(self.clock.as_ref()) else {
            return 0;
        };

        let mut expired = 0;
        self.leaderboards.retain(|key, _| {
            let keep = !Self::is_expired(key.day, today, &settings.config);
            if !keep {
                expired += 1;
            }
            keep
        });

        if expired > 0 {
            debug!(expired, "Swept expired daily leaderboards");
        }

        expired
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::DailyLeaderboardRegistry;
    use crate::{
        config::LeaderboardSettings,
        model::structures::{competition_key::CompetitionKey, day_selector::DaySelector},
        utils::{
            test_utils::{english_time_60, generate_config, generate_entry, generate_mode_rule},
            time::{ManualClock, MILLISECONDS_IN_DAY}
        }
    };

    const DAY: i64 = 19_000 * MILLISECONDS_IN_DAY;

    fn setup() -> (Arc<ManualClock>, DailyLeaderboardRegistry, LeaderboardSettings) {
        let clock = Arc::new(ManualClock::new(DAY + 1_000));
        let registry = DailyLeaderboardRegistry::new(clock.clone());

        (clock, registry, LeaderboardSettings::new(generate_config()))
    }

    #[test]
    fn test_get_or_create_returns_same_instance() {
        let (_, registry, settings) = setup();

        let first = registry.get_or_create(&english_time_60(), DAY + 5, &settings).unwrap();
        let second = registry.get_or_create(&english_time_60(), DAY + 50_000, &settings).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.key().day, DAY);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_ineligible_key_gets_nothing() {
        let (_, registry, settings) = setup();
        let key = CompetitionKey::new("english", "time", "600");

        assert!(registry.get_or_create(&key, DAY, &settings).is_none());
        assert!(registry.get(&key, DaySelector::Current, &settings).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_disabled_gets_nothing() {
        let (_, registry, _) = setup();
        let mut config = generate_config();
        config.enabled = false;
        let settings = LeaderboardSettings::new(config);

        assert!(registry.get_or_create(&english_time_60(), DAY, &settings).is_none());
    }

    #[test]
    fn test_get_does_not_create() {
        let (_, registry, settings) = setup();

        assert!(registry.get(&english_time_60(), DaySelector::Current, &settings).is_none());
        assert!(registry.is_empty());

        let created = registry.get_or_create(&english_time_60(), DAY, &settings).unwrap();
        let found = registry.get(&english_time_60(), DaySelector::Current, &settings).unwrap();
        assert!(Arc::ptr_eq(&created, &found));
    }

    #[test]
    fn test_days_before_reads_past_day() {
        let (clock, registry, settings) = setup();
        let yesterday = registry.get_or_create(&english_time_60(), DAY, &settings).unwrap();
        clock.advance_days(1);

        let found = registry.get(&english_time_60(), DaySelector::DaysBefore(1), &settings).unwrap();
        assert!(Arc::ptr_eq(&yesterday, &found));
        assert!(registry.get(&english_time_60(), DaySelector::Current, &settings).is_none());
    }

    #[test]
    fn test_expires_after_retention() {
        let (clock, registry, settings) = setup();
        registry.get_or_create(&english_time_60(), DAY, &settings).unwrap();

        // retention is one day: still readable the day after
        clock.advance_days(1);
        assert!(registry.get(&english_time_60(), DaySelector::At(DAY), &settings).is_some());

        clock.advance_days(1);
        assert!(registry.get(&english_time_60(), DaySelector::At(DAY), &settings).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_expired_day_is_not_created() {
        let (_, registry, settings) = setup();

        assert!(registry
            .get_or_create(&english_time_60(), DAY - 2 * MILLISECONDS_IN_DAY, &settings)
            .is_none());
        assert!(registry
            .get_or_create(&english_time_60(), DAY - MILLISECONDS_IN_DAY, &settings)
            .is_some());
    }

    #[test]
    fn test_sweep_expired() {
        let (clock, registry, settings) = setup();
        registry.get_or_create(&english_time_60(), DAY, &settings).unwrap();
        registry
            .get_or_create(&CompetitionKey::new("spanish", "time", "15"), DAY, &settings)
            .unwrap();

        clock.advance_days(1);
        assert_eq!(registry.sweep_expired(&settings), 0);

        clock.advance_days(1);
        assert_eq!(registry.sweep_expired(&settings), 2);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let (clock, registry, settings) = setup();
        let keys = [
            CompetitionKey::new("english", "time", "15"),
            CompetitionKey::new("english", "time", "60"),
            CompetitionKey::new("spanish", "time", "15"),
            CompetitionKey::new("spanish", "time", "60")
        ];

        for key in &keys[..3] {
            registry.get_or_create(key, DAY, &settings).unwrap();
            clock.advance_ms(10);
        }

        // Reading the oldest makes the second one least recently used
        registry.get(&keys[0], DaySelector::Current, &settings).unwrap();
        clock.advance_ms(10);

        registry.get_or_create(&keys[3], DAY, &settings).unwrap();

        assert_eq!(registry.len(), settings.config.daily_leaderboard_cache_size);
        assert!(registry.get(&keys[1], DaySelector::Current, &settings).is_none());
        assert!(registry.get(&keys[0], DaySelector::Current, &settings).is_some());
        assert!(registry.get(&keys[3], DaySelector::Current, &settings).is_some());
    }

    #[test]
    fn test_eviction_ties_go_to_oldest() {
        let (_, registry, settings) = setup();
        let keys = [
            CompetitionKey::new("english", "time", "15"),
            CompetitionKey::new("english", "time", "60"),
            CompetitionKey::new("spanish", "time", "15"),
            CompetitionKey::new("spanish", "time", "60")
        ];

        // The clock never moves, so every timestamp ties
        for key in &keys {
            registry.get_or_create(key, DAY, &settings).unwrap();
        }

        assert_eq!(registry.len(), 3);
        assert!(registry.get(&keys[0], DaySelector::Current, &settings).is_none());
    }

    #[test]
    fn test_evicted_instance_stays_usable() {
        let (clock, registry, _) = setup();
        let mut config = generate_config();
        config.daily_leaderboard_cache_size = 1;
        let settings = LeaderboardSettings::new(config);

        let held = registry.get_or_create(&english_time_60(), DAY, &settings).unwrap();
        clock.advance_ms(10);
        registry
            .get_or_create(&CompetitionKey::new("spanish", "time", "15"), DAY, &settings)
            .unwrap();

        assert!(registry.get(&english_time_60(), DaySelector::Current, &settings).is_none());
        held.add_or_update_entry(generate_entry("a", 100.0, 100.0, DAY));
        assert_eq!(held.get_rank("a", &settings.config).unwrap().rank, 1);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let (_, registry, _) = setup();
        let mut config = generate_config();
        config.daily_leaderboard_cache_size = 0;
        let settings = LeaderboardSettings::new(config);

        let detached = registry.get_or_create(&english_time_60(), DAY, &settings).unwrap();

        assert!(registry.is_empty());
        assert_eq!(detached.count(), 0);
    }

    #[test]
    fn test_purge_user_is_idempotent() {
        let (_, registry, settings) = setup();
        let keys = [english_time_60(), CompetitionKey::new("spanish", "time", "15")];
        for key in &keys {
            let lb = registry.get_or_create(key, DAY, &settings).unwrap();
            lb.add_or_update_entry(generate_entry("a", 90.0, 95.0, DAY));
            lb.add_or_update_entry(generate_entry("b", 80.0, 95.0, DAY));
        }

        assert_eq!(registry.purge_user("a"), 2);
        assert_eq!(registry.purge_user("a"), 0);
        assert_eq!(registry.purge_user("nobody"), 0);

        for key in &keys {
            let lb = registry.get(key, DaySelector::Current, &settings).unwrap();
            assert!(lb.get_rank("a", &settings.config).is_none());
            assert_eq!(lb.get_rank("b", &settings.config).unwrap().rank, 1);
        }
    }

    #[test]
    fn test_clear() {
        let (_, registry, settings) = setup();
        registry.get_or_create(&english_time_60(), DAY, &settings).unwrap();

        registry.clear();

        assert!(registry.is_empty());
        assert!(registry.get(&english_time_60(), DaySelector::Current, &settings).is_none());
    }

    #[test]
    fn test_rule_change_applies_to_existing_instances() {
        let (_, registry, settings) = setup();
        registry.get_or_create(&english_time_60(), DAY, &settings).unwrap();

        let mut config = generate_config();
        config.valid_mode_rules = vec![generate_mode_rule("spanish", "time", "60")];
        let narrowed = LeaderboardSettings::new(config);

        assert!(registry.get(&english_time_60(), DaySelector::Current, &narrowed).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_case_variants_share_instance() {
        let (_, registry, settings) = setup();

        let lower = registry.get_or_create(&english_time_60(), DAY, &settings).unwrap();
        let mixed = registry
            .get_or_create(&CompetitionKey::new("English", "TIME", "60"), DAY, &settings)
            .unwrap();
        let raw = CompetitionKey {
            language: "ENGLISH".to_string(),
            mode: "Time".to_string(),
            mode2: "60".to_string()
        };
        let found = registry.get(&raw, DaySelector::Current, &settings).unwrap();

        assert!(Arc::ptr_eq(&lower, &mixed));
        assert!(Arc::ptr_eq(&lower, &found));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unrepresentable_day_is_absent() {
        let (_, registry, settings) = setup();
        registry.get_or_create(&english_time_60(), DAY, &settings).unwrap();

        assert!(registry.get(&english_time_60(), DaySelector::At(i64::MIN), &settings).is_none());
        assert!(registry.get(&english_time_60(), DaySelector::At(i64::MAX), &settings).is_none());
        assert!(registry.get_or_create(&english_time_60(), i64::MIN, &settings).is_none());
        assert!(registry.get_or_create(&english_time_60(), i64::MAX, &settings).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_leaderboards_snapshot() {
        let (_, registry, settings) = setup();

        registry.get_or_create(&english_time_60(), DAY, &settings).unwrap();
        registry
            .get_or_create(&CompetitionKey::new("spanish", "time", "60"), DAY, &settings)
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.leaderboards().len(), 2);
    }
}
