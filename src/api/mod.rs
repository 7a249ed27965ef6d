pub mod api_structs;

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    config::{ConfigError, DailyLeaderboardsConfig, LeaderboardSettings, SharedSettings},
    database::AllTimeRankGateway,
    model::{
        constants::{
            ALL_TIME_PAGE_LIMIT, DEFAULT_PAGE_LIMIT, PROFILE_LANGUAGE, PROFILE_MODE, PROFILE_MODE2_LONG,
            PROFILE_MODE2_SHORT
        },
        registry::DailyLeaderboardRegistry,
        structures::{
            account_event::AccountEvent,
            competition_key::CompetitionKey,
            day_selector::DaySelector,
            insert_outcome::InsertOutcome,
            leaderboard_entry::RankedEntry,
            leaderboard_query::LeaderboardQuery
        }
    }
};

use self::api_structs::{AllTimeRanks, ScoreSubmission};

/// Entry point for request handlers. Daily and all-time reads share one
/// result shape so handlers translate both the same way: `NotFound` to a
/// 404, `Rebuilding` to a 503.
pub struct LeaderboardService {
    daily: Arc<DailyLeaderboardRegistry>,
    all_time: Arc<dyn AllTimeRankGateway>,
    settings: SharedSettings
}

impl LeaderboardService {
    pub fn new(
        daily: Arc<DailyLeaderboardRegistry>,
        all_time: Arc<dyn AllTimeRankGateway>,
        settings: LeaderboardSettings
    ) -> LeaderboardService {
        LeaderboardService {
            daily,
            all_time,
            settings: SharedSettings::new(settings)
        }
    }

    pub fn registry(&self) -> &Arc<DailyLeaderboardRegistry> {
        &self.daily
    }

    /// The configuration snapshot requests currently run against.
    pub fn settings(&self) -> Arc<LeaderboardSettings> {
        self.settings.current()
    }

    /// Handle for background work that must follow [`reload`](Self::reload).
    pub fn shared_settings(&self) -> SharedSettings {
        self.settings.clone()
    }

    /// Validates and installs a new configuration. Requests already running
    /// finish on the snapshot they started with.
    pub fn reload(&self, config: DailyLeaderboardsConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.settings.replace(LeaderboardSettings::new(config));
        info!("Daily leaderboard configuration reloaded");

        Ok(())
    }

    /// Routes a finished test to today's leaderboard for its mode. `None`
    /// when no daily leaderboard applies to it.
    pub fn record_result(&self, submission: ScoreSubmission) -> Option<InsertOutcome> {
        if !submission.is_rankable() {
            debug!(uid = %submission.entry.uid, "Skipping unrankable result");
            return None;
        }

        let settings = self.settings();
        let key = submission.competition_key();
        let now = self.daily.clock().now_ms();
        let leaderboard = self.daily.get_or_create(&key, now, &settings)?;

        let outcome = leaderboard.add_or_update_entry(submission.entry);
        debug!(key = %leaderboard.key(), %outcome, "Recorded daily result");

        Some(outcome)
    }

    /// A page of a daily leaderboard: `limit` places after the first `skip`.
    pub fn daily_results(
        &self,
        key: &CompetitionKey,
        day: DaySelector,
        skip: u32,
        limit: Option<u32>
    ) -> LeaderboardQuery<Vec<RankedEntry>> {
        let settings = self.settings();
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);

        LeaderboardQuery::from_option(self.daily.get(key, day, &settings)).map(|leaderboard| {
            if limit == 0 {
                return Vec::new();
            }

            leaderboard.get_results(
                skip.saturating_add(1),
                skip.saturating_add(limit),
                &settings.config
            )
        })
    }

    /// `Available(None)` when the leaderboard exists but the user has no entry.
    pub fn daily_rank(&self, key: &CompetitionKey, day: DaySelector, uid: &str) -> LeaderboardQuery<Option<RankedEntry>> {
        let settings = self.settings();

        LeaderboardQuery::from_option(self.daily.get(key, day, &settings))
            .map(|leaderboard| leaderboard.get_rank(uid, &settings.config))
    }

    pub fn all_time_results(
        &self,
        key: &CompetitionKey,
        skip: u32,
        limit: Option<u32>
    ) -> LeaderboardQuery<Vec<RankedEntry>> {
        let limit = limit.unwrap_or(ALL_TIME_PAGE_LIMIT).min(ALL_TIME_PAGE_LIMIT);

        self.all_time.get_leaderboard(key, skip, limit)
    }

    pub fn all_time_rank(&self, key: &CompetitionKey, uid: &str) -> LeaderboardQuery<Option<RankedEntry>> {
        self.all_time.get_rank(key, uid)
    }

    /// The user's english time 15 and time 60 all-time places. A leaderboard
    /// that is missing or rebuilding leaves its slot empty.
    pub fn profile_all_time_ranks(&self, uid: &str) -> AllTimeRanks {
        let rank_on = |mode2: &str| {
            let key = CompetitionKey::new(PROFILE_LANGUAGE, PROFILE_MODE, mode2);
            self.all_time_rank(&key, uid).flatten().available().map(|ranked| ranked.rank)
        };

        AllTimeRanks {
            time15_english: rank_on(PROFILE_MODE2_SHORT),
            time60_english: rank_on(PROFILE_MODE2_LONG)
        }
    }

    /// Drops the user's leaderboard standing after an account change.
    /// Returns the number of entries removed; repeating the call removes
    /// nothing more.
    pub fn handle_account_event(&self, event: AccountEvent, uid: &str) -> usize {
        let mut removed = self.daily.purge_user(uid);
        if event.clears_all_time() {
            removed += self.all_time.remove_user(uid);
        }

        info!(%event, uid, removed, "Handled account event");
        removed
    }
}
