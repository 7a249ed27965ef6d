use std::{sync::Arc, time::Duration};

use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::debug;

use crate::{config::SharedSettings, model::registry::DailyLeaderboardRegistry};

/// Periodically drops expired daily leaderboards, using whatever settings
/// are current at each tick. Abort the returned handle to stop sweeping.
pub fn spawn_expiration_sweeper(
    registry: Arc<DailyLeaderboardRegistry>,
    settings: SharedSettings,
    period: Duration
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let expired = registry.sweep_expired(&settings.current());
            debug!(expired, resident = registry.len(), "Expiration sweep finished");
        }
    })
}
