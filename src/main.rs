use std::{fs, sync::Arc, time::Duration};

use clap::Parser;
use daily_leaderboards::{
    api::{api_structs::ScoreSubmission, LeaderboardService},
    args::Args,
    config::{ConfigError, DailyLeaderboardsConfig, LeaderboardSettings},
    database::InMemoryAllTimeLeaderboard,
    model::{
        constants::DEFAULT_SWEEP_INTERVAL_SECS,
        registry::DailyLeaderboardRegistry,
        structures::{competition_key::CompetitionKey, day_selector::DaySelector, leaderboard_query::LeaderboardQuery},
        sweeper::spawn_expiration_sweeper
    },
    utils::{progress_utils::progress_bar, time::SystemClock}
};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
enum ReplayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to read submissions: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse submissions: {0}")]
    Parse(#[from] serde_json::Error)
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level))
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), ReplayError> {
    let config = DailyLeaderboardsConfig::from_file(&args.config)?;
    let settings = LeaderboardSettings::new(config);
    let registry = Arc::new(DailyLeaderboardRegistry::initialize(&settings, Arc::new(SystemClock)));
    let service = LeaderboardService::new(registry.clone(), Arc::new(InMemoryAllTimeLeaderboard::new()), settings);
    let sweeper = spawn_expiration_sweeper(
        registry,
        service.shared_settings(),
        Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS)
    );

    let submissions: Vec<ScoreSubmission> = serde_json::from_str(&fs::read_to_string(&args.submissions)?)?;
    info!(count = submissions.len(), "Replaying submissions");

    let bar = progress_bar(submissions.len() as u64, "Replaying submissions".to_string());
    let mut recorded = 0;
    for submission in submissions {
        if service.record_result(submission).is_some_and(|outcome| outcome.changed()) {
            recorded += 1;
        }
        bar.inc(1);
    }
    bar.finish_and_clear();
    info!(recorded, "Replay finished");

    let key = CompetitionKey::new(args.language, args.mode, args.mode2);
    match service.daily_results(&key, DaySelector::Current, 0, Some(args.limit)) {
        LeaderboardQuery::Available(results) => println!("{}", serde_json::to_string_pretty(&results)?),
        LeaderboardQuery::NotFound => warn!(key = %key, "There is no daily leaderboard for this mode"),
        LeaderboardQuery::Rebuilding => warn!(key = %key, "Leaderboard is currently updating")
    }

    sweeper.abort();
    Ok(())
}
