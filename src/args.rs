use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Clone)]
#[command(
    display_name = "Daily Leaderboards",
    long_about = "Replays test results through the daily leaderboard engine and prints the resulting standings"
)]
pub struct Args {
    /// JSON document holding the `dailyLeaderboards` configuration section
    #[arg(short, long, env = "DAILY_LEADERBOARDS_CONFIG", help = "Path to the daily leaderboards configuration")]
    pub config: PathBuf,

    /// JSON array of finished tests, each with language, mode, mode2 and the
    /// leaderboard entry fields (uid, name, wpm, raw, acc, consistency, timestamp)
    #[arg(short, long, help = "Path to the results to replay")]
    pub submissions: PathBuf,

    #[arg(long, default_value = "english")]
    pub language: String,

    #[arg(long, default_value = "time")]
    pub mode: String,

    #[arg(long, default_value = "60")]
    pub mode2: String,

    /// Places to print, starting from first
    #[arg(long, default_value_t = 50)]
    pub limit: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        env = "RUST_LOG",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        help = "Sets the logging verbosity"
    )]
    pub log_level: String
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from([
            "daily-leaderboards",
            "--config",
            "config.json",
            "--submissions",
            "results.json",
            "--log-level",
            "warn"
        ])
        .unwrap();

        assert_eq!(args.language, "english");
        assert_eq!(args.mode, "time");
        assert_eq!(args.mode2, "60");
        assert_eq!(args.limit, 50);
        assert_eq!(args.log_level, "warn");
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let result = Args::try_parse_from([
            "daily-leaderboards",
            "--config",
            "config.json",
            "--submissions",
            "results.json",
            "--log-level",
            "verbose"
        ]);

        assert!(result.is_err());
    }
}
