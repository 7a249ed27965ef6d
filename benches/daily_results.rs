use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use daily_leaderboards::{
    config::LeaderboardSettings,
    model::{entry_store::EntryStore, registry::DailyLeaderboardRegistry, structures::competition_key::CompetitionKey},
    utils::{
        test_utils::{generate_config, generate_entries},
        time::{ManualClock, MILLISECONDS_IN_DAY}
    }
};

pub fn criterion_benchmark(c: &mut Criterion) {
    const TODAY: i64 = 19_737 * MILLISECONDS_IN_DAY;

    for size in [100, 1_000, 10_000] {
        let entries = generate_entries(size, 727);

        c.bench_with_input(BenchmarkId::new("entry_store_insert", size), &entries, |b, entries| {
            b.iter(|| {
                let mut store = EntryStore::new();
                for entry in entries {
                    store.add_or_update(entry.clone());
                }
                store
            });
        });

        let mut config = generate_config();
        config.max_results = 50;
        let settings = LeaderboardSettings::new(config);
        let registry = DailyLeaderboardRegistry::new(Arc::new(ManualClock::new(TODAY)));
        let key = CompetitionKey::new("english", "time", "60");
        let lb = registry.get_or_create(&key, TODAY, &settings).unwrap();
        for entry in entries.iter() {
            lb.add_or_update_entry(entry.clone());
        }

        c.bench_function(&format!("get_results_top_50/{}", size), |b| {
            b.iter(|| lb.get_results(1, 50, &settings.config))
        });

        c.bench_function(&format!("get_rank/{}", size), |b| {
            b.iter(|| lb.get_rank("user0", &settings.config))
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
