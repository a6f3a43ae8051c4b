use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use bracket_sim::tournament::{SimConfig, TournamentSim};
use bracket_sim::{win_probability, Bracket, RatingTable};

fn create_sec_sim() -> TournamentSim {
    let pair = |a: &str, b: &str| (a.to_string(), b.to_string());
    let round = |teams: [&str; 4]| -> Vec<String> { teams.iter().map(|t| t.to_string()).collect() };

    let bracket = Bracket::new(
        vec![
            pair("South Carolina", "Arkansas"),
            pair("Texas", "Vanderbilt"),
            pair("LSU", "Mississippi State"),
            pair("Oklahoma", "Georgia"),
        ],
        vec![
            round(["Ole Miss", "Texas A&M", "Missouri", "Kentucky"]),
            round(["Auburn", "Tennessee", "Florida", "Alabama"]),
        ],
    )
    .unwrap();

    let ratings: RatingTable = bracket
        .participants()
        .into_iter()
        .enumerate()
        .map(|(i, team)| (team.to_string(), 1400.0 + 40.0 * i as f64))
        .collect();

    TournamentSim::new(bracket, ratings).unwrap()
}

fn bench_win_probability(c: &mut Criterion) {
    c.bench_function("win_probability", |b| {
        b.iter(|| win_probability(black_box(1820.0), black_box(1540.0)))
    });
}

fn bench_run_trial(c: &mut Criterion) {
    let sim = create_sec_sim();
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    c.bench_function("run_trial_16_teams", |b| {
        b.iter(|| black_box(sim.run_trial(&mut rng)))
    });
}

fn bench_run_many(c: &mut Criterion) {
    let sim = create_sec_sim();
    let config = SimConfig {
        trials: 1000,
        seed: Some(42),
    };

    c.bench_function("run_many_1000_trials", |b| {
        b.iter(|| sim.run_many(black_box(&config)).unwrap())
    });
}

fn bench_run_many_parallel(c: &mut Criterion) {
    let sim = create_sec_sim();
    let config = SimConfig {
        trials: 1000,
        seed: Some(42),
    };

    c.bench_function("run_many_parallel_1000_trials", |b| {
        b.iter(|| sim.run_many_parallel(black_box(&config)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_win_probability,
    bench_run_trial,
    bench_run_many,
    bench_run_many_parallel
);
criterion_main!(benches);
