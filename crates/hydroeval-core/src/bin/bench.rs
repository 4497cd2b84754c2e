/// Benchmarks for the metric kernels and the dispatcher.
///
/// Uses std::time::Instant for timing, a deterministic LCG PRNG for data generation,
/// and std::hint::black_box to prevent dead-code elimination.
///
/// Built with `--features bench`. Set `RUST_LOG=hydroeval_core=debug` to see
/// the library's diagnostics.
use std::hint::black_box;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

use hydroeval_core::metrics::{fdc_fhv, fdc_flv, fdc_fms, kge, mean_peak_timing, nse};
use hydroeval_core::{calculate_all_metrics, Resolution, TimeSeries};

const REPEATS: usize = 7;

/// Synthetic daily observed/simulated discharge pair.
///
/// Observations are a seasonal baseflow with random storm events; the
/// simulation is the observation with multiplicative noise and a one-day lag.
fn make_pair(n: usize, seed: u64) -> (TimeSeries, TimeSeries) {
    let mut state = seed;
    let mut next_f64 = || -> f64 {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as f64 / (1u64 << 31) as f64
    };

    let mut obs = Vec::with_capacity(n);
    let mut storm = 0.0;
    for t in 0..n {
        let season = 2.0 + (t as f64 * std::f64::consts::TAU / 365.25).sin();
        if next_f64() < 0.03 {
            storm += 5.0 + next_f64() * 40.0;
        }
        storm *= 0.7;
        obs.push(season + storm);
    }
    let sim: Vec<f64> = (0..n)
        .map(|t| obs[t.saturating_sub(1)] * (0.8 + next_f64() * 0.4))
        .collect();

    let start = NaiveDate::from_ymd_opt(1980, 1, 1).expect("valid start date");
    (
        TimeSeries::daily(start, obs).expect("synthetic series is ordered"),
        TimeSeries::daily(start, sim).expect("synthetic series is ordered"),
    )
}

/// Run a closure `REPEATS` times, return the median duration.
fn median_time<F: FnMut()>(mut f: F) -> Duration {
    let mut times: Vec<Duration> = (0..REPEATS)
        .map(|_| {
            let start = Instant::now();
            f();
            start.elapsed()
        })
        .collect();
    times.sort();
    times[REPEATS / 2]
}

fn bench<F: FnMut()>(name: &'static str, n: usize, mut f: F) -> (&'static str, usize, Duration) {
    // Warmup
    f();
    (name, n, median_time(f))
}

fn bench_sizes(sizes: &[usize]) -> Vec<(&'static str, usize, Duration)> {
    let mut results = Vec::new();
    let daily = Resolution::DAILY;

    for &n in sizes {
        let (obs, sim) = make_pair(n, 42);

        results.push(bench("nse", n, || {
            black_box(nse(&obs, &sim).ok());
        }));
        results.push(bench("kge", n, || {
            black_box(kge(&obs, &sim, &[1.0, 1.0, 1.0]).ok());
        }));
        results.push(bench("fdc (fhv+fms+flv)", n, || {
            black_box(fdc_fhv(&obs, &sim, 0.02).ok());
            black_box(fdc_fms(&obs, &sim, 0.2, 0.7).ok());
            black_box(fdc_flv(&obs, &sim, 0.3).ok());
        }));
        results.push(bench("peak timing", n, || {
            black_box(mean_peak_timing(&obs, &sim, None, &daily, None).ok());
        }));
        results.push(bench("all metrics", n, || {
            black_box(calculate_all_metrics(&obs, &sim, &daily, None).ok());
        }));
    }
    results
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    println!("Metric Benchmarks");
    println!("============================================================");
    println!("{:<18} {:>6}   {:>12}", "Metric", "N", "Median (ms)");
    println!("--------------------------------------------");

    // one decade and one century of daily data
    for (metric, n, dur) in bench_sizes(&[3650, 36500]) {
        let ms = dur.as_secs_f64() * 1000.0;
        println!("{:<18} {:>6}      {:>8.2}", metric, n, ms);
    }

    println!("============================================================");
}
