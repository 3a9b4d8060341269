//! Load driver for the benchmark harness.
//!
//! Hits each selected harness endpoint `rounds` times in sequence and logs the observed
//! latency per endpoint. The harness always answers 200, so non-200 statuses point at the
//! deployment rather than the store.

use clap::Parser;
use std::time::{Duration, Instant};

use datastore_bench::bench::Operation;
use datastore_bench::context::REQUEST_ID_HEADER;
use datastore_bench::logging::{LoggingConfig, init_logging};

#[derive(Parser, Debug)]
#[command(name = "bench-driver", version, about, long_about = None)]
struct Args {
    /// Base URL of the harness node
    #[arg(long, env = "BENCH_TARGET", default_value = "http://127.0.0.1:8080")]
    target: String,

    /// Requests per endpoint
    #[arg(long, env = "BENCH_ROUNDS", default_value_t = 5)]
    rounds: usize,

    /// Endpoints to call, comma separated (defaults to all seven, writes first)
    #[arg(long, value_delimiter = ',')]
    paths: Vec<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Emit JSON log lines
    #[arg(long)]
    log_json: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct LatencySummary {
    samples: usize,
    min: Duration,
    mean: Duration,
    max: Duration,
}

fn summarize(samples: &[Duration]) -> Option<LatencySummary> {
    let min = *samples.iter().min()?;
    let max = *samples.iter().max()?;
    let total: Duration = samples.iter().sum();
    Some(LatencySummary {
        samples: samples.len(),
        min,
        mean: total / samples.len() as u32,
        max,
    })
}

fn resolve_target(raw: &str) -> String {
    let trimmed = raw.trim();
    let normalized = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    normalized.trim_end_matches('/').to_string()
}

fn selected_paths(requested: &[String]) -> Vec<String> {
    if requested.is_empty() {
        return Operation::ALL
            .iter()
            .map(|operation| operation.path().to_string())
            .collect();
    }

    requested
        .iter()
        .map(|path| path.trim())
        .filter(|path| !path.is_empty())
        .map(|path| {
            if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{}", path)
            }
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(if args.log_json {
        LoggingConfig::json()
    } else {
        LoggingConfig::default()
    });

    let target = resolve_target(&args.target);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()?;

    tracing::info!("Driving {} ({} rounds per endpoint)", target, args.rounds);

    for path in selected_paths(&args.paths) {
        let mut samples = Vec::with_capacity(args.rounds);

        for round in 0..args.rounds {
            let started = Instant::now();
            let response = client
                .get(format!("{}{}", target, path))
                .header(REQUEST_ID_HEADER, format!("driver{}-{}", path.replace('/', "-"), round))
                .send()
                .await;
            let elapsed = started.elapsed();

            match response {
                Ok(resp) if resp.status().is_success() => samples.push(elapsed),
                Ok(resp) => {
                    tracing::warn!("{} round {} answered {}", path, round, resp.status());
                }
                Err(e) => {
                    tracing::error!("{} round {} failed: {}", path, round, e);
                }
            }
        }

        match summarize(&samples) {
            Some(summary) => tracing::info!(
                path = %path,
                samples = summary.samples,
                min_ms = summary.min.as_secs_f64() * 1000.0,
                mean_ms = summary.mean.as_secs_f64() * 1000.0,
                max_ms = summary.max.as_secs_f64() * 1000.0,
                "latency"
            ),
            None => tracing::warn!(path = %path, "no successful samples"),
        }
    }

    Ok(())
}
