//! Harness configuration.
//!
//! Every setting is a command-line flag with a `BENCH_*` environment variable fallback.
//!
//! ```bash
//! # In-memory store with a simulated 5 ms round trip, also served to peers
//! datastore-bench --bind 0.0.0.0:8080 --simulated-latency-ms 5 --serve-store
//!
//! # Benchmark against a peer node's store
//! BENCH_STORE=remote BENCH_STORE_URL=http://10.0.0.2:8080 datastore-bench
//! ```

use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

use crate::bench::FanOutSettings;
use crate::logging::LoggingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackend {
    /// Records kept in this process.
    Memory,
    /// Records kept by a peer node reached over HTTP.
    Remote,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("record count must be at least 1")]
    ZeroRecords,

    #[error("--store-url is required with --store remote")]
    MissingStoreUrl,

    #[error("--serve-store is only available with --store memory")]
    ServeStoreRequiresMemory,
}

/// Datastore access-pattern benchmark harness.
#[derive(Parser, Debug, Clone)]
#[command(name = "datastore-bench", version, about, long_about = None)]
pub struct Args {
    /// Address the HTTP server listens on
    #[arg(long, env = "BENCH_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Records read or written per request
    #[arg(long, env = "BENCH_RECORD_COUNT", default_value_t = 50)]
    pub record_count: usize,

    /// Entity kind records are stored under
    #[arg(long, env = "BENCH_KIND", default_value = "data")]
    pub kind: String,

    /// Abort parallel fan-out tasks still running after this many milliseconds
    #[arg(long, env = "BENCH_FAN_OUT_DEADLINE_MS")]
    pub fan_out_deadline_ms: Option<u64>,

    /// Store backend
    #[arg(long, value_enum, env = "BENCH_STORE", default_value_t = StoreBackend::Memory)]
    pub store: StoreBackend,

    /// Base URL of the peer node serving its store (remote backend)
    #[arg(long, env = "BENCH_STORE_URL")]
    pub store_url: Option<String>,

    /// Per-call timeout for the remote backend, in milliseconds
    #[arg(long, env = "BENCH_STORE_TIMEOUT_MS", default_value_t = 5000)]
    pub store_timeout_ms: u64,

    /// Simulated round trip added to every in-memory store call, in milliseconds
    #[arg(long, env = "BENCH_SIMULATED_LATENCY_MS", default_value_t = 0)]
    pub simulated_latency_ms: u64,

    /// Also expose the in-memory store on the internal store endpoints
    #[arg(long, env = "BENCH_SERVE_STORE")]
    pub serve_store: bool,

    /// Emit JSON log lines
    #[arg(long, env = "BENCH_LOG_JSON")]
    pub log_json: bool,
}

impl Args {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.record_count == 0 {
            return Err(ConfigError::ZeroRecords);
        }
        if self.store == StoreBackend::Remote {
            if self.store_url.as_deref().map_or(true, |url| url.trim().is_empty()) {
                return Err(ConfigError::MissingStoreUrl);
            }
            if self.serve_store {
                return Err(ConfigError::ServeStoreRequiresMemory);
            }
        }
        Ok(())
    }

    pub fn fan_out_settings(&self) -> FanOutSettings {
        FanOutSettings {
            record_count: self.record_count,
            kind: self.kind.clone(),
            deadline: self.fan_out_deadline_ms.map(Duration::from_millis),
        }
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }

    pub fn logging(&self) -> LoggingConfig {
        if self.log_json {
            LoggingConfig::json()
        } else {
            LoggingConfig::default()
        }
    }
}
