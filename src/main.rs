use clap::Parser;
use std::sync::Arc;

use datastore_bench::bench::{FanOutExecutor, RouteTable, build_router};
use datastore_bench::config::{Args, StoreBackend};
use datastore_bench::logging::init_logging;
use datastore_bench::storage::handlers::store_routes;
use datastore_bench::storage::{MemoryStore, RemoteStore, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.logging());
    args.validate()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting datastore benchmark harness"
    );

    // 1. Store backend:
    let mut served: Option<Arc<MemoryStore>> = None;
    let store: Arc<dyn Store> = match args.store {
        StoreBackend::Memory => {
            let memory = Arc::new(MemoryStore::with_latency(args.simulated_latency()));
            tracing::info!(
                simulated_latency_ms = args.simulated_latency_ms,
                "Using in-memory store"
            );
            if args.serve_store {
                served = Some(memory.clone());
            }
            memory
        }
        StoreBackend::Remote => {
            let url = args
                .store_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("--store-url is required"))?;
            let remote = RemoteStore::new(url, args.store_timeout());
            tracing::info!("Using remote store at {}", remote.base_url());
            Arc::new(remote)
        }
    };

    // 2. Executor:
    let settings = args.fan_out_settings();
    tracing::info!(
        record_count = settings.record_count,
        kind = %settings.kind,
        deadline_ms = ?settings.deadline.map(|d| d.as_millis()),
        "Fan-out executor configured"
    );
    let executor = FanOutExecutor::new(store, settings);

    // 3. HTTP Router:
    let table = RouteTable::standard();
    tracing::info!("Registering {} harness routes", table.len());
    for (path, operation) in table.routes() {
        tracing::info!("  {} -> {:?}/{:?}", path, operation.mode(), operation.strategy());
    }
    let mut app = build_router(&table, executor);
    if let Some(memory) = served {
        tracing::info!("Serving in-memory store on internal endpoints");
        app = app.merge(store_routes(memory));
    }

    // 4. Start HTTP server:
    tracing::info!("HTTP server listening on {}", args.bind);
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
