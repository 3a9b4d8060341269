//! Fan-Out Batch Executor Module
//!
//! Drives N store operations per HTTP request using one of three access strategies and
//! reports every outcome to the log. Handlers always answer `200 OK` with an empty body:
//! the harness measures latency, not correctness.
//!
//! ## Submodules
//! - **`types`**: Access modes, strategies and the `Operation` each endpoint triggers.
//! - **`executor`**: The `FanOutExecutor` (serial loop, `JoinSet` fan-out, single batch call).
//! - **`router`**: The `RouteTable` built once at startup and turned into an axum `Router`.
//! - **`handlers`**: HTTP handlers bridging requests to the executor.
//! - **`error`**: `StoreOperationFailed`, the only failure the harness logs.

pub mod error;
pub mod executor;
pub mod handlers;
pub mod router;
pub mod types;

pub use executor::{FanOutExecutor, FanOutSettings};
pub use router::{RouteTable, build_router};
pub use types::{Mode, Operation, Strategy};
