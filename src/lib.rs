//! Datastore Access-Pattern Benchmark Harness
//!
//! This library crate holds everything the `datastore-bench` server binary wires together.
//! Each HTTP request to a harness endpoint performs a fixed number of record reads or writes
//! against a key-value document store, using one of three access strategies, and reports
//! the outcome to the log only.
//!
//! ## Modules
//! - **`bench`**: The Fan-Out Batch Executor (serial, parallel and multi-key strategies),
//!   the route table and the HTTP handlers.
//! - **`storage`**: The `Store` trait, the record model, and the in-memory and HTTP-backed
//!   store backends.
//! - **`context`**: The request-scoped handle passed to every executor and store call.
//! - **`config`**: Command-line and environment configuration.
//! - **`logging`**: `tracing-subscriber` setup.

pub mod bench;
pub mod config;
pub mod context;
pub mod logging;
pub mod storage;
