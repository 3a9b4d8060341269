//! Store Module
//!
//! The key-value document store the harness benchmarks against, behind the `Store` trait.
//!
//! ## Core Concepts
//! - **Records**: The single entity kind (`name`, `value`, `created_at`, `updated_at`),
//!   addressed by a `Key` of `(kind, name)`.
//! - **Backends**: `MemoryStore` keeps records in-process (optionally simulating a network
//!   round trip). `RemoteStore` reaches a peer node's memory store over HTTP.
//! - **Serving**: `handlers` exposes a `MemoryStore` on internal endpoints so that another
//!   harness instance can use it as a remote backend.

pub mod error;
pub mod handlers;
pub mod memory;
pub mod protocol;
pub mod remote;
pub mod traits;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use remote::RemoteStore;
pub use traits::Store;
pub use types::{Key, Record};

#[cfg(test)]
mod tests;
