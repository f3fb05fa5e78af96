//! statlog-core library.
//!
//! Status history for managed units, machines and containers: the record
//! model, query filters, bounded sliding windows and cycle squashing.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums for the primitives, `anyhow::Result` for
//!   config loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod squash;
pub mod store;
pub mod window;

pub use error::{ErrorCode, HistoryError};
pub use filter::{FilterError, StatusHistoryFilter};
pub use model::{History, HistoryKind, ParseEnumError, Status, StatusRecord};
pub use squash::{squash, squash_at};
pub use store::{InstanceStatusHistoryGetter, MemoryHistoryStore, StatusHistoryGetter, StoreError};
pub use window::{SlidingWindow, shift_push};
