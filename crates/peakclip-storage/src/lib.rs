//! Local Output Store.
//!
//! This crate provides:
//! - Temp and final artifact paths under the output directory
//! - Public URLs matching the static file prefix
//! - Listing of a job's final clips
//! - Best-effort artifact deletion
//! - The status resolver used by `GET /status/{job_id}`

pub mod error;
pub mod resolver;
pub mod store;

pub use error::{StorageError, StorageResult};
pub use resolver::StatusResolver;
pub use store::{remove_best_effort, OutputStore, StoreConfig};
