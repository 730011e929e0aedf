//! Client for the caption inference service.
//!
//! The service receives the local path of a downloaded source video and the
//! detected segments, and answers with one caption per segment in the same
//! order.

pub mod client;
pub mod error;
pub mod types;

pub use client::{CaptionClient, CaptionClientConfig};
pub use error::{CaptionError, CaptionResult};
pub use types::{CaptionRequest, CaptionResponse, SegmentWindow};
