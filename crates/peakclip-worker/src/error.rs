//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Captioner returned {actual} segments for {expected}")]
    CaptionCountMismatch { expected: usize, actual: usize },

    #[error("Segment {index} has no caption")]
    MissingCaption { index: usize },

    #[error("Media error: {0}")]
    Media(#[from] peakclip_media::MediaError),

    #[error("Caption service error: {0}")]
    Caption(#[from] peakclip_caption_client::CaptionError),

    #[error("Storage error: {0}")]
    Storage(#[from] peakclip_storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
