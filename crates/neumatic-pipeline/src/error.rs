//! Error types for the recognition pipeline.
//!
//! Load-time failures (model, metadata, input image) are fatal and propagate.
//! Per-page anomalies (an unclassifiable contour, a page with no baselines)
//! are absorbed and logged by the stage that encounters them.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Classifier or metadata failure, fatal at load, per-glyph at runtime
    #[error("ocr error: {0}")]
    Ocr(#[from] neumatic_ocr::OcrError),

    /// The shared classifier lock was poisoned by a panicking worker
    #[error("classifier lock poisoned by a failed page worker")]
    ClassifierPoisoned,

    /// Input image could not be decoded
    #[error("failed to read input image: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to serialize analysis: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
