//! # Neumatic pipeline
//!
//! Recognition pipeline for Byzantine chant neume notation: takes a scanned
//! page, finds the musical text lines, removes the lyrics, classifies the
//! remaining ink blobs and interprets them into scored elements.
//!
//! Stages, in order:
//!
//! 1. [`segmentation`] — baseline/textline detection and oligon sizing
//! 2. [`text_removal`] — masking of lyric and heading text
//! 3. [`matches`] — contour extraction, glyph crops, line assignment
//! 4. [`grouping`] — base/martyria/kronos group formation
//! 5. [`interpretation`] — neume group to scored element
//!
//! [`executor`] wires the stages together for single pages and parallel
//! batches; [`alignment`] scores recognized output against a reference
//! transcription.
//!
//! ```no_run
//! use neumatic_pipeline::{process_page, AnalysisOptions};
//! use neumatic_ocr::{metadata::load_metadata, OnnxGlyphClassifier};
//!
//! # fn main() -> anyhow::Result<()> {
//! let metadata = load_metadata("metadata.json".as_ref())?;
//! let mut classifier = OnnxGlyphClassifier::load("model.onnx".as_ref(), &metadata)?;
//! let image = image::open("page.png")?.to_luma8();
//!
//! let page = process_page(&image, &mut classifier, &AnalysisOptions::default())?;
//! println!("{} elements", page.interpreted_groups.len());
//! # Ok(())
//! # }
//! ```

pub mod alignment;
pub mod error;
pub mod executor;
pub mod grouping;
pub mod interpretation;
pub mod matches;
pub mod options;
pub mod segmentation;
pub mod text_removal;

pub use error::{PipelineError, Result};
pub use executor::{analyze, process_batch, process_page, PageBatch};
pub use options::AnalysisOptions;
