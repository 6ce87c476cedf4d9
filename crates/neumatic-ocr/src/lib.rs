//! Glyph classification for the neumatic recognition pipeline.
//!
//! This crate wraps the external collaborators of the pipeline:
//!
//! 1. **Classification**: an ONNX Runtime session behind the
//!    [`GlyphClassifier`] trait, so the pipeline crate can be tested with a
//!    stub classifier and run in production with [`OnnxGlyphClassifier`].
//! 2. **Metadata**: the `{model_version, classes}` JSON sidecar shipped next
//!    to the model file ([`metadata::load_metadata`]).
//! 3. **Preprocessing**: scan cleanup into the white-ink-on-black binary form
//!    the pipeline operates on ([`preprocessing::clean`]).
//! 4. **Contours**: edge-traced ink regions with their bounding shapes
//!    ([`contours::find_ink_shapes`]).
//!
//! The classifier expects the square padded glyph crops produced by the
//! pipeline's match-preparation stage and returns the most probable class
//! label with its softmax confidence.

#![allow(clippy::cast_precision_loss)]

pub mod contours;
pub mod metadata;
pub mod preprocessing;

use std::path::Path;

use image::GrayImage;
use ndarray::Array4;
use ort::session::{builder::GraphOptimizationLevel, Session};
use thiserror::Error;

use neumatic_core::ModelMetadata;

/// Side length of the square classifier input.
pub const GLYPH_INPUT_SIZE: u32 = 224;

/// `ImageNet` channel means used when the classifier was trained.
const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
/// `ImageNet` channel standard deviations used when the classifier was trained.
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// OCR-specific errors
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load the classifier model from disk
    #[error("failed to load classifier model: {0}")]
    ModelLoad(String),

    /// Error during the classifier forward pass
    #[error("classifier inference failed: {0}")]
    Inference(#[from] ort::Error),

    /// The model produced no output tensors
    #[error("classifier returned no outputs")]
    EmptyOutput,

    /// Glyph image dimensions are unusable (zero-sized)
    #[error("invalid glyph image dimensions: {0}x{1}")]
    InvalidDimensions(u32, u32),

    /// Model metadata is missing or inconsistent
    #[error("model metadata error: {0}")]
    Metadata(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to parse model metadata: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OcrError>;

/// A single classification result.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
}

/// Classifies a prepared glyph crop into one of the model's classes.
///
/// `classify` takes `&mut self` because ONNX Runtime sessions require mutable
/// access to run. Batch processing wraps the classifier in a `Mutex` and
/// shares it across page workers.
pub trait GlyphClassifier {
    fn classify(&mut self, glyph: &GrayImage) -> Result<Prediction>;
}

/// ONNX Runtime backed glyph classifier.
pub struct OnnxGlyphClassifier {
    session: Session,
    classes: Vec<String>,
}

impl OnnxGlyphClassifier {
    /// Loads the model and pairs it with the class list from its metadata.
    pub fn load(model_path: &Path, metadata: &ModelMetadata) -> Result<Self> {
        if metadata.classes.is_empty() {
            return Err(OcrError::Metadata(
                "metadata contains an empty class list".to_string(),
            ));
        }

        let session = Session::builder()
            .and_then(|b| Ok(b.with_optimization_level(GraphOptimizationLevel::Level3)?))
            .and_then(|mut b| b.commit_from_file(model_path))
            .map_err(|e| OcrError::ModelLoad(e.to_string()))?;

        log::debug!(
            "loaded glyph classifier {} ({} classes)",
            metadata.model_version,
            metadata.classes.len()
        );

        Ok(Self {
            session,
            classes: metadata.classes.clone(),
        })
    }

    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Replicates the grayscale glyph into three channels and applies the
    /// `ImageNet` normalization the model was trained with, NCHW layout.
    fn normalize(glyph: &GrayImage) -> Array4<f32> {
        let (width, height) = glyph.dimensions();
        let mut input = Array4::<f32>::zeros((1, 3, height as usize, width as usize));

        for (x, y, pixel) in glyph.enumerate_pixels() {
            let value = f32::from(pixel[0]) / 255.0;
            for channel in 0..3 {
                input[[0, channel, y as usize, x as usize]] =
                    (value - IMAGENET_MEAN[channel]) / IMAGENET_STD[channel];
            }
        }

        input
    }
}

impl GlyphClassifier for OnnxGlyphClassifier {
    fn classify(&mut self, glyph: &GrayImage) -> Result<Prediction> {
        let (width, height) = glyph.dimensions();
        if width == 0 || height == 0 {
            return Err(OcrError::InvalidDimensions(width, height));
        }

        let input = Self::normalize(glyph);
        let shape = input.shape().to_vec();
        let (data, _offset) = input.into_raw_vec_and_offset();
        let input_value = ort::value::Value::from_array((shape.as_slice(), data))?;

        let outputs = self.session.run(ort::inputs!["input" => input_value])?;
        let output_name = outputs.keys().next().ok_or(OcrError::EmptyOutput)?;
        let (_, logits) = outputs[output_name].try_extract_tensor::<f32>()?;

        let (class_id, confidence) = softmax_argmax(logits);
        let label = self
            .classes
            .get(class_id)
            .ok_or_else(|| {
                OcrError::Metadata(format!(
                    "model predicted class {class_id} but metadata lists only {} classes",
                    self.classes.len()
                ))
            })?
            .clone();

        Ok(Prediction { label, confidence })
    }
}

/// Softmax over raw logits, returning the argmax index and its probability.
fn softmax_argmax(logits: &[f32]) -> (usize, f32) {
    let max_logit = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&l| (l - max_logit).exp()).collect();
    let sum: f32 = exps.iter().sum();

    let mut best = 0;
    for (i, &e) in exps.iter().enumerate() {
        if e > exps[best] {
            best = i;
        }
    }

    (best, exps[best] / sum)
}
