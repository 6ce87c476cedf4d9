//! Pipeline configuration.

use neumatic_ocr::preprocessing::PreprocessOptions;

/// Tunable thresholds for grouping and interpretation, plus the image
/// cleanup knobs forwarded to preprocessing.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    /// Matches below this classifier confidence are discarded before
    /// grouping; they never appear as a base or in a support list.
    pub min_confidence_threshold: f32,
    /// Higher bar for trusting a glyph as a standalone martyria.
    pub martyria_confidence_threshold: f32,
    pub preprocess: PreprocessOptions,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            min_confidence_threshold: 0.7,
            martyria_confidence_threshold: 0.8,
            preprocess: PreprocessOptions::default(),
        }
    }
}
