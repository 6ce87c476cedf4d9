//! Scan cleanup.
//!
//! The pipeline operates on binary images with white ink on a black
//! background. [`clean`] produces that form from a grayscale scan: optional
//! despeckling, Otsu binarization with inversion, optional projection-profile
//! deskew and optional morphological closing.

use image::{GrayImage, Luma};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::filter::median_filter;
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use imageproc::distance_transform::Norm;
use imageproc::morphology::close;

/// Deskew search granularity in degrees.
const SKEW_STEP_DEGREES: f32 = 0.5;

/// Cleanup options. Defaults match the plain binarize-only path; the extra
/// passes are opt-in for poor quality scans.
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessOptions {
    /// Median-filter the grayscale scan before binarization.
    pub despeckle: bool,
    /// Straighten the page by maximizing the horizontal projection profile.
    pub deskew: bool,
    /// Half-width of the deskew search range in degrees.
    pub max_skew_angle: f32,
    /// Radius of a morphological close applied to the binary image;
    /// 0 disables the pass.
    pub close_radius: u8,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            despeckle: false,
            deskew: false,
            max_skew_angle: 5.0,
            close_radius: 0,
        }
    }
}

/// Converts a grayscale scan into the white-on-black binary image the
/// segmentation and recognition stages expect.
#[must_use]
pub fn clean(image: &GrayImage, options: &PreprocessOptions) -> GrayImage {
    let working = if options.despeckle {
        median_filter(image, 1, 1)
    } else {
        image.clone()
    };

    let level = otsu_level(&working);
    let mut binary = threshold(&working, level, ThresholdType::BinaryInverted);

    if options.deskew {
        binary = deskew(&binary, options.max_skew_angle);
    }

    if options.close_radius > 0 {
        binary = close(&binary, Norm::LInf, options.close_radius);
    }

    binary
}

/// Sum of squared foreground counts per row. Sharply peaked when text rows
/// are horizontal, which makes it a usable skew objective.
fn row_profile_score(image: &GrayImage) -> f64 {
    let mut score = 0.0;
    for row in image.rows() {
        let sum = row.filter(|p| p[0] > 0).count() as f64;
        score += sum * sum;
    }
    score
}

fn deskew(binary: &GrayImage, max_angle: f32) -> GrayImage {
    let mut best_angle = 0.0f32;
    let mut best_score = row_profile_score(binary);

    let steps = (2.0 * max_angle / SKEW_STEP_DEGREES).round() as i32;
    for step in 0..=steps {
        let angle = -max_angle + step as f32 * SKEW_STEP_DEGREES;
        if angle.abs() < f32::EPSILON {
            continue;
        }

        let rotated = rotate_about_center(
            binary,
            angle.to_radians(),
            Interpolation::Nearest,
            Luma([0u8]),
        );
        let score = row_profile_score(&rotated);
        if score > best_score {
            best_score = score;
            best_angle = angle;
        }
    }

    if best_angle.abs() < f32::EPSILON {
        return binary.clone();
    }

    log::debug!("deskewing page by {best_angle:.1} degrees");
    rotate_about_center(
        binary,
        best_angle.to_radians(),
        Interpolation::Nearest,
        Luma([0u8]),
    )
}
