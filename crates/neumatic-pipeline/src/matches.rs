//! Match preparation and line assignment.
//!
//! Turns the contours surviving text removal into classifiable
//! [`ContourMatch`]es: size-gated glyph crops scaled onto a square canvas,
//! each assigned to the baseline it belongs to and sorted into reading
//! order. Match ids are the indices of that final order.

#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use image::imageops::{self, FilterType};
use image::GrayImage;

use neumatic_core::{ContourMatch, Segmentation};
use neumatic_ocr::contours::find_ink_shapes;
use neumatic_ocr::GLYPH_INPUT_SIZE;

/// Glyphs smaller than this in either dimension are noise, not neumes.
const MIN_CONTOUR_SIZE: i32 = 5;

/// Extracts matches from a text-removed binary image. Contours outside the
/// classifiable size band are kept for bookkeeping but carry no glyph crop,
/// so they are never classified and never grouped.
#[must_use]
pub fn prepare_matches(image: &GrayImage, seg: &Segmentation) -> Vec<ContourMatch> {
    let max_size = (seg.oligon_width as f32 * 1.5) as i32;

    let mut matches: Vec<ContourMatch> = find_ink_shapes(image)
        .into_iter()
        .map(|shape| {
            let r = shape.rect;
            let classifiable = r.w >= MIN_CONTOUR_SIZE
                && r.w <= max_size
                && r.h >= MIN_CONTOUR_SIZE
                && r.h <= max_size;

            ContourMatch {
                id: 0,
                label: None,
                confidence: 0.0,
                line: -1,
                bounding_rect: r,
                bounding_circle: shape.circle,
                glyph_image: classifiable.then(|| crop_glyph(image, &shape.rect)),
            }
        })
        .collect();

    assign_lines(&mut matches, &seg.baselines);
    sort_matches(&mut matches);

    for (i, m) in matches.iter_mut().enumerate() {
        m.id = i;
    }

    matches
}

/// Crops the contour region and centers it, isotropically scaled, on a black
/// square canvas of the classifier's input size.
fn crop_glyph(image: &GrayImage, rect: &neumatic_core::Rect) -> GrayImage {
    let target = GLYPH_INPUT_SIZE;

    let x = rect.x.max(0) as u32;
    let y = rect.y.max(0) as u32;
    let w = (rect.w.max(1) as u32).min(image.width() - x);
    let h = (rect.h.max(1) as u32).min(image.height() - y);

    let roi = imageops::crop_imm(image, x, y, w, h).to_image();

    let scale = target as f32 / w.max(h) as f32;
    let new_w = ((w as f32 * scale) as u32).max(1).min(target);
    let new_h = ((h as f32 * scale) as u32).max(1).min(target);

    let resized = imageops::resize(&roi, new_w, new_h, FilterType::CatmullRom);

    let mut canvas = GrayImage::new(target, target);
    let dx = (target - new_w) / 2;
    let dy = (target - new_h) / 2;
    imageops::overlay(&mut canvas, &resized, i64::from(dx), i64::from(dy));

    canvas
}

/// Assigns each match to a baseline index. A match straddling a baseline
/// belongs to it; otherwise it belongs to the nearer of the two baselines
/// bracketing its circle center, defaulting to the first/last at the page
/// edges.
pub fn assign_lines(matches: &mut [ContourMatch], baselines: &[i32]) {
    if baselines.is_empty() {
        return;
    }

    for m in matches {
        m.line = -1;

        for (i, &b) in baselines.iter().enumerate() {
            if m.bounding_rect.straddles_row(b) {
                m.line = i as i32;
                break;
            }
        }
        if m.line != -1 {
            continue;
        }

        for (i, &b) in baselines.iter().enumerate() {
            if m.bounding_circle.y <= b as f32 {
                if i == 0 {
                    m.line = 0;
                } else {
                    let prev = baselines[i - 1] as f32;
                    // on an exact tie the earlier baseline wins
                    if b as f32 - m.bounding_circle.y < m.bounding_circle.y - prev {
                        m.line = i as i32;
                    } else {
                        m.line = i as i32 - 1;
                    }
                }
                break;
            }
        }
        if m.line != -1 {
            continue;
        }

        if m.bounding_circle.y > *baselines.last().unwrap_or(&0) as f32 {
            m.line = baselines.len() as i32 - 1;
        }
    }
}

/// Reading order: line ascending, then left to right.
pub fn sort_matches(matches: &mut [ContourMatch]) {
    matches.sort_by_key(|m| (m.line, m.bounding_rect.x));
}
