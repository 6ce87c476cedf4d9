//! Lyric text removal.
//!
//! Neumes are printed directly above the syllables they belong to, and the
//! classifier was never trained on text, so text contours must be erased
//! before match preparation. The hard part is keeping notation glyphs that
//! dip into the lyric row (martyria, tempo signs, long neumes) while erasing
//! the syllables themselves.

#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect as ImRect;

use neumatic_core::geometry::{BoundingShape, Rect};
use neumatic_core::Segmentation;
use neumatic_ocr::contours::find_ink_shapes;

/// Contours at or below this height are underline/melisma candidates.
const MIN_CONTOUR_HEIGHT: i32 = 5;

/// Returns a copy of the binary image with lyric text contours erased.
#[must_use]
pub fn remove_text(binary: &GrayImage, seg: &Segmentation) -> GrayImage {
    let shapes = find_ink_shapes(binary);
    let text_rects = find_text_rects(&shapes, seg);

    log::debug!("removing {} text contours", text_rects.len());

    let mut copy = binary.clone();
    for r in text_rects {
        if r.w > 0 && r.h > 0 {
            draw_filled_rect_mut(
                &mut copy,
                ImRect::at(r.x, r.y).of_size(r.w as u32, r.h as u32),
                Luma([0u8]),
            );
        }
    }
    copy
}

fn find_text_rects(shapes: &[BoundingShape], seg: &Segmentation) -> Vec<Rect> {
    if seg.baselines.is_empty() {
        return Vec::new();
    }

    // Without adjusted textlines, fall back to removing everything far away
    // from the baselines.
    if seg.textlines_adj.is_empty() {
        return outlying_rects(shapes, seg);
    }

    let mut text_rects = Vec::new();

    // Bounding rects of contours sitting on a baseline, used below to check
    // whether a suspect text glyph has notation directly above it.
    let baseline_rects: Vec<Rect> = shapes
        .iter()
        .filter(|s| seg.baselines.iter().any(|&b| s.rect.straddles_row(b)))
        .map(|s| s.rect)
        .collect();

    for shape in shapes {
        let r = shape.rect;

        // Find the textline this contour touches, within half a text height.
        let half_text = seg.avg_text_height as f32 / 2.0;
        let Some(textline) = seg.textlines_adj.iter().copied().find(|&line| {
            let top = (r.y as f32).max(line as f32 - half_text);
            let bottom = (r.bottom() as f32).min(line as f32 + half_text);
            bottom - top > 0.0
        }) else {
            continue;
        };

        // Anything on a textline above the first baseline is a heading,
        // title or mode key.
        if textline < seg.baselines[0] {
            text_rects.push(r);
            continue;
        }

        // Wide and flat, but not a thin stroke: a neume extending down to
        // the textline, keep it.
        if r.aspect_ratio() > 2.2 && r.h > MIN_CONTOUR_HEIGHT {
            continue;
        }

        // Extends well below the textline: martyria, tempo sign or a tall
        // neume, keep it.
        if (r.bottom() - textline) as f32 > 1.5 * seg.avg_text_height as f32 {
            continue;
        }

        // The baseline directly above this textline.
        let baseline = seg
            .baselines
            .iter()
            .copied()
            .take_while(|&b| b < textline)
            .last()
            .unwrap_or(0);

        // A syllable normally sits under a notation glyph: look for a
        // baseline contour whose middle half overlaps this contour's x-span.
        let found_on_baseline = baseline_rects.iter().any(|br| {
            if !br.straddles_row(baseline) {
                return false;
            }
            let left = (br.x as f32 + br.w as f32 / 4.0).max(r.x as f32);
            let right = (br.x as f32 + br.w as f32 * 3.0 / 4.0).min(r.right() as f32);
            right - left > 0.0
        });

        if !found_on_baseline {
            // No notation above on the baseline. This might still be a
            // floating martyria: look for a narrow contour overlapping this
            // one from above at martyria-like distances.
            let looks_like_martyria = shapes.iter().any(|other| {
                let o = other.rect;
                o.y < r.y
                    && r.horizontal_intersection(&o) > 0
                    && (o.w as f32) < 0.75 * seg.oligon_width as f32
                    && ((r.y - o.bottom()) as f32) < 1.5 * seg.avg_text_height as f32
                    && ((r.bottom() - o.y) as f32) > 2.0 * seg.avg_text_height as f32
            });

            if looks_like_martyria {
                continue;
            }
        }

        text_rects.push(r);
    }

    // Melisma underlines: short, flat strokes within one text height below a
    // textline.
    for shape in shapes {
        let r = shape.rect;
        let is_melisma = r.h <= MIN_CONTOUR_HEIGHT
            && r.w > r.h
            && seg
                .textlines_adj
                .iter()
                .any(|&line| line <= r.y && r.y <= line + seg.avg_text_height);
        if is_melisma {
            text_rects.push(r);
        }
    }

    text_rects
}

/// Simplified removal used when no textlines were recovered: contours whose
/// circle center is farther than the average baseline gap from every
/// surrounding baseline are text regions.
fn outlying_rects(shapes: &[BoundingShape], seg: &Segmentation) -> Vec<Rect> {
    let tolerance = seg.avg_baseline_gap as f32;
    let mut rects = Vec::new();

    for shape in shapes {
        let r = shape.rect;
        let cy = shape.circle.y;

        if seg.baselines.iter().any(|&b| r.straddles_row(b)) {
            continue;
        }

        let mut handled = false;
        for (i, &b) in seg.baselines.iter().enumerate() {
            if cy <= b as f32 {
                if i == 0 {
                    if b as f32 - cy > tolerance {
                        rects.push(r);
                    }
                } else {
                    let prev = seg.baselines[i - 1] as f32;
                    if b as f32 - cy > tolerance && cy - prev > tolerance {
                        rects.push(r);
                    }
                }
                handled = true;
                break;
            }
        }

        if handled {
            continue;
        }

        let last = *seg.baselines.last().unwrap_or(&0) as f32;
        if cy > last && cy - last > tolerance {
            rects.push(r);
        }
    }

    rects
}

#[cfg(test)]
mod tests {
    use super::*;
    use neumatic_core::geometry::Circle;

    fn shape(x: i32, y: i32, w: i32, h: i32) -> BoundingShape {
        BoundingShape {
            rect: Rect::new(x, y, w, h),
            circle: Circle {
                x: x as f32 + w as f32 / 2.0,
                y: y as f32 + h as f32 / 2.0,
                r: (w.max(h)) as f32 / 2.0,
            },
        }
    }

    fn segmentation() -> Segmentation {
        Segmentation {
            page_width: 400,
            page_height: 300,
            oligon_width: 40,
            oligon_height: 6,
            avg_text_height: 14,
            avg_baseline_gap: 100,
            baselines: vec![80, 180],
            textlines: vec![120, 220],
            textlines_adj: vec![120, 220],
        }
    }

    #[test]
    fn test_syllable_under_notation_is_removed() {
        let seg = segmentation();
        // notation glyph on the baseline, syllable on the textline below it
        let notation = shape(100, 74, 40, 12);
        let syllable = shape(105, 112, 18, 16);

        let rects = find_text_rects(&[notation, syllable], &seg);
        assert_eq!(rects, vec![syllable.rect]);
    }

    #[test]
    fn test_heading_above_first_baseline_is_removed() {
        let seg = segmentation();
        let heading = shape(50, 24, 30, 16);
        // give the heading a textline of its own
        let mut seg = seg;
        seg.textlines_adj.insert(0, 30);

        let rects = find_text_rects(&[heading], &seg);
        assert_eq!(rects, vec![heading.rect]);
    }

    #[test]
    fn test_tall_martyria_is_kept() {
        let seg = segmentation();
        // dips into the textline but extends far below it
        let martyria = shape(200, 110, 14, 36);

        let rects = find_text_rects(&[martyria], &seg);
        assert!(rects.is_empty(), "martyria must not be removed: {rects:?}");
    }

    #[test]
    fn test_wide_flat_neume_is_kept() {
        let seg = segmentation();
        let stroke = shape(100, 115, 30, 8);

        let rects = find_text_rects(&[stroke], &seg);
        assert!(rects.is_empty(), "wide flat neume must be kept: {rects:?}");
    }

    #[test]
    fn test_melisma_underline_is_removed() {
        let seg = segmentation();
        let melisma = shape(140, 126, 25, 3);
        // sits on no textline band but within one text height below it

        let rects = find_text_rects(&[melisma], &seg);
        assert!(rects.contains(&melisma.rect));
    }

    #[test]
    fn test_no_baselines_removes_nothing() {
        let seg = Segmentation::default();
        let anything = shape(10, 10, 20, 20);

        assert!(find_text_rects(&[anything], &seg).is_empty());
    }

    #[test]
    fn test_fallback_removes_far_contours() {
        let mut seg = segmentation();
        seg.textlines_adj.clear();
        seg.avg_baseline_gap = 30;

        // halfway between the two baselines, more than 30 from both
        let stray = shape(100, 125, 10, 10);
        let anchored = shape(100, 78, 40, 8);

        let rects = find_text_rects(&[stray, anchored], &seg);
        assert_eq!(rects, vec![stray.rect]);
    }
}
