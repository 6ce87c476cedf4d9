//! Page segmentation.
//!
//! Estimates the glyph size unit (the oligon width/height) and detects the
//! baselines that notation rows are anchored to and the textlines that lyric
//! rows sit on. Every later stage expresses its geometric thresholds as
//! fractions of the oligon size, so these estimates drive the whole pipeline.
//!
//! The approach is projection-based: contours that cannot be notation
//! (narrow, thin, or extremely wide shapes) are masked out, foreground
//! pixels are counted per row, and baselines/textlines are recovered as
//! local maxima of that row profile.

#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect as ImRect;

use neumatic_core::geometry::{BoundingShape, Rect};
use neumatic_core::Segmentation;
use neumatic_ocr::contours::find_ink_shapes;

/// A contour is "wide" (likely an oligon or connecting stroke) above this
/// width/height ratio.
const WIDE_CUTOFF_RATIO: f32 = 3.0;
/// Contours at or below this ratio are masked during baseline detection.
const NARROW_CUTOFF_RATIO: f32 = 2.0;
/// Contours at or below this height are masked as thin strokes.
const MIN_CONTOUR_HEIGHT: i32 = 5;

/// Segments a binary page image (white ink on black).
#[must_use]
pub fn segment(binary: &GrayImage) -> Segmentation {
    let mut seg = Segmentation {
        page_width: binary.width(),
        page_height: binary.height(),
        ..Segmentation::default()
    };

    let shapes = find_ink_shapes(binary);
    let wide: Vec<&BoundingShape> = shapes
        .iter()
        .filter(|s| s.rect.aspect_ratio() >= WIDE_CUTOFF_RATIO)
        .collect();

    seg.oligon_height = estimate_oligon_height(binary, &wide);
    seg.oligon_width = estimate_oligon_width(&wide, seg.oligon_height);

    find_baselines(binary, &shapes, &mut seg);

    // Second pass: titles and headers can skew the first estimate, so
    // re-measure using only wide contours anchored to a detected baseline
    // and of plausible width.
    if !seg.baselines.is_empty() {
        let anchored: Vec<&BoundingShape> = wide
            .iter()
            .copied()
            .filter(|s| {
                s.rect.w <= 3 * seg.oligon_width
                    && seg.baselines.iter().any(|&b| s.rect.straddles_row(b))
            })
            .collect();

        let height = estimate_oligon_height(binary, &anchored);
        let width = estimate_oligon_width(&anchored, height);
        if height > 0 && width > 0 {
            log::debug!(
                "re-estimated oligon size: {}x{} (was {}x{})",
                width,
                height,
                seg.oligon_width,
                seg.oligon_height
            );
            seg.oligon_height = height;
            seg.oligon_width = width;
        }
    }

    find_textlines(binary, &shapes, &mut seg);
    adjust_textlines(&shapes, &mut seg);
    seg.avg_text_height = average_text_height(&shapes, &seg.textlines);

    log::debug!(
        "segmented page: oligon {}x{}, {} baselines, {} textlines",
        seg.oligon_width,
        seg.oligon_height,
        seg.baselines.len(),
        seg.textlines.len()
    );

    seg
}

/// Modal vertical ink run length inside the wide contours. The most common
/// run is the thickness of a horizontal oligon stroke.
fn estimate_oligon_height(binary: &GrayImage, wide: &[&BoundingShape]) -> i32 {
    let mut runs = Vec::new();
    for shape in wide {
        vertical_runs(binary, &shape.rect, &mut runs);
    }
    mode(&runs)
}

/// Median width of wide contours whose height matches the estimated stroke
/// thickness.
fn estimate_oligon_width(wide: &[&BoundingShape], oligon_height: i32) -> i32 {
    let mut widths: Vec<i32> = wide
        .iter()
        .filter(|s| {
            oligon_height <= s.rect.h && (s.rect.h as f32) <= oligon_height as f32 * 1.5
        })
        .map(|s| s.rect.w)
        .collect();
    median(&mut widths)
}

fn find_baselines(binary: &GrayImage, shapes: &[BoundingShape], seg: &mut Segmentation) {
    let ow = seg.oligon_width;
    if ow <= 0 {
        // No reliable glyph size estimate, treat as a page without notation.
        return;
    }

    // Mask out everything that cannot be a notation stroke: narrow or thin
    // contours and long underline/melisma strokes.
    let masked = mask_shapes(binary, shapes, |r| {
        r.aspect_ratio() <= NARROW_CUTOFF_RATIO || r.h <= MIN_CONTOUR_HEIGHT || r.w > 10 * ow
    });
    let rows = pixels_per_row(&masked);

    let mut lines = find_peaks(&rows, 0.8 * ow as f32, (ow - 1).max(1) as usize);

    let mut distances: Vec<i32> = lines.windows(2).map(|w| (w[1] - w[0]) as i32).collect();
    let avg_gap = if distances.is_empty() {
        ow * 2
    } else {
        median(&mut distances)
    };
    seg.avg_baseline_gap = avg_gap;

    // Recover baselines missed by the strict first pass: re-search any
    // unusually large gap with a relaxed peak threshold.
    let height = binary.height() as i32;
    let mut missed = Vec::new();
    for (i, &line) in lines.iter().enumerate() {
        let line = line as i32;
        let distance = if i == lines.len() - 1 {
            height - line
        } else {
            lines[i + 1] as i32 - line
        };

        if distance as f32 > 1.5 * avg_gap as f32 {
            let start = (line + avg_gap - ow * 3 / 4).max(line + ow / 2).max(0);
            let end = (line + avg_gap + ow * 3 / 4).min(height - ow / 2);

            if start < end && (end as usize) <= rows.len() {
                let peaks = find_peaks(
                    &rows[start as usize..end as usize],
                    0.4 * ow as f32,
                    (ow / 2).max(1) as usize,
                );
                missed.extend(peaks.iter().map(|&p| p + start as usize));
            }
        }
    }

    if !missed.is_empty() {
        log::debug!("recovered {} missed baselines", missed.len());
        lines.extend(missed);
        lines.sort_unstable();
    }

    // Prune candidates closer together than one oligon width, keeping the
    // first of each cluster.
    let mut pruned = Vec::new();
    let mut last = -ow;
    for &y in &lines {
        let y = y as i32;
        if y - last > ow {
            pruned.push(y);
            last = y;
        }
    }

    seg.baselines = pruned;
}

fn find_textlines(binary: &GrayImage, shapes: &[BoundingShape], seg: &mut Segmentation) {
    if seg.baselines.is_empty() {
        return;
    }

    let ow = seg.oligon_width;
    let height = binary.height() as i32;

    // Mask thin strokes so melismatic underscores are not detected as
    // textlines; the textline should run through the letters.
    let masked = mask_shapes(binary, shapes, |r| {
        r.h <= MIN_CONTOUR_HEIGHT || r.w > 10 * ow
    });
    let rows = pixels_per_row(&masked);

    let mut textlines = Vec::new();

    for (i, &baseline) in seg.baselines.iter().enumerate() {
        let start = baseline + ow / 2;

        let (mut end, gap) = if i == seg.baselines.len() - 1 {
            (height, height - baseline)
        } else {
            let next = seg.baselines[i + 1];
            (next - ow / 2, next - baseline)
        };

        // An oversized gap means the next baseline is far away (end of a
        // section); narrow the search to the expected lyric region.
        if gap as f32 > 1.5 * seg.avg_baseline_gap as f32 {
            end = baseline + seg.avg_baseline_gap - ow;
        }

        if start >= 0 && start < end && (end as usize) <= rows.len() {
            // distance spans the whole window, so at most one peak survives
            let maxima = find_peaks(&rows[start as usize..end as usize], 1.0, (end - start) as usize);
            if let Some(&first) = maxima.first() {
                textlines.push(first as i32 + start);
            }
        }
    }

    // Titles and mode keys above the first baseline.
    let end = (seg.baselines[0] - ow).max(0);
    if end > 0 {
        let maxima = find_peaks(
            &rows[..end as usize],
            ow as f32 / 2.0,
            (ow / 2).max(1) as usize,
        );
        if !maxima.is_empty() {
            textlines.extend(maxima.iter().map(|&m| m as i32));
            textlines.sort_unstable();
        }
    }

    seg.textlines = textlines;
}

/// Recenters each textline onto the median vertical midpoint of the contours
/// crossing it; Otsu-thresholded text rows drift from the projection peak.
fn adjust_textlines(shapes: &[BoundingShape], seg: &mut Segmentation) {
    seg.textlines_adj = seg
        .textlines
        .iter()
        .map(|&t| {
            let mut midpoints: Vec<i32> = shapes
                .iter()
                .filter(|s| s.rect.straddles_row(t))
                .map(|s| s.rect.y + s.rect.h / 2)
                .collect();
            if midpoints.is_empty() {
                t
            } else {
                median(&mut midpoints)
            }
        })
        .collect();
}

/// Median height of contours touching a raw textline.
fn average_text_height(shapes: &[BoundingShape], textlines: &[i32]) -> i32 {
    let mut heights: Vec<i32> = shapes
        .iter()
        .filter(|s| textlines.iter().any(|&t| s.rect.straddles_row(t)))
        .map(|s| s.rect.h)
        .collect();
    median(&mut heights)
}

/// Returns a copy of the image with matching contours erased.
fn mask_shapes<F>(image: &GrayImage, shapes: &[BoundingShape], predicate: F) -> GrayImage
where
    F: Fn(&Rect) -> bool,
{
    let mut copy = image.clone();
    for shape in shapes {
        let r = shape.rect;
        if predicate(&r) && r.w > 0 && r.h > 0 {
            draw_filled_rect_mut(
                &mut copy,
                ImRect::at(r.x, r.y).of_size(r.w as u32, r.h as u32),
                Luma([0u8]),
            );
        }
    }
    copy
}

/// Foreground pixel count per image row.
fn pixels_per_row(image: &GrayImage) -> Vec<i32> {
    let mut counts = vec![0i32; image.height() as usize];
    for (_, y, pixel) in image.enumerate_pixels() {
        if pixel[0] > 0 {
            counts[y as usize] += 1;
        }
    }
    counts
}

/// Appends the lengths of vertical foreground runs inside `rect`, scanned
/// column by column.
fn vertical_runs(image: &GrayImage, rect: &Rect, runs: &mut Vec<i32>) {
    let x0 = rect.x.max(0) as u32;
    let y0 = rect.y.max(0) as u32;
    let x1 = (rect.right().max(0) as u32).min(image.width());
    let y1 = (rect.bottom().max(0) as u32).min(image.height());

    for x in x0..x1 {
        let mut current = 0;
        for y in y0..y1 {
            if image.get_pixel(x, y)[0] > 0 {
                current += 1;
            } else if current != 0 {
                runs.push(current);
                current = 0;
            }
        }
        if current != 0 {
            runs.push(current);
        }
    }
}

/// Local maxima of `values` at least `min_height` tall and `min_distance`
/// apart. Plateaus resolve to their midpoint; when two peaks are too close,
/// the taller one wins.
pub(crate) fn find_peaks(values: &[i32], min_height: f32, min_distance: usize) -> Vec<usize> {
    let n = values.len();
    let mut peaks: Vec<usize> = Vec::new();

    let mut i = 1;
    while n >= 3 && i < n - 1 {
        if values[i] > values[i - 1] {
            let mut ahead = i + 1;
            while ahead < n - 1 && values[ahead] == values[i] {
                ahead += 1;
            }
            if values[ahead] < values[i] {
                peaks.push((i + ahead - 1) / 2);
            }
            i = ahead;
        } else {
            i += 1;
        }
    }

    peaks.retain(|&p| values[p] as f32 >= min_height);

    if peaks.len() < 2 {
        return peaks;
    }

    // Enforce the minimum separation, highest peaks first.
    let mut priority: Vec<usize> = (0..peaks.len()).collect();
    priority.sort_by(|&a, &b| values[peaks[a]].cmp(&values[peaks[b]]).then(a.cmp(&b)));
    priority.reverse();

    let mut keep = vec![true; peaks.len()];
    for &k in &priority {
        if !keep[k] {
            continue;
        }
        let mut j = k;
        while j > 0 && peaks[k] - peaks[j - 1] < min_distance {
            keep[j - 1] = false;
            j -= 1;
        }
        let mut j = k + 1;
        while j < peaks.len() && peaks[j] - peaks[k] < min_distance {
            keep[j] = false;
            j += 1;
        }
    }

    peaks
        .into_iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(p))
        .collect()
}

fn median(values: &mut Vec<i32>) -> i32 {
    if values.is_empty() {
        return 0;
    }
    values.sort_unstable();
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        ((f64::from(values[n / 2 - 1]) + f64::from(values[n / 2])) / 2.0) as i32
    }
}

/// Most frequent value; ties resolve to the smallest.
fn mode(values: &[i32]) -> i32 {
    let mut counts = std::collections::BTreeMap::new();
    for &v in values {
        *counts.entry(v).or_insert(0u32) += 1;
    }

    let mut best = 0;
    let mut best_count = 0;
    for (value, count) in counts {
        if count > best_count {
            best = value;
            best_count = count;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw_bar(image: &mut GrayImage, x: u32, y: u32, w: u32, h: u32) {
        for px in x..x + w {
            for py in y..y + h {
                image.put_pixel(px, py, Luma([255]));
            }
        }
    }

    /// A page with two rows of oligon-like bars.
    fn synthetic_page() -> GrayImage {
        let mut image = GrayImage::new(400, 300);
        for &y in &[80, 180] {
            draw_bar(&mut image, 40, y, 50, 7);
            draw_bar(&mut image, 130, y, 50, 7);
            draw_bar(&mut image, 220, y, 50, 7);
        }
        image
    }

    #[test]
    fn test_find_peaks_basic() {
        let values = [0, 1, 5, 1, 0, 0, 7, 0];
        assert_eq!(find_peaks(&values, 1.0, 1), vec![2, 6]);
    }

    #[test]
    fn test_find_peaks_plateau_midpoint() {
        let values = [0, 3, 3, 3, 0];
        assert_eq!(find_peaks(&values, 1.0, 1), vec![2]);
    }

    #[test]
    fn test_find_peaks_height_filter() {
        let values = [0, 2, 0, 9, 0];
        assert_eq!(find_peaks(&values, 5.0, 1), vec![3]);
    }

    #[test]
    fn test_find_peaks_distance_keeps_tallest() {
        let values = [0, 4, 0, 9, 0];
        assert_eq!(find_peaks(&values, 1.0, 4), vec![3]);
    }

    #[test]
    fn test_mode_prefers_smallest_on_tie() {
        assert_eq!(mode(&[3, 3, 7, 7, 1]), 3);
        assert_eq!(mode(&[]), 0);
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&mut vec![5, 1, 3]), 3);
        assert_eq!(median(&mut vec![1, 2, 3, 4]), 2);
        assert_eq!(median(&mut vec![]), 0);
    }

    #[test]
    fn test_segment_finds_two_baselines() {
        let seg = segment(&synthetic_page());

        assert_eq!(seg.baselines.len(), 2, "expected 2 baselines, got {:?}", seg.baselines);
        assert!((seg.baselines[0] - 83).abs() <= 3, "first near bar center: {:?}", seg.baselines);
        assert!((seg.baselines[1] - 183).abs() <= 3, "second near bar center: {:?}", seg.baselines);
    }

    #[test]
    fn test_segment_estimates_oligon_size() {
        let seg = segment(&synthetic_page());

        assert!(
            (seg.oligon_height - 7).abs() <= 2,
            "oligon height near bar thickness, got {}",
            seg.oligon_height
        );
        assert!(
            (seg.oligon_width - 50).abs() <= 5,
            "oligon width near bar width, got {}",
            seg.oligon_width
        );
    }

    #[test]
    fn test_segment_page_dimensions_recorded() {
        let seg = segment(&synthetic_page());
        assert_eq!(seg.page_width, 400);
        assert_eq!(seg.page_height, 300);
    }

    #[test]
    fn test_baseline_prune_invariant() {
        let seg = segment(&synthetic_page());
        for pair in seg.baselines.windows(2) {
            assert!(
                pair[1] - pair[0] > seg.oligon_width,
                "baselines {} and {} violate the prune spacing",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_empty_page_yields_empty_segmentation() {
        let seg = segment(&GrayImage::new(200, 200));

        assert_eq!(seg.oligon_width, 0);
        assert!(seg.baselines.is_empty());
        assert!(seg.textlines.is_empty());
        assert!(seg.textlines_adj.is_empty());
    }
}
