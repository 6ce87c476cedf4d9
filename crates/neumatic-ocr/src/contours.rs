//! Ink region extraction.
//!
//! Finds connected ink regions in a binary page image via edge tracing:
//! Gaussian blur, Canny, then outer contour following. Each region is
//! summarized by its [`BoundingShape`] (bounding rectangle plus minimum
//! enclosing circle); the rest of the pipeline works on those shapes, not
//! the raw contours.

use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;

use neumatic_core::geometry::{BoundingShape, Point};

// Equivalent of a 5x5 Gaussian kernel with auto sigma.
const CONTOUR_BLUR_SIGMA: f32 = 1.1;
const CANNY_LOW_THRESHOLD: f32 = 30.0;
const CANNY_HIGH_THRESHOLD: f32 = 150.0;

/// Traces the outer contours of all ink regions and returns their bounding
/// shapes. Order follows the raster order of the contour tracer and is
/// deterministic for a given image.
#[must_use]
pub fn find_ink_shapes(binary: &GrayImage) -> Vec<BoundingShape> {
    let blurred = gaussian_blur_f32(binary, CONTOUR_BLUR_SIGMA);
    let edges = canny(&blurred, CANNY_LOW_THRESHOLD, CANNY_HIGH_THRESHOLD);

    find_contours::<i32>(&edges)
        .into_iter()
        .filter(|contour| contour.border_type == BorderType::Outer)
        .filter_map(|contour| {
            let points: Vec<Point> = contour
                .points
                .iter()
                .map(|p| (p.x as f32, p.y as f32))
                .collect();
            BoundingShape::from_points(&points)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn blank(width: u32, height: u32) -> GrayImage {
        GrayImage::new(width, height)
    }

    fn fill_rect(image: &mut GrayImage, x: u32, y: u32, w: u32, h: u32) {
        for px in x..x + w {
            for py in y..y + h {
                image.put_pixel(px, py, Luma([255]));
            }
        }
    }

    #[test]
    fn test_empty_image_has_no_shapes() {
        assert!(find_ink_shapes(&blank(50, 50)).is_empty());
    }

    #[test]
    fn test_single_blob_yields_one_outer_shape() {
        let mut image = blank(100, 100);
        fill_rect(&mut image, 30, 40, 20, 12);

        let shapes = find_ink_shapes(&image);
        assert_eq!(shapes.len(), 1, "one blob must produce one outer contour");

        let rect = shapes[0].rect;
        assert!((rect.x - 30).abs() <= 2, "left edge near 30, got {}", rect.x);
        assert!((rect.y - 40).abs() <= 2, "top edge near 40, got {}", rect.y);
        assert!((rect.w - 20).abs() <= 4, "width near 20, got {}", rect.w);
        assert!((rect.h - 12).abs() <= 4, "height near 12, got {}", rect.h);
    }

    #[test]
    fn test_separate_blobs_yield_separate_shapes() {
        let mut image = blank(120, 60);
        fill_rect(&mut image, 10, 20, 15, 10);
        fill_rect(&mut image, 70, 20, 15, 10);

        let shapes = find_ink_shapes(&image);
        assert_eq!(shapes.len(), 2);
    }

    #[test]
    fn test_circle_encloses_rect_corners() {
        let mut image = blank(80, 80);
        fill_rect(&mut image, 20, 20, 16, 16);

        let shapes = find_ink_shapes(&image);
        let shape = &shapes[0];
        let rect = shape.rect;

        for (cx, cy) in [
            (rect.x, rect.y),
            (rect.right(), rect.y),
            (rect.x, rect.bottom()),
            (rect.right(), rect.bottom()),
        ] {
            let dx = shape.circle.x - cx as f32;
            let dy = shape.circle.y - cy as f32;
            let distance = (dx * dx + dy * dy).sqrt();
            assert!(
                distance <= shape.circle.r + 3.0,
                "corner ({cx},{cy}) should be within the enclosing circle"
            );
        }
    }
}
