//! Page executor: wires the stages into single-page and batch entry points.
//!
//! A page flows through cleanup, segmentation, text removal, match
//! preparation, classification, grouping and interpretation. Batches run the
//! image stages in parallel per page; the classifier session is shared
//! behind a mutex. Interpreted element ids are renumbered globally after the
//! parallel map so they stay unique across the whole analysis.

use std::sync::Mutex;

use image::imageops;
use image::GrayImage;
use log::{debug, warn};
use rayon::prelude::*;

use neumatic_core::{Analysis, ModelMetadata, PageAnalysis, PageArea};
use neumatic_ocr::preprocessing::clean;
use neumatic_ocr::GlyphClassifier;

use crate::error::{PipelineError, Result};
use crate::grouping::group_matches;
use crate::interpretation::interpret;
use crate::matches::prepare_matches;
use crate::options::AnalysisOptions;
use crate::segmentation::segment;
use crate::text_removal::remove_text;

/// Runs every stage up to classification: the image work that needs no model.
fn prepare_page(image: &GrayImage, options: &AnalysisOptions) -> PageAnalysis {
    let binary = clean(image, &options.preprocess);
    let segmentation = segment(&binary);
    let no_text = remove_text(&binary, &segmentation);
    let matches = prepare_matches(&no_text, &segmentation);

    PageAnalysis {
        id: 0,
        original_page_num: None,
        page_area: None,
        segmentation,
        matches,
        interpreted_groups: Vec::new(),
    }
}

fn classify_page<C: GlyphClassifier>(page: &mut PageAnalysis, classifier: &mut C) -> Result<()> {
    for m in &mut page.matches {
        let Some(glyph) = &m.glyph_image else { continue };
        let prediction = classifier.classify(glyph)?;
        m.label = Some(prediction.label);
        m.confidence = prediction.confidence;
    }
    Ok(())
}

fn interpret_page(page: &mut PageAnalysis, options: &AnalysisOptions) {
    let groups = group_matches(&page.matches, &page.segmentation, options);
    page.interpreted_groups = interpret(&page.matches, &page.segmentation, &groups);
}

/// Full pipeline for a single grayscale page.
pub fn process_page<C: GlyphClassifier>(
    image: &GrayImage,
    classifier: &mut C,
    options: &AnalysisOptions,
) -> Result<PageAnalysis> {
    let mut page = prepare_page(image, options);
    debug!(
        "page prepared: {} baselines, {} contours",
        page.segmentation.baselines.len(),
        page.matches.len()
    );
    classify_page(&mut page, classifier)?;
    interpret_page(&mut page, options);
    Ok(page)
}

/// A batch of pre-rasterized grayscale pages, selected by index.
pub struct PageBatch<'a> {
    pub pages: &'a [GrayImage],
    pub page_range: &'a [usize],
    /// Treat each page as a two-page spread and process the halves
    /// separately.
    pub split_lr: bool,
}

/// Processes a batch of pages in parallel. Out-of-range page indices are
/// reported and skipped. Page ids and element ids are assigned sequentially
/// over the final page order.
pub fn process_batch<C: GlyphClassifier + Send>(
    batch: &PageBatch<'_>,
    classifier: &Mutex<C>,
    options: &AnalysisOptions,
) -> Result<Vec<PageAnalysis>> {
    let mut tasks: Vec<(usize, Option<PageArea>, GrayImage)> = Vec::new();

    for &page_num in batch.page_range {
        let Some(image) = batch.pages.get(page_num) else {
            warn!("page {page_num} is out of range, skipping");
            continue;
        };

        if batch.split_lr {
            let (left, right) = split_spread(image);
            tasks.push((page_num, Some(PageArea::Left), left));
            tasks.push((page_num, Some(PageArea::Right), right));
        } else {
            tasks.push((page_num, None, image.clone()));
        }
    }

    let mut pages: Vec<PageAnalysis> = tasks
        .par_iter()
        .map(|(page_num, area, image)| {
            let mut page = prepare_page(image, options);
            page.original_page_num = Some(*page_num);
            page.page_area = *area;

            {
                let mut guard = classifier
                    .lock()
                    .map_err(|_| PipelineError::ClassifierPoisoned)?;
                classify_page(&mut page, &mut *guard)?;
            }

            interpret_page(&mut page, options);
            Ok(page)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut next_element_id = 0;
    for (id, page) in pages.iter_mut().enumerate() {
        page.id = id;
        for element in &mut page.interpreted_groups {
            element.id = next_element_id;
            next_element_id += 1;
        }
    }

    Ok(pages)
}

/// Cuts a two-page spread down the middle.
fn split_spread(image: &GrayImage) -> (GrayImage, GrayImage) {
    let half = image.width() / 2;
    let left = imageops::crop_imm(image, 0, 0, half, image.height()).to_image();
    let right =
        imageops::crop_imm(image, half, 0, image.width() - half, image.height()).to_image();
    (left, right)
}

/// Wraps processed pages in the serializable analysis envelope.
#[must_use]
pub fn analyze(pages: Vec<PageAnalysis>, model_metadata: ModelMetadata) -> Analysis {
    let mut analysis = Analysis::new(model_metadata);
    analysis.pages = pages;
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use neumatic_ocr::Prediction;

    /// Labels every glyph with a fixed prediction.
    struct FixedClassifier {
        label: String,
        calls: usize,
    }

    impl GlyphClassifier for FixedClassifier {
        fn classify(&mut self, _glyph: &GrayImage) -> neumatic_ocr::Result<Prediction> {
            self.calls += 1;
            Ok(Prediction { label: self.label.clone(), confidence: 0.95 })
        }
    }

    fn page_with_bar() -> GrayImage {
        // one dark oligon-like bar in a white page
        let mut image = GrayImage::from_pixel(400, 300, Luma([255]));
        for x in 100..150 {
            for y in 80..88 {
                image.put_pixel(x, y, Luma([0]));
            }
        }
        image
    }

    #[test]
    fn test_process_page_classifies_and_interprets() {
        let image = page_with_bar();
        let mut classifier = FixedClassifier { label: "oligon".into(), calls: 0 };

        let page = process_page(&image, &mut classifier, &AnalysisOptions::default()).unwrap();

        assert!(classifier.calls > 0, "classifiable contours must reach the model");
        assert!(page.matches.iter().any(|m| m.label.as_deref() == Some("oligon")));
    }

    #[test]
    fn test_blank_page_yields_no_elements() {
        let image = GrayImage::from_pixel(200, 200, Luma([255]));
        let mut classifier = FixedClassifier { label: "oligon".into(), calls: 0 };

        let page = process_page(&image, &mut classifier, &AnalysisOptions::default()).unwrap();

        assert!(page.segmentation.baselines.is_empty());
        assert!(page.interpreted_groups.is_empty());
    }

    #[test]
    fn test_batch_skips_out_of_range_pages() {
        let pages = vec![page_with_bar()];
        let classifier = Mutex::new(FixedClassifier { label: "oligon".into(), calls: 0 });
        let batch = PageBatch { pages: &pages, page_range: &[0, 5], split_lr: false };

        let result = process_batch(&batch, &classifier, &AnalysisOptions::default()).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].original_page_num, Some(0));
    }

    #[test]
    fn test_batch_split_lr_produces_two_half_pages() {
        let pages = vec![page_with_bar()];
        let classifier = Mutex::new(FixedClassifier { label: "oligon".into(), calls: 0 });
        let batch = PageBatch { pages: &pages, page_range: &[0], split_lr: true };

        let result = process_batch(&batch, &classifier, &AnalysisOptions::default()).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].page_area, Some(PageArea::Left));
        assert_eq!(result[1].page_area, Some(PageArea::Right));
        assert_eq!(result[0].id, 0);
        assert_eq!(result[1].id, 1);
    }

    #[test]
    fn test_batch_renumbers_element_ids_globally() {
        let pages = vec![page_with_bar(), page_with_bar()];
        let classifier = Mutex::new(FixedClassifier { label: "oligon".into(), calls: 0 });
        let batch = PageBatch { pages: &pages, page_range: &[0, 1], split_lr: false };

        let result = process_batch(&batch, &classifier, &AnalysisOptions::default()).unwrap();

        let ids: Vec<usize> = result
            .iter()
            .flat_map(|p| p.interpreted_groups.iter().map(|e| e.id))
            .collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len(), "element ids must be globally unique");
        assert_eq!(ids, sorted, "element ids must be sequential across pages");
    }

    #[test]
    fn test_analyze_wraps_envelope() {
        let metadata = ModelMetadata {
            model_version: "test".into(),
            classes: vec!["oligon".into()],
        };
        let analysis = analyze(Vec::new(), metadata);
        assert_eq!(analysis.schema_version, neumatic_core::SCHEMA_VERSION);
        assert!(analysis.pages.is_empty());
    }
}
