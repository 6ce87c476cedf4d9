//! Analysis document model.
//!
//! The [`Analysis`] struct is the serialized result of a full run: model
//! provenance plus one [`PageAnalysis`] per processed page (or half page,
//! when a two-page spread is split). Field names form the on-disk schema
//! consumed by downstream editors and are versioned via `schema_version`.

use std::collections::BTreeMap;

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::elements::InterpretedElement;
use crate::geometry::{Circle, Rect};

pub const SCHEMA_VERSION: u32 = 1;

/// A classified ink blob on the page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContourMatch {
    pub id: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub confidence: f32,
    pub line: i32,
    pub bounding_rect: Rect,
    pub bounding_circle: Circle,
    /// Classifier input crop, kept in memory only.
    #[serde(skip)]
    pub glyph_image: Option<GrayImage>,
}

/// Page layout measurements recovered before classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Segmentation {
    pub page_width: u32,
    pub page_height: u32,
    pub oligon_width: i32,
    pub oligon_height: i32,
    pub avg_text_height: i32,
    #[serde(skip)]
    pub avg_baseline_gap: i32,
    pub baselines: Vec<i32>,
    pub textlines: Vec<i32>,
    pub textlines_adj: Vec<i32>,
}

/// Which half of a split two-page spread a page came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageArea {
    Left,
    Right,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageAnalysis {
    pub id: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_page_num: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_area: Option<PageArea>,
    pub segmentation: Segmentation,
    pub matches: Vec<ContourMatch>,
    pub interpreted_groups: Vec<InterpretedElement>,
}

/// Version and class list of the classifier that produced an analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_version: String,
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub schema_version: u32,
    pub model_metadata: ModelMetadata,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_metadata: BTreeMap<String, serde_json::Value>,
    pub pages: Vec<PageAnalysis>,
}

impl Analysis {
    #[must_use]
    pub fn new(model_metadata: ModelMetadata) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            model_metadata,
            additional_metadata: BTreeMap::new(),
            pages: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_serialization_omits_image_and_null_label() {
        let m = ContourMatch {
            id: 4,
            label: None,
            confidence: 0.0,
            line: -1,
            bounding_rect: Rect::new(10, 20, 30, 40),
            bounding_circle: Circle { x: 25.0, y: 40.0, r: 18.0 },
            glyph_image: Some(GrayImage::new(2, 2)),
        };

        let json = serde_json::to_value(&m).unwrap();
        assert!(json.get("glyph_image").is_none());
        assert!(json.get("label").is_none());
        assert_eq!(json["bounding_rect"]["w"], 30);
        assert_eq!(json["bounding_circle"]["r"], 18.0);
    }

    #[test]
    fn test_page_area_wire_form() {
        assert_eq!(serde_json::to_string(&PageArea::Left).unwrap(), "\"left\"");
        assert_eq!(serde_json::to_string(&PageArea::Right).unwrap(), "\"right\"");
    }

    #[test]
    fn test_analysis_envelope() {
        let mut analysis = Analysis::new(ModelMetadata {
            model_version: "2024-05-01".into(),
            classes: vec!["oligon".into(), "ison".into()],
        });
        analysis
            .additional_metadata
            .insert("source".into(), serde_json::json!("scan.pdf"));

        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["schema_version"], 1);
        assert_eq!(json["model_metadata"]["classes"][1], "ison");
        assert_eq!(json["additional_metadata"]["source"], "scan.pdf");
        assert_eq!(json["pages"], serde_json::json!([]));
    }
}
