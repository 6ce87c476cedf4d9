//! Interpreted output elements.
//!
//! An [`InterpretedElement`] is the final product of the pipeline: one scored
//! symbol (a note, a martyria, or a tempo marking) together with the ids of
//! the contour matches it was assembled from. The serialized form is an
//! internally tagged union keyed on `"type"`.

use serde::{Deserialize, Serialize};

use crate::neumes::{
    Accidental, Fthora, GorgonNeume, QuantitativeNeume, TempoSign, TimeNeume,
    VocalExpressionNeume,
};

/// Ids of the contour matches that formed a group: one base plus any
/// supporting marks found above, below, or beside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementComponents {
    pub base: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub support: Vec<usize>,
}

/// A melodic note: a quantitative base neume plus optional qualifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteElement {
    #[serde(rename = "neume")]
    pub quantitative_neume: QuantitativeNeume,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accidental: Option<Accidental>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fthora: Option<Fthora>,
    #[serde(rename = "gorgon", skip_serializing_if = "Option::is_none")]
    pub gorgon_neume: Option<GorgonNeume>,
    #[serde(rename = "time", skip_serializing_if = "Option::is_none")]
    pub time_neume: Option<TimeNeume>,
    #[serde(rename = "vocal_expression", skip_serializing_if = "Option::is_none")]
    pub vocal_expression_neume: Option<VocalExpressionNeume>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub vareia: bool,
}

impl NoteElement {
    #[must_use]
    pub fn new(quantitative_neume: QuantitativeNeume) -> Self {
        Self {
            quantitative_neume,
            accidental: None,
            fthora: None,
            gorgon_neume: None,
            time_neume: None,
            vocal_expression_neume: None,
            vareia: false,
        }
    }
}

/// A martyria (pitch confirmation sign), optionally carrying a fthora.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MartyriaElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fthora: Option<Fthora>,
}

/// A tempo change marking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempoElement {
    #[serde(rename = "neume")]
    pub sign: TempoSign,
}

/// Symbol-specific payload of an interpreted element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Note(NoteElement),
    Martyria(MartyriaElement),
    Tempo(TempoElement),
}

/// A fully interpreted symbol, positioned on a text line of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpretedElement {
    pub id: usize,
    pub line: i32,
    pub components: ElementComponents,
    #[serde(flatten)]
    pub kind: ElementKind,
}
