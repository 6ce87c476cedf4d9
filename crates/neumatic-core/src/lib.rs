//! # Neumatic Core - Data Model for Byzantine Chant OCR
//!
//! This crate defines the shared data model for the neumatic recognition
//! pipeline:
//!
//! - **Geometry**: [`Rect`], [`Circle`] and [`BoundingShape`] (bounding box plus
//!   minimum enclosing circle) computed for every detected ink region.
//! - **Vocabulary**: the closed neume vocabulary ([`QuantitativeNeume`],
//!   [`Fthora`], [`GorgonNeume`], [`TimeNeume`], [`VocalExpressionNeume`],
//!   [`TempoSign`], [`Accidental`]), serialized under the stable wire names
//!   consumed by downstream score editors.
//! - **Analysis**: [`ContourMatch`], [`Segmentation`], [`PageAnalysis`] and the
//!   [`InterpretedElement`] tagged union produced by the interpretation engine.
//!
//! The crate holds types only; the algorithms that populate them live in
//! `neumatic-pipeline` and `neumatic-ocr`.

pub mod analysis;
pub mod elements;
pub mod geometry;
pub mod neumes;

pub use analysis::{Analysis, ContourMatch, ModelMetadata, PageAnalysis, PageArea, Segmentation, SCHEMA_VERSION};
pub use elements::{ElementComponents, ElementKind, InterpretedElement, MartyriaElement, NoteElement, TempoElement};
pub use geometry::{BoundingShape, Circle, Point, Rect};
pub use neumes::{
    Accidental, Fthora, GorgonNeume, QuantitativeNeume, TempoSign, TimeNeume,
    VocalExpressionNeume,
};
