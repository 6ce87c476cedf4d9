//! Geometric queries over a group's support matches.
//!
//! All horizontal-overlap tests are taken against the base glyph; vertical
//! position is decided by bounding-circle centers. Thresholds are the
//! fraction of the support glyph's width that must overlap the base.

#![allow(clippy::cast_precision_loss)]

use neumatic_core::ContourMatch;

use crate::grouping::{GroupKind, NeumeGroup};

/// A group under interpretation. Support membership is mutable (sanity
/// checks prune it, cross-group merges extend it) while the matches
/// themselves stay shared and read-only.
pub(crate) struct GroupView<'a> {
    matches: &'a [ContourMatch],
    pub kind: GroupKind,
    pub line: i32,
    pub base: usize,
    pub support: Vec<usize>,
}

impl<'a> GroupView<'a> {
    pub fn new(matches: &'a [ContourMatch], group: &NeumeGroup) -> Self {
        Self {
            matches,
            kind: group.kind,
            line: group.line,
            base: group.base,
            support: group.support.clone(),
        }
    }

    #[inline]
    pub fn get(&self, id: usize) -> &'a ContourMatch {
        &self.matches[id]
    }

    #[inline]
    pub fn base(&self) -> &'a ContourMatch {
        &self.matches[self.base]
    }

    pub fn base_label(&self) -> &'a str {
        self.base().label.as_deref().unwrap_or_default()
    }

    /// The base rect spans the support glyph's horizontal center.
    pub fn center_overlaps(&self, s: &ContourMatch) -> bool {
        self.base().bounding_rect.spans_x(s.bounding_circle.x)
    }

    /// The support glyph's left edge falls within the base rect.
    pub fn left_overlaps(&self, s: &ContourMatch) -> bool {
        let b = self.base().bounding_rect;
        b.x <= s.bounding_rect.x && s.bounding_rect.x <= b.right()
    }

    /// At least `threshold` of the support glyph's width overlaps the base.
    pub fn overlaps(&self, s: &ContourMatch, threshold: f32) -> bool {
        let b = self.base().bounding_rect;
        let overlap = b.horizontal_intersection(&s.bounding_rect);
        overlap as f32 / s.bounding_rect.w.max(1) as f32 >= threshold
    }

    fn covers(&self, s: &ContourMatch, threshold: f32) -> bool {
        self.center_overlaps(s) || self.overlaps(s, threshold)
    }

    pub fn find(&self, label: &str, threshold: f32) -> Vec<usize> {
        self.support
            .iter()
            .copied()
            .filter(|&id| {
                let s = self.get(id);
                s.label.as_deref() == Some(label) && self.covers(s, threshold)
            })
            .collect()
    }

    pub fn find_above(&self, label: &str, threshold: f32) -> Vec<usize> {
        let base_y = self.base().bounding_circle.y;
        self.find(label, threshold)
            .into_iter()
            .filter(|&id| self.get(id).bounding_circle.y < base_y)
            .collect()
    }

    pub fn find_below(&self, label: &str, threshold: f32) -> Vec<usize> {
        let base_y = self.base().bounding_circle.y;
        self.find(label, threshold)
            .into_iter()
            .filter(|&id| self.get(id).bounding_circle.y > base_y)
            .collect()
    }

    pub fn has(&self, label: &str, threshold: f32) -> bool {
        !self.find(label, threshold).is_empty()
    }

    pub fn has_above(&self, label: &str, threshold: f32) -> bool {
        !self.find_above(label, threshold).is_empty()
    }

    pub fn has_below(&self, label: &str, threshold: f32) -> bool {
        !self.find_below(label, threshold).is_empty()
    }

    pub fn remove(&mut self, id: usize) {
        self.support.retain(|&x| x != id);
    }

    pub fn remove_label(&mut self, label: &str) {
        self.support.retain(|&x| self.matches[x].label.as_deref() != Some(label));
    }

    pub fn max_confidence(&self, ids: &[usize]) -> f32 {
        ids.iter().map(|&id| self.get(id).confidence).fold(f32::MIN, f32::max)
    }
}

pub(crate) fn touches_any_textline(m: &ContourMatch, textlines: &[i32]) -> bool {
    textlines.iter().any(|&y| m.bounding_rect.straddles_row(y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use neumatic_core::geometry::{Circle, Rect};

    fn m(label: &str, rect: Rect) -> ContourMatch {
        ContourMatch {
            label: Some(label.to_string()),
            confidence: 0.9,
            bounding_circle: Circle {
                x: rect.x as f32 + rect.w as f32 / 2.0,
                y: rect.y as f32 + rect.h as f32 / 2.0,
                r: rect.w.max(rect.h) as f32 / 2.0,
            },
            bounding_rect: rect,
            ..ContourMatch::default()
        }
    }

    fn view(matches: &[ContourMatch]) -> GroupView<'_> {
        let group = NeumeGroup {
            line: 0,
            kind: GroupKind::Base,
            base: 0,
            support: (1..matches.len()).collect(),
        };
        GroupView::new(matches, &group)
    }

    #[test]
    fn test_find_above_and_below_split_on_base_center() {
        let matches = vec![
            m("oligon", Rect::new(50, 96, 24, 8)),
            m("gorgon", Rect::new(55, 80, 12, 8)),
            m("apli", Rect::new(56, 110, 10, 6)),
        ];
        let v = view(&matches);

        assert_eq!(v.find_above("gorgon", 1.0), vec![1]);
        assert!(v.find_below("gorgon", 1.0).is_empty());
        assert_eq!(v.find_below("apli", 1.0), vec![2]);
        assert!(v.has("apli", 1.0));
    }

    #[test]
    fn test_overlap_threshold() {
        // support sticking out to the right: 6 of 12 columns overlap
        let matches = vec![
            m("oligon", Rect::new(50, 96, 24, 8)),
            m("gorgon", Rect::new(68, 80, 12, 8)),
        ];
        let v = view(&matches);

        assert!(v.overlaps(&matches[1], 0.5));
        assert!(!v.overlaps(&matches[1], 0.9));
        assert!(v.center_overlaps(&matches[1]));
    }

    #[test]
    fn test_disjoint_support_not_found_at_full_threshold() {
        let matches = vec![
            m("oligon", Rect::new(50, 96, 24, 8)),
            m("gorgon", Rect::new(100, 80, 12, 8)),
        ];
        let v = view(&matches);

        assert!(!v.has("gorgon", 1.0));
        // a gap is a negative intersection, so even zero threshold fails
        assert!(!v.has("gorgon", 0.0));
    }

    #[test]
    fn test_remove_and_remove_label() {
        let matches = vec![
            m("oligon", Rect::new(50, 96, 24, 8)),
            m("gorgon", Rect::new(55, 80, 12, 8)),
            m("klasma", Rect::new(56, 108, 12, 8)),
        ];
        let mut v = view(&matches);

        v.remove(2);
        assert_eq!(v.support, vec![1]);
        v.remove_label("gorgon");
        assert!(v.support.is_empty());
    }
}
