//! Neume grouping.
//!
//! Collects classified matches into groups of one base glyph plus its
//! vertically stacked support glyphs. Ownership is tracked in a claim map
//! (match id to group index) so a glyph belongs to at most one group and
//! the matches themselves are never mutated.

use std::collections::HashMap;

use log::debug;

use neumatic_core::{ContourMatch, Segmentation};

use crate::options::AnalysisOptions;

/// What the group's base glyph is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// A pitch-carrying neume sitting on the baseline.
    Base,
    /// A martyria (pitch confirmation sign) with no base above or below it.
    Martyria,
    /// A kronos (tempo) sign with no base above or below it.
    Kronos,
}

/// One base match and the support matches stacked over or under it.
/// Members are match ids into the page's match list.
#[derive(Debug, Clone)]
pub struct NeumeGroup {
    pub line: i32,
    pub kind: GroupKind,
    pub base: usize,
    pub support: Vec<usize>,
}

const BASE_LABELS: &[&str] = &[
    "ison",
    "oligon",
    "petaste",
    "apostrofos",
    "elafron",
    "elafron_apostrofos",
    "hamili",
    "vareia",
    "kentima",
    "yporroe",
    "stavros",
];

#[must_use]
pub fn is_base_label(label: &str) -> bool {
    BASE_LABELS.contains(&label)
}

fn is_fthora_martyria(label: &str) -> bool {
    label == "fthora_hard_chromatic_di"
}

fn touches_baseline(m: &ContourMatch, baseline: i32) -> bool {
    m.bounding_rect.straddles_row(baseline)
}

fn label(m: &ContourMatch) -> &str {
    m.label.as_deref().unwrap_or_default()
}

/// Groups the page's matches. Candidates are matches with an assigned line,
/// a label, and confidence above the minimum threshold; everything else is
/// invisible to grouping.
#[must_use]
pub fn group_matches(
    matches: &[ContourMatch],
    seg: &Segmentation,
    options: &AnalysisOptions,
) -> Vec<NeumeGroup> {
    let candidates: Vec<usize> = matches
        .iter()
        .enumerate()
        .filter(|(_, m)| {
            m.line >= 0 && m.label.is_some() && m.confidence > options.min_confidence_threshold
        })
        .map(|(i, _)| i)
        .collect();

    // base-eligibility by label and baseline contact, before any promotion
    let mut is_base: Vec<bool> = candidates
        .iter()
        .map(|&id| {
            let m = &matches[id];
            let baseline = seg.baselines.get(m.line as usize).copied();
            is_base_label(label(m)) && baseline.is_some_and(|b| touches_baseline(m, b))
        })
        .collect();

    let mut groups: Vec<NeumeGroup> = Vec::new();
    let mut claims: HashMap<usize, usize> = HashMap::new();

    for pos in 0..candidates.len() {
        let id = candidates[pos];
        let m = &matches[id];

        // An apostrofos stacked directly beneath a previous apostrofos base
        // is the second half of a double apostrofos and acts as a base.
        if !is_base[pos]
            && label(m) == "apostrofos"
            && groups.last().is_some_and(|g| {
                label(&matches[g.base]) == "apostrofos"
                    && !claims.contains_key(&id)
                    && (m.bounding_rect.y - matches[g.base].bounding_rect.bottom()).abs()
                        < seg.oligon_height
            })
        {
            is_base[pos] = true;
        }

        // A breath mark with nothing to attach to stands alone.
        if !is_base[pos]
            && label(m) == "breath"
            && find_base(matches, &candidates, &is_base, pos).is_none()
        {
            is_base[pos] = true;
        }

        let is_martyria = label(m).starts_with("martyria")
            && !label(m).starts_with("martyria_root")
            && m.confidence > options.martyria_confidence_threshold;
        let is_kronos = label(m) == "kronos";

        if is_base[pos] {
            push_group(
                &mut groups,
                &mut claims,
                matches,
                &candidates,
                &is_base,
                pos,
                GroupKind::Base,
            );
        } else if is_martyria || is_kronos {
            // Only trust the prediction when no base neume overlaps it;
            // otherwise it is support for that base.
            if find_base(matches, &candidates, &is_base, pos).is_none() {
                let kind = if is_kronos { GroupKind::Kronos } else { GroupKind::Martyria };
                push_group(&mut groups, &mut claims, matches, &candidates, &is_base, pos, kind);
            } else {
                debug!("demoting {} at {:?} to support", label(m), m.bounding_rect);
            }
        } else if is_fthora_martyria(label(m))
            && m.confidence > options.martyria_confidence_threshold
        {
            // A glyph that reads as either fthora or martyria: with a base in
            // reach it is a fthora (support), without one it is a martyria.
            if find_base(matches, &candidates, &is_base, pos).is_none() {
                push_group(
                    &mut groups,
                    &mut claims,
                    matches,
                    &candidates,
                    &is_base,
                    pos,
                    GroupKind::Martyria,
                );
            }
        }
    }

    groups
}

fn push_group(
    groups: &mut Vec<NeumeGroup>,
    claims: &mut HashMap<usize, usize>,
    matches: &[ContourMatch],
    candidates: &[usize],
    is_base: &[bool],
    pos: usize,
    kind: GroupKind,
) {
    let id = candidates[pos];
    let group_index = groups.len();
    let mut g = NeumeGroup { line: matches[id].line, kind, base: id, support: Vec::new() };

    claims.insert(id, group_index);
    find_support(&mut g, claims, group_index, matches, candidates, is_base, pos);

    groups.push(g);
}

/// Collects support as a contiguous horizontal run around the base: forward
/// while the candidate starts before the base's right edge, backward while it
/// ends after the base's left edge. Base-eligible and already claimed
/// candidates are passed over without stopping the scan.
fn find_support(
    g: &mut NeumeGroup,
    claims: &mut HashMap<usize, usize>,
    group_index: usize,
    matches: &[ContourMatch],
    candidates: &[usize],
    is_base: &[bool],
    pos: usize,
) {
    let m = &matches[candidates[pos]];

    for i in pos + 1..candidates.len() {
        let id = candidates[i];
        let s = &matches[id];

        if s.line != m.line {
            break;
        }
        if s.bounding_rect.x > m.bounding_rect.right() {
            break;
        }
        if is_base[i] || claims.contains_key(&id) {
            continue;
        }

        claims.insert(id, group_index);
        g.support.push(id);
    }

    for i in (0..pos).rev() {
        let id = candidates[i];
        let s = &matches[id];

        if s.line != m.line {
            break;
        }
        if s.bounding_rect.right() < m.bounding_rect.x {
            break;
        }
        if is_base[i] || claims.contains_key(&id) {
            continue;
        }

        claims.insert(id, group_index);
        g.support.push(id);
    }
}

/// Looks right then left along the line for a base neume whose rect spans
/// this match's horizontal center. The first base-labeled candidate in each
/// direction decides: overlap means found, otherwise the direction is dead.
fn find_base(
    matches: &[ContourMatch],
    candidates: &[usize],
    is_base: &[bool],
    pos: usize,
) -> Option<usize> {
    let m = &matches[candidates[pos]];

    for i in pos + 1..candidates.len() {
        let s = &matches[candidates[i]];
        if s.line != m.line {
            break;
        }
        if is_base[i] || is_base_label(label(s)) {
            if s.bounding_rect.spans_x(m.bounding_circle.x) {
                return Some(candidates[i]);
            }
            break;
        }
    }

    for i in (0..pos).rev() {
        let s = &matches[candidates[i]];
        if s.line != m.line {
            break;
        }
        if is_base[i] || is_base_label(label(s)) {
            if s.bounding_rect.spans_x(m.bounding_circle.x) {
                return Some(candidates[i]);
            }
            break;
        }
    }

    None
}
