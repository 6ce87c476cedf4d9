//! Support-glyph modifiers: the qualifier passes run against every note
//! group after its quantitative neume is resolved, plus the sanity pre-pass
//! that prunes implausible support before anything is interpreted.

#![allow(clippy::cast_precision_loss)]

use neumatic_core::{
    Accidental, Fthora, GorgonNeume, Segmentation, TimeNeume, VocalExpressionNeume,
};

use super::support::{touches_any_textline, GroupView};
use super::NoteDraft;

/// Prunes support glyphs that cannot plausibly belong to this base: marks
/// too far above or below it, mutually exclusive pairs (klasma vs. apli,
/// klasma vs. gorgon, gorgon vs. apli or psifiston) resolved by confidence,
/// and sharps that drifted down into the lyric line.
pub(crate) fn apply_sanity_checks(v: &mut GroupView<'_>, seg: &Segmentation) {
    let base = v.base().bounding_rect;
    let too_low = 2 * seg.oligon_height;
    let too_high = 0.75 * seg.oligon_width as f32;

    for id in v.find_below("apli", 1.0) {
        if v.get(id).bounding_rect.y - base.bottom() >= too_low {
            v.remove(id);
        }
    }
    for id in v.find_below("kentima", 1.0) {
        if v.get(id).bounding_rect.y - base.bottom() >= too_low {
            v.remove(id);
        }
    }
    for id in v.find_above("gorgon", 1.0) {
        if (base.y - v.get(id).bounding_rect.bottom()) as f32 > too_high {
            v.remove(id);
        }
    }
    for id in v.find_above("kentima", 1.0) {
        if (base.y - v.get(id).bounding_rect.bottom()) as f32 > too_high {
            v.remove(id);
        }
    }
    for id in v.find_below("gorgon", 1.0) {
        if v.get(id).bounding_rect.y - base.bottom() >= too_low {
            v.remove(id);
        }
    }

    let apli = v.find_below("apli", 1.0);
    let klasma = v.find("klasma", 1.0);
    if !apli.is_empty() && !klasma.is_empty() {
        if v.max_confidence(&klasma) > v.max_confidence(&apli) {
            v.remove_label("apli");
        } else {
            v.remove_label("klasma");
        }
    }

    let gorgon = v.find("gorgon", 1.0);
    let klasma = v.find("klasma", 1.0);
    if !gorgon.is_empty() && !klasma.is_empty() {
        if v.max_confidence(&klasma) > v.max_confidence(&gorgon) {
            v.remove_label("gorgon");
        } else {
            v.remove_label("klasma");
        }
    }

    let apli = v.find_below("apli", 1.0);
    let gorgon = v.find_below("gorgon", 1.0);
    if !gorgon.is_empty() && !apli.is_empty() {
        if v.max_confidence(&apli) > v.max_confidence(&gorgon) {
            v.remove_label("gorgon");
        } else {
            v.remove_label("apli");
        }
    }

    let psifiston = v.find_below("psifiston", 1.0);
    let gorgon = v.find("gorgon", 1.0);
    if !psifiston.is_empty() && !gorgon.is_empty() {
        if v.max_confidence(&psifiston) > v.max_confidence(&gorgon) {
            v.remove_label("gorgon");
        } else {
            v.remove_label("psifiston");
        }
    }

    let psifiston = v.find_below("psifiston", 1.0);
    let apli = v.find_below("apli", 1.0);
    if !psifiston.is_empty() && !apli.is_empty() {
        if v.max_confidence(&psifiston) > v.max_confidence(&apli) {
            v.remove_label("apli");
        } else {
            v.remove_label("psifiston");
        }
    }

    for sharp_label in ["sharp_2", "sharp_4", "sharp_general"] {
        for id in v.find_below(sharp_label, 1.0) {
            if touches_any_textline(v.get(id), &seg.textlines_adj) {
                v.remove(id);
            }
        }
    }
}

pub(crate) fn apply_antikenoma(e: &mut NoteDraft, v: &GroupView<'_>) {
    if v.has_below("antikenoma", 0.5) {
        e.vocal_expression_neume = Some(VocalExpressionNeume::Antikenoma);
    } else if v.has_below("antikenoma_apli", 0.5) {
        e.vocal_expression_neume = Some(VocalExpressionNeume::Antikenoma);
        e.time_neume = Some(TimeNeume::Hapli);
    }
}

pub(crate) fn apply_gorgon(e: &mut NoteDraft, v: &GroupView<'_>) {
    let gorgons: Vec<usize> = v
        .support
        .iter()
        .copied()
        .filter(|&id| {
            let s = v.get(id);
            s.label.as_deref() == Some("gorgon")
                && (v.left_overlaps(s) || v.overlaps(s, 0.9) || v.center_overlaps(s))
        })
        .collect();

    for id in gorgons {
        let gorgon = v.get(id);
        let paren_left = v.find_above("paren_left", 1.0);
        let paren_right = v.find_above("paren_right", 1.0);

        let above = gorgon.bounding_circle.y <= v.base().bounding_circle.y;

        // A gorgon inside parentheses marks an isokratema part, not tempo.
        if above
            && paren_left
                .first()
                .is_some_and(|&p| v.get(p).bounding_circle.x < gorgon.bounding_circle.x)
        {
            return;
        }
        if above
            && paren_right
                .first()
                .is_some_and(|&p| v.get(p).bounding_circle.x > gorgon.bounding_circle.x)
        {
            return;
        }

        e.gorgon_neume = Some(if above {
            GorgonNeume::GorgonTop
        } else {
            GorgonNeume::GorgonBottom
        });

        // only the first qualifying gorgon counts
        break;
    }
}

pub(crate) fn apply_digorgon(e: &mut NoteDraft, v: &GroupView<'_>) {
    if v.has_above("digorgon", 0.8) {
        e.gorgon_neume = Some(GorgonNeume::Digorgon);
    }
}

pub(crate) fn apply_trigorgon(e: &mut NoteDraft, v: &GroupView<'_>) {
    if v.has_above("trigorgon", 0.8) {
        e.gorgon_neume = Some(GorgonNeume::Trigorgon);
    }
}

pub(crate) fn apply_apli(e: &mut NoteDraft, v: &GroupView<'_>) {
    match v.find_below("apli", 1.0).len() {
        0 => {}
        1 => e.time_neume = Some(TimeNeume::Hapli),
        2 => e.time_neume = Some(TimeNeume::Dipli),
        3 => e.time_neume = Some(TimeNeume::Tripli),
        _ => e.time_neume = Some(TimeNeume::Tetrapli),
    }
}

pub(crate) fn apply_klasma(e: &mut NoteDraft, v: &GroupView<'_>) {
    if let Some(&id) = v.find("klasma", 0.8).first() {
        e.time_neume = Some(if v.get(id).bounding_circle.y <= v.base().bounding_circle.y {
            TimeNeume::KlasmaTop
        } else {
            TimeNeume::KlasmaBottom
        });
    }
}

/// Resolves the group's fthora, shared by note and martyria groups: the
/// highest-confidence fthora-labeled support glyph, provided it overlaps the
/// base, mapped by label and side.
pub(crate) fn resolve_fthora(v: &GroupView<'_>) -> Option<Fthora> {
    let fthora = v
        .support
        .iter()
        .copied()
        .filter(|&id| {
            v.get(id)
                .label
                .as_deref()
                .is_some_and(|l| l.starts_with("fthora"))
        })
        .reduce(|best, id| if v.get(id).confidence > v.get(best).confidence { id } else { best })?;

    let f = v.get(fthora);
    if !(v.overlaps(f, 0.8) || v.center_overlaps(f)) {
        return None;
    }

    let above = f.bounding_rect.y < v.base().bounding_rect.y;
    fthora_for(f.label.as_deref().unwrap_or_default(), above)
}

fn fthora_for(label: &str, above: bool) -> Option<Fthora> {
    let fthora = match (label, above) {
        ("fthora_diatonic_di", true) => Fthora::DiatonicThiTop,
        ("fthora_diatonic_di", false) => Fthora::DiatonicThiBottom,
        ("fthora_diatonic_ke", true) => Fthora::DiatonicKeTop,
        ("fthora_diatonic_ke", false) => Fthora::DiatonicKeBottom,
        ("fthora_diatonic_ni", true) => Fthora::DiatonicNiLowTop,
        ("fthora_diatonic_ni", false) => Fthora::DiatonicNiLowBottom,
        ("fthora_diatonic_ni_high", true) => Fthora::DiatonicNiHighTop,
        ("fthora_diatonic_ni_high", false) => Fthora::DiatonicNiHighBottom,
        ("fthora_diatonic_pa", true) => Fthora::DiatonicPaTop,
        ("fthora_diatonic_pa", false) => Fthora::DiatonicPaBottom,
        ("fthora_diatonic_vou", true) => Fthora::DiatonicVouTop,
        ("fthora_diatonic_vou", false) => Fthora::DiatonicVouBottom,
        ("fthora_enharmonic", true) => Fthora::EnharmonicTop,
        ("fthora_enharmonic", false) => Fthora::EnharmonicBottom,
        ("fthora_hard_chromatic_di", true) => Fthora::HardChromaticThiTop,
        ("fthora_hard_chromatic_di", false) => Fthora::HardChromaticThiBottom,
        ("fthora_hard_chromatic_pa", true) => Fthora::HardChromaticPaTop,
        ("fthora_hard_chromatic_pa", false) => Fthora::HardChromaticPaBottom,
        ("fthora_soft_chromatic_di", true) => Fthora::SoftChromaticThiTop,
        ("fthora_soft_chromatic_di", false) => Fthora::SoftChromaticThiBottom,
        ("fthora_zygos", true) => Fthora::ZygosTop,
        ("fthora_zygos", false) => Fthora::ZygosBottom,
        _ => return None,
    };
    Some(fthora)
}

pub(crate) fn apply_fthora(e: &mut NoteDraft, v: &GroupView<'_>) {
    if let Some(fthora) = resolve_fthora(v) {
        e.fthora = Some(fthora);
    }
}

pub(crate) fn apply_accidental(e: &mut NoteDraft, v: &GroupView<'_>) {
    if v.has_below("sharp_2", 0.5) {
        e.accidental = Some(Accidental::Sharp2Left);
    } else if v.has_below("sharp_4", 0.5) {
        e.accidental = Some(Accidental::Sharp4Left);
    } else if v.has_below("sharp_general", 1.0) {
        e.fthora = Some(Fthora::GeneralSharpBottom);
    } else if v.has_above("sharp_general", 1.0) {
        e.fthora = Some(Fthora::GeneralSharpTop);
    } else if v.has_above("flat_2", 0.5) {
        e.accidental = Some(Accidental::Flat2Right);
    } else if v.has_above("flat_4", 0.5) {
        e.accidental = Some(Accidental::Flat4Right);
    } else if v.has_above("flat_general", 1.0) {
        e.fthora = Some(Fthora::GeneralFlatTop);
    }
}

pub(crate) fn apply_psifiston(e: &mut NoteDraft, v: &GroupView<'_>) {
    if v.has_below("psifiston", 0.75) {
        e.vocal_expression_neume = Some(VocalExpressionNeume::Psifiston);
    }
}

pub(crate) fn apply_heteron(e: &mut NoteDraft, v: &GroupView<'_>) {
    if let Some(&id) = v.find_below("heteron", 0.0).first() {
        if v.get(id).bounding_rect.x > v.base().bounding_rect.x {
            e.vocal_expression_neume = Some(VocalExpressionNeume::HeteronConnecting);
        }
    }
}

pub(crate) fn apply_homalon(e: &mut NoteDraft, v: &GroupView<'_>) {
    if let Some(&id) = v.find_below("omalon", 0.0).first() {
        if v.get(id).bounding_rect.x > v.base().bounding_rect.x {
            e.vocal_expression_neume = Some(if v.has_above("klasma", 1.0) {
                VocalExpressionNeume::Homalon
            } else {
                VocalExpressionNeume::HomalonConnecting
            });
        }
    }
}

pub(crate) fn apply_endofonon(e: &mut NoteDraft, v: &GroupView<'_>) {
    if let Some(&id) = v.find_below("endofonon", 0.0).first() {
        if v.get(id).bounding_rect.x > v.base().bounding_rect.x {
            e.vocal_expression_neume = Some(VocalExpressionNeume::Endofonon);
        }
    }
}

pub(crate) fn apply_stavros(e: &mut NoteDraft, v: &GroupView<'_>) {
    if v.has("stavros", 0.0) {
        e.vocal_expression_neume = Some(VocalExpressionNeume::CrossTop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::{GroupKind, NeumeGroup};
    use neumatic_core::geometry::{Circle, Rect};
    use neumatic_core::ContourMatch;

    fn m(label: &str, confidence: f32, rect: Rect) -> ContourMatch {
        ContourMatch {
            label: Some(label.to_string()),
            confidence,
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

    fn seg() -> Segmentation {
        Segmentation {
            oligon_width: 20,
            oligon_height: 6,
            baselines: vec![100],
            textlines_adj: vec![130],
            ..Segmentation::default()
        }
    }

    #[test]
    fn test_sanity_drops_apli_too_far_below() {
        let matches = vec![
            m("oligon", 0.9, Rect::new(50, 96, 24, 8)),
            m("apli", 0.9, Rect::new(56, 120, 6, 4)),
        ];
        let mut v = view(&matches);
        apply_sanity_checks(&mut v, &seg());
        assert!(v.support.is_empty());
    }

    #[test]
    fn test_sanity_klasma_vs_gorgon_keeps_higher_confidence() {
        let matches = vec![
            m("oligon", 0.9, Rect::new(50, 96, 24, 8)),
            m("klasma", 0.95, Rect::new(55, 84, 12, 8)),
            m("gorgon", 0.8, Rect::new(56, 85, 10, 8)),
        ];
        let mut v = view(&matches);
        apply_sanity_checks(&mut v, &seg());
        assert_eq!(v.support, vec![1]);
    }

    #[test]
    fn test_sanity_drops_sharp_touching_lyrics() {
        let matches = vec![
            m("oligon", 0.9, Rect::new(50, 96, 24, 8)),
            m("sharp_general", 0.9, Rect::new(56, 126, 8, 10)),
        ];
        let mut v = view(&matches);
        apply_sanity_checks(&mut v, &seg());
        assert!(v.support.is_empty());
    }

    #[test]
    fn test_gorgon_top_and_bottom() {
        let above = vec![
            m("oligon", 0.9, Rect::new(50, 96, 24, 8)),
            m("gorgon", 0.9, Rect::new(55, 84, 12, 8)),
        ];
        let mut e = NoteDraft::default();
        apply_gorgon(&mut e, &view(&above));
        assert_eq!(e.gorgon_neume, Some(GorgonNeume::GorgonTop));

        let below = vec![
            m("oligon", 0.9, Rect::new(50, 96, 24, 8)),
            m("gorgon", 0.9, Rect::new(55, 108, 12, 8)),
        ];
        let mut e = NoteDraft::default();
        apply_gorgon(&mut e, &view(&below));
        assert_eq!(e.gorgon_neume, Some(GorgonNeume::GorgonBottom));
    }

    #[test]
    fn test_gorgon_inside_parenthesis_is_ignored() {
        let matches = vec![
            m("oligon", 0.9, Rect::new(50, 96, 24, 8)),
            m("gorgon", 0.9, Rect::new(58, 84, 12, 8)),
            m("paren_left", 0.9, Rect::new(51, 82, 4, 12)),
        ];
        let mut e = NoteDraft::default();
        apply_gorgon(&mut e, &view(&matches));
        assert_eq!(e.gorgon_neume, None);
    }

    #[test]
    fn test_apli_counts() {
        let matches = vec![
            m("oligon", 0.9, Rect::new(50, 96, 24, 8)),
            m("apli", 0.9, Rect::new(53, 106, 6, 4)),
            m("apli", 0.9, Rect::new(62, 106, 6, 4)),
        ];
        let mut e = NoteDraft::default();
        apply_apli(&mut e, &view(&matches));
        assert_eq!(e.time_neume, Some(TimeNeume::Dipli));
    }

    #[test]
    fn test_fthora_side_and_confidence() {
        let matches = vec![
            m("oligon", 0.9, Rect::new(50, 96, 24, 8)),
            m("fthora_diatonic_pa", 0.7, Rect::new(54, 82, 12, 10)),
            m("fthora_hard_chromatic_di", 0.95, Rect::new(55, 108, 12, 10)),
        ];
        assert_eq!(resolve_fthora(&view(&matches)), Some(Fthora::HardChromaticThiBottom));
    }

    #[test]
    fn test_unknown_fthora_label_maps_to_none() {
        assert_eq!(fthora_for("fthora_kliton", true), None);
        assert_eq!(fthora_for("fthora_diatonic_ke", false), Some(Fthora::DiatonicKeBottom));
    }

    #[test]
    fn test_general_sharp_becomes_fthora_not_accidental() {
        let matches = vec![
            m("oligon", 0.9, Rect::new(50, 96, 24, 8)),
            m("sharp_general", 0.9, Rect::new(56, 82, 8, 10)),
        ];
        let mut e = NoteDraft::default();
        apply_accidental(&mut e, &view(&matches));
        assert_eq!(e.fthora, Some(Fthora::GeneralSharpTop));
        assert_eq!(e.accidental, None);
    }

    #[test]
    fn test_homalon_connecting_without_klasma() {
        let matches = vec![
            m("oligon", 0.9, Rect::new(50, 96, 24, 8)),
            m("omalon", 0.9, Rect::new(58, 108, 14, 5)),
        ];
        let mut e = NoteDraft::default();
        apply_homalon(&mut e, &view(&matches));
        assert_eq!(e.vocal_expression_neume, Some(VocalExpressionNeume::HomalonConnecting));
    }
}
