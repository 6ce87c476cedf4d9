//! Base-label resolvers: decide the quantitative neume of a note group from
//! the support glyphs stacked around its base.
//!
//! The cascades are ordered from most to least specific combination; the
//! thresholds mirror how tightly each supporting glyph is expected to sit
//! over the base in engraved scores.

use neumatic_core::QuantitativeNeume;

use super::support::GroupView;

/// Which side of the base a lone ypsili sits on. Exactly equidistant counts
/// as right.
fn ypsili_is_left(v: &GroupView<'_>, id: usize) -> bool {
    let base = v.base().bounding_rect;
    let x = v.get(id).bounding_circle.x;
    let left = (x - base.x as f32).abs();
    let right = (x - base.right() as f32).abs();
    left < right
}

pub(crate) fn process_ison(v: &GroupView<'_>) -> QuantitativeNeume {
    if v.has("apostrofos", 1.0) {
        return QuantitativeNeume::IsonPlusApostrophos;
    }
    QuantitativeNeume::Ison
}

pub(crate) fn process_apostrofos(v: &GroupView<'_>) -> QuantitativeNeume {
    if v.has("apostrofos", 1.0) {
        return QuantitativeNeume::DoubleApostrophos;
    }
    QuantitativeNeume::Apostrophos
}

pub(crate) fn process_oligon(v: &GroupView<'_>) -> QuantitativeNeume {
    let kentima_below = v.find_below("kentima", 0.9);
    if kentima_below.len() == 1 {
        return QuantitativeNeume::OligonPlusKentimaBelow;
    }
    if kentima_below.len() >= 2 {
        return QuantitativeNeume::KentemataPlusOligon;
    }

    let kentima_above = v.find_above("kentima", 0.1);

    // With at least one kentima up top, a second pitch glyph above means
    // kentemata, even when only one of the two dots was detected.
    if !kentima_above.is_empty() {
        if v.has_above("ison", 1.0) {
            return QuantitativeNeume::OligonPlusIsonPlusKentemata;
        }

        let apostrofos_above = v.find_above("apostrofos", 0.1);
        let elafron_above = v.find_above("elafron", 1.0);
        let has_apostrofos = !apostrofos_above.is_empty();
        let has_elafron = !elafron_above.is_empty();

        if has_apostrofos && !has_elafron {
            return QuantitativeNeume::OligonPlusApostrophosPlusKentemata;
        }
        if !has_apostrofos && has_elafron {
            return QuantitativeNeume::OligonPlusElaphronPlusKentemata;
        }
        if v.has_above("elafron_apostrofos", 1.0) {
            return QuantitativeNeume::OligonPlusElaphronPlusApostrophosPlusKentemata;
        }
        if v.has_above("elafron_syndesmos", 0.8) {
            return QuantitativeNeume::OligonPlusRunningElaphronPlusKentemata;
        }

        // elafron_apostrofos sometimes splits into two detections; the order
        // of the halves tells running elafron apart from elafron+apostrofos
        if has_apostrofos && has_elafron {
            if v.get(apostrofos_above[0]).bounding_rect.x
                < v.get(elafron_above[0]).bounding_rect.x
            {
                return QuantitativeNeume::OligonPlusRunningElaphronPlusKentemata;
            }
            return QuantitativeNeume::OligonPlusElaphronPlusApostrophosPlusKentemata;
        }

        if v.has_above("yporroe", 1.0) {
            return QuantitativeNeume::OligonPlusHyporoePlusKentemata;
        }
        if v.has_above("hamili", 1.0) {
            return QuantitativeNeume::OligonPlusHamiliPlusKentemata;
        }
    }

    if kentima_above.len() >= 2 {
        let ypsili = v.find_above("ypsili", 1.0);
        if ypsili.len() == 1 {
            return if ypsili_is_left(v, ypsili[0]) {
                QuantitativeNeume::OligonPlusKentemataPlusHypsiliLeft
            } else {
                QuantitativeNeume::OligonPlusKentemataPlusHypsiliRight
            };
        }
        if ypsili.len() == 2 {
            return QuantitativeNeume::OligonKentimataDoubleYpsili;
        }
        if ypsili.len() >= 3 {
            return QuantitativeNeume::OligonKentimataTripleYpsili;
        }
        return QuantitativeNeume::OligonPlusKentemata;
    }

    if kentima_above.len() == 1 {
        let ypsili = v.find_above("ypsili", 1.0);
        if ypsili.len() == 1 {
            return if ypsili_is_left(v, ypsili[0]) {
                QuantitativeNeume::OligonPlusHypsiliPlusKentimaVertical
            } else {
                QuantitativeNeume::OligonPlusHypsiliPlusKentimaHorizontal
            };
        }
        if ypsili.len() == 2 {
            return if any_left_of_center(v, &ypsili) {
                QuantitativeNeume::OligonKentimaDoubleYpsiliLeft
            } else {
                QuantitativeNeume::OligonKentimaDoubleYpsiliRight
            };
        }
        if ypsili.len() >= 3 {
            return QuantitativeNeume::OligonKentimaTripleYpsili;
        }
        return QuantitativeNeume::OligonPlusKentimaAbove;
    }

    let ypsili = v.find_above("ypsili", 1.0);
    if ypsili.len() == 1 {
        return if ypsili_is_left(v, ypsili[0]) {
            QuantitativeNeume::OligonPlusHypsiliLeft
        } else {
            QuantitativeNeume::OligonPlusHypsiliRight
        };
    }
    if ypsili.len() == 2 {
        return QuantitativeNeume::OligonPlusDoubleHypsili;
    }
    if ypsili.len() >= 3 {
        return QuantitativeNeume::OligonTripleYpsili;
    }

    if v.has_above("ison", 1.0) {
        return QuantitativeNeume::OligonPlusIson;
    }
    if v.has_above("yporroe", 1.0) {
        return QuantitativeNeume::OligonPlusHyporoe;
    }

    let apostrofos_above = v.has_above("apostrofos", 1.0);
    let elafron_above = v.has_above("elafron", 1.0);

    if apostrofos_above && !elafron_above {
        return QuantitativeNeume::OligonPlusApostrophos;
    }
    if !apostrofos_above && elafron_above {
        return QuantitativeNeume::OligonPlusElaphron;
    }
    if v.has_above("elafron_apostrofos", 1.0) || (elafron_above && apostrofos_above) {
        return QuantitativeNeume::OligonPlusElaphronPlusApostrophos;
    }
    if v.has_above("hamili", 1.0) {
        return QuantitativeNeume::OligonPlusHamili;
    }

    QuantitativeNeume::Oligon
}

/// Resolver for an oligon merged with a separately grouped kentima to its
/// right (the kentima sits in the middle height of the oligon).
pub(crate) fn process_oligon_with_middle_kentima(v: &GroupView<'_>) -> QuantitativeNeume {
    if v.find_above("kentima", 1.0).len() >= 2 {
        return QuantitativeNeume::OligonKentimaMiddleKentimata;
    }
    QuantitativeNeume::OligonPlusKentima
}

pub(crate) fn process_petaste(v: &GroupView<'_>) -> QuantitativeNeume {
    let kentima_above = v.find_above("kentima", 1.0);

    if kentima_above.len() >= 2 {
        let ypsili = v.find_above("ypsili", 1.0);
        if ypsili.len() == 2 {
            return QuantitativeNeume::PetastiKentimataDoubleYpsili;
        }
        if ypsili.len() >= 3 {
            return QuantitativeNeume::PetastiKentimataTripleYpsili;
        }
    }

    if kentima_above.len() == 1 {
        let ypsili = v.find_above("ypsili", 1.0);
        if ypsili.len() == 1 {
            return if ypsili_is_left(v, ypsili[0]) {
                QuantitativeNeume::PetastiPlusHypsiliPlusKentimaVertical
            } else {
                QuantitativeNeume::PetastiPlusHypsiliPlusKentimaHorizontal
            };
        }
        if ypsili.len() == 2 {
            return if any_left_of_center(v, &ypsili) {
                QuantitativeNeume::PetastiKentimaDoubleYpsiliLeft
            } else {
                QuantitativeNeume::PetastiKentimaDoubleYpsiliRight
            };
        }
        if ypsili.len() >= 3 {
            return QuantitativeNeume::PetastiKentimaTripleYpsili;
        }
        return QuantitativeNeume::PetastiPlusKentimaAbove;
    }

    let ypsili = v.find_above("ypsili", 1.0);
    if ypsili.len() == 1 {
        return if ypsili_is_left(v, ypsili[0]) {
            QuantitativeNeume::PetastiPlusHypsiliLeft
        } else {
            QuantitativeNeume::PetastiPlusHypsiliRight
        };
    }
    if ypsili.len() == 2 {
        return QuantitativeNeume::PetastiPlusDoubleHypsili;
    }
    if ypsili.len() >= 3 {
        return QuantitativeNeume::PetastiTripleYpsili;
    }

    if v.has_above("ison", 0.9) {
        return QuantitativeNeume::PetastiWithIson;
    }
    if v.has_above("oligon", 0.9) {
        return QuantitativeNeume::PetastiPlusOligon;
    }
    if v.has_above("yporroe", 1.0) {
        return QuantitativeNeume::PetastiPlusHyporoe;
    }

    let hamili = v.find_above("hamili", 1.0);
    if hamili.len() == 1 {
        let apostrofos = v.has("apostrofos", 1.0);
        let elafron = v.has("elafron", 1.0);

        if apostrofos && !elafron {
            return QuantitativeNeume::PetastiHamiliApostrofos;
        }
        if !apostrofos && elafron {
            return QuantitativeNeume::PetastiHamiliElafron;
        }
        if (apostrofos && elafron) || v.has("elafron_apostrofos", 1.0) {
            return QuantitativeNeume::PetastiHamiliElafronApostrofos;
        }
        return QuantitativeNeume::PetastiHamili;
    }
    if hamili.len() >= 2 {
        if v.has("apostrofos", 1.0) {
            return QuantitativeNeume::PetastiDoubleHamiliApostrofos;
        }
        return QuantitativeNeume::PetastiDoubleHamili;
    }

    let apostrofos_above = v.has_above("apostrofos", 1.0);
    let elafron_above = v.has_above("elafron", 1.0);

    if apostrofos_above && !elafron_above {
        return QuantitativeNeume::PetastiPlusApostrophos;
    }
    if !apostrofos_above && elafron_above {
        return QuantitativeNeume::PetastiPlusElaphron;
    }
    if v.has_above("elafron_apostrofos", 1.0) || (elafron_above && apostrofos_above) {
        return QuantitativeNeume::PetastiPlusElaphronPlusApostrophos;
    }

    QuantitativeNeume::Petasti
}

pub(crate) fn process_hamili(v: &GroupView<'_>) -> QuantitativeNeume {
    let hamili = v.find("hamili", 1.0);

    if hamili.len() == 1 {
        let apostrofos = v.has("apostrofos", 1.0);
        let elafron = v.has("elafron", 1.0);

        if apostrofos && !elafron {
            return QuantitativeNeume::DoubleHamiliApostrofos;
        }
        if !apostrofos && elafron {
            return QuantitativeNeume::DoubleHamiliElafron;
        }
        if (apostrofos && elafron) || v.has("elafron_apostrofos", 1.0) {
            return QuantitativeNeume::DoubleHamiliElafronApostrofos;
        }
        return QuantitativeNeume::DoubleHamili;
    }
    if hamili.len() >= 2 {
        return QuantitativeNeume::TripleHamili;
    }

    let apostrofos_above = v.has_above("apostrofos", 1.0);
    let elafron_above = v.has_above("elafron", 1.0);

    if apostrofos_above && !elafron_above {
        return QuantitativeNeume::HamiliPlusApostrophos;
    }
    if !apostrofos_above && elafron_above {
        return QuantitativeNeume::HamiliPlusElaphron;
    }
    if v.has_above("elafron_apostrofos", 1.0) || (elafron_above && apostrofos_above) {
        return QuantitativeNeume::HamiliPlusElaphronPlusApostrophos;
    }

    QuantitativeNeume::Hamili
}

/// True when either of two ypsili sits clearly left of the base's center.
fn any_left_of_center(v: &GroupView<'_>, ypsili: &[usize]) -> bool {
    let base = v.base();
    let cutoff = base.bounding_circle.x - base.bounding_rect.w as f32 / 4.0;
    ypsili.iter().any(|&id| (v.get(id).bounding_rect.x as f32) < cutoff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::{GroupKind, NeumeGroup};
    use neumatic_core::geometry::{Circle, Rect};
    use neumatic_core::ContourMatch;

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
    fn test_plain_oligon() {
        let matches = vec![m("oligon", Rect::new(50, 96, 24, 8))];
        assert_eq!(process_oligon(&view(&matches)), QuantitativeNeume::Oligon);
    }

    #[test]
    fn test_oligon_kentima_below_and_kentemata_below() {
        let one = vec![
            m("oligon", Rect::new(50, 96, 24, 8)),
            m("kentima", Rect::new(58, 108, 6, 6)),
        ];
        assert_eq!(process_oligon(&view(&one)), QuantitativeNeume::OligonPlusKentimaBelow);

        let two = vec![
            m("oligon", Rect::new(50, 96, 24, 8)),
            m("kentima", Rect::new(54, 108, 6, 6)),
            m("kentima", Rect::new(63, 108, 6, 6)),
        ];
        assert_eq!(process_oligon(&view(&two)), QuantitativeNeume::KentemataPlusOligon);
    }

    #[test]
    fn test_oligon_kentemata_above_with_ison() {
        let matches = vec![
            m("oligon", Rect::new(50, 96, 24, 8)),
            m("kentima", Rect::new(54, 84, 6, 6)),
            m("kentima", Rect::new(63, 84, 6, 6)),
            m("ison", Rect::new(52, 72, 20, 6)),
        ];
        assert_eq!(
            process_oligon(&view(&matches)),
            QuantitativeNeume::OligonPlusIsonPlusKentemata
        );
    }

    #[test]
    fn test_oligon_ypsili_sides() {
        // ypsili near the left edge of the base
        let left = vec![
            m("oligon", Rect::new(50, 96, 24, 8)),
            m("ypsili", Rect::new(48, 80, 8, 10)),
        ];
        assert_eq!(process_oligon(&view(&left)), QuantitativeNeume::OligonPlusHypsiliLeft);

        // ypsili near the right edge
        let right = vec![
            m("oligon", Rect::new(50, 96, 24, 8)),
            m("ypsili", Rect::new(68, 80, 8, 10)),
        ];
        assert_eq!(process_oligon(&view(&right)), QuantitativeNeume::OligonPlusHypsiliRight);
    }

    #[test]
    fn test_oligon_ypsili_equidistant_reads_as_right() {
        // circle center exactly over the base center
        let matches = vec![
            m("oligon", Rect::new(50, 96, 24, 8)),
            m("ypsili", Rect::new(58, 80, 8, 10)),
        ];
        assert_eq!(process_oligon(&view(&matches)), QuantitativeNeume::OligonPlusHypsiliRight);
    }

    #[test]
    fn test_oligon_split_running_elafron_above_kentima() {
        // apostrofos half left of the elafron half means running elafron
        let matches = vec![
            m("oligon", Rect::new(50, 96, 24, 8)),
            m("kentima", Rect::new(58, 86, 6, 6)),
            m("apostrofos", Rect::new(50, 72, 10, 6)),
            m("elafron", Rect::new(62, 70, 10, 8)),
        ];
        assert_eq!(
            process_oligon(&view(&matches)),
            QuantitativeNeume::OligonPlusRunningElaphronPlusKentemata
        );
    }

    #[test]
    fn test_ison_and_apostrofos_bases() {
        let ison = vec![
            m("ison", Rect::new(50, 96, 24, 8)),
            m("apostrofos", Rect::new(56, 108, 10, 6)),
        ];
        assert_eq!(process_ison(&view(&ison)), QuantitativeNeume::IsonPlusApostrophos);

        let lone = vec![m("apostrofos", Rect::new(50, 96, 12, 8))];
        assert_eq!(process_apostrofos(&view(&lone)), QuantitativeNeume::Apostrophos);
    }

    #[test]
    fn test_petaste_with_ison_uses_loose_threshold() {
        let matches = vec![
            m("petaste", Rect::new(50, 96, 24, 8)),
            m("ison", Rect::new(51, 80, 22, 6)),
        ];
        assert_eq!(process_petaste(&view(&matches)), QuantitativeNeume::PetastiWithIson);
    }

    #[test]
    fn test_hamili_doubles_up() {
        let matches = vec![
            m("hamili", Rect::new(50, 96, 18, 10)),
            m("hamili", Rect::new(52, 80, 18, 10)),
        ];
        assert_eq!(process_hamili(&view(&matches)), QuantitativeNeume::DoubleHamili);
    }

    #[test]
    fn test_oligon_with_middle_kentima() {
        let plain = vec![m("oligon", Rect::new(50, 96, 24, 8))];
        assert_eq!(
            process_oligon_with_middle_kentima(&view(&plain)),
            QuantitativeNeume::OligonPlusKentima
        );
    }
}
