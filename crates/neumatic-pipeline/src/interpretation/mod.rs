//! Interpretation engine: turns neume groups into scored elements.
//!
//! Groups are consumed in reading order through an explicit cursor; a
//! dispatch on the base label picks the quantitative neume, sometimes
//! absorbing the following group (an oligon with a detached kentima, a
//! split running elafron, a double apostrofos), then the modifier passes
//! decorate the note with whatever else sits in its support.

mod modifiers;
mod resolvers;
mod support;

use log::{debug, warn};

use neumatic_core::{
    Accidental, ContourMatch, ElementComponents, ElementKind, Fthora, GorgonNeume,
    InterpretedElement, MartyriaElement, NoteElement, QuantitativeNeume, Segmentation,
    TempoElement, TempoSign, TimeNeume, VocalExpressionNeume,
};

use crate::grouping::{GroupKind, NeumeGroup};

use modifiers::{
    apply_accidental, apply_antikenoma, apply_apli, apply_digorgon, apply_endofonon,
    apply_fthora, apply_gorgon, apply_heteron, apply_homalon, apply_klasma, apply_psifiston,
    apply_sanity_checks, apply_stavros, apply_trigorgon, resolve_fthora,
};
use resolvers::{
    process_apostrofos, process_hamili, process_ison, process_oligon,
    process_oligon_with_middle_kentima, process_petaste,
};
use support::GroupView;

/// A note under construction; becomes a [`NoteElement`] only once a
/// quantitative neume has been resolved.
#[derive(Debug, Default)]
pub(crate) struct NoteDraft {
    pub quantitative_neume: Option<QuantitativeNeume>,
    pub accidental: Option<Accidental>,
    pub fthora: Option<Fthora>,
    pub gorgon_neume: Option<GorgonNeume>,
    pub time_neume: Option<TimeNeume>,
    pub vocal_expression_neume: Option<VocalExpressionNeume>,
    pub vareia: bool,
}

impl NoteDraft {
    fn into_note(self) -> Option<NoteElement> {
        Some(NoteElement {
            quantitative_neume: self.quantitative_neume?,
            accidental: self.accidental,
            fthora: self.fthora,
            gorgon_neume: self.gorgon_neume,
            time_neume: self.time_neume,
            vocal_expression_neume: self.vocal_expression_neume,
            vareia: self.vareia,
        })
    }
}

/// Interprets the grouped matches of one page. Element ids are indices into
/// the returned list.
#[must_use]
pub fn interpret(
    matches: &[ContourMatch],
    seg: &Segmentation,
    groups: &[NeumeGroup],
) -> Vec<InterpretedElement> {
    let mut elements: Vec<InterpretedElement> = Vec::new();
    let mut vareia = false;

    let mut i = 0;
    while i < groups.len() {
        let mut v = GroupView::new(matches, &groups[i]);
        let next = groups.get(i + 1);
        let next_next = groups.get(i + 2);

        apply_sanity_checks(&mut v, seg);

        let consumed = match v.kind {
            GroupKind::Base => {
                interpret_note(&mut elements, matches, seg, &mut v, next, next_next, &mut vareia)
            }
            GroupKind::Martyria => {
                push_element(
                    &mut elements,
                    &v,
                    ElementKind::Martyria(MartyriaElement { fthora: resolve_fthora(&v) }),
                );
                1
            }
            GroupKind::Kronos => {
                if let Some(sign) = tempo_sign(&v) {
                    push_element(&mut elements, &v, ElementKind::Tempo(TempoElement { sign }));
                } else {
                    warn!("kronos group at {:?} has no tempo qualifier", v.base().bounding_rect);
                }
                1
            }
        };

        i += consumed;
    }

    for (id, e) in elements.iter_mut().enumerate() {
        e.id = id;
    }

    elements
}

/// Resolves one note group, possibly absorbing the next group. Returns how
/// many groups were consumed.
fn interpret_note(
    elements: &mut Vec<InterpretedElement>,
    matches: &[ContourMatch],
    seg: &Segmentation,
    v: &mut GroupView<'_>,
    next: Option<&NeumeGroup>,
    next_next: Option<&NeumeGroup>,
    vareia: &mut bool,
) -> usize {
    let mut consumed = 1;
    let mut draft = NoteDraft::default();
    let base = v.base();

    match v.base_label() {
        "oligon" => {
            let lone_kentima_next = next.filter(|n| {
                let nb = &matches[n.base];
                nb.line == base.line
                    && nb.label.as_deref() == Some("kentima")
                    && !next_next.is_some_and(|nn| {
                        let nnb = &matches[nn.base];
                        nnb.label.as_deref() == Some("kentima") && nnb.line == base.line
                    })
            });

            if let Some(n) = lone_kentima_next {
                absorb(v, n, &mut consumed);
                draft.quantitative_neume = Some(process_oligon_with_middle_kentima(v));
            } else {
                draft.quantitative_neume = Some(process_oligon(v));
            }
        }

        "ison" => draft.quantitative_neume = Some(process_ison(v)),
        "petaste" => draft.quantitative_neume = Some(process_petaste(v)),

        "apostrofos" => {
            draft.quantitative_neume = Some(process_apostrofos(v));

            if draft.quantitative_neume == Some(QuantitativeNeume::Apostrophos) {
                if let Some(n) = next {
                    let nb = &matches[n.base];
                    let nv = GroupView::new(matches, n);

                    if nb.line == base.line
                        && nb.label.as_deref() == Some("elafron")
                        && !nv.has("gorgon", 1.0)
                        && nb.bounding_rect.x - base.bounding_rect.right() <= seg.oligon_width
                    {
                        // the elafron completes a running elafron
                        draft.quantitative_neume = Some(QuantitativeNeume::RunningElaphron);
                        absorb(v, n, &mut consumed);
                    } else if nb.line == base.line
                        && nb.label.as_deref() == Some("petaste")
                        && nv.has_above("elafron", 1.0)
                    {
                        draft.quantitative_neume =
                            Some(QuantitativeNeume::PetastiPlusRunningElaphron);
                        absorb(v, n, &mut consumed);
                    } else if nb.line == base.line
                        && nb.label.as_deref() == Some("apostrofos")
                        && (nb.bounding_rect.y - base.bounding_rect.bottom()).abs()
                            < seg.oligon_height
                    {
                        // vertically stacked pair reads as one symbol
                        draft.quantitative_neume = Some(QuantitativeNeume::DoubleApostrophos);
                        absorb(v, n, &mut consumed);
                    }
                }
            }
        }

        "elafron_syndesmos" => {
            draft.quantitative_neume = Some(QuantitativeNeume::RunningElaphron);
        }
        "yporroe" => draft.quantitative_neume = Some(QuantitativeNeume::Hyporoe),

        "elafron" => {
            draft.quantitative_neume = Some(QuantitativeNeume::Elaphron);

            if v.has("apostrofos", 1.0) {
                draft.quantitative_neume = Some(QuantitativeNeume::ElaphronPlusApostrophos);
            } else if let Some(n) = overlapping_apostrofos_next(matches, v, next) {
                // apostrofos promoted to its own group but drawn onto the
                // elafron: one combined symbol
                draft.quantitative_neume = Some(QuantitativeNeume::ElaphronPlusApostrophos);
                v.support.push(n.base);
                absorb(v, n, &mut consumed);
            }
        }

        "elafron_apostrofos" => {
            draft.quantitative_neume = Some(QuantitativeNeume::ElaphronPlusApostrophos);

            if !v.has("apostrofos", 1.0) {
                if let Some(n) = overlapping_apostrofos_next(matches, v, next) {
                    // the apostrofos half was detected twice
                    v.support.push(n.base);
                    absorb(v, n, &mut consumed);
                }
            }
        }

        "hamili" => draft.quantitative_neume = Some(process_hamili(v)),

        "kentima" => {
            if let Some(n) = next {
                let nb = &matches[n.base];
                if nb.line == base.line && nb.label.as_deref() == Some("kentima") {
                    draft.quantitative_neume = Some(QuantitativeNeume::Kentemata);
                    absorb(v, n, &mut consumed);
                }
            }
        }

        "vareia" => {
            // carried onto the next note rather than emitted on its own
            *vareia = true;
            return consumed;
        }

        "stavros" => {
            draft.quantitative_neume = Some(QuantitativeNeume::Cross);
            push_note(elements, v, draft);
            return consumed;
        }

        "breath" => {
            draft.quantitative_neume = Some(QuantitativeNeume::Breath);
            push_note(elements, v, draft);
            return consumed;
        }

        other => {
            debug!("no resolver for base label {other:?}");
        }
    }

    apply_antikenoma(&mut draft, v);
    apply_gorgon(&mut draft, v);
    apply_digorgon(&mut draft, v);
    apply_trigorgon(&mut draft, v);
    apply_apli(&mut draft, v);
    apply_klasma(&mut draft, v);
    apply_fthora(&mut draft, v);
    apply_accidental(&mut draft, v);
    apply_psifiston(&mut draft, v);
    apply_heteron(&mut draft, v);
    apply_homalon(&mut draft, v);
    apply_endofonon(&mut draft, v);
    apply_stavros(&mut draft, v);

    if *vareia {
        draft.vareia = true;
        *vareia = false;
    }

    push_note(elements, v, draft);

    consumed
}

/// The next group, when its base is an apostrofos drawn over this group's
/// base on the same line.
fn overlapping_apostrofos_next<'g>(
    matches: &[ContourMatch],
    v: &GroupView<'_>,
    next: Option<&'g NeumeGroup>,
) -> Option<&'g NeumeGroup> {
    let n = next?;
    let nb = &matches[n.base];
    let overlapping = nb.line == v.base().line
        && nb.label.as_deref() == Some("apostrofos")
        && (v.center_overlaps(nb) || v.overlaps(nb, 1.0));
    overlapping.then_some(n)
}

fn absorb(v: &mut GroupView<'_>, next: &NeumeGroup, consumed: &mut usize) {
    v.support.extend(next.support.iter().copied());
    *consumed = 2;
}

fn push_note(elements: &mut Vec<InterpretedElement>, v: &GroupView<'_>, draft: NoteDraft) {
    if let Some(note) = draft.into_note() {
        push_element(elements, v, ElementKind::Note(note));
    } else {
        debug!("dropping group at {:?}: no quantitative neume", v.base().bounding_rect);
    }
}

fn push_element(elements: &mut Vec<InterpretedElement>, v: &GroupView<'_>, kind: ElementKind) {
    elements.push(InterpretedElement {
        id: elements.len(),
        line: v.line,
        components: ElementComponents { base: v.base, support: v.support.clone() },
        kind,
    });
}

fn tempo_sign(v: &GroupView<'_>) -> Option<TempoSign> {
    if v.has("gorgon", 1.0) && v.has("argon", 1.0) {
        Some(TempoSign::Medium)
    } else if v.has("gorgon", 1.0) {
        Some(TempoSign::Quick)
    } else if v.has("digorgon", 1.0) {
        Some(TempoSign::Quicker)
    } else if v.has("trigorgon", 1.0) {
        Some(TempoSign::VeryQuick)
    } else if v.has("argon", 1.0) {
        Some(TempoSign::Moderate)
    } else if v.has("diargon", 1.0) {
        Some(TempoSign::Slow)
    } else if v.has("triargon", 1.0) {
        Some(TempoSign::Slower)
    } else {
        None
    }
}
