//! The closed neume vocabulary produced by the interpretation engine.
//!
//! Variant names follow the conventional transliterated neume names; the
//! `#[serde(rename)]` strings are the stable wire names consumed by the
//! downstream score editor and must never change.

use serde::{Deserialize, Serialize};

/// Pitch-movement symbol: the core quantity of a note group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantitativeNeume {
    #[serde(rename = "ison")]
    Ison,

    #[serde(rename = "oligon")]
    Oligon,
    #[serde(rename = "oligonKentimaBelow")]
    OligonPlusKentimaBelow,
    #[serde(rename = "oligonKentimaAbove")]
    OligonPlusKentimaAbove,
    #[serde(rename = "oligonYpsiliRight")]
    OligonPlusHypsiliRight,
    #[serde(rename = "oligonYpsiliLeft")]
    OligonPlusHypsiliLeft,
    #[serde(rename = "oligonKentimaYpsiliRight")]
    OligonPlusHypsiliPlusKentimaHorizontal,
    #[serde(rename = "oligonKentimaYpsiliMiddle")]
    OligonPlusHypsiliPlusKentimaVertical,
    #[serde(rename = "oligonDoubleYpsili")]
    OligonPlusDoubleHypsili,
    #[serde(rename = "oligonKentimataDoubleYpsili")]
    OligonKentimataDoubleYpsili,
    #[serde(rename = "oligonKentimaDoubleYpsiliRight")]
    OligonKentimaDoubleYpsiliRight,
    #[serde(rename = "oligonKentimaDoubleYpsiliLeft")]
    OligonKentimaDoubleYpsiliLeft,
    #[serde(rename = "oligonTripleYpsili")]
    OligonTripleYpsili,
    #[serde(rename = "oligonKentimataTripleYpsili")]
    OligonKentimataTripleYpsili,
    #[serde(rename = "oligonKentimaTripleYpsili")]
    OligonKentimaTripleYpsili,

    #[serde(rename = "petastiIson")]
    PetastiWithIson,
    #[serde(rename = "petasti")]
    Petasti,
    #[serde(rename = "petastiOligon")]
    PetastiPlusOligon,
    #[serde(rename = "petastiKentima")]
    PetastiPlusKentimaAbove,
    #[serde(rename = "petastiYpsiliRight")]
    PetastiPlusHypsiliRight,
    #[serde(rename = "petastiYpsiliLeft")]
    PetastiPlusHypsiliLeft,
    #[serde(rename = "petastiKentimaYpsiliRight")]
    PetastiPlusHypsiliPlusKentimaHorizontal,
    #[serde(rename = "petastiKentimaYpsiliMiddle")]
    PetastiPlusHypsiliPlusKentimaVertical,
    #[serde(rename = "petastiDoubleYpsili")]
    PetastiPlusDoubleHypsili,
    #[serde(rename = "petastiKentimataDoubleYpsili")]
    PetastiKentimataDoubleYpsili,
    #[serde(rename = "petastiKentimaDoubleYpsiliRight")]
    PetastiKentimaDoubleYpsiliRight,
    #[serde(rename = "petastiKentimaDoubleYpsiliLeft")]
    PetastiKentimaDoubleYpsiliLeft,
    #[serde(rename = "petastiTripleYpsili")]
    PetastiTripleYpsili,
    #[serde(rename = "petastiKentimataTripleYpsili")]
    PetastiKentimataTripleYpsili,
    #[serde(rename = "petastiKentimaTripleYpsili")]
    PetastiKentimaTripleYpsili,

    #[serde(rename = "apostrofos")]
    Apostrophos,
    #[serde(rename = "elafron")]
    Elaphron,
    #[serde(rename = "elafronApostrofos")]
    ElaphronPlusApostrophos,
    #[serde(rename = "chamili")]
    Hamili,
    #[serde(rename = "chamiliApostrofos")]
    HamiliPlusApostrophos,
    #[serde(rename = "chamiliElafron")]
    HamiliPlusElaphron,
    #[serde(rename = "chamiliElafronApostrofos")]
    HamiliPlusElaphronPlusApostrophos,
    #[serde(rename = "doubleChamili")]
    DoubleHamili,
    #[serde(rename = "doubleChamiliApostrofos")]
    DoubleHamiliApostrofos,
    #[serde(rename = "doubleChamiliElafron")]
    DoubleHamiliElafron,
    #[serde(rename = "doubleChamiliElafronApostrofos")]
    DoubleHamiliElafronApostrofos,
    #[serde(rename = "tripleChamili")]
    TripleHamili,

    #[serde(rename = "petastiApostrofos")]
    PetastiPlusApostrophos,
    #[serde(rename = "petastiElafron")]
    PetastiPlusElaphron,
    #[serde(rename = "petastiElafronApostrofos")]
    PetastiPlusElaphronPlusApostrophos,
    #[serde(rename = "petastiChamili")]
    PetastiHamili,
    #[serde(rename = "petastiChamiliApostrofos")]
    PetastiHamiliApostrofos,
    #[serde(rename = "petastiChamiliElafron")]
    PetastiHamiliElafron,
    #[serde(rename = "petastiChamiliElafronApostrofos")]
    PetastiHamiliElafronApostrofos,
    #[serde(rename = "petastiDoubleChamili")]
    PetastiDoubleHamili,
    #[serde(rename = "petastiDoubleChamiliApostrofos")]
    PetastiDoubleHamiliApostrofos,

    #[serde(rename = "oligonKentimataAbove")]
    OligonPlusKentemata,
    #[serde(rename = "oligonKentimataBelow")]
    KentemataPlusOligon,
    #[serde(rename = "oligonIsonKentimata")]
    OligonPlusIsonPlusKentemata,
    #[serde(rename = "oligonApostrofosKentimata")]
    OligonPlusApostrophosPlusKentemata,
    #[serde(rename = "oligonYporroiKentimata")]
    OligonPlusHyporoePlusKentemata,
    #[serde(rename = "oligonElafronKentimata")]
    OligonPlusElaphronPlusKentemata,
    #[serde(rename = "oligonElafronApostrofosKentimata")]
    OligonPlusElaphronPlusApostrophosPlusKentemata,
    #[serde(rename = "oligonChamiliKentimata")]
    OligonPlusHamiliPlusKentemata,

    #[serde(rename = "runningElafron")]
    RunningElaphron,
    #[serde(rename = "yporroi")]
    Hyporoe,
    #[serde(rename = "petastiRunningElafron")]
    PetastiPlusRunningElaphron,
    #[serde(rename = "petastiYporroi")]
    PetastiPlusHyporoe,

    #[serde(rename = "oligonIson")]
    OligonPlusIson,
    #[serde(rename = "oligonApostrofos")]
    OligonPlusApostrophos,
    #[serde(rename = "oligonElafron")]
    OligonPlusElaphron,
    #[serde(rename = "oligonYporroi")]
    OligonPlusHyporoe,
    #[serde(rename = "oligonElafronApostrofos")]
    OligonPlusElaphronPlusApostrophos,
    #[serde(rename = "oligonChamili")]
    OligonPlusHamili,

    #[serde(rename = "kentima")]
    Kentima,
    #[serde(rename = "oligonKentimaMiddle")]
    OligonPlusKentima,
    #[serde(rename = "kentimata")]
    Kentemata,

    #[serde(rename = "apostrofosSyndesmos")]
    DoubleApostrophos,
    #[serde(rename = "oligonRunningElafronKentimata")]
    OligonPlusRunningElaphronPlusKentemata,
    #[serde(rename = "isonApostrofos")]
    IsonPlusApostrophos,
    #[serde(rename = "oligonKentimaMiddleKentimata")]
    OligonKentimaMiddleKentimata,
    #[serde(rename = "oligonYpsiliLeftKentimata")]
    OligonPlusKentemataPlusHypsiliLeft,
    #[serde(rename = "oligonYpsiliRightKentimata")]
    OligonPlusKentemataPlusHypsiliRight,

    #[serde(rename = "leimma1")]
    VareiaDotted,
    #[serde(rename = "leimma2")]
    VareiaDotted2,
    #[serde(rename = "leimma3")]
    VareiaDotted3,
    #[serde(rename = "leimma4")]
    VareiaDotted4,
    #[serde(rename = "stavros")]
    Cross,
    #[serde(rename = "breath")]
    Breath,
}

/// Duration marker attached above or below a base neume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeNeume {
    #[serde(rename = "klasmaAbove")]
    KlasmaTop,
    #[serde(rename = "klasmaBelow")]
    KlasmaBottom,

    #[serde(rename = "apli")]
    Hapli,
    #[serde(rename = "dipli")]
    Dipli,
    #[serde(rename = "tripli")]
    Tripli,
    #[serde(rename = "tetrapli")]
    Tetrapli,

    #[serde(rename = "koronis")]
    Koronis,
}

/// Speed-up (or slow-down) marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GorgonNeume {
    #[serde(rename = "gorgonAbove")]
    GorgonTop,
    #[serde(rename = "gorgonBelow")]
    GorgonBottom,
    #[serde(rename = "digorgon")]
    Digorgon,
    #[serde(rename = "trigorgon")]
    Trigorgon,

    #[serde(rename = "gorgonDottedLeft")]
    GorgonDottedLeft,
    #[serde(rename = "gorgonDottedRight")]
    GorgonDottedRight,

    #[serde(rename = "digorgonDottedLeftBelow")]
    DigorgonDottedLeft1,
    #[serde(rename = "digorgonDottedLeftAbove")]
    DigorgonDottedLeft2,
    #[serde(rename = "digorgonDottedRight")]
    DigorgonDottedRight,

    #[serde(rename = "trigorgonDottedLeftBelow")]
    TrigorgonDottedLeft1,
    #[serde(rename = "trigorgonDottedLeftAbove")]
    TrigorgonDottedLeft2,
    #[serde(rename = "trigorgonDottedRight")]
    TrigorgonDottedRight,

    #[serde(rename = "argon")]
    Argon,
    #[serde(rename = "diargon")]
    Hemiolion,
    #[serde(rename = "triargon")]
    Diargon,
}

/// Vocal quality marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VocalExpressionNeume {
    #[serde(rename = "vareia")]
    Vareia,
    #[serde(rename = "omalonConnecting")]
    HomalonConnecting,
    #[serde(rename = "omalon")]
    Homalon,
    #[serde(rename = "antikenoma")]
    Antikenoma,
    #[serde(rename = "psifiston")]
    Psifiston,
    #[serde(rename = "heteron")]
    Heteron,
    #[serde(rename = "heteronConnecting")]
    HeteronConnecting,
    #[serde(rename = "endofonon")]
    Endofonon,
    #[serde(rename = "stavrosAbove")]
    CrossTop,
}

/// Tempo sign produced by a kronos group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TempoSign {
    #[serde(rename = "agogiPoliArgi")]
    VerySlow,
    #[serde(rename = "agogiArgoteri")]
    Slower,
    #[serde(rename = "agogiArgi")]
    Slow,
    #[serde(rename = "agogiMetria")]
    Medium,
    #[serde(rename = "agogiMesi")]
    Moderate,
    #[serde(rename = "agogiGorgi")]
    Quick,
    #[serde(rename = "agogiGorgoteri")]
    Quicker,
    #[serde(rename = "agogiPoliGorgi")]
    VeryQuick,
}

/// Chromatic-scale change marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fthora {
    #[serde(rename = "fthoraDiatonicNiLowAbove")]
    DiatonicNiLowTop,
    #[serde(rename = "fthoraDiatonicPaAbove")]
    DiatonicPaTop,
    #[serde(rename = "fthoraDiatonicVouAbove")]
    DiatonicVouTop,
    #[serde(rename = "fthoraDiatonicGaAbove")]
    DiatonicGaTop,
    #[serde(rename = "fthoraDiatonicDiAbove")]
    DiatonicThiTop,
    #[serde(rename = "fthoraDiatonicKeAbove")]
    DiatonicKeTop,
    #[serde(rename = "fthoraDiatonicZoAbove")]
    DiatonicZoTop,
    #[serde(rename = "fthoraDiatonicNiHighAbove")]
    DiatonicNiHighTop,
    #[serde(rename = "fthoraHardChromaticPaAbove")]
    HardChromaticPaTop,
    #[serde(rename = "fthoraHardChromaticDiAbove")]
    HardChromaticThiTop,
    #[serde(rename = "fthoraSoftChromaticKeAbove")]
    SoftChromaticPaTop,
    #[serde(rename = "fthoraSoftChromaticDiAbove")]
    SoftChromaticThiTop,
    #[serde(rename = "fthoraEnharmonicAbove")]
    EnharmonicTop,
    #[serde(rename = "chroaZygosAbove")]
    ZygosTop,
    #[serde(rename = "chroaKlitonAbove")]
    KlitonTop,
    #[serde(rename = "chroaSpathiAbove")]
    SpathiTop,

    #[serde(rename = "fthoraDiatonicNiLowBelow")]
    DiatonicNiLowBottom,
    #[serde(rename = "fthoraDiatonicPaBelow")]
    DiatonicPaBottom,
    #[serde(rename = "fthoraDiatonicVouBelow")]
    DiatonicVouBottom,
    #[serde(rename = "fthoraDiatonicGaBelow")]
    DiatonicGaBottom,
    #[serde(rename = "fthoraDiatonicDiBelow")]
    DiatonicThiBottom,
    #[serde(rename = "fthoraDiatonicKeBelow")]
    DiatonicKeBottom,
    #[serde(rename = "fthoraDiatonicZoBelow")]
    DiatonicZoBottom,
    #[serde(rename = "fthoraDiatonicNiHighBelow")]
    DiatonicNiHighBottom,
    #[serde(rename = "fthoraHardChromaticPaBelow")]
    HardChromaticPaBottom,
    #[serde(rename = "fthoraHardChromaticDiBelow")]
    HardChromaticThiBottom,
    #[serde(rename = "fthoraSoftChromaticKeBelow")]
    SoftChromaticPaBottom,
    #[serde(rename = "fthoraSoftChromaticDiBelow")]
    SoftChromaticThiBottom,
    #[serde(rename = "fthoraEnharmonicBelow")]
    EnharmonicBottom,
    #[serde(rename = "chroaZygosBelow")]
    ZygosBottom,
    #[serde(rename = "chroaKlitonBelow")]
    KlitonBottom,
    #[serde(rename = "chroaSpathiBelow")]
    SpathiBottom,

    #[serde(rename = "diesisGenikiAbove")]
    GeneralSharpTop,
    #[serde(rename = "diesisGenikiBelow")]
    GeneralSharpBottom,

    #[serde(rename = "yfesisGenikiAbove")]
    GeneralFlatTop,
    #[serde(rename = "yfesisGenikiBelow")]
    GeneralFlatBottom,
}

/// Microtonal accidental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accidental {
    #[serde(rename = "diesis2")]
    Sharp2Left,
    #[serde(rename = "diesis4")]
    Sharp4Left,
    #[serde(rename = "diesis6")]
    Sharp6Left,
    #[serde(rename = "diesis8")]
    Sharp8Left,

    #[serde(rename = "yfesis2")]
    Flat2Right,
    #[serde(rename = "yfesis4")]
    Flat4Right,
    #[serde(rename = "yfesis6")]
    Flat6Right,
    #[serde(rename = "yfesis8")]
    Flat8Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(value: impl serde::Serialize) -> String {
        serde_json::to_string(&value).unwrap()
    }

    #[test]
    fn test_wire_names_are_stable() {
        assert_eq!(wire(QuantitativeNeume::OligonPlusKentimaAbove), "\"oligonKentimaAbove\"");
        assert_eq!(wire(QuantitativeNeume::DoubleApostrophos), "\"apostrofosSyndesmos\"");
        assert_eq!(wire(QuantitativeNeume::Hamili), "\"chamili\"");
        assert_eq!(wire(TimeNeume::KlasmaTop), "\"klasmaAbove\"");
        assert_eq!(wire(GorgonNeume::GorgonBottom), "\"gorgonBelow\"");
        assert_eq!(wire(TempoSign::VeryQuick), "\"agogiPoliGorgi\"");
        assert_eq!(wire(Fthora::HardChromaticThiTop), "\"fthoraHardChromaticDiAbove\"");
        assert_eq!(wire(Accidental::Flat2Right), "\"yfesis2\"");
    }

    #[test]
    fn test_wire_names_round_trip() {
        let neume: QuantitativeNeume = serde_json::from_str("\"runningElafron\"").unwrap();
        assert_eq!(neume, QuantitativeNeume::RunningElaphron);
        let fthora: Fthora = serde_json::from_str("\"chroaZygosBelow\"").unwrap();
        assert_eq!(fthora, Fthora::ZygosBottom);
    }
}
