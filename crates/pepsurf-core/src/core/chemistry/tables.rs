use phf::{Map, Set, phf_map, phf_set};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChemicalClass {
    Hydrophobic,
    ChargedPositive,
    ChargedNegative,
    Polar,
    Aromatic,
    Special,
}

impl ChemicalClass {
    #[inline]
    pub fn is_charged(self) -> bool {
        matches!(self, Self::ChargedPositive | Self::ChargedNegative)
    }

    /// Aliphatic hydrophobics only; aromatics are their own class on protein surfaces.
    #[inline]
    pub fn is_hydrophobic(self) -> bool {
        matches!(self, Self::Hydrophobic)
    }

    /// Aliphatic or aromatic, the sense used for peptide composition.
    #[inline]
    pub fn is_apolar(self) -> bool {
        matches!(self, Self::Hydrophobic | Self::Aromatic)
    }

    #[inline]
    pub fn is_polar(self) -> bool {
        matches!(self, Self::Polar)
    }
}

impl fmt::Display for ChemicalClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ChemicalClass::Hydrophobic => "hydrophobic",
                ChemicalClass::ChargedPositive => "charged-positive",
                ChemicalClass::ChargedNegative => "charged-negative",
                ChemicalClass::Polar => "polar",
                ChemicalClass::Aromatic => "aromatic",
                ChemicalClass::Special => "special",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Propensity {
    pub helix: f64,
    pub sheet: f64,
    pub turn: f64,
}

pub const WATER_MASS: f64 = 18.015;

pub(crate) static STANDARD_CODES: Set<char> = phf_set! {
    'A', 'R', 'N', 'D', 'C', 'E', 'Q', 'G', 'H', 'I',
    'L', 'K', 'M', 'F', 'P', 'S', 'T', 'W', 'Y', 'V',
};

// IUPAC ambiguity and rare proteinogenic codes.
pub(crate) static EXTENDED_CODES: Set<char> = phf_set! { 'B', 'Z', 'X', 'U', 'O' };

static CHEMICAL_CLASS: Map<char, ChemicalClass> = phf_map! {
    'A' => ChemicalClass::Hydrophobic, 'V' => ChemicalClass::Hydrophobic,
    'I' => ChemicalClass::Hydrophobic, 'L' => ChemicalClass::Hydrophobic,
    'M' => ChemicalClass::Hydrophobic,
    'F' => ChemicalClass::Aromatic, 'W' => ChemicalClass::Aromatic, 'Y' => ChemicalClass::Aromatic,
    'K' => ChemicalClass::ChargedPositive, 'R' => ChemicalClass::ChargedPositive,
    'H' => ChemicalClass::ChargedPositive, 'O' => ChemicalClass::ChargedPositive,
    'D' => ChemicalClass::ChargedNegative, 'E' => ChemicalClass::ChargedNegative,
    'S' => ChemicalClass::Polar, 'T' => ChemicalClass::Polar, 'N' => ChemicalClass::Polar,
    'Q' => ChemicalClass::Polar, 'C' => ChemicalClass::Polar, 'U' => ChemicalClass::Polar,
    'G' => ChemicalClass::Special, 'P' => ChemicalClass::Special,
};

// Theoretical maximum accessible surface area in Å² (Tien et al., 2013).
static MAX_ASA: Map<char, f64> = phf_map! {
    'A' => 129.0, 'R' => 274.0, 'N' => 195.0, 'D' => 193.0, 'C' => 167.0,
    'E' => 223.0, 'Q' => 225.0, 'G' => 104.0, 'H' => 224.0, 'I' => 197.0,
    'L' => 201.0, 'K' => 236.0, 'M' => 224.0, 'F' => 240.0, 'P' => 159.0,
    'S' => 155.0, 'T' => 172.0, 'W' => 285.0, 'Y' => 263.0, 'V' => 174.0,
};

// Residue volumes in Å³ (Zamyatnin, 1972).
static RESIDUE_VOLUME: Map<char, f64> = phf_map! {
    'A' => 88.6, 'R' => 173.4, 'N' => 114.1, 'D' => 111.1, 'C' => 108.5,
    'E' => 138.4, 'Q' => 143.8, 'G' => 60.1, 'H' => 153.2, 'I' => 166.7,
    'L' => 166.7, 'K' => 168.6, 'M' => 162.9, 'F' => 189.9, 'P' => 112.7,
    'S' => 89.0, 'T' => 116.1, 'W' => 227.8, 'Y' => 193.6, 'V' => 140.0,
};

// Kyte-Doolittle hydropathy index.
static KYTE_DOOLITTLE: Map<char, f64> = phf_map! {
    'A' => 1.8, 'R' => -4.5, 'N' => -3.5, 'D' => -3.5, 'C' => 2.5,
    'E' => -3.5, 'Q' => -3.5, 'G' => -0.4, 'H' => -3.2, 'I' => 4.5,
    'L' => 3.8, 'K' => -3.9, 'M' => 1.9, 'F' => 2.8, 'P' => -1.6,
    'S' => -0.8, 'T' => -0.7, 'W' => -0.9, 'Y' => -1.3, 'V' => 4.2,
};

// Approximate side-chain charge at physiological pH.
static FORMAL_CHARGE: Map<char, f64> = phf_map! {
    'A' => 0.0, 'R' => 1.0, 'N' => 0.0, 'D' => -1.0, 'C' => 0.0,
    'E' => -1.0, 'Q' => 0.0, 'G' => 0.0, 'H' => 0.1, 'I' => 0.0,
    'L' => 0.0, 'K' => 1.0, 'M' => 0.0, 'F' => 0.0, 'P' => 0.0,
    'S' => 0.0, 'T' => 0.0, 'W' => 0.0, 'Y' => 0.0, 'V' => 0.0,
    'U' => 0.0, 'O' => 1.0,
};

// Average residue masses in Da (free amino acid minus one water).
static RESIDUE_MASS: Map<char, f64> = phf_map! {
    'A' => 71.0788, 'R' => 156.1875, 'N' => 114.1038, 'D' => 115.0886, 'C' => 103.1388,
    'E' => 129.1155, 'Q' => 128.1307, 'G' => 57.0519, 'H' => 137.1411, 'I' => 113.1594,
    'L' => 113.1594, 'K' => 128.1741, 'M' => 131.1926, 'F' => 147.1766, 'P' => 97.1167,
    'S' => 87.0782, 'T' => 101.1051, 'W' => 186.2132, 'Y' => 163.1760, 'V' => 99.1326,
    'U' => 150.0379, 'O' => 237.2982,
};

// Chou-Fasman conformational parameters (P_alpha, P_beta, P_turn).
static CHOU_FASMAN: Map<char, (f64, f64, f64)> = phf_map! {
    'A' => (1.42, 0.83, 0.66), 'C' => (0.70, 1.19, 1.19), 'D' => (1.01, 0.54, 1.46),
    'E' => (1.51, 0.37, 0.74), 'F' => (1.13, 1.38, 0.60), 'G' => (0.57, 0.75, 1.56),
    'H' => (1.00, 0.87, 0.95), 'I' => (1.08, 1.60, 0.47), 'K' => (1.16, 0.74, 1.01),
    'L' => (1.21, 1.30, 0.59), 'M' => (1.45, 1.05, 0.60), 'N' => (0.67, 0.89, 1.56),
    'P' => (0.57, 0.55, 1.52), 'Q' => (1.11, 1.10, 0.98), 'R' => (0.98, 0.93, 0.95),
    'S' => (0.77, 0.75, 1.43), 'T' => (0.83, 1.19, 0.96), 'V' => (1.06, 1.70, 0.50),
    'W' => (1.08, 1.37, 0.96), 'Y' => (0.69, 1.47, 1.14),
};

// Side-chain pKa and charge sign of ionizable residues (EMBOSS values).
static SIDE_CHAIN_PKA: Map<char, (f64, f64)> = phf_map! {
    'D' => (3.65, -1.0), 'E' => (4.25, -1.0), 'C' => (8.18, -1.0), 'Y' => (10.07, -1.0),
    'H' => (6.00, 1.0), 'K' => (10.53, 1.0), 'R' => (12.48, 1.0),
};

pub const PKA_N_TERMINUS: f64 = 9.69;
pub const PKA_C_TERMINUS: f64 = 2.34;

pub fn is_standard(code: char) -> bool {
    STANDARD_CODES.contains(&code)
}

pub fn chemical_class(code: char) -> Option<ChemicalClass> {
    CHEMICAL_CLASS.get(&code).copied()
}

pub fn max_asa(code: char) -> Option<f64> {
    MAX_ASA.get(&code).copied()
}

pub fn residue_volume(code: char) -> Option<f64> {
    RESIDUE_VOLUME.get(&code).copied()
}

pub fn hydropathy(code: char) -> Option<f64> {
    KYTE_DOOLITTLE.get(&code).copied()
}

pub fn formal_charge(code: char) -> Option<f64> {
    FORMAL_CHARGE.get(&code).copied()
}

pub fn residue_mass(code: char) -> Option<f64> {
    RESIDUE_MASS.get(&code).copied()
}

/// `(pKa, sign)` of an ionizable side chain, where `sign` is `+1` for bases
/// and `-1` for acids.
pub fn side_chain_pka(code: char) -> Option<(f64, f64)> {
    SIDE_CHAIN_PKA.get(&code).copied()
}

pub fn propensity(code: char) -> Option<Propensity> {
    CHOU_FASMAN
        .get(&code)
        .map(|&(helix, sheet, turn)| Propensity { helix, sheet, turn })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_standard_code_has_complete_tables() {
        for &code in STANDARD_CODES.iter() {
            assert!(chemical_class(code).is_some(), "class for {code}");
            assert!(max_asa(code).is_some(), "max ASA for {code}");
            assert!(residue_volume(code).is_some(), "volume for {code}");
            assert!(hydropathy(code).is_some(), "hydropathy for {code}");
            assert!(formal_charge(code).is_some(), "charge for {code}");
            assert!(residue_mass(code).is_some(), "mass for {code}");
            assert!(propensity(code).is_some(), "propensity for {code}");
        }
    }

    #[test]
    fn extended_codes_are_not_standard() {
        for &code in EXTENDED_CODES.iter() {
            assert!(!is_standard(code));
            assert!(propensity(code).is_none());
        }
    }

    #[test]
    fn classification_matches_chemistry() {
        assert_eq!(chemical_class('K'), Some(ChemicalClass::ChargedPositive));
        assert_eq!(chemical_class('E'), Some(ChemicalClass::ChargedNegative));
        assert_eq!(chemical_class('W'), Some(ChemicalClass::Aromatic));
        assert_eq!(chemical_class('L'), Some(ChemicalClass::Hydrophobic));
        assert_eq!(chemical_class('S'), Some(ChemicalClass::Polar));
        assert_eq!(chemical_class('P'), Some(ChemicalClass::Special));
        assert_eq!(chemical_class('X'), None);
    }

    #[test]
    fn class_predicates_are_consistent() {
        assert!(ChemicalClass::ChargedNegative.is_charged());
        assert!(!ChemicalClass::Aromatic.is_hydrophobic());
        assert!(ChemicalClass::Aromatic.is_apolar());
        assert!(ChemicalClass::Polar.is_polar());
        assert!(!ChemicalClass::Special.is_apolar());
    }

    #[test]
    fn ionizable_side_chains_carry_their_sign() {
        assert_eq!(side_chain_pka('K'), Some((10.53, 1.0)));
        assert_eq!(side_chain_pka('D').map(|(_, sign)| sign), Some(-1.0));
        assert_eq!(side_chain_pka('A'), None);
    }

    #[test]
    fn class_display_uses_kebab_case() {
        assert_eq!(ChemicalClass::ChargedPositive.to_string(), "charged-positive");
    }
}
