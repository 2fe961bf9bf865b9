use super::tables::{self, ChemicalClass, EXTENDED_CODES, Propensity};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Lookup capability for per-residue physicochemical data.
///
/// A code can be *recognized* (so sequences containing it validate) while
/// still lacking individual entries; callers treat a missing entry as an
/// unknown value for whatever they were computing, not as a hard failure.
pub trait ResidueAlphabet: Send + Sync {
    fn recognizes(&self, code: char) -> bool;
    fn chemical_class(&self, code: char) -> Option<ChemicalClass>;
    fn hydropathy(&self, code: char) -> Option<f64>;
    fn formal_charge(&self, code: char) -> Option<f64>;
    fn residue_mass(&self, code: char) -> Option<f64>;
    fn propensity(&self, code: char) -> Option<Propensity>;
}

/// The 20 standard amino acids plus the IUPAC extended letters (B, Z, X, U, O).
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardAlphabet;

impl ResidueAlphabet for StandardAlphabet {
    fn recognizes(&self, code: char) -> bool {
        tables::is_standard(code) || EXTENDED_CODES.contains(&code)
    }

    fn chemical_class(&self, code: char) -> Option<ChemicalClass> {
        tables::chemical_class(code)
    }

    fn hydropathy(&self, code: char) -> Option<f64> {
        tables::hydropathy(code)
    }

    fn formal_charge(&self, code: char) -> Option<f64> {
        tables::formal_charge(code)
    }

    fn residue_mass(&self, code: char) -> Option<f64> {
        tables::residue_mass(code)
    }

    fn propensity(&self, code: char) -> Option<Propensity> {
        tables::propensity(code)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExtendedResidue {
    pub class: Option<ChemicalClass>,
    pub hydropathy: Option<f64>,
    pub charge: Option<f64>,
    pub mass: Option<f64>,
    pub propensity: Option<Propensity>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExtendedAlphabetFile {
    residues: HashMap<String, ExtendedResidue>,
}

#[derive(Debug, Error)]
pub enum AlphabetLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid residue code '{code}' in '{path}': codes must be a single letter")]
    InvalidCode { path: String, code: String },
}

/// Non-natural residue codes layered over [`StandardAlphabet`].
///
/// Entries from the file take precedence; any field left out of an entry
/// falls through to the standard tables (which usually have nothing for it).
#[derive(Debug, Clone, Default)]
pub struct ExtendedAlphabet {
    extra: HashMap<char, ExtendedResidue>,
}

impl ExtendedAlphabet {
    pub fn new(extra: HashMap<char, ExtendedResidue>) -> Self {
        Self { extra }
    }

    pub fn load(path: &Path) -> Result<Self, AlphabetLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| AlphabetLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content, &path.to_string_lossy())
    }

    fn from_toml_str(content: &str, origin: &str) -> Result<Self, AlphabetLoadError> {
        let file: ExtendedAlphabetFile =
            toml::from_str(content).map_err(|e| AlphabetLoadError::Toml {
                path: origin.to_string(),
                source: e,
            })?;

        let mut extra = HashMap::with_capacity(file.residues.len());
        for (key, entry) in file.residues {
            let mut chars = key.chars();
            let code = match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphabetic() => c.to_ascii_uppercase(),
                _ => {
                    return Err(AlphabetLoadError::InvalidCode {
                        path: origin.to_string(),
                        code: key,
                    });
                }
            };
            extra.insert(code, entry);
        }
        Ok(Self { extra })
    }

    pub fn len(&self) -> usize {
        self.extra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extra.is_empty()
    }
}

impl ResidueAlphabet for ExtendedAlphabet {
    fn recognizes(&self, code: char) -> bool {
        self.extra.contains_key(&code) || StandardAlphabet.recognizes(code)
    }

    fn chemical_class(&self, code: char) -> Option<ChemicalClass> {
        self.extra
            .get(&code)
            .and_then(|e| e.class)
            .or_else(|| StandardAlphabet.chemical_class(code))
    }

    fn hydropathy(&self, code: char) -> Option<f64> {
        self.extra
            .get(&code)
            .and_then(|e| e.hydropathy)
            .or_else(|| StandardAlphabet.hydropathy(code))
    }

    fn formal_charge(&self, code: char) -> Option<f64> {
        self.extra
            .get(&code)
            .and_then(|e| e.charge)
            .or_else(|| StandardAlphabet.formal_charge(code))
    }

    fn residue_mass(&self, code: char) -> Option<f64> {
        self.extra
            .get(&code)
            .and_then(|e| e.mass)
            .or_else(|| StandardAlphabet.residue_mass(code))
    }

    fn propensity(&self, code: char) -> Option<Propensity> {
        self.extra
            .get(&code)
            .and_then(|e| e.propensity)
            .or_else(|| StandardAlphabet.propensity(code))
    }
}
