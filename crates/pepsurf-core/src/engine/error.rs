use super::config::ConfigError;
use crate::core::chemistry::alphabet::AlphabetLoadError;
use crate::core::models::set::ResidueDataError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum SequenceError {
    #[error("Peptide sequence is empty")]
    Empty,

    #[error("Peptide sequence has {length} residues; the maximum is {max}")]
    TooLong { length: usize, max: usize },

    #[error("Unrecognized residue '{character}' at position {position}")]
    InvalidCharacter { character: char, position: usize },
}

/// A sub-score that could not be computed because a residue lacks the
/// required table entry. Recorded on the score card, never raised.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum ScoreError {
    #[error("No data for residue code '{code}' at position {position}")]
    UnknownResidueCode { code: char, position: usize },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    InvalidResidueData(#[from] ResidueDataError),

    #[error("Invalid peptide sequence: {0}")]
    InvalidSequence(#[from] SequenceError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Residue alphabet could not be loaded: {0}")]
    Alphabet(#[from] AlphabetLoadError),

    #[error("Internal logic error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Stable, machine-readable name of the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InvalidResidueData(_) => "InvalidResidueData",
            EngineError::InvalidSequence(_) => "InvalidSequence",
            EngineError::Config(_) => "InvalidConfiguration",
            EngineError::Alphabet(_) => "AlphabetLoadError",
            EngineError::Internal(_) => "Internal",
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

/// Serializable form of an error for structured output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub kind: &'static str,
    pub message: String,
}
