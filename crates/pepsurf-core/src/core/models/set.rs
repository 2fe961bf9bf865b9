use super::residue::Residue;
use itertools::Itertools;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[error("Invalid residue data for {chain_id}/{seq_index}: {reason}")]
pub struct ResidueDataError {
    pub chain_id: char,
    pub seq_index: isize,
    pub reason: String,
}

/// Validated, read-only collection of residues in parser order.
#[derive(Debug, Clone, Default)]
pub struct ResidueSet {
    residues: Vec<Residue>,
}

impl ResidueSet {
    /// Validates parser output and wraps it.
    ///
    /// Fails on the first residue that has no position, a non-finite
    /// coordinate, a code that is not an ASCII letter, or a duplicated
    /// `(chain_id, seq_index)` pair.
    pub fn new(residues: Vec<Residue>) -> Result<Self, ResidueDataError> {
        let mut seen = HashSet::with_capacity(residues.len());
        for residue in &residues {
            let fail = |reason: &str| ResidueDataError {
                chain_id: residue.chain_id(),
                seq_index: residue.seq_index(),
                reason: reason.to_string(),
            };

            if !residue.code().is_ascii_alphabetic() {
                return Err(fail(&format!(
                    "residue code '{}' is not a letter",
                    residue.code()
                )));
            }
            if residue.position().is_none() {
                return Err(fail("residue has neither a backbone nor a centroid position"));
            }
            let coordinates = residue.backbone().into_iter().chain(residue.centroid());
            for point in coordinates {
                if !point.coords.iter().all(|c| c.is_finite()) {
                    return Err(fail("residue has a non-finite coordinate"));
                }
            }
            if !seen.insert((residue.chain_id(), residue.seq_index())) {
                return Err(fail("duplicate residue in chain"));
            }
        }
        Ok(Self { residues })
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Chain identifiers in order of first appearance.
    pub fn chain_ids(&self) -> Vec<char> {
        self.residues.iter().map(Residue::chain_id).unique().collect()
    }

    /// A new set holding only the residues of one chain.
    pub fn chain(&self, chain_id: char) -> ResidueSet {
        Self {
            residues: self
                .residues
                .iter()
                .filter(|r| r.chain_id() == chain_id)
                .cloned()
                .collect(),
        }
    }
}
