use nalgebra::Point3;
use serde::Serialize;
use std::fmt;

/// A single residue as delivered by the structure parser.
///
/// Residues are immutable once constructed; analyzers only ever read them.
/// At least one of `backbone` or `centroid` must be present for the residue
/// to pass [`ResidueSet`](super::set::ResidueSet) validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Residue {
    code: char,                         // One-letter amino-acid code, uppercase
    seq_index: isize,                   // Residue sequence number from the source structure
    chain_id: char,                     // Identifier of the parent chain
    backbone: Option<Point3<f64>>,      // Alpha-carbon position
    centroid: Option<Point3<f64>>,      // Side-chain centroid position
}

impl Residue {
    pub fn new(code: char, seq_index: isize, chain_id: char) -> Self {
        Self {
            code: code.to_ascii_uppercase(),
            seq_index,
            chain_id,
            backbone: None,
            centroid: None,
        }
    }

    pub fn with_backbone(mut self, position: Point3<f64>) -> Self {
        self.backbone = Some(position);
        self
    }

    pub fn with_centroid(mut self, position: Point3<f64>) -> Self {
        self.centroid = Some(position);
        self
    }

    #[inline]
    pub fn code(&self) -> char {
        self.code
    }

    #[inline]
    pub fn seq_index(&self) -> isize {
        self.seq_index
    }

    #[inline]
    pub fn chain_id(&self) -> char {
        self.chain_id
    }

    pub fn backbone(&self) -> Option<&Point3<f64>> {
        self.backbone.as_ref()
    }

    pub fn centroid(&self) -> Option<&Point3<f64>> {
        self.centroid.as_ref()
    }

    /// The position used for all distance calculations: the side-chain
    /// centroid when known, otherwise the backbone atom.
    pub fn position(&self) -> Option<Point3<f64>> {
        self.centroid.or(self.backbone)
    }

    pub fn to_ref(&self) -> ResidueRef {
        ResidueRef {
            chain_id: self.chain_id,
            seq_index: self.seq_index,
            code: self.code,
        }
    }
}

/// Lightweight reference to a residue, carried by every analysis record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ResidueRef {
    pub chain_id: char,
    pub seq_index: isize,
    pub code: char,
}

impl fmt::Display for ResidueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}:{}", self.code, self.seq_index, self.chain_id)
    }
}
