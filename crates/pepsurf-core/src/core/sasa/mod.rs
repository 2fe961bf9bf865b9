//! # SASA Oracle Module
//!
//! Solvent-accessible surface area is supplied to the exposure analyzer by an
//! opaque *oracle*: a local computation, a wrapper around an external library,
//! or a network service. This module defines that capability and the pieces
//! that make oracles safe to call from the analysis engine.
//!
//! - [`SasaOracle`] - The capability trait: one area (or one failure) per residue
//! - [`shrake_rupley`] - A local, coarse-grained Shrake-Rupley oracle
//! - [`timeout`] - Bounds any oracle call with a fixed time ceiling
//! - [`cache`] - An explicit, caller-owned result cache with capacity and TTL
//!
//! Oracle failures are always per residue. A batch-level failure (for example a
//! timeout) is expressed as every residue in the batch failing, so the analyzer
//! can keep going with whatever it has.

pub mod cache;
pub mod shrake_rupley;
pub mod timeout;

use crate::core::models::residue::Residue;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum OracleError {
    #[error("SASA oracle unavailable: {message}")]
    Unavailable { message: String },

    #[error("SASA oracle timed out after {seconds:.1}s")]
    Timeout { seconds: f64 },

    #[error("SASA oracle has no parameters for residue code '{code}'")]
    UnsupportedResidue { code: char },

    #[error("SASA oracle returned an invalid area: {value}")]
    InvalidValue { value: f64 },
}

impl OracleError {
    /// Machine-readable error kind shared by every oracle failure.
    pub fn kind(&self) -> &'static str {
        "OracleUnavailable"
    }
}

pub type SasaResult = Result<f64, OracleError>;

pub trait SasaOracle: Send + Sync {
    /// Short identifier, used in logs and cache keys.
    fn name(&self) -> &str;

    /// Per-residue SASA in Å², positionally aligned with `residues`.
    fn sasa(&self, residues: &[Residue]) -> Vec<SasaResult>;
}

impl<O: SasaOracle + ?Sized> SasaOracle for Arc<O> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn sasa(&self, residues: &[Residue]) -> Vec<SasaResult> {
        (**self).sasa(residues)
    }
}

impl<O: SasaOracle + ?Sized> SasaOracle for &O {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn sasa(&self, residues: &[Residue]) -> Vec<SasaResult> {
        (**self).sasa(residues)
    }
}
