//! # Residue Geometry Model
//!
//! The read-only structural input consumed by every analyzer in pepsurf.
//!
//! ## Overview
//!
//! A structure parser (outside this crate) produces one [`residue::Residue`] per
//! amino acid, carrying its one-letter code, sequence index, chain identifier and
//! a 3D position (alpha carbon and/or side-chain centroid). The residues are
//! validated once into a [`set::ResidueSet`]; analyzers never mutate them.
//!
//! - [`residue`] - Residue records and the lightweight [`residue::ResidueRef`]
//! - [`set`] - Validated residue collections and input validation errors
//!
//! ## Usage
//!
//! ```ignore
//! use pepsurf::core::models::{residue::Residue, set::ResidueSet};
//! use nalgebra::Point3;
//!
//! let residues = vec![Residue::new('K', 1, 'A').with_centroid(Point3::new(0.0, 0.0, 0.0))];
//! let set = ResidueSet::new(residues)?;
//! ```

pub mod residue;
pub mod set;
