//! # Core Module
//!
//! Stateless building blocks shared by every analysis in pepsurf.
//!
//! ## Overview
//!
//! Nothing in this layer knows about scoring policies or thresholds. It holds
//! the validated residue model produced at the parser boundary, the static
//! amino-acid knowledge the analyzers consult, and the SASA oracle capability
//! through which per-residue surface areas enter the system.
//!
//! ## Architecture
//!
//! - **Residue Model** ([`models`]) - Immutable residues, lightweight references and the validated residue set
//! - **Chemistry** ([`chemistry`]) - Per-residue tables and the pluggable residue alphabet
//! - **Surface Area** ([`sasa`]) - The oracle trait, a local Shrake-Rupley oracle, timeouts and caching
//! - **Utilities** ([`utils`]) - Sphere geometry helpers

pub mod chemistry;
pub mod models;
pub mod sasa;
pub mod utils;
