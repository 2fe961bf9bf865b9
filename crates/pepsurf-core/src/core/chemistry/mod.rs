//! # Chemistry Module
//!
//! Static amino-acid knowledge used by the structural and peptide analyzers.
//!
//! - [`tables`] - Fixed per-residue tables: chemical class, maximum accessible
//!   area, volume, Kyte-Doolittle hydropathy, formal charge, mass and
//!   Chou-Fasman propensities.
//! - [`alphabet`] - The [`alphabet::ResidueAlphabet`] capability with the built-in
//!   standard alphabet and a TOML-loadable extension for non-natural residues.

pub mod alphabet;
pub mod tables;
