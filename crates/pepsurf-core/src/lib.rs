//! # pepsurf Core Library
//!
//! Geometric and physicochemical analysis of protein surfaces and candidate
//! peptides. Every score is heuristic and comparative; outputs are plain
//! serializable records so they can be shown to people or handed to a text
//! generator as context.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Validated residue data (`ResidueSet`), static
//!   amino-acid tables, the residue alphabet capability and the SASA oracle
//!   capability with its local implementation.
//!
//! - **[`engine`]: The Logic Core.** Configuration, error types, progress
//!   reporting and the individual analysis tasks: surface exposure,
//!   interaction sites, binding pockets, peptide scoring and ranking.
//!
//! - **[`workflows`]: The Public API.** Complete procedures that chain the
//!   engine tasks together: the structure surface pipeline and batch peptide
//!   scoring, ranking and comparison.

pub mod core;
pub mod engine;
pub mod workflows;
