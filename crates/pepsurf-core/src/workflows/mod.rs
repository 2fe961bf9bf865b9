//! # Workflows Module
//!
//! Top-level entry points that chain engine tasks into complete procedures.
//!
//! - **Surface Workflow** ([`surface`]) - Exposure classification followed by
//!   interaction-site detection and pocket finding for one residue set.
//! - **Peptide Workflow** ([`peptides`]) - Parallel batch scoring, ranking and
//!   pairwise comparison of candidate peptides.
//!
//! Workflows report phases through a [`ProgressReporter`](crate::engine::progress::ProgressReporter)
//! and return serializable reports.

pub mod peptides;
pub mod surface;
