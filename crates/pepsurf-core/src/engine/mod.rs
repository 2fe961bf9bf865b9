//! # Engine Module
//!
//! The analysis layer of pepsurf. It turns validated residues and peptide
//! sequences into ranked, explainable records.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Thresholds and weights for every analysis, with a validating builder
//! - **Error Handling** ([`error`]) - Engine errors, sequence errors and serializable error reports
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events for front ends
//! - **Analysis Tasks** ([`tasks`]) - Exposure, interaction sites, pockets, peptide scoring and ranking
//!
//! Missing data never aborts an analysis. Residues the SASA oracle cannot
//! handle are classified as unknown, and peptide sub-scores that need absent
//! table entries are left empty with an issue recorded on the score card.

pub mod config;
pub mod error;
pub mod progress;
pub mod tasks;
