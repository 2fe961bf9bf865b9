//! Analysis tasks.
//!
//! Each task is a stateless function (or, for peptides, a small analyzer
//! object) over plain records. Structure tasks chain as exposure → sites and
//! pockets; peptide tasks chain as scoring → ranking.

pub mod interaction_sites;
pub mod peptide_scoring;
pub mod pockets;
pub mod ranking;
pub mod surface_exposure;
