use crate::core::models::set::ResidueSet;
use crate::core::sasa::SasaOracle;
use crate::core::sasa::cache::SasaCache;
use crate::core::sasa::shrake_rupley::ShrakeRupleyOracle;
use crate::core::sasa::timeout::TimeoutOracle;
use crate::engine::config::{AnalysisConfig, OracleConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::engine::tasks::interaction_sites::{self, InteractionSite};
use crate::engine::tasks::pockets::{self, Pocket};
use crate::engine::tasks::surface_exposure::{self, ExposureRecord, ExposureSummary};
use serde::Serialize;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceReport {
    pub summary: ExposureSummary,
    pub exposure: Vec<ExposureRecord>,
    pub hotspots: Vec<ExposureRecord>,
    pub sites: Vec<InteractionSite>,
    pub pockets: Vec<Pocket>,
    pub recommendations: Vec<&'static str>,
}

/// Number of surface hotspots listed in a report.
pub const HOTSPOT_COUNT: usize = 10;

/// The built-in oracle: coarse Shrake-Rupley bounded by the configured timeout.
pub fn local_oracle(config: &OracleConfig) -> TimeoutOracle<ShrakeRupleyOracle> {
    TimeoutOracle::new(
        ShrakeRupleyOracle::new(config.probe_radius, config.test_points),
        config.timeout,
    )
}

#[instrument(skip_all, name = "surface_workflow")]
pub fn run<O: SasaOracle + ?Sized>(
    residues: &ResidueSet,
    oracle: &O,
    cache: Option<&mut SasaCache>,
    config: &AnalysisConfig,
    reporter: &ProgressReporter,
) -> Result<SurfaceReport, EngineError> {
    config.validate()?;
    info!(
        residues = residues.len(),
        chains = residues.chain_ids().len(),
        "Starting surface analysis."
    );

    let exposure = reporter.phase("Surface Exposure", || {
        surface_exposure::analyze(residues, oracle, cache, &config.exposure, reporter)
    })?;

    let sites = reporter.phase("Interaction Sites", || {
        interaction_sites::detect(&exposure, &config.interaction)
    });

    let pockets = reporter.phase("Binding Pockets", || {
        pockets::find_pockets(&exposure, &config.pocket)
    });

    let summary = ExposureSummary::from_records(&exposure);
    let hotspots = surface_exposure::hotspots(&exposure, HOTSPOT_COUNT)
        .into_iter()
        .cloned()
        .collect();
    let recommendations = interaction_sites::recommendations(&sites, &pockets, &config.interaction);
    info!(
        sites = sites.len(),
        pockets = pockets.len(),
        "Surface analysis complete."
    );

    Ok(SurfaceReport {
        summary,
        exposure,
        hotspots,
        sites,
        pockets,
        recommendations,
    })
}
