use crate::core::chemistry::tables::{self, ChemicalClass};
use crate::core::models::residue::ResidueRef;
use crate::core::models::set::ResidueSet;
use crate::core::sasa::cache::SasaCache;
use crate::core::sasa::{OracleError, SasaOracle, SasaResult};
use crate::engine::config::ExposureThresholds;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use nalgebra::Point3;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExposureCategory {
    Buried,
    PartiallyExposed,
    Exposed,
    Unknown,
}

impl ExposureCategory {
    pub fn classify(relative_exposure: f64, thresholds: &ExposureThresholds) -> Self {
        if relative_exposure < thresholds.buried_below {
            Self::Buried
        } else if relative_exposure > thresholds.exposed_above {
            Self::Exposed
        } else {
            Self::PartiallyExposed
        }
    }

    /// Partially exposed or exposed.
    #[inline]
    pub fn is_surface(self) -> bool {
        matches!(self, Self::PartiallyExposed | Self::Exposed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposureRecord {
    pub residue: ResidueRef,
    pub position: Point3<f64>,
    pub sasa: Option<f64>,
    pub relative_exposure: Option<f64>,
    pub category: ExposureCategory,
    pub chemical_class: Option<ChemicalClass>,
    pub failure: Option<OracleError>,
}

/// Classifies every residue by solvent exposure.
///
/// Per-residue oracle failures (errors, missing entries, negative or
/// non-finite areas) never fail the call; the residue is recorded as
/// [`ExposureCategory::Unknown`] with the failure attached. A supplied cache
/// is consulted first and only receives batches in which every area was valid.
#[instrument(skip_all, name = "surface_exposure_task")]
pub fn analyze<O: SasaOracle + ?Sized>(
    residues: &ResidueSet,
    oracle: &O,
    mut cache: Option<&mut SasaCache>,
    thresholds: &ExposureThresholds,
    reporter: &ProgressReporter,
) -> Result<Vec<ExposureRecord>, EngineError> {
    info!(
        residues = residues.len(),
        oracle = oracle.name(),
        "Classifying surface exposure."
    );
    if residues.is_empty() {
        return Ok(Vec::new());
    }

    let key = SasaCache::fingerprint(oracle.name(), residues.residues());
    let cached = cache
        .as_deref_mut()
        .and_then(|c| c.get(key))
        .filter(|areas| areas.len() == residues.len());

    let areas: Vec<SasaResult> = match cached {
        Some(areas) => {
            debug!("Using cached SASA values.");
            areas.into_iter().map(Ok).collect()
        }
        None => oracle.sasa(residues.residues()),
    };

    reporter.report(Progress::TaskStart {
        total_steps: residues.len() as u64,
    });

    let mut records = Vec::with_capacity(residues.len());
    for (index, residue) in residues.residues().iter().enumerate() {
        let reference = residue.to_ref();
        let position = residue.position().ok_or_else(|| {
            EngineError::Internal(format!("validated residue {} has no position", reference))
        })?;

        let area = match areas.get(index) {
            Some(Ok(value)) if value.is_finite() && *value >= 0.0 => Ok(*value),
            Some(Ok(value)) => Err(OracleError::InvalidValue { value: *value }),
            Some(Err(e)) => Err(e.clone()),
            None => Err(OracleError::Unavailable {
                message: "oracle returned no value for this residue".to_string(),
            }),
        };

        let record = match area {
            Ok(sasa) => {
                let relative = tables::max_asa(reference.code).map(|max| sasa / max);
                ExposureRecord {
                    residue: reference,
                    position,
                    sasa: Some(sasa),
                    relative_exposure: relative,
                    category: relative
                        .map(|r| ExposureCategory::classify(r, thresholds))
                        .unwrap_or(ExposureCategory::Unknown),
                    chemical_class: tables::chemical_class(reference.code),
                    failure: None,
                }
            }
            Err(failure) => {
                warn!(
                    residue = %reference,
                    error = %failure,
                    "SASA unavailable; exposure set to unknown."
                );
                ExposureRecord {
                    residue: reference,
                    position,
                    sasa: None,
                    relative_exposure: None,
                    category: ExposureCategory::Unknown,
                    chemical_class: tables::chemical_class(reference.code),
                    failure: Some(failure),
                }
            }
        };
        records.push(record);
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);

    let failed = records.iter().filter(|r| r.failure.is_some()).count();
    if failed > 0 {
        reporter.message(format!("SASA unavailable for {failed} residue(s)"));
    }

    if let Some(cache) = cache {
        let complete: Option<Vec<f64>> = records
            .iter()
            .map(|r| if r.failure.is_none() { r.sasa } else { None })
            .collect();
        if let Some(values) = complete {
            cache.insert(key, values);
        }
    }

    let unknown = records
        .iter()
        .filter(|r| r.category == ExposureCategory::Unknown)
        .count();
    info!(
        total = records.len(),
        unknown, "Surface exposure classification complete."
    );

    Ok(records)
}

/// The `top_n` surface residues with the largest SASA. Equal areas keep
/// input order.
pub fn hotspots(records: &[ExposureRecord], top_n: usize) -> Vec<&ExposureRecord> {
    let mut surface: Vec<&ExposureRecord> = records
        .iter()
        .filter(|r| r.category.is_surface() && r.sasa.is_some())
        .collect();
    surface.sort_by(|a, b| {
        let (a, b) = (a.sasa.unwrap_or(0.0), b.sasa.unwrap_or(0.0));
        b.total_cmp(&a)
    });
    surface.truncate(top_n);
    surface
}

/// Aggregate view of one exposure run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposureSummary {
    pub total_residues: usize,
    pub by_category: BTreeMap<ExposureCategory, usize>,
    pub surface_by_class: BTreeMap<ChemicalClass, usize>,
    pub surface_fraction: Option<f64>,
    pub mean_sasa: Option<f64>,
    pub max_sasa: Option<f64>,
    pub total_sasa: f64,
}

impl ExposureSummary {
    pub fn from_records(records: &[ExposureRecord]) -> Self {
        let mut by_category = BTreeMap::new();
        let mut surface_by_class = BTreeMap::new();
        for record in records {
            *by_category.entry(record.category).or_insert(0) += 1;
            if record.category.is_surface() {
                if let Some(class) = record.chemical_class {
                    *surface_by_class.entry(class).or_insert(0) += 1;
                }
            }
        }

        let known: Vec<f64> = records.iter().filter_map(|r| r.sasa).collect();
        let total_sasa: f64 = known.iter().sum();
        let mean_sasa = (!known.is_empty()).then(|| total_sasa / known.len() as f64);
        let max_sasa = known.iter().copied().reduce(f64::max);

        let classified = records
            .iter()
            .filter(|r| r.category != ExposureCategory::Unknown)
            .count();
        let surface = records.iter().filter(|r| r.category.is_surface()).count();
        let surface_fraction = (classified > 0).then(|| surface as f64 / classified as f64);

        Self {
            total_residues: records.len(),
            by_category,
            surface_by_class,
            surface_fraction,
            mean_sasa,
            max_sasa,
            total_sasa,
        }
    }

    pub fn count(&self, category: ExposureCategory) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }
}
