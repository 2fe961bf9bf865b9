use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

fn ensure(condition: bool, name: &'static str, reason: &str) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: reason.to_string(),
        })
    }
}

fn ensure_weight(value: f64, name: &'static str) -> Result<(), ConfigError> {
    ensure(
        value.is_finite() && value >= 0.0,
        name,
        "must be a finite, non-negative number",
    )
}

/// Relative-exposure cutoffs. Values strictly below `buried_below` are buried,
/// values strictly above `exposed_above` are exposed, everything in between
/// (both ends inclusive) is partially exposed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExposureThresholds {
    pub buried_below: f64,
    pub exposed_above: f64,
}

impl Default for ExposureThresholds {
    fn default() -> Self {
        Self {
            buried_below: 0.20,
            exposed_above: 0.50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionWeights {
    pub hydrogen_bonding: f64,
    pub ionic: f64,
    pub hydrophobic: f64,
    pub aromatic: f64,
}

impl Default for InteractionWeights {
    fn default() -> Self {
        Self {
            hydrogen_bonding: 1.0,
            ionic: 1.5,
            hydrophobic: 1.0,
            aromatic: 1.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InteractionConfig {
    pub window: usize,
    pub weights: InteractionWeights,
    pub ionic_pairing_bonus: f64,
    pub hydrophobic_cluster_bonus: f64,
    /// Relative score difference under which overlapping windows are merged.
    pub dedup_tolerance: f64,
    pub min_score: f64,
    pub max_sites: Option<usize>,
    /// Sites scoring above this are reported as high-affinity.
    pub high_affinity_score: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            window: 4,
            weights: InteractionWeights::default(),
            ionic_pairing_bonus: 1.0,
            hydrophobic_cluster_bonus: 0.5,
            dedup_tolerance: 0.10,
            min_score: 0.0,
            max_sites: None,
            high_affinity_score: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PocketConfig {
    pub radius: f64,
    pub inner_radius: f64,
    pub min_residues: usize,
    pub mixed_character_bonus: f64,
    pub suppress_overlapping: bool,
}

impl Default for PocketConfig {
    fn default() -> Self {
        Self {
            radius: 8.0,
            inner_radius: 4.0,
            min_residues: 3,
            mixed_character_bonus: 0.5,
            suppress_overlapping: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BindingWeights {
    pub hydrophobic: f64,
    pub charged: f64,
    pub polar: f64,
    pub evenness: f64,
}

impl Default for BindingWeights {
    fn default() -> Self {
        Self {
            hydrophobic: 0.45,
            charged: 0.45,
            polar: 0.30,
            evenness: 0.45,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityParams {
    pub pro_gly_threshold: f64,
    pub pro_gly_slope: f64,
    pub pro_gly_max_penalty: f64,
    pub missing_motif_penalty: f64,
    pub hydrophobic_run_limit: usize,
    pub run_penalty_per_residue: f64,
    pub run_max_penalty: f64,
    pub low_risk_min: f64,
    pub medium_risk_min: f64,
}

impl Default for StabilityParams {
    fn default() -> Self {
        Self {
            pro_gly_threshold: 0.25,
            pro_gly_slope: 1.5,
            pro_gly_max_penalty: 0.30,
            missing_motif_penalty: 0.15,
            hydrophobic_run_limit: 8,
            run_penalty_per_residue: 0.10,
            run_max_penalty: 0.40,
            low_risk_min: 0.7,
            medium_risk_min: 0.4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImmunogenicityParams {
    pub charged_weight: f64,
    pub motif_weight: f64,
}

impl Default for ImmunogenicityParams {
    fn default() -> Self {
        Self {
            charged_weight: 0.5,
            motif_weight: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolubilityParams {
    pub gravy_center: f64,
    pub gravy_width: f64,
    pub charge_scale: f64,
    pub gravy_weight: f64,
    pub charge_weight: f64,
}

impl Default for SolubilityParams {
    fn default() -> Self {
        Self {
            gravy_center: -1.0,
            gravy_width: 1.6,
            charge_scale: 0.35,
            gravy_weight: 0.6,
            charge_weight: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeptideScoringConfig {
    pub max_length: usize,
    pub binding: BindingWeights,
    pub stability: StabilityParams,
    pub immunogenicity: ImmunogenicityParams,
    pub solubility: SolubilityParams,
}

impl Default for PeptideScoringConfig {
    fn default() -> Self {
        Self {
            max_length: 50,
            binding: BindingWeights::default(),
            stability: StabilityParams::default(),
            immunogenicity: ImmunogenicityParams::default(),
            solubility: SolubilityParams::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OracleConfig {
    pub timeout: Duration,
    pub probe_radius: f64,
    pub test_points: usize,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            timeout: crate::core::sasa::timeout::DEFAULT_ORACLE_TIMEOUT,
            probe_radius: crate::core::sasa::shrake_rupley::DEFAULT_PROBE_RADIUS,
            test_points: crate::core::sasa::shrake_rupley::DEFAULT_TEST_POINTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisConfig {
    pub exposure: ExposureThresholds,
    pub interaction: InteractionConfig,
    pub pocket: PocketConfig,
    pub peptide: PeptideScoringConfig,
    pub oracle: OracleConfig,
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let e = &self.exposure;
        ensure(
            e.buried_below.is_finite() && e.buried_below >= 0.0,
            "exposure.buried_below",
            "must be a finite, non-negative fraction",
        )?;
        ensure(
            e.exposed_above.is_finite() && e.exposed_above >= e.buried_below,
            "exposure.exposed_above",
            "must be finite and not below exposure.buried_below",
        )?;

        let i = &self.interaction;
        ensure(i.window >= 1, "interaction.window", "must be at least 1")?;
        ensure_weight(i.weights.hydrogen_bonding, "interaction.weights.hydrogen_bonding")?;
        ensure_weight(i.weights.ionic, "interaction.weights.ionic")?;
        ensure_weight(i.weights.hydrophobic, "interaction.weights.hydrophobic")?;
        ensure_weight(i.weights.aromatic, "interaction.weights.aromatic")?;
        ensure_weight(i.ionic_pairing_bonus, "interaction.ionic_pairing_bonus")?;
        ensure_weight(i.hydrophobic_cluster_bonus, "interaction.hydrophobic_cluster_bonus")?;
        ensure(
            (0.0..=1.0).contains(&i.dedup_tolerance),
            "interaction.dedup_tolerance",
            "must lie in [0, 1]",
        )?;
        ensure(i.min_score.is_finite(), "interaction.min_score", "must be finite")?;
        ensure(
            i.max_sites != Some(0),
            "interaction.max_sites",
            "must be at least 1 when set",
        )?;
        ensure(
            i.high_affinity_score.is_finite(),
            "interaction.high_affinity_score",
            "must be finite",
        )?;

        let p = &self.pocket;
        ensure(
            p.radius.is_finite() && p.radius > 0.0,
            "pocket.radius",
            "must be a positive distance",
        )?;
        ensure(
            p.inner_radius > 0.0 && p.inner_radius < p.radius,
            "pocket.inner_radius",
            "must be positive and smaller than pocket.radius",
        )?;
        ensure(p.min_residues >= 1, "pocket.min_residues", "must be at least 1")?;
        ensure_weight(p.mixed_character_bonus, "pocket.mixed_character_bonus")?;

        let s = &self.peptide;
        ensure(s.max_length >= 1, "peptide.max_length", "must be at least 1")?;
        ensure_weight(s.binding.hydrophobic, "peptide.binding.hydrophobic")?;
        ensure_weight(s.binding.charged, "peptide.binding.charged")?;
        ensure_weight(s.binding.polar, "peptide.binding.polar")?;
        ensure_weight(s.binding.evenness, "peptide.binding.evenness")?;
        ensure(
            (0.0..=1.0).contains(&s.stability.pro_gly_threshold),
            "peptide.stability.pro_gly_threshold",
            "must lie in [0, 1]",
        )?;
        ensure_weight(s.stability.pro_gly_slope, "peptide.stability.pro_gly_slope")?;
        ensure_weight(
            s.stability.pro_gly_max_penalty,
            "peptide.stability.pro_gly_max_penalty",
        )?;
        ensure_weight(
            s.stability.missing_motif_penalty,
            "peptide.stability.missing_motif_penalty",
        )?;
        ensure_weight(
            s.stability.run_penalty_per_residue,
            "peptide.stability.run_penalty_per_residue",
        )?;
        ensure_weight(s.stability.run_max_penalty, "peptide.stability.run_max_penalty")?;
        ensure(
            (0.0..=1.0).contains(&s.stability.medium_risk_min)
                && (0.0..=1.0).contains(&s.stability.low_risk_min)
                && s.stability.medium_risk_min <= s.stability.low_risk_min,
            "peptide.stability.low_risk_min",
            "risk cutoffs must lie in [0, 1] with medium <= low",
        )?;
        ensure_weight(
            s.immunogenicity.charged_weight,
            "peptide.immunogenicity.charged_weight",
        )?;
        ensure_weight(s.immunogenicity.motif_weight, "peptide.immunogenicity.motif_weight")?;
        ensure(
            s.solubility.gravy_center.is_finite(),
            "peptide.solubility.gravy_center",
            "must be finite",
        )?;
        ensure(
            s.solubility.gravy_width.is_finite() && s.solubility.gravy_width > 0.0,
            "peptide.solubility.gravy_width",
            "must be positive",
        )?;
        ensure(
            s.solubility.charge_scale.is_finite() && s.solubility.charge_scale > 0.0,
            "peptide.solubility.charge_scale",
            "must be positive",
        )?;
        ensure_weight(s.solubility.gravy_weight, "peptide.solubility.gravy_weight")?;
        ensure_weight(s.solubility.charge_weight, "peptide.solubility.charge_weight")?;
        ensure(
            s.solubility.gravy_weight + s.solubility.charge_weight <= 1.0 + 1e-9,
            "peptide.solubility.gravy_weight",
            "gravy and charge weights must not sum above 1",
        )?;

        let o = &self.oracle;
        ensure(!o.timeout.is_zero(), "oracle.timeout", "must be greater than zero")?;
        ensure_weight(o.probe_radius, "oracle.probe_radius")?;
        ensure(o.test_points >= 1, "oracle.test_points", "must be at least 1")?;

        Ok(())
    }
}

/// Assembles an [`AnalysisConfig`], filling any section left unset with its
/// defaults and validating the result.
#[derive(Default)]
pub struct AnalysisConfigBuilder {
    exposure: Option<ExposureThresholds>,
    interaction: Option<InteractionConfig>,
    pocket: Option<PocketConfig>,
    peptide: Option<PeptideScoringConfig>,
    oracle: Option<OracleConfig>,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exposure(mut self, thresholds: ExposureThresholds) -> Self {
        self.exposure = Some(thresholds);
        self
    }
    pub fn interaction(mut self, config: InteractionConfig) -> Self {
        self.interaction = Some(config);
        self
    }
    pub fn pocket(mut self, config: PocketConfig) -> Self {
        self.pocket = Some(config);
        self
    }
    pub fn peptide(mut self, config: PeptideScoringConfig) -> Self {
        self.peptide = Some(config);
        self
    }
    pub fn oracle(mut self, config: OracleConfig) -> Self {
        self.oracle = Some(config);
        self
    }

    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        let config = AnalysisConfig {
            exposure: self.exposure.unwrap_or_default(),
            interaction: self.interaction.unwrap_or_default(),
            pocket: self.pocket.unwrap_or_default(),
            peptide: self.peptide.unwrap_or_default(),
            oracle: self.oracle.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_name(result: Result<AnalysisConfig, ConfigError>) -> &'static str {
        match result {
            Err(ConfigError::InvalidParameter { name, .. }) => name,
            Ok(_) => panic!("expected an invalid configuration"),
        }
    }

    #[test]
    fn empty_builder_yields_defaults() {
        let config = AnalysisConfigBuilder::new().build().unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.interaction.window, 4);
        assert_eq!(config.pocket.radius, 8.0);
        assert_eq!(config.peptide.max_length, 50);
    }

    #[test]
    fn unordered_exposure_cutoffs_are_rejected() {
        let result = AnalysisConfigBuilder::new()
            .exposure(ExposureThresholds {
                buried_below: 0.6,
                exposed_above: 0.5,
            })
            .build();
        assert_eq!(invalid_name(result), "exposure.exposed_above");
    }

    #[test]
    fn zero_window_is_rejected() {
        let result = AnalysisConfigBuilder::new()
            .interaction(InteractionConfig {
                window: 0,
                ..Default::default()
            })
            .build();
        assert_eq!(invalid_name(result), "interaction.window");
    }

    #[test]
    fn non_finite_high_affinity_cutoff_is_rejected() {
        let result = AnalysisConfigBuilder::new()
            .interaction(InteractionConfig {
                high_affinity_score: f64::NAN,
                ..Default::default()
            })
            .build();
        assert_eq!(invalid_name(result), "interaction.high_affinity_score");
    }

    #[test]
    fn inner_radius_must_be_inside_outer_radius() {
        let result = AnalysisConfigBuilder::new()
            .pocket(PocketConfig {
                radius: 4.0,
                inner_radius: 4.0,
                ..Default::default()
            })
            .build();
        assert_eq!(invalid_name(result), "pocket.inner_radius");
    }

    #[test]
    fn negative_weight_is_rejected() {
        let mut peptide = PeptideScoringConfig::default();
        peptide.binding.polar = -0.1;
        let result = AnalysisConfigBuilder::new().peptide(peptide).build();
        assert_eq!(invalid_name(result), "peptide.binding.polar");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = AnalysisConfigBuilder::new()
            .oracle(OracleConfig {
                timeout: Duration::ZERO,
                ..Default::default()
            })
            .build();
        assert_eq!(invalid_name(result), "oracle.timeout");
    }
}
