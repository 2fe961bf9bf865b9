use crate::error::{CliError, Result};
use pepsurf::engine::config::{
    AnalysisConfig, BindingWeights, ExposureThresholds, ImmunogenicityParams, InteractionConfig,
    InteractionWeights, OracleConfig, PeptideScoringConfig, PocketConfig, SolubilityParams,
    StabilityParams,
};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileExposureConfig {
    pub buried_below: Option<f64>,
    pub exposed_above: Option<f64>,
}

impl FileExposureConfig {
    fn apply(self, target: &mut ExposureThresholds) {
        set(&mut target.buried_below, self.buried_below);
        set(&mut target.exposed_above, self.exposed_above);
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileInteractionWeights {
    pub hydrogen_bonding: Option<f64>,
    pub ionic: Option<f64>,
    pub hydrophobic: Option<f64>,
    pub aromatic: Option<f64>,
}

impl FileInteractionWeights {
    fn apply(self, target: &mut InteractionWeights) {
        set(&mut target.hydrogen_bonding, self.hydrogen_bonding);
        set(&mut target.ionic, self.ionic);
        set(&mut target.hydrophobic, self.hydrophobic);
        set(&mut target.aromatic, self.aromatic);
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileInteractionConfig {
    pub window: Option<usize>,
    pub weights: Option<FileInteractionWeights>,
    pub ionic_pairing_bonus: Option<f64>,
    pub hydrophobic_cluster_bonus: Option<f64>,
    pub dedup_tolerance: Option<f64>,
    pub min_score: Option<f64>,
    pub max_sites: Option<usize>,
    pub high_affinity_score: Option<f64>,
}

impl FileInteractionConfig {
    fn apply(self, target: &mut InteractionConfig) {
        set(&mut target.window, self.window);
        if let Some(weights) = self.weights {
            weights.apply(&mut target.weights);
        }
        set(&mut target.ionic_pairing_bonus, self.ionic_pairing_bonus);
        set(
            &mut target.hydrophobic_cluster_bonus,
            self.hydrophobic_cluster_bonus,
        );
        set(&mut target.dedup_tolerance, self.dedup_tolerance);
        set(&mut target.min_score, self.min_score);
        if self.max_sites.is_some() {
            target.max_sites = self.max_sites;
        }
        set(&mut target.high_affinity_score, self.high_affinity_score);
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FilePocketConfig {
    pub radius: Option<f64>,
    pub inner_radius: Option<f64>,
    pub min_residues: Option<usize>,
    pub mixed_character_bonus: Option<f64>,
    pub suppress_overlapping: Option<bool>,
}

impl FilePocketConfig {
    fn apply(self, target: &mut PocketConfig) {
        set(&mut target.radius, self.radius);
        set(&mut target.inner_radius, self.inner_radius);
        set(&mut target.min_residues, self.min_residues);
        set(&mut target.mixed_character_bonus, self.mixed_character_bonus);
        set(&mut target.suppress_overlapping, self.suppress_overlapping);
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileBindingWeights {
    pub hydrophobic: Option<f64>,
    pub charged: Option<f64>,
    pub polar: Option<f64>,
    pub evenness: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileStabilityParams {
    pub pro_gly_threshold: Option<f64>,
    pub pro_gly_slope: Option<f64>,
    pub pro_gly_max_penalty: Option<f64>,
    pub missing_motif_penalty: Option<f64>,
    pub hydrophobic_run_limit: Option<usize>,
    pub run_penalty_per_residue: Option<f64>,
    pub run_max_penalty: Option<f64>,
    pub low_risk_min: Option<f64>,
    pub medium_risk_min: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileImmunogenicityParams {
    pub charged_weight: Option<f64>,
    pub motif_weight: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSolubilityParams {
    pub gravy_center: Option<f64>,
    pub gravy_width: Option<f64>,
    pub charge_scale: Option<f64>,
    pub gravy_weight: Option<f64>,
    pub charge_weight: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FilePeptideConfig {
    pub max_length: Option<usize>,
    pub binding: Option<FileBindingWeights>,
    pub stability: Option<FileStabilityParams>,
    pub immunogenicity: Option<FileImmunogenicityParams>,
    pub solubility: Option<FileSolubilityParams>,
}

impl FilePeptideConfig {
    fn apply(self, target: &mut PeptideScoringConfig) {
        set(&mut target.max_length, self.max_length);

        if let Some(b) = self.binding {
            let BindingWeights {
                hydrophobic,
                charged,
                polar,
                evenness,
            } = &mut target.binding;
            set(hydrophobic, b.hydrophobic);
            set(charged, b.charged);
            set(polar, b.polar);
            set(evenness, b.evenness);
        }

        if let Some(s) = self.stability {
            let t: &mut StabilityParams = &mut target.stability;
            set(&mut t.pro_gly_threshold, s.pro_gly_threshold);
            set(&mut t.pro_gly_slope, s.pro_gly_slope);
            set(&mut t.pro_gly_max_penalty, s.pro_gly_max_penalty);
            set(&mut t.missing_motif_penalty, s.missing_motif_penalty);
            set(&mut t.hydrophobic_run_limit, s.hydrophobic_run_limit);
            set(&mut t.run_penalty_per_residue, s.run_penalty_per_residue);
            set(&mut t.run_max_penalty, s.run_max_penalty);
            set(&mut t.low_risk_min, s.low_risk_min);
            set(&mut t.medium_risk_min, s.medium_risk_min);
        }

        if let Some(i) = self.immunogenicity {
            let t: &mut ImmunogenicityParams = &mut target.immunogenicity;
            set(&mut t.charged_weight, i.charged_weight);
            set(&mut t.motif_weight, i.motif_weight);
        }

        if let Some(s) = self.solubility {
            let t: &mut SolubilityParams = &mut target.solubility;
            set(&mut t.gravy_center, s.gravy_center);
            set(&mut t.gravy_width, s.gravy_width);
            set(&mut t.charge_scale, s.charge_scale);
            set(&mut t.gravy_weight, s.gravy_weight);
            set(&mut t.charge_weight, s.charge_weight);
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileOracleConfig {
    pub timeout_secs: Option<f64>,
    pub probe_radius: Option<f64>,
    pub test_points: Option<usize>,
}

impl FileOracleConfig {
    fn apply(self, target: &mut OracleConfig) -> Result<()> {
        if let Some(seconds) = self.timeout_secs {
            target.timeout = timeout_from_secs(seconds)?;
        }
        set(&mut target.probe_radius, self.probe_radius);
        set(&mut target.test_points, self.test_points);
        Ok(())
    }
}

pub fn timeout_from_secs(seconds: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(seconds).map_err(|_| {
        CliError::Config(format!(
            "Invalid oracle timeout: {seconds} (expected a non-negative number of seconds)"
        ))
    })
}

/// The analysis settings as written in a TOML file. Every field is optional;
/// missing values fall through to the built-in defaults.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub exposure: Option<FileExposureConfig>,
    pub interaction: Option<FileInteractionConfig>,
    pub pocket: Option<FilePocketConfig>,
    pub peptide: Option<FilePeptideConfig>,
    pub oracle: Option<FileOracleConfig>,
}

impl FileConfig {
    /// Reads the raw table so `--set` overrides can be merged in before the
    /// typed structure is checked for unknown keys.
    pub fn read_table(path: &Path) -> Result<toml::Table> {
        debug!("Reading configuration file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_table(table: toml::Table) -> Result<Self> {
        toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| CliError::Config(e.to_string()))
    }

    pub fn apply(self, target: &mut AnalysisConfig) -> Result<()> {
        if let Some(section) = self.exposure {
            section.apply(&mut target.exposure);
        }
        if let Some(section) = self.interaction {
            section.apply(&mut target.interaction);
        }
        if let Some(section) = self.pocket {
            section.apply(&mut target.pocket);
        }
        if let Some(section) = self.peptide {
            section.apply(&mut target.peptide);
        }
        if let Some(section) = self.oracle {
            section.apply(&mut target.oracle)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<FileConfig> {
        FileConfig::from_table(toml::from_str(source).unwrap())
    }

    #[test]
    fn partial_sections_leave_other_values_untouched() {
        let file = parse(
            r#"
            [pocket]
            radius = 10.0

            [interaction]
            high-affinity-score = 3.5

            [interaction.weights]
            ionic = 2.0
            "#,
        )
        .unwrap();

        let mut config = AnalysisConfig::default();
        file.apply(&mut config).unwrap();

        assert_eq!(config.pocket.radius, 10.0);
        assert_eq!(config.pocket.inner_radius, PocketConfig::default().inner_radius);
        assert_eq!(config.interaction.weights.ionic, 2.0);
        assert_eq!(config.interaction.weights.aromatic, 1.2);
        assert_eq!(config.interaction.high_affinity_score, 3.5);
        assert_eq!(config.interaction.window, 4);
        assert_eq!(config.exposure, ExposureThresholds::default());
    }

    #[test]
    fn nested_peptide_sections_are_applied() {
        let file = parse(
            r#"
            [peptide]
            max-length = 30
            [peptide.stability]
            hydrophobic-run-limit = 6
            [peptide.solubility]
            gravy-weight = 0.5
            charge-weight = 0.5
            "#,
        )
        .unwrap();

        let mut config = AnalysisConfig::default();
        file.apply(&mut config).unwrap();
        assert_eq!(config.peptide.max_length, 30);
        assert_eq!(config.peptide.stability.hydrophobic_run_limit, 6);
        assert_eq!(config.peptide.solubility.gravy_weight, 0.5);
        assert_eq!(config.peptide.binding, BindingWeights::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse("[pocket]\nradious = 3.0\n").unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
        assert!(parse("[report]\nformat = \"json\"\n").is_err());
    }

    #[test]
    fn oracle_timeout_is_read_in_seconds() {
        let file = parse("[oracle]\ntimeout-secs = 2.5\ntest-points = 200\n").unwrap();
        let mut config = AnalysisConfig::default();
        file.apply(&mut config).unwrap();
        assert_eq!(config.oracle.timeout, Duration::from_millis(2500));
        assert_eq!(config.oracle.test_points, 200);

        let negative = parse("[oracle]\ntimeout-secs = -1.0\n").unwrap();
        assert!(negative.apply(&mut AnalysisConfig::default()).is_err());
    }

    #[test]
    fn unreadable_file_reports_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[pocket\nradius = 1").unwrap();
        let err = FileConfig::read_table(&path).unwrap_err();
        assert!(matches!(err, CliError::FileParsing { .. }));
    }
}
