use super::file::{FileConfig, timeout_from_secs};
use crate::cli::ConfigArgs;
use crate::error::{CliError, Result};
use pepsurf::engine::config::{AnalysisConfig, AnalysisConfigBuilder};
use pepsurf::engine::error::EngineError;
use tracing::debug;

/// Values given as dedicated command-line flags. These win over both the
/// configuration file and `--set`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FlagOverrides {
    pub window: Option<usize>,
    pub radius: Option<f64>,
    pub timeout_secs: Option<f64>,
}

pub fn build_config(args: &ConfigArgs, flags: &FlagOverrides) -> Result<AnalysisConfig> {
    let table = match &args.config {
        Some(path) => FileConfig::read_table(path)?,
        None => toml::Table::new(),
    };
    let table = apply_set_values(table, &args.set_values)?;
    let file_config = FileConfig::from_table(table)?;

    let mut merged = AnalysisConfig::default();
    file_config.apply(&mut merged)?;

    if let Some(window) = flags.window {
        merged.interaction.window = window;
    }
    if let Some(radius) = flags.radius {
        merged.pocket.radius = radius;
    }
    if let Some(seconds) = flags.timeout_secs {
        merged.oracle.timeout = timeout_from_secs(seconds)?;
    }
    debug!("Merged analysis configuration: {:?}", merged);

    AnalysisConfigBuilder::new()
        .exposure(merged.exposure)
        .interaction(merged.interaction)
        .pocket(merged.pocket)
        .peptide(merged.peptide)
        .oracle(merged.oracle)
        .build()
        .map_err(|e| CliError::Engine(EngineError::from(e)))
}

/// Parses the right-hand side of `KEY=VALUE` as a TOML value, falling back to
/// a bare string.
fn parse_value(raw: &str) -> toml::Value {
    toml::from_str::<toml::Table>(&format!("value = {raw}"))
        .ok()
        .and_then(|mut t| t.remove("value"))
        .unwrap_or_else(|| toml::Value::String(raw.to_string()))
}

pub fn apply_set_values(mut table: toml::Table, set_values: &[String]) -> Result<toml::Table> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        let path: Vec<&str> = key.trim().split('.').collect();
        if path.iter().any(|segment| segment.is_empty()) {
            return Err(CliError::Config(format!(
                "Invalid configuration key for --set: '{}'",
                key
            )));
        }

        let (leaf, parents) = path.split_last().ok_or_else(|| {
            CliError::Config(format!("Empty configuration key in --set: '{}'", kv_pair))
        })?;

        let mut cursor = &mut table;
        for segment in parents {
            let entry = cursor
                .entry(segment.to_string())
                .or_insert_with(|| toml::Value::Table(toml::Table::new()));
            cursor = match entry {
                toml::Value::Table(inner) => inner,
                _ => {
                    return Err(CliError::Config(format!(
                        "Cannot set '{}': '{}' is not a section",
                        key, segment
                    )));
                }
            };
        }
        cursor.insert(leaf.to_string(), parse_value(value_str.trim()));
    }
    Ok(table)
}
