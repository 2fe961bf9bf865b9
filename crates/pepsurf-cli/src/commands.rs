pub mod compare;
pub mod score;
pub mod surface;

use crate::error::{CliError, Result};
use pepsurf::core::chemistry::alphabet::ExtendedAlphabet;
use pepsurf::engine::config::PeptideScoringConfig;
use pepsurf::engine::error::EngineError;
use pepsurf::engine::tasks::peptide_scoring::PeptideAnalyzer;
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Number of sites, pockets or peptides echoed to the terminal.
const DISPLAY_LIMIT: usize = 5;

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    info!("Writing JSON report to {:?}", path);
    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub(crate) fn fmt_score(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.3}"))
}

pub(crate) fn build_analyzer(
    config: PeptideScoringConfig,
    alphabet: Option<&Path>,
) -> Result<PeptideAnalyzer> {
    let analyzer = PeptideAnalyzer::new(config);
    match alphabet {
        Some(path) => {
            info!("Loading extended residue alphabet from {:?}", path);
            let extended = ExtendedAlphabet::load(path)
                .map_err(|e| CliError::Engine(EngineError::from(e)))?;
            info!(codes = extended.len(), "Extended alphabet loaded.");
            Ok(analyzer.with_alphabet(Arc::new(extended)))
        }
        None => Ok(analyzer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_scores_render_as_not_available() {
        assert_eq!(fmt_score(None), "n/a");
        assert_eq!(fmt_score(Some(0.45)), "0.450");
    }

    #[test]
    fn json_reports_are_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_json(&path, &vec![("KLWS", 0.5)]).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed[0][0], "KLWS");
    }

    #[test]
    fn extended_alphabet_extends_recognized_codes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alphabet.toml");
        std::fs::write(&path, "[residues.J]\nclass = \"hydrophobic\"\nhydropathy = 3.0\n").unwrap();

        let analyzer = build_analyzer(PeptideScoringConfig::default(), Some(&path)).unwrap();
        assert!(analyzer.score("AJA").is_ok());
        assert!(PeptideAnalyzer::default().score("AJA").is_err());
    }

    #[test]
    fn missing_alphabet_file_is_an_engine_error() {
        let err = build_analyzer(
            PeptideScoringConfig::default(),
            Some(Path::new("/nonexistent/alphabet.toml")),
        )
        .err()
        .expect("loading a missing alphabet file should fail");
        assert!(matches!(&err, CliError::Engine(e) if e.kind() == "AlphabetLoadError"));
    }
}
