use super::{DISPLAY_LIMIT, build_analyzer, fmt_score, write_json};
use crate::cli::ScoreArgs;
use crate::config::{FlagOverrides, build_config};
use crate::error::{CliError, Result};
use crate::input;
use crate::utils::progress::CliProgressHandler;
use pepsurf::engine::progress::ProgressReporter;
use pepsurf::workflows::peptides::{self, BatchReport};
use tracing::{info, warn};

pub async fn run(args: ScoreArgs) -> Result<()> {
    let config = build_config(&args.config, &FlagOverrides::default())?;
    let analyzer = build_analyzer(config.peptide, args.alphabet.as_deref())?;

    let mut sequences = args.sequences;
    if let Some(path) = &args.file {
        info!("Reading sequences from {:?}", path);
        sequences.extend(input::read_sequence_file(path)?);
    }
    if sequences.is_empty() {
        return Err(CliError::Argument(
            "no sequences given; pass them as arguments or with --file".to_string(),
        ));
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Scoring {} sequence(s)...", sequences.len());
    let report = tokio::task::block_in_place(|| {
        peptides::score_and_rank(&analyzer, &sequences, &reporter)
    });

    print_report(&report);
    if !report.rejected.is_empty() {
        warn!(
            rejected = report.rejected.len(),
            "Some sequences could not be scored."
        );
    }

    if let Some(path) = &args.config.output {
        write_json(path, &report)?;
        println!("✓ Full report written to: {}", path.display());
    }
    Ok(())
}

fn print_report(report: &BatchReport) {
    if !report.ranked.is_empty() {
        println!(
            "\n{:<5} {:<20} {:>9} {:>8} {:>10} {:>8} {:>10}",
            "rank", "sequence", "aggregate", "binding", "stability", "immuno", "solubility"
        );
    }
    for entry in &report.ranked {
        let card = &entry.card;
        let stability = card.stability.map(|s| s.score);
        println!(
            "{:<5} {:<20} {:>9} {:>8} {:>10} {:>8} {:>10}",
            entry.rank,
            card.sequence,
            fmt_score(entry.aggregate),
            fmt_score(card.binding_affinity),
            fmt_score(stability),
            fmt_score(card.immunogenicity_risk),
            fmt_score(card.solubility_score),
        );
    }

    for entry in report.ranked.iter().take(DISPLAY_LIMIT) {
        let highlights = &entry.card.highlights;
        let advice = &entry.card.recommendations;
        if highlights.strengths.is_empty() && highlights.concerns.is_empty() && advice.is_empty() {
            continue;
        }
        println!("\n  {}:", entry.card.sequence);
        for strength in &highlights.strengths {
            println!("    + {strength}");
        }
        for concern in &highlights.concerns {
            println!("    - {concern}");
        }
        for line in advice.overall.iter().chain(&advice.stability).chain(&advice.solubility) {
            println!("    * {line}");
        }
    }

    if !report.rejected.is_empty() {
        println!("\nRejected ({}):", report.rejected.len());
        for rejected in &report.rejected {
            println!("  {:?}: {}", rejected.input, rejected.error.message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ConfigArgs;

    #[tokio::test(flavor = "multi_thread")]
    async fn invalid_sequences_do_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("peptides.txt");
        std::fs::write(&list, "DEDEDEDE\nAXQ1\n").unwrap();
        let output = dir.path().join("scores.json");

        run(ScoreArgs {
            sequences: vec!["KLWS".to_string()],
            file: Some(list),
            alphabet: None,
            config: ConfigArgs {
                output: Some(output.clone()),
                ..Default::default()
            },
        })
        .await
        .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(json["ranked"].as_array().unwrap().len(), 2);
        assert_eq!(json["rejected"][0]["input"], "AXQ1");
        assert_eq!(json["rejected"][0]["error"]["kind"], "InvalidSequence");
        assert_eq!(json["ranked"][0]["rank"], 1);

        let acidic = json["ranked"]
            .as_array()
            .unwrap()
            .iter()
            .find(|entry| entry["card"]["sequence"] == "DEDEDEDE")
            .unwrap();
        assert!(acidic["card"]["profile"]["isoelectric_point"].as_f64().unwrap() < 4.0);
        assert!(
            acidic["card"]["recommendations"]["overall"]
                .as_array()
                .unwrap()
                .contains(&serde_json::json!("Evaluate immunogenicity in experimental studies"))
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn no_sequences_is_an_argument_error() {
        let err = run(ScoreArgs {
            sequences: vec![],
            file: None,
            alphabet: None,
            config: ConfigArgs::default(),
        })
        .await
        .unwrap_err();
        assert!(matches!(err, CliError::Argument(_)));
    }
}
