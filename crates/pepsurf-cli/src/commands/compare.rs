use super::{build_analyzer, fmt_score, write_json};
use crate::cli::CompareArgs;
use crate::config::{FlagOverrides, build_config};
use crate::error::Result;
use pepsurf::engine::tasks::peptide_scoring::Metric;
use pepsurf::engine::tasks::ranking::ComparisonResult;
use pepsurf::workflows::peptides;
use tracing::info;

pub async fn run(args: CompareArgs) -> Result<()> {
    let config = build_config(&args.config, &FlagOverrides::default())?;
    let analyzer = build_analyzer(config.peptide, args.alphabet.as_deref())?;

    info!(original = %args.original, refined = %args.refined, "Comparing peptides.");
    let result = peptides::compare_sequences(&analyzer, &args.original, &args.refined)?;

    print_comparison(&result);

    if let Some(path) = &args.config.output {
        write_json(path, &result)?;
        println!("✓ Comparison written to: {}", path.display());
    }
    Ok(())
}

fn marker(result: &ComparisonResult, metric: Metric) -> &'static str {
    if result.improved.contains(&metric) {
        "improved"
    } else if result.regressed.contains(&metric) {
        "regressed"
    } else {
        ""
    }
}

fn print_comparison(result: &ComparisonResult) {
    println!(
        "{} -> {}",
        result.original.sequence, result.refined.sequence
    );
    println!(
        "\n{:<18} {:>9} {:>9} {:>9}",
        "metric", "original", "refined", "delta"
    );
    for metric in Metric::ALL {
        let delta = result
            .deltas
            .get(&metric)
            .map_or_else(|| "n/a".to_string(), |d| format!("{d:+.3}"));
        println!(
            "{:<18} {:>9} {:>9} {:>9}  {}",
            metric.to_string(),
            fmt_score(result.original.metric(metric)),
            fmt_score(result.refined.metric(metric)),
            delta,
            marker(result, metric)
        );
    }

    match result.improvement {
        Some(delta) if delta > 0.0 => println!("\nOverall improvement: {delta:+.3}"),
        Some(delta) => println!("\nNo overall improvement ({delta:+.3})"),
        None => println!("\nOverall improvement could not be determined."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ConfigArgs;
    use crate::error::CliError;

    fn args(original: &str, refined: &str, output: Option<std::path::PathBuf>) -> CompareArgs {
        CompareArgs {
            original: original.to_string(),
            refined: refined.to_string(),
            alphabet: None,
            config: ConfigArgs {
                output,
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn comparison_is_written_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("compare.json");
        run(args("KKKKKKKK", "KAKAKAKA", Some(output.clone())))
            .await
            .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(json["original"]["sequence"], "KKKKKKKK");
        assert!(json["deltas"]["immunogenicity"].as_f64().unwrap() < 0.0);
        assert!(
            json["improved"]
                .as_array()
                .unwrap()
                .contains(&serde_json::json!("immunogenicity"))
        );
    }

    #[tokio::test]
    async fn invalid_refined_sequence_fails() {
        let err = run(args("AAAA", "AA1A", None)).await.unwrap_err();
        assert!(matches!(&err, CliError::Engine(e) if e.kind() == "InvalidSequence"));
    }
}
