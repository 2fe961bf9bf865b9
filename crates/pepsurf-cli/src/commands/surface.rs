use super::{DISPLAY_LIMIT, fmt_score, write_json};
use crate::cli::SurfaceArgs;
use crate::config::{FlagOverrides, build_config};
use crate::error::{CliError, Result};
use crate::input;
use crate::utils::progress::CliProgressHandler;
use pepsurf::core::sasa::cache::SasaCache;
use pepsurf::engine::progress::ProgressReporter;
use pepsurf::engine::tasks::surface_exposure::ExposureCategory;
use pepsurf::workflows::surface::{self, SurfaceReport};
use tracing::{info, warn};

pub async fn run(args: SurfaceArgs) -> Result<()> {
    let flags = FlagOverrides {
        window: args.window,
        radius: args.radius,
        timeout_secs: args.timeout_secs,
    };
    let config = build_config(&args.config, &flags)?;

    let mut residues = input::read_residue_file(&args.input)?;
    if let Some(chain_id) = args.chain {
        residues = residues.chain(chain_id);
        if residues.is_empty() {
            return Err(CliError::Argument(format!(
                "chain '{}' has no residues in {}",
                chain_id,
                args.input.display()
            )));
        }
    }
    if residues.is_empty() {
        warn!("Residue table is empty; the report will be empty too.");
    }

    let oracle = surface::local_oracle(&config.oracle);
    let mut cache = SasaCache::default();
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Analyzing {} residue(s)...", residues.len());
    info!("Invoking the surface analysis workflow...");
    let report = tokio::task::block_in_place(|| {
        surface::run(&residues, &oracle, Some(&mut cache), &config, &reporter)
    })?;

    print_report(&report);

    if let Some(path) = &args.config.output {
        write_json(path, &report)?;
        println!("✓ Full report written to: {}", path.display());
    }
    Ok(())
}

fn print_report(report: &SurfaceReport) {
    let summary = &report.summary;
    println!(
        "\nExposure: {} buried, {} partially exposed, {} exposed, {} unknown",
        summary.count(ExposureCategory::Buried),
        summary.count(ExposureCategory::PartiallyExposed),
        summary.count(ExposureCategory::Exposed),
        summary.count(ExposureCategory::Unknown),
    );
    println!(
        "Surface fraction: {}  mean SASA: {} A^2  total SASA: {:.1} A^2",
        fmt_score(summary.surface_fraction),
        fmt_score(summary.mean_sasa),
        summary.total_sasa
    );

    let failed = report.exposure.iter().filter(|r| r.failure.is_some()).count();
    if failed > 0 {
        println!("Warning: SASA was unavailable for {failed} residue(s).");
    }

    if !report.hotspots.is_empty() {
        let hotspots: Vec<String> = report
            .hotspots
            .iter()
            .take(DISPLAY_LIMIT)
            .map(|r| r.residue.to_string())
            .collect();
        println!("Surface hotspots: {}", hotspots.join(", "));
    }

    if report.sites.is_empty() {
        println!("\nNo interaction sites found.");
    } else {
        println!("\nTop interaction sites ({} total):", report.sites.len());
        for site in report.sites.iter().take(DISPLAY_LIMIT) {
            let span: String = site.residues.iter().map(|r| r.code).collect();
            println!(
                "  #{:<3} {}{:<5} {:<8} score {:>6.2}  {:?}",
                site.rank,
                site.anchor.chain_id,
                site.anchor.seq_index,
                span,
                site.score,
                site.dominant_type
            );
        }
    }

    if report.pockets.is_empty() {
        println!("\nNo binding pockets found.");
    } else {
        println!("\nTop binding pockets ({} total):", report.pockets.len());
        for pocket in report.pockets.iter().take(DISPLAY_LIMIT) {
            println!(
                "  #{:<3} center {}{:<5} size {:>3}  diversity {}  curvature {:>6.3}  score {:>6.2}",
                pocket.rank,
                pocket.center.chain_id,
                pocket.center.seq_index,
                pocket.size,
                pocket.diversity,
                pocket.curvature,
                pocket.score
            );
        }
    }

    if !report.recommendations.is_empty() {
        println!("\nRecommendations:");
        for advice in &report.recommendations {
            println!("  * {advice}");
        }
    }
}
