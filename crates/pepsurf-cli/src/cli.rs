use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "pepsurf contributors",
    version,
    about = "pepsurf - Surface exposure, interaction-site and pocket analysis for protein structures, with heuristic scoring of candidate peptides.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify surface exposure, then detect interaction sites and binding pockets.
    Surface(SurfaceArgs),
    /// Score one or more peptide sequences and rank them.
    Score(ScoreArgs),
    /// Compare an original peptide with a refined variant.
    Compare(CompareArgs),
}

/// Options shared by every subcommand that reads analysis settings.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to an analysis configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S pocket.radius=10
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,

    /// Write the full JSON report to this path.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `surface` subcommand.
#[derive(Args, Debug, Clone)]
pub struct SurfaceArgs {
    /// CSV residue table with columns chain_id,seq_index,code,x,y,z[,cx,cy,cz].
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Restrict the analysis to a single chain.
    #[arg(long, value_name = "ID")]
    pub chain: Option<char>,

    /// Override the interaction-site window length.
    #[arg(long, value_name = "INT")]
    pub window: Option<usize>,

    /// Override the pocket neighbourhood radius in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub radius: Option<f64>,

    /// Override the per-call SASA oracle timeout.
    #[arg(long, value_name = "SECONDS")]
    pub timeout_secs: Option<f64>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `score` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    /// Peptide sequences to score.
    #[arg(value_name = "SEQ")]
    pub sequences: Vec<String>,

    /// Read additional sequences from a file, one per line.
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// TOML file with physicochemical data for non-standard residue codes.
    #[arg(short, long, value_name = "PATH")]
    pub alphabet: Option<PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `compare` subcommand.
#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    /// The starting peptide sequence.
    #[arg(required = true, value_name = "ORIGINAL")]
    pub original: String,

    /// The refined peptide sequence.
    #[arg(required = true, value_name = "REFINED")]
    pub refined: String,

    /// TOML file with physicochemical data for non-standard residue codes.
    #[arg(short, long, value_name = "PATH")]
    pub alphabet: Option<PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn surface_arguments_are_parsed() {
        let cli = Cli::parse_from([
            "pepsurf", "-vv", "surface", "-i", "res.csv", "--chain", "B", "--window", "5",
            "-S", "pocket.radius=9", "-o", "out.json",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Surface(args) = cli.command else {
            panic!("expected the surface command");
        };
        assert_eq!(args.input, PathBuf::from("res.csv"));
        assert_eq!(args.chain, Some('B'));
        assert_eq!(args.window, Some(5));
        assert_eq!(args.config.set_values, vec!["pocket.radius=9".to_string()]);
        assert_eq!(args.config.output, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn score_accepts_several_sequences() {
        let cli = Cli::parse_from(["pepsurf", "score", "KLWS", "DEDE", "-j", "2"]);
        assert_eq!(cli.threads, Some(2));
        let Commands::Score(args) = cli.command else {
            panic!("expected the score command");
        };
        assert_eq!(args.sequences, vec!["KLWS", "DEDE"]);
        assert!(args.file.is_none());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["pepsurf", "-q", "-v", "compare", "AAAA", "AKAA"]);
        assert!(result.is_err());
    }
}
