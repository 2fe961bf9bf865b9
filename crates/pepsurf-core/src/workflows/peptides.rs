use crate::engine::error::{EngineError, ErrorReport};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks::peptide_scoring::{PeptideAnalyzer, PeptideScoreCard};
use crate::engine::tasks::ranking::{self, ComparisonResult, RankedCard};
use serde::Serialize;
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedSequence {
    pub input: String,
    pub error: ErrorReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub ranked: Vec<RankedCard>,
    pub rejected: Vec<RejectedSequence>,
}

/// Scores each sequence independently, preserving input order.
#[instrument(skip_all, name = "peptide_batch_scoring")]
pub fn score_batch<S: AsRef<str> + Sync>(
    analyzer: &PeptideAnalyzer,
    sequences: &[S],
    reporter: &ProgressReporter,
) -> Vec<Result<PeptideScoreCard, EngineError>> {
    info!(sequences = sequences.len(), "Scoring peptide batch.");
    reporter.report(Progress::TaskStart {
        total_steps: sequences.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = sequences.iter();

    #[cfg(feature = "parallel")]
    let iterator = sequences.par_iter();

    let results: Vec<_> = iterator
        .map(|sequence| {
            let result = analyzer.score(sequence.as_ref());
            reporter.report(Progress::TaskIncrement);
            result
        })
        .collect();

    reporter.report(Progress::TaskFinish);
    results
}

/// Scores a batch and ranks the valid cards. Invalid sequences are reported
/// individually and do not stop the rest of the batch.
pub fn score_and_rank<S: AsRef<str> + Sync>(
    analyzer: &PeptideAnalyzer,
    sequences: &[S],
    reporter: &ProgressReporter,
) -> BatchReport {
    let results = reporter.phase("Peptide Scoring", || {
        score_batch(analyzer, sequences, reporter)
    });

    let mut cards = Vec::with_capacity(results.len());
    let mut rejected = Vec::new();
    for (input, result) in sequences.iter().zip(results) {
        match result {
            Ok(card) => cards.push(card),
            Err(e) => {
                warn!(input = input.as_ref(), error = %e, "Rejected peptide sequence.");
                rejected.push(RejectedSequence {
                    input: input.as_ref().to_string(),
                    error: e.report(),
                });
            }
        }
    }

    let ranked = reporter.phase("Ranking", || ranking::rank(cards));
    info!(
        ranked = ranked.len(),
        rejected = rejected.len(),
        "Peptide batch complete."
    );
    BatchReport { ranked, rejected }
}

pub fn compare_sequences(
    analyzer: &PeptideAnalyzer,
    original: &str,
    refined: &str,
) -> Result<ComparisonResult, EngineError> {
    let original = analyzer.score(original)?;
    let refined = analyzer.score(refined)?;
    Ok(ranking::compare(original, refined))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn batch_results_keep_input_order() {
        let analyzer = PeptideAnalyzer::default();
        let sequences = ["KLWS", "AXQ1", "DEDEDEDE"];
        let results = score_batch(&analyzer, &sequences, &ProgressReporter::new());
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().sequence, "KLWS");
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().sequence, "DEDEDEDE");
    }

    #[test]
    fn batch_matches_individual_scoring() {
        let analyzer = PeptideAnalyzer::default();
        let sequences: Vec<String> = ["GRKDEWFY", "AAAAAAAA", "PPGGPPGG"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let batch = score_batch(&analyzer, &sequences, &ProgressReporter::new());
        for (sequence, result) in sequences.iter().zip(batch) {
            assert_eq!(result.unwrap(), analyzer.score(sequence).unwrap());
        }
    }

    #[test]
    fn invalid_sequences_are_rejected_individually() {
        let analyzer = PeptideAnalyzer::default();
        let report = score_and_rank(
            &analyzer,
            &["AAAAAAAA", "AXQ1", "", "LKSWE"],
            &ProgressReporter::new(),
        );
        assert_eq!(report.ranked.len(), 2);
        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.rejected[0].input, "AXQ1");
        assert_eq!(report.rejected[0].error.kind, "InvalidSequence");
    }

    #[test]
    fn every_sequence_increments_progress() {
        let increments = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&increments);
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            if event == Progress::TaskIncrement {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        }));
        score_batch(&PeptideAnalyzer::default(), &["A", "K", "W", "1"], &reporter);
        assert_eq!(increments.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn compare_sequences_scores_both_sides() {
        let analyzer = PeptideAnalyzer::default();
        let result = compare_sequences(&analyzer, "AAAAAAAA", "AKAEAAAA").unwrap();
        assert_eq!(result.original.sequence, "AAAAAAAA");
        assert_eq!(result.refined.sequence, "AKAEAAAA");
        assert!(result.improvement.is_some());
        assert!(compare_sequences(&analyzer, "AAAA", "AA1A").is_err());
    }
}
