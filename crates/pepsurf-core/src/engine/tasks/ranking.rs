use super::peptide_scoring::{Metric, PeptideScoreCard};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Mean of binding affinity, stability, inverted immunogenicity risk and
/// solubility over whichever of them are known. `None` when none are.
pub fn aggregate(card: &PeptideScoreCard) -> Option<f64> {
    let parts: Vec<f64> = [
        card.binding_affinity,
        card.stability.map(|s| s.score),
        card.immunogenicity_risk.map(|r| 1.0 - r),
        card.solubility_score,
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.iter().sum::<f64>() / parts.len() as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCard {
    pub rank: usize,
    pub aggregate: Option<f64>,
    pub card: PeptideScoreCard,
}

fn compare_ranked(a: &RankedCard, b: &RankedCard) -> Ordering {
    match (a.aggregate, b.aggregate) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.card.sequence.cmp(&b.card.sequence))
}

/// Orders cards by aggregate score (best first), then by sequence. Cards
/// without an aggregate come last. The output does not depend on input order.
pub fn rank(cards: impl IntoIterator<Item = PeptideScoreCard>) -> Vec<RankedCard> {
    let mut ranked: Vec<RankedCard> = cards
        .into_iter()
        .map(|card| RankedCard {
            rank: 0,
            aggregate: aggregate(&card),
            card,
        })
        .collect();
    ranked.sort_by(compare_ranked);
    for (i, entry) in ranked.iter_mut().enumerate() {
        entry.rank = i + 1;
    }
    ranked
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub original: PeptideScoreCard,
    pub refined: PeptideScoreCard,
    pub deltas: BTreeMap<Metric, f64>,
    pub improvement: Option<f64>,
    pub improved: Vec<Metric>,
    pub regressed: Vec<Metric>,
}

/// Signed `refined - original` deltas for every metric known on both sides.
///
/// Immunogenicity is a risk, so a negative delta counts as an improvement.
/// Secondary-structure fractions are reported but never judged.
pub fn compare(original: PeptideScoreCard, refined: PeptideScoreCard) -> ComparisonResult {
    let mut deltas = BTreeMap::new();
    let mut improved = Vec::new();
    let mut regressed = Vec::new();

    for metric in Metric::ALL {
        let (Some(before), Some(after)) = (original.metric(metric), refined.metric(metric)) else {
            continue;
        };
        let delta = after - before;
        deltas.insert(metric, delta);

        match metric.higher_is_better() {
            Some(true) if delta > 0.0 => improved.push(metric),
            Some(true) if delta < 0.0 => regressed.push(metric),
            Some(false) if delta < 0.0 => improved.push(metric),
            Some(false) if delta > 0.0 => regressed.push(metric),
            _ => {}
        }
    }

    let improvement = match (aggregate(&original), aggregate(&refined)) {
        (Some(before), Some(after)) => Some(after - before),
        _ => None,
    };

    ComparisonResult {
        original,
        refined,
        deltas,
        improvement,
        improved,
        regressed,
    }
}
