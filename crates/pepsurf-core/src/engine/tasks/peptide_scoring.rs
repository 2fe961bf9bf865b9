use crate::core::chemistry::alphabet::{ResidueAlphabet, StandardAlphabet};
use super::interaction_sites::InteractionType;
use crate::core::chemistry::tables::{
    self, ChemicalClass, PKA_C_TERMINUS, PKA_N_TERMINUS, Propensity, WATER_MASS,
};
use crate::core::sasa::OracleError;
use crate::engine::config::{PeptideScoringConfig, StabilityParams};
use crate::engine::error::{EngineError, ScoreError, SequenceError};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Short motifs associated with elevated immunogenicity.
pub const IMMUNOGENIC_MOTIFS: &[&str] = &["KKK", "RRR", "KRK", "RKR", "WW", "FWY", "LLL"];

/// Optional external stability predictor (for example a ProtParam-like
/// service). Its answer replaces the local heuristic when it succeeds.
pub trait StabilityOracle: Send + Sync {
    fn name(&self) -> &str;

    /// Stability in `[0, 1]` for a validated, uppercase sequence.
    fn stability(&self, sequence: &str) -> Result<f64, OracleError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    BindingAffinity,
    Stability,
    Immunogenicity,
    Solubility,
    Helix,
    Sheet,
    Turn,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::BindingAffinity,
        Metric::Stability,
        Metric::Immunogenicity,
        Metric::Solubility,
        Metric::Helix,
        Metric::Sheet,
        Metric::Turn,
    ];

    /// `Some(true)` when a larger value is better, `Some(false)` when a
    /// smaller value is better, `None` for descriptive metrics.
    pub fn higher_is_better(self) -> Option<bool> {
        match self {
            Metric::BindingAffinity | Metric::Stability | Metric::Solubility => Some(true),
            Metric::Immunogenicity => Some(false),
            Metric::Helix | Metric::Sheet | Metric::Turn => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::BindingAffinity => "binding-affinity",
            Metric::Stability => "stability",
            Metric::Immunogenicity => "immunogenicity",
            Metric::Solubility => "solubility",
            Metric::Helix => "helix",
            Metric::Sheet => "sheet",
            Metric::Turn => "turn",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StabilitySource {
    Local,
    Oracle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StabilityAssessment {
    pub score: f64,
    pub risk_level: RiskLevel,
    pub source: StabilitySource,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SecondaryStructure {
    pub helix: f64,
    pub sheet: f64,
    pub turn: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhysicochemicalProfile {
    pub length: usize,
    pub molecular_weight: Option<f64>,
    pub gravy: Option<f64>,
    pub net_charge: Option<f64>,
    pub aliphatic_index: Option<f64>,
    pub isoelectric_point: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompositionBreakdown {
    pub hydrophobic_fraction: f64,
    pub charged_fraction: f64,
    pub polar_fraction: f64,
    pub evenness: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StabilityPenalty {
    pub reason: &'static str,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolubilityBreakdown {
    pub hydropathy_term: f64,
    pub charge_term: f64,
}

/// Residue counts per interaction a peptide can take part in. A residue
/// may count towards several types.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InteractionPotential {
    pub hydrogen_bonding: usize,
    pub ionic: usize,
    pub hydrophobic: usize,
    pub aromatic: usize,
    pub total: usize,
    /// `None` when no residue contributes.
    pub primary: Option<InteractionType>,
    pub diversity: usize,
}

impl InteractionPotential {
    pub fn get(&self, kind: InteractionType) -> usize {
        match kind {
            InteractionType::Ionic => self.ionic,
            InteractionType::Aromatic => self.aromatic,
            InteractionType::HydrogenBonding => self.hydrogen_bonding,
            InteractionType::Hydrophobic => self.hydrophobic,
        }
    }
}

/// The factors behind each score, for explanation.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ScoreBreakdown {
    pub composition: Option<CompositionBreakdown>,
    pub interaction_potential: Option<InteractionPotential>,
    pub pro_gly_fraction: f64,
    pub longest_hydrophobic_run: Option<usize>,
    pub stability_penalties: Vec<StabilityPenalty>,
    pub immunogenic_motifs: Vec<&'static str>,
    pub solubility: Option<SolubilityBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Highlights {
    pub strengths: Vec<&'static str>,
    pub concerns: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Recommendations {
    pub stability: Vec<&'static str>,
    pub solubility: Vec<&'static str>,
    pub overall: Vec<&'static str>,
}

impl Recommendations {
    pub fn is_empty(&self) -> bool {
        self.stability.is_empty() && self.solubility.is_empty() && self.overall.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ScoreIssue {
    UnknownResidueCode {
        metric: Metric,
        code: char,
        position: usize,
    },
    OracleFallback {
        metric: Metric,
        oracle: String,
        error: OracleError,
    },
}

impl ScoreIssue {
    fn unknown(metric: Metric, error: ScoreError) -> Self {
        let ScoreError::UnknownResidueCode { code, position } = error;
        ScoreIssue::UnknownResidueCode {
            metric,
            code,
            position,
        }
    }

    pub fn metric(&self) -> Metric {
        match self {
            ScoreIssue::UnknownResidueCode { metric, .. } => *metric,
            ScoreIssue::OracleFallback { metric, .. } => *metric,
        }
    }
}

/// Independent heuristic scores for one peptide. Refining a peptide
/// produces a new card; cards are never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeptideScoreCard {
    pub sequence: String,
    pub binding_affinity: Option<f64>,
    pub stability: Option<StabilityAssessment>,
    pub immunogenicity_risk: Option<f64>,
    pub solubility_score: Option<f64>,
    pub secondary_structure: Option<SecondaryStructure>,
    pub profile: PhysicochemicalProfile,
    pub breakdown: ScoreBreakdown,
    pub highlights: Highlights,
    pub recommendations: Recommendations,
    pub issues: Vec<ScoreIssue>,
}

impl PeptideScoreCard {
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::BindingAffinity => self.binding_affinity,
            Metric::Stability => self.stability.map(|s| s.score),
            Metric::Immunogenicity => self.immunogenicity_risk,
            Metric::Solubility => self.solubility_score,
            Metric::Helix => self.secondary_structure.map(|s| s.helix),
            Metric::Sheet => self.secondary_structure.map(|s| s.sheet),
            Metric::Turn => self.secondary_structure.map(|s| s.turn),
        }
    }
}

#[inline]
fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

fn lookup<T>(codes: &[char], get: impl Fn(char) -> Option<T>) -> Result<Vec<T>, ScoreError> {
    codes
        .iter()
        .enumerate()
        .map(|(position, &code)| get(code).ok_or(ScoreError::UnknownResidueCode { code, position }))
        .collect()
}

fn tally(classes: &[ChemicalClass], predicate: impl Fn(ChemicalClass) -> bool) -> usize {
    classes.iter().filter(|&&c| predicate(c)).count()
}

fn fraction(classes: &[ChemicalClass], predicate: impl Fn(ChemicalClass) -> bool) -> f64 {
    tally(classes, predicate) as f64 / classes.len() as f64
}

fn longest_run(classes: &[ChemicalClass], predicate: impl Fn(ChemicalClass) -> bool) -> usize {
    let (mut run, mut longest) = (0, 0);
    for &class in classes {
        if predicate(class) {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest
}

fn composition(classes: &[ChemicalClass]) -> CompositionBreakdown {
    let hydrophobic = fraction(classes, ChemicalClass::is_apolar);
    let charged = fraction(classes, ChemicalClass::is_charged);
    let polar = fraction(classes, ChemicalClass::is_polar);

    let sum = hydrophobic + charged + polar;
    let evenness = if sum > 0.0 {
        let entropy: f64 = [hydrophobic, charged, polar]
            .iter()
            .map(|f| f / sum)
            .filter(|&p| p > 0.0)
            .map(|p| -p * p.ln())
            .sum();
        entropy / 3f64.ln()
    } else {
        0.0
    };

    CompositionBreakdown {
        hydrophobic_fraction: hydrophobic,
        charged_fraction: charged,
        polar_fraction: polar,
        evenness,
    }
}

fn interaction_potential(classes: &[ChemicalClass]) -> InteractionPotential {
    let mut potential = InteractionPotential {
        hydrogen_bonding: tally(classes, ChemicalClass::is_polar),
        ionic: tally(classes, ChemicalClass::is_charged),
        hydrophobic: tally(classes, ChemicalClass::is_apolar),
        aromatic: tally(classes, |c| c == ChemicalClass::Aromatic),
        total: 0,
        primary: None,
        diversity: 0,
    };
    let counts = InteractionType::PRIORITY.map(|kind| (kind, potential.get(kind)));
    potential.total = counts.iter().map(|&(_, n)| n).sum();
    potential.diversity = counts.iter().filter(|&&(_, n)| n > 0).count();
    potential.primary = counts
        .iter()
        .fold(None, |best: Option<(InteractionType, usize)>, &(kind, n)| match best {
            Some((_, top)) if top >= n => best,
            _ if n > 0 => Some((kind, n)),
            _ => best,
        })
        .map(|(kind, _)| kind);
    potential
}

const PI_TOLERANCE: f64 = 1e-3;

fn net_charge_at(codes: &[char], ph: f64) -> f64 {
    let base = |pka: f64| 1.0 / (1.0 + 10f64.powf(ph - pka));
    let acid = |pka: f64| -1.0 / (1.0 + 10f64.powf(pka - ph));
    let side_chains: f64 = codes
        .iter()
        .filter_map(|&c| tables::side_chain_pka(c))
        .map(|(pka, sign)| if sign > 0.0 { base(pka) } else { acid(pka) })
        .sum();
    base(PKA_N_TERMINUS) + acid(PKA_C_TERMINUS) + side_chains
}

/// pH of zero net charge (Henderson-Hasselbalch, bisection over 0..14).
fn isoelectric_point(codes: &[char]) -> f64 {
    let (mut lo, mut hi) = (0.0, 14.0);
    for _ in 0..100 {
        let mid = (lo + hi) / 2.0;
        let charge = net_charge_at(codes, mid);
        if charge.abs() < PI_TOLERANCE {
            return mid;
        }
        if charge > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    (lo + hi) / 2.0
}

pub fn risk_level(score: f64, params: &StabilityParams) -> RiskLevel {
    if score >= params.low_risk_min {
        RiskLevel::Low
    } else if score >= params.medium_risk_min {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

struct LocalStability {
    score: f64,
    longest_run: usize,
    penalties: Vec<StabilityPenalty>,
}

fn local_stability(codes: &[char], classes: &[ChemicalClass], params: &StabilityParams) -> LocalStability {
    let n = codes.len() as f64;
    let mut penalties = Vec::new();

    let pro_gly = codes.iter().filter(|&&c| c == 'P' || c == 'G').count() as f64 / n;
    let excess = pro_gly - params.pro_gly_threshold;
    if excess > 0.0 {
        penalties.push(StabilityPenalty {
            reason: "high proline/glycine content",
            amount: (params.pro_gly_slope * excess).min(params.pro_gly_max_penalty),
        });
    }

    let cysteines = codes.iter().filter(|&&c| c == 'C').count();
    let has_positive = classes.contains(&ChemicalClass::ChargedPositive);
    let has_negative = classes.contains(&ChemicalClass::ChargedNegative);
    if cysteines < 2 && !(has_positive && has_negative) {
        penalties.push(StabilityPenalty {
            reason: "no disulfide or salt-bridge motif",
            amount: params.missing_motif_penalty,
        });
    }

    let run = longest_run(classes, ChemicalClass::is_apolar);
    if run > params.hydrophobic_run_limit {
        let extra = (run - params.hydrophobic_run_limit) as f64;
        penalties.push(StabilityPenalty {
            reason: "long hydrophobic stretch",
            amount: (params.run_penalty_per_residue * extra).min(params.run_max_penalty),
        });
    }

    let total: f64 = penalties.iter().map(|p| p.amount).sum();
    LocalStability {
        score: clamp_unit(1.0 - total),
        longest_run: run,
        penalties,
    }
}

fn secondary_structure(propensities: &[Propensity]) -> SecondaryStructure {
    let n = propensities.len() as f64;
    let helix = propensities.iter().map(|p| p.helix).sum::<f64>() / n;
    let sheet = propensities.iter().map(|p| p.sheet).sum::<f64>() / n;
    let turn = propensities.iter().map(|p| p.turn).sum::<f64>() / n;
    let total = helix + sheet + turn;
    if total > 0.0 {
        SecondaryStructure {
            helix: helix / total,
            sheet: sheet / total,
            turn: turn / total,
        }
    } else {
        SecondaryStructure {
            helix: 0.0,
            sheet: 0.0,
            turn: 0.0,
        }
    }
}

fn highlights(card: &PeptideScoreCard) -> Highlights {
    let mut h = Highlights::default();
    if card.binding_affinity.is_some_and(|b| b > 0.6) {
        h.strengths.push("High binding potential");
    }
    if let Some(stability) = card.stability {
        match stability.risk_level {
            RiskLevel::Low => h.strengths.push("Good stability profile"),
            RiskLevel::High => h.concerns.push("Potential stability issues"),
            RiskLevel::Medium => {}
        }
    }
    if let Some(solubility) = card.solubility_score {
        if solubility >= 0.7 {
            h.strengths.push("High solubility");
        } else if solubility < 0.4 {
            h.concerns.push("Low solubility");
        }
    }
    if card.immunogenicity_risk.is_some_and(|r| r >= 0.5) {
        h.concerns.push("High immunogenicity risk");
    }
    if card.binding_affinity.is_some_and(|b| b < 0.4) {
        h.concerns.push("Weak binding potential");
    }
    h
}

const PROLINE_RICH_ABOVE: f64 = 0.15;
const HYDROPHOBIC_CLUSTER_ABOVE: f64 = 0.4;
const LOW_NET_CHARGE_BELOW: f64 = 2.0;

fn recommendations(card: &PeptideScoreCard) -> Recommendations {
    let mut r = Recommendations::default();
    let n = card.profile.length as f64;
    let count = |code: char| card.sequence.chars().filter(|&c| c == code).count();

    if count('C') >= 2 {
        r.stability.push("Consider disulfide bond formation for stability");
    }
    if count('P') as f64 / n > PROLINE_RICH_ABOVE {
        r.stability.push("Proline-rich regions may confer rigidity");
    }
    if card
        .breakdown
        .composition
        .is_some_and(|c| c.hydrophobic_fraction > HYDROPHOBIC_CLUSTER_ABOVE)
    {
        r.stability.push("Hydrophobic clusters may affect solubility");
    }

    if card.profile.gravy.is_some_and(|g| g > 0.0) {
        r.solubility.push("Consider adding charged residues for solubility");
    }
    if card.profile.net_charge.is_some_and(|q| q.abs() < LOW_NET_CHARGE_BELOW) {
        r.solubility.push("Low net charge may affect solubility");
    }

    if card.solubility_score.is_some_and(|s| s < 0.4) {
        r.overall.push("Consider sequence modifications for improved solubility");
    }
    if card.immunogenicity_risk.is_some_and(|risk| risk >= 0.5) {
        r.overall.push("Evaluate immunogenicity in experimental studies");
    }
    if card.binding_affinity.is_some_and(|b| b < 0.4) {
        r.overall.push("Consider alternative sequences for better binding");
    }
    r
}

/// Scores peptide sequences against a residue alphabet.
///
/// Scoring is a pure function of the sequence unless a [`StabilityOracle`]
/// is attached.
#[derive(Clone)]
pub struct PeptideAnalyzer {
    alphabet: Arc<dyn ResidueAlphabet>,
    config: PeptideScoringConfig,
    stability_oracle: Option<Arc<dyn StabilityOracle>>,
}

impl PeptideAnalyzer {
    pub fn new(config: PeptideScoringConfig) -> Self {
        Self {
            alphabet: Arc::new(StandardAlphabet),
            config,
            stability_oracle: None,
        }
    }

    pub fn with_alphabet(mut self, alphabet: Arc<dyn ResidueAlphabet>) -> Self {
        self.alphabet = alphabet;
        self
    }

    pub fn with_stability_oracle(mut self, oracle: Arc<dyn StabilityOracle>) -> Self {
        self.stability_oracle = Some(oracle);
        self
    }

    pub fn config(&self) -> &PeptideScoringConfig {
        &self.config
    }

    /// Trims and uppercases `sequence`, then checks its length and alphabet.
    pub fn normalize(&self, sequence: &str) -> Result<String, SequenceError> {
        let normalized: String = sequence
            .trim()
            .chars()
            .map(|c| c.to_ascii_uppercase())
            .collect();

        let length = normalized.chars().count();
        if length == 0 {
            return Err(SequenceError::Empty);
        }
        if length > self.config.max_length {
            return Err(SequenceError::TooLong {
                length,
                max: self.config.max_length,
            });
        }
        if let Some((position, character)) = normalized
            .chars()
            .enumerate()
            .find(|&(_, c)| !self.alphabet.recognizes(c))
        {
            return Err(SequenceError::InvalidCharacter {
                character,
                position,
            });
        }
        Ok(normalized)
    }

    #[instrument(skip_all, name = "peptide_scoring_task", fields(sequence = %sequence.trim()))]
    pub fn score(&self, sequence: &str) -> Result<PeptideScoreCard, EngineError> {
        let sequence = self.normalize(sequence)?;
        let codes: Vec<char> = sequence.chars().collect();
        let n = codes.len() as f64;
        let alphabet = self.alphabet.as_ref();
        let mut issues = Vec::new();
        let mut breakdown = ScoreBreakdown {
            pro_gly_fraction: codes.iter().filter(|&&c| c == 'P' || c == 'G').count() as f64 / n,
            ..Default::default()
        };

        let classes = lookup(&codes, |c| alphabet.chemical_class(c));
        let hydropathy = lookup(&codes, |c| alphabet.hydropathy(c));
        let charges = lookup(&codes, |c| alphabet.formal_charge(c));
        let masses = lookup(&codes, |c| alphabet.residue_mass(c));
        let propensities = lookup(&codes, |c| alphabet.propensity(c));

        let mut degrade = |metric: Metric, error: &ScoreError| {
            issues.push(ScoreIssue::unknown(metric, error.clone()));
        };

        let binding_affinity = match &classes {
            Ok(classes) => {
                let c = composition(classes);
                let w = &self.config.binding;
                breakdown.composition = Some(c);
                breakdown.interaction_potential = Some(interaction_potential(classes));
                Some(clamp_unit(
                    w.hydrophobic * c.hydrophobic_fraction
                        + w.charged * c.charged_fraction
                        + w.polar * c.polar_fraction
                        + w.evenness * c.evenness,
                ))
            }
            Err(e) => {
                degrade(Metric::BindingAffinity, e);
                None
            }
        };

        let local = match &classes {
            Ok(classes) => {
                let local = local_stability(&codes, classes, &self.config.stability);
                breakdown.longest_hydrophobic_run = Some(local.longest_run);
                breakdown.stability_penalties = local.penalties;
                Ok(local.score)
            }
            Err(e) => Err(e.clone()),
        };

        let immunogenicity_risk = match &classes {
            Ok(classes) => {
                let motifs: Vec<&'static str> = IMMUNOGENIC_MOTIFS
                    .iter()
                    .copied()
                    .filter(|m| sequence.contains(m))
                    .collect();
                let p = &self.config.immunogenicity;
                let risk = p.charged_weight * fraction(classes, ChemicalClass::is_charged)
                    + p.motif_weight * motifs.len() as f64;
                breakdown.immunogenic_motifs = motifs;
                Some(clamp_unit(risk))
            }
            Err(e) => {
                degrade(Metric::Immunogenicity, e);
                None
            }
        };

        let gravy = hydropathy.as_ref().ok().map(|h| h.iter().sum::<f64>() / n);
        let net_charge = charges.as_ref().ok().map(|c| c.iter().sum::<f64>());

        let solubility_score = match (gravy, net_charge) {
            (Some(gravy), Some(net)) => {
                let p = &self.config.solubility;
                let hydropathy_term = (-((gravy - p.gravy_center) / p.gravy_width).powi(2)).exp();
                let charge_term = 1.0 / (1.0 + ((net.abs() / n) / p.charge_scale).powi(2));
                breakdown.solubility = Some(SolubilityBreakdown {
                    hydropathy_term,
                    charge_term,
                });
                Some(clamp_unit(
                    p.gravy_weight * hydropathy_term + p.charge_weight * charge_term,
                ))
            }
            _ => {
                let error = hydropathy
                    .as_ref()
                    .err()
                    .or_else(|| charges.as_ref().err());
                if let Some(e) = error {
                    degrade(Metric::Solubility, e);
                }
                None
            }
        };

        let secondary_structure = match &propensities {
            Ok(p) => Some(secondary_structure(p)),
            Err(e) => {
                for metric in [Metric::Helix, Metric::Sheet, Metric::Turn] {
                    degrade(metric, e);
                }
                None
            }
        };

        let stability = match self.oracle_stability(&sequence, &mut issues) {
            Some(score) => Some(StabilityAssessment {
                score,
                risk_level: risk_level(score, &self.config.stability),
                source: StabilitySource::Oracle,
            }),
            None => match local {
                Ok(score) => Some(StabilityAssessment {
                    score,
                    risk_level: risk_level(score, &self.config.stability),
                    source: StabilitySource::Local,
                }),
                Err(e) => {
                    issues.push(ScoreIssue::unknown(Metric::Stability, e));
                    None
                }
            },
        };

        let count = |code: char| codes.iter().filter(|&&c| c == code).count() as f64 / n;
        let profile = PhysicochemicalProfile {
            length: codes.len(),
            molecular_weight: masses.ok().map(|m| m.iter().sum::<f64>() + WATER_MASS),
            gravy,
            net_charge,
            aliphatic_index: classes.is_ok().then(|| {
                100.0 * (count('A') + 2.9 * count('V') + 3.9 * (count('I') + count('L')))
            }),
            isoelectric_point: classes.is_ok().then(|| isoelectric_point(&codes)),
        };

        let mut card = PeptideScoreCard {
            sequence,
            binding_affinity,
            stability,
            immunogenicity_risk,
            solubility_score,
            secondary_structure,
            profile,
            breakdown,
            highlights: Highlights::default(),
            recommendations: Recommendations::default(),
            issues,
        };
        card.highlights = highlights(&card);
        card.recommendations = recommendations(&card);

        debug!(issues = card.issues.len(), "Peptide scored.");
        Ok(card)
    }

    fn oracle_stability(&self, sequence: &str, issues: &mut Vec<ScoreIssue>) -> Option<f64> {
        let oracle = self.stability_oracle.as_ref()?;
        let error = match oracle.stability(sequence) {
            Ok(value) if value.is_finite() => return Some(clamp_unit(value)),
            Ok(value) => OracleError::InvalidValue { value },
            Err(e) => e,
        };
        warn!(
            oracle = oracle.name(),
            error = %error,
            "Stability oracle failed; using local heuristic."
        );
        issues.push(ScoreIssue::OracleFallback {
            metric: Metric::Stability,
            oracle: oracle.name().to_string(),
            error,
        });
        None
    }
}

impl Default for PeptideAnalyzer {
    fn default() -> Self {
        Self::new(PeptideScoringConfig::default())
    }
}
