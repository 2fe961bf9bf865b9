use super::pockets::Pocket;
use super::surface_exposure::{ExposureCategory, ExposureRecord};
use crate::core::chemistry::tables::ChemicalClass;
use crate::core::models::residue::ResidueRef;
use crate::engine::config::InteractionConfig;
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Declaration order is the tie-break priority for the dominant type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionType {
    Ionic,
    Aromatic,
    HydrogenBonding,
    Hydrophobic,
}

impl InteractionType {
    pub const PRIORITY: [InteractionType; 4] = [
        InteractionType::Ionic,
        InteractionType::Aromatic,
        InteractionType::HydrogenBonding,
        InteractionType::Hydrophobic,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Contributions {
    pub hydrogen_bonding: f64,
    pub ionic: f64,
    pub hydrophobic: f64,
    pub aromatic: f64,
}

impl Contributions {
    pub fn total(&self) -> f64 {
        self.hydrogen_bonding + self.ionic + self.hydrophobic + self.aromatic
    }

    pub fn get(&self, kind: InteractionType) -> f64 {
        match kind {
            InteractionType::Ionic => self.ionic,
            InteractionType::Aromatic => self.aromatic,
            InteractionType::HydrogenBonding => self.hydrogen_bonding,
            InteractionType::Hydrophobic => self.hydrophobic,
        }
    }

    pub fn dominant(&self) -> InteractionType {
        let mut best = InteractionType::PRIORITY[0];
        for kind in InteractionType::PRIORITY.into_iter().skip(1) {
            if self.get(kind) > self.get(best) {
                best = kind;
            }
        }
        best
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionSite {
    pub anchor: ResidueRef,
    pub residues: Vec<ResidueRef>,
    pub score: f64,
    pub contributions: Contributions,
    pub dominant_type: InteractionType,
    pub rank: usize,
    pub merged_windows: usize,
}

struct Candidate {
    start: usize,
    end: usize,
    site: InteractionSite,
}

impl Candidate {
    fn overlaps(&self, other: &Candidate) -> bool {
        self.site.anchor.chain_id == other.site.anchor.chain_id
            && self.start <= other.end
            && other.start <= self.end
    }
}

fn score_window(window: &[&ExposureRecord], config: &InteractionConfig) -> Contributions {
    let weights = &config.weights;
    let mut contributions = Contributions::default();
    let (mut has_positive, mut has_negative) = (false, false);
    let (mut run, mut longest_run) = (0usize, 0usize);

    for record in window {
        let class = match record.chemical_class {
            Some(class) if record.category != ExposureCategory::Unknown => class,
            _ => {
                run = 0;
                continue;
            }
        };

        if class.is_polar() || class.is_charged() {
            contributions.hydrogen_bonding += weights.hydrogen_bonding;
        }
        if class.is_charged() {
            contributions.ionic += weights.ionic;
        }
        has_positive |= class == ChemicalClass::ChargedPositive;
        has_negative |= class == ChemicalClass::ChargedNegative;
        if class == ChemicalClass::Aromatic {
            contributions.aromatic += weights.aromatic;
        }
        if class.is_hydrophobic() {
            contributions.hydrophobic += weights.hydrophobic;
            run += 1;
            longest_run = longest_run.max(run);
        } else {
            run = 0;
        }
    }

    if has_positive && has_negative {
        contributions.ionic += config.ionic_pairing_bonus;
    }
    if longest_run >= 2 {
        contributions.hydrophobic += config.hydrophobic_cluster_bonus;
    }
    contributions
}

fn collect_candidates(records: &[ExposureRecord], config: &InteractionConfig) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for (start, anchor) in records.iter().enumerate() {
        if !anchor.category.is_surface() {
            continue;
        }
        let chain = anchor.residue.chain_id;
        let first = anchor.residue.seq_index;
        let window: Vec<&ExposureRecord> = records[start..]
            .iter()
            .take(config.window)
            .zip(0isize..)
            .take_while(|(r, offset)| {
                r.residue.chain_id == chain && r.residue.seq_index == first + offset
            })
            .map(|(r, _)| r)
            .collect();
        let end = start + window.len() - 1;

        let contributions = score_window(&window, config);
        let score = contributions.total();
        if score <= config.min_score {
            continue;
        }

        candidates.push(Candidate {
            start,
            end,
            site: InteractionSite {
                anchor: anchor.residue,
                residues: window
                    .iter()
                    .filter(|r| r.category != ExposureCategory::Unknown)
                    .map(|r| r.residue)
                    .collect(),
                score,
                contributions,
                dominant_type: contributions.dominant(),
                rank: 0,
                merged_windows: 0,
            },
        });
    }
    candidates
}

/// Finds candidate interaction sites by sliding a window over the exposure
/// records.
///
/// Windows start at surface residues, extend forward in input order and
/// stop at chain boundaries or at gaps in the residue numbering. Overlapping windows on the same chain whose
/// scores lie within `dedup_tolerance` of each other collapse into the
/// higher-scoring one.
#[instrument(skip_all, name = "interaction_sites_task")]
pub fn detect(records: &[ExposureRecord], config: &InteractionConfig) -> Vec<InteractionSite> {
    info!(
        records = records.len(),
        window = config.window,
        "Detecting interaction sites."
    );

    let mut candidates = collect_candidates(records, config);
    // Stable: equal scores keep ascending start order.
    candidates.sort_by(|a, b| b.site.score.total_cmp(&a.site.score));
    debug!(candidates = candidates.len(), "Scored candidate windows.");

    let mut accepted: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        let duplicate_of = accepted.iter_mut().find(|site| {
            let larger = site.site.score.abs().max(candidate.site.score.abs());
            site.overlaps(&candidate)
                && (site.site.score - candidate.site.score).abs() <= config.dedup_tolerance * larger
        });
        match duplicate_of {
            Some(site) => site.site.merged_windows += 1,
            None => accepted.push(candidate),
        }
    }

    let limit = config.max_sites.unwrap_or(usize::MAX);
    let sites: Vec<InteractionSite> = accepted
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, candidate)| InteractionSite {
            rank: i + 1,
            ..candidate.site
        })
        .collect();

    info!(sites = sites.len(), "Interaction site detection complete.");
    sites
}

/// Site counts above this suggest narrowing the design to specific regions.
pub const MANY_SITES: usize = 10;

/// Design guidance derived from the detected sites and pockets.
pub fn recommendations(
    sites: &[InteractionSite],
    pockets: &[Pocket],
    config: &InteractionConfig,
) -> Vec<&'static str> {
    let mut advice = Vec::new();
    if sites.len() > MANY_SITES {
        advice.push("Multiple interaction sites available; consider targeting specific regions");
    }
    if !pockets.is_empty() {
        advice.push("Binding pockets identified; focus peptide design on pocket-complementary sequences");
    }
    if sites.iter().any(|s| s.score > config.high_affinity_score) {
        advice.push("High-affinity interaction sites detected; prioritize these regions");
    }
    advice
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chemistry::tables;
    use crate::core::models::residue::Residue;
    use nalgebra::Point3;

    fn record(code: char, idx: isize, chain: char, category: ExposureCategory) -> ExposureRecord {
        ExposureRecord {
            residue: Residue::new(code, idx, chain).to_ref(),
            position: Point3::new(idx as f64, 0.0, 0.0),
            sasa: (category != ExposureCategory::Unknown).then_some(100.0),
            relative_exposure: None,
            category,
            chemical_class: tables::chemical_class(code),
            failure: None,
        }
    }

    fn exposed(codes: &str, chain: char) -> Vec<ExposureRecord> {
        codes
            .chars()
            .enumerate()
            .map(|(i, c)| record(c, i as isize + 1, chain, ExposureCategory::Exposed))
            .collect()
    }

    #[test]
    fn all_buried_residues_yield_no_sites() {
        let records: Vec<_> = "KDEWFLS"
            .chars()
            .enumerate()
            .map(|(i, c)| record(c, i as isize, 'A', ExposureCategory::Buried))
            .collect();
        assert!(detect(&records, &InteractionConfig::default()).is_empty());
    }

    #[test]
    fn windows_never_cross_chain_boundaries() {
        let mut records = exposed("KD", 'A');
        records.extend(exposed("EWFL", 'B'));
        let sites = detect(
            &records,
            &InteractionConfig {
                dedup_tolerance: 0.0,
                ..Default::default()
            },
        );
        assert!(!sites.is_empty());
        for site in &sites {
            let chain = site.anchor.chain_id;
            assert!(site.residues.iter().all(|r| r.chain_id == chain));
        }
        let last_of_a = sites
            .iter()
            .find(|s| s.anchor.chain_id == 'A' && s.anchor.seq_index == 2)
            .unwrap();
        assert_eq!(last_of_a.residues.len(), 1);
    }

    #[test]
    fn opposite_charges_make_an_ionic_site() {
        let records = exposed("KD", 'A');
        let sites = detect(&records, &InteractionConfig::default());
        let top = &sites[0];
        assert_eq!(top.anchor.seq_index, 1);
        assert_eq!(top.contributions.ionic, 1.5 * 2.0 + 1.0);
        assert_eq!(top.contributions.hydrogen_bonding, 2.0);
        assert_eq!(top.dominant_type, InteractionType::Ionic);
        assert_eq!(top.score, 6.0);
    }

    #[test]
    fn dominant_type_ties_follow_priority() {
        let tie = Contributions {
            hydrogen_bonding: 2.0,
            ionic: 0.0,
            hydrophobic: 2.0,
            aromatic: 0.0,
        };
        assert_eq!(tie.dominant(), InteractionType::HydrogenBonding);
        let all_equal = Contributions {
            hydrogen_bonding: 1.0,
            ionic: 1.0,
            hydrophobic: 1.0,
            aromatic: 1.0,
        };
        assert_eq!(all_equal.dominant(), InteractionType::Ionic);
    }

    #[test]
    fn overlapping_similar_windows_are_merged() {
        let records = exposed("LLLLLL", 'A');
        let sites = detect(&records, &InteractionConfig::default());

        assert_eq!(sites.len(), 4);
        assert_eq!(sites[0].anchor.seq_index, 1);
        assert_eq!(sites[0].score, 4.5);
        assert_eq!(sites[0].merged_windows, 2);
        assert_eq!(sites[0].dominant_type, InteractionType::Hydrophobic);
        let ranks: Vec<usize> = sites.iter().map(|s| s.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
        assert!(sites.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn unknown_residues_neither_anchor_nor_contribute() {
        let records = vec![
            record('K', 1, 'A', ExposureCategory::Unknown),
            record('L', 2, 'A', ExposureCategory::Exposed),
            record('D', 3, 'A', ExposureCategory::Unknown),
            record('L', 4, 'A', ExposureCategory::PartiallyExposed),
        ];
        let sites = detect(&records, &InteractionConfig::default());
        assert!(sites.iter().all(|s| s.anchor.code == 'L'));
        let top = sites.iter().find(|s| s.anchor.seq_index == 2).unwrap();
        assert_eq!(top.contributions.ionic, 0.0);
        assert_eq!(top.contributions.hydrophobic, 2.0);
        assert_eq!(top.residues.len(), 2);
    }

    #[test]
    fn max_sites_truncates_the_ranked_list() {
        let records = exposed("LLLLLL", 'A');
        let sites = detect(
            &records,
            &InteractionConfig {
                max_sites: Some(2),
                ..Default::default()
            },
        );
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[1].rank, 2);
    }

    #[test]
    fn windows_stop_at_numbering_gaps() {
        let records = vec![
            record('K', 10, 'A', ExposureCategory::Exposed),
            record('S', 11, 'A', ExposureCategory::Exposed),
            record('D', 40, 'A', ExposureCategory::Exposed),
            record('E', 41, 'A', ExposureCategory::Exposed),
        ];
        let sites = detect(
            &records,
            &InteractionConfig {
                dedup_tolerance: 0.0,
                ..Default::default()
            },
        );
        let first = sites.iter().find(|s| s.anchor.seq_index == 10).unwrap();
        let indices: Vec<isize> = first.residues.iter().map(|r| r.seq_index).collect();
        assert_eq!(indices, vec![10, 11]);
        assert_eq!(first.contributions.ionic, 1.5);
        for site in &sites {
            let span = site.residues.last().unwrap().seq_index - site.anchor.seq_index;
            assert_eq!(span as usize, site.residues.len() - 1);
        }
    }

    #[test]
    fn recommendations_follow_sites_and_pockets() {
        let config = InteractionConfig::default();
        assert!(recommendations(&[], &[], &config).is_empty());

        let records = exposed("KD", 'A');
        let sites = detect(&records, &config);
        assert!(sites[0].score > config.high_affinity_score);
        let advice = recommendations(&sites, &[], &config);
        assert_eq!(advice.len(), 1);
        assert!(advice[0].starts_with("High-affinity"));

        let many = exposed("KDKDKDKDKDKDKDKDKDKDKDKDKD", 'A');
        let crowded = detect(
            &many,
            &InteractionConfig {
                dedup_tolerance: 0.0,
                ..Default::default()
            },
        );
        assert!(crowded.len() > MANY_SITES);
        let advice = recommendations(&crowded, &[], &config);
        assert!(advice.iter().any(|a| a.starts_with("Multiple interaction sites")));

        let pocket = Pocket {
            center: Residue::new('W', 5, 'A').to_ref(),
            center_position: Point3::origin(),
            members: Vec::new(),
            curvature: -0.4,
            size: 4,
            diversity: 2,
            composition: Default::default(),
            score: 0.8,
            rank: 1,
        };
        let advice = recommendations(&[], &[pocket], &config);
        assert_eq!(advice.len(), 1);
        assert!(advice[0].starts_with("Binding pockets identified"));
    }

    #[test]
    fn detection_is_deterministic() {
        let records = exposed("KWDLLSEYF", 'A');
        let config = InteractionConfig::default();
        assert_eq!(detect(&records, &config), detect(&records, &config));
    }
}
