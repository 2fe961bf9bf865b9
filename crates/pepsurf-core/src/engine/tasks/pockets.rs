use super::surface_exposure::ExposureRecord;
use crate::core::chemistry::tables::ChemicalClass;
use crate::core::models::residue::ResidueRef;
use crate::core::utils::geometry::{shell_volume, sphere_volume, to_array};
use crate::engine::config::PocketConfig;
use kiddo::{KdTree, SquaredEuclidean};
use nalgebra::Point3;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Fraction of pocket members in each broad chemical category.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PocketComposition {
    pub hydrophobic: f64,
    pub charged: f64,
    pub aromatic: f64,
    pub polar: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pocket {
    pub center: ResidueRef,
    pub center_position: Point3<f64>,
    pub members: Vec<ResidueRef>,
    pub curvature: f64,
    pub size: usize,
    pub diversity: usize,
    pub composition: PocketComposition,
    pub score: f64,
    pub rank: usize,
}

struct SurfacePoint<'a> {
    record: &'a ExposureRecord,
    position: [f64; 3],
}

fn composition(classes: &[Option<ChemicalClass>]) -> PocketComposition {
    let total = classes.len().max(1) as f64;
    let fraction = |predicate: fn(ChemicalClass) -> bool| {
        classes.iter().flatten().filter(|&&c| predicate(c)).count() as f64 / total
    };
    PocketComposition {
        hydrophobic: fraction(ChemicalClass::is_hydrophobic),
        charged: fraction(ChemicalClass::is_charged),
        aromatic: fraction(|c| c == ChemicalClass::Aromatic),
        polar: fraction(ChemicalClass::is_polar),
    }
}

fn evaluate(
    center_index: usize,
    points: &[SurfacePoint],
    tree: &KdTree<f64, 3>,
    config: &PocketConfig,
) -> Option<Pocket> {
    let center = &points[center_index];
    let neighbours =
        tree.within_unsorted::<SquaredEuclidean>(&center.position, config.radius * config.radius);
    if neighbours.len() < config.min_residues {
        return None;
    }

    let inner_sq = config.inner_radius * config.inner_radius;
    let (mut inner, mut shell) = (0usize, 0usize);
    for n in neighbours.iter().filter(|n| n.item as usize != center_index) {
        if n.distance <= inner_sq {
            inner += 1;
        } else {
            shell += 1;
        }
    }

    let inner_density = inner as f64 / sphere_volume(config.inner_radius);
    let shell_density = shell as f64 / shell_volume(config.inner_radius, config.radius);
    let total_density = inner_density + shell_density;
    if total_density <= 0.0 {
        return None;
    }
    let curvature = (inner_density - shell_density) / total_density;
    if curvature >= 0.0 {
        return None;
    }

    let mut members: Vec<&ExposureRecord> = neighbours
        .iter()
        .map(|n| points[n.item as usize].record)
        .collect();
    members.sort_by_key(|r| (r.residue.chain_id, r.residue.seq_index));

    let classes: Vec<Option<ChemicalClass>> = members.iter().map(|r| r.chemical_class).collect();
    let distinct: BTreeSet<ChemicalClass> = classes.iter().flatten().copied().collect();
    let apolar = distinct.iter().any(|c| c.is_apolar());
    let hydrophilic = distinct.iter().any(|c| c.is_polar() || c.is_charged());
    let mixed_factor = if apolar && hydrophilic {
        1.0 + config.mixed_character_bonus
    } else {
        1.0
    };

    Some(Pocket {
        center: center.record.residue,
        center_position: center.record.position,
        members: members.iter().map(|r| r.residue).collect(),
        curvature,
        size: members.len(),
        diversity: distinct.len(),
        composition: composition(&classes),
        score: -curvature * distinct.len() as f64 * mixed_factor,
        rank: 0,
    })
}

/// Locates concave, chemically diverse patches among surface residues.
///
/// Every surface residue is tried as a pocket center. Its neighbourhood is the
/// set of surface residues within `radius`; the neighbourhood is concave when
/// the density of neighbours in the outer shell exceeds the density inside
/// `inner_radius`.
#[instrument(skip_all, name = "pocket_detection_task")]
pub fn find_pockets(records: &[ExposureRecord], config: &PocketConfig) -> Vec<Pocket> {
    let points: Vec<SurfacePoint> = records
        .iter()
        .filter(|r| r.category.is_surface())
        .map(|record| SurfacePoint {
            record,
            position: to_array(&record.position),
        })
        .collect();

    info!(
        surface_residues = points.len(),
        radius = config.radius,
        "Searching for binding pockets."
    );

    if points.len() < config.min_residues {
        return Vec::new();
    }

    let positions: Vec<[f64; 3]> = points.iter().map(|p| p.position).collect();
    let tree: KdTree<f64, 3> = (&positions).into();

    #[cfg(not(feature = "parallel"))]
    let iterator = 0..points.len();

    #[cfg(feature = "parallel")]
    let iterator = (0..points.len()).into_par_iter();

    let mut candidates: Vec<Pocket> = iterator
        .filter_map(|i| evaluate(i, &points, &tree, config))
        .collect();

    candidates.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.center.chain_id.cmp(&b.center.chain_id))
            .then_with(|| a.center.seq_index.cmp(&b.center.seq_index))
    });
    debug!(candidates = candidates.len(), "Concave neighbourhoods found.");

    let suppress_sq = config.inner_radius * config.inner_radius;
    let mut pockets: Vec<Pocket> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let shadowed = config.suppress_overlapping
            && pockets.iter().any(|p| {
                (p.center_position - candidate.center_position).norm_squared() <= suppress_sq
            });
        if !shadowed {
            pockets.push(candidate);
        }
    }
    for (i, pocket) in pockets.iter_mut().enumerate() {
        pocket.rank = i + 1;
    }

    info!(pockets = pockets.len(), "Pocket detection complete.");
    pockets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chemistry::tables;
    use crate::core::models::residue::Residue;
    use crate::engine::tasks::surface_exposure::ExposureCategory;
    use std::f64::consts::PI;

    fn record(code: char, idx: isize, at: [f64; 3], category: ExposureCategory) -> ExposureRecord {
        ExposureRecord {
            residue: Residue::new(code, idx, 'A').to_ref(),
            position: Point3::new(at[0], at[1], at[2]),
            sasa: Some(100.0),
            relative_exposure: Some(0.6),
            category,
            chemical_class: tables::chemical_class(code),
            failure: None,
        }
    }

    fn exposed(code: char, idx: isize, at: [f64; 3]) -> ExposureRecord {
        record(code, idx, at, ExposureCategory::Exposed)
    }

    fn cross() -> Vec<ExposureRecord> {
        vec![
            exposed('L', 1, [0.0, 0.0, 0.0]),
            exposed('K', 2, [6.0, 0.0, 0.0]),
            exposed('D', 3, [-6.0, 0.0, 0.0]),
            exposed('W', 4, [0.0, 6.0, 0.0]),
            exposed('S', 5, [0.0, -6.0, 0.0]),
        ]
    }

    fn ring_with_two_centers() -> Vec<ExposureRecord> {
        let codes = ['K', 'D', 'W', 'S', 'L', 'E'];
        let mut records = vec![
            exposed('L', 1, [0.0, 0.0, 1.0]),
            exposed('F', 2, [0.0, 0.0, -1.0]),
        ];
        for i in 0..12 {
            let angle = 2.0 * PI * i as f64 / 12.0;
            records.push(exposed(
                codes[i % codes.len()],
                10 + i as isize,
                [6.5 * angle.cos(), 6.5 * angle.sin(), 0.0],
            ));
        }
        records
    }

    #[test]
    fn concave_neighbourhood_is_reported() {
        let pockets = find_pockets(&cross(), &PocketConfig::default());
        assert_eq!(pockets.len(), 1);
        let pocket = &pockets[0];
        assert_eq!(pocket.center.seq_index, 1);
        assert_eq!(pocket.size, 5);
        assert_eq!(pocket.curvature, -1.0);
        assert_eq!(pocket.diversity, 5);
        assert!((pocket.score - 7.5).abs() < 1e-12);
        assert_eq!(pocket.rank, 1);
        assert!((pocket.composition.charged - 0.4).abs() < 1e-12);
    }

    #[test]
    fn small_neighbourhoods_are_never_reported() {
        let pockets = find_pockets(&cross(), &PocketConfig::default());
        assert!(pockets.iter().all(|p| p.size >= 3));
        assert!(pockets.iter().all(|p| p.center.seq_index == 1));
    }

    #[test]
    fn dense_cluster_is_not_concave() {
        let records = vec![
            exposed('L', 1, [0.0, 0.0, 0.0]),
            exposed('K', 2, [3.0, 0.0, 0.0]),
            exposed('D', 3, [-3.0, 0.0, 0.0]),
            exposed('W', 4, [0.0, 3.0, 0.0]),
            exposed('S', 5, [0.0, -3.0, 0.0]),
        ];
        assert!(find_pockets(&records, &PocketConfig::default()).is_empty());
    }

    #[test]
    fn buried_residues_are_ignored() {
        let mut records = cross();
        for r in records.iter_mut().skip(2) {
            r.category = ExposureCategory::Buried;
        }
        assert!(find_pockets(&records, &PocketConfig::default()).is_empty());
    }

    #[test]
    fn overlapping_pockets_are_suppressed() {
        let records = ring_with_two_centers();

        let suppressed = find_pockets(&records, &PocketConfig::default());
        assert_eq!(suppressed.len(), 1);
        assert_eq!(suppressed[0].center.seq_index, 1);

        let all = find_pockets(
            &records,
            &PocketConfig {
                suppress_overlapping: false,
                ..Default::default()
            },
        );
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|p| p.curvature < 0.0 && p.curvature >= -1.0));
        assert_eq!(all[1].rank, 2);
    }
}
