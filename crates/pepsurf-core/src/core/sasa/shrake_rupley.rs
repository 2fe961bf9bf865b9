use super::{OracleError, SasaOracle, SasaResult};
use crate::core::chemistry::tables;
use crate::core::models::residue::Residue;
use crate::core::utils::geometry::{equivalent_radius, fibonacci_sphere};
use nalgebra::{Point3, Vector3};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub const DEFAULT_PROBE_RADIUS: f64 = 1.4;
pub const DEFAULT_TEST_POINTS: usize = 96;

/// Coarse-grained Shrake-Rupley SASA.
///
/// Each residue is a single sphere at its [`Residue::position`] whose volume
/// matches the residue's tabulated volume, inflated by the probe radius. The
/// accessible fraction of its test points is scaled by the residue's maximum
/// reference area, so the result is directly comparable to the exposure cutoffs.
#[derive(Debug, Clone)]
pub struct ShrakeRupleyOracle {
    probe_radius: f64,
    test_points: Vec<Vector3<f64>>,
}

struct Sphere {
    center: Point3<f64>,
    radius: f64,
}

impl ShrakeRupleyOracle {
    pub fn new(probe_radius: f64, num_test_points: usize) -> Self {
        Self {
            probe_radius,
            test_points: fibonacci_sphere(num_test_points.max(1)),
        }
    }

    fn sphere_for(&self, residue: &Residue) -> Option<Sphere> {
        let center = residue.position()?;
        let volume = tables::residue_volume(residue.code())?;
        Some(Sphere {
            center,
            radius: equivalent_radius(volume) + self.probe_radius,
        })
    }

    fn accessible_fraction(&self, index: usize, spheres: &[Option<Sphere>]) -> Option<f64> {
        let sphere = spheres[index].as_ref()?;

        let neighbors: Vec<&Sphere> = spheres
            .iter()
            .enumerate()
            .filter(|&(other, _)| other != index)
            .filter_map(|(_, s)| s.as_ref())
            .filter(|other| {
                let reach = sphere.radius + other.radius;
                (other.center - sphere.center).norm_squared() < reach * reach
            })
            .collect();

        let accessible = self
            .test_points
            .iter()
            .filter(|direction| {
                let point = sphere.center + *direction * sphere.radius;
                neighbors
                    .iter()
                    .all(|n| (point - n.center).norm_squared() >= n.radius * n.radius)
            })
            .count();

        Some(accessible as f64 / self.test_points.len() as f64)
    }
}

impl Default for ShrakeRupleyOracle {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_RADIUS, DEFAULT_TEST_POINTS)
    }
}

impl SasaOracle for ShrakeRupleyOracle {
    fn name(&self) -> &str {
        "shrake-rupley"
    }

    fn sasa(&self, residues: &[Residue]) -> Vec<SasaResult> {
        let spheres: Vec<Option<Sphere>> = residues.iter().map(|r| self.sphere_for(r)).collect();

        let compute = |(index, residue): (usize, &Residue)| -> SasaResult {
            let code = residue.code();
            let max_area =
                tables::max_asa(code).ok_or(OracleError::UnsupportedResidue { code })?;
            let fraction = self
                .accessible_fraction(index, &spheres)
                .ok_or(OracleError::UnsupportedResidue { code })?;
            Ok(fraction * max_area)
        };

        #[cfg(not(feature = "parallel"))]
        let areas = residues.iter().enumerate().map(compute).collect();

        #[cfg(feature = "parallel")]
        let areas = residues.par_iter().enumerate().map(compute).collect();

        areas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn residue(code: char, idx: isize, x: f64, y: f64, z: f64) -> Residue {
        Residue::new(code, idx, 'A').with_centroid(Point3::new(x, y, z))
    }

    #[test]
    fn isolated_residue_is_fully_exposed() {
        let oracle = ShrakeRupleyOracle::default();
        let areas = oracle.sasa(&[residue('A', 1, 0.0, 0.0, 0.0)]);
        let area = areas[0].clone().unwrap();
        assert!((area - 129.0).abs() < 1e-9);
    }

    #[test]
    fn surrounded_residue_is_buried() {
        let oracle = ShrakeRupleyOracle::default();
        let d = 4.0;
        let residues = vec![
            residue('L', 1, 0.0, 0.0, 0.0),
            residue('L', 2, d, 0.0, 0.0),
            residue('L', 3, -d, 0.0, 0.0),
            residue('L', 4, 0.0, d, 0.0),
            residue('L', 5, 0.0, -d, 0.0),
            residue('L', 6, 0.0, 0.0, d),
            residue('L', 7, 0.0, 0.0, -d),
        ];
        let areas = oracle.sasa(&residues);
        let center = areas[0].clone().unwrap();
        let outer = areas[1].clone().unwrap();
        assert!(center < 0.2 * 201.0, "center area {center}");
        assert!(outer > center);
    }

    #[test]
    fn areas_are_never_negative() {
        let oracle = ShrakeRupleyOracle::default();
        let residues: Vec<_> = (0..10)
            .map(|i| residue('K', i, i as f64 * 3.0, 0.0, 0.0))
            .collect();
        for area in oracle.sasa(&residues) {
            assert!(area.unwrap() >= 0.0);
        }
    }

    #[test]
    fn unsupported_code_fails_only_that_residue() {
        let oracle = ShrakeRupleyOracle::default();
        let areas = oracle.sasa(&[residue('X', 1, 0.0, 0.0, 0.0), residue('G', 2, 20.0, 0.0, 0.0)]);
        assert_eq!(areas[0], Err(OracleError::UnsupportedResidue { code: 'X' }));
        assert!(areas[1].is_ok());
    }
}
