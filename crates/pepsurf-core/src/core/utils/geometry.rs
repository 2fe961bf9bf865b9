use nalgebra::{Point3, Vector3};
use std::f64::consts::PI;

/// Evenly distributed unit vectors on a sphere (golden-angle spiral).
pub fn fibonacci_sphere(num_points: usize) -> Vec<Vector3<f64>> {
    match num_points {
        0 => Vec::new(),
        1 => vec![Vector3::y()],
        n => {
            let golden_angle = PI * (3.0 - 5.0f64.sqrt());
            (0..n)
                .map(|i| {
                    let y = 1.0 - (i as f64 / (n - 1) as f64) * 2.0;
                    let radius_at_y = (1.0 - y * y).max(0.0).sqrt();
                    let theta = golden_angle * i as f64;
                    Vector3::new(theta.cos() * radius_at_y, y, theta.sin() * radius_at_y)
                })
                .collect()
        }
    }
}

#[inline]
pub fn sphere_volume(radius: f64) -> f64 {
    4.0 / 3.0 * PI * radius.powi(3)
}

/// Volume between two concentric spheres.
#[inline]
pub fn shell_volume(inner_radius: f64, outer_radius: f64) -> f64 {
    sphere_volume(outer_radius) - sphere_volume(inner_radius)
}

/// Radius of a sphere with the given volume.
#[inline]
pub fn equivalent_radius(volume: f64) -> f64 {
    (3.0 * volume / (4.0 * PI)).cbrt()
}

pub fn to_array(point: &Point3<f64>) -> [f64; 3] {
    [point.x, point.y, point.z]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn fibonacci_sphere_returns_unit_vectors() {
        let points = fibonacci_sphere(100);
        assert_eq!(points.len(), 100);
        for p in &points {
            assert!((p.norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn fibonacci_sphere_is_roughly_balanced() {
        let points = fibonacci_sphere(200);
        let mean: Vector3<f64> = points.iter().sum::<Vector3<f64>>() / points.len() as f64;
        assert!(mean.norm() < 0.05);
    }

    #[test]
    fn fibonacci_sphere_handles_degenerate_counts() {
        assert!(fibonacci_sphere(0).is_empty());
        assert_eq!(fibonacci_sphere(1).len(), 1);
    }

    #[test]
    fn shell_volume_is_difference_of_spheres() {
        let shell = shell_volume(4.0, 8.0);
        assert!((shell - (sphere_volume(8.0) - sphere_volume(4.0))).abs() < EPS);
        assert!(shell > 0.0);
    }

    #[test]
    fn equivalent_radius_inverts_sphere_volume() {
        let r = 2.5;
        assert!((equivalent_radius(sphere_volume(r)) - r).abs() < EPS);
    }
}
