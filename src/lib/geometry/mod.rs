use nalgebra::Vector2;

/// Planar displacement from the cylinder axis for a point `radius` out at `angle` degrees.
/// Zero degrees points along +Y, and angles increase towards +X.
pub fn polar(angle: f64, radius: f64) -> Vector2<f64> {
    let a = angle.to_radians();
    Vector2::new(a.sin() * radius, a.cos() * radius)
}

/// Radial depth for a pixel. White (255) gives no depth and so the thinnest wall,
/// black (0) gives the full `amplitude`.
pub fn depth(intensity: u8, amplitude: f64) -> f64 {
    amplitude - (f64::from(intensity) / 255.0) * amplitude
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-10;

    #[test]
    fn test_polar_keeps_radius() {
        for i in 0..720 {
            let angle = i as f64 * 0.5;
            for &r in &[0.0, 1.0, 10.0, 76.0, 83.5] {
                let v = polar(angle, r);
                assert!((v.norm() - r).abs() < EPSILON, "angle {angle} radius {r}");
            }
        }
    }

    #[test]
    fn test_polar_axes() {
        let v = polar(0.0, 2.0);
        assert!(v.x.abs() < EPSILON);
        assert!((v.y - 2.0).abs() < EPSILON);

        let v = polar(90.0, 2.0);
        assert!((v.x - 2.0).abs() < EPSILON);
        assert!(v.y.abs() < EPSILON);

        let v = polar(180.0, 2.0);
        assert!(v.x.abs() < EPSILON);
        assert!((v.y + 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_depth_endpoints() {
        assert!((depth(0, 1.5) - 1.5).abs() < EPSILON);
        assert!(depth(255, 1.5).abs() < EPSILON);
        assert!((depth(0, 7.0) - 7.0).abs() < EPSILON);
    }

    #[test]
    fn test_depth_non_increasing() {
        let mut last = depth(0, 3.0);
        for i in 1..=255u8 {
            let d = depth(i, 3.0);
            assert!(d <= last, "depth rose at intensity {i}");
            assert!(d >= 0.0);
            last = d;
        }
    }
}
