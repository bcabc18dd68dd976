//! Height-based point colors.

use crate::boundary::BoundingBox;
use crate::geometry::Point;

/// Color used when color assignment is disabled.
pub const UNIFORM_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// Per-channel multipliers. Blue-shifted on purpose.
pub const CHANNEL_WEIGHTS: [f32; 3] = [0.9, 1.0, 1.2];

pub const MIN_INTENSITY: f64 = 0.3;
pub const MAX_INTENSITY: f64 = 1.0;

/// Brightness at `position`: base `0.6 + 0.4 h` from normalized height plus a
/// positional ripple, clamped to `[0.3, 1.0]`.
pub fn intensity(position: &Point, bounds: &BoundingBox) -> f64 {
    let height = bounds.size().y;
    let h = if height > 0.0 && height.is_finite() {
        (position.y - bounds.min.y) / height
    } else {
        0.0
    };

    let base = 0.6 + 0.4 * h;
    let ripple = 0.1 * ((10.0 * position.x).sin() + (10.0 * position.z).cos());
    (base + ripple).clamp(MIN_INTENSITY, MAX_INTENSITY)
}

/// RGB color for a point on a mesh with the given bounds.
pub fn height_color(position: &Point, bounds: &BoundingBox) -> [f32; 3] {
    let i = intensity(position, bounds) as f32;
    CHANNEL_WEIGHTS.map(|w| i * w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> BoundingBox {
        BoundingBox {
            min: Point::new(0.0, 0.0, 0.0),
            max: Point::new(1.0, 1.0, 1.0),
        }
    }

    #[test]
    fn test_base_intensity_follows_height() {
        // sin(0) + cos(10 * pi / 20) = 0 at x = 0, z = pi / 20
        let z = std::f64::consts::PI / 20.0;
        let bounds = unit_box();
        assert_relative_eq!(
            intensity(&Point::new(0.0, 0.0, z), &bounds),
            0.6,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            intensity(&Point::new(0.0, 0.5, z), &bounds),
            0.8,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_intensity_is_clamped() {
        let bounds = unit_box();
        // Top of the box with a positive ripple
        assert_eq!(intensity(&Point::new(0.157, 1.0, 0.0), &bounds), 1.0);

        let tall = BoundingBox {
            min: Point::new(0.0, 0.0, 0.0),
            max: Point::new(1.0, 100.0, 1.0),
        };
        // Bottom with the most negative ripple: 0.6 - 0.2 = 0.4, inside range
        let i = intensity(&Point::new(-0.157, 0.0, 0.314), &tall);
        assert!(i >= MIN_INTENSITY && i <= MAX_INTENSITY);
    }

    #[test]
    fn test_flat_box_uses_zero_height() {
        let flat = BoundingBox {
            min: Point::new(0.0, 2.0, 0.0),
            max: Point::new(1.0, 2.0, 1.0),
        };
        let i = intensity(&Point::new(0.3, 2.0, 0.7), &flat);
        assert!(i.is_finite());
        let expected = 0.6 + 0.1 * ((3.0_f64).sin() + (7.0_f64).cos());
        assert_relative_eq!(i, expected.clamp(0.3, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_channels_are_scaled_intensity() {
        let bounds = unit_box();
        for k in 0..50 {
            let t = f64::from(k) / 49.0;
            let p = Point::new(t * 3.0, t, 1.0 - t);
            let [r, g, b] = height_color(&p, &bounds);
            assert!((0.3..=1.0).contains(&g));
            assert_relative_eq!(r, g * 0.9, epsilon = 1e-6);
            assert_relative_eq!(b, g * 1.2, epsilon = 1e-6);
        }
    }
}
