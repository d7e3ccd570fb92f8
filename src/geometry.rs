/// A point in cartesian space.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The euclidean distance between two points.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Convert a polar coordinate into a cartesian one.
pub fn polar_to_cartesian(radius: f64, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    Point { x: radius * cos, y: radius * sin }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    #[rstest]
    #[case::origin(0.0, 1.3, Point::new(0.0, 0.0))]
    #[case::zero_angle(2.0, 0.0, Point::new(2.0, 0.0))]
    #[case::quarter(1.0, FRAC_PI_2, Point::new(0.0, 1.0))]
    #[case::half(3.0, PI, Point::new(-3.0, 0.0))]
    fn known_points(#[case] radius: f64, #[case] angle: f64, #[case] expected: Point) {
        let point = polar_to_cartesian(radius, angle);
        assert!(point.distance(&expected) < 1e-12, "{point:?} != {expected:?}");
    }

    proptest! {
        #[test]
        fn round_trip(radius in 0.001f64..1000.0, angle in -50.0f64..50.0) {
            let point = polar_to_cartesian(radius, angle);
            let recovered_radius = point.x.hypot(point.y);
            let recovered_angle = point.y.atan2(point.x).rem_euclid(TAU);
            let expected_angle = angle.rem_euclid(TAU);
            prop_assert!((recovered_radius - radius).abs() < 1e-9 * radius.max(1.0));
            // angles right next to 0 and TAU are the same direction
            let delta = (recovered_angle - expected_angle).abs();
            prop_assert!(delta < 1e-9 || (TAU - delta) < 1e-9, "{recovered_angle} vs {expected_angle}");
        }
    }
}
