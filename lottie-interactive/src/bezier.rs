//! Cubic Bezier evaluation for transition easing.

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CubicBezier {
    pub start: Point,
    pub control_point1: Point,
    pub control_point2: Point,
    pub end: Point,
}

/// Lottie-style easing: the curve runs from (0,0) to (1,1) with `o` as the first control point
/// and `i` as the second.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BezierEasing {
    pub o: Point,
    pub i: Point,
}

impl BezierEasing {
    pub const fn new(o: Point, i: Point) -> Self {
        Self { o, i }
    }

    pub fn to_curve(&self) -> CubicBezier {
        CubicBezier {
            start: Point::new(0.0, 0.0),
            control_point1: self.o,
            control_point2: self.i,
            end: Point::new(1.0, 1.0),
        }
    }
}

/// Evaluates `B(t) = (1-t)^3 P0 + 3(1-t)^2 t P1 + 3(1-t) t^2 P2 + t^3 P3` on both axes.
///
/// `t` is not clamped.
pub fn evaluate(curve: &CubicBezier, t: f64) -> Point {
    let mt = 1.0 - t;
    let coeffs = [mt * mt * mt, 3.0 * mt * mt * t, 3.0 * mt * t * t, t * t * t];
    let points = [
        curve.start,
        curve.control_point1,
        curve.control_point2,
        curve.end,
    ];

    points
        .iter()
        .zip(coeffs)
        .fold(Point::default(), |acc, (p, c)| {
            Point::new(acc.x + c * p.x, acc.y + c * p.y)
        })
}

/// Eased progress for a transition: the `y` of the easing curve at parameter `t`.
pub fn ease(easing: &BezierEasing, t: f64) -> f64 {
    evaluate(&easing.to_curve(), t).y
}

/// Easing presets for state transitions.
pub mod presets {
    use super::{BezierEasing, Point};

    pub const LINEAR: BezierEasing =
        BezierEasing::new(Point::new(0.25, 0.25), Point::new(0.75, 0.75));
    pub const NATURAL: BezierEasing =
        BezierEasing::new(Point::new(0.4, 0.0), Point::new(0.8, 1.0));
    pub const BOUNCE_IN: BezierEasing =
        BezierEasing::new(Point::new(0.8, 0.0), Point::new(0.5, 1.5));
    pub const BOUNCE_OUT: BezierEasing =
        BezierEasing::new(Point::new(0.5, -0.5), Point::new(0.2, 1.0));
    pub const ACCELERATE: BezierEasing =
        BezierEasing::new(Point::new(0.42, 0.0), Point::new(1.0, 1.0));
    pub const SLOW_DOWN: BezierEasing =
        BezierEasing::new(Point::new(0.0, 0.0), Point::new(0.58, 1.0));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= 1.0e-9,
            "expected {expected}, got {actual} (diff {diff})"
        );
    }

    #[test]
    fn endpoints_are_fixed() {
        let easing = presets::NATURAL;
        assert_approx(ease(&easing, 0.0), 0.0);
        assert_approx(ease(&easing, 1.0), 1.0);
    }

    #[test]
    fn linear_preset_is_symmetric() {
        assert_approx(ease(&presets::LINEAR, 0.5), 0.5);
        for t in [0.1, 0.25, 0.4] {
            assert_approx(ease(&presets::LINEAR, t) + ease(&presets::LINEAR, 1.0 - t), 1.0);
        }
    }

    #[test]
    fn evaluates_bernstein_blend_on_both_axes() {
        let curve = BezierEasing::new(Point::new(0.0, 1.0), Point::new(1.0, 0.0)).to_curve();
        let p = evaluate(&curve, 0.5);
        // 3/8 * P1 + 3/8 * P2 + 1/8 * P3
        assert_approx(p.x, 0.375 * 0.0 + 0.375 * 1.0 + 0.125);
        assert_approx(p.y, 0.375 * 1.0 + 0.375 * 0.0 + 0.125);
    }

    #[test]
    fn out_of_range_parameter_is_not_rejected() {
        let y = ease(&presets::BOUNCE_IN, 1.5);
        assert!(y.is_finite());
    }
}
