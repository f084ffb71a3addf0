//! Point math and hit-radius tests.

use kurbo::{Point, Rect, Vec2};

/// Straight-line distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (b - a).hypot()
}

/// Check if `point` lies within `radius` of `center` (inclusive).
pub fn within_radius(point: Point, center: Point, radius: f64) -> bool {
    (point - center).hypot2() <= radius * radius
}

/// Find the last position in `positions` within `radius` of `point`.
///
/// Iterates back to front so the most recently created marker wins
/// when several overlap.
pub fn hit_test_last<I>(positions: I, point: Point, radius: f64) -> Option<usize>
where
    I: IntoIterator<Item = Point>,
    I::IntoIter: DoubleEndedIterator + ExactSizeIterator,
{
    positions
        .into_iter()
        .enumerate()
        .rev()
        .find(|&(_, center)| within_radius(point, center, radius))
        .map(|(i, _)| i)
}

/// Cumulative displacement between the gesture origin and the current point.
pub fn displacement(origin: Point, current: Point) -> f64 {
    distance(origin, current)
}

/// Arrow head triangle for a segment ending at `end`: tip, left barb, right barb.
pub fn arrow_head(start: Point, end: Point, length: f64) -> [Point; 3] {
    let angle = (end.y - start.y).atan2(end.x - start.x);
    let spread = std::f64::consts::PI / 6.0;
    let barb = |a: f64| end - Vec2::new(length * a.cos(), length * a.sin());
    [end, barb(angle - spread), barb(angle + spread)]
}

/// Axis-aligned box of the given size centered on `center`.
pub fn rect_around(center: Point, half_width: f64, half_height: f64) -> Rect {
    Rect::new(
        center.x - half_width,
        center.y - half_height,
        center.x + half_width,
        center.y + half_height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        assert!((distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_within_radius_is_inclusive() {
        let c = Point::new(10.0, 10.0);
        assert!(within_radius(Point::new(30.0, 10.0), c, 20.0));
        assert!(!within_radius(Point::new(30.1, 10.0), c, 20.0));
    }

    #[test]
    fn test_hit_test_single() {
        let pins = [Point::new(0.0, 0.0), Point::new(100.0, 100.0)];
        assert_eq!(hit_test_last(pins, Point::new(95.0, 105.0), 20.0), Some(1));
        assert_eq!(hit_test_last(pins, Point::new(50.0, 50.0), 20.0), None);
    }

    #[test]
    fn test_hit_test_overlap_prefers_latest() {
        let pins = [Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(200.0, 0.0)];
        assert_eq!(hit_test_last(pins, Point::new(2.0, 0.0), 20.0), Some(1));
    }

    #[test]
    fn test_hit_test_empty() {
        let pins: [Point; 0] = [];
        assert_eq!(hit_test_last(pins, Point::ZERO, 20.0), None);
    }

    #[test]
    fn test_arrow_head_points_back_along_segment() {
        let [tip, left, right] = arrow_head(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 15.0);
        assert_eq!(tip, Point::new(100.0, 0.0));
        assert!(left.x < 100.0 && right.x < 100.0);
        assert!((left.y + right.y).abs() < 1e-9);
    }
}
