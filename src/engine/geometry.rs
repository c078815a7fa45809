//! Planar joint geometry
//!
//! Angle at a joint via the dot product of the two adjacent segments,
//! plus the derived measures the form checks need: lean of a segment
//! from vertical and segment length for body-scale tolerances.

use nalgebra::Point2;

/// Angle in degrees at vertex `b`, formed by the rays `b→a` and `b→c`.
///
/// Uses cos(θ) = (v1 · v2) / (|v1| × |v2|), so the result is
/// direction-independent and normalized to [0, 180]:
/// - 180° = the three points are collinear (joint fully extended)
/// - 90°  = the segments are perpendicular (joint bent square)
pub fn angle_at(a: Point2<f32>, b: Point2<f32>, c: Point2<f32>) -> f32 {
    let v1 = a - b;
    let v2 = c - b;

    let mag1 = v1.norm();
    let mag2 = v2.norm();

    // Degenerate segment: coincident keypoints carry no angle information
    if mag1 < 1e-4 || mag2 < 1e-4 {
        return 180.0;
    }

    let cos_angle = (v1.dot(&v2) / (mag1 * mag2)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

/// Deviation in degrees of the segment `bottom→top` from the upward
/// vertical, in [0, 180]. Image coordinates have y increasing downward,
/// so "up" is negative y. 0° = perfectly upright.
pub fn lean_from_vertical(top: Point2<f32>, bottom: Point2<f32>) -> f32 {
    // A reference point straight above `bottom` turns the lean into a
    // plain joint angle at `bottom`.
    let overhead = Point2::new(bottom.x, bottom.y - 100.0);
    angle_at(top, bottom, overhead)
}

/// Straight-line distance between two keypoints, used as the body-scale
/// reference for pixel-space tolerances.
pub fn span(a: Point2<f32>, b: Point2<f32>) -> f32 {
    (a - b).norm()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f32, y: f32) -> Point2<f32> {
        Point2::new(x, y)
    }

    #[test]
    fn straight_joint_is_180() {
        let angle = angle_at(pt(0.0, 0.0), pt(0.5, 0.0), pt(1.0, 0.0));
        assert!((angle - 180.0).abs() < 1.0);
    }

    #[test]
    fn square_bend_is_90() {
        let angle = angle_at(pt(0.0, 0.0), pt(0.5, 0.0), pt(0.5, 0.5));
        assert!((angle - 90.0).abs() < 1.0);
    }

    #[test]
    fn folded_joint_is_near_zero() {
        let angle = angle_at(pt(1.0, 0.0), pt(0.0, 0.0), pt(1.0, 0.01));
        assert!(angle < 2.0);
    }

    #[test]
    fn degenerate_segment_reads_straight() {
        let angle = angle_at(pt(0.5, 0.5), pt(0.5, 0.5), pt(1.0, 1.0));
        assert!((angle - 180.0).abs() < 0.01);
    }

    #[test]
    fn upright_segment_has_zero_lean() {
        // Shoulder directly above hip (y grows downward)
        let lean = lean_from_vertical(pt(100.0, 50.0), pt(100.0, 250.0));
        assert!(lean < 0.5);
    }

    #[test]
    fn horizontal_segment_leans_90() {
        let lean = lean_from_vertical(pt(300.0, 250.0), pt(100.0, 250.0));
        assert!((lean - 90.0).abs() < 0.5);
    }

    #[test]
    fn span_is_euclidean() {
        assert!((span(pt(0.0, 0.0), pt(3.0, 4.0)) - 5.0).abs() < 1e-5);
    }
}
