//! Circle-overlap collision tests
//!
//! Every entity in the arena is a circle, so one pure predicate covers all
//! pair interactions: projectile-vs-enemy, enemy-vs-player, item-vs-player.

use glam::Vec2;

/// True iff the two circles overlap (center distance < radius sum)
#[inline]
pub fn circles_overlap(pos_a: Vec2, radius_a: f32, pos_b: Vec2, radius_b: f32) -> bool {
    pos_a.distance_squared(pos_b) < (radius_a + radius_b) * (radius_a + radius_b)
}

/// Overlap test with a slack subtracted from the combined radii.
///
/// Enemy-vs-player contact forgives a few pixels of visual overlap before
/// damage lands; a positive `tolerance` shrinks the effective hit circle.
#[inline]
pub fn circles_overlap_with_tolerance(
    pos_a: Vec2,
    radius_a: f32,
    pos_b: Vec2,
    radius_b: f32,
    tolerance: f32,
) -> bool {
    let reach = (radius_a + radius_b - tolerance).max(0.0);
    pos_a.distance_squared(pos_b) < reach * reach
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_at_same_point() {
        let p = Vec2::new(450.0, 300.0);
        assert!(circles_overlap(p, 14.0, p, 12.0));
    }

    #[test]
    fn test_overlap_boundary_is_exclusive() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        // Touching exactly (4 + 6 == 10) does not count as overlap
        assert!(!circles_overlap(a, 4.0, b, 6.0));
        assert!(circles_overlap(a, 4.0, b, 6.01));
    }

    #[test]
    fn test_miss_at_distance() {
        assert!(!circles_overlap(
            Vec2::new(0.0, 0.0),
            8.0,
            Vec2::new(100.0, 100.0),
            8.0
        ));
    }

    #[test]
    fn test_tolerance_shrinks_hit_circle() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(22.0, 0.0);
        // Radii 14 + 12 = 26 would overlap at distance 22...
        assert!(circles_overlap(a, 14.0, b, 12.0));
        // ...but a 6 px tolerance pushes the effective reach to 20
        assert!(!circles_overlap_with_tolerance(a, 14.0, b, 12.0, 6.0));
    }

    #[test]
    fn test_tolerance_never_negative_reach() {
        let p = Vec2::new(5.0, 5.0);
        // Tolerance larger than both radii clamps to zero reach
        assert!(!circles_overlap_with_tolerance(p, 1.0, p, 1.0, 50.0));
    }
}
