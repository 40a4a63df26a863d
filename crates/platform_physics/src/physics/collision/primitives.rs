//! Primitive collision shapes and intersection algorithms
//!
//! Provides the axis-aligned box type and the tests the world update is
//! built from: overlap, containment, Minkowski difference, penetration and
//! a swept ray cast that reports time of impact.

use crate::foundation::math::{sign, Vec2};

/// An axis-aligned bounding box stored as center and half extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Center of the box in world space
    pub position: Vec2,
    /// Half the width and height; both components are non-negative
    pub half_size: Vec2,
}

impl Aabb {
    /// Creates a box from its center and half extents
    pub fn new(position: Vec2, half_size: Vec2) -> Self {
        debug_assert!(half_size.x >= 0.0 && half_size.y >= 0.0, "negative half size");
        Self { position, half_size }
    }

    /// Creates a box from its center and full width/height
    pub fn from_size(position: Vec2, size: Vec2) -> Self {
        Self::new(position, size * 0.5)
    }

    /// Bottom-left corner
    pub fn min(&self) -> Vec2 {
        self.position - self.half_size
    }

    /// Top-right corner
    pub fn max(&self) -> Vec2 {
        self.position + self.half_size
    }

    /// Both corners at once
    pub fn min_max(&self) -> (Vec2, Vec2) {
        (self.min(), self.max())
    }

    /// Closed-interval overlap test on both axes
    pub fn intersects(&self, other: &Aabb) -> bool {
        let distance = (self.position - other.position).abs();
        let reach = self.half_size + other.half_size;
        distance.x <= reach.x && distance.y <= reach.y
    }

    /// Whether `point` lies inside the closed box
    pub fn contains_point(&self, point: Vec2) -> bool {
        let (min, max) = self.min_max();
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// Minkowski difference `self ⊖ other`.
    ///
    /// The result contains the origin exactly when the two boxes overlap,
    /// which turns box-vs-box tests into point-vs-box tests.
    pub fn minkowski_difference(&self, other: &Aabb) -> Aabb {
        Aabb::new(
            self.position - other.position,
            self.half_size + other.half_size,
        )
    }

    /// Shortest axis-aligned vector that moves the origin onto an edge.
    ///
    /// Only meaningful when the box contains the origin. Candidates are
    /// checked min x, max x, min y, max y; an equal distance keeps the
    /// earlier candidate.
    pub fn penetration_vector(&self) -> Vec2 {
        let (min, max) = self.min_max();

        let mut best = Vec2::new(min.x, 0.0);
        let mut best_distance = min.x.abs();

        for candidate in [Vec2::new(max.x, 0.0), Vec2::new(0.0, min.y), Vec2::new(0.0, max.y)] {
            let distance = candidate.x.abs() + candidate.y.abs();
            if distance < best_distance {
                best = candidate;
                best_distance = distance;
            }
        }

        best
    }

    /// Renderer view of the box: `[center_x, center_y, half_width, half_height]`
    pub fn to_array(&self) -> [f32; 4] {
        [
            self.position.x,
            self.position.y,
            self.half_size.x,
            self.half_size.y,
        ]
    }
}

/// Result of an intersection test
///
/// When `is_hit` is false every other field is meaningless.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Index of the body or static body that was hit
    pub other_id: usize,
    /// Fraction of the frame's movement at which contact starts, in [0, 1]
    pub time: f32,
    /// World-space point of contact
    pub position: Vec2,
    /// Axis-aligned outward normal of the surface that was hit
    pub normal: Vec2,
    /// Whether anything was hit at all
    pub is_hit: bool,
}

impl Hit {
    /// A result that hit nothing
    pub fn miss() -> Self {
        Self {
            other_id: 0,
            time: 1.0,
            position: Vec2::zeros(),
            normal: Vec2::zeros(),
            is_hit: false,
        }
    }
}

impl Default for Hit {
    fn default() -> Self {
        Self::miss()
    }
}

/// Closed-interval overlap of two boxes
pub fn aabb_intersect(a: &Aabb, b: &Aabb) -> bool {
    a.intersects(b)
}

/// Whether `point` lies inside the closed box
pub fn point_in_aabb(point: Vec2, aabb: &Aabb) -> bool {
    aabb.contains_point(point)
}

/// Box centered at `a - b` with half size `a.half + b.half`
pub fn minkowski_difference(a: &Aabb, b: &Aabb) -> Aabb {
    a.minkowski_difference(b)
}

/// Minimal push that moves the origin out of `aabb`
pub fn penetration_vector(aabb: &Aabb) -> Vec2 {
    aabb.penetration_vector()
}

/// Casts the segment `origin -> origin + displacement` against `aabb`.
///
/// Slab method. An axis with zero displacement does not constrain the entry
/// time as long as the origin lies strictly between the slab's faces;
/// otherwise the segment can never enter and nothing is hit. Segments that
/// start inside the box report no hit, since entry would lie before t = 0.
pub fn ray_intersect_aabb(origin: Vec2, displacement: Vec2, aabb: &Aabb) -> Hit {
    let (min, max) = aabb.min_max();

    let mut entry = f32::NEG_INFINITY;
    let mut exit = f32::INFINITY;
    let mut entry_axis = None;

    for axis in 0..2 {
        if displacement[axis] == 0.0 {
            if origin[axis] <= min[axis] || origin[axis] >= max[axis] {
                return Hit::miss();
            }
            continue;
        }

        let t1 = (min[axis] - origin[axis]) / displacement[axis];
        let t2 = (max[axis] - origin[axis]) / displacement[axis];
        let near = t1.min(t2);
        let far = t1.max(t2);

        if near > entry {
            entry = near;
            entry_axis = Some(axis);
        }
        exit = exit.min(far);
    }

    let Some(axis) = entry_axis else {
        return Hit::miss();
    };

    if entry >= exit || !(0.0..=1.0).contains(&entry) {
        return Hit::miss();
    }

    let mut normal = Vec2::zeros();
    normal[axis] = -sign(displacement[axis]);

    Hit {
        other_id: 0,
        time: entry,
        position: origin + displacement * entry,
        normal,
        is_hit: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box(x: f32, y: f32) -> Aabb {
        Aabb::new(Vec2::new(x, y), Vec2::new(1.0, 1.0))
    }

    #[test]
    fn test_from_size_halves_extents() {
        let aabb = Aabb::from_size(Vec2::new(3.0, 4.0), Vec2::new(24.0, 10.0));
        assert_eq!(aabb.half_size, Vec2::new(12.0, 5.0));
        assert_eq!(aabb.min_max(), (Vec2::new(-9.0, -1.0), Vec2::new(15.0, 9.0)));
    }

    #[test]
    fn test_intersects_is_closed() {
        let a = unit_box(0.0, 0.0);

        assert!(aabb_intersect(&a, &unit_box(1.5, 1.5)));
        // Touching faces count
        assert!(aabb_intersect(&a, &unit_box(2.0, 0.0)));
        assert!(!aabb_intersect(&a, &unit_box(2.01, 0.0)));
        // Overlap on one axis only
        assert!(!aabb_intersect(&a, &unit_box(0.0, 3.0)));
    }

    #[test]
    fn test_point_in_aabb() {
        let aabb = unit_box(5.0, 5.0);

        assert!(point_in_aabb(Vec2::new(5.0, 5.0), &aabb));
        assert!(point_in_aabb(Vec2::new(6.0, 4.0), &aabb));
        assert!(!point_in_aabb(Vec2::new(6.1, 5.0), &aabb));
    }

    #[test]
    fn test_minkowski_difference_contains_origin_iff_overlap() {
        let a = unit_box(0.0, 0.0);
        let overlapping = unit_box(1.0, -0.5);
        let apart = unit_box(4.0, 0.0);

        let diff = minkowski_difference(&overlapping, &a);
        assert_eq!(diff.position, Vec2::new(1.0, -0.5));
        assert_eq!(diff.half_size, Vec2::new(2.0, 2.0));
        assert!(diff.contains_point(Vec2::zeros()));

        assert!(!minkowski_difference(&apart, &a).contains_point(Vec2::zeros()));
    }

    #[test]
    fn test_penetration_vector_picks_shallowest_axis() {
        // Static at x = 1.5 overlapping a body at the origin by 0.5 on x
        let diff = minkowski_difference(&unit_box(1.5, 0.0), &unit_box(0.0, 0.0));
        assert_eq!(penetration_vector(&diff), Vec2::new(-0.5, 0.0));

        // Body sunk 0.25 into a floor below it
        let floor = Aabb::new(Vec2::new(0.0, -1.75), Vec2::new(10.0, 1.0));
        let diff = minkowski_difference(&floor, &unit_box(0.0, 0.0));
        let push = penetration_vector(&diff);
        assert_relative_eq!(push.x, 0.0);
        assert_relative_eq!(push.y, 0.25);
    }

    #[test]
    fn test_penetration_vector_tie_prefers_x() {
        let diff = Aabb::new(Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0));
        // |min.x| == |min.y| == 1
        assert_eq!(penetration_vector(&diff), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_ray_hits_face_with_time_and_normal() {
        let target = Aabb::new(Vec2::new(5.0, 0.0), Vec2::new(2.0, 2.0));
        let hit = ray_intersect_aabb(Vec2::zeros(), Vec2::new(100.0, 0.0), &target);

        assert!(hit.is_hit);
        assert_relative_eq!(hit.time, 0.03);
        assert_relative_eq!(hit.position.x, 3.0);
        assert_relative_eq!(hit.position.y, 0.0);
        assert_eq!(hit.normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_ray_normal_follows_entry_axis() {
        // Falling diagonally onto a wide floor: enters through the top face
        let floor = Aabb::new(Vec2::new(0.0, -5.0), Vec2::new(20.0, 1.0));
        let hit = ray_intersect_aabb(Vec2::zeros(), Vec2::new(3.0, -8.0), &floor);

        assert!(hit.is_hit);
        assert_relative_eq!(hit.time, 0.5);
        assert_eq!(hit.normal, Vec2::new(0.0, 1.0));
        assert_relative_eq!(hit.position.x, 1.5);
        assert_relative_eq!(hit.position.y, -4.0);
    }

    #[test]
    fn test_ray_too_short_misses() {
        let target = Aabb::new(Vec2::new(5.0, 0.0), Vec2::new(1.0, 1.0));
        assert!(!ray_intersect_aabb(Vec2::zeros(), Vec2::new(3.9, 0.0), &target).is_hit);
    }

    #[test]
    fn test_ray_moving_away_misses() {
        let target = Aabb::new(Vec2::new(5.0, 0.0), Vec2::new(1.0, 1.0));
        assert!(!ray_intersect_aabb(Vec2::zeros(), Vec2::new(-50.0, 0.0), &target).is_hit);
    }

    #[test]
    fn test_ray_parallel_outside_slab_misses() {
        let target = Aabb::new(Vec2::new(5.0, 0.0), Vec2::new(1.0, 1.0));
        // y never changes and starts outside the y slab
        assert!(!ray_intersect_aabb(Vec2::new(0.0, 3.0), Vec2::new(10.0, 0.0), &target).is_hit);
        // Sliding exactly along the top face is not a hit
        assert!(!ray_intersect_aabb(Vec2::new(0.0, 1.0), Vec2::new(10.0, 0.0), &target).is_hit);
    }

    #[test]
    fn test_ray_starting_inside_misses() {
        let target = unit_box(0.0, 0.0);
        assert!(!ray_intersect_aabb(Vec2::new(0.5, 0.0), Vec2::new(5.0, 0.0), &target).is_hit);
    }

    #[test]
    fn test_ray_zero_displacement_misses() {
        let target = unit_box(0.0, 0.0);
        assert!(!ray_intersect_aabb(Vec2::new(3.0, 0.0), Vec2::zeros(), &target).is_hit);
    }

    #[test]
    fn test_ray_passing_beside_box_misses() {
        let target = unit_box(5.0, 0.0);
        // Crosses the x slab while already past the y slab
        assert!(!ray_intersect_aabb(Vec2::new(0.0, 3.0), Vec2::new(10.0, 4.0), &target).is_hit);
    }

    #[test]
    fn test_to_array_layout() {
        let aabb = Aabb::new(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0));
        assert_eq!(aabb.to_array(), [1.0, 2.0, 3.0, 4.0]);
    }
}
