/// Ray with a precomputed slab test against bounding boxes.
///
/// The reciprocal of the direction and its per-axis sign are computed once
/// at construction, so each box test is branch-free with respect to the
/// direction. Zero direction components produce signed infinities, which the
/// IEEE comparisons below handle without special cases.

use glam::Vec3;
use super::bounding_box::BoundingBox;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    inv_direction: Vec3,
    /// 1 where the reciprocal is negative (selects max as the entry plane)
    sign: [usize; 3],
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        let inv_direction = Vec3::ONE / direction;
        let sign = [
            (inv_direction.x < 0.0) as usize,
            (inv_direction.y < 0.0) as usize,
            (inv_direction.z < 0.0) as usize,
        ];
        Self { origin, direction, inv_direction, sign }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn inv_direction(&self) -> Vec3 {
        self.inv_direction
    }

    /// Point at parametric distance `t`
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Slab test.
    ///
    /// Returns the parametric distance to the nearest boundary crossing, or
    /// `None` on a miss. A box lying entirely behind the origin is a miss;
    /// an origin inside the box reports distance 0.
    pub fn intersect(&self, bbox: &BoundingBox) -> Option<f32> {
        let bounds = [bbox.min, bbox.max];

        let mut t_min = (bounds[self.sign[0]].x - self.origin.x) * self.inv_direction.x;
        let mut t_max = (bounds[1 - self.sign[0]].x - self.origin.x) * self.inv_direction.x;

        let ty_min = (bounds[self.sign[1]].y - self.origin.y) * self.inv_direction.y;
        let ty_max = (bounds[1 - self.sign[1]].y - self.origin.y) * self.inv_direction.y;
        if t_min > ty_max || ty_min > t_max {
            return None;
        }
        if ty_min > t_min {
            t_min = ty_min;
        }
        if ty_max < t_max {
            t_max = ty_max;
        }

        let tz_min = (bounds[self.sign[2]].z - self.origin.z) * self.inv_direction.z;
        let tz_max = (bounds[1 - self.sign[2]].z - self.origin.z) * self.inv_direction.z;
        if t_min > tz_max || tz_min > t_max {
            return None;
        }
        if tz_min > t_min {
            t_min = tz_min;
        }
        if tz_max < t_max {
            t_max = tz_max;
        }

        if t_max < 0.0 {
            return None;
        }
        let distance = t_min.max(0.0);
        distance.is_finite().then_some(distance)
    }

    /// True if the ray hits the box
    pub fn hits(&self, bbox: &BoundingBox) -> bool {
        self.intersect(bbox).is_some()
    }
}

#[cfg(test)]
#[path = "ray_tests.rs"]
mod tests;
