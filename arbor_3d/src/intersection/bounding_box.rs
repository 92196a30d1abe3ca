/// Axis-aligned bounding box.
///
/// Six scalars (min/max per axis). The all-zero box is the "unset" sentinel,
/// which is also the `Default` value. Any other point box is a real extent.

use glam::{Vec3, Mat4};

// ===== BOUNDING BOX =====

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl BoundingBox {
    /// The unset sentinel (all zeros)
    pub const UNSET: BoundingBox = BoundingBox { min: Vec3::ZERO, max: Vec3::ZERO };

    /// Build a box from two opposite corners given in any order
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self { min: a.min(b), max: a.max(b) }
    }

    /// Build a box from six scalars (first corner, then opposite corner)
    pub fn from_values(x0: f32, y0: f32, z0: f32, x1: f32, y1: f32, z1: f32) -> Self {
        Self::from_corners(Vec3::new(x0, y0, z0), Vec3::new(x1, y1, z1))
    }

    /// Min/max reduction over packed xyz positions.
    ///
    /// Returns `None` when `positions` holds no complete vertex.
    /// A trailing partial vertex is ignored.
    pub fn from_positions(positions: &[f32]) -> Option<Self> {
        let mut chunks = positions.chunks_exact(3);
        let first = chunks.next().map(Vec3::from_slice)?;
        let (min, max) = chunks.fold((first, first), |(min, max), c| {
            let p = Vec3::from_slice(c);
            (min.min(p), max.max(p))
        });
        Some(Self { min, max })
    }

    /// False only for the all-zero sentinel
    pub fn is_set(&self) -> bool {
        *self != Self::UNSET
    }

    /// Transform this box by a matrix, returning a new axis-aligned box.
    ///
    /// Uses the Arvo method: projects each matrix axis onto the box extents,
    /// which yields the enclosure of the 8 transformed corners without
    /// transforming them one by one.
    pub fn transformed(&self, matrix: &Mat4) -> BoundingBox {
        let translation = matrix.col(3).truncate();
        let mut new_min = translation;
        let mut new_max = translation;

        for i in 0..3 {
            let axis = matrix.col(i).truncate();
            let a = axis * self.min[i];
            let b = axis * self.max[i];
            new_min += a.min(b);
            new_max += a.max(b);
        }

        BoundingBox { min: new_min, max: new_max }
    }

    /// Smallest box enclosing both boxes. Unset boxes are ignored.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        match (self.is_set(), other.is_set()) {
            (false, _) => *other,
            (true, false) => *self,
            (true, true) => BoundingBox {
                min: self.min.min(other.min),
                max: self.max.max(other.max),
            },
        }
    }

    /// Test if this box fully contains another box.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.min.x <= other.min.x && self.max.x >= other.max.x
        && self.min.y <= other.min.y && self.max.y >= other.max.y
        && self.min.z <= other.min.z && self.max.z >= other.max.z
    }

    /// Test if a point lies inside (or on the surface of) this box.
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Test if this box intersects (overlaps or touches) another box.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x
        && self.min.y <= other.max.y && self.max.y >= other.min.y
        && self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full size along each axis
    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }

    /// Packed as `[min.x, min.y, min.z, max.x, max.y, max.z]`
    pub fn to_array(&self) -> [f32; 6] {
        [self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z]
    }
}

#[cfg(test)]
#[path = "bounding_box_tests.rs"]
mod tests;
