//! Intersection primitives
//!
//! Axis-aligned bounding boxes, rays with a precomputed slab test, and the
//! closest-hit accumulator used by scene picking.

mod bounding_box;
mod ray;
mod pick_result;

pub use bounding_box::BoundingBox;
pub use ray::Ray;
pub use pick_result::PickResult;
