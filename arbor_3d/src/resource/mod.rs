//! Geometry resource module
//!
//! Raw vertex/index/attribute storage, the buffer-object lifecycle shared
//! between a geometry and its clones, and the binary mesh format.

mod geometry_buffer;
mod geometry_store;
pub mod mesh_io;

pub use geometry_buffer::{
    GeometryBuffer, GeometryKey, GeometrySource, GeometryHandles,
    DrawMode, AttributeFlags,
};
pub use geometry_store::GeometryStore;
pub use mesh_io::{export_geometry, import_geometry};
