//! Scene graph module
//!
//! Provides the node arena (`SceneGraph`), node data (`Spatial`, `NodeKind`),
//! and the drawing strategy seam (`Drawer`).

mod spatial;
mod scene_graph;
mod drawer;

pub use spatial::{Spatial, NodeKey, NodeKind, Rotation, Light};
pub use scene_graph::SceneGraph;
pub use drawer::{Drawer, StatsDrawer, DrawStats};
