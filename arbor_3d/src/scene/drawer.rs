/// Drawer - strategy invoked by `SceneGraph::draw` for each visited node.
///
/// The scene graph owns traversal order and light scoping; a drawer only
/// issues the commands for one node at a time. Swapping the drawer swaps
/// the rendering backend without touching the graph.

use glam::Mat4;
use crate::resource::{DrawMode, GeometryBuffer};
use super::spatial::{Light, NodeKey};

pub trait Drawer {
    /// Draw one drawable geometry node with its world transform
    fn draw_geometry(&mut self, node: NodeKey, world_transform: &Mat4, geometry: &GeometryBuffer);

    /// Enable `light` before the children of a Light node are drawn
    fn apply_light(&mut self, _node: NodeKey, _light: &Light, _world_transform: &Mat4) {}
}

/// Counters gathered by `StatsDrawer` over one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub draw_calls: u32,
    pub triangles: u32,
    pub lights: u32,
}

/// Drawer that only counts what would be drawn
#[derive(Debug, Default)]
pub struct StatsDrawer {
    stats: DrawStats,
}

impl StatsDrawer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> DrawStats {
        self.stats
    }

    /// Return the counters and start a new frame
    pub fn take_stats(&mut self) -> DrawStats {
        std::mem::take(&mut self.stats)
    }
}

impl Drawer for StatsDrawer {
    fn draw_geometry(&mut self, _node: NodeKey, _world_transform: &Mat4, geometry: &GeometryBuffer) {
        let index_count = geometry.indices().map_or(0, <[u16]>::len) as u32;
        let triangles = match geometry.draw_mode() {
            DrawMode::Triangles => index_count / 3,
            DrawMode::TriangleStrip | DrawMode::TriangleFan => index_count.saturating_sub(2),
        };
        self.stats.draw_calls += 1;
        self.stats.triangles += triangles;
    }

    fn apply_light(&mut self, _node: NodeKey, _light: &Light, _world_transform: &Mat4) {
        self.stats.lights += 1;
    }
}
