/// SceneGraph - arena of scene nodes plus the geometry store they reference.
///
/// Nodes are stored in a `SlotMap<NodeKey, Spatial>`. A container lists its
/// children by key and each child keeps a non-owning parent key, so the
/// tree can be walked both ways without reference cycles.
///
/// # Frame order
///
/// ```text
/// update(dt) ──▶ update_transform(root) ──▶ update_world_bound(root) ──▶ draw / pick
/// ```
///
/// Every per-frame traversal logs and skips what it cannot process and
/// never fails. Structural operations return `Result`.

use std::mem;
use glam::Mat4;
use slotmap::SlotMap;
use crate::error::Result;
use crate::{engine_bail, engine_debug, engine_err, engine_warn};
use crate::animation::Timeline;
use crate::graphics_device::GraphicsDevice;
use crate::intersection::{BoundingBox, PickResult, Ray};
use crate::resource::{GeometryBuffer, GeometryKey, GeometryStore};
use super::drawer::Drawer;
use super::spatial::{Light, NodeKey, NodeKind, Spatial};

#[derive(Debug)]
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, Spatial>,
    geometries: GeometryStore,
    root: NodeKey,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a graph holding a single root container named "root"
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Spatial::new("root", NodeKind::Container { children: Vec::new() }));
        Self {
            nodes,
            geometries: GeometryStore::new(),
            root,
        }
    }

    // ===== ACCESS =====

    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn node(&self, key: NodeKey) -> Option<&Spatial> {
        self.nodes.get(key)
    }

    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut Spatial> {
        self.nodes.get_mut(key)
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn geometries(&self) -> &GeometryStore {
        &self.geometries
    }

    pub fn geometries_mut(&mut self) -> &mut GeometryStore {
        &mut self.geometries
    }

    /// Geometry referenced by a geometry node
    pub fn geometry_of(&self, key: NodeKey) -> Option<&GeometryBuffer> {
        self.geometries.get(self.nodes.get(key)?.geometry()?)
    }

    /// Mutable geometry of a geometry node (rejected by the buffer for clones)
    pub fn geometry_of_mut(&mut self, key: NodeKey) -> Option<&mut GeometryBuffer> {
        let geometry = self.nodes.get(key)?.geometry()?;
        self.geometries.get_mut(geometry)
    }

    fn get_node(&self, key: NodeKey) -> Result<&Spatial> {
        self.nodes.get(key).ok_or_else(|| {
            engine_err!("arbor3d::SceneGraph", InvalidResource => "Unknown node {:?}", key)
        })
    }

    fn get_node_mut(&mut self, key: NodeKey) -> Result<&mut Spatial> {
        self.nodes.get_mut(key).ok_or_else(|| {
            engine_err!("arbor3d::SceneGraph", InvalidResource => "Unknown node {:?}", key)
        })
    }

    // ===== NODE CREATION =====
    //
    // New nodes are detached; attach them with `attach_child`.

    pub fn create_container(&mut self, name: impl Into<String>) -> NodeKey {
        self.nodes.insert(Spatial::new(name, NodeKind::Container { children: Vec::new() }))
    }

    pub fn create_light(&mut self, name: impl Into<String>, light: Light) -> NodeKey {
        self.nodes.insert(Spatial::new(name, NodeKind::Light { children: Vec::new(), light }))
    }

    /// Create a geometry node owning a new origin geometry
    pub fn create_geometry(&mut self, name: impl Into<String>, geometry: GeometryBuffer) -> NodeKey {
        let geometry = self.geometries.insert(geometry);
        self.nodes.insert(Spatial::new(name, NodeKind::Geometry(geometry)))
    }

    /// Create a geometry node referencing a geometry already in the store
    pub fn create_geometry_node(&mut self, name: impl Into<String>, geometry: GeometryKey) -> Result<NodeKey> {
        if !self.geometries.contains(geometry) {
            engine_bail!("arbor3d::SceneGraph", InvalidResource => "Unknown geometry {:?}", geometry);
        }
        Ok(self.nodes.insert(Spatial::new(name, NodeKind::Geometry(geometry))))
    }

    pub fn create_pick_box(&mut self, name: impl Into<String>, model_bound: BoundingBox) -> NodeKey {
        self.nodes.insert(Spatial::new(name, NodeKind::PickBox { model_bound }))
    }

    pub fn create_meta(&mut self, name: impl Into<String>) -> NodeKey {
        self.nodes.insert(Spatial::new(name, NodeKind::Meta))
    }

    // ===== STRUCTURE =====

    /// Attach `child` under `parent`, detaching it from any previous parent.
    ///
    /// # Errors
    ///
    /// - `InvalidResource` for unknown keys or a non-container parent
    /// - `InvalidInput` when the move would create a cycle or attach the root
    pub fn attach_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<()> {
        let parent_node = self.get_node(parent)?;
        if !parent_node.is_container() {
            engine_bail!("arbor3d::SceneGraph", InvalidResource =>
                "Cannot attach to {} ({} node)", parent_node.name(), parent_node.kind().label());
        }
        self.get_node(child)?;
        if child == self.root {
            engine_bail!("arbor3d::SceneGraph", InvalidInput => "The root cannot be attached");
        }
        if self.is_ancestor_or_self(child, parent) {
            engine_bail!("arbor3d::SceneGraph", InvalidInput =>
                "Attaching {:?} under {:?} would create a cycle", child, parent);
        }

        self.unlink_from_parent(child);
        if let Some(children) = self.nodes.get_mut(parent).and_then(|n| n.kind.children_mut()) {
            children.push(child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        Ok(())
    }

    /// Detach `child` from `parent`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when `child` is not a child of `parent`.
    pub fn detach_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<()> {
        if self.get_node(child)?.parent() != Some(parent) {
            engine_bail!("arbor3d::SceneGraph", InvalidInput =>
                "{:?} is not a child of {:?}", child, parent);
        }
        self.unlink_from_parent(child);
        Ok(())
    }

    /// Detach `node` from its parent, if it has one
    pub fn detach_from_parent(&mut self, node: NodeKey) -> Result<()> {
        self.get_node(node)?;
        self.unlink_from_parent(node);
        Ok(())
    }

    fn unlink_from_parent(&mut self, child: NodeKey) {
        let Some(parent) = self.nodes.get_mut(child).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(children) = self.nodes.get_mut(parent).and_then(|n| n.kind.children_mut()) {
            children.retain(|&c| c != child);
        }
    }

    /// True when `ancestor` is `node` or one of its parents
    pub fn is_ancestor_or_self(&self, ancestor: NodeKey, node: NodeKey) -> bool {
        let mut current = Some(node);
        while let Some(key) = current {
            if key == ancestor {
                return true;
            }
            current = self.nodes.get(key).and_then(Spatial::parent);
        }
        false
    }

    /// Remove `node` and its whole subtree, releasing unreferenced geometry.
    ///
    /// Device buffers are not freed; call `free_node_buffers` first.
    pub fn remove_node(&mut self, node: NodeKey) -> Result<()> {
        self.get_node(node)?;
        if node == self.root {
            engine_bail!("arbor3d::SceneGraph", InvalidInput => "The root cannot be removed");
        }
        self.unlink_from_parent(node);

        // Children first, so clones go before their origins
        let mut subtree = self.subtree(node);
        subtree.reverse();
        let mut geometries = Vec::new();
        for key in subtree {
            if let Some(removed) = self.nodes.remove(key) {
                if let Some(geometry) = removed.geometry() {
                    geometries.push(geometry);
                }
            }
        }
        for geometry in geometries {
            let origin = self.geometries.get(geometry).and_then(GeometryBuffer::origin);
            self.release_unreferenced(geometry);
            if let Some(origin) = origin {
                self.release_unreferenced(origin);
            }
        }
        engine_debug!("arbor3d::SceneGraph", "Removed subtree {:?}, {} nodes left", node, self.nodes.len());
        Ok(())
    }

    fn release_unreferenced(&mut self, geometry: GeometryKey) {
        if !self.nodes.values().any(|n| n.geometry() == Some(geometry)) {
            self.geometries.release(geometry);
        }
    }

    /// Keys of `node` and all its descendants, depth-first pre-order
    pub fn subtree(&self, node: NodeKey) -> Vec<NodeKey> {
        let mut result = Vec::new();
        let mut stack = vec![node];
        while let Some(key) = stack.pop() {
            let Some(spatial) = self.nodes.get(key) else {
                continue;
            };
            result.push(key);
            stack.extend(spatial.children().iter().rev());
        }
        result
    }

    /// First node named `name` in depth-first order from the root
    pub fn find_by_name(&self, name: &str) -> Option<NodeKey> {
        self.subtree(self.root)
            .into_iter()
            .find(|&key| self.nodes.get(key).is_some_and(|n| n.name() == name))
    }

    // ===== TRANSFORMS =====

    /// Recompute world transforms of `node` and its subtree:
    /// `world = parent_world · T · R · S`
    pub fn update_transform(&mut self, node: NodeKey) {
        let mut stack = vec![node];
        while let Some(key) = stack.pop() {
            let parent_world = self.nodes.get(key)
                .and_then(Spatial::parent)
                .and_then(|p| self.nodes.get(p))
                .map_or(Mat4::IDENTITY, |p| p.world_transform);
            let Some(spatial) = self.nodes.get_mut(key) else {
                engine_warn!("arbor3d::SceneGraph", "update_transform skipped unknown node {:?}", key);
                continue;
            };
            spatial.world_transform = parent_world * spatial.local_transform();
            stack.extend_from_slice(spatial.children());
        }
    }

    // ===== BOUNDS =====

    /// Recompute the world bound of `node` (and of its subtree for
    /// containers). With `propagate`, every ancestor re-encloses its
    /// children afterwards.
    pub fn update_world_bound(&mut self, node: NodeKey, propagate: bool) {
        self.refresh_world_bound(node);
        if propagate {
            let mut current = self.nodes.get(node).and_then(Spatial::parent);
            while let Some(parent) = current {
                self.enclose_children(parent);
                current = self.nodes.get(parent).and_then(Spatial::parent);
            }
        }
    }

    fn refresh_world_bound(&mut self, key: NodeKey) {
        let Some(spatial) = self.nodes.get(key) else {
            engine_warn!("arbor3d::SceneGraph", "update_world_bound skipped unknown node {:?}", key);
            return;
        };
        let world = spatial.world_transform;
        match &spatial.kind {
            NodeKind::Container { children } | NodeKind::Light { children, .. } => {
                let children = children.clone();
                for child in children {
                    self.refresh_world_bound(child);
                }
                self.enclose_children(key);
            }
            NodeKind::Geometry(geometry) => {
                let geometry = *geometry;
                match self.geometries.update_model_bound(geometry) {
                    Some(model) if model.is_set() => {
                        if let Some(spatial) = self.nodes.get_mut(key) {
                            spatial.world_bound = model.transformed(&world);
                        }
                    }
                    Some(_) => {}
                    None => {
                        engine_warn!("arbor3d::SceneGraph", "Node {:?} references unknown geometry {:?}", key, geometry);
                    }
                }
            }
            NodeKind::PickBox { model_bound } => {
                let bound = model_bound.transformed(&world);
                if let Some(spatial) = self.nodes.get_mut(key) {
                    spatial.world_bound = bound;
                }
            }
            NodeKind::Meta => {}
        }
    }

    /// Rebuild a container's bound as the union of its children's bounds
    fn enclose_children(&mut self, container: NodeKey) {
        let Some(spatial) = self.nodes.get(container) else {
            return;
        };
        let bound = spatial.children().iter()
            .filter_map(|&c| self.nodes.get(c))
            .fold(BoundingBox::UNSET, |acc, child| acc.union(&child.world_bound));
        if let Some(spatial) = self.nodes.get_mut(container) {
            spatial.world_bound = bound;
        }
    }

    // ===== PICKING =====

    /// Collect the closest pickable leaf hit by `ray` under `node`.
    ///
    /// Containers prune their subtree when the ray misses their bound.
    /// A non-pickable node hides its whole subtree.
    pub fn calculate_pick(&self, node: NodeKey, ray: &Ray, result: &mut PickResult) {
        let Some(spatial) = self.nodes.get(node) else {
            return;
        };
        if !spatial.is_pickable() {
            return;
        }
        match &spatial.kind {
            NodeKind::Container { children } | NodeKind::Light { children, .. } => {
                if spatial.world_bound.is_set() && !ray.hits(&spatial.world_bound) {
                    return;
                }
                for &child in children {
                    self.calculate_pick(child, ray, result);
                }
            }
            NodeKind::Geometry(_) | NodeKind::PickBox { .. } => {
                if !spatial.world_bound.is_set() {
                    return;
                }
                if let Some(distance) = ray.intersect(&spatial.world_bound) {
                    result.add(node, distance);
                }
            }
            NodeKind::Meta => {}
        }
    }

    /// Pick from the root
    pub fn pick(&self, ray: &Ray) -> PickResult {
        let mut result = PickResult::new();
        self.calculate_pick(self.root, ray, &mut result);
        result
    }

    // ===== ANIMATION =====

    /// Prepare `timeline` against the node's translation and attach it.
    ///
    /// # Errors
    ///
    /// `IncompleteAnimation` when the timeline cannot be prepared; it is
    /// not attached.
    pub fn add_timeline(&mut self, node: NodeKey, mut timeline: Timeline) -> Result<()> {
        let spatial = self.get_node_mut(node)?;
        timeline.prepare(spatial.local_translation())?;
        spatial.timelines.push(timeline);
        Ok(())
    }

    pub fn remove_timeline(&mut self, node: NodeKey, index: usize) -> Option<Timeline> {
        let spatial = self.nodes.get_mut(node)?;
        (index < spatial.timelines.len()).then(|| spatial.timelines.remove(index))
    }

    pub fn clear_timelines(&mut self, node: NodeKey) {
        if let Some(spatial) = self.nodes.get_mut(node) {
            spatial.timelines.clear();
        }
    }

    pub fn timelines(&self, node: NodeKey) -> &[Timeline] {
        self.nodes.get(node).map(Spatial::timelines).unwrap_or(&[])
    }

    pub fn timelines_mut(&mut self, node: NodeKey) -> Option<&mut [Timeline]> {
        self.nodes.get_mut(node).map(|n| n.timelines.as_mut_slice())
    }

    /// Advance every timeline in the graph by `dt`
    pub fn update(&mut self, dt: f32) {
        self.update_node(self.root, dt);
    }

    /// Advance the timelines of `node` and its subtree by `dt`.
    ///
    /// A node moved by a timeline gets its world transform and bound
    /// refreshed immediately (without propagating to ancestors).
    pub fn update_node(&mut self, node: NodeKey, dt: f32) {
        let Some(spatial) = self.nodes.get_mut(node) else {
            return;
        };
        let mut timelines = mem::take(&mut spatial.timelines);
        let mut moved = false;
        for timeline in timelines.iter_mut() {
            if let Some(translation) = timeline.update(dt, node) {
                spatial.set_local_translation(translation);
                moved = true;
            }
        }
        spatial.timelines = timelines;
        let children = spatial.children().to_vec();

        if moved {
            self.update_transform(node);
            self.update_world_bound(node, false);
        }
        for child in children {
            self.update_node(child, dt);
        }
    }

    // ===== GEOMETRY =====

    /// Create a detached geometry node sharing the data and buffers of
    /// `source`, with the same local transform.
    ///
    /// # Errors
    ///
    /// `InvalidResource` when `source` is not a geometry node, or any error
    /// of `GeometryStore::create_clone`.
    pub fn clone_mesh(&mut self, source: NodeKey, name: impl Into<String>) -> Result<NodeKey> {
        let spatial = self.get_node(source)?;
        let Some(geometry) = spatial.geometry() else {
            engine_bail!("arbor3d::SceneGraph", InvalidResource =>
                "Cannot clone {} ({} node)", spatial.name(), spatial.kind().label());
        };
        let (translation, rotation, scale) =
            (spatial.local_translation(), spatial.local_rotation(), spatial.local_scale());

        let name = name.into();
        let clone_geometry = self.geometries.create_clone(geometry, name.clone())?;
        let mut clone = Spatial::new(name, NodeKind::Geometry(clone_geometry));
        if let Some(t) = translation {
            clone.set_local_translation(t);
        }
        if let Some(r) = rotation {
            clone.set_local_rotation(r.angle, r.axis);
        }
        if let Some(s) = scale {
            clone.set_local_scale(s);
        }
        Ok(self.nodes.insert(clone))
    }

    /// Vertex positions of a geometry node in world space
    pub fn world_vertices(&self, node: NodeKey) -> Option<Vec<f32>> {
        let spatial = self.nodes.get(node)?;
        let vertices = self.geometries.get(spatial.geometry()?)?.vertices()?;
        let world = spatial.world_transform;
        Some(vertices.chunks_exact(3)
            .flat_map(|v| world.transform_point3(glam::Vec3::from_slice(v)).to_array())
            .collect())
    }

    fn geometry_keys(&self, node: NodeKey) -> Vec<GeometryKey> {
        self.subtree(node).into_iter()
            .filter_map(|key| self.nodes.get(key).and_then(Spatial::geometry))
            .collect()
    }

    // ===== DEVICE BUFFERS =====

    /// Generate device buffers for every geometry in the graph
    pub fn generate_buffers(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        self.generate_node_buffers(self.root, device)
    }

    /// Generate device buffers for every geometry under `node`.
    ///
    /// Geometry without vertices or indices is skipped with a warning.
    /// Every geometry is attempted; the first error is returned.
    pub fn generate_node_buffers(&mut self, node: NodeKey, device: &mut dyn GraphicsDevice) -> Result<()> {
        let mut first_error = None;
        for geometry in self.geometry_keys(node) {
            let drawable = self.geometries.resolve_origin(geometry)
                .and_then(|origin| self.geometries.get(origin))
                .is_some_and(GeometryBuffer::is_drawable);
            if !drawable {
                engine_warn!("arbor3d::SceneGraph", "Skipping buffers of incomplete geometry {:?}", geometry);
                continue;
            }
            if let Err(e) = self.geometries.generate(geometry, device) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Drop every handle without device calls (context lost)
    pub fn forget_buffers(&mut self) {
        self.geometries.forget_all();
    }

    pub fn forget_node_buffers(&mut self, node: NodeKey) {
        for geometry in self.geometry_keys(node) {
            self.geometries.forget(geometry);
        }
    }

    /// Delete every device buffer in the graph
    pub fn free_buffers(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        self.free_node_buffers(self.root, device)
    }

    pub fn free_node_buffers(&mut self, node: NodeKey, device: &mut dyn GraphicsDevice) -> Result<()> {
        let mut first_error = None;
        for geometry in self.geometry_keys(node) {
            if let Err(e) = self.geometries.free(geometry, device) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    // ===== DRAWING =====

    /// Draw the graph from the root
    pub fn draw(&self, drawer: &mut dyn Drawer) {
        self.draw_node(self.root, drawer);
    }

    /// Depth-first draw of `node`; lights are applied before their children
    pub fn draw_node(&self, node: NodeKey, drawer: &mut dyn Drawer) {
        let Some(spatial) = self.nodes.get(node) else {
            return;
        };
        match &spatial.kind {
            NodeKind::Container { children } => {
                for &child in children {
                    self.draw_node(child, drawer);
                }
            }
            NodeKind::Light { children, light } => {
                drawer.apply_light(node, light, &spatial.world_transform);
                for &child in children {
                    self.draw_node(child, drawer);
                }
            }
            NodeKind::Geometry(geometry) => match self.geometries.get(*geometry) {
                Some(buffer) if buffer.is_drawable() => {
                    drawer.draw_geometry(node, &spatial.world_transform, buffer);
                }
                Some(buffer) => {
                    engine_warn!("arbor3d::SceneGraph", "Vertices or indices are missing in {}", buffer.name());
                }
                None => {
                    engine_warn!("arbor3d::SceneGraph", "Node {} references unknown geometry", spatial.name());
                }
            },
            NodeKind::PickBox { .. } | NodeKind::Meta => {}
        }
    }
}

#[cfg(test)]
#[path = "scene_graph_tests.rs"]
mod tests;
