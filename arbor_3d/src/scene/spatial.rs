/// Scene node data.
///
/// A `Spatial` carries identity, a local transform decomposed into optional
/// translation / rotation / scale, the composed world transform, a world
/// bound, a non-owning parent key, attached timelines, and its `NodeKind`.
/// Nodes live in a `SceneGraph` arena; structure is edited only through it.

use std::any::Any;
use std::sync::Arc;
use glam::{Mat4, Quat, Vec3, Vec4};
use slotmap::new_key_type;
use crate::error::Result;
use crate::engine_bail;
use crate::animation::Timeline;
use crate::intersection::BoundingBox;
use crate::resource::GeometryKey;

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable key for a node within a SceneGraph.
    ///
    /// Keys remain valid even after other nodes are removed.
    /// A key becomes invalid only when its own node is removed.
    pub struct NodeKey;
}

// ===== ROTATION =====

/// Axis-angle rotation, angle in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub angle: f32,
    pub axis: Vec3,
}

impl Rotation {
    pub fn new(angle: f32, axis: Vec3) -> Self {
        Self { angle, axis }
    }

    /// `[angle_degrees, x, y, z]`
    pub fn from_slice(values: &[f32]) -> Result<Self> {
        if values.len() != 4 {
            engine_bail!("arbor3d::Spatial", InvalidInput =>
                "Invalid rotation array length (Expected: 4, Found: {})", values.len());
        }
        Ok(Self::new(values[0], Vec3::new(values[1], values[2], values[3])))
    }

    /// Unit quaternion; a zero axis yields the identity
    pub fn to_quat(&self) -> Quat {
        match self.axis.try_normalize() {
            Some(axis) => Quat::from_axis_angle(axis, self.angle.to_radians()),
            None => Quat::IDENTITY,
        }
    }
}

// ===== LIGHT =====

/// Light source description applied by a Light node before its children
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    /// Homogeneous position (w = 0 for a directional light)
    pub position: Vec4,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            ambient: Vec4::new(0.0, 0.0, 0.0, 1.0),
            diffuse: Vec4::ONE,
            specular: Vec4::ONE,
            position: Vec4::new(0.0, 0.0, 1.0, 0.0),
        }
    }
}

// ===== NODE KIND =====

/// Closed set of node behaviors
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Owns children and encloses their bounds
    Container { children: Vec<NodeKey> },
    /// Container that applies a light before drawing its children
    Light { children: Vec<NodeKey>, light: Light },
    /// Drawable leaf referencing a geometry resource
    Geometry(GeometryKey),
    /// Pick-only leaf with an externally assigned model bound
    PickBox { model_bound: BoundingBox },
    /// Empty leaf; every hook is a no-op
    Meta,
}

impl NodeKind {
    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Container { .. } | NodeKind::Light { .. })
    }

    /// Children of a container kind (empty for leaves)
    pub fn children(&self) -> &[NodeKey] {
        match self {
            NodeKind::Container { children } | NodeKind::Light { children, .. } => children,
            NodeKind::Geometry(_) | NodeKind::PickBox { .. } | NodeKind::Meta => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeKey>> {
        match self {
            NodeKind::Container { children } | NodeKind::Light { children, .. } => Some(children),
            NodeKind::Geometry(_) | NodeKind::PickBox { .. } | NodeKind::Meta => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Container { .. } => "container",
            NodeKind::Light { .. } => "light",
            NodeKind::Geometry(_) => "geometry",
            NodeKind::PickBox { .. } => "pick box",
            NodeKind::Meta => "meta",
        }
    }
}

// ===== SPATIAL =====

#[derive(Debug)]
pub struct Spatial {
    name: String,
    pickable: bool,
    data: Option<Arc<dyn Any + Send + Sync>>,
    translation: Option<Vec3>,
    rotation: Option<Rotation>,
    scale: Option<Vec3>,
    pub(crate) world_transform: Mat4,
    pub(crate) world_bound: BoundingBox,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) timelines: Vec<Timeline>,
    pub(crate) kind: NodeKind,
}

impl Spatial {
    pub(crate) fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            pickable: true,
            data: None,
            translation: None,
            rotation: None,
            scale: None,
            world_transform: Mat4::IDENTITY,
            world_bound: BoundingBox::UNSET,
            parent: None,
            timelines: Vec::new(),
            kind,
        }
    }

    // ===== IDENTITY =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn is_pickable(&self) -> bool {
        self.pickable
    }

    /// A non-pickable node is skipped by picking, together with its subtree
    pub fn set_pickable(&mut self, pickable: bool) {
        self.pickable = pickable;
    }

    /// Opaque user data
    pub fn data(&self) -> Option<&Arc<dyn Any + Send + Sync>> {
        self.data.as_ref()
    }

    /// Typed view of the user data
    pub fn data_as<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.data.as_deref().and_then(|d| d.downcast_ref::<T>())
    }

    pub fn set_data(&mut self, data: Option<Arc<dyn Any + Send + Sync>>) {
        self.data = data;
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    // ===== STRUCTURE =====

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    pub fn children(&self) -> &[NodeKey] {
        self.kind.children()
    }

    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    pub fn geometry(&self) -> Option<GeometryKey> {
        match self.kind {
            NodeKind::Geometry(key) => Some(key),
            _ => None,
        }
    }

    pub fn light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light { light, .. } => Some(light),
            _ => None,
        }
    }

    /// Replace the light of a Light node
    pub fn set_light(&mut self, new_light: Light) -> Result<()> {
        match &mut self.kind {
            NodeKind::Light { light, .. } => {
                *light = new_light;
                Ok(())
            }
            other => engine_bail!("arbor3d::Spatial", InvalidResource =>
                "{} is a {} node, not a light", self.name, other.label()),
        }
    }

    /// Replace the model bound of a PickBox node
    pub fn set_pick_bound(&mut self, bound: BoundingBox) -> Result<()> {
        match &mut self.kind {
            NodeKind::PickBox { model_bound } => {
                *model_bound = bound;
                Ok(())
            }
            other => engine_bail!("arbor3d::Spatial", InvalidResource =>
                "{} is a {} node, not a pick box", self.name, other.label()),
        }
    }

    // ===== LOCAL TRANSFORM =====

    pub fn local_translation(&self) -> Option<Vec3> {
        self.translation
    }

    pub fn local_rotation(&self) -> Option<Rotation> {
        self.rotation
    }

    pub fn local_scale(&self) -> Option<Vec3> {
        self.scale
    }

    pub fn set_local_translation(&mut self, translation: Vec3) {
        self.translation = Some(translation);
    }

    /// `[x, y, z]`; any other length is rejected
    pub fn set_local_translation_slice(&mut self, values: &[f32]) -> Result<()> {
        self.translation = Some(vec3_from_slice(&self.name, "translation", values)?);
        Ok(())
    }

    /// Rotation of `angle` degrees around `axis`
    pub fn set_local_rotation(&mut self, angle: f32, axis: Vec3) {
        self.rotation = Some(Rotation::new(angle, axis));
    }

    /// `[angle_degrees, x, y, z]`; any other length is rejected
    pub fn set_local_rotation_slice(&mut self, values: &[f32]) -> Result<()> {
        self.rotation = Some(Rotation::from_slice(values)?);
        Ok(())
    }

    pub fn set_local_scale(&mut self, scale: Vec3) {
        self.scale = Some(scale);
    }

    /// `[x, y, z]`; any other length is rejected
    pub fn set_local_scale_slice(&mut self, values: &[f32]) -> Result<()> {
        self.scale = Some(vec3_from_slice(&self.name, "scale", values)?);
        Ok(())
    }

    pub fn clear_local_transform(&mut self) {
        self.translation = None;
        self.rotation = None;
        self.scale = None;
    }

    /// Local T · R · S, skipping absent components
    pub fn local_transform(&self) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        if let Some(translation) = self.translation {
            matrix *= Mat4::from_translation(translation);
        }
        if let Some(rotation) = self.rotation {
            matrix *= Mat4::from_quat(rotation.to_quat());
        }
        if let Some(scale) = self.scale {
            matrix *= Mat4::from_scale(scale);
        }
        matrix
    }

    // ===== WORLD STATE =====

    /// World transform as of the last `SceneGraph::update_transform`
    pub fn world_transform(&self) -> &Mat4 {
        &self.world_transform
    }

    /// Overwrite the world transform from 16 column-major floats.
    ///
    /// The next `update_transform` recomputes it from the local transform.
    pub fn set_transform(&mut self, values: &[f32]) -> Result<()> {
        if values.len() != 16 {
            engine_bail!("arbor3d::Spatial", InvalidInput =>
                "Invalid transform array length (Expected: 16, Found: {}) in {}",
                values.len(), self.name);
        }
        self.world_transform = Mat4::from_cols_slice(values);
        Ok(())
    }

    pub fn world_bound(&self) -> &BoundingBox {
        &self.world_bound
    }

    // ===== TIMELINES =====

    pub fn timelines(&self) -> &[Timeline] {
        &self.timelines
    }
}

fn vec3_from_slice(name: &str, what: &str, values: &[f32]) -> Result<Vec3> {
    if values.len() != 3 {
        engine_bail!("arbor3d::Spatial", InvalidInput =>
            "Invalid {} array length (Expected: 3, Found: {}) in {}", what, values.len(), name);
    }
    Ok(Vec3::from_slice(values))
}

#[cfg(test)]
#[path = "spatial_tests.rs"]
mod tests;
