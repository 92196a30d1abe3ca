//! Geometry resource: raw attribute arrays plus device buffer handles.
//!
//! A `GeometryBuffer` is either an **origin**, which owns its arrays and any
//! buffer objects generated from them, or a **clone** of an origin, which
//! aliases the origin's arrays (shared, read-only) and borrows the origin's
//! buffer handles. The ownership relation is the `GeometrySource` enum; a
//! clone has no code path that generates or deletes device buffers.
//!
//! # Attribute layout
//!
//! ```text
//! vertices   xyz  (3 × vertex_count f32)   mandatory for drawing
//! normals    xyz  (3 × vertex_count f32)   optional
//! colors     rgba (4 × vertex_count u8)    optional
//! texcoords  uv   (2 × vertex_count f32)   optional
//! indices    u16                           mandatory for drawing
//! ```

use std::sync::Arc;
use bitflags::bitflags;
use glam::Vec3;
use slotmap::new_key_type;
use crate::error::Result;
use crate::{engine_bail, engine_debug, engine_warn};
use crate::graphics_device::{GraphicsDevice, BufferHandle, BufferTarget};
use crate::intersection::BoundingBox;

// ============================================================================
// KEYS AND SMALL TYPES
// ============================================================================

new_key_type! {
    /// Stable key for a GeometryBuffer within a GeometryStore.
    pub struct GeometryKey;
}

/// Primitive assembly mode (values are the GL enumerants)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum DrawMode {
    #[default]
    Triangles = 0x0004,
    TriangleStrip = 0x0005,
    TriangleFan = 0x0006,
}

impl DrawMode {
    pub fn gl_code(self) -> i32 {
        self as i32
    }

    pub fn from_gl_code(code: i32) -> Option<Self> {
        match code {
            0x0004 => Some(DrawMode::Triangles),
            0x0005 => Some(DrawMode::TriangleStrip),
            0x0006 => Some(DrawMode::TriangleFan),
            _ => None,
        }
    }
}

bitflags! {
    /// Attribute arrays present on a geometry
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AttributeFlags: u32 {
        const POSITION = 1 << 0;
        const NORMAL   = 1 << 1;
        const COLOR    = 1 << 2;
        const TEXCOORD = 1 << 3;
        const INDEX    = 1 << 4;
    }
}

/// Who owns the arrays and the buffer objects of a geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometrySource {
    /// Owns its arrays and generates/deletes its own buffers
    Origin,
    /// Aliases the arrays and borrows the handles of another geometry
    CloneOf(GeometryKey),
}

/// Device buffer handles of a geometry.
///
/// `BufferHandle::NONE` marks an attribute with no buffer; a geometry is
/// allocated exactly when its vertex handle is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeometryHandles {
    pub vertex: BufferHandle,
    pub normal: BufferHandle,
    pub color: BufferHandle,
    pub texcoord: BufferHandle,
    pub index: BufferHandle,
    /// Number of indices uploaded into `index`
    pub index_count: u32,
}

impl GeometryHandles {
    pub fn is_allocated(&self) -> bool {
        self.vertex.is_valid()
    }

    /// All valid handles, position first, index last
    pub fn valid_handles(&self) -> impl Iterator<Item = BufferHandle> {
        [self.vertex, self.normal, self.color, self.texcoord, self.index]
            .into_iter()
            .filter(BufferHandle::is_valid)
    }

    pub fn clear(&mut self) {
        *self = GeometryHandles::default();
    }
}

// ============================================================================
// GEOMETRY BUFFER
// ============================================================================

/// Vertex/index/attribute storage with device buffer handles
#[derive(Debug, Clone)]
pub struct GeometryBuffer {
    name: String,
    source: GeometrySource,
    draw_mode: DrawMode,
    vertex_count: usize,
    center: Option<Vec3>,
    vertices: Option<Arc<[f32]>>,
    normals: Option<Arc<[f32]>>,
    colors: Option<Arc<[u8]>>,
    texcoords: Option<Arc<[f32]>>,
    indices: Option<Arc<[u16]>>,
    model_bound: BoundingBox,
    model_bound_dirty: bool,
    handles: GeometryHandles,
}

impl GeometryBuffer {
    /// Create an empty origin geometry
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: GeometrySource::Origin,
            draw_mode: DrawMode::Triangles,
            vertex_count: 0,
            center: None,
            vertices: None,
            normals: None,
            colors: None,
            texcoords: None,
            indices: None,
            model_bound: BoundingBox::UNSET,
            model_bound_dirty: true,
            handles: GeometryHandles::default(),
        }
    }

    /// Create an origin geometry from vertices and indices
    pub fn with_data(name: impl Into<String>, vertices: &[f32], indices: &[u16]) -> Result<Self> {
        let mut geometry = Self::new(name);
        geometry.set_vertices(vertices)?;
        geometry.set_indices(indices)?;
        Ok(geometry)
    }

    /// Alias `origin`'s arrays under a new name (internal: GeometryStore only)
    pub(crate) fn new_clone(name: impl Into<String>, origin_key: GeometryKey, origin: &GeometryBuffer) -> Self {
        Self {
            name: name.into(),
            source: GeometrySource::CloneOf(origin_key),
            draw_mode: origin.draw_mode,
            vertex_count: origin.vertex_count,
            center: origin.center,
            vertices: origin.vertices.clone(),
            normals: origin.normals.clone(),
            colors: origin.colors.clone(),
            texcoords: origin.texcoords.clone(),
            indices: origin.indices.clone(),
            model_bound: origin.model_bound,
            model_bound_dirty: origin.model_bound_dirty,
            handles: GeometryHandles::default(),
        }
    }

    // ===== ACCESSORS =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> GeometrySource {
        self.source
    }

    pub fn is_clone(&self) -> bool {
        matches!(self.source, GeometrySource::CloneOf(_))
    }

    /// Origin key for a clone, None for an origin
    pub fn origin(&self) -> Option<GeometryKey> {
        match self.source {
            GeometrySource::Origin => None,
            GeometrySource::CloneOf(key) => Some(key),
        }
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn center(&self) -> Option<Vec3> {
        self.center
    }

    pub fn vertices(&self) -> Option<&[f32]> {
        self.vertices.as_deref()
    }

    pub fn normals(&self) -> Option<&[f32]> {
        self.normals.as_deref()
    }

    pub fn colors(&self) -> Option<&[u8]> {
        self.colors.as_deref()
    }

    pub fn texcoords(&self) -> Option<&[f32]> {
        self.texcoords.as_deref()
    }

    pub fn indices(&self) -> Option<&[u16]> {
        self.indices.as_deref()
    }

    /// Local-space bound as last computed or assigned.
    ///
    /// For clones, `GeometryStore::model_bound` resolves through the origin
    /// and is the authoritative value.
    pub fn model_bound(&self) -> BoundingBox {
        self.model_bound
    }

    pub fn has_dirty_model_bound(&self) -> bool {
        self.model_bound_dirty
    }

    pub fn handles(&self) -> &GeometryHandles {
        &self.handles
    }

    pub fn is_allocated(&self) -> bool {
        self.handles.is_allocated()
    }

    /// Attribute arrays currently present
    pub fn attributes(&self) -> AttributeFlags {
        let mut flags = AttributeFlags::empty();
        flags.set(AttributeFlags::POSITION, self.vertices.is_some());
        flags.set(AttributeFlags::NORMAL, self.normals.is_some());
        flags.set(AttributeFlags::COLOR, self.colors.is_some());
        flags.set(AttributeFlags::TEXCOORD, self.texcoords.is_some());
        flags.set(AttributeFlags::INDEX, self.indices.is_some());
        flags
    }

    /// Vertices and indices are both present
    pub fn is_drawable(&self) -> bool {
        self.attributes().contains(AttributeFlags::POSITION | AttributeFlags::INDEX)
    }

    // ===== SETTERS =====

    fn ensure_origin(&self, what: &str) -> Result<()> {
        if self.is_clone() {
            engine_bail!("arbor3d::GeometryBuffer", InvalidResource =>
                "Cannot set {} on clone {}", what, self.name);
        }
        Ok(())
    }

    fn check_length(&self, what: &str, found: usize, per_vertex: usize) -> Result<()> {
        let expected = self.vertex_count * per_vertex;
        if found != expected {
            engine_bail!("arbor3d::GeometryBuffer", InvalidInput =>
                "Invalid {} array length (Expected: {}, Found: {}) in {}",
                what, expected, found, self.name);
        }
        Ok(())
    }

    /// Replace the vertex positions.
    ///
    /// Marks the model bound dirty. Optional attributes whose length no
    /// longer matches the new vertex count are dropped.
    pub fn set_vertices(&mut self, vertices: &[f32]) -> Result<()> {
        self.ensure_origin("vertices")?;
        if vertices.len() % 3 != 0 {
            engine_bail!("arbor3d::GeometryBuffer", InvalidInput =>
                "Invalid vertex array length (Found: {}, not divisible by 3) in {}",
                vertices.len(), self.name);
        }
        let vertex_count = vertices.len() / 3;
        if vertex_count != self.vertex_count {
            self.drop_mismatched_attributes(vertex_count);
        }
        self.vertex_count = vertex_count;
        self.vertices = Some(Arc::from(vertices));
        self.model_bound_dirty = true;
        Ok(())
    }

    fn drop_mismatched_attributes(&mut self, vertex_count: usize) {
        if self.normals.as_ref().is_some_and(|n| n.len() != vertex_count * 3) {
            engine_warn!("arbor3d::GeometryBuffer", "Dropping normals of {} (vertex count changed)", self.name);
            self.normals = None;
        }
        if self.colors.as_ref().is_some_and(|c| c.len() != vertex_count * 4) {
            engine_warn!("arbor3d::GeometryBuffer", "Dropping colors of {} (vertex count changed)", self.name);
            self.colors = None;
        }
        if self.texcoords.as_ref().is_some_and(|t| t.len() != vertex_count * 2) {
            engine_warn!("arbor3d::GeometryBuffer", "Dropping texture coordinates of {} (vertex count changed)", self.name);
            self.texcoords = None;
        }
    }

    pub fn set_indices(&mut self, indices: &[u16]) -> Result<()> {
        self.ensure_origin("indices")?;
        self.indices = Some(Arc::from(indices));
        Ok(())
    }

    /// Per-vertex normals, 3 × vertex count
    pub fn set_normals(&mut self, normals: &[f32]) -> Result<()> {
        self.ensure_origin("normals")?;
        self.check_length("normal", normals.len(), 3)?;
        self.normals = Some(Arc::from(normals));
        Ok(())
    }

    /// Per-vertex RGBA8 colors, 4 × vertex count
    pub fn set_colors(&mut self, colors: &[u8]) -> Result<()> {
        self.ensure_origin("colors")?;
        self.check_length("color", colors.len(), 4)?;
        self.colors = Some(Arc::from(colors));
        Ok(())
    }

    /// Per-vertex texture coordinates, 2 × vertex count
    pub fn set_texcoords(&mut self, texcoords: &[f32]) -> Result<()> {
        self.ensure_origin("texture coordinates")?;
        self.check_length("texture coordinate", texcoords.len(), 2)?;
        self.texcoords = Some(Arc::from(texcoords));
        Ok(())
    }

    /// Give every vertex the same RGBA8 color
    pub fn set_solid_color(&mut self, rgba: [u8; 4]) -> Result<()> {
        self.ensure_origin("colors")?;
        let colors: Vec<u8> = rgba.iter().copied().cycle().take(self.vertex_count * 4).collect();
        self.colors = Some(Arc::from(colors));
        Ok(())
    }

    /// Give every vertex the same color from floats in [0, 1]
    pub fn set_solid_color_f32(&mut self, rgba: [f32; 4]) -> Result<()> {
        self.set_solid_color(rgba.map(|c| (c.clamp(0.0, 1.0) * 255.0) as u8))
    }

    /// Assign the local-space bound explicitly (clears the dirty flag)
    pub fn set_model_bound(&mut self, bound: BoundingBox) -> Result<()> {
        self.ensure_origin("model bound")?;
        self.model_bound = bound;
        self.model_bound_dirty = false;
        Ok(())
    }

    /// Force the next bound update to rescan the vertices
    pub fn mark_model_bound_dirty(&mut self) {
        self.model_bound_dirty = true;
    }

    pub fn set_center(&mut self, center: Option<Vec3>) -> Result<()> {
        self.ensure_origin("center")?;
        self.center = center;
        Ok(())
    }

    pub fn set_draw_mode(&mut self, mode: DrawMode) -> Result<()> {
        self.ensure_origin("draw mode")?;
        self.draw_mode = mode;
        Ok(())
    }

    // ===== BOUNDS =====

    /// Rescan vertex positions if the bound is dirty.
    ///
    /// Missing vertices leave the bound untouched (diagnostic only).
    pub(crate) fn refresh_model_bound(&mut self) -> BoundingBox {
        if !self.model_bound_dirty {
            return self.model_bound;
        }
        match self.vertices.as_deref().and_then(BoundingBox::from_positions) {
            Some(bound) => {
                self.model_bound = bound;
                self.model_bound_dirty = false;
            }
            None => {
                engine_warn!("arbor3d::GeometryBuffer", "Vertices are missing in {}", self.name);
            }
        }
        self.model_bound
    }

    /// Mirror the origin's bound on a clone
    pub(crate) fn sync_model_bound(&mut self, bound: BoundingBox) {
        self.model_bound = bound;
        self.model_bound_dirty = false;
    }

    // ===== DEVICE BUFFERS =====

    /// Generate and upload one buffer per present attribute plus the index
    /// buffer. No-op when already allocated. On failure every buffer
    /// generated so far is deleted again and the geometry stays unallocated.
    pub(crate) fn generate_owned(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        if self.is_clone() {
            engine_bail!("arbor3d::GeometryBuffer", InvalidResource =>
                "Clone {} cannot own buffers", self.name);
        }
        if self.handles.is_allocated() {
            return Ok(());
        }
        if self.vertices.is_none() {
            engine_bail!("arbor3d::GeometryBuffer", MissingData => "Vertices are missing in {}", self.name);
        }
        if self.indices.is_none() {
            engine_bail!("arbor3d::GeometryBuffer", MissingData => "Indices are missing in {}", self.name);
        }

        let mut handles = GeometryHandles::default();
        match self.upload_all(device, &mut handles) {
            Ok(()) => {
                engine_debug!("arbor3d::GeometryBuffer", "Generated {} buffers for {}",
                    handles.valid_handles().count(), self.name);
                self.handles = handles;
                Ok(())
            }
            Err(err) => {
                for handle in handles.valid_handles() {
                    let _ = device.delete_buffer(handle);
                }
                Err(err)
            }
        }
    }

    fn upload_all(&self, device: &mut dyn GraphicsDevice, handles: &mut GeometryHandles) -> Result<()> {
        if let Some(vertices) = &self.vertices {
            upload(device, &mut handles.vertex, BufferTarget::Array, bytemuck::cast_slice(&vertices[..]))?;
        }
        if let Some(normals) = &self.normals {
            upload(device, &mut handles.normal, BufferTarget::Array, bytemuck::cast_slice(&normals[..]))?;
        }
        if let Some(colors) = &self.colors {
            upload(device, &mut handles.color, BufferTarget::Array, &colors[..])?;
        }
        if let Some(texcoords) = &self.texcoords {
            upload(device, &mut handles.texcoord, BufferTarget::Array, bytemuck::cast_slice(&texcoords[..]))?;
        }
        if let Some(indices) = &self.indices {
            upload(device, &mut handles.index, BufferTarget::ElementArray, bytemuck::cast_slice(&indices[..]))?;
            handles.index_count = indices.len() as u32;
        }
        Ok(())
    }

    /// Delete every owned buffer, then forget the handles.
    ///
    /// All deletions are attempted; the first failure is returned.
    pub(crate) fn free_owned(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        if self.is_clone() || !self.handles.is_allocated() {
            self.handles.clear();
            return Ok(());
        }
        let mut first_error = None;
        for handle in self.handles.valid_handles() {
            if let Err(err) = device.delete_buffer(handle) {
                first_error.get_or_insert(err);
            }
        }
        engine_debug!("arbor3d::GeometryBuffer", "Freed buffers of {}", self.name);
        self.handles.clear();
        first_error.map_or(Ok(()), Err)
    }

    /// Clear handle references without any delete call
    pub(crate) fn forget_handles(&mut self) {
        self.handles.clear();
    }

    pub(crate) fn borrow_handles(&mut self, handles: GeometryHandles) {
        self.handles = handles;
    }
}

fn upload(
    device: &mut dyn GraphicsDevice,
    slot: &mut BufferHandle,
    target: BufferTarget,
    bytes: &[u8],
) -> Result<()> {
    *slot = device.generate_buffer()?;
    device.upload_buffer(*slot, target, bytes)
}

#[cfg(test)]
#[path = "geometry_buffer_tests.rs"]
mod tests;
