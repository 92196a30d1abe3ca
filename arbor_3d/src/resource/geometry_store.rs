/// GeometryStore - every geometry resource of a scene graph, keyed by
/// `GeometryKey`.
///
/// Owns the buffer lifecycle (generate / forget / free) because a clone's
/// transitions reach into its origin.
///
/// ```text
/// no-handles ──generate──▶ allocated ──forget──▶ no-handles
///                              │
///                              └──free (delete calls)──▶ no-handles
/// ```

use slotmap::SlotMap;
use crate::error::Result;
use crate::{engine_bail, engine_err, engine_warn};
use crate::graphics_device::GraphicsDevice;
use crate::intersection::BoundingBox;
use super::geometry_buffer::{GeometryBuffer, GeometryKey, GeometrySource};

#[derive(Debug, Default)]
pub struct GeometryStore {
    geometries: SlotMap<GeometryKey, GeometryBuffer>,
}

impl GeometryStore {
    pub fn new() -> Self {
        Self { geometries: SlotMap::with_key() }
    }

    // ===== STORAGE =====

    /// Insert an origin geometry and return its key
    pub fn insert(&mut self, geometry: GeometryBuffer) -> GeometryKey {
        self.geometries.insert(geometry)
    }

    pub fn get(&self, key: GeometryKey) -> Option<&GeometryBuffer> {
        self.geometries.get(key)
    }

    pub fn get_mut(&mut self, key: GeometryKey) -> Option<&mut GeometryBuffer> {
        self.geometries.get_mut(key)
    }

    pub fn contains(&self, key: GeometryKey) -> bool {
        self.geometries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GeometryKey, &GeometryBuffer)> {
        self.geometries.iter()
    }

    /// Keys of every clone aliasing `origin`
    pub fn clones_of(&self, origin: GeometryKey) -> impl Iterator<Item = GeometryKey> + '_ {
        self.geometries
            .iter()
            .filter(move |(_, g)| g.source() == GeometrySource::CloneOf(origin))
            .map(|(key, _)| key)
    }

    /// Key that owns the arrays and buffers of `key` (itself for an origin)
    pub fn resolve_origin(&self, key: GeometryKey) -> Option<GeometryKey> {
        match self.geometries.get(key)?.source() {
            GeometrySource::Origin => Some(key),
            GeometrySource::CloneOf(origin) => Some(origin),
        }
    }

    /// Create a clone aliasing `source`'s arrays.
    ///
    /// Cloning a clone aliases the same origin, so clone chains never form.
    ///
    /// # Errors
    ///
    /// `InvalidResource` for an unknown key, `MissingData` when the source
    /// has no vertices or no indices.
    pub fn create_clone(&mut self, source: GeometryKey, name: impl Into<String>) -> Result<GeometryKey> {
        let Some(origin_key) = self.resolve_origin(source) else {
            engine_bail!("arbor3d::GeometryStore", InvalidResource => "Unknown geometry {:?}", source);
        };
        let origin = self.geometries.get(origin_key).ok_or_else(|| {
            engine_err!("arbor3d::GeometryStore", InvalidResource => "Unknown geometry {:?}", origin_key)
        })?;
        if !origin.is_drawable() {
            engine_bail!("arbor3d::GeometryStore", MissingData =>
                "Can not clone {} with no vertices or indices", origin.name());
        }
        let clone = GeometryBuffer::new_clone(name, origin_key, origin);
        Ok(self.geometries.insert(clone))
    }

    /// Remove a geometry no longer referenced by any node.
    ///
    /// An origin that still has clones stays in the store (its clones need
    /// its handles); the call then returns None. Allocated buffers are not
    /// deleted here, free them first while the context is valid.
    pub fn release(&mut self, key: GeometryKey) -> Option<GeometryBuffer> {
        let geometry = self.geometries.get(key)?;
        if !geometry.is_clone() && self.clones_of(key).next().is_some() {
            return None;
        }
        if geometry.is_allocated() && !geometry.is_clone() {
            engine_warn!("arbor3d::GeometryStore",
                "Releasing {} while its buffers are still allocated", geometry.name());
        }
        self.geometries.remove(key)
    }

    // ===== MODEL BOUND =====

    /// Re-derive the model bound of `key` from its vertices if dirty.
    ///
    /// A clone updates and reports its origin's bound.
    pub fn update_model_bound(&mut self, key: GeometryKey) -> Option<BoundingBox> {
        let origin = self.resolve_origin(key)?;
        let bound = self.geometries.get_mut(origin)?.refresh_model_bound();
        if origin != key {
            if let Some(clone) = self.geometries.get_mut(key) {
                clone.sync_model_bound(bound);
            }
        }
        Some(bound)
    }

    /// Current model bound of `key`, resolved through the origin
    pub fn model_bound(&self, key: GeometryKey) -> Option<BoundingBox> {
        let origin = self.resolve_origin(key)?;
        self.geometries.get(origin).map(GeometryBuffer::model_bound)
    }

    // ===== BUFFER LIFECYCLE =====

    /// Make `key` allocated.
    ///
    /// An origin generates and uploads its own buffers (no-op when already
    /// allocated). A clone first makes its origin allocate, then copies the
    /// origin's handles.
    pub fn generate(&mut self, key: GeometryKey, device: &mut dyn GraphicsDevice) -> Result<()> {
        let Some(origin_key) = self.resolve_origin(key) else {
            engine_bail!("arbor3d::GeometryStore", InvalidResource => "Unknown geometry {:?}", key);
        };
        let origin = self.geometries.get_mut(origin_key).ok_or_else(|| {
            engine_err!("arbor3d::GeometryStore", InvalidResource => "Clone {:?} lost its origin", key)
        })?;
        origin.generate_owned(device)?;

        if origin_key != key {
            let handles = *origin.handles();
            if let Some(clone) = self.geometries.get_mut(key) {
                clone.borrow_handles(handles);
            }
        }
        Ok(())
    }

    /// Release device buffers.
    ///
    /// An origin deletes its buffers; a clone asks its origin to delete
    /// them, then forgets locally. Either way, every clone of the origin
    /// loses the copied handles as well.
    pub fn free(&mut self, key: GeometryKey, device: &mut dyn GraphicsDevice) -> Result<()> {
        let Some(origin_key) = self.resolve_origin(key) else {
            engine_bail!("arbor3d::GeometryStore", InvalidResource => "Unknown geometry {:?}", key);
        };
        let result = match self.geometries.get_mut(origin_key) {
            Some(origin) => origin.free_owned(device),
            None => Ok(()),
        };
        self.forget_clones_of(origin_key);
        result
    }

    /// Clear handle references without delete calls (context loss).
    ///
    /// A clone forwards to its origin before clearing its own references.
    pub fn forget(&mut self, key: GeometryKey) {
        let Some(origin_key) = self.resolve_origin(key) else {
            return;
        };
        if let Some(origin) = self.geometries.get_mut(origin_key) {
            origin.forget_handles();
        }
        self.forget_clones_of(origin_key);
    }

    /// Forget every handle in the store
    pub fn forget_all(&mut self) {
        for (_, geometry) in self.geometries.iter_mut() {
            geometry.forget_handles();
        }
    }

    fn forget_clones_of(&mut self, origin: GeometryKey) {
        for (_, geometry) in self.geometries.iter_mut() {
            if geometry.source() == GeometrySource::CloneOf(origin) {
                geometry.forget_handles();
            }
        }
    }
}

#[cfg(test)]
#[path = "geometry_store_tests.rs"]
mod tests;
