//! Unit tests for geometry_store.rs
//!
//! Covers clone creation and the generate / forget / free lifecycle,
//! including the handle sharing between an origin and its clones.

use super::*;
use crate::error::Error;
use crate::graphics_device::{GraphicsDevice, HeadlessGraphicsDevice};
use crate::resource::DrawMode;
use glam::Vec3;

fn triangle() -> GeometryBuffer {
    GeometryBuffer::with_data(
        "triangle",
        &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        &[0, 1, 2],
    ).unwrap()
}

fn store_with_clone() -> (GeometryStore, GeometryKey, GeometryKey) {
    let mut store = GeometryStore::new();
    let origin = store.insert(triangle());
    let clone = store.create_clone(origin, "triangle-clone").unwrap();
    (store, origin, clone)
}

// ============================================================================
// CLONES
// ============================================================================

#[test]
fn test_clone_aliases_origin_arrays() {
    let (store, origin, clone) = store_with_clone();
    let o = store.get(origin).unwrap();
    let c = store.get(clone).unwrap();

    assert!(c.is_clone());
    assert_eq!(c.origin(), Some(origin));
    assert_eq!(c.vertices(), o.vertices());
    assert_eq!(c.indices(), o.indices());
    assert_eq!(c.vertices().unwrap().as_ptr(), o.vertices().unwrap().as_ptr());
    assert_eq!(store.clones_of(origin).collect::<Vec<_>>(), vec![clone]);
}

#[test]
fn test_clone_of_clone_aliases_origin() {
    let (mut store, origin, clone) = store_with_clone();
    let second = store.create_clone(clone, "second").unwrap();
    assert_eq!(store.get(second).unwrap().origin(), Some(origin));
}

#[test]
fn test_clone_requires_vertices_and_indices() {
    let mut store = GeometryStore::new();
    let empty = store.insert(GeometryBuffer::new("empty"));
    assert!(matches!(store.create_clone(empty, "x"), Err(Error::MissingData(_))));
}

#[test]
fn test_clone_rejects_mutation() {
    let (mut store, _, clone) = store_with_clone();
    let c = store.get_mut(clone).unwrap();
    assert!(matches!(c.set_vertices(&[0.0; 3]), Err(Error::InvalidResource(_))));
    assert!(matches!(c.set_draw_mode(DrawMode::TriangleFan), Err(Error::InvalidResource(_))));
}

#[test]
fn test_clone_model_bound_resolves_through_origin() {
    let (mut store, origin, clone) = store_with_clone();
    let bound = store.update_model_bound(clone).unwrap();
    assert_eq!(bound.max, Vec3::new(1.0, 1.0, 0.0));
    assert!(!store.get(origin).unwrap().has_dirty_model_bound());
    assert_eq!(store.model_bound(clone), store.model_bound(origin));
}

// ============================================================================
// LIFECYCLE
// ============================================================================

#[test]
fn test_clone_generate_allocates_origin_only() {
    let (mut store, origin, clone) = store_with_clone();
    let mut device = HeadlessGraphicsDevice::new();

    store.generate(clone, &mut device).unwrap();

    let origin_handles = *store.get(origin).unwrap().handles();
    let clone_handles = *store.get(clone).unwrap().handles();
    assert!(origin_handles.is_allocated());
    assert_eq!(origin_handles, clone_handles);
    // Vertex + index for the origin, nothing for the clone
    assert_eq!(device.stats().generated, 2);
}

#[test]
fn test_forget_then_generate_reallocates() {
    let mut store = GeometryStore::new();
    let key = store.insert(triangle());
    let mut device = HeadlessGraphicsDevice::new();

    store.generate(key, &mut device).unwrap();
    let before = *store.get(key).unwrap().handles();

    device.lose_context();
    store.forget(key);
    assert!(!store.get(key).unwrap().is_allocated());

    store.generate(key, &mut device).unwrap();
    let after = *store.get(key).unwrap().handles();
    assert!(after.is_allocated());
    assert_ne!(before.vertex, after.vertex);
    assert!(device.is_live(after.vertex));
    assert_eq!(device.stats().deleted, 0);
}

#[test]
fn test_clone_forget_forwards_to_origin() {
    let (mut store, origin, clone) = store_with_clone();
    let mut device = HeadlessGraphicsDevice::new();
    store.generate(clone, &mut device).unwrap();

    store.forget(clone);
    assert!(!store.get(origin).unwrap().is_allocated());
    assert!(!store.get(clone).unwrap().is_allocated());
}

#[test]
fn test_clone_free_deletes_origin_buffers() {
    let (mut store, origin, clone) = store_with_clone();
    let mut device = HeadlessGraphicsDevice::new();
    store.generate(clone, &mut device).unwrap();

    store.free(clone, &mut device).unwrap();
    assert!(!store.get(origin).unwrap().is_allocated());
    assert!(!store.get(clone).unwrap().is_allocated());
    assert_eq!(device.stats().deleted, 2);
    assert_eq!(device.stats().live_buffers, 0);
}

#[test]
fn test_origin_free_clears_clone_handles() {
    let (mut store, origin, clone) = store_with_clone();
    let mut device = HeadlessGraphicsDevice::new();
    store.generate(clone, &mut device).unwrap();

    store.free(origin, &mut device).unwrap();
    assert!(!store.get(clone).unwrap().is_allocated());

    // Freeing again is a no-op, no delete of a stale handle
    store.free(clone, &mut device).unwrap();
    assert_eq!(device.stats().deleted, 2);
}

#[test]
fn test_generate_unknown_key_fails() {
    let mut store = GeometryStore::new();
    let key = store.insert(triangle());
    store.release(key);
    let mut device = HeadlessGraphicsDevice::new();
    assert!(matches!(store.generate(key, &mut device), Err(Error::InvalidResource(_))));
}

#[test]
fn test_release_keeps_origin_with_clones() {
    let (mut store, origin, clone) = store_with_clone();
    assert!(store.release(origin).is_none());
    assert!(store.contains(origin));

    assert!(store.release(clone).is_some());
    assert!(store.release(origin).is_some());
    assert!(store.is_empty());
}
