//! Integration tests for the scene graph frame cycle
//!
//! These tests drive a whole scene the way an application does: build the
//! tree, upload buffers to a headless device, animate, pick through the
//! camera, survive a context loss, and reload a mesh from its binary form.
//! No GPU required.
//!
//! Run with: cargo test --test scene_integration_tests

use arbor_3d::arbor3d::animation::{KeyFrame, Timeline, AccelerateDecelerate};
use arbor_3d::arbor3d::camera::{Camera, camera_channel};
use arbor_3d::arbor3d::graphics_device::{GraphicsDevice, HeadlessGraphicsDevice};
use arbor_3d::arbor3d::resource::{GeometryBuffer, export_geometry, import_geometry};
use arbor_3d::arbor3d::scene::{Light, NodeKey, SceneGraph, StatsDrawer};
use arbor_3d::glam::Vec3;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

// ============================================================================
// HELPERS
// ============================================================================

fn quad(name: &str) -> GeometryBuffer {
    let mut quad = GeometryBuffer::with_data(
        name,
        &[-1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 1.0, 1.0, 0.0, -1.0, 1.0, 0.0],
        &[0, 1, 2, 0, 2, 3],
    ).unwrap();
    quad.set_normals(&[0.0f32, 0.0, 1.0].repeat(4)).unwrap();
    quad.set_solid_color([200, 10, 10, 255]).unwrap();
    quad
}

/// Light → group → {left, right (clone of left)}, camera at z = 10
fn build_scene() -> (SceneGraph, NodeKey, NodeKey, Camera) {
    let mut graph = SceneGraph::new();
    let light = graph.create_light("light", Light::default());
    graph.attach_child(graph.root(), light).unwrap();
    let group = graph.create_container("group");
    graph.attach_child(light, group).unwrap();

    let left = graph.create_geometry("left", quad("left"));
    graph.node_mut(left).unwrap().set_local_translation(Vec3::new(-3.0, 0.0, 0.0));
    graph.attach_child(group, left).unwrap();

    let right = graph.clone_mesh(left, "right").unwrap();
    graph.node_mut(right).unwrap().set_local_translation(Vec3::new(3.0, 0.0, 0.0));
    graph.attach_child(group, right).unwrap();

    let root = graph.root();
    graph.update_transform(root);
    graph.update_world_bound(root, false);

    let mut camera = Camera::new();
    camera.set_perspective(60.0, 800.0, 600.0, 0.1, 100.0).unwrap();
    camera.look_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);

    (graph, left, right, camera)
}

// ============================================================================
// FRAME CYCLE
// ============================================================================

#[test]
fn test_integration_frame_cycle() {
    let (mut graph, left, right, mut camera) = build_scene();
    let mut device = HeadlessGraphicsDevice::new();
    graph.generate_buffers(&mut device).unwrap();

    // Vertex, normal, color, index of the origin; the clone shares them
    assert_eq!(device.stats().live_buffers, 4);

    let finished = Arc::new(Mutex::new(Vec::new()));
    let sink = finished.clone();
    let mut timeline = Timeline::with_frames([
        KeyFrame::new(1000.0).with_translation(Vec3::new(-3.0, 4.0, 0.0)),
    ]);
    timeline.set_interpolator(AccelerateDecelerate);
    timeline.set_listener(move |_: &Timeline, node: NodeKey| sink.lock().unwrap().push(node));
    graph.add_timeline(left, timeline).unwrap();

    let (sender, receiver) = camera_channel();
    let mut drawer = StatsDrawer::new();
    for frame in 0..60 {
        if frame == 30 {
            sender.translate(Vec3::new(0.0, 0.0, 5.0)).unwrap();
        }
        camera.apply_commands(&receiver);
        graph.update(1000.0 / 30.0);
        let root = graph.root();
        graph.update_transform(root);
        graph.update_world_bound(root, false);
        graph.draw(&mut drawer);
    }

    let stats = drawer.take_stats();
    assert_eq!(stats.draw_calls, 120);
    assert_eq!(stats.triangles, 240);
    assert_eq!(stats.lights, 60);

    assert_eq!(*finished.lock().unwrap(), vec![left]);
    assert_eq!(graph.node(left).unwrap().local_translation(), Some(Vec3::new(-3.0, 4.0, 0.0)));
    assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 15.0));

    // Screen center now misses both quads; the right quad is still to the right
    assert!(!graph.pick(&camera.calculate_pick_ray(400.0, 300.0).unwrap()).has_result());
    let ray = camera.calculate_pick_ray(400.0 + 3.0 / 15.0 * 300.0 / (30f32).to_radians().tan(), 300.0).unwrap();
    assert_eq!(graph.pick(&ray).closest(), Some(right));

    graph.free_buffers(&mut device).unwrap();
    assert_eq!(device.stats().live_buffers, 0);
}

#[test]
fn test_integration_pick_through_camera() {
    let (graph, left, right, camera) = build_scene();

    // Screen x of world x = ±3 at depth 10 with a 60° fov on 800x600
    let pixels_per_unit = 300.0 / (10.0 * (30f32).to_radians().tan());
    let left_ray = camera.calculate_pick_ray(400.0 - 3.0 * pixels_per_unit, 300.0).unwrap();
    let right_ray = camera.calculate_pick_ray(400.0 + 3.0 * pixels_per_unit, 300.0).unwrap();

    let hit = graph.pick(&left_ray);
    assert_eq!(hit.closest(), Some(left));
    assert!((hit.distance().unwrap() - (9.0f32 + 100.0).sqrt()).abs() < 1e-2);
    assert_eq!(graph.pick(&right_ray).closest(), Some(right));
    assert!(!graph.pick(&camera.calculate_pick_ray(400.0, 300.0).unwrap()).has_result());
}

#[test]
fn test_integration_context_loss_recovery() {
    let (mut graph, left, right, _camera) = build_scene();
    let mut device = HeadlessGraphicsDevice::new();
    graph.generate_buffers(&mut device).unwrap();
    let stale = *graph.geometry_of(left).unwrap().handles();

    device.lose_context();
    graph.forget_buffers();
    assert!(!graph.geometry_of(right).unwrap().is_allocated());

    graph.generate_buffers(&mut device).unwrap();
    let fresh = *graph.geometry_of(left).unwrap().handles();
    assert_ne!(fresh.vertex, stale.vertex);
    assert!(device.is_live(fresh.vertex));
    assert_eq!(*graph.geometry_of(right).unwrap().handles(), fresh);
    assert_eq!(device.stats().live_buffers, 4);

    // Deleting stale names is rejected by the device
    assert!(device.delete_buffer(stale.vertex).is_err());
}

#[test]
fn test_integration_mesh_reload() {
    let (mut graph, left, _right, _camera) = build_scene();

    let mut bytes = Vec::new();
    export_geometry(graph.geometry_of(left).unwrap(), &mut bytes).unwrap();
    let reloaded = import_geometry(&mut Cursor::new(bytes), "reloaded").unwrap();

    assert_eq!(reloaded.vertices(), graph.geometry_of(left).unwrap().vertices());
    assert_eq!(reloaded.indices(), graph.geometry_of(left).unwrap().indices());

    let node = graph.create_geometry("reloaded", reloaded);
    graph.attach_child(graph.root(), node).unwrap();
    let mut device = HeadlessGraphicsDevice::new();
    graph.generate_node_buffers(node, &mut device).unwrap();
    assert!(graph.geometry_of(node).unwrap().is_allocated());

    graph.remove_node(node).unwrap();
    assert_eq!(graph.find_by_name("reloaded"), None);
}
