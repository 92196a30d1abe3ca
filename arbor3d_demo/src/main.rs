//! Headless Arbor3D demo
//!
//! Builds a small scene, animates it for a few seconds of simulated time,
//! steers the camera from a separate input thread, picks through the screen
//! center, survives a simulated context loss, and reloads a mesh from its
//! binary form. Everything runs against the in-memory graphics device.

use std::io::Cursor;
use std::thread;
use std::time::Duration;
use arbor_3d::arbor3d::{Engine, Result};
use arbor_3d::arbor3d::log::LogSeverity;
use arbor_3d::arbor3d::animation::{KeyFrame, Timeline, Decelerate};
use arbor_3d::arbor3d::camera::{Camera, camera_channel};
use arbor_3d::arbor3d::graphics_device::{GraphicsDevice, HeadlessGraphicsDevice};
use arbor_3d::arbor3d::intersection::BoundingBox;
use arbor_3d::arbor3d::resource::{GeometryBuffer, export_geometry, import_geometry};
use arbor_3d::arbor3d::scene::{Light, NodeKey, SceneGraph, StatsDrawer};
use glam::{Vec3, Vec4};

const FRAME_TIME_MS: f32 = 1000.0 / 60.0;
const FRAME_COUNT: u32 = 240;
const SCREEN_WIDTH: f32 = 1280.0;
const SCREEN_HEIGHT: f32 = 720.0;

fn log(message: String) {
    Engine::log(LogSeverity::Info, "arbor3d_demo", message);
}

fn cube(name: &str) -> Result<GeometryBuffer> {
    let vertices: [f32; 24] = [
        -0.5, -0.5, -0.5,   0.5, -0.5, -0.5,   0.5, 0.5, -0.5,   -0.5, 0.5, -0.5,
        -0.5, -0.5, 0.5,    0.5, -0.5, 0.5,    0.5, 0.5, 0.5,    -0.5, 0.5, 0.5,
    ];
    let indices: [u16; 36] = [
        0, 2, 1, 0, 3, 2,   4, 5, 6, 4, 6, 7,
        0, 1, 5, 0, 5, 4,   3, 6, 2, 3, 7, 6,
        0, 4, 7, 0, 7, 3,   1, 2, 6, 1, 6, 5,
    ];
    let mut cube = GeometryBuffer::with_data(name, &vertices, &indices)?;
    cube.set_solid_color_f32([0.2, 0.6, 1.0, 1.0])?;
    Ok(cube)
}

/// Sun → row of cubes (one origin, clones for the rest) plus a pick box
fn build_scene(graph: &mut SceneGraph) -> Result<NodeKey> {
    let sun = graph.create_light("sun", Light {
        position: Vec4::new(1.0, 1.0, 1.0, 0.0),
        ..Light::default()
    });
    graph.attach_child(graph.root(), sun)?;

    let row = graph.create_container("row");
    graph.attach_child(sun, row)?;

    let first = graph.create_geometry("cube 0", cube("cube 0")?);
    if let Some(node) = graph.node_mut(first) {
        node.set_local_translation(Vec3::new(-4.0, 0.0, 0.0));
    }
    graph.attach_child(row, first)?;
    for i in 1..5 {
        let clone = graph.clone_mesh(first, format!("cube {}", i))?;
        if let Some(node) = graph.node_mut(clone) {
            node.set_local_translation(Vec3::new(-4.0 + 2.0 * i as f32, 0.0, 0.0));
            node.set_local_rotation(15.0 * i as f32, Vec3::Y);
        }
        graph.attach_child(row, clone)?;
    }

    let marker = graph.create_pick_box("marker",
        BoundingBox::from_values(-0.25, -0.25, -0.25, 0.25, 0.25, 0.25));
    if let Some(node) = graph.node_mut(marker) {
        node.set_local_translation(Vec3::new(0.0, 3.0, 0.0));
    }
    graph.attach_child(graph.root(), marker)?;

    let mut bounce = Timeline::with_frames([
        KeyFrame::new(1000.0).with_translation(Vec3::new(0.0, 2.0, 0.0)),
        KeyFrame::new(2000.0).with_translation(Vec3::ZERO),
    ]);
    bounce.set_interpolator(Decelerate(1.5));
    bounce.set_listener(|_: &Timeline, node: NodeKey| log(format!("Bounce of {:?} finished", node)));
    graph.add_timeline(row, bounce)?;

    Ok(row)
}

fn main() -> Result<()> {
    Engine::initialize()?;

    let mut graph = SceneGraph::new();
    let row = build_scene(&mut graph)?;

    let mut camera = Camera::new();
    camera.set_perspective(60.0, SCREEN_WIDTH, SCREEN_HEIGHT, 0.1, 100.0)?;
    camera.look_at(Vec3::new(0.0, 1.0, 12.0), Vec3::ZERO, Vec3::Y);

    let mut device = HeadlessGraphicsDevice::new();
    graph.generate_buffers(&mut device)?;
    log(format!("Uploaded {} buffers ({} bytes)",
        device.stats().live_buffers, device.stats().uploaded_bytes));

    // Input thread: dolly the camera in, a step at a time
    let (sender, receiver) = camera_channel();
    let input = thread::spawn(move || {
        for _ in 0..(FRAME_COUNT / 20) {
            if sender.translate(Vec3::new(0.0, 0.0, -0.5)).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(2));
        }
    });

    let mut drawer = StatsDrawer::new();
    let mut camera_steps = 0;
    for frame in 0..FRAME_COUNT {
        camera_steps += camera.apply_commands(&receiver);

        graph.update(FRAME_TIME_MS);
        let root = graph.root();
        graph.update_transform(root);
        graph.update_world_bound(root, false);
        graph.draw(&mut drawer);

        if frame == FRAME_COUNT / 2 {
            device.lose_context();
            graph.forget_buffers();
            graph.generate_buffers(&mut device)?;
            log(format!("Context {} restored", device.context_generation()));
        }

        if frame % 60 == 0 {
            let stats = drawer.take_stats();
            let picked = camera
                .calculate_pick_ray(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0)
                .map(|ray| graph.pick(&ray))
                .unwrap_or_default();
            let name = picked.closest()
                .and_then(|key| graph.node(key))
                .map_or("nothing", |n| n.name());
            log(format!("Frame {}: {} draws, {} triangles, center picks {} (row at {:?})",
                frame, stats.draw_calls, stats.triangles, name,
                graph.node(row).and_then(|n| n.local_translation())));
        }
    }
    if input.join().is_err() {
        Engine::log(LogSeverity::Error, "arbor3d_demo", "Camera input thread panicked".to_string());
    }
    camera_steps += camera.apply_commands(&receiver);
    log(format!("Camera ended at {:?} after {} steps", camera.position(), camera_steps));

    // Mesh round trip through the binary format
    let mut bytes = Vec::new();
    if let Some(first) = graph.find_by_name("cube 0").and_then(|key| graph.geometry_of(key)) {
        export_geometry(first, &mut bytes)?;
    }
    let reloaded = import_geometry(&mut Cursor::new(bytes), "reloaded")?;
    log(format!("Reloaded mesh with {} vertices", reloaded.vertex_count()));

    graph.free_buffers(&mut device)?;
    let stats = device.stats();
    log(format!("Shutdown: {} live buffers, {} generated, {} deleted",
        stats.live_buffers, stats.generated, stats.deleted));
    Ok(())
}
