//! Camera module
//!
//! `Camera` owns the view matrix, eye position and perspective projection.
//! Other threads steer it through a `camera_channel()`; the render driver
//! applies queued commands once per frame.

mod camera;
mod camera_channel;

pub use camera::{Camera, Projection};
pub use camera_channel::{camera_channel, CameraCommand, CameraSender, CameraReceiver};
