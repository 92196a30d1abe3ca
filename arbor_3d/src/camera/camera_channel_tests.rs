//! Unit tests for camera_channel.rs

use super::*;
use crate::camera::Camera;
use crate::error::Error;
use std::thread;

#[test]
fn test_commands_queue_until_drained() {
    let (sender, receiver) = camera_channel();
    sender.send(CameraCommand::SetIdentity).unwrap();
    sender.translate(Vec3::X).unwrap();
    assert_eq!(receiver.pending(), 2);

    let drained: Vec<CameraCommand> = receiver.drain().collect();
    assert_eq!(drained, vec![CameraCommand::SetIdentity, CameraCommand::Translate(Vec3::X)]);
    assert_eq!(receiver.pending(), 0);
}

#[test]
fn test_senders_on_other_threads() {
    let (sender, receiver) = camera_channel();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let sender = sender.clone();
            thread::spawn(move || sender.translate(Vec3::X).unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut camera = Camera::new();
    assert_eq!(camera.apply_commands(&receiver), 4);
    assert_eq!(camera.position(), Vec3::new(4.0, 0.0, 0.0));
}

#[test]
fn test_send_after_receiver_dropped() {
    let (sender, receiver) = camera_channel();
    drop(receiver);
    let result = sender.look_at(Vec3::Z, Vec3::ZERO, Vec3::Y);
    assert!(matches!(result, Err(Error::BackendError(_))));
}
