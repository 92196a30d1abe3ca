/// Camera command channel.
///
/// Input or control threads hold a `CameraSender` and never touch the
/// camera. The thread driving frames owns the `Camera` and the
/// `CameraReceiver`, and drains pending commands once per frame.

use glam::{Mat4, Vec3};
use crossbeam_channel::{unbounded, Receiver, Sender};
use crate::error::Result;
use crate::engine_bail;
use super::camera::Projection;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraCommand {
    SetViewMatrix(Mat4),
    SetRotationViewMatrix(Mat4),
    LookAt { eye: Vec3, center: Vec3, up: Vec3 },
    Translate(Vec3),
    SetPosition(Vec3),
    SetIdentity,
    SetProjection(Projection),
}

/// Cloneable sending half
#[derive(Debug, Clone)]
pub struct CameraSender {
    sender: Sender<CameraCommand>,
}

impl CameraSender {
    /// # Errors
    ///
    /// `BackendError` once the receiving half has been dropped.
    pub fn send(&self, command: CameraCommand) -> Result<()> {
        if self.sender.send(command).is_err() {
            engine_bail!("arbor3d::Camera", BackendError =>
                "Camera receiver dropped, {:?} discarded", command);
        }
        Ok(())
    }

    pub fn look_at(&self, eye: Vec3, center: Vec3, up: Vec3) -> Result<()> {
        self.send(CameraCommand::LookAt { eye, center, up })
    }

    pub fn translate(&self, delta: Vec3) -> Result<()> {
        self.send(CameraCommand::Translate(delta))
    }

    pub fn set_position(&self, position: Vec3) -> Result<()> {
        self.send(CameraCommand::SetPosition(position))
    }

    pub fn set_rotation_view_matrix(&self, rotation: Mat4) -> Result<()> {
        self.send(CameraCommand::SetRotationViewMatrix(rotation))
    }
}

/// Receiving half, owned by the frame driver
#[derive(Debug)]
pub struct CameraReceiver {
    receiver: Receiver<CameraCommand>,
}

impl CameraReceiver {
    /// Commands queued so far, without blocking
    pub fn drain(&self) -> impl Iterator<Item = CameraCommand> + '_ {
        self.receiver.try_iter()
    }

    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}

pub fn camera_channel() -> (CameraSender, CameraReceiver) {
    let (sender, receiver) = unbounded();
    (CameraSender { sender }, CameraReceiver { receiver })
}

#[cfg(test)]
#[path = "camera_channel_tests.rs"]
mod tests;
