/// Camera - view matrix, eye position and perspective projection.
///
/// The view matrix is always `rotation · translate(-position)`; every
/// operation below keeps that decomposition, so moving the eye never
/// disturbs the orientation and vice versa.
///
/// Screen coordinates used for picking have their origin at the top-left
/// corner with y pointing down.

use glam::{Mat4, Vec3, Vec4};
use crate::error::Result;
use crate::{engine_bail, engine_warn};
use crate::intersection::Ray;
use super::camera_channel::{CameraCommand, CameraReceiver};

// ===== PROJECTION =====

/// Symmetric perspective frustum (OpenGL clip conventions)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view, degrees
    pub fovy: f32,
    /// Screen width in pixels
    pub width: f32,
    /// Screen height in pixels
    pub height: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Projection {
    /// # Errors
    ///
    /// `InvalidInput` for a non-positive screen size, a field of view
    /// outside (0, 180) or a depth range not satisfying `0 < near < far`.
    pub fn new(fovy: f32, width: f32, height: f32, z_near: f32, z_far: f32) -> Result<Self> {
        if !(width > 0.0 && height > 0.0) {
            engine_bail!("arbor3d::Camera", InvalidInput =>
                "Invalid screen size {}x{}", width, height);
        }
        if !(fovy > 0.0 && fovy < 180.0) {
            engine_bail!("arbor3d::Camera", InvalidInput => "Invalid field of view {}", fovy);
        }
        if !(z_near > 0.0 && z_far > z_near) {
            engine_bail!("arbor3d::Camera", InvalidInput =>
                "Invalid depth range [{}, {}]", z_near, z_far);
        }
        Ok(Self { fovy, width, height, z_near, z_far })
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Half the height of the near plane
    pub fn near_half_height(&self) -> f32 {
        self.z_near * (self.fovy.to_radians() / 2.0).tan()
    }

    /// Column-major projection matrix mapping depth to [-1, 1]
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fovy.to_radians(), self.aspect(), self.z_near, self.z_far)
    }
}

// ===== CAMERA =====

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    view_matrix: Mat4,
    position: Vec3,
    projection: Option<Projection>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Camera at the origin looking down -Z, without projection
    pub fn new() -> Self {
        Self {
            view_matrix: Mat4::IDENTITY,
            position: Vec3::ZERO,
            projection: None,
        }
    }

    // ===== PROJECTION =====

    pub fn set_perspective(&mut self, fovy: f32, width: f32, height: f32, z_near: f32, z_far: f32) -> Result<()> {
        self.projection = Some(Projection::new(fovy, width, height, z_near, z_far)?);
        Ok(())
    }

    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = Some(projection);
    }

    pub fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    /// Projection matrix, identity until a perspective is set
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection.map_or(Mat4::IDENTITY, |p| p.matrix())
    }

    // ===== VIEW =====

    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Replace the whole view matrix
    pub fn set_view_matrix(&mut self, matrix: Mat4) {
        self.view_matrix = matrix;
    }

    /// Replace the view matrix from 16 column-major floats
    pub fn set_view_matrix_slice(&mut self, values: &[f32]) -> Result<()> {
        if values.len() != 16 {
            engine_bail!("arbor3d::Camera", InvalidInput =>
                "Invalid view matrix length (Expected: 16, Found: {})", values.len());
        }
        self.view_matrix = Mat4::from_cols_slice(values);
        Ok(())
    }

    /// Replace the orientation, keeping the current eye position
    pub fn set_rotation_view_matrix(&mut self, rotation: Mat4) {
        self.view_matrix = rotation * Mat4::from_translation(-self.position);
    }

    /// Orient the camera at `eye` towards `center`.
    ///
    /// A degenerate request (eye on center, or `up` parallel to the view
    /// direction) leaves the camera untouched.
    pub fn look_at(&mut self, eye: Vec3, center: Vec3, up: Vec3) {
        let forward = center - eye;
        if forward.length_squared() == 0.0 || forward.cross(up).length_squared() == 0.0 {
            engine_warn!("arbor3d::Camera",
                "Degenerate look_at (eye {:?}, center {:?}, up {:?})", eye, center, up);
            return;
        }
        self.view_matrix = Mat4::look_at_rh(eye, center, up);
        self.position = eye;
    }

    /// Move the eye by `delta` in world space
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
        self.view_matrix *= Mat4::from_translation(-delta);
    }

    /// Move the eye to `position` in world space
    pub fn set_position(&mut self, position: Vec3) {
        self.translate(position - self.position);
    }

    /// Back to the origin looking down -Z
    pub fn set_identity(&mut self) {
        self.view_matrix = Mat4::IDENTITY;
        self.position = Vec3::ZERO;
    }

    // ===== PICKING =====

    /// World-space ray through screen point (`x`, `y`).
    ///
    /// The ray starts at the eye and its direction is normalized, so pick
    /// distances are world units. Returns None without a projection.
    pub fn calculate_pick_ray(&self, x: f32, y: f32) -> Option<Ray> {
        let Some(projection) = self.projection else {
            engine_warn!("arbor3d::Camera", "Pick ray requested before a projection was set");
            return None;
        };
        let half_width = projection.width / 2.0;
        let half_height = projection.height / 2.0;
        let unit_x = (x - half_width) / half_width;
        let unit_y = ((projection.height - y) - half_height) / half_height;

        let near_half_height = projection.near_half_height();
        let eye_direction = Vec4::new(
            unit_x * near_half_height * projection.aspect(),
            unit_y * near_half_height,
            -projection.z_near,
            0.0,
        );

        let inverse = self.view_matrix.inverse();
        let origin = inverse * Vec4::W;
        let direction = (inverse * eye_direction).truncate().try_normalize()?;
        Some(Ray::new(origin.truncate(), direction))
    }

    // ===== COMMANDS =====

    pub fn apply(&mut self, command: CameraCommand) {
        match command {
            CameraCommand::SetViewMatrix(matrix) => self.set_view_matrix(matrix),
            CameraCommand::SetRotationViewMatrix(rotation) => self.set_rotation_view_matrix(rotation),
            CameraCommand::LookAt { eye, center, up } => self.look_at(eye, center, up),
            CameraCommand::Translate(delta) => self.translate(delta),
            CameraCommand::SetPosition(position) => self.set_position(position),
            CameraCommand::SetIdentity => self.set_identity(),
            CameraCommand::SetProjection(projection) => self.set_projection(projection),
        }
    }

    /// Apply every queued command in send order; returns how many ran
    pub fn apply_commands(&mut self, receiver: &CameraReceiver) -> usize {
        let mut applied = 0;
        for command in receiver.drain() {
            self.apply(command);
            applied += 1;
        }
        applied
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
