/// A time-stamped set of optional local transform values.
///
/// Frames are ordered and compared by time only. Only the translation is
/// interpolated by `Timeline`; rotation and scale are carried but unused.

use std::cmp::Ordering;
use glam::Vec3;
use crate::error::Result;
use crate::{engine_bail, engine_warn};
use crate::scene::Rotation;

#[derive(Debug, Clone, Copy)]
pub struct KeyFrame {
    time: f32,
    translation: Option<Vec3>,
    rotation: Option<Rotation>,
    scale: Option<Vec3>,
}

impl KeyFrame {
    /// Create an empty frame at `time`.
    ///
    /// Negative (or NaN) times are clamped to zero; `-0.0` becomes `0.0`.
    pub fn new(time: f32) -> Self {
        let time = if time >= 0.0 {
            time + 0.0
        } else {
            engine_warn!("arbor3d::KeyFrame", "Got a negative time stamp ({}), setting it to zero", time);
            0.0
        };
        Self { time, translation: None, rotation: None, scale: None }
    }

    /// Builder form of `set_translation`
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = Some(translation);
        self
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn translation(&self) -> Option<Vec3> {
        self.translation
    }

    pub fn rotation(&self) -> Option<Rotation> {
        self.rotation
    }

    pub fn scale(&self) -> Option<Vec3> {
        self.scale
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = Some(translation);
    }

    /// `[x, y, z]`; any other length is rejected
    pub fn set_translation_slice(&mut self, translation: &[f32]) -> Result<()> {
        self.translation = Some(vec3_from_slice("translation", translation)?);
        Ok(())
    }

    pub fn clear_translation(&mut self) {
        self.translation = None;
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = Some(rotation);
    }

    /// `[angle_degrees, x, y, z]`; any other length is rejected
    pub fn set_rotation_slice(&mut self, rotation: &[f32]) -> Result<()> {
        self.rotation = Some(Rotation::from_slice(rotation)?);
        Ok(())
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = Some(scale);
    }

    /// `[x, y, z]`; any other length is rejected
    pub fn set_scale_slice(&mut self, scale: &[f32]) -> Result<()> {
        self.scale = Some(vec3_from_slice("scale", scale)?);
        Ok(())
    }
}

pub(crate) fn vec3_from_slice(what: &str, values: &[f32]) -> Result<Vec3> {
    if values.len() != 3 {
        engine_bail!("arbor3d::KeyFrame", InvalidInput =>
            "Invalid {} array length (Expected: 3, Found: {})", what, values.len());
    }
    Ok(Vec3::from_slice(values))
}

impl PartialEq for KeyFrame {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time
    }
}

impl PartialOrd for KeyFrame {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.time.partial_cmp(&other.time)
    }
}

#[cfg(test)]
#[path = "key_frame_tests.rs"]
mod tests;
