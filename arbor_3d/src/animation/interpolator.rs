/// Interpolation curves remapping the linear frame ratio.
///
/// Input is the fraction of time elapsed between two frames, in [0, 1].
/// Output is usually in [0, 1] as well but may overshoot.

use std::f32::consts::PI;

pub trait Interpolator: Send + Sync {
    fn interpolation(&self, ratio: f32) -> f32;
}

/// Any `Fn(f32) -> f32` closure is an interpolator
impl<F> Interpolator for F
where
    F: Fn(f32) -> f32 + Send + Sync,
{
    fn interpolation(&self, ratio: f32) -> f32 {
        self(ratio)
    }
}

/// Identity curve
#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

impl Interpolator for Linear {
    fn interpolation(&self, ratio: f32) -> f32 {
        ratio
    }
}

/// Starts slow, speeds up: `ratio^(2·factor)`
#[derive(Debug, Clone, Copy)]
pub struct Accelerate(pub f32);

impl Default for Accelerate {
    fn default() -> Self {
        Accelerate(1.0)
    }
}

impl Interpolator for Accelerate {
    fn interpolation(&self, ratio: f32) -> f32 {
        if self.0 == 1.0 {
            ratio * ratio
        } else {
            ratio.powf(2.0 * self.0)
        }
    }
}

/// Starts fast, slows down: `1 - (1 - ratio)^(2·factor)`
#[derive(Debug, Clone, Copy)]
pub struct Decelerate(pub f32);

impl Default for Decelerate {
    fn default() -> Self {
        Decelerate(1.0)
    }
}

impl Interpolator for Decelerate {
    fn interpolation(&self, ratio: f32) -> f32 {
        let inverse = 1.0 - ratio;
        if self.0 == 1.0 {
            1.0 - inverse * inverse
        } else {
            1.0 - inverse.powf(2.0 * self.0)
        }
    }
}

/// Cosine ease-in/ease-out
#[derive(Debug, Clone, Copy, Default)]
pub struct AccelerateDecelerate;

impl Interpolator for AccelerateDecelerate {
    fn interpolation(&self, ratio: f32) -> f32 {
        ((ratio + 1.0) * PI).cos() / 2.0 + 0.5
    }
}

#[cfg(test)]
#[path = "interpolator_tests.rs"]
mod tests;
