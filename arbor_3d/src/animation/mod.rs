//! Keyframe animation
//!
//! A `Timeline` is an ordered list of `KeyFrame`s attached to a scene node.
//! Each update advances elapsed time, finds the bracketing pair of frames,
//! and interpolates the node's local translation between them.

mod key_frame;
mod interpolator;
mod timeline;

pub use key_frame::KeyFrame;
pub use interpolator::{
    Interpolator, Linear, Accelerate, Decelerate, AccelerateDecelerate,
};
pub use timeline::{Timeline, AnimationListener};
