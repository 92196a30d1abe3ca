/// Timeline - keyframe sequence driving a node's local translation.
///
/// # States
///
/// ```text
/// unprepared ──prepare──▶ running ──elapsed ≥ last frame──▶ finished
///      ▲                    ▲                                   │
///      │ add/remove frame   └───────────── reset ◀──────────────┘
/// ```
///
/// Frames are kept strictly ascending by time. A frame added at an existing
/// time replaces the old one. Preparation guarantees a frame at time 0 and a
/// translation on every frame.

use std::fmt;
use glam::Vec3;
use crate::error::Result;
use crate::{engine_bail, engine_debug};
use crate::scene::NodeKey;
use super::interpolator::Interpolator;
use super::key_frame::KeyFrame;

// ===== LISTENER =====

/// Completion callback, invoked once per run when a timeline finishes
pub trait AnimationListener: Send {
    fn on_animation_end(&mut self, timeline: &Timeline, node: NodeKey);
}

impl<F> AnimationListener for F
where
    F: FnMut(&Timeline, NodeKey) + Send,
{
    fn on_animation_end(&mut self, timeline: &Timeline, node: NodeKey) {
        self(timeline, node)
    }
}

// ===== TIMELINE =====

#[derive(Default)]
pub struct Timeline {
    frames: Vec<KeyFrame>,
    elapsed: f32,
    cur_index: usize,
    next_index: usize,
    running: bool,
    prepared: bool,
    finished: bool,
    interpolator: Option<Box<dyn Interpolator>>,
    listener: Option<Box<dyn AnimationListener>>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a timeline from frames in any order
    pub fn with_frames(frames: impl IntoIterator<Item = KeyFrame>) -> Self {
        let mut timeline = Self::new();
        for frame in frames {
            timeline.add_frame(frame);
        }
        timeline
    }

    // ===== FRAMES =====

    /// Insert a frame, keeping ascending order.
    ///
    /// Appends in O(1) when `frame` is later than every existing frame.
    /// Un-prepares the timeline.
    pub fn add_frame(&mut self, frame: KeyFrame) {
        match self.frames.last() {
            Some(last) if frame.time() <= last.time() => {
                match self.frames.binary_search_by(|f| f.time().total_cmp(&frame.time())) {
                    Ok(index) => self.frames[index] = frame,
                    Err(index) => self.frames.insert(index, frame),
                }
            }
            _ => self.frames.push(frame),
        }
        self.unprepare();
    }

    /// Remove the frame at `time`, if any. Un-prepares the timeline.
    pub fn remove_frame(&mut self, time: f32) -> Option<KeyFrame> {
        let index = self.frames.iter().position(|f| f.time() == time)?;
        self.unprepare();
        Some(self.frames.remove(index))
    }

    pub fn frames(&self) -> &[KeyFrame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Time of the last frame (0 when empty)
    pub fn duration(&self) -> f32 {
        self.frames.last().map_or(0.0, KeyFrame::time)
    }

    fn unprepare(&mut self) {
        self.prepared = false;
        self.running = false;
        self.finished = false;
    }

    // ===== LIFECYCLE =====

    /// Make the timeline runnable against a node.
    ///
    /// Synthesizes a frame at time 0 from `start_translation` (zero when
    /// None) if the first frame is later, fills missing translations with
    /// zero, then resets.
    ///
    /// # Errors
    ///
    /// `IncompleteAnimation` when fewer than two frames would remain after
    /// synthesis; the timeline is left unchanged.
    pub fn prepare(&mut self, start_translation: Option<Vec3>) -> Result<()> {
        let needs_start = self.frames.first().is_some_and(|f| f.time() > 0.0);
        let effective = self.frames.len() + usize::from(needs_start);
        if effective < 2 {
            engine_bail!("arbor3d::Timeline", IncompleteAnimation =>
                "Animation is incomplete ({} usable frame(s))", effective);
        }

        if needs_start {
            let start = KeyFrame::new(0.0).with_translation(start_translation.unwrap_or(Vec3::ZERO));
            self.frames.insert(0, start);
        }
        for frame in self.frames.iter_mut() {
            if frame.translation().is_none() {
                frame.set_translation(Vec3::ZERO);
            }
        }

        self.prepared = true;
        self.reset();
        engine_debug!("arbor3d::Timeline", "Prepared {} frames over {}", self.frames.len(), self.duration());
        Ok(())
    }

    /// Rewind to time 0; a prepared timeline starts running again
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.cur_index = 0;
        self.next_index = 1;
        self.finished = false;
        self.running = self.prepared;
    }

    /// Force the finished state without notifying the listener
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.finished = true;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn set_interpolator(&mut self, interpolator: impl Interpolator + 'static) {
        self.interpolator = Some(Box::new(interpolator));
    }

    pub fn clear_interpolator(&mut self) {
        self.interpolator = None;
    }

    pub fn set_listener(&mut self, listener: impl AnimationListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    // ===== UPDATE =====

    /// Advance by `dt` and return the translation `node` should take.
    ///
    /// Returns None when not running. Once elapsed time reaches the last
    /// frame, returns that frame's translation, finishes, and notifies the
    /// listener.
    pub fn update(&mut self, dt: f32, node: NodeKey) -> Option<Vec3> {
        if !self.running {
            return None;
        }
        self.elapsed += dt.max(0.0);

        let last = self.frames.last()?;
        if self.elapsed >= last.time() {
            let translation = last.translation().unwrap_or(Vec3::ZERO);
            self.running = false;
            self.finished = true;
            if let Some(mut listener) = self.listener.take() {
                listener.on_animation_end(self, node);
                self.listener = Some(listener);
            }
            return Some(translation);
        }

        // elapsed < last time, so the bracket search stops before the end
        while self.frames.get(self.next_index).is_some_and(|f| self.elapsed > f.time()) {
            self.cur_index += 1;
            self.next_index += 1;
        }
        let cur = self.frames.get(self.cur_index)?;
        let next = self.frames.get(self.next_index)?;

        let mut ratio = (self.elapsed - cur.time()) / (next.time() - cur.time());
        if let Some(interpolator) = &self.interpolator {
            ratio = interpolator.interpolation(ratio);
        }
        let from = cur.translation().unwrap_or(Vec3::ZERO);
        let to = next.translation().unwrap_or(Vec3::ZERO);
        Some(from.lerp(to, ratio))
    }
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("frames", &self.frames)
            .field("elapsed", &self.elapsed)
            .field("cur_index", &self.cur_index)
            .field("running", &self.running)
            .field("prepared", &self.prepared)
            .field("finished", &self.finished)
            .field("has_interpolator", &self.interpolator.is_some())
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "timeline_tests.rs"]
mod tests;
