/// Closest-hit accumulator for picking queries.
///
/// Keeps exactly one candidate: the smallest distance seen so far. On an
/// exact tie the stored candidate wins, since replacement requires
/// `distance < stored`.

use std::fmt;
use crate::scene::NodeKey;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PickResult {
    closest: Option<(NodeKey, f32)>,
}

impl PickResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a candidate. Returns true if it became the closest hit.
    pub fn add(&mut self, node: NodeKey, distance: f32) -> bool {
        match self.closest {
            Some((_, stored)) if distance >= stored => false,
            _ => {
                self.closest = Some((node, distance));
                true
            }
        }
    }

    /// Closest node, if any
    pub fn closest(&self) -> Option<NodeKey> {
        self.closest.map(|(node, _)| node)
    }

    /// Distance to the closest node, if any
    pub fn distance(&self) -> Option<f32> {
        self.closest.map(|(_, distance)| distance)
    }

    pub fn has_result(&self) -> bool {
        self.closest.is_some()
    }

    pub fn clear(&mut self) {
        self.closest = None;
    }
}

impl fmt::Display for PickResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.closest {
            Some((node, distance)) => write!(f, "{:?} at distance {}", node, distance),
            None => write!(f, "empty"),
        }
    }
}

#[cfg(test)]
#[path = "pick_result_tests.rs"]
mod tests;
