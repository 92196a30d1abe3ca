//! Unit tests for pick_result.rs

use super::*;
use slotmap::SlotMap;

fn keys(count: usize) -> Vec<NodeKey> {
    let mut map = SlotMap::<NodeKey, ()>::with_key();
    (0..count).map(|_| map.insert(())).collect()
}

#[test]
fn test_pick_result_starts_empty() {
    let result = PickResult::new();
    assert!(!result.has_result());
    assert_eq!(result.closest(), None);
    assert_eq!(result.distance(), None);
    assert_eq!(format!("{}", result), "empty");
}

#[test]
fn test_pick_result_keeps_closest() {
    let k = keys(3);
    let mut result = PickResult::new();
    assert!(result.add(k[0], 5.0));
    assert!(result.add(k[1], 2.0));
    assert!(!result.add(k[2], 8.0));

    assert_eq!(result.closest(), Some(k[1]));
    assert_eq!(result.distance(), Some(2.0));
}

#[test]
fn test_pick_result_tie_keeps_first_seen() {
    let k = keys(2);
    let mut result = PickResult::new();
    result.add(k[0], 3.0);
    assert!(!result.add(k[1], 3.0));
    assert_eq!(result.closest(), Some(k[0]));
}

#[test]
fn test_pick_result_clear() {
    let k = keys(1);
    let mut result = PickResult::new();
    result.add(k[0], 1.0);
    result.clear();
    assert!(!result.has_result());
}

#[test]
fn test_pick_result_display_with_hit() {
    let k = keys(1);
    let mut result = PickResult::new();
    result.add(k[0], 1.5);
    assert!(format!("{}", result).ends_with("at distance 1.5"));
}
