//! Unit tests for key_frame.rs

use super::*;
use crate::error::Error;

#[test]
fn test_negative_time_clamped_to_zero() {
    assert_eq!(KeyFrame::new(-5.0).time(), 0.0);
    assert_eq!(KeyFrame::new(f32::NAN).time(), 0.0);
    assert_eq!(KeyFrame::new(12.5).time(), 12.5);
}

#[test]
fn test_negative_zero_time_becomes_positive_zero() {
    let frame = KeyFrame::new(-0.0);
    assert!(frame.time().is_sign_positive());
    assert_eq!(frame.time().total_cmp(&0.0), std::cmp::Ordering::Equal);
}

#[test]
fn test_new_frame_is_empty() {
    let frame = KeyFrame::new(1.0);
    assert!(frame.translation().is_none());
    assert!(frame.rotation().is_none());
    assert!(frame.scale().is_none());
}

#[test]
fn test_equality_and_order_by_time_only() {
    let a = KeyFrame::new(10.0).with_translation(Vec3::X);
    let b = KeyFrame::new(10.0).with_translation(Vec3::Y);
    let c = KeyFrame::new(20.0);
    assert_eq!(a, b);
    assert!(a < c);
    assert!(c > b);
}

#[test]
fn test_slice_setters_reject_wrong_length() {
    let mut frame = KeyFrame::new(0.0);
    assert!(matches!(frame.set_translation_slice(&[1.0, 2.0]), Err(Error::InvalidInput(_))));
    assert!(frame.translation().is_none());

    assert!(matches!(frame.set_scale_slice(&[1.0; 4]), Err(Error::InvalidInput(_))));
    assert!(matches!(frame.set_rotation_slice(&[90.0, 0.0, 1.0]), Err(Error::InvalidInput(_))));
}

#[test]
fn test_slice_setters_accept_exact_length() {
    let mut frame = KeyFrame::new(0.0);
    frame.set_translation_slice(&[1.0, 2.0, 3.0]).unwrap();
    frame.set_scale_slice(&[2.0, 2.0, 2.0]).unwrap();
    frame.set_rotation_slice(&[90.0, 0.0, 1.0, 0.0]).unwrap();

    assert_eq!(frame.translation(), Some(Vec3::new(1.0, 2.0, 3.0)));
    assert_eq!(frame.scale(), Some(Vec3::splat(2.0)));
    assert_eq!(frame.rotation(), Some(Rotation::new(90.0, Vec3::Y)));

    frame.clear_translation();
    assert!(frame.translation().is_none());
}
