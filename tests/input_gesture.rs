use bevy::prelude::*;
use fortune_dice::plugins::die::DiePointer;
use fortune_dice::plugins::input::{PointerGesture, PointerId};

#[test]
fn press_off_the_die_starts_nothing() {
    let mut g = PointerGesture::default();
    assert_eq!(g.press(PointerId::Mouse, Vec2::new(10.0, 10.0), false), None);
    assert_eq!(g.moved(PointerId::Mouse, Vec2::new(30.0, 10.0)), None);
    assert_eq!(g.release(PointerId::Mouse, Some(Vec2::ZERO)), None);
}

#[test]
fn press_move_release_sequence() {
    let mut g = PointerGesture::default();
    let start = Vec2::new(100.0, 80.0);
    assert_eq!(g.press(PointerId::Mouse, start, true), Some(DiePointer::Down(start)));
    assert!(g.is_active());
    // Unchanged position is not a move.
    assert_eq!(g.moved(PointerId::Mouse, start), None);
    assert_eq!(g.moved(PointerId::Mouse, Vec2::new(120.0, 80.0)), Some(DiePointer::Move(Vec2::new(120.0, 80.0))));
    // Cursor lost: release at the last known position.
    assert_eq!(g.release(PointerId::Mouse, None), Some(DiePointer::Up(Vec2::new(120.0, 80.0))));
    assert!(!g.is_active());
}

#[test]
fn second_pointer_is_ignored_while_one_is_active() {
    let mut g = PointerGesture::default();
    g.press(PointerId::Touch(1), Vec2::ZERO, true);
    assert_eq!(g.press(PointerId::Touch(2), Vec2::ONE, true), None);
    assert_eq!(g.moved(PointerId::Touch(2), Vec2::new(5.0, 5.0)), None);
    assert_eq!(g.cancel(PointerId::Touch(2)), None);
    assert_eq!(g.cancel(PointerId::Touch(1)), Some(DiePointer::Cancel));
}

#[test]
fn audio_unlock_fires_on_first_gesture_only() {
    let mut g = PointerGesture::default();
    assert!(g.first_gesture());
    assert!(!g.first_gesture());
    assert!(!g.first_gesture());
}
