use bevy::prelude::*;
use fortune_dice::plugins::acoustics::{AcousticsDef, CollisionAcousticTrigger, SoundKind};

fn trigger() -> CollisionAcousticTrigger {
    CollisionAcousticTrigger::new(AcousticsDef::default())
}

#[test]
fn slow_contacts_are_silent() {
    let mut t = trigger();
    assert!(t.on_contact(1.0, Vec3::new(0.0, -0.2, 0.1), true, false).is_none());
}

#[test]
fn fast_contact_plays_once_then_cooldown() {
    let mut t = trigger();
    let v = Vec3::new(0.5, -2.0, 0.0);
    let first = t.on_contact(1.0, v, true, false).expect("sound");
    assert!(first.volume > 0.15 && first.volume <= 0.70 + 1e-6);
    // 20 ms later: inside the 55 ms window.
    assert!(t.on_contact(1.020, v, true, false).is_none());
    // 60 ms after the first: allowed again.
    assert!(t.on_contact(1.060, v, true, false).is_some());
}

#[test]
fn gated_by_rolling_and_dragging() {
    let mut t = trigger();
    let v = Vec3::new(0.0, -3.0, 0.0);
    assert!(t.on_contact(1.0, v, false, false).is_none());
    assert!(t.on_contact(2.0, v, true, true).is_none());
    assert!(t.on_contact(3.0, v, true, false).is_some());
}

#[test]
fn suppressed_contacts_do_not_start_the_cooldown() {
    let mut t = trigger();
    assert!(t.on_contact(1.0, Vec3::new(0.0, -3.0, 0.0), false, false).is_none());
    assert!(t.on_contact(1.01, Vec3::new(0.0, -3.0, 0.0), true, false).is_some());
}

#[test]
fn contact_classification() {
    let t = trigger();
    assert_eq!(t.classify(Vec3::new(3.0, -0.5, 0.0)), SoundKind::Scrape);
    assert_eq!(t.classify(Vec3::new(0.4, -2.0, 0.3)), SoundKind::Bounce);
    assert_eq!(t.classify(Vec3::new(1.0, -1.0, 0.0)), SoundKind::Hit);
}

#[test]
fn loudness_scales_with_speed_and_clamps() {
    let mut t = trigger();
    let soft = t.on_contact(1.0, Vec3::new(0.0, -1.0, 0.0), true, false).expect("soft");
    let hard = t.on_contact(2.0, Vec3::new(0.0, -4.0, 0.0), true, false).expect("hard");
    let huge = t.on_contact(3.0, Vec3::new(0.0, -40.0, 0.0), true, false).expect("huge");
    assert!(soft.volume < hard.volume);
    assert!((huge.intensity - 1.0).abs() < 1e-6);
    assert!((huge.volume - 0.70).abs() < 1e-5);
}

#[test]
fn lifecycle_sounds_bypass_cooldown() {
    let mut t = trigger();
    t.on_contact(1.0, Vec3::new(0.0, -3.0, 0.0), true, false).expect("contact");
    let throw = t.on_throw(Vec3::new(2.0, 1.0, 0.0), 2.0);
    assert_eq!(throw.kind, SoundKind::Throw);
    assert!((throw.intensity - 1.0).abs() < 1e-6);
    let settled = t.on_settled();
    assert_eq!(settled.kind, SoundKind::Settled);
    assert!(settled.volume > 0.0);
}
