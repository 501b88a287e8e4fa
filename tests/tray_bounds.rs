use bevy::prelude::*;
use fortune_dice::plugins::faces::DIE_RADIUS;
use fortune_dice::plugins::roll::RollConfig;
use fortune_dice::plugins::tray::{tray_colliders, TrayDef, TrayPart};

fn count(def: &TrayDef, part: TrayPart) -> usize {
    tray_colliders(def).iter().filter(|c| c.part == part).count()
}

#[test]
fn default_tray_layout() {
    let def = TrayDef::default();
    assert_eq!(tray_colliders(&def).len(), 72);
    assert_eq!(count(&def, TrayPart::Floor), 1);
    assert_eq!(count(&def, TrayPart::Rim), 64);
    assert_eq!(count(&def, TrayPart::Containment), 4);
    assert_eq!(count(&def, TrayPart::Underfloor), 1);
    assert_eq!(count(&def, TrayPart::Ceiling), 1);
    assert_eq!(count(&def, TrayPart::BackupFloor), 1);
}

#[test]
fn rim_segments_run_along_the_rim() {
    let def = TrayDef::default();
    for c in tray_colliders(&def).iter().filter(|c| c.part == TrayPart::Rim) {
        let radial = Vec3::new(c.center.x, 0.0, c.center.z);
        assert!((radial.length() - def.radius()).abs() < 1e-4);
        let long_axis = c.rotation * Vec3::X;
        assert!(long_axis.dot(radial.normalize()).abs() < 1e-4, "segment not tangent at {:?}", c.center);
    }
}

#[test]
fn ceiling_and_backup_floor_bracket_the_play_volume() {
    let def = TrayDef::default();
    let cfg = RollConfig::default();
    let colliders = tray_colliders(&def);
    let ceiling = colliders.iter().find(|c| c.part == TrayPart::Ceiling).expect("ceiling");
    let backup = colliders.iter().find(|c| c.part == TrayPart::BackupFloor).expect("backup");
    let spawn = cfg.spawn();
    assert!(ceiling.center.y - ceiling.half_extents.y > spawn.y + DIE_RADIUS);
    assert!(backup.center.y + backup.half_extents.y < def.floor_top());
    // The backup floor extends past the recovery limit.
    assert!(backup.half_extents.x > cfg.lateral_limit);
}

#[test]
fn containment_sits_inside_the_recovery_limit() {
    let def = TrayDef::default();
    let cfg = RollConfig::default();
    for c in tray_colliders(&def).iter().filter(|c| c.part == TrayPart::Containment) {
        let reach = c.center.x.abs().max(c.center.z.abs());
        assert!(reach < cfg.lateral_limit);
        assert!(reach > def.radius());
    }
}

#[test]
fn spawn_is_above_floor_and_inside_rim() {
    let def = TrayDef::default();
    let spawn = RollConfig::default().spawn();
    assert!(spawn.y - DIE_RADIUS > def.floor_top() - 1e-3);
    assert!(Vec2::new(spawn.x, spawn.z).length() + DIE_RADIUS < def.radius());
}

#[test]
fn colliders_share_surface_material() {
    let def = TrayDef { friction: 0.5, restitution: 0.2, ..TrayDef::default() };
    assert!(tray_colliders(&def).iter().all(|c| c.friction == 0.5 && c.restitution == 0.2));
}
