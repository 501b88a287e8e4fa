// Tray collision geometry: floor, segmented circular rim, containment box,
// under-floor / ceiling slabs and a wide backup floor. Passive, fixed body.
use std::f32::consts::{FRAC_PI_2, TAU};

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use serde::Deserialize;

use crate::plugins::level::LevelDef;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct TrayDef {
    pub scale: f32,
    pub position_y: f32,
    pub rim_segments: u32,
    pub rim_radius: f32, // unscaled
    pub rim_height: f32, // unscaled centre height above the tray origin
    pub friction: f32,
    pub restitution: f32,
    pub containment_y: f32,
    pub underfloor_y: f32,
    pub ceiling_y: f32,
    pub backup_floor_y: f32,
    pub backup_floor_half_extent: f32,
}

impl Default for TrayDef {
    fn default() -> Self {
        Self {
            scale: 2.2,
            position_y: -0.05,
            rim_segments: 64,
            rim_radius: 1.14,
            rim_height: 0.8,
            friction: 0.95,
            restitution: 0.06,
            containment_y: 1.0,
            underfloor_y: -0.65,
            ceiling_y: 2.65,
            backup_floor_y: -3.0,
            backup_floor_half_extent: 20.0,
        }
    }
}

impl TrayDef {
    /// Rendered radius of the tray rim in world units.
    pub fn radius(&self) -> f32 {
        self.rim_radius * self.scale
    }

    /// World height of the floor's top surface.
    pub fn floor_top(&self) -> f32 {
        self.position_y + (FLOOR_OFFSET_Y + FLOOR_HALF.y) * self.scale
    }
}

const FLOOR_HALF: Vec3 = Vec3::new(1.05, 0.03, 1.05);
const FLOOR_OFFSET_Y: f32 = 0.06;
const RIM_HALF: Vec3 = Vec3::new(0.14, 1.2, 0.12);
const CONTAINMENT_OFFSET: f32 = 1.82;
const CONTAINMENT_HALF_THICKNESS: f32 = 0.12;
const CONTAINMENT_HALF_HEIGHT: f32 = 1.6;
const CONTAINMENT_HALF_SPAN: f32 = 1.75;
const SLAB_HALF_THICKNESS: f32 = 0.12;
const BACKUP_FLOOR_HALF_THICKNESS: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayPart {
    Floor,
    Rim,
    Containment,
    Underfloor,
    Ceiling,
    BackupFloor,
}

/// One cuboid of the tray, in world space.
#[derive(Debug, Clone, Copy)]
pub struct TrayCollider {
    pub part: TrayPart,
    pub center: Vec3,
    pub rotation: Quat,
    pub half_extents: Vec3,
    pub friction: f32,
    pub restitution: f32,
}

#[derive(Component)]
pub struct Tray;

pub struct TrayPlugin;
impl Plugin for TrayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_tray);
    }
}

/// Layout of every tray collider.
pub fn tray_colliders(def: &TrayDef) -> Vec<TrayCollider> {
    let s = def.scale;
    let origin = Vec3::new(0.0, def.position_y, 0.0);
    let segments = def.rim_segments.max(3);
    let mut out = Vec::with_capacity(segments as usize + 8);
    let mut push = |part, center, rotation, half_extents| {
        out.push(TrayCollider { part, center, rotation, half_extents, friction: def.friction, restitution: def.restitution });
    };

    push(TrayPart::Floor, origin + Vec3::Y * FLOOR_OFFSET_Y * s, Quat::IDENTITY, FLOOR_HALF * s);

    // Rim segments: local X runs along the rim tangent.
    let radius = def.radius();
    for i in 0..segments {
        let angle = i as f32 / segments as f32 * TAU;
        let center = origin + Vec3::new(angle.cos() * radius, def.rim_height * s, angle.sin() * radius);
        push(TrayPart::Rim, center, Quat::from_rotation_y(FRAC_PI_2 - angle), RIM_HALF * s);
    }

    let offset = CONTAINMENT_OFFSET * s;
    let span = CONTAINMENT_HALF_SPAN * s;
    let x_wall = Vec3::new(CONTAINMENT_HALF_THICKNESS, CONTAINMENT_HALF_HEIGHT, span);
    let z_wall = Vec3::new(span, CONTAINMENT_HALF_HEIGHT, CONTAINMENT_HALF_THICKNESS);
    for sign in [-1.0, 1.0] {
        push(TrayPart::Containment, Vec3::new(sign * offset, def.containment_y, 0.0), Quat::IDENTITY, x_wall);
        push(TrayPart::Containment, Vec3::new(0.0, def.containment_y, sign * offset), Quat::IDENTITY, z_wall);
    }

    let slab = Vec3::new(span, SLAB_HALF_THICKNESS, span);
    push(TrayPart::Underfloor, Vec3::new(0.0, def.underfloor_y, 0.0), Quat::IDENTITY, slab);
    push(TrayPart::Ceiling, Vec3::new(0.0, def.ceiling_y, 0.0), Quat::IDENTITY, slab);

    let backup = def.backup_floor_half_extent;
    push(
        TrayPart::BackupFloor,
        Vec3::new(0.0, def.backup_floor_y, 0.0),
        Quat::IDENTITY,
        Vec3::new(backup, BACKUP_FLOOR_HALF_THICKNESS, backup),
    );
    out
}

fn spawn_tray(mut commands: Commands, level: Option<Res<LevelDef>>) {
    let def = level.map(|l| l.tray).unwrap_or_default();
    let colliders = tray_colliders(&def);
    info!("TRAY spawn colliders={} radius={:.2}", colliders.len(), def.radius());
    commands
        .spawn((Tray, RigidBody::Fixed, TransformBundle::default(), Name::new("Tray")))
        .with_children(|parent| {
            for c in colliders {
                parent.spawn((
                    Collider::cuboid(c.half_extents.x, c.half_extents.y, c.half_extents.z),
                    Friction::coefficient(c.friction),
                    Restitution::coefficient(c.restitution),
                    TransformBundle::from_transform(Transform::from_translation(c.center).with_rotation(c.rotation)),
                ));
            }
        });
}
