// Static scene: dice camera, lights and the visible tray (floor disc + rim ring).
use bevy::prelude::*;
use serde::Deserialize;

use crate::plugins::level::LevelDef;
use crate::plugins::tray::TrayDef;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct CameraDef {
    pub position: (f32, f32, f32),
    pub look_at: (f32, f32, f32),
    pub fov_degrees: f32,
}

impl Default for CameraDef {
    fn default() -> Self {
        Self { position: (0.0, 7.2, 7.2), look_at: (0.0, 0.0, 0.0), fov_degrees: 45.0 }
    }
}

impl CameraDef {
    pub fn transform(&self) -> Transform {
        let (x, y, z) = self.position;
        let (lx, ly, lz) = self.look_at;
        Transform::from_xyz(x, y, z).looking_at(Vec3::new(lx, ly, lz), Vec3::Y)
    }
}

#[derive(Component)]
pub struct DiceCamera;

#[derive(Component)]
pub struct TrayVisual;

pub struct ScenePlugin;
impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_camera, setup_tray_visual));
    }
}

fn setup_camera(mut commands: Commands, level: Option<Res<LevelDef>>) {
    let cam = level.map(|l| l.camera).unwrap_or_default();
    commands.spawn((
        Camera3dBundle {
            transform: cam.transform(),
            projection: PerspectiveProjection {
                fov: cam.fov_degrees.to_radians(),
                ..default()
            }
            .into(),
            ..default()
        },
        DiceCamera,
    ));

    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            illuminance: 9_000.0,
            shadows_enabled: true,
            ..default()
        },
        transform: Transform::from_xyz(3.0, 8.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });
    commands.spawn(PointLightBundle {
        point_light: PointLight {
            intensity: 120_000.0,
            range: 20.0,
            ..default()
        },
        transform: Transform::from_xyz(-3.0, 4.0, -2.0),
        ..default()
    });
}

fn setup_tray_visual(
    mut commands: Commands,
    level: Option<Res<LevelDef>>,
    meshes: Option<ResMut<Assets<Mesh>>>,
    mats: Option<ResMut<Assets<StandardMaterial>>>,
) {
    let (Some(mut meshes), Some(mut mats)) = (meshes, mats) else { return; };
    let tray: TrayDef = level.map(|l| l.tray).unwrap_or_default();
    let radius = tray.radius();
    let felt = mats.add(StandardMaterial {
        base_color: Color::srgb(0.10, 0.32, 0.22),
        perceptual_roughness: 0.95,
        ..default()
    });
    let wood = mats.add(StandardMaterial {
        base_color: Color::srgb(0.42, 0.26, 0.15),
        perceptual_roughness: 0.6,
        ..default()
    });
    let floor_thickness = 0.06 * tray.scale;
    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Cylinder::new(radius, floor_thickness)),
            material: felt,
            transform: Transform::from_xyz(0.0, tray.floor_top() - floor_thickness * 0.5, 0.0),
            ..default()
        },
        TrayVisual,
    ));
    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Torus::new(radius - 0.12, radius + 0.12)),
            material: wood,
            transform: Transform::from_xyz(0.0, tray.floor_top() + 0.08, 0.0),
            ..default()
        },
        TrayVisual,
    ));
}
