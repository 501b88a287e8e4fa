// Die entity: rapier body, rapier-backed `DieBody` adapter and the system that
// drives `RollLifecycle` each frame and republishes its events.
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::render_asset::RenderAssetUsages;
use bevy_rapier3d::prelude::*;

use crate::plugins::faces::{
    icosahedron_triangles, icosahedron_vertices, DieFaceMarkers, FaceNormals, DIE_RADIUS, FALLBACK_FACE,
};
use crate::plugins::level::LevelDef;
use crate::plugins::roll::{DieBody, RollEvent, RollLifecycle, SettleCause};

#[derive(Component)]
pub struct Die;

/// Ask for a new roll (button, key, or script).
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct RequestRoll;

/// Pointer gesture on the die, in window pixels.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum DiePointer {
    Down(Vec2),
    Move(Vec2),
    Up(Vec2),
    Cancel,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopFaceChanged {
    pub face: u8,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DiceThrown {
    pub roll_id: u64,
    pub impulse: Vec3,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceSettled {
    pub roll_id: u64,
    pub face: u8,
    pub cause: SettleCause,
}

#[derive(Debug, Clone, Copy)]
pub struct DieBodyDef {
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl Default for DieBodyDef {
    fn default() -> Self {
        Self { linear_damping: 0.2, angular_damping: 0.4, friction: 1.0, restitution: 0.08 }
    }
}

/// `DieBody` over the rapier components of the die entity.
pub struct RapierDieBody<'w> {
    transform: Mut<'w, Transform>,
    velocity: Mut<'w, Velocity>,
    impulse: Mut<'w, ExternalImpulse>,
    locked: Mut<'w, LockedAxes>,
    sleeping: Mut<'w, Sleeping>,
}

impl DieBody for RapierDieBody<'_> {
    fn translation(&self) -> Vec3 {
        self.transform.translation
    }

    fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    fn linear_velocity(&self) -> Vec3 {
        self.velocity.linvel
    }

    fn angular_velocity(&self) -> Vec3 {
        self.velocity.angvel
    }

    fn set_pose(&mut self, translation: Vec3, rotation: Quat) {
        self.transform.translation = translation;
        self.transform.rotation = rotation;
        self.sleeping.sleeping = false;
    }

    fn set_linear_velocity(&mut self, linvel: Vec3) {
        self.velocity.linvel = linvel;
    }

    fn set_angular_velocity(&mut self, angvel: Vec3) {
        self.velocity.angvel = angvel;
    }

    // ExternalImpulse is cleared after every physics step, so accumulate.
    fn apply_impulse(&mut self, impulse: Vec3) {
        self.impulse.impulse += impulse;
        self.sleeping.sleeping = false;
    }

    fn apply_torque_impulse(&mut self, torque: Vec3) {
        self.impulse.torque_impulse += torque;
        self.sleeping.sleeping = false;
    }

    fn lock_translation(&mut self, locked: bool) {
        *self.locked = if locked { LockedAxes::TRANSLATION_LOCKED } else { LockedAxes::empty() };
    }
}

type DieQuery<'w, 's> = Query<
    'w,
    's,
    (Entity, &'static mut Transform, &'static mut Velocity, &'static mut ExternalImpulse, &'static mut LockedAxes, &'static mut Sleeping),
    With<Die>,
>;

/// Last observed sleep state and the roll the current motion belongs to.
#[derive(Resource, Debug, Default)]
pub struct SleepWatch {
    pub asleep: bool,
    pub motion_roll: u64,
}

pub struct DicePlugin;
impl Plugin for DicePlugin {
    fn build(&self, app: &mut App) {
        let config = app.world().get_resource::<LevelDef>().map(|l| l.roll).unwrap_or_default();
        if !app.world().contains_resource::<FaceNormals>() {
            let faces = match app.world().get_resource::<DieFaceMarkers>() {
                Some(markers) => FaceNormals::from_markers(&markers.0).unwrap_or_else(|e| {
                    warn!("FACES marker table rejected error={e}; top face falls back to {FALLBACK_FACE}");
                    FaceNormals::empty()
                }),
                None => FaceNormals::icosahedron(),
            };
            app.insert_resource(faces);
        }
        app.insert_resource(RollLifecycle::new(config))
            .init_resource::<SleepWatch>()
            .add_event::<RequestRoll>()
            .add_event::<DiePointer>()
            .add_event::<TopFaceChanged>()
            .add_event::<DiceThrown>()
            .add_event::<DiceSettled>()
            .add_systems(Startup, spawn_die)
            .add_systems(Update, drive_roll);
    }
}

fn spawn_die(
    mut commands: Commands,
    lifecycle: Res<RollLifecycle>,
    meshes: Option<ResMut<Assets<Mesh>>>,
    mats: Option<ResMut<Assets<StandardMaterial>>>,
) {
    let def = DieBodyDef::default();
    let vertices = icosahedron_vertices(DIE_RADIUS);
    let collider = Collider::convex_hull(&vertices).unwrap_or_else(|| {
        warn!("DIE convex hull failed; using ball collider");
        Collider::ball(DIE_RADIUS)
    });
    let mut die = commands.spawn((
        Die,
        Name::new("Die"),
        SpatialBundle::from_transform(Transform::from_translation(lifecycle.config().spawn())),
        RigidBody::Dynamic,
        collider,
        Velocity::zero(),
        ExternalImpulse::default(),
        LockedAxes::empty(),
        Sleeping::default(),
        Damping { linear_damping: def.linear_damping, angular_damping: def.angular_damping },
        Ccd::enabled(),
        Friction::coefficient(def.friction),
        Restitution::coefficient(def.restitution),
        ActiveEvents::COLLISION_EVENTS,
    ));
    // Headless apps have no mesh/material storage.
    if let (Some(mut meshes), Some(mut mats)) = (meshes, mats) {
        die.insert((
            meshes.add(die_mesh(&vertices)),
            mats.add(StandardMaterial {
                base_color: Color::srgb(0.93, 0.91, 0.86),
                perceptual_roughness: 0.45,
                ..default()
            }),
        ));
    }
    info!("DIE spawn radius={} faces={}", DIE_RADIUS, icosahedron_triangles().len());
}

/// Flat-shaded icosahedron, one vertex triple per face, outward winding.
pub fn die_mesh(vertices: &[Vec3]) -> Mesh {
    let mut positions = Vec::with_capacity(60);
    let mut normals = Vec::with_capacity(60);
    for tri in icosahedron_triangles() {
        let [mut a, b, mut c] = (*tri).map(|i| vertices[i]);
        let centroid = (a + b + c) / 3.0;
        if (b - a).cross(c - a).dot(centroid) < 0.0 {
            std::mem::swap(&mut a, &mut c);
        }
        let n = (b - a).cross(c - a).normalize_or_zero();
        for v in [a, b, c] {
            positions.push(v.to_array());
            normals.push(n.to_array());
        }
    }
    let uvs = vec![[0.0f32, 0.0]; positions.len()];
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh
}

fn body_sleeping(ctx: &RapierContext, entity: Entity) -> Option<bool> {
    let handle = ctx.entity2body().get(&entity)?;
    ctx.bodies.get(*handle).map(|b| b.is_sleeping())
}

#[allow(clippy::too_many_arguments)]
fn drive_roll(
    time: Res<Time>,
    faces: Res<FaceNormals>,
    rapier: Option<Res<RapierContext>>,
    mut lifecycle: ResMut<RollLifecycle>,
    mut watch: ResMut<SleepWatch>,
    mut q_die: DieQuery,
    mut ev_pointer: EventReader<DiePointer>,
    mut ev_request: EventReader<RequestRoll>,
    mut ev_face: EventWriter<TopFaceChanged>,
    mut ev_thrown: EventWriter<DiceThrown>,
    mut ev_settled: EventWriter<DiceSettled>,
) {
    let Ok((entity, transform, velocity, impulse, locked, sleeping)) = q_die.get_single_mut() else {
        ev_pointer.clear();
        ev_request.clear();
        return;
    };
    let mut body = RapierDieBody { transform, velocity, impulse, locked, sleeping };
    let mut rng = rand::thread_rng();

    // Physics sleep transitions, tagged with the roll whose motion put the body to sleep.
    if let Some(asleep) = rapier.as_deref().and_then(|ctx| body_sleeping(ctx, entity)) {
        if asleep && !watch.asleep {
            let tag = watch.motion_roll;
            lifecycle.notify_sleep(&mut body, &faces, tag);
        }
        watch.asleep = asleep;
    }

    for ev in ev_pointer.read() {
        match *ev {
            DiePointer::Down(pos) => {
                lifecycle.pointer_down(&mut body, pos);
            }
            DiePointer::Move(pos) => lifecycle.pointer_move(&mut body, &faces, pos),
            DiePointer::Up(pos) => {
                lifecycle.pointer_up(&mut body, &mut rng, pos);
            }
            DiePointer::Cancel => lifecycle.pointer_cancel(&mut body),
        }
    }
    for _ in ev_request.read() {
        lifecycle.request_roll(&mut body, &mut rng);
    }

    lifecycle.frame(time.delta_seconds(), &mut body, &faces);

    for ev in lifecycle.drain_events() {
        match ev {
            RollEvent::TopFaceChanged(face) => {
                ev_face.send(TopFaceChanged { face });
            }
            RollEvent::Thrown { roll_id, impulse } => {
                watch.motion_roll = roll_id;
                watch.asleep = false;
                ev_thrown.send(DiceThrown { roll_id, impulse });
            }
            RollEvent::Settled { roll_id, face, cause } => {
                ev_settled.send(DiceSettled { roll_id, face, cause });
            }
        }
    }
}
