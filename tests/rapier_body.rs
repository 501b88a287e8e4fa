use std::time::Duration;

use bevy::hierarchy::HierarchyPlugin;
use bevy::prelude::*;
use bevy::scene::SceneSpawner;
use bevy::time::TimeUpdateStrategy;
use bevy::transform::TransformPlugin;
use bevy_rapier3d::prelude::*;
use fortune_dice::prelude::*;

#[derive(Resource, Default)]
struct Settles(Vec<DiceSettled>);

fn record(mut settles: ResMut<Settles>, mut ev_settled: EventReader<DiceSettled>) {
    settles.0.extend(ev_settled.read().copied());
}

// Real rapier world with the tray; the settle timer is pushed out of reach so
// only the physics sleep notification can end a roll.
fn physics_app() -> App {
    let level = LevelDef {
        roll: RollConfig { settle_duration: 1.0e6, ..Default::default() },
        ..Default::default()
    };
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, TransformPlugin, HierarchyPlugin))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(1.0 / 60.0)))
        // Needed by rapier's async collider systems.
        .init_resource::<Assets<Mesh>>()
        .init_resource::<SceneSpawner>()
        .insert_resource(level)
        .add_plugins((RapierPhysicsPlugin::<NoUserData>::default(), TrayPlugin, DicePlugin))
        .init_resource::<Settles>()
        .add_systems(Last, record);
    app.update(); // Startup: tray, die
    app
}

fn die_entity(app: &mut App) -> Entity {
    app.world_mut().query_filtered::<Entity, With<Die>>().single(app.world())
}

fn rapier_sleeping(app: &App, die: Entity) -> bool {
    let ctx = app.world().resource::<RapierContext>();
    let handle = ctx.entity2body().get(&die).expect("die has a rapier body");
    ctx.bodies.get(*handle).expect("body").is_sleeping()
}

fn run_until_settled(app: &mut App, max_frames: usize) {
    let before = app.world().resource::<Settles>().0.len();
    for _ in 0..max_frames {
        app.update();
        if app.world().resource::<Settles>().0.len() > before {
            return;
        }
    }
}

#[test]
fn roll_writes_impulse_and_unlocks_axes() {
    let mut app = physics_app();
    let die = die_entity(&mut app);

    app.world_mut().send_event(RequestRoll);
    // Update only: rapier consumes the impulse in PostUpdate.
    app.world_mut().run_schedule(Update);

    let impulse = app.world().get::<ExternalImpulse>(die).expect("impulse");
    assert!(impulse.impulse.length() > 1.0, "horizontal + upward impulse written");
    assert!(impulse.torque_impulse != Vec3::ZERO);
    assert_eq!(*app.world().get::<LockedAxes>(die).expect("axes"), LockedAxes::empty());
    assert!(!app.world().get::<Sleeping>(die).expect("sleeping").sleeping);

    app.update();
    let impulse = app.world().get::<ExternalImpulse>(die).expect("impulse");
    assert_eq!(impulse.impulse, Vec3::ZERO, "rapier applied and cleared the impulse");
    assert!(app.world().get::<Velocity>(die).expect("velocity").linvel.length() > 0.1);
}

#[test]
fn grab_locks_translation_and_cancel_releases_it() {
    let mut app = physics_app();
    let die = die_entity(&mut app);

    app.world_mut().send_event(DiePointer::Down(Vec2::new(300.0, 300.0)));
    app.update();
    assert_eq!(*app.world().get::<LockedAxes>(die).expect("axes"), LockedAxes::TRANSLATION_LOCKED);
    assert!(app.world().resource::<RollLifecycle>().is_dragging());

    app.world_mut().send_event(DiePointer::Cancel);
    app.update();
    assert_eq!(*app.world().get::<LockedAxes>(die).expect("axes"), LockedAxes::empty());
    assert_eq!(app.world().resource::<RollLifecycle>().phase(), RollPhase::Idle);
}

#[test]
fn physics_sleep_settles_the_roll_once() {
    let mut app = physics_app();
    let die = die_entity(&mut app);

    app.world_mut().send_event(RequestRoll);
    run_until_settled(&mut app, 60 * 30);
    assert!(rapier_sleeping(&app, die));

    // Keep stepping the sleeping body: no second settle for the same roll.
    for _ in 0..30 {
        app.update();
    }
    let settles = &app.world().resource::<Settles>().0;
    assert_eq!(settles.len(), 1);
    assert_eq!(settles[0].roll_id, 1);
    assert_eq!(settles[0].cause, SettleCause::Sleep);
    assert!((1..=20).contains(&settles[0].face));
    assert_eq!(app.world().resource::<RollLifecycle>().phase(), RollPhase::Settled);
}

#[test]
fn next_roll_wakes_the_body_and_is_tagged_with_its_own_id() {
    let mut app = physics_app();
    let die = die_entity(&mut app);

    app.world_mut().send_event(RequestRoll);
    run_until_settled(&mut app, 60 * 30);
    assert!(app.world().get::<Sleeping>(die).expect("sleeping").sleeping);

    app.world_mut().send_event(RequestRoll);
    app.update();
    assert!(!app.world().get::<Sleeping>(die).expect("sleeping").sleeping, "set_pose wakes the body");
    assert!(!rapier_sleeping(&app, die));
    assert_eq!(app.world().resource::<Settles>().0.len(), 1, "the wake is not mistaken for a settle");

    run_until_settled(&mut app, 60 * 30);
    let settles = &app.world().resource::<Settles>().0;
    assert_eq!(settles.iter().map(|s| s.roll_id).collect::<Vec<_>>(), vec![1, 2]);
    assert!(settles.iter().all(|s| s.cause == SettleCause::Sleep));
}
