use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use fortune_dice::prelude::*;

fn main() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let debug_colliders = std::env::args().any(|a| a == "--debug-colliders");
    let mut app = App::new();
    app.insert_resource(ClearColor(Color::srgb(0.08, 0.09, 0.12)))
        .insert_resource(Msaa::Sample4)
        .insert_resource(AmbientLight {
            color: Color::srgb(0.75, 0.75, 0.80),
            brightness: 350.0,
        })
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Fortune Dice".into(),
                fit_canvas_to_parent: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .add_plugins(LevelPlugin)       // level + content defs (must precede users)
        .add_plugins(CoreSimPlugin)     // fixed tick + telemetry
        .add_plugins(TrayPlugin)        // tray colliders
        .add_plugins(DicePlugin)        // die body + roll lifecycle
        .add_plugins(ScenePlugin)       // camera, lights, tray visual
        .add_plugins(DiceInputPlugin)   // pointer / keyboard gestures
        .add_plugins(AcousticsPlugin)   // contact -> sound decisions
        .add_plugins(DiceAudioPlugin)   // synthesized playback
        .add_plugins(FortunePlugin)     // card draw on settle
        .add_plugins(HudPlugin);
    if debug_colliders {
        app.add_plugins(RapierDebugRenderPlugin::default());
    }
    app.run();
}
