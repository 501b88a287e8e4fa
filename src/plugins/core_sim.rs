use bevy::prelude::*;
use bevy::time::Fixed;
use bevy_rapier3d::prelude::Velocity;

use crate::plugins::die::Die;
use crate::plugins::roll::RollLifecycle;

// Fixed 60 Hz simulation clock + once-per-second die telemetry.
pub const TICK_HZ: f64 = 60.0;

#[derive(Resource, Default, Debug)]
pub struct SimState {
    pub tick: u64,
    pub elapsed_seconds: f32,
}
impl SimState {
    pub fn advance_fixed(&mut self) {
        self.tick += 1;
        self.elapsed_seconds = self.tick as f32 / TICK_HZ as f32;
    }
}

#[derive(Resource, Default)]
pub struct LogState {
    pub last_logged_second: u64,
}

pub struct CoreSimPlugin;
impl Plugin for CoreSimPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SimState::default())
            .insert_resource(LogState::default())
            .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
            .add_systems(FixedUpdate, tick_state)
            .add_systems(Update, log_die_telemetry);
    }
}

fn tick_state(mut sim: ResMut<SimState>) {
    sim.advance_fixed();
}

fn log_die_telemetry(
    sim: Res<SimState>,
    mut log: ResMut<LogState>,
    lifecycle: Option<Res<RollLifecycle>>,
    q_die: Query<(&Transform, &Velocity), With<Die>>,
) {
    let second = sim.elapsed_seconds as u64;
    if second <= log.last_logged_second {
        return;
    }
    log.last_logged_second = second;
    let (Ok((t, v)), Some(lifecycle)) = (q_die.get_single(), lifecycle) else { return; };
    debug!(
        "DIE t={} pos=({:.2},{:.2},{:.2}) linvel={:.3} angvel={:.3} phase={:?} roll={} settle_timer={:.2}",
        second,
        t.translation.x,
        t.translation.y,
        t.translation.z,
        v.linvel.length(),
        v.angvel.length(),
        lifecycle.phase(),
        lifecycle.roll_id(),
        lifecycle.settle_timer()
    );
}
