// Collision -> sound decisions. Gating, cooldown and contact classification live in
// `CollisionAcousticTrigger`; the systems only translate rapier / lifecycle events.
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use serde::Deserialize;

use crate::plugins::die::{Die, DiceSettled, DiceThrown};
use crate::plugins::level::LevelDef;
use crate::plugins::roll::{RollLifecycle, SettleCause};

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct AcousticsDef {
    pub min_relative_speed: f32,
    pub speed_span: f32,
    pub cooldown_ms: f32,
    pub base_volume: f32,
    pub volume_span: f32,
    pub master_gain: f32,
    pub scrape_ratio: f32,
    pub bounce_ratio: f32,
    pub settled_intensity: f32,
}

impl Default for AcousticsDef {
    fn default() -> Self {
        Self {
            min_relative_speed: 0.35,
            speed_span: 4.2,
            cooldown_ms: 55.0,
            base_volume: 0.15,
            volume_span: 0.55,
            master_gain: 0.55,
            scrape_ratio: 2.5,
            bounce_ratio: 1.5,
            settled_intensity: 0.35,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundKind {
    Hit,
    Bounce,
    Scrape,
    Throw,
    Settled,
}

/// A sound to synthesize: `intensity` in 0..=1 shapes the sound, `volume` is the output level.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DiceSound {
    pub kind: SoundKind,
    pub intensity: f32,
    pub volume: f32,
}

#[derive(Resource, Debug)]
pub struct CollisionAcousticTrigger {
    def: AcousticsDef,
    last_contact: Option<f64>,
}

impl Default for CollisionAcousticTrigger {
    fn default() -> Self {
        Self::new(AcousticsDef::default())
    }
}

impl CollisionAcousticTrigger {
    pub fn new(def: AcousticsDef) -> Self {
        Self { def, last_contact: None }
    }

    pub fn def(&self) -> &AcousticsDef {
        &self.def
    }

    /// Decide the sound for one contact. `now` is in seconds.
    pub fn on_contact(&mut self, now: f64, relative_velocity: Vec3, rolling: bool, dragging: bool) -> Option<DiceSound> {
        if !rolling || dragging {
            return None;
        }
        let speed = relative_velocity.length();
        if speed < self.def.min_relative_speed {
            return None;
        }
        if let Some(last) = self.last_contact {
            if (now - last) * 1000.0 < self.def.cooldown_ms as f64 {
                return None;
            }
        }
        self.last_contact = Some(now);

        let intensity = self.normalize(speed);
        Some(DiceSound {
            kind: self.classify(relative_velocity),
            intensity,
            volume: self.volume(intensity),
        })
    }

    pub fn classify(&self, relative_velocity: Vec3) -> SoundKind {
        let horizontal = Vec2::new(relative_velocity.x, relative_velocity.z).length();
        let vertical = relative_velocity.y.abs();
        if horizontal > vertical * self.def.scrape_ratio {
            SoundKind::Scrape
        } else if vertical > horizontal * self.def.bounce_ratio {
            SoundKind::Bounce
        } else {
            SoundKind::Hit
        }
    }

    pub fn on_throw(&self, impulse: Vec3, max_impulse: f32) -> DiceSound {
        let intensity = if max_impulse > 0.0 { (impulse.length() / max_impulse).clamp(0.0, 1.0) } else { 0.5 };
        DiceSound { kind: SoundKind::Throw, intensity, volume: self.volume(intensity) }
    }

    pub fn on_settled(&self) -> DiceSound {
        let intensity = self.def.settled_intensity.clamp(0.0, 1.0);
        DiceSound { kind: SoundKind::Settled, intensity, volume: self.volume(intensity) }
    }

    fn normalize(&self, speed: f32) -> f32 {
        if self.def.speed_span <= 0.0 {
            return 1.0;
        }
        ((speed - self.def.min_relative_speed) / self.def.speed_span).clamp(0.0, 1.0)
    }

    fn volume(&self, intensity: f32) -> f32 {
        self.def.base_volume + self.def.volume_span * intensity
    }
}

pub struct AcousticsPlugin;
impl Plugin for AcousticsPlugin {
    fn build(&self, app: &mut App) {
        let def = app.world().get_resource::<LevelDef>().map(|l| l.acoustics).unwrap_or_default();
        app.insert_resource(CollisionAcousticTrigger::new(def))
            .add_event::<CollisionEvent>()
            .add_event::<DiceSound>()
            .add_event::<DiceThrown>()
            .add_event::<DiceSettled>()
            .add_systems(Update, (contact_sounds, lifecycle_sounds));
    }
}

fn contact_sounds(
    time: Res<Time>,
    trigger: Option<ResMut<CollisionAcousticTrigger>>,
    lifecycle: Option<Res<RollLifecycle>>,
    mut ev_collision: EventReader<CollisionEvent>,
    q_die: Query<(), With<Die>>,
    q_vel: Query<&Velocity>,
    mut ev_sound: EventWriter<DiceSound>,
) {
    let (Some(mut trigger), Some(lifecycle)) = (trigger, lifecycle) else {
        ev_collision.clear();
        return;
    };
    let now = time.elapsed_seconds_f64();
    for ev in ev_collision.read() {
        let CollisionEvent::Started(a, b, _) = *ev else { continue; };
        let (die, other) = if q_die.contains(a) {
            (a, b)
        } else if q_die.contains(b) {
            (b, a)
        } else {
            continue;
        };
        // Fixed bodies have no Velocity component.
        let v_die = q_vel.get(die).map(|v| v.linvel).unwrap_or(Vec3::ZERO);
        let v_other = q_vel.get(other).map(|v| v.linvel).unwrap_or(Vec3::ZERO);
        if let Some(sound) = trigger.on_contact(now, v_die - v_other, lifecycle.is_rolling(), lifecycle.is_dragging()) {
            ev_sound.send(sound);
        }
    }
}

fn lifecycle_sounds(
    trigger: Option<Res<CollisionAcousticTrigger>>,
    lifecycle: Option<Res<RollLifecycle>>,
    mut ev_thrown: EventReader<DiceThrown>,
    mut ev_settled: EventReader<DiceSettled>,
    mut ev_sound: EventWriter<DiceSound>,
) {
    let Some(trigger) = trigger else {
        ev_thrown.clear();
        ev_settled.clear();
        return;
    };
    let max_impulse = lifecycle.map(|l| l.config().max_impulse()).unwrap_or(1.0);
    for ev in ev_thrown.read() {
        ev_sound.send(trigger.on_throw(ev.impulse, max_impulse));
    }
    // Out-of-bounds recovery is silent.
    for _ in ev_settled.read().filter(|ev| ev.cause != SettleCause::Recovery) {
        ev_sound.send(trigger.on_settled());
    }
}
