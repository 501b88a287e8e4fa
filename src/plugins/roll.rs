// Roll lifecycle state machine: Idle -> Dragging / Rolling -> Settled.
//
// Owns no physics state. Every command goes through a `DieBody`, so the same
// machine drives the rapier body in the app and an in-memory body in tests.
// Results leave through a queue of `RollEvent`s drained by the caller.

use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;
use serde::Deserialize;

use crate::plugins::faces::FaceNormals;

/// Command/read surface of the die's rigid body.
pub trait DieBody {
    fn translation(&self) -> Vec3;
    fn rotation(&self) -> Quat;
    fn linear_velocity(&self) -> Vec3;
    fn angular_velocity(&self) -> Vec3;
    fn set_pose(&mut self, translation: Vec3, rotation: Quat);
    fn set_linear_velocity(&mut self, linvel: Vec3);
    fn set_angular_velocity(&mut self, angvel: Vec3);
    fn apply_impulse(&mut self, impulse: Vec3);
    fn apply_torque_impulse(&mut self, torque: Vec3);
    fn lock_translation(&mut self, locked: bool);

    fn set_rotation(&mut self, rotation: Quat) {
        let translation = self.translation();
        self.set_pose(translation, rotation);
    }

    fn halt(&mut self) {
        self.set_linear_velocity(Vec3::ZERO);
        self.set_angular_velocity(Vec3::ZERO);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RollPhase {
    #[default]
    Idle,
    Dragging,
    Rolling,
    Settled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleCause {
    /// Physics engine put the body to sleep.
    Sleep,
    /// Low velocity held for the settle duration.
    Heuristic,
    /// Die left the play volume and was reset.
    Recovery,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RollEvent {
    TopFaceChanged(u8),
    Thrown { roll_id: u64, impulse: Vec3 },
    Settled { roll_id: u64, face: u8, cause: SettleCause },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RollConfig {
    pub spawn_position: (f32, f32, f32),
    pub randomize_spawn_rotation: bool,
    pub horizontal_impulse: (f32, f32), // magnitude band, direction uniform in XZ
    pub upward_impulse: (f32, f32),
    pub torque_impulse: f32, // each axis uniform in [-v, v]
    pub settle_linear_speed: f32,
    pub settle_angular_speed: f32,
    pub settle_duration: f32, // seconds
    pub floor_y: f32,
    pub lateral_limit: f32,
    pub click_threshold_px: f32,
    pub drag_radians_per_px: f32,
}

impl Default for RollConfig {
    fn default() -> Self {
        Self {
            spawn_position: (0.0, 0.9, 0.0),
            randomize_spawn_rotation: true,
            horizontal_impulse: (1.8, 2.7),
            upward_impulse: (0.6, 1.2),
            torque_impulse: 1.5,
            settle_linear_speed: 0.12,
            settle_angular_speed: 0.6,
            settle_duration: 0.25,
            floor_y: -2.0,
            lateral_limit: 6.0,
            click_threshold_px: 2.0,
            drag_radians_per_px: 0.01,
        }
    }
}

impl RollConfig {
    pub fn spawn(&self) -> Vec3 {
        let (x, y, z) = self.spawn_position;
        Vec3::new(x, y, z)
    }

    pub fn out_of_bounds(&self, p: Vec3) -> bool {
        p.y < self.floor_y || p.x.abs() > self.lateral_limit || p.z.abs() > self.lateral_limit
    }

    /// Largest impulse a roll can apply (used to normalise throw loudness).
    pub fn max_impulse(&self) -> f32 {
        Vec2::new(self.horizontal_impulse.1, self.upward_impulse.1).length()
    }
}

#[derive(Debug, Clone, Copy)]
struct DragGesture {
    last: Vec2,
    travel: f32,
}

#[derive(Resource, Debug)]
pub struct RollLifecycle {
    config: RollConfig,
    phase: RollPhase,
    roll_id: u64,
    settled_roll: Option<u64>,
    settle_timer: f32,
    last_face: Option<u8>,
    drag: Option<DragGesture>,
    events: Vec<RollEvent>,
}

impl Default for RollLifecycle {
    fn default() -> Self {
        Self::new(RollConfig::default())
    }
}

impl RollLifecycle {
    pub fn new(config: RollConfig) -> Self {
        Self {
            config,
            phase: RollPhase::Idle,
            roll_id: 0,
            settled_roll: None,
            settle_timer: 0.0,
            last_face: None,
            drag: None,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &RollConfig {
        &self.config
    }

    pub fn phase(&self) -> RollPhase {
        self.phase
    }

    pub fn roll_id(&self) -> u64 {
        self.roll_id
    }

    pub fn is_rolling(&self) -> bool {
        self.phase == RollPhase::Rolling
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == RollPhase::Dragging
    }

    pub fn last_face(&self) -> Option<u8> {
        self.last_face
    }

    pub fn settle_timer(&self) -> f32 {
        self.settle_timer
    }

    pub fn drain_events(&mut self) -> Vec<RollEvent> {
        std::mem::take(&mut self.events)
    }

    /// Start a new roll. No-op (returns false) while a roll is in progress.
    pub fn request_roll<B: DieBody, R: Rng>(&mut self, body: &mut B, rng: &mut R) -> bool {
        if self.phase == RollPhase::Rolling {
            debug!("ROLL request ignored id={} reason=rolling", self.roll_id);
            return false;
        }
        self.roll_id += 1;
        self.drag = None;
        self.settle_timer = 0.0;

        body.lock_translation(false);
        body.halt();
        let rotation = if self.config.randomize_spawn_rotation {
            Quat::from_euler(
                EulerRot::XYZ,
                rng.gen_range(0.0..TAU),
                rng.gen_range(0.0..TAU),
                rng.gen_range(0.0..TAU),
            )
        } else {
            Quat::IDENTITY
        };
        body.set_pose(self.config.spawn(), rotation);
        self.phase = RollPhase::Rolling;

        // Mostly sideways so the die slides into the tray instead of launching.
        let angle = rng.gen_range(0.0..TAU);
        let horizontal = sample_band(rng, self.config.horizontal_impulse);
        let upward = sample_band(rng, self.config.upward_impulse);
        let impulse = Vec3::new(angle.cos() * horizontal, upward, angle.sin() * horizontal);
        let t = self.config.torque_impulse.abs();
        let torque = Vec3::new(
            sample_band(rng, (-t, t)),
            sample_band(rng, (-t, t)),
            sample_band(rng, (-t, t)),
        );
        body.apply_impulse(impulse);
        body.apply_torque_impulse(torque);

        info!(
            "ROLL start id={} impulse=({:.2},{:.2},{:.2}) torque=({:.2},{:.2},{:.2})",
            self.roll_id, impulse.x, impulse.y, impulse.z, torque.x, torque.y, torque.z
        );
        self.events.push(RollEvent::Thrown { roll_id: self.roll_id, impulse });
        true
    }

    /// Grab the die for manual orientation. Ignored while rolling or already dragging.
    pub fn pointer_down<B: DieBody>(&mut self, body: &mut B, pos: Vec2) -> bool {
        if matches!(self.phase, RollPhase::Rolling | RollPhase::Dragging) {
            return false;
        }
        body.lock_translation(true);
        body.halt();
        self.drag = Some(DragGesture { last: pos, travel: 0.0 });
        self.settle_timer = 0.0;
        self.phase = RollPhase::Dragging;
        true
    }

    pub fn pointer_move<B: DieBody>(&mut self, body: &mut B, faces: &FaceNormals, pos: Vec2) {
        if self.phase != RollPhase::Dragging {
            return;
        }
        let Some(drag) = self.drag.as_mut() else { return; };
        let delta = pos - drag.last;
        drag.last = pos;
        drag.travel += delta.x.abs() + delta.y.abs();

        let k = self.config.drag_radians_per_px;
        let rotation = body.rotation() * Quat::from_euler(EulerRot::XYZ, delta.y * k, delta.x * k, 0.0);
        body.set_rotation(rotation);
        body.set_angular_velocity(Vec3::ZERO);
        self.report_face(faces.resolve_top_face(rotation));
    }

    /// Release. Negligible travel counts as a click and starts a roll (returns true).
    pub fn pointer_up<B: DieBody, R: Rng>(&mut self, body: &mut B, rng: &mut R, pos: Vec2) -> bool {
        if self.phase != RollPhase::Dragging {
            return false;
        }
        let Some(mut drag) = self.drag.take() else {
            self.phase = RollPhase::Idle;
            return false;
        };
        drag.travel += (pos - drag.last).abs().element_sum();
        body.lock_translation(false);
        self.phase = RollPhase::Idle;
        if drag.travel > self.config.click_threshold_px {
            return false;
        }
        self.request_roll(body, rng)
    }

    pub fn pointer_cancel<B: DieBody>(&mut self, body: &mut B) {
        if self.phase != RollPhase::Dragging {
            return;
        }
        self.drag = None;
        body.lock_translation(false);
        self.phase = RollPhase::Idle;
    }

    /// Physics sleep notification, tagged with the roll it was observed for.
    pub fn notify_sleep<B: DieBody>(&mut self, body: &mut B, faces: &FaceNormals, roll_id: u64) {
        if roll_id != self.roll_id || self.phase != RollPhase::Rolling {
            debug!("ROLL sleep ignored tag={} current={} phase={:?}", roll_id, self.roll_id, self.phase);
            return;
        }
        self.settle(body, faces, SettleCause::Sleep);
    }

    /// Per-frame step: bounds recovery, settle heuristic, live face reporting.
    pub fn frame<B: DieBody>(&mut self, dt: f32, body: &mut B, faces: &FaceNormals) {
        if self.config.out_of_bounds(body.translation()) {
            self.recover(body, faces);
            return;
        }
        match self.phase {
            RollPhase::Dragging => {
                self.settle_timer = 0.0;
            }
            RollPhase::Rolling => {
                let linear = body.linear_velocity().length();
                let angular = body.angular_velocity().length();
                if linear < self.config.settle_linear_speed && angular < self.config.settle_angular_speed {
                    self.settle_timer += dt;
                    if self.settle_timer > self.config.settle_duration {
                        body.halt();
                        self.settle(body, faces, SettleCause::Heuristic);
                        return;
                    }
                } else {
                    self.settle_timer = 0.0;
                }
                self.report_face(faces.resolve_top_face(body.rotation()));
            }
            RollPhase::Idle | RollPhase::Settled => {
                self.settle_timer = 0.0;
                self.report_face(faces.resolve_top_face(body.rotation()));
            }
        }
    }

    fn recover<B: DieBody>(&mut self, body: &mut B, faces: &FaceNormals) {
        let was_rolling = self.phase == RollPhase::Rolling;
        let p = body.translation();
        debug!("ROLL recover id={} pos=({:.2},{:.2},{:.2}) phase={:?}", self.roll_id, p.x, p.y, p.z, self.phase);

        body.halt();
        body.set_pose(self.config.spawn(), Quat::IDENTITY);
        if self.drag.take().is_some() {
            body.lock_translation(false);
            self.phase = RollPhase::Idle;
        }
        self.settle_timer = 0.0;

        let face = faces.resolve_top_face(Quat::IDENTITY);
        self.report_face(face);
        if was_rolling {
            self.finish(face, SettleCause::Recovery);
        }
    }

    fn settle<B: DieBody>(&mut self, body: &mut B, faces: &FaceNormals, cause: SettleCause) {
        let face = faces.resolve_top_face(body.rotation());
        self.finish(face, cause);
        self.report_face(face);
    }

    fn finish(&mut self, face: u8, cause: SettleCause) {
        self.phase = RollPhase::Settled;
        self.settle_timer = 0.0;
        if self.settled_roll == Some(self.roll_id) {
            return;
        }
        self.settled_roll = Some(self.roll_id);
        info!("ROLL settled id={} face={} cause={:?}", self.roll_id, face, cause);
        self.events.push(RollEvent::Settled { roll_id: self.roll_id, face, cause });
    }

    fn report_face(&mut self, face: u8) {
        if self.last_face == Some(face) {
            return;
        }
        self.last_face = Some(face);
        self.events.push(RollEvent::TopFaceChanged(face));
    }
}

fn sample_band<R: Rng>(rng: &mut R, (lo, hi): (f32, f32)) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}
