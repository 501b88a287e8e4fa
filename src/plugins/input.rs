// Mouse / touch / keyboard -> die gestures. Presses are ray-cast against the die
// collider through the dice camera; cursor icon reflects what a press would do.
use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;
use bevy::window::{CursorIcon, PrimaryWindow};
use bevy_rapier3d::prelude::*;

use crate::plugins::dice_audio::UnlockAudio;
use crate::plugins::die::{Die, DiePointer, RequestRoll};
use crate::plugins::roll::RollLifecycle;
use crate::plugins::scene::DiceCamera;

const PICK_DISTANCE: f32 = 100.0;

/// Which pointer owns the current gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerId {
    Mouse,
    Touch(u64),
}

/// Turns raw presses / moves / releases into `DiePointer` gestures.
#[derive(Resource, Debug, Default)]
pub struct PointerGesture {
    active: Option<PointerId>,
    last: Vec2,
    unlocked: bool,
}

impl PointerGesture {
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Returns true the first time any gesture is seen (audio unlock point).
    pub fn first_gesture(&mut self) -> bool {
        !std::mem::replace(&mut self.unlocked, true)
    }

    pub fn press(&mut self, id: PointerId, pos: Vec2, on_die: bool) -> Option<DiePointer> {
        if self.active.is_some() || !on_die {
            return None;
        }
        self.active = Some(id);
        self.last = pos;
        Some(DiePointer::Down(pos))
    }

    pub fn moved(&mut self, id: PointerId, pos: Vec2) -> Option<DiePointer> {
        if self.active != Some(id) || pos == self.last {
            return None;
        }
        self.last = pos;
        Some(DiePointer::Move(pos))
    }

    pub fn release(&mut self, id: PointerId, pos: Option<Vec2>) -> Option<DiePointer> {
        if self.active != Some(id) {
            return None;
        }
        self.active = None;
        Some(DiePointer::Up(pos.unwrap_or(self.last)))
    }

    pub fn cancel(&mut self, id: PointerId) -> Option<DiePointer> {
        if self.active != Some(id) {
            return None;
        }
        self.active = None;
        Some(DiePointer::Cancel)
    }
}

pub struct DiceInputPlugin;
impl Plugin for DiceInputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerGesture>()
            .add_event::<TouchInput>()
            .add_event::<DiePointer>()
            .add_event::<RequestRoll>()
            .add_event::<UnlockAudio>()
            .add_systems(Update, (keyboard_roll, pointer_input, cursor_feedback));
    }
}

fn keyboard_roll(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut gesture: ResMut<PointerGesture>,
    mut ev_roll: EventWriter<RequestRoll>,
    mut ev_unlock: EventWriter<UnlockAudio>,
) {
    let Some(keys) = keys else { return; };
    if keys.just_pressed(KeyCode::Space) {
        if gesture.first_gesture() {
            ev_unlock.send(UnlockAudio);
        }
        ev_roll.send(RequestRoll);
    }
}

fn pick_die(
    pos: Vec2,
    camera: Option<(&Camera, &GlobalTransform)>,
    rapier: Option<&RapierContext>,
    die: Option<Entity>,
) -> bool {
    let (Some((camera, cam_t)), Some(ctx), Some(die)) = (camera, rapier, die) else { return false; };
    let Some(ray) = camera.viewport_to_world(cam_t, pos) else { return false; };
    matches!(
        ctx.cast_ray(ray.origin, *ray.direction, PICK_DISTANCE, true, QueryFilter::default()),
        Some((hit, _)) if hit == die
    )
}

#[allow(clippy::too_many_arguments)]
fn pointer_input(
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    mut ev_touch: EventReader<TouchInput>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    q_cam: Query<(&Camera, &GlobalTransform), With<DiceCamera>>,
    q_die: Query<Entity, With<Die>>,
    rapier: Option<Res<RapierContext>>,
    mut gesture: ResMut<PointerGesture>,
    mut ev_pointer: EventWriter<DiePointer>,
    mut ev_unlock: EventWriter<UnlockAudio>,
) {
    let camera = q_cam.get_single().ok();
    let die = q_die.get_single().ok();
    let rapier = rapier.as_deref();

    for ev in ev_touch.read() {
        let id = PointerId::Touch(ev.id);
        let out = match ev.phase {
            TouchPhase::Started => {
                if gesture.first_gesture() {
                    ev_unlock.send(UnlockAudio);
                }
                let on_die = pick_die(ev.position, camera, rapier, die);
                gesture.press(id, ev.position, on_die)
            }
            TouchPhase::Moved => gesture.moved(id, ev.position),
            TouchPhase::Ended => gesture.release(id, Some(ev.position)),
            TouchPhase::Canceled => gesture.cancel(id),
        };
        if let Some(out) = out {
            ev_pointer.send(out);
        }
    }

    let Some(buttons) = buttons else { return; };
    let cursor = q_window.get_single().ok().and_then(|w| w.cursor_position());
    let id = PointerId::Mouse;
    if buttons.just_pressed(MouseButton::Left) {
        if gesture.first_gesture() {
            ev_unlock.send(UnlockAudio);
        }
        if let Some(pos) = cursor {
            let on_die = pick_die(pos, camera, rapier, die);
            if let Some(out) = gesture.press(id, pos, on_die) {
                ev_pointer.send(out);
            }
        }
    }
    if buttons.pressed(MouseButton::Left) {
        let out = match cursor {
            Some(pos) => gesture.moved(id, pos),
            // Left the window mid-drag.
            None => gesture.cancel(id),
        };
        if let Some(out) = out {
            ev_pointer.send(out);
        }
    }
    if buttons.just_released(MouseButton::Left) {
        if let Some(out) = gesture.release(id, cursor) {
            ev_pointer.send(out);
        }
    }
}

fn cursor_feedback(
    mut q_window: Query<&mut Window, With<PrimaryWindow>>,
    q_cam: Query<(&Camera, &GlobalTransform), With<DiceCamera>>,
    q_die: Query<Entity, With<Die>>,
    rapier: Option<Res<RapierContext>>,
    lifecycle: Option<Res<RollLifecycle>>,
) {
    let Ok(mut window) = q_window.get_single_mut() else { return; };
    let Some(lifecycle) = lifecycle else { return; };
    let hovering = window
        .cursor_position()
        .map(|pos| pick_die(pos, q_cam.get_single().ok(), rapier.as_deref(), q_die.get_single().ok()))
        .unwrap_or(false);
    let icon = if lifecycle.is_dragging() {
        CursorIcon::Grabbing
    } else if !hovering {
        CursorIcon::Default
    } else if lifecycle.is_rolling() {
        CursorIcon::NotAllowed
    } else {
        CursorIcon::Grab
    };
    if window.cursor.icon != icon {
        window.cursor.icon = icon;
    }
}
