// HUD: live top face and the fortune drawn for the last settled roll.
use bevy::prelude::*;

use crate::plugins::die::TopFaceChanged;
use crate::plugins::fortune::FortuneDrawn;

#[derive(Component)]
pub struct Hud;

#[derive(Component)]
pub struct FaceText;

#[derive(Component)]
pub struct CardText;

pub const EMPTY_CARD: &str = "nothing to show";

pub struct HudPlugin;
impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TopFaceChanged>()
            .add_event::<FortuneDrawn>()
            .add_systems(Startup, setup_hud)
            .add_systems(Update, (update_face_text, update_card_text));
    }
}

fn setup_hud(mut commands: Commands) {
    let style = TextStyle { font_size: 22.0, color: Color::WHITE, ..default() };
    commands.spawn((
        TextBundle::from_section("Face: --", style.clone())
            .with_style(Style { position_type: PositionType::Absolute, left: Val::Px(12.0), top: Val::Px(8.0), ..default() }),
        Hud,
        FaceText,
    ));
    commands.spawn((
        TextBundle::from_section("Click the die or press Space to roll", style)
            .with_style(Style { position_type: PositionType::Absolute, left: Val::Px(12.0), top: Val::Px(36.0), ..default() }),
        Hud,
        CardText,
    ));
}

fn update_face_text(mut ev_face: EventReader<TopFaceChanged>, mut q_text: Query<&mut Text, With<FaceText>>) {
    let Some(face) = ev_face.read().last().map(|e| e.face) else { return; };
    if let Ok(mut text) = q_text.get_single_mut() {
        text.sections[0].value = format!("Face: {face}");
    }
}

fn update_card_text(mut ev_drawn: EventReader<FortuneDrawn>, mut q_text: Query<&mut Text, With<CardText>>) {
    let Some(drawn) = ev_drawn.read().last() else { return; };
    let line = match &drawn.card {
        Some(card) => format!("Rolled {} -> {}", drawn.face, card.label()),
        None => format!("Rolled {} -> {}", drawn.face, EMPTY_CARD),
    };
    if let Ok(mut text) = q_text.get_single_mut() {
        text.sections[0].value = line;
    }
}
