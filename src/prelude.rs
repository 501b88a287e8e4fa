//! Convenience re-exports for frequently used types & plugins.
pub use crate::plugins::acoustics::{AcousticsDef, AcousticsPlugin, CollisionAcousticTrigger, DiceSound, SoundKind};
pub use crate::plugins::core_sim::{CoreSimPlugin, LogState, SimState};
pub use crate::plugins::dice_audio::{AudioState, DiceAudio, DiceAudioPlugin, SynthClip, UnlockAudio};
pub use crate::plugins::die::{Die, DicePlugin, DiceSettled, DiceThrown, DiePointer, RequestRoll, TopFaceChanged};
pub use crate::plugins::faces::{DieFaceMarkers, FaceMarker, FaceNormal, FaceNormals, FaceTableError, DIE_RADIUS, FACE_COUNT};
pub use crate::plugins::fortune::{build_pool, draw, draw_with_entropy, Card, FortuneContent, FortuneDrawn, FortunePlugin, FortunePool, LastFortune, ThemeChangeRequested};
pub use crate::plugins::hud::HudPlugin;
pub use crate::plugins::input::{DiceInputPlugin, PointerGesture, PointerId};
pub use crate::plugins::level::{LevelDef, LevelError, LevelPlugin};
pub use crate::plugins::roll::{DieBody, RollConfig, RollEvent, RollLifecycle, RollPhase, SettleCause};
pub use crate::plugins::scene::{DiceCamera, ScenePlugin};
pub use crate::plugins::synth::SoundSynth;
pub use crate::plugins::tray::{tray_colliders, TrayCollider, TrayDef, TrayPart, TrayPlugin};
