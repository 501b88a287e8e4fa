// Dice audio output: one owned singleton (`DiceAudio`) plus a custom bevy_audio source
// that plays synthesized sample buffers. Without an AudioPlugin everything is a no-op.
use std::sync::Arc;

use bevy::audio::{AddAudioSource, AudioPlugin, AudioSourceBundle, Decodable, Source, Volume};
use bevy::prelude::*;
use bevy::utils::Duration;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::plugins::acoustics::{AcousticsDef, DiceSound};
use crate::plugins::level::LevelDef;
use crate::plugins::synth::SoundSynth;

/// A rendered mono buffer.
#[derive(Asset, TypePath, Debug, Clone)]
pub struct SynthClip {
    pub samples: Arc<[f32]>,
    pub sample_rate: u32,
}

impl SynthClip {
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f32(self.samples.len() as f32 / self.sample_rate.max(1) as f32)
    }
}

pub struct SynthClipDecoder {
    samples: Arc<[f32]>,
    sample_rate: u32,
    pos: usize,
}

impl Iterator for SynthClipDecoder {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let s = self.samples.get(self.pos).copied();
        self.pos += 1;
        s
    }
}

impl Source for SynthClipDecoder {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.samples.len().saturating_sub(self.pos))
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(self.samples.len() as f32 / self.sample_rate.max(1) as f32))
    }
}

impl Decodable for SynthClip {
    type DecoderItem = <SynthClipDecoder as Iterator>::Item;
    type Decoder = SynthClipDecoder;

    fn decoder(&self) -> Self::Decoder {
        SynthClipDecoder { samples: self.samples.clone(), sample_rate: self.sample_rate, pos: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioState {
    Uninitialized,
    /// Created, waiting for a user gesture.
    Suspended,
    Running,
    /// No output backend; every call is a no-op.
    Unavailable,
}

#[derive(Resource)]
pub struct DiceAudio {
    state: AudioState,
    backend: bool,
    master_gain: f32,
    synth: SoundSynth,
    rng: StdRng,
}

impl DiceAudio {
    pub fn new(backend: bool, master_gain: f32) -> Self {
        Self {
            state: AudioState::Uninitialized,
            backend,
            master_gain,
            synth: SoundSynth::default(),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn state(&self) -> AudioState {
        self.state
    }

    pub fn master_gain(&self) -> f32 {
        self.master_gain
    }

    /// Lazily create the output on first use.
    fn context(&mut self) -> AudioState {
        if self.state == AudioState::Uninitialized {
            self.state = if self.backend { AudioState::Suspended } else { AudioState::Unavailable };
            debug!("AUDIO context state={:?}", self.state);
        }
        self.state
    }

    /// User-gesture unlock. Idempotent; returns true if audio is running afterwards.
    pub fn unlock(&mut self) -> bool {
        if self.context() == AudioState::Suspended {
            self.state = AudioState::Running;
            info!("AUDIO unlocked");
        }
        self.state == AudioState::Running
    }

    /// Render a clip if audio is running. Never resumes a suspended context.
    pub fn render(&mut self, sound: &DiceSound) -> Option<SynthClip> {
        if self.context() != AudioState::Running {
            return None;
        }
        let samples = self.synth.render(sound, &mut self.rng);
        if samples.is_empty() {
            return None;
        }
        Some(SynthClip { samples: samples.into(), sample_rate: self.synth.sample_rate() })
    }
}

/// Sent by the input layer on a user gesture.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct UnlockAudio;

pub struct DiceAudioPlugin;
impl Plugin for DiceAudioPlugin {
    fn build(&self, app: &mut App) {
        let backend = app.is_plugin_added::<AudioPlugin>();
        if backend {
            app.add_audio_source::<SynthClip>();
        } else {
            warn!("AUDIO no AudioPlugin; dice sounds disabled");
        }
        let gain = app
            .world()
            .get_resource::<LevelDef>()
            .map(|l| l.acoustics.master_gain)
            .unwrap_or_else(|| AcousticsDef::default().master_gain);
        app.insert_resource(DiceAudio::new(backend, gain))
            .add_event::<UnlockAudio>()
            .add_event::<DiceSound>()
            .add_systems(Update, (unlock_on_gesture, play_dice_sounds).chain());
    }
}

fn unlock_on_gesture(mut audio: ResMut<DiceAudio>, mut ev_unlock: EventReader<UnlockAudio>) {
    if ev_unlock.read().count() > 0 {
        audio.unlock();
    }
}

fn play_dice_sounds(
    mut commands: Commands,
    mut audio: ResMut<DiceAudio>,
    clips: Option<ResMut<Assets<SynthClip>>>,
    mut ev_sound: EventReader<DiceSound>,
) {
    let Some(mut clips) = clips else {
        ev_sound.clear();
        return;
    };
    for sound in ev_sound.read() {
        let Some(clip) = audio.render(sound) else { continue; };
        let volume = audio.master_gain();
        commands.spawn(AudioSourceBundle::<SynthClip> {
            source: clips.add(clip),
            settings: PlaybackSettings::DESPAWN.with_volume(Volume::new(volume)),
        });
    }
}
