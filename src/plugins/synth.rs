// Procedural dice sounds: sine thump + band-passed noise burst, rendered to mono f32.
use std::f32::consts::TAU;

use rand::Rng;

use crate::plugins::acoustics::{DiceSound, SoundKind};

pub const SAMPLE_RATE: u32 = 44_100;
/// Length of the cached noise burst in seconds.
pub const NOISE_SECONDS: f32 = 0.12;
const SILENCE: f32 = 0.0001;

/// RBJ band-pass (constant 0 dB peak gain), direct form I.
#[derive(Debug, Clone, Copy)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    pub fn band_pass(center_hz: f32, q: f32, sample_rate: f32) -> Self {
        let w0 = TAU * (center_hz / sample_rate).clamp(1e-4, 0.499);
        let alpha = w0.sin() / (2.0 * q.max(1e-3));
        let a0 = 1.0 + alpha;
        Self {
            b0: alpha / a0,
            b1: 0.0,
            b2: -alpha / a0,
            a1: -2.0 * w0.cos() / a0,
            a2: (1.0 - alpha) / a0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    pub fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2 - self.a1 * self.y1 - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}

/// Linear attack to `peak`, then exponential ramp down to silence at `end` (seconds).
#[derive(Debug, Clone, Copy)]
pub struct Envelope {
    pub peak: f32,
    pub attack: f32,
    pub end: f32,
}

impl Envelope {
    pub fn at(&self, t: f32) -> f32 {
        if t < 0.0 || t >= self.end || self.peak <= 0.0 {
            return 0.0;
        }
        if t < self.attack {
            return self.peak * t / self.attack;
        }
        let span = (self.end - self.attack).max(1e-6);
        let k = (t - self.attack) / span;
        self.peak * (SILENCE / self.peak).powf(k)
    }
}

/// White-noise burst with quadratic decay, generated once per sample rate.
#[derive(Debug, Default)]
pub struct NoiseBank {
    cached: Option<(u32, Vec<f32>)>,
}

impl NoiseBank {
    pub fn burst<R: Rng>(&mut self, sample_rate: u32, rng: &mut R) -> &[f32] {
        let stale = !matches!(&self.cached, Some((rate, _)) if *rate == sample_rate);
        if stale {
            let frames = ((sample_rate as f32 * NOISE_SECONDS) as usize).max(1);
            let data = (0..frames)
                .map(|i| {
                    let t = i as f32 / frames as f32;
                    (rng.gen::<f32>() * 2.0 - 1.0) * (1.0 - t) * (1.0 - t)
                })
                .collect();
            self.cached = Some((sample_rate, data));
        }
        self.cached.as_ref().map(|(_, d)| d.as_slice()).unwrap_or(&[])
    }

    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }
}

/// (base, random span) pair: value = base + rng * span.
type Spread = (f32, f32);

#[derive(Debug, Clone, Copy)]
struct Shape {
    thump_hz: Spread,
    thump: Envelope,
    noise_rate: Spread,
    band_hz: Spread,
    band_q: Spread,
    noise: Envelope,
    attack: f32,
    length: f32,
}

fn shape(kind: SoundKind) -> Shape {
    match kind {
        SoundKind::Hit => Shape {
            thump_hz: (110.0, 55.0),
            thump: Envelope { peak: 0.55, attack: 0.001, end: 0.09 },
            noise_rate: (0.92, 0.18),
            band_hz: (1200.0, 900.0),
            band_q: (0.9, 0.6),
            noise: Envelope { peak: 0.65, attack: 0.001, end: 0.07 },
            attack: 0.002,
            length: 0.14,
        },
        SoundKind::Bounce => Shape {
            thump_hz: (130.0, 40.0),
            thump: Envelope { peak: 0.7, attack: 0.001, end: 0.11 },
            noise_rate: (0.95, 0.15),
            band_hz: (1500.0, 600.0),
            band_q: (1.0, 0.5),
            noise: Envelope { peak: 0.35, attack: 0.001, end: 0.05 },
            attack: 0.002,
            length: 0.16,
        },
        SoundKind::Scrape => Shape {
            thump_hz: (90.0, 30.0),
            thump: Envelope { peak: 0.12, attack: 0.002, end: 0.05 },
            noise_rate: (0.55, 0.15),
            band_hz: (700.0, 400.0),
            band_q: (0.6, 0.3),
            noise: Envelope { peak: 0.8, attack: 0.01, end: 0.2 },
            attack: 0.008,
            length: 0.22,
        },
        SoundKind::Throw => Shape {
            thump_hz: (80.0, 20.0),
            thump: Envelope { peak: 0.25, attack: 0.004, end: 0.12 },
            noise_rate: (0.45, 0.1),
            band_hz: (500.0, 300.0),
            band_q: (0.5, 0.3),
            noise: Envelope { peak: 0.6, attack: 0.03, end: 0.24 },
            attack: 0.03,
            length: 0.26,
        },
        SoundKind::Settled => Shape {
            thump_hz: (95.0, 20.0),
            thump: Envelope { peak: 0.6, attack: 0.001, end: 0.14 },
            noise_rate: (0.9, 0.1),
            band_hz: (1000.0, 400.0),
            band_q: (0.8, 0.4),
            noise: Envelope { peak: 0.2, attack: 0.001, end: 0.04 },
            attack: 0.002,
            length: 0.18,
        },
    }
}

fn spread<R: Rng>(rng: &mut R, (base, span): Spread) -> f32 {
    base + rng.gen::<f32>() * span
}

/// Renders `DiceSound`s into sample buffers; owns the noise cache.
#[derive(Debug)]
pub struct SoundSynth {
    sample_rate: u32,
    noise: NoiseBank,
}

impl Default for SoundSynth {
    fn default() -> Self {
        Self::new(SAMPLE_RATE)
    }
}

impl SoundSynth {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate: sample_rate.max(1), noise: NoiseBank::default() }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn noise_cached(&self) -> bool {
        self.noise.is_cached()
    }

    pub fn render<R: Rng>(&mut self, sound: &DiceSound, rng: &mut R) -> Vec<f32> {
        let s = shape(sound.kind);
        let rate = self.sample_rate as f32;
        let frames = (s.length * rate).ceil() as usize;

        // Harder contacts pitch the thump up a little.
        let thump_hz = spread(rng, s.thump_hz) * (1.0 + 0.15 * sound.intensity);
        let playback_rate = spread(rng, s.noise_rate);
        let mut filter = Biquad::band_pass(spread(rng, s.band_hz), spread(rng, s.band_q), rate);
        let output = Envelope { peak: sound.volume.max(0.0), attack: s.attack, end: s.length };
        let noise = self.noise.burst(self.sample_rate, rng);

        let mut out = Vec::with_capacity(frames);
        for i in 0..frames {
            let t = i as f32 / rate;
            let tone = (TAU * thump_hz * t).sin() * s.thump.at(t);
            let n = filter.process(resample(noise, i as f32 * playback_rate)) * s.noise.at(t);
            out.push(((tone + n) * output.at(t)).clamp(-1.0, 1.0));
        }
        out
    }
}

/// Linear interpolation into `buf`; silent past the end.
fn resample(buf: &[f32], pos: f32) -> f32 {
    let i = pos as usize;
    match (buf.get(i), buf.get(i + 1)) {
        (Some(a), Some(b)) => {
            let f = pos - i as f32;
            a + (b - a) * f
        }
        (Some(a), None) => *a,
        _ => 0.0,
    }
}
