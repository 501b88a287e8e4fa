//! Library entry for integration tests & external tooling.
//! Exposes plugin modules and a prelude for common types.

pub mod plugins {
    pub mod core_sim;
    pub mod level;
    pub mod faces;
    pub mod roll;
    pub mod die;
    pub mod tray;
    pub mod input;
    pub mod acoustics;
    pub mod synth;
    pub mod dice_audio;
    pub mod fortune;
    pub mod scene;
    pub mod hud;
}
pub mod prelude;
