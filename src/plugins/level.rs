// Level + content loading (RON). Native reads from disk, web embeds at compile time.
use bevy::prelude::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::fs;
use thiserror::Error;

use crate::plugins::acoustics::AcousticsDef;
use crate::plugins::fortune::FortuneContent;
use crate::plugins::roll::RollConfig;
use crate::plugins::scene::CameraDef;
use crate::plugins::tray::TrayDef;

pub const LEVEL_PATH: &str = "assets/levels/dice_tray.ron";
pub const CONTENT_PATH: &str = "assets/content/fortune.ron";

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, Default, Deserialize, Resource)]
#[serde(default)]
pub struct LevelDef {
    pub camera: CameraDef,
    pub roll: RollConfig,
    pub tray: TrayDef,
    pub acoustics: AcousticsDef,
}

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        // Loaded during build so every Startup system already sees the resources.
        let level = load_level().unwrap_or_else(|e| {
            error!("LEVEL {e}; using defaults");
            LevelDef::default()
        });
        let content = load_content().unwrap_or_else(|e| {
            error!("CONTENT {e}; fortune pool will be empty");
            FortuneContent::default()
        });
        info!(
            "LEVEL loaded articles={} products={} themes={}",
            content.articles.len(),
            content.products.len(),
            content.themes.len()
        );
        app.insert_resource(level).insert_resource(content);
    }
}

pub fn parse_ron<T: DeserializeOwned>(path: &str, data: &str) -> Result<T, LevelError> {
    ron::from_str::<T>(data).map_err(|source| LevelError::Parse { path: path.to_string(), source })
}

// Web builds have no filesystem: embed the files at compile time.
#[cfg(target_arch = "wasm32")]
fn level_source() -> Result<String, LevelError> {
    Ok(include_str!("../../assets/levels/dice_tray.ron").to_string())
}

#[cfg(target_arch = "wasm32")]
fn content_source() -> Result<String, LevelError> {
    Ok(include_str!("../../assets/content/fortune.ron").to_string())
}

#[cfg(not(target_arch = "wasm32"))]
fn level_source() -> Result<String, LevelError> {
    read_file(LEVEL_PATH)
}

#[cfg(not(target_arch = "wasm32"))]
fn content_source() -> Result<String, LevelError> {
    read_file(CONTENT_PATH)
}

#[cfg(not(target_arch = "wasm32"))]
fn read_file(path: &str) -> Result<String, LevelError> {
    fs::read_to_string(path).map_err(|source| LevelError::Read { path: path.to_string(), source })
}

pub fn load_level() -> Result<LevelDef, LevelError> {
    parse_ron(LEVEL_PATH, &level_source()?)
}

pub fn load_content() -> Result<FortuneContent, LevelError> {
    parse_ron(CONTENT_PATH, &content_source()?)
}
