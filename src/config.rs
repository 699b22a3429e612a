//! Configuration persistence for redactor settings

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::domain::RedactionKind;
use crate::redaction::RedactionStyle;

/// Serializable color representation for config storage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor::new(0.0, 0.0, 0.0);
    pub const BLUE: RgbColor = RgbColor::new(0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Convert to image crate RGBA format (0-255), always opaque
    pub fn to_rgba_u8(self) -> Rgba<u8> {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([channel(self.r), channel(self.g), channel(self.b), 255])
    }
}

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedactorConfig {
    /// Size of the canvas images are drawn onto
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Black-out fill
    pub fill_color: RgbColor,
    /// Blur standard deviation in pixels
    pub blur_radius: f32,
    /// Selection preview outline
    pub outline_color: RgbColor,
    pub outline_width: f32,
    /// Redaction kind new selections start with
    pub default_mode: RedactionKind,
}

impl RedactorConfig {
    /// Directory name under the user config dir
    pub const ID: &'static str = "redactor";

    /// `<config dir>/redactor/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::default_path() else {
            log::error!("Could not save config: no config directory");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {:?}", err);
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    pub fn style(&self) -> RedactionStyle {
        RedactionStyle {
            fill: self.fill_color.to_rgba_u8(),
            blur_radius: self.blur_radius,
        }
    }
}

impl Default for RedactorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 500,
            canvas_height: 500,
            fill_color: RgbColor::BLACK,
            // Matches a CSS blur(5px)
            blur_radius: 5.0,
            outline_color: RgbColor::BLUE,
            outline_width: 2.0,
            default_mode: RedactionKind::BlackOut,
        }
    }
}
