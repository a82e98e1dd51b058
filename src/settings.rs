//! Scene settings
//!
//! Layout and projectile tuning. Defaults reproduce the stock scene; a JSON
//! file can override any subset of fields.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// Scene layout and projectile tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Scene ===
    /// Visible scene size, centred on the origin (the wall loop follows it)
    pub scene_size: Vec2,

    // === Player ===
    /// Anchor the projectiles are fired from
    pub player_position: Vec2,
    /// Marker size (square)
    pub player_size: f32,

    // === Block grid ===
    pub block_size: Vec2,
    /// Gap between blocks (only the width is used for column stepping)
    pub grid_spacing: Vec2,
    pub grid_rows: u32,
    pub grid_cols: u32,
    /// X of the first column
    pub grid_origin_x: f32,
    /// Y offset of the first row (rows step up by twice the block height)
    pub grid_row_offset: f32,

    // === Projectile ===
    pub projectile_size: f32,
    /// Distance covered before the projectile removes itself
    pub projectile_range: f32,
    /// Seconds to cover `projectile_range`
    pub projectile_travel_time: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scene_size: Vec2::new(SCENE_WIDTH, SCENE_HEIGHT),

            player_position: Vec2::new(PLAYER_X, PLAYER_Y),
            player_size: PLAYER_SIZE,

            block_size: Vec2::splat(BLOCK_SIZE),
            grid_spacing: Vec2::splat(GRID_SPACING),
            grid_rows: GRID_ROWS,
            grid_cols: GRID_COLS,
            grid_origin_x: GRID_ORIGIN_X,
            grid_row_offset: GRID_ROW_OFFSET,

            projectile_size: PROJECTILE_SIZE,
            projectile_range: PROJECTILE_RANGE,
            projectile_travel_time: PROJECTILE_TRAVEL_TIME,
        }
    }
}

impl Settings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Column step of the block grid
    pub fn column_step(&self) -> f32 {
        self.block_size.x + self.grid_spacing.x
    }

    /// Row step of the block grid
    pub fn row_step(&self) -> f32 {
        self.block_size.y * 2.0
    }

    /// Rounded-corner radius of the player marker
    pub fn player_corner_radius(&self) -> f32 {
        self.player_size * PLAYER_CORNER_FACTOR
    }

    /// Reject values the scene cannot be built from
    pub fn validate(&self) -> Result<()> {
        let floats = [
            ("scene width", self.scene_size.x),
            ("scene height", self.scene_size.y),
            ("player size", self.player_size),
            ("block width", self.block_size.x),
            ("block height", self.block_size.y),
            ("projectile size", self.projectile_size),
            ("projectile range", self.projectile_range),
            ("projectile travel time", self.projectile_travel_time),
        ];
        for (name, value) in floats {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidSettings(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        let offsets = [
            ("player x", self.player_position.x),
            ("player y", self.player_position.y),
            ("grid spacing width", self.grid_spacing.x),
            ("grid spacing height", self.grid_spacing.y),
            ("grid origin x", self.grid_origin_x),
            ("grid row offset", self.grid_row_offset),
        ];
        for (name, value) in offsets {
            if !value.is_finite() {
                return Err(Error::InvalidSettings(format!("{name} must be finite")));
            }
        }
        if self.grid_spacing.x < 0.0 || self.grid_spacing.y < 0.0 {
            return Err(Error::InvalidSettings("grid spacing cannot be negative".into()));
        }

        if self.grid_rows == 0 || self.grid_cols == 0 {
            return Err(Error::InvalidSettings(format!(
                "grid needs at least one row and column, got {}x{}",
                self.grid_rows, self.grid_cols
            )));
        }

        let half = self.scene_size * 0.5;
        let half_block = self.block_size * 0.5;
        let left = self.grid_origin_x - half_block.x;
        let right = self.grid_origin_x
            + (self.grid_cols - 1) as f32 * self.column_step()
            + half_block.x;
        let bottom = self.grid_row_offset - half_block.y;
        let top = self.grid_row_offset + (self.grid_rows - 1) as f32 * self.row_step() + half_block.y;
        if left < -half.x || right > half.x || bottom < -half.y || top > half.y {
            return Err(Error::InvalidSettings(format!(
                "block grid [{left}, {right}] x [{bottom}, {top}] does not fit the scene"
            )));
        }

        if self.player_position.x.abs() > half.x || self.player_position.y.abs() > half.y {
            return Err(Error::InvalidSettings(format!(
                "player position {} is outside the scene",
                self.player_position
            )));
        }

        Ok(())
    }
}
