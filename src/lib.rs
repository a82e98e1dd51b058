//! Tap Breaker - a tap-to-fire brick breaker
//!
//! Core modules:
//! - `sim`: Scene graph, actions, contact detection and the scene controller
//! - `settings`: Data-driven scene layout and projectile tuning
//! - `error`: Crate error type

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (display-synced 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the host accepts before clamping (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Scene dimensions (origin at the centre)
    pub const SCENE_WIDTH: f32 = 750.0;
    pub const SCENE_HEIGHT: f32 = 1334.0;

    /// Player marker
    pub const PLAYER_X: f32 = 0.0;
    pub const PLAYER_Y: f32 = -350.0;
    pub const PLAYER_SIZE: f32 = 50.0;
    pub const PLAYER_CORNER_FACTOR: f32 = 0.3;

    /// Block grid
    pub const BLOCK_SIZE: f32 = 50.0;
    pub const GRID_SPACING: f32 = 12.0;
    pub const GRID_ROWS: u32 = 5;
    pub const GRID_COLS: u32 = 6;
    pub const GRID_ORIGIN_X: f32 = -155.0;
    pub const GRID_ROW_OFFSET: f32 = -50.0;

    /// Projectile
    pub const PROJECTILE_SIZE: f32 = 25.0;
    /// Length of the travel path from the player (scene units)
    pub const PROJECTILE_RANGE: f32 = 2000.0;
    /// Time to cover the travel path (seconds)
    pub const PROJECTILE_TRAVEL_TIME: f32 = 2.5;
}

/// Node name tags
pub mod names {
    pub const WALL: &str = "Wall";
    pub const BLOCK: &str = "Block";
    pub const PROJECTILE: &str = "Projectile";
    pub const PLAYER: &str = "Player";
}

/// Axis-aligned rectangle overlap test (touching edges count as overlap)
#[inline]
pub fn rects_overlap(a_center: Vec2, a_size: Vec2, b_center: Vec2, b_size: Vec2) -> bool {
    let delta = (a_center - b_center).abs();
    let reach = (a_size + b_size) * 0.5;
    delta.x <= reach.x && delta.y <= reach.y
}
