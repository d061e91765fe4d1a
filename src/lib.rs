//! Tilehop - a tile-based side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Per-tick simulation (world, player, collisions, camera)
//! - `app`: Game state machine and application context
//! - `levels`: Level registry and level file loading
//! - `services`: Renderer/audio/widget contracts the core calls out to
//! - `render`: Scene emission through the renderer contract
//! - `settings`: Player-facing configuration
//! - `assets`: Startup check that every listed asset file exists

pub mod app;
pub mod assets;
pub mod error;
pub mod levels;
pub mod render;
pub mod services;
pub mod settings;
pub mod sim;

pub use app::{App, FrameOutcome, GamePhase, LevelRef};
pub use error::{AssetError, LevelError, SettingsError};
pub use levels::LevelRegistry;
pub use settings::{Cheats, Settings};

/// Game configuration constants
pub mod consts {
    /// Logical screen size in pixels
    pub const SCREEN_WIDTH: i32 = 1000;
    pub const SCREEN_HEIGHT: i32 = 900;

    /// Fixed frame rate, one simulation tick per frame
    pub const FPS: u32 = 60;

    /// Tiles across one screen width
    pub const TILE_COUNT: i32 = 20;
    pub const TILE_SIZE: i32 = SCREEN_WIDTH / TILE_COUNT;

    /// Player hitbox (smaller than the sprite)
    pub const PLAYER_WIDTH: i32 = 45;
    pub const PLAYER_HEIGHT: i32 = 80;
    /// Player sprite size and its offset from the hitbox origin
    pub const PLAYER_SPRITE_WIDTH: i32 = 60;
    pub const PLAYER_SPRITE_HEIGHT: i32 = 90;
    pub const PLAYER_SPRITE_OFFSET: (i32, i32) = (-7, -10);
    /// Spawn point in screen space
    pub const PLAYER_SPAWN: (i32, i32) = (300, SCREEN_HEIGHT - 500);

    pub const MAX_HEALTH: u8 = 5;
    /// Ticks of invulnerability after taking damage
    pub const DAMAGE_COOLDOWN_TICKS: u32 = FPS;

    /// Horizontal walk speed (px/tick)
    pub const WALK_SPEED: i32 = 5;
    /// Walk stride frame switches every this many held-key ticks
    pub const STRIDE_TICKS: u32 = FPS / 6;

    pub const JUMP_VELOCITY: i32 = -21;
    /// Jump while holding the modifier key
    pub const SHORT_JUMP_VELOCITY: i32 = -16;
    pub const GRAVITY: i32 = 1;
    pub const MAX_FALL_SPEED: i32 = 10;
    pub const GLIDE_FALL_SPEED: i32 = 3;
    /// Ticks before the wings switch to the fully-open frame
    pub const WING_OPEN_TICKS: u32 = FPS / 10;
    /// Flight cheat: upward acceleration and speed cap
    pub const FLIGHT_ACCEL: i32 = 2;
    pub const FLIGHT_MAX_RISE: i32 = -10;

    /// Camera pins the player once they pass this screen x
    pub const SCROLL_DEADZONE_X: i32 = 375;
    pub const MAX_SCROLL: i32 = 3000;

    /// Moving-platform contact bands
    pub const PLATFORM_SIDE_BAND: i32 = 15;
    pub const PLATFORM_BOTTOM_BAND: i32 = 15;
    pub const PLATFORM_TOP_BAND: i32 = 20;

    /// Spike ball swing (px either side of spawn)
    pub const SPIKE_BALL_RANGE: i32 = 50;
    /// Spike ball frame toggles when its counter is a multiple of this
    pub const SPIKE_BALL_FRAME_TICKS: i32 = 10;
    /// Coin animation
    pub const COIN_FRAMES: u32 = 6;
    pub const COIN_FRAME_TICKS: u32 = FPS / 8;

    /// Number of builtin levels
    pub const LEVEL_COUNT: usize = 4;
    /// Background music tracks (1-based file numbering)
    pub const MUSIC_TRACKS: u32 = 4;
}
