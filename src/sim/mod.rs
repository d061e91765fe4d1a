//! Per-tick platformer simulation
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One tick per frame, integer pixel math only
//! - Stable iteration order (entity spawn order)
//! - No rendering, audio or platform dependencies

pub mod camera;
pub mod collision;
pub mod entity;
pub mod geometry;
pub mod grid;
pub mod kinematics;
pub mod player;
pub mod tick;
pub mod world;

pub use camera::{Camera, CameraMove};
pub use collision::{PlatformContact, Resolution, resolve, resolve_against};
pub use entity::{BlockStyle, Coin, Entity, EntityKind, MovingPlatform, SpikeBall, SpikeFacing};
pub use geometry::Rect;
pub use grid::{TileCode, TileGrid};
pub use kinematics::{Axis, Oscillator};
pub use player::{Facing, MotionState, Player, Pose, WingFrame};
pub use tick::{Rules, TickInput, TickReport, tick};
pub use world::World;
