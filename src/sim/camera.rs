//! Horizontal scrolling camera
//!
//! The player walks freely on screen until reaching the deadzone line, then
//! stays pinned there while the level scrolls underneath. Near the level
//! edges (offset would leave `[0, MAX_SCROLL]`) the camera stops and the
//! player moves on screen again.

use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;

/// How this tick's horizontal displacement was presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMove {
    /// Player moved on screen (or stood still), camera stayed put
    Player,
    /// Camera scrolled, player's screen position unchanged
    Scroll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Camera {
    /// World x shown at screen x = 0
    pub offset: i32,
}

impl Camera {
    /// Apply a horizontal displacement for a player currently at `screen_x`
    pub fn follow(&mut self, screen_x: i32, dx: i32) -> CameraMove {
        let target = self.offset + dx;
        let moves_player = dx == 0
            || target < 0
            || target > MAX_SCROLL
            || (dx < 0 && screen_x + dx > SCROLL_DEADZONE_X)
            || (dx > 0 && screen_x + dx < SCROLL_DEADZONE_X);

        if moves_player {
            CameraMove::Player
        } else {
            self.offset = target;
            CameraMove::Scroll
        }
    }

    pub fn to_screen_x(&self, world_x: i32) -> i32 {
        world_x - self.offset
    }

    pub fn to_screen(&self, rect: Rect) -> Rect {
        Rect {
            x: self.to_screen_x(rect.x),
            ..rect
        }
    }
}
