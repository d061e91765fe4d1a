//! Moving-entity kinematics
//!
//! Platforms and spike balls swing back and forth around their spawn point,
//! one pixel per tick. The counter runs up to `range`, then direction flips
//! and the counter is negated, so the entity sweeps a full `±range` triangle
//! wave with period `4 * range`.

use serde::{Deserialize, Serialize};

/// Axis a moving platform travels along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// One-pixel-per-tick back-and-forth motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Oscillator {
    /// +1 or -1
    pub direction: i32,
    pub counter: i32,
    pub range: i32,
    /// Displacement from spawn
    pub offset: i32,
}

impl Oscillator {
    pub fn new(range: i32) -> Self {
        Self {
            direction: 1,
            counter: 0,
            range,
            offset: 0,
        }
    }

    /// Advance one tick and return the displacement applied this tick
    pub fn step(&mut self) -> i32 {
        let delta = self.direction;
        self.offset += delta;
        self.counter += 1;
        if self.counter >= self.range {
            self.direction = -self.direction;
            self.counter = -self.counter;
        }
        delta
    }
}
