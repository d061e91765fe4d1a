//! Player controller
//!
//! Turns a tick's input into a proposed displacement, integrates vertical
//! velocity (gravity, glide or debug flight), tracks health with damage
//! i-frames and picks the body/wing images to draw.

use serde::{Deserialize, Serialize};

use super::collision::Resolution;
use super::geometry::Rect;
use super::tick::{Rules, TickInput};
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Body image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Pose {
    #[default]
    Stand,
    StrideA,
    StrideB,
    Rising,
    Falling,
}

/// Wing image shown while gliding (or while the wings fold back up)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WingFrame {
    Half,
    Open,
}

/// High-level movement state, recomputed every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotionState {
    #[default]
    Idle,
    Walking,
    Rising,
    Falling,
    Gliding,
    /// Debug flight cheat
    Flying,
    Dead,
}

/// Which vertical integration rule ran this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
enum VerticalMode {
    #[default]
    Gravity,
    Glide,
    Flight,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Hitbox in world space
    pub rect: Rect,
    /// Pixels per tick, positive is down
    pub vel_y: i32,
    pub health: u8,
    /// Ticks of damage immunity left
    pub damage_cooldown: u32,
    pub facing: Facing,
    pub pose: Pose,
    pub state: MotionState,
    /// Landed on something this tick; jumping checks last tick's value
    pub grounded: bool,
    pub wings: Option<WingFrame>,
    /// Horizontal intent from this tick's input, before collision
    walk_dx: i32,
    walk_timer: u32,
    wing_timer: u32,
    mode: VerticalMode,
}

impl Player {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            rect: Rect::new(x, y, PLAYER_WIDTH, PLAYER_HEIGHT),
            vel_y: 0,
            health: MAX_HEALTH,
            damage_cooldown: 0,
            facing: Facing::Right,
            pose: Pose::Stand,
            state: MotionState::Idle,
            grounded: false,
            wings: None,
            walk_dx: 0,
            walk_timer: 0,
            wing_timer: 0,
            mode: VerticalMode::Gravity,
        }
    }

    /// Player at the level start position
    pub fn spawn() -> Self {
        Self::new(PLAYER_SPAWN.0, PLAYER_SPAWN.1)
    }

    /// Where the body sprite is drawn relative to the hitbox
    pub fn sprite_rect(&self) -> Rect {
        Rect::new(
            self.rect.x + PLAYER_SPRITE_OFFSET.0,
            self.rect.y + PLAYER_SPRITE_OFFSET.1,
            PLAYER_SPRITE_WIDTH,
            PLAYER_SPRITE_HEIGHT,
        )
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Horizontal intent for this tick; also advances the stride animation
    pub fn walk(&mut self, input: &TickInput) -> i32 {
        let mut dx = 0;
        if input.left {
            dx -= WALK_SPEED;
            self.walk_timer += 1;
            self.facing = Facing::Left;
        }
        if input.right {
            dx += WALK_SPEED;
            self.walk_timer += 1;
            self.facing = Facing::Right;
        }

        self.walk_dx = dx;
        if dx == 0 {
            self.pose = Pose::Stand;
        } else if self.walk_timer >= STRIDE_TICKS {
            self.walk_timer = 0;
            self.pose = if self.pose != Pose::StrideA {
                Pose::StrideA
            } else {
                Pose::StrideB
            };
        }
        dx
    }

    /// Start a jump if standing on something last tick. Returns true on jump.
    pub fn try_jump(&mut self, input: &TickInput) -> bool {
        if !(input.jump_pressed && self.grounded) {
            return false;
        }
        self.vel_y = if input.modifier_held {
            SHORT_JUMP_VELOCITY
        } else {
            JUMP_VELOCITY
        };
        true
    }

    /// Apply flight, glide or gravity to the vertical velocity
    pub fn integrate_vertical(&mut self, input: &TickInput, rules: &Rules) {
        self.wings = None;
        self.mode = if rules.flight && input.jump_held {
            VerticalMode::Flight
        } else if rules.wings && input.jump_held {
            VerticalMode::Glide
        } else {
            VerticalMode::Gravity
        };

        match self.mode {
            VerticalMode::Flight => {
                if self.vel_y > FLIGHT_MAX_RISE {
                    self.vel_y -= FLIGHT_ACCEL;
                } else {
                    self.vel_y = FLIGHT_MAX_RISE;
                }
            }
            VerticalMode::Glide => {
                if self.vel_y < 0 {
                    // Still rising from the jump
                    self.vel_y += GRAVITY;
                } else {
                    if self.wing_timer < WING_OPEN_TICKS {
                        self.wing_timer += 1;
                        self.wings = Some(WingFrame::Half);
                    } else {
                        self.wings = Some(WingFrame::Open);
                    }
                    self.vel_y = GLIDE_FALL_SPEED;
                }
            }
            VerticalMode::Gravity => {
                // Fold the wings back
                if rules.wings && self.wing_timer > 0 {
                    self.wing_timer -= 1;
                    self.wings = Some(WingFrame::Half);
                }
                if self.vel_y < MAX_FALL_SPEED {
                    self.vel_y += GRAVITY;
                } else {
                    self.vel_y = MAX_FALL_SPEED;
                }
            }
        }
    }

    /// Take the resolver's verdict and pick this tick's images and state
    pub fn finish_motion(&mut self, res: &Resolution) {
        self.vel_y = res.vel_y;
        self.grounded = res.grounded;

        if self.vel_y <= 0 {
            self.pose = Pose::Rising;
        } else if !self.grounded {
            self.pose = Pose::Falling;
        }

        self.state = if self.is_dead() {
            MotionState::Dead
        } else {
            match self.mode {
                VerticalMode::Flight => MotionState::Flying,
                VerticalMode::Glide if self.wings.is_some() => MotionState::Gliding,
                _ if self.grounded && self.walk_dx != 0 => MotionState::Walking,
                _ if self.grounded => MotionState::Idle,
                _ if self.vel_y <= 0 => MotionState::Rising,
                _ => MotionState::Falling,
            }
        };
    }

    /// Lose one health point unless still immune. Returns true if damaged.
    pub fn take_damage(&mut self) -> bool {
        if self.damage_cooldown != 0 {
            return false;
        }
        self.health = self.health.saturating_sub(1);
        self.damage_cooldown = DAMAGE_COOLDOWN_TICKS;
        if self.is_dead() {
            self.state = MotionState::Dead;
        }
        true
    }

    pub fn tick_cooldown(&mut self) {
        self.damage_cooldown = self.damage_cooldown.saturating_sub(1);
    }

    pub fn kill(&mut self) {
        self.health = 0;
        self.state = MotionState::Dead;
    }
}
