//! One simulation tick of the Playing state
//!
//! Order matters: entity kinematics, player intent, collision resolution,
//! camera and position commit, then overlap checks against the committed
//! position, then death.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::camera::CameraMove;
use super::collision::resolve;
use super::player::Player;
use super::world::World;
use crate::consts::*;

/// Input snapshot for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Jump key went down this tick
    pub jump_pressed: bool,
    /// Jump key is held (glide / flight)
    pub jump_held: bool,
    /// Short-hop modifier is held
    pub modifier_held: bool,
}

/// Gameplay switches that come from settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    /// Glide while jump is held
    pub wings: bool,
    /// Debug flight while jump is held
    pub flight: bool,
    /// Hazards do no damage
    pub invulnerable: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            wings: true,
            flight: false,
            invulnerable: false,
        }
    }
}

/// What happened during a tick (drives audio and phase changes)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub jumped: bool,
    pub damaged: bool,
    pub coins_collected: u32,
    pub reached_goal: bool,
    pub died: bool,
    /// Walking along the ground (walk sound loop)
    pub walking_on_ground: bool,
    /// Camera scrolled instead of the player moving on screen
    pub scrolled: bool,
}

/// Advance world and player by one tick
pub fn tick(world: &mut World, player: &mut Player, input: &TickInput, rules: &Rules) -> TickReport {
    let mut report = TickReport::default();

    world.tick_entities();

    let dx = player.walk(input);
    report.jumped = player.try_jump(input);
    player.grounded = false;
    player.integrate_vertical(input, rules);

    let res = resolve(player.rect, IVec2::new(dx, player.vel_y), player.vel_y, world);
    player.finish_motion(&res);
    report.walking_on_ground = res.grounded && res.delta.x.abs() > 1;

    let screen_x = world.camera.to_screen_x(player.rect.x);
    report.scrolled = world.camera.follow(screen_x, res.delta.x) == CameraMove::Scroll;
    player.rect = player.rect.offset(res.delta);

    if !rules.invulnerable && world.touches_hazard(&player.rect) && player.take_damage() {
        report.damaged = true;
        log::debug!("Player hit, health {}", player.health);
    }
    report.coins_collected = world.collect_coins(&player.rect);
    if report.coins_collected > 0 {
        log::debug!("Collected {} coin(s), score {}", report.coins_collected, world.score);
    }
    report.reached_goal = world.touches_goal(&player.rect);
    player.tick_cooldown();

    if player.rect.top() > SCREEN_HEIGHT {
        player.kill();
    }
    report.died = player.is_dead();

    report
}
