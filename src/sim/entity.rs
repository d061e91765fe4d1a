//! Level entities
//!
//! Every entity is a bounding box plus a kind. Kind-specific state (platform
//! motion, animation frames) lives inside the variant and is advanced by
//! [`Entity::tick`].

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::grid::TileCode;
use super::kinematics::{Axis, Oscillator};
use crate::consts::*;

/// Visual variant of a static block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockStyle {
    Dirt,
    GrassLeft,
    GrassCenter,
    GrassRight,
    GrassPlatformLeft,
    GrassPlatformCenter,
    GrassPlatformRight,
}

/// Which way a spike points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpikeFacing {
    /// Sits in the lower half of its tile, points up
    Up,
    /// Hangs in the upper half of its tile, points down
    Down,
}

/// A platform sliding one tile either way along an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovingPlatform {
    pub axis: Axis,
    pub motion: Oscillator,
    /// Displacement applied on the most recent tick
    pub last_step: i32,
}

impl MovingPlatform {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            motion: Oscillator::new(TILE_SIZE),
            last_step: 0,
        }
    }

    /// Displacement vector of the most recent tick
    pub fn velocity(&self) -> IVec2 {
        match self.axis {
            Axis::Horizontal => IVec2::new(self.last_step, 0),
            Axis::Vertical => IVec2::new(0, self.last_step),
        }
    }
}

/// Swinging spiked ball hazard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpikeBall {
    pub motion: Oscillator,
    pub frame: u32,
}

/// Spinning collectible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Coin {
    pub frame: u32,
    pub timer: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Block(BlockStyle),
    MovingPlatform(MovingPlatform),
    SpikeBall(SpikeBall),
    Spike(SpikeFacing),
    Coin(Coin),
    GoalFlag,
}

/// A placed level entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    /// Collision box in world space
    pub rect: Rect,
    pub kind: EntityKind,
}

impl Entity {
    /// Place the entity for `code` in the tile at (column, row)
    pub fn spawn(id: u32, code: TileCode, column: usize, row: usize) -> Self {
        let x = column as i32 * TILE_SIZE;
        let y = row as i32 * TILE_SIZE;
        let tile = |style| (Rect::new(x, y, TILE_SIZE, TILE_SIZE), EntityKind::Block(style));

        let (rect, kind) = match code {
            TileCode::Dirt => tile(BlockStyle::Dirt),
            TileCode::GrassLeft => tile(BlockStyle::GrassLeft),
            TileCode::GrassCenter => tile(BlockStyle::GrassCenter),
            TileCode::GrassRight => tile(BlockStyle::GrassRight),
            TileCode::GrassPlatformLeft => tile(BlockStyle::GrassPlatformLeft),
            TileCode::GrassPlatformCenter => tile(BlockStyle::GrassPlatformCenter),
            TileCode::GrassPlatformRight => tile(BlockStyle::GrassPlatformRight),
            // Half-height collision box so the top surface is the landable part
            TileCode::PlatformHorizontal => (
                Rect::new(x, y + 1, TILE_SIZE, TILE_SIZE / 2),
                EntityKind::MovingPlatform(MovingPlatform::new(Axis::Horizontal)),
            ),
            TileCode::PlatformVertical => (
                Rect::new(x, y + 1, TILE_SIZE, TILE_SIZE / 2),
                EntityKind::MovingPlatform(MovingPlatform::new(Axis::Vertical)),
            ),
            TileCode::SpikeBall => (
                Rect::new(x + 2, y + 13, TILE_SIZE, TILE_SIZE),
                EntityKind::SpikeBall(SpikeBall {
                    motion: Oscillator::new(SPIKE_BALL_RANGE),
                    frame: 0,
                }),
            ),
            TileCode::SpikeUp => (
                Rect::new(x + 2, y + TILE_SIZE / 2, TILE_SIZE, TILE_SIZE / 2),
                EntityKind::Spike(SpikeFacing::Up),
            ),
            TileCode::SpikeDown => (
                Rect::new(x + 2, y, TILE_SIZE, TILE_SIZE / 2),
                EntityKind::Spike(SpikeFacing::Down),
            ),
            TileCode::Coin => (
                Rect::new(x, y, TILE_SIZE, TILE_SIZE),
                EntityKind::Coin(Coin::default()),
            ),
            TileCode::GoalFlag => (
                Rect::new(x, y - TILE_SIZE / 2 + 5, TILE_SIZE, TILE_SIZE * 3 / 2),
                EntityKind::GoalFlag,
            ),
        };

        Self { id, rect, kind }
    }

    pub fn bounding_box(&self) -> Rect {
        self.rect
    }

    /// Area the renderer should fill (platform art is a full tile tall)
    pub fn sprite_rect(&self) -> Rect {
        match self.kind {
            EntityKind::MovingPlatform(_) => Rect {
                h: TILE_SIZE,
                ..self.rect
            },
            _ => self.rect,
        }
    }

    /// Current animation frame
    pub fn frame(&self) -> u32 {
        match self.kind {
            EntityKind::SpikeBall(ball) => ball.frame,
            EntityKind::Coin(coin) => coin.frame,
            _ => 0,
        }
    }

    pub fn is_hazard(&self) -> bool {
        matches!(self.kind, EntityKind::SpikeBall(_) | EntityKind::Spike(_))
    }

    pub fn is_static_block(&self) -> bool {
        matches!(self.kind, EntityKind::Block(_))
    }

    pub fn as_platform(&self) -> Option<&MovingPlatform> {
        match &self.kind {
            EntityKind::MovingPlatform(platform) => Some(platform),
            _ => None,
        }
    }

    /// Advance motion and animation by one tick
    pub fn tick(&mut self) {
        match &mut self.kind {
            EntityKind::MovingPlatform(platform) => {
                let step = platform.motion.step();
                platform.last_step = step;
                match platform.axis {
                    Axis::Horizontal => self.rect.x += step,
                    Axis::Vertical => self.rect.y += step,
                }
            }
            EntityKind::SpikeBall(ball) => {
                self.rect.x += ball.motion.step();
                if ball.motion.counter % SPIKE_BALL_FRAME_TICKS == 0 {
                    ball.frame ^= 1;
                }
            }
            EntityKind::Coin(coin) => {
                coin.timer += 1;
                if coin.timer >= COIN_FRAME_TICKS {
                    coin.timer = 0;
                    coin.frame = (coin.frame + 1) % COIN_FRAMES;
                }
            }
            EntityKind::Block(_) | EntityKind::Spike(_) | EntityKind::GoalFlag => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_offsets() {
        let block = Entity::spawn(1, TileCode::Dirt, 2, 3);
        assert_eq!(block.rect, Rect::new(100, 150, 50, 50));

        let platform = Entity::spawn(2, TileCode::PlatformVertical, 1, 1);
        assert_eq!(platform.rect, Rect::new(50, 51, 50, 25));
        assert_eq!(platform.sprite_rect().h, 50);

        let spike = Entity::spawn(3, TileCode::SpikeUp, 0, 0);
        assert_eq!(spike.rect, Rect::new(2, 25, 50, 25));

        let hanging = Entity::spawn(4, TileCode::SpikeDown, 0, 0);
        assert_eq!(hanging.rect, Rect::new(2, 0, 50, 25));

        let ball = Entity::spawn(5, TileCode::SpikeBall, 0, 0);
        assert_eq!(ball.rect, Rect::new(2, 13, 50, 50));

        let flag = Entity::spawn(6, TileCode::GoalFlag, 0, 2);
        assert_eq!(flag.rect, Rect::new(0, 80, 50, 75));
    }

    #[test]
    fn test_platform_moves_along_its_axis() {
        let mut horizontal = Entity::spawn(1, TileCode::PlatformHorizontal, 4, 4);
        let mut vertical = Entity::spawn(2, TileCode::PlatformVertical, 4, 4);
        for _ in 0..10 {
            horizontal.tick();
            vertical.tick();
        }
        assert_eq!(horizontal.rect.x, 210);
        assert_eq!(horizontal.rect.y, 201);
        assert_eq!(vertical.rect.x, 200);
        assert_eq!(vertical.rect.y, 211);
        assert_eq!(horizontal.as_platform().map(|p| p.velocity()), Some(IVec2::new(1, 0)));
    }

    #[test]
    fn test_spike_ball_frame_toggles_every_ten_ticks() {
        let mut ball = Entity::spawn(1, TileCode::SpikeBall, 0, 0);
        let mut frames = Vec::new();
        for _ in 0..30 {
            ball.tick();
            frames.push(ball.frame());
        }
        assert_eq!(frames[8], 0);
        assert_eq!(frames[9], 1);
        assert_eq!(frames[18], 1);
        assert_eq!(frames[19], 0);
    }

    #[test]
    fn test_coin_cycles_six_frames() {
        let mut coin = Entity::spawn(1, TileCode::Coin, 0, 0);
        for _ in 0..COIN_FRAME_TICKS * COIN_FRAMES {
            coin.tick();
        }
        assert_eq!(coin.frame(), 0);
        coin.tick();
        assert_eq!(coin.frame(), 0);
        for _ in 1..COIN_FRAME_TICKS {
            coin.tick();
        }
        assert_eq!(coin.frame(), 1);
    }

    #[test]
    fn test_hazard_classification() {
        assert!(Entity::spawn(1, TileCode::SpikeBall, 0, 0).is_hazard());
        assert!(Entity::spawn(1, TileCode::SpikeDown, 0, 0).is_hazard());
        assert!(!Entity::spawn(1, TileCode::Coin, 0, 0).is_hazard());
        assert!(Entity::spawn(1, TileCode::GrassRight, 0, 0).is_static_block());
        assert!(!Entity::spawn(1, TileCode::PlatformHorizontal, 0, 0).is_static_block());
    }
}
