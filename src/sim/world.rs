//! The loaded level: entities, camera and score

use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::entity::{Entity, EntityKind, MovingPlatform};
use super::geometry::Rect;
use super::grid::TileGrid;

/// Everything placed in one level instance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    /// Entities in spawn order (stable iteration)
    pub entities: Vec<Entity>,
    pub camera: Camera,
    /// Coins collected this run
    pub score: u32,
    next_id: u32,
}

impl World {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Build a world from a tile grid, placing one entity per known tile code
    pub fn from_grid(grid: &TileGrid) -> Self {
        let mut world = Self::new();
        for (column, row, code) in grid.tiles() {
            let id = world.next_entity_id();
            world.entities.push(Entity::spawn(id, code, column, row));
        }

        log::info!(
            "World built: {} entities ({} blocks, {} platforms, {} hazards, {} coins, {} goals)",
            world.entities.len(),
            world.entities.iter().filter(|e| e.is_static_block()).count(),
            world.platforms().count(),
            world.entities.iter().filter(|e| e.is_hazard()).count(),
            world.coins_remaining(),
            world.goal_count(),
        );
        world
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Advance every entity's motion and animation by one tick
    pub fn tick_entities(&mut self) {
        for entity in &mut self.entities {
            entity.tick();
        }
    }

    pub fn platforms(&self) -> impl Iterator<Item = (Rect, &MovingPlatform)> + '_ {
        self.entities
            .iter()
            .filter_map(|e| e.as_platform().map(|p| (e.rect, p)))
    }

    pub fn static_blocks(&self) -> impl Iterator<Item = Rect> + '_ {
        self.entities
            .iter()
            .filter(|e| e.is_static_block())
            .map(|e| e.rect)
    }

    pub fn touches_hazard(&self, rect: &Rect) -> bool {
        self.entities
            .iter()
            .any(|e| e.is_hazard() && e.rect.overlaps(rect))
    }

    pub fn touches_goal(&self, rect: &Rect) -> bool {
        self.entities
            .iter()
            .any(|e| matches!(e.kind, EntityKind::GoalFlag) && e.rect.overlaps(rect))
    }

    /// Remove every coin overlapping `rect`, add them to the score and
    /// return how many were taken. Removed coins are gone for good.
    pub fn collect_coins(&mut self, rect: &Rect) -> u32 {
        let before = self.entities.len();
        self.entities
            .retain(|e| !(matches!(e.kind, EntityKind::Coin(_)) && e.rect.overlaps(rect)));
        let collected = (before - self.entities.len()) as u32;
        self.score += collected;
        collected
    }

    pub fn coins_remaining(&self) -> usize {
        self.entities
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::Coin(_)))
            .count()
    }

    pub fn goal_count(&self) -> usize {
        self.entities
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::GoalFlag))
            .count()
    }
}
