//! Player-vs-level collision resolution
//!
//! Each tick the player proposes a displacement. Every blocking entity gets a
//! chance to correct it, moving platforms first and static blocks second, so a
//! player squeezed between a platform and a block ends up passing through the
//! platform instead of getting stuck. Some levels rely on that to jump up
//! through vertical platforms.
//!
//! Per entity only one axis is resolved: if the horizontally displaced box
//! overlaps, the vertical test is skipped for that entity. Near fast vertical
//! platforms this can let the player sink into the platform for a tick when a
//! fall turns into a glide right at contact; the order is kept as is because
//! existing levels are tuned against it.

use glam::IVec2;

use super::geometry::Rect;
use super::world::World;
use crate::consts::*;

/// Corrected motion for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Displacement to apply this tick
    pub delta: IVec2,
    /// Vertical velocity after head bumps
    pub vel_y: i32,
    /// Standing on something this tick
    pub grounded: bool,
}

/// A moving platform as seen by the resolver: its box and last-tick motion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformContact {
    pub rect: Rect,
    pub velocity: IVec2,
}

/// Resolve `delta` for `player` against everything solid in `world`
pub fn resolve(player: Rect, delta: IVec2, vel_y: i32, world: &World) -> Resolution {
    let platforms: Vec<PlatformContact> = world
        .platforms()
        .map(|(rect, platform)| PlatformContact {
            rect,
            velocity: platform.velocity(),
        })
        .collect();
    let blocks: Vec<Rect> = world.static_blocks().collect();
    resolve_against(player, delta, vel_y, &platforms, &blocks)
}

/// Resolve against explicit platform and block lists
pub fn resolve_against(
    player: Rect,
    delta: IVec2,
    vel_y: i32,
    platforms: &[PlatformContact],
    blocks: &[Rect],
) -> Resolution {
    let mut res = Resolution {
        delta,
        vel_y,
        grounded: false,
    };

    for platform in platforms {
        resolve_platform(player, platform, &mut res);
    }
    for block in blocks {
        resolve_block(player, block, &mut res);
    }

    res
}

/// Platforms clamp to the exact contact distance, within tolerance bands
fn resolve_platform(player: Rect, platform: &PlatformContact, res: &mut Resolution) {
    let p = &platform.rect;

    if p.overlaps(&player.offset(IVec2::new(res.delta.x, 0))) {
        // Approaching the platform's left side
        if player.right() + res.delta.x - p.left() < PLATFORM_SIDE_BAND {
            res.delta.x = p.left() - player.right();
        }
        // Approaching its right side
        if p.right() - player.left() + res.delta.x < PLATFORM_SIDE_BAND {
            res.delta.x = p.right() - player.left();
        }
    } else if p.overlaps(&player.offset(IVec2::new(0, res.delta.y))) {
        if p.bottom() - player.top() + res.delta.y < PLATFORM_BOTTOM_BAND {
            // Head hits the underside
            res.vel_y = 0;
            res.delta.y = p.bottom() - player.top();
        } else if player.bottom() + res.delta.y - p.top() < PLATFORM_TOP_BAND {
            // Land one pixel above the surface and ride along
            res.delta.y = p.top() - player.bottom() - 1;
            res.grounded = true;
            res.delta.x += platform.velocity.x;
        }
    }
}

/// Static blocks stop horizontal motion outright
fn resolve_block(player: Rect, block: &Rect, res: &mut Resolution) {
    if block.overlaps(&player.offset(IVec2::new(res.delta.x, 0))) {
        res.delta.x = 0;
    } else if block.overlaps(&player.offset(IVec2::new(0, res.delta.y))) {
        if res.vel_y < 0 {
            res.delta.y = block.bottom() - player.top();
            res.vel_y = 0;
        } else {
            res.delta.y = block.top() - player.bottom();
            res.grounded = true;
        }
    }
}
