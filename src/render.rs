//! Scene emission
//!
//! Walks the app state and tells the [`Renderer`] what to draw. World-space
//! rectangles are converted to screen space with the camera here; nothing in
//! the simulation knows about the screen.

use glam::IVec2;

use crate::app::{App, GamePhase};
use crate::consts::*;
use crate::levels::LevelRegistry;
use crate::services::{DrawKind, Renderer, Widget};
use crate::settings::Settings;
use crate::sim::{Camera, EntityKind, Player, Rect, World};

const SCREEN: Rect = Rect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT);

// HUD layout
const COIN_ICON: Rect = Rect::new(5, 10, 50, 50);
const SCORE_POS: IVec2 = IVec2::new(60, 20);
const HEART_X: i32 = 400;
const HEART_Y: i32 = 3;
const HEART_SPACING: i32 = 38;
const HEART_SIZE: i32 = 35;
const FPS_POS: IVec2 = IVec2::ZERO;

// Overlay panels
const MENU_PANEL: Rect = Rect::new(125, 125, 750, 750);
const VICTORY_PANEL: Rect = Rect::new(275, 500, 450, 350);
const LEVEL_LABEL_POS: IVec2 = IVec2::new(SCREEN_WIDTH / 2 - 75, SCREEN_HEIGHT / 2);
const SCORE_LABEL_POS: IVec2 = IVec2::new(SCREEN_WIDTH / 2 - 100, 11 * SCREEN_HEIGHT / 20);

// Wings hang from the player's shoulders, centered on the hitbox
const WING_WIDTH: i32 = 80;
const WING_HEIGHT: i32 = 50;
const WING_DROP: i32 = 10;

/// Emit everything for the current frame
pub fn draw_frame(app: &App, fps: u32, r: &mut dyn Renderer) {
    let settings = app.settings();
    match app.phase() {
        GamePhase::MainMenu => {
            r.draw_entity(DrawKind::MenuBackground, SCREEN, 0);
            draw_main_menu(r);
        }
        GamePhase::LevelSelect => {
            r.draw_entity(DrawKind::MenuBackground, SCREEN, 0);
            draw_level_select(app.registry(), r);
        }
        GamePhase::SettingsMenu => {
            r.draw_entity(DrawKind::MenuBackground, SCREEN, 0);
            r.draw_entity(DrawKind::MenuPanel, MENU_PANEL, 0);
            draw_toggles(settings, r);
            r.draw_widget(Widget::MainMenu, "Main Menu", true);
        }
        // Never visible: loading finishes within the frame
        GamePhase::LevelLoading => {}
        GamePhase::Playing { paused } => {
            draw_scene(app, false, r);
            if paused {
                r.draw_entity(DrawKind::MenuPanel, MENU_PANEL, 0);
                draw_toggles(settings, r);
                if let Some(label) = app.level_label() {
                    r.draw_text(&label, LEVEL_LABEL_POS);
                }
                r.draw_widget(Widget::Restart, "Restart", true);
                r.draw_widget(Widget::Back, "Back", true);
                r.draw_widget(Widget::MainMenu, "Main Menu", true);
            } else {
                r.draw_widget(Widget::Pause, "Pause", true);
            }
        }
        GamePhase::Victory => {
            draw_scene(app, false, r);
            r.draw_entity(DrawKind::MenuPanel, VICTORY_PANEL, 0);
            r.draw_text(&format!("Score: {}", app.world().score), SCORE_LABEL_POS);
            r.draw_widget(Widget::MainMenu, "Main Menu", true);
            if app.next_level().is_some() {
                r.draw_widget(Widget::NextLevel, "Next Level", true);
            }
        }
        GamePhase::Death => {
            draw_scene(app, true, r);
            r.draw_widget(Widget::Restart, "Restart", true);
            r.draw_widget(Widget::MainMenu, "Main Menu", true);
        }
    }

    if settings.show_fps {
        r.draw_text(&format!("FPS: {fps}"), FPS_POS);
    }
}

fn draw_main_menu(r: &mut dyn Renderer) {
    r.draw_widget(Widget::Levels, "Start", true);
    r.draw_widget(Widget::CustomLevel, "Custom Level", true);
    r.draw_widget(Widget::Settings, "Settings", true);
    r.draw_widget(Widget::Quit, "Quit", true);
}

fn draw_level_select(registry: &LevelRegistry, r: &mut dyn Renderer) {
    for index in 0..registry.len() {
        if registry.is_unlocked(index) {
            r.draw_widget(Widget::LevelSlot(index), &format!("Level {}", index + 1), true);
        } else {
            r.draw_widget(Widget::LevelSlot(index), "LOCKED", false);
        }
    }
    r.draw_widget(Widget::MainMenu, "Main Menu", true);
}

/// Toggle widgets are drawn enabled when their option is on
fn draw_toggles(settings: &Settings, r: &mut dyn Renderer) {
    r.draw_widget(Widget::SoundToggle, "SoundFX ON/OFF", settings.sound_fx);
    r.draw_widget(Widget::MusicToggle, "Music ON/OFF", settings.music);
    r.draw_widget(Widget::FpsToggle, "FPS Counter ON/OFF", settings.show_fps);
}

/// Level, player, HUD and optional debug overlay
fn draw_scene(app: &App, ghost: bool, r: &mut dyn Renderer) {
    let world = app.world();
    let player = app.player();
    r.draw_entity(DrawKind::Background, SCREEN, 0);
    draw_world(world, r);
    draw_player(player, &world.camera, ghost, r);
    draw_hud(world, player, r);
    if app.settings().debug_overlay {
        draw_debug(world, player, r);
    }
}

pub fn draw_world(world: &World, r: &mut dyn Renderer) {
    for entity in &world.entities {
        let kind = match entity.kind {
            EntityKind::Block(style) => DrawKind::Block(style),
            EntityKind::MovingPlatform(_) => DrawKind::Platform,
            EntityKind::SpikeBall(_) => DrawKind::SpikeBall,
            EntityKind::Spike(facing) => DrawKind::Spike(facing),
            EntityKind::Coin(_) => DrawKind::Coin,
            EntityKind::GoalFlag => DrawKind::GoalFlag,
        };
        r.draw_entity(kind, world.camera.to_screen(entity.sprite_rect()), entity.frame());
    }
}

pub fn draw_player(player: &Player, camera: &Camera, ghost: bool, r: &mut dyn Renderer) {
    let sprite = camera.to_screen(player.sprite_rect());
    if ghost {
        let rect = Rect::new(sprite.x, sprite.y, TILE_SIZE, TILE_SIZE);
        r.draw_entity(DrawKind::Ghost { facing: player.facing }, rect, 0);
        return;
    }

    if let Some(frame) = player.wings {
        let body = camera.to_screen(player.rect);
        let wings = Rect::new(
            body.center_x() - WING_WIDTH / 2,
            body.y + WING_DROP,
            WING_WIDTH,
            WING_HEIGHT,
        );
        r.draw_entity(
            DrawKind::Wings {
                frame,
                facing: player.facing,
            },
            wings,
            0,
        );
    }
    r.draw_entity(
        DrawKind::Player {
            pose: player.pose,
            facing: player.facing,
        },
        sprite,
        0,
    );
}

pub fn draw_hud(world: &World, player: &Player, r: &mut dyn Renderer) {
    r.draw_entity(DrawKind::CoinIcon, COIN_ICON, 0);
    r.draw_text(&format!("x {}", world.score), SCORE_POS);
    for i in 0..i32::from(player.health) {
        let heart = Rect::new(HEART_X + i * HEART_SPACING, HEART_Y, HEART_SIZE, HEART_SIZE);
        r.draw_entity(DrawKind::Heart, heart, 0);
    }
}

/// Hitboxes plus tile grid lines that scroll with the camera
pub fn draw_debug(world: &World, player: &Player, r: &mut dyn Renderer) {
    for line in 1..=TILE_COUNT {
        let y = line * TILE_SIZE;
        r.draw_line(IVec2::new(0, y), IVec2::new(SCREEN_WIDTH, y));
    }
    for line in 0..=TILE_COUNT * 4 {
        let x = line * TILE_SIZE - world.camera.offset;
        r.draw_line(IVec2::new(x, 0), IVec2::new(x, SCREEN_HEIGHT));
    }

    for entity in &world.entities {
        r.draw_outline(world.camera.to_screen(entity.bounding_box()));
    }
    r.draw_outline(world.camera.to_screen(player.rect));
}
