//! Game state machine and application context
//!
//! `App` owns everything that outlives a single level attempt: the level
//! registry, settings, the music RNG and which level is being played. The
//! World and Player are rebuilt from scratch every time a level loads.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::MUSIC_TRACKS;
use crate::levels::{self, LevelRegistry};
use crate::render;
use crate::services::{Audio, Channel, PointerState, Renderer, Sound, Widget, Widgets};
use crate::settings::Settings;
use crate::sim::{Player, TickInput, TileGrid, World, tick};

/// Current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    MainMenu,
    LevelSelect,
    SettingsMenu,
    /// Transient: builds a fresh World and Player, then Playing
    LevelLoading,
    Playing { paused: bool },
    Victory,
    Death,
}

/// Which level is (or was last) being played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelRef {
    Builtin(usize),
    Custom,
}

/// Everything the frontend polled for this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub tick: TickInput,
    pub pointer: PointerState,
    /// Measured frame rate, shown by the FPS counter
    pub fps: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Quit,
}

pub struct App {
    phase: GamePhase,
    registry: LevelRegistry,
    settings: Settings,
    current: Option<LevelRef>,
    /// Last successfully loaded custom level
    custom: Option<TileGrid>,
    world: World,
    player: Player,
    rng: Pcg32,
    walk_playing: bool,
}

impl App {
    /// Create the app on the main menu and play the startup jingle
    pub fn new(registry: LevelRegistry, settings: Settings, audio: &mut dyn Audio) -> Self {
        log::info!("Starting with {} builtin level(s)", registry.len());
        audio.play(Sound::Startup);
        Self {
            phase: GamePhase::MainMenu,
            rng: Pcg32::seed_from_u64(settings.music_seed),
            registry,
            settings,
            current: None,
            custom: None,
            world: World::new(),
            player: Player::spawn(),
            walk_playing: false,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn registry(&self) -> &LevelRegistry {
        &self.registry
    }

    /// Mutable registry access (the headless runner unlocks levels directly)
    pub fn registry_mut(&mut self) -> &mut LevelRegistry {
        &mut self.registry
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn current_level(&self) -> Option<LevelRef> {
        self.current
    }

    /// "Level N" (1-based) or "Custom Level"
    pub fn level_label(&self) -> Option<String> {
        self.current.map(|level| match level {
            LevelRef::Builtin(i) => format!("Level {}", i + 1),
            LevelRef::Custom => "Custom Level".to_string(),
        })
    }

    /// Builtin level that follows the current one
    pub fn next_level(&self) -> Option<usize> {
        match self.current {
            Some(LevelRef::Builtin(i)) => self.registry.next_after(i),
            _ => None,
        }
    }

    /// Queue a level to load on the next frame. Locked levels are refused.
    pub fn select_level(&mut self, level: LevelRef) -> bool {
        if let LevelRef::Builtin(i) = level
            && !self.registry.is_unlocked(i)
        {
            log::warn!("Level {} is locked", i + 1);
            return false;
        }
        self.current = Some(level);
        self.set_phase(GamePhase::LevelLoading);
        true
    }

    /// Run one frame: phase logic, then draw
    pub fn frame(
        &mut self,
        input: &FrameInput,
        audio: &mut dyn Audio,
        widgets: &mut dyn Widgets,
        renderer: &mut dyn Renderer,
    ) -> FrameOutcome {
        self.manage_channels(audio);

        let mut outcome = FrameOutcome::Continue;
        match self.phase {
            GamePhase::MainMenu => outcome = self.update_main_menu(input, audio, widgets),
            GamePhase::LevelSelect => self.update_level_select(input, audio, widgets),
            GamePhase::SettingsMenu => self.update_settings_menu(input, audio, widgets),
            GamePhase::LevelLoading => {}
            GamePhase::Playing { paused: false } => self.update_playing(input, audio, widgets),
            GamePhase::Playing { paused: true } => self.update_paused(input, audio, widgets),
            GamePhase::Victory => self.update_victory(input, audio, widgets),
            GamePhase::Death => self.update_death(input, audio, widgets),
        }

        if self.phase == GamePhase::LevelLoading {
            self.load_current();
        }

        render::draw_frame(self, input.fps, renderer);
        outcome
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    /// Stop music outside levels and the footstep loop outside play
    fn manage_channels(&mut self, audio: &mut dyn Audio) {
        let playing = matches!(self.phase, GamePhase::Playing { .. });
        if (!playing || !self.settings.music)
            && self.phase != GamePhase::Victory
            && audio.is_music_playing()
        {
            audio.stop_channel(Channel::Music);
        }
        if (!playing || !self.settings.sound_fx) && self.walk_playing {
            self.stop_walk(audio);
        }
    }

    fn stop_walk(&mut self, audio: &mut dyn Audio) {
        audio.stop_channel(Channel::Walk);
        self.walk_playing = false;
    }

    fn sfx(&self, audio: &mut dyn Audio, sound: Sound) {
        if self.settings.sound_fx {
            audio.play(sound);
        }
    }

    /// Hit-test a widget, clicking if it fired
    fn pressed(
        &self,
        widget: Widget,
        input: &FrameInput,
        audio: &mut dyn Audio,
        widgets: &mut dyn Widgets,
    ) -> bool {
        let hit = widgets.is_activated(widget, &input.pointer);
        if hit {
            self.sfx(audio, Sound::Click);
        }
        hit
    }

    fn load_current(&mut self) {
        let world = match self.current {
            Some(LevelRef::Builtin(i)) => self.registry.grid(i).map(World::from_grid),
            Some(LevelRef::Custom) => self.custom.as_ref().map(World::from_grid),
            None => None,
        };
        match world {
            Some(world) => {
                self.world = world;
                self.player = Player::spawn();
                self.set_phase(GamePhase::Playing { paused: false });
            }
            None => {
                log::warn!("No level data for {:?}", self.current);
                self.set_phase(GamePhase::MainMenu);
            }
        }
    }

    fn update_main_menu(
        &mut self,
        input: &FrameInput,
        audio: &mut dyn Audio,
        widgets: &mut dyn Widgets,
    ) -> FrameOutcome {
        if self.pressed(Widget::Levels, input, audio, widgets) {
            self.set_phase(GamePhase::LevelSelect);
        } else if self.pressed(Widget::CustomLevel, input, audio, widgets) {
            match levels::load_custom(&self.settings.asset_root) {
                Ok(grid) => {
                    log::info!("Custom level loaded");
                    self.custom = Some(grid);
                    self.select_level(LevelRef::Custom);
                }
                Err(e) => log::warn!("Custom level unavailable: {}", e),
            }
        } else if self.pressed(Widget::Settings, input, audio, widgets) {
            self.set_phase(GamePhase::SettingsMenu);
        } else if self.pressed(Widget::Quit, input, audio, widgets) {
            log::info!("Quit requested");
            return FrameOutcome::Quit;
        }
        FrameOutcome::Continue
    }

    fn update_level_select(&mut self, input: &FrameInput, audio: &mut dyn Audio, widgets: &mut dyn Widgets) {
        for index in 0..self.registry.len() {
            if self.pressed(Widget::LevelSlot(index), input, audio, widgets)
                && self.select_level(LevelRef::Builtin(index))
            {
                return;
            }
        }
        if self.pressed(Widget::MainMenu, input, audio, widgets) {
            self.set_phase(GamePhase::MainMenu);
        }
    }

    /// Sound, music and FPS toggles (settings and pause menus)
    fn update_toggles(&mut self, input: &FrameInput, audio: &mut dyn Audio, widgets: &mut dyn Widgets) {
        if self.pressed(Widget::SoundToggle, input, audio, widgets) {
            self.settings.sound_fx = !self.settings.sound_fx;
            log::info!("Sound effects {}", on_off(self.settings.sound_fx));
        }
        if self.pressed(Widget::MusicToggle, input, audio, widgets) {
            self.settings.music = !self.settings.music;
            log::info!("Music {}", on_off(self.settings.music));
        }
        if self.pressed(Widget::FpsToggle, input, audio, widgets) {
            self.settings.show_fps = !self.settings.show_fps;
        }
    }

    fn update_settings_menu(&mut self, input: &FrameInput, audio: &mut dyn Audio, widgets: &mut dyn Widgets) {
        self.update_toggles(input, audio, widgets);
        if self.pressed(Widget::MainMenu, input, audio, widgets) {
            self.set_phase(GamePhase::MainMenu);
        }
    }

    fn start_music(&mut self, audio: &mut dyn Audio) {
        if self.settings.music && !audio.is_music_playing() {
            let track = self.rng.random_range(1..=MUSIC_TRACKS);
            audio.play(Sound::Music { track });
        }
    }

    fn update_playing(&mut self, input: &FrameInput, audio: &mut dyn Audio, widgets: &mut dyn Widgets) {
        self.start_music(audio);

        let report = tick(&mut self.world, &mut self.player, &input.tick, &self.settings.rules());

        if report.jumped {
            self.sfx(audio, Sound::Jump);
        }
        if report.damaged {
            self.sfx(audio, Sound::Damage);
        }
        if report.coins_collected > 0 {
            self.sfx(audio, Sound::Coin);
        }

        if self.settings.sound_fx && report.walking_on_ground {
            if !self.walk_playing {
                audio.play(Sound::Walk);
                self.walk_playing = true;
            }
        } else if self.walk_playing {
            self.stop_walk(audio);
        }

        if report.died {
            self.sfx(audio, Sound::Death);
            self.set_phase(GamePhase::Death);
            return;
        }
        if report.reached_goal {
            self.sfx(audio, Sound::Finish);
            log::info!("Level complete with score {}", self.world.score);
            self.set_phase(GamePhase::Victory);
            return;
        }

        if self.pressed(Widget::Pause, input, audio, widgets) {
            if self.walk_playing {
                self.stop_walk(audio);
            }
            self.set_phase(GamePhase::Playing { paused: true });
        }
    }

    fn update_paused(&mut self, input: &FrameInput, audio: &mut dyn Audio, widgets: &mut dyn Widgets) {
        self.start_music(audio);
        self.update_toggles(input, audio, widgets);

        if self.pressed(Widget::Restart, input, audio, widgets) {
            self.set_phase(GamePhase::LevelLoading);
        } else if self.pressed(Widget::Back, input, audio, widgets) {
            self.set_phase(GamePhase::Playing { paused: false });
        } else if self.pressed(Widget::MainMenu, input, audio, widgets) {
            self.set_phase(GamePhase::MainMenu);
        }
    }

    fn unlock_next(&mut self) -> Option<usize> {
        let next = self.next_level()?;
        self.registry.unlock(next);
        Some(next)
    }

    fn update_victory(&mut self, input: &FrameInput, audio: &mut dyn Audio, widgets: &mut dyn Widgets) {
        if self.pressed(Widget::MainMenu, input, audio, widgets) {
            if let Some(next) = self.unlock_next() {
                self.current = Some(LevelRef::Builtin(next));
            }
            self.set_phase(GamePhase::MainMenu);
        } else if self.next_level().is_some() && self.pressed(Widget::NextLevel, input, audio, widgets) {
            if let Some(next) = self.unlock_next() {
                self.select_level(LevelRef::Builtin(next));
            }
        }
    }

    fn update_death(&mut self, input: &FrameInput, audio: &mut dyn Audio, widgets: &mut dyn Widgets) {
        if self.pressed(Widget::Restart, input, audio, widgets) {
            self.set_phase(GamePhase::LevelLoading);
        } else if self.pressed(Widget::MainMenu, input, audio, widgets) {
            self.set_phase(GamePhase::MainMenu);
        }
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::services::testing::{RecordingAudio, RecordingRenderer};
    use crate::services::ScriptedWidgets;
    use std::fs;

    /// Floor on row 10, goal three tiles right of spawn when `goal` is set
    fn level(goal: bool) -> TileGrid {
        let mut rows = vec![vec![0; 40]; 11];
        rows[10] = vec![3; 40];
        if goal {
            rows[9][9] = 14;
        }
        TileGrid::from_rows(rows)
    }

    fn registry() -> LevelRegistry {
        LevelRegistry::from_grids((0..LEVEL_COUNT).map(|_| level(true)).collect())
    }

    struct Harness {
        app: App,
        audio: RecordingAudio,
        widgets: ScriptedWidgets,
        renderer: RecordingRenderer,
    }

    impl Harness {
        fn new(registry: LevelRegistry, settings: Settings) -> Self {
            let mut audio = RecordingAudio::default();
            let app = App::new(registry, settings, &mut audio);
            Self {
                app,
                audio,
                widgets: ScriptedWidgets::default(),
                renderer: RecordingRenderer::default(),
            }
        }

        fn with_levels() -> Self {
            Self::new(registry(), Settings::default())
        }

        fn frame_with(&mut self, tick: TickInput) -> FrameOutcome {
            self.widgets.advance();
            self.renderer = RecordingRenderer::default();
            let input = FrameInput {
                tick,
                fps: FPS,
                ..Default::default()
            };
            self.app
                .frame(&input, &mut self.audio, &mut self.widgets, &mut self.renderer)
        }

        fn idle(&mut self) -> FrameOutcome {
            self.frame_with(TickInput::default())
        }

        fn press(&mut self, widget: Widget) -> FrameOutcome {
            self.widgets.push(widget);
            self.idle()
        }

        fn start_level(&mut self, index: usize) {
            self.press(Widget::Levels);
            self.press(Widget::LevelSlot(index));
            assert_eq!(self.app.phase(), GamePhase::Playing { paused: false });
        }

        fn walk_right_until(&mut self, phase: GamePhase, max_frames: usize) {
            let right = TickInput {
                right: true,
                ..Default::default()
            };
            for _ in 0..max_frames {
                if self.app.phase() == phase {
                    return;
                }
                self.frame_with(right);
            }
            assert_eq!(self.app.phase(), phase);
        }
    }

    #[test]
    fn test_startup_sound_and_main_menu() {
        let h = Harness::with_levels();
        assert_eq!(h.audio.played, vec![Sound::Startup]);
        assert_eq!(h.app.phase(), GamePhase::MainMenu);
        assert_eq!(h.app.current_level(), None);
    }

    #[test]
    fn test_quit_ends_loop() {
        let mut h = Harness::with_levels();
        assert_eq!(h.idle(), FrameOutcome::Continue);
        assert_eq!(h.press(Widget::Quit), FrameOutcome::Quit);
    }

    #[test]
    fn test_locked_level_ignored() {
        let mut h = Harness::with_levels();
        h.press(Widget::Levels);
        assert_eq!(h.app.phase(), GamePhase::LevelSelect);
        h.press(Widget::LevelSlot(2));
        assert_eq!(h.app.phase(), GamePhase::LevelSelect);
        h.press(Widget::MainMenu);
        assert_eq!(h.app.phase(), GamePhase::MainMenu);
    }

    #[test]
    fn test_loading_builds_fresh_world_and_player() {
        let mut h = Harness::with_levels();
        h.start_level(0);
        assert_eq!(h.app.current_level(), Some(LevelRef::Builtin(0)));
        assert_eq!(h.app.player().rect.position(), glam::IVec2::new(PLAYER_SPAWN.0, PLAYER_SPAWN.1));
        assert_eq!(h.app.world().goal_count(), 1);
        assert_eq!(h.app.level_label().as_deref(), Some("Level 1"));
    }

    #[test]
    fn test_victory_then_main_menu_unlocks_next() {
        let mut h = Harness::with_levels();
        h.start_level(0);
        h.walk_right_until(GamePhase::Victory, 200);
        assert!(h.audio.count(Sound::Finish) == 1);
        assert!(!h.app.registry().is_unlocked(1));

        h.press(Widget::MainMenu);
        assert_eq!(h.app.phase(), GamePhase::MainMenu);
        assert!(h.app.registry().is_unlocked(1));
        assert!(!h.app.registry().is_unlocked(2));
    }

    #[test]
    fn test_next_level_unlocks_and_loads() {
        let mut h = Harness::with_levels();
        h.start_level(0);
        h.walk_right_until(GamePhase::Victory, 200);
        h.press(Widget::NextLevel);
        assert_eq!(h.app.phase(), GamePhase::Playing { paused: false });
        assert_eq!(h.app.current_level(), Some(LevelRef::Builtin(1)));
        assert!(h.app.registry().is_unlocked(1));
        assert_eq!(h.app.world().score, 0);
    }

    #[test]
    fn test_last_level_offers_no_next() {
        let mut h = Harness::with_levels();
        for i in 1..LEVEL_COUNT {
            h.app.registry_mut().unlock(i);
        }
        h.start_level(LEVEL_COUNT - 1);
        h.walk_right_until(GamePhase::Victory, 200);
        assert_eq!(h.app.next_level(), None);
        h.press(Widget::NextLevel);
        assert_eq!(h.app.phase(), GamePhase::Victory);
        h.press(Widget::MainMenu);
        assert_eq!(h.app.phase(), GamePhase::MainMenu);
    }

    #[test]
    fn test_falling_out_leads_to_death_then_restart() {
        let empty = LevelRegistry::from_grids(vec![TileGrid::parse("0\n")]);
        let mut h = Harness::new(empty, Settings::default());
        h.start_level(0);
        for _ in 0..200 {
            h.idle();
        }
        assert_eq!(h.app.phase(), GamePhase::Death);
        assert_eq!(h.audio.count(Sound::Death), 1);

        h.press(Widget::Restart);
        assert_eq!(h.app.phase(), GamePhase::Playing { paused: false });
        assert_eq!(h.app.player().health, MAX_HEALTH);
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut h = Harness::with_levels();
        h.start_level(0);
        h.press(Widget::Pause);
        assert_eq!(h.app.phase(), GamePhase::Playing { paused: true });

        let y = h.app.player().rect.y;
        for _ in 0..10 {
            h.idle();
        }
        assert_eq!(h.app.player().rect.y, y);

        h.press(Widget::Back);
        assert_eq!(h.app.phase(), GamePhase::Playing { paused: false });
        h.idle();
        assert_ne!(h.app.player().rect.y, y);
    }

    #[test]
    fn test_pause_menu_restart_and_main_menu() {
        let mut h = Harness::with_levels();
        h.start_level(0);
        for _ in 0..5 {
            h.idle();
        }
        h.press(Widget::Pause);
        h.press(Widget::Restart);
        assert_eq!(h.app.phase(), GamePhase::Playing { paused: false });
        assert_eq!(h.app.player().rect.y, PLAYER_SPAWN.1);

        h.press(Widget::Pause);
        h.press(Widget::MainMenu);
        assert_eq!(h.app.phase(), GamePhase::MainMenu);
    }

    #[test]
    fn test_settings_toggles() {
        let mut h = Harness::with_levels();
        h.press(Widget::Settings);
        assert_eq!(h.app.phase(), GamePhase::SettingsMenu);
        h.press(Widget::SoundToggle);
        h.press(Widget::FpsToggle);
        assert!(!h.app.settings().sound_fx);
        assert!(!h.app.settings().show_fps);
        assert!(h.app.settings().music);

        // Clicks are silent once sound effects are off
        let clicks = h.audio.count(Sound::Click);
        h.press(Widget::MainMenu);
        assert_eq!(h.audio.count(Sound::Click), clicks);
        assert_eq!(h.app.phase(), GamePhase::MainMenu);
    }

    #[test]
    fn test_music_plays_in_level_and_stops_on_menu() {
        let mut h = Harness::with_levels();
        h.start_level(0);
        h.idle();
        let tracks: Vec<u32> = h
            .audio
            .played
            .iter()
            .filter_map(|s| match s {
                Sound::Music { track } => Some(*track),
                _ => None,
            })
            .collect();
        assert_eq!(tracks.len(), 1);
        assert!((1..=MUSIC_TRACKS).contains(&tracks[0]));

        h.press(Widget::Pause);
        h.press(Widget::MainMenu);
        h.idle();
        assert!(!h.audio.music_playing);
    }

    #[test]
    fn test_music_disabled_never_starts() {
        let settings = Settings {
            music: false,
            ..Settings::default()
        };
        let mut h = Harness::new(registry(), settings);
        h.start_level(0);
        for _ in 0..5 {
            h.idle();
        }
        assert!(!h.audio.played.iter().any(|s| matches!(s, Sound::Music { .. })));
    }

    #[test]
    fn test_jump_and_walk_sounds() {
        let mut h = Harness::with_levels();
        h.start_level(0);
        for _ in 0..40 {
            h.idle();
        }
        h.frame_with(TickInput {
            jump_pressed: true,
            ..Default::default()
        });
        assert_eq!(h.audio.count(Sound::Jump), 1);

        for _ in 0..60 {
            h.idle();
        }
        h.frame_with(TickInput {
            left: true,
            ..Default::default()
        });
        h.frame_with(TickInput {
            left: true,
            ..Default::default()
        });
        assert_eq!(h.audio.count(Sound::Walk), 1);
        h.idle();
        assert!(h.audio.stopped.contains(&Channel::Walk));
    }

    #[test]
    fn test_silent_without_sound_fx() {
        let settings = Settings {
            sound_fx: false,
            ..Settings::default()
        };
        let mut h = Harness::new(registry(), settings);
        h.start_level(0);
        for _ in 0..40 {
            h.idle();
        }
        h.frame_with(TickInput {
            jump_pressed: true,
            ..Default::default()
        });
        assert_eq!(h.audio.count(Sound::Jump), 0);
        assert_eq!(h.audio.count(Sound::Click), 0);
    }

    #[test]
    fn test_custom_level_missing_stays_on_menu() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            asset_root: dir.path().to_path_buf(),
            ..Settings::default()
        };
        let mut h = Harness::new(registry(), settings);
        h.press(Widget::CustomLevel);
        assert_eq!(h.app.phase(), GamePhase::MainMenu);
        assert_eq!(h.app.current_level(), None);
    }

    #[test]
    fn test_custom_level_plays_outside_unlock_chain() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(levels::LEVELS_DIR)).unwrap();
        let text: String = level(true)
            .rows()
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ") + "\n")
            .collect();
        fs::write(levels::custom_level_path(dir.path()), text).unwrap();

        let settings = Settings {
            asset_root: dir.path().to_path_buf(),
            ..Settings::default()
        };
        let mut h = Harness::new(registry(), settings);
        h.press(Widget::CustomLevel);
        assert_eq!(h.app.phase(), GamePhase::Playing { paused: false });
        assert_eq!(h.app.level_label().as_deref(), Some("Custom Level"));

        h.walk_right_until(GamePhase::Victory, 200);
        assert_eq!(h.app.next_level(), None);
        h.press(Widget::MainMenu);
        assert!(!h.app.registry().is_unlocked(1));
    }

    #[test]
    fn test_same_seed_same_track() {
        let pick = || {
            let mut h = Harness::with_levels();
            h.start_level(0);
            h.idle();
            h.audio.played.clone()
        };
        assert_eq!(pick(), pick());
    }
}
