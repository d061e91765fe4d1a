//! Runtime collaborators
//!
//! The core never draws, plays or hit-tests anything itself. It calls these
//! narrow traits, which a frontend implements. Null implementations let the
//! game run headless.

use glam::IVec2;

use crate::sim::{BlockStyle, Facing, Pose, Rect, SpikeFacing, WingFrame};

/// What to draw; the renderer decides how
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    /// In-level backdrop
    Background,
    /// Backdrop behind the main, level select and settings menus
    MenuBackground,
    Block(BlockStyle),
    Platform,
    SpikeBall,
    Spike(SpikeFacing),
    Coin,
    GoalFlag,
    Player { pose: Pose, facing: Facing },
    Ghost { facing: Facing },
    Wings { frame: WingFrame, facing: Facing },
    Heart,
    CoinIcon,
    /// Rounded panel behind pause/settings/victory menus
    MenuPanel,
}

pub trait Renderer {
    /// Draw one sprite; `rect` is in screen space, `frame` picks the animation image
    fn draw_entity(&mut self, kind: DrawKind, rect: Rect, frame: u32);

    /// Draw a line of text at a screen position
    fn draw_text(&mut self, _text: &str, _pos: IVec2) {}

    /// Draw a 2px outline (debug overlay)
    fn draw_outline(&mut self, _rect: Rect) {}

    /// Draw a line (debug grid)
    fn draw_line(&mut self, _from: IVec2, _to: IVec2) {}

    /// Show a button or toggle; layout belongs to the frontend
    fn draw_widget(&mut self, _widget: Widget, _label: &str, _enabled: bool) {}
}

/// Sound effects and music
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Startup,
    Click,
    Jump,
    Damage,
    Coin,
    Finish,
    Death,
    /// Footstep loop, plays on [`Channel::Walk`]
    Walk,
    /// Background track 1..=4, plays on [`Channel::Music`]
    Music { track: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Walk,
    Music,
}

/// Fire-and-forget audio
pub trait Audio {
    fn play(&mut self, sound: Sound);
    fn stop_channel(&mut self, channel: Channel);
    fn is_music_playing(&self) -> bool;
}

/// Every button and toggle the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Widget {
    // Main menu
    Levels,
    CustomLevel,
    Settings,
    Quit,
    // Level select
    LevelSlot(usize),
    // In game and overlays
    Pause,
    Back,
    Restart,
    MainMenu,
    NextLevel,
    // Toggles (settings and pause menus)
    SoundToggle,
    MusicToggle,
    FpsToggle,
}

/// Pointer snapshot for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerState {
    pub position: IVec2,
    pub down: bool,
}

/// Button hit-testing. Debounce and hover images are the frontend's business.
pub trait Widgets {
    fn is_activated(&mut self, widget: Widget, pointer: &PointerState) -> bool;
}

/// Draws nothing
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw_entity(&mut self, _kind: DrawKind, _rect: Rect, _frame: u32) {}
}

/// Plays nothing; tracks whether music would be playing
#[derive(Debug, Default)]
pub struct NullAudio {
    music_playing: bool,
}

impl Audio for NullAudio {
    fn play(&mut self, sound: Sound) {
        if let Sound::Music { track } = sound {
            log::debug!("Music track {} started", track);
            self.music_playing = true;
        }
    }

    fn stop_channel(&mut self, channel: Channel) {
        if channel == Channel::Music {
            self.music_playing = false;
        }
    }

    fn is_music_playing(&self) -> bool {
        self.music_playing
    }
}

/// Activates a queued list of widgets, one per frame
#[derive(Debug, Default)]
pub struct ScriptedWidgets {
    queue: std::collections::VecDeque<Widget>,
    current: Option<Widget>,
}

impl ScriptedWidgets {
    pub fn new(widgets: impl IntoIterator<Item = Widget>) -> Self {
        Self {
            queue: widgets.into_iter().collect(),
            current: None,
        }
    }

    /// Move to the next queued press; call once per frame
    pub fn advance(&mut self) {
        self.current = self.queue.pop_front();
    }

    pub fn push(&mut self, widget: Widget) {
        self.queue.push_back(widget);
    }
}

impl Widgets for ScriptedWidgets {
    fn is_activated(&mut self, widget: Widget, _pointer: &PointerState) -> bool {
        self.current == Some(widget)
    }
}

#[cfg(test)]
pub mod testing {
    //! Recording collaborators for tests

    use super::*;

    #[derive(Debug, Default)]
    pub struct RecordingAudio {
        pub played: Vec<Sound>,
        pub stopped: Vec<Channel>,
        pub music_playing: bool,
    }

    impl RecordingAudio {
        pub fn count(&self, sound: Sound) -> usize {
            self.played.iter().filter(|s| **s == sound).count()
        }
    }

    impl Audio for RecordingAudio {
        fn play(&mut self, sound: Sound) {
            if matches!(sound, Sound::Music { .. }) {
                self.music_playing = true;
            }
            self.played.push(sound);
        }

        fn stop_channel(&mut self, channel: Channel) {
            if channel == Channel::Music {
                self.music_playing = false;
            }
            self.stopped.push(channel);
        }

        fn is_music_playing(&self) -> bool {
            self.music_playing
        }
    }

    #[derive(Debug, Default)]
    pub struct RecordingRenderer {
        pub entities: Vec<(DrawKind, Rect, u32)>,
        pub texts: Vec<String>,
        pub outlines: usize,
        pub lines: usize,
        pub widgets: Vec<(Widget, String, bool)>,
    }

    impl RecordingRenderer {
        pub fn count(&self, pred: impl Fn(&DrawKind) -> bool) -> usize {
            self.entities.iter().filter(|(k, _, _)| pred(k)).count()
        }

        pub fn widget(&self, widget: Widget) -> Option<&(Widget, String, bool)> {
            self.widgets.iter().find(|(w, _, _)| *w == widget)
        }
    }

    impl Renderer for RecordingRenderer {
        fn draw_entity(&mut self, kind: DrawKind, rect: Rect, frame: u32) {
            self.entities.push((kind, rect, frame));
        }

        fn draw_text(&mut self, text: &str, _pos: IVec2) {
            self.texts.push(text.to_string());
        }

        fn draw_outline(&mut self, _rect: Rect) {
            self.outlines += 1;
        }

        fn draw_line(&mut self, _from: IVec2, _to: IVec2) {
            self.lines += 1;
        }

        fn draw_widget(&mut self, widget: Widget, label: &str, enabled: bool) {
            self.widgets.push((widget, label.to_string(), enabled));
        }
    }
}
