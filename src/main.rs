//! Headless runner
//!
//! Verifies assets, loads the builtin levels and plays one level with a
//! scripted input for a fixed number of frames. A windowed frontend plugs
//! its own Renderer, Audio and Widgets into the same `App::frame` loop.
//!
//! Usage: `tilehop [asset_root] [level_index] [frames]`

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use std::path::{Path, PathBuf};
    use std::process::ExitCode;

    use tilehop::app::FrameInput;
    use tilehop::consts::FPS;
    use tilehop::services::{NullAudio, NullRenderer, ScriptedWidgets};
    use tilehop::sim::TickInput;
    use tilehop::{App, FrameOutcome, LevelRef, LevelRegistry, Settings, assets};

    fn run() -> ExitCode {
        env_logger::init();
        log::info!("Tilehop (headless) starting...");

        let settings_path = Path::new(Settings::FILE_NAME);
        let mut settings = Settings::load(settings_path);
        let mut args = std::env::args().skip(1);
        if let Some(root) = args.next() {
            settings.asset_root = PathBuf::from(root);
        }
        let level: usize = args.next().and_then(|a| a.parse().ok()).unwrap_or(0);
        let frames: u32 = args.next().and_then(|a| a.parse().ok()).unwrap_or(FPS * 30);

        if let Err(e) = assets::verify_manifest(&settings.asset_root) {
            log::error!("The game could not be initialized: {}", e);
            return ExitCode::FAILURE;
        }
        let registry = match LevelRegistry::load_builtin(&settings.asset_root) {
            Ok(registry) => registry,
            Err(e) => {
                log::error!("Failed to load levels: {}", e);
                return ExitCode::FAILURE;
            }
        };

        let mut audio = NullAudio::default();
        let mut widgets = ScriptedWidgets::default();
        let mut renderer = NullRenderer;
        let mut app = App::new(registry, settings, &mut audio);

        // Headless runs may start anywhere
        app.registry_mut().unlock(level);
        if !app.select_level(LevelRef::Builtin(level)) {
            log::error!("No level {}", level);
            return ExitCode::FAILURE;
        }

        for frame in 0..frames {
            widgets.advance();
            // Walk right, hop every second and glide on the way down
            let hop = frame % FPS;
            let input = FrameInput {
                tick: TickInput {
                    right: true,
                    jump_pressed: hop == 0,
                    jump_held: hop < FPS / 2,
                    ..Default::default()
                },
                fps: FPS,
                ..Default::default()
            };
            if app.frame(&input, &mut audio, &mut widgets, &mut renderer) == FrameOutcome::Quit {
                break;
            }
        }

        log::info!(
            "Finished in {:?} after {} frames: score {}, health {}",
            app.phase(),
            frames,
            app.world().score,
            app.player().health
        );
        if let Err(e) = app.settings().save(settings_path) {
            log::warn!("Could not save settings: {}", e);
        }
        ExitCode::SUCCESS
    }

    run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on the web
}
