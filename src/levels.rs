//! Level registry and level file loading
//!
//! Builtin levels live at `<asset_root>/levels/level{N}_data.txt` and are
//! unlocked one after another. The custom level is read from
//! `levels/customlevel.txt` each time it is requested and never takes part in
//! the unlock chain.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::consts::LEVEL_COUNT;
use crate::error::LevelError;
use crate::sim::TileGrid;

pub const LEVELS_DIR: &str = "levels";
pub const CUSTOM_LEVEL_FILE: &str = "customlevel.txt";

pub fn builtin_level_path(root: &Path, index: usize) -> PathBuf {
    root.join(LEVELS_DIR).join(format!("level{index}_data.txt"))
}

pub fn custom_level_path(root: &Path) -> PathBuf {
    root.join(LEVELS_DIR).join(CUSTOM_LEVEL_FILE)
}

/// Read and parse one level file
pub fn load_level_file(path: &Path) -> Result<TileGrid, LevelError> {
    let text = fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            LevelError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            LevelError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let grid = TileGrid::parse(&text);
    log::info!(
        "Loaded level {} ({}x{} tiles)",
        path.display(),
        grid.width(),
        grid.height()
    );
    Ok(grid)
}

/// Load the custom level, if the player has provided one
pub fn load_custom(root: &Path) -> Result<TileGrid, LevelError> {
    load_level_file(&custom_level_path(root))
}

#[derive(Debug, Clone)]
pub struct LevelEntry {
    pub grid: TileGrid,
    pub unlocked: bool,
}

/// Builtin levels in play order with their unlock flags.
///
/// Unlock flags only live for the process lifetime.
#[derive(Debug, Clone, Default)]
pub struct LevelRegistry {
    levels: Vec<LevelEntry>,
}

impl LevelRegistry {
    /// Registry from already parsed grids; only the first is unlocked
    pub fn from_grids(grids: Vec<TileGrid>) -> Self {
        let levels = grids
            .into_iter()
            .enumerate()
            .map(|(i, grid)| LevelEntry {
                grid,
                unlocked: i == 0,
            })
            .collect();
        Self { levels }
    }

    /// Load every builtin level under `root`
    pub fn load_builtin(root: &Path) -> Result<Self, LevelError> {
        let grids = (0..LEVEL_COUNT)
            .map(|i| load_level_file(&builtin_level_path(root, i)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_grids(grids))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn is_unlocked(&self, index: usize) -> bool {
        self.levels.get(index).is_some_and(|l| l.unlocked)
    }

    /// Unlock a level. Returns true if it was locked before.
    pub fn unlock(&mut self, index: usize) -> bool {
        match self.levels.get_mut(index) {
            Some(entry) if !entry.unlocked => {
                entry.unlocked = true;
                log::info!("Unlocked level {}", index + 1);
                true
            }
            _ => false,
        }
    }

    pub fn grid(&self, index: usize) -> Option<&TileGrid> {
        self.levels.get(index).map(|l| &l.grid)
    }

    /// Index of the level after `index`, if there is one
    pub fn next_after(&self, index: usize) -> Option<usize> {
        let next = index + 1;
        (next < self.levels.len()).then_some(next)
    }
}
