//! Startup asset check
//!
//! `<asset_root>/fileList.txt` lists every file the game needs, one path per
//! line. Paths are relative to the asset root; a leading `platformer_assets/`
//! component (the historical default root) is accepted and stripped.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::AssetError;

pub const MANIFEST_FILE: &str = "fileList.txt";
const LEGACY_ROOT_PREFIX: &str = "platformer_assets/";

/// Path of a manifest entry relative to the asset root
fn entry_path(line: &str) -> Option<PathBuf> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let relative = line.strip_prefix(LEGACY_ROOT_PREFIX).unwrap_or(line);
    Some(PathBuf::from(relative))
}

/// Make sure every file listed in the manifest exists.
///
/// Returns the number of files checked. All missing entries are reported
/// together, relative to `root`.
pub fn verify_manifest(root: &Path) -> Result<usize, AssetError> {
    let manifest = root.join(MANIFEST_FILE);
    let text = match fs::read_to_string(&manifest) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(AssetError::Missing {
                paths: vec![manifest],
            });
        }
        Err(source) => {
            return Err(AssetError::Manifest {
                path: manifest,
                source,
            });
        }
    };

    let entries: Vec<PathBuf> = text.lines().filter_map(entry_path).collect();
    let missing: Vec<PathBuf> = entries
        .iter()
        .filter(|p| !root.join(p).is_file())
        .cloned()
        .collect();

    if !missing.is_empty() {
        return Err(AssetError::Missing { paths: missing });
    }
    log::info!("Verified {} asset files under {}", entries.len(), root.display());
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, path: &str, contents: &str) {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, contents).unwrap();
    }

    #[test]
    fn test_all_present() {
        let dir = TempDir::new().unwrap();
        write(&dir, "images/coin1.png", "");
        write(&dir, "levels/level0_data.txt", "1");
        write(
            &dir,
            MANIFEST_FILE,
            "platformer_assets/images/coin1.png\nlevels/level0_data.txt\n\n",
        );
        assert_eq!(verify_manifest(dir.path()).unwrap(), 2);
    }

    #[test]
    fn test_reports_every_missing_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "images/coin1.png", "");
        write(
            &dir,
            MANIFEST_FILE,
            "images/coin1.png\naudio/jump.wav\nplatformer_assets/audio/coin.wav\n",
        );
        match verify_manifest(dir.path()) {
            Err(AssetError::Missing { paths }) => assert_eq!(
                paths,
                vec![PathBuf::from("audio/jump.wav"), PathBuf::from("audio/coin.wav")]
            ),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_missing_manifest_is_reported() {
        let dir = TempDir::new().unwrap();
        match verify_manifest(dir.path()) {
            Err(AssetError::Missing { paths }) => {
                assert_eq!(paths, vec![dir.path().join(MANIFEST_FILE)])
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
