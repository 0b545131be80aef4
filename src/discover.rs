/// Replay discovery: glob the filesystem for `*.StormReplay` files,
/// either under an explicit root or in the game's per-platform default
/// replay location.
use glob::glob;
use std::path::{Path, PathBuf};

const REPLAY_SUFFIX: &str = "**/*.StormReplay";

/// All replay files under `root`, recursively, in sorted order.
pub fn from_root(root: &Path) -> Result<Vec<PathBuf>, String> {
    collect(&format!("{}/{}", root.display(), REPLAY_SUFFIX))
}

/// The game's default replay location for this platform. Platforms
/// without a known location get an error asking for an explicit root.
pub fn platform_default() -> Result<Vec<PathBuf>, String> {
    if cfg!(target_os = "windows") {
        let profile = std::env::var("USERPROFILE")
            .map_err(|_| "USERPROFILE is not set; please provide a replay root folder".to_string())?;
        collect(&format!(
            "{profile}/Documents/Heroes of the Storm/Accounts/*/*/Replays/{REPLAY_SUFFIX}"
        ))
    } else if cfg!(target_os = "macos") {
        let home = std::env::var("HOME")
            .map_err(|_| "HOME is not set; please provide a replay root folder".to_string())?;
        collect(&format!(
            "{home}/Library/Application Support/Blizzard/Heroes of the Storm/Accounts/*/*/Replays/{REPLAY_SUFFIX}"
        ))
    } else {
        Err("no default replay location on this platform; please provide a replay root folder"
            .to_string())
    }
}

fn collect(pattern: &str) -> Result<Vec<PathBuf>, String> {
    let entries = glob(pattern).map_err(|e| format!("bad replay glob pattern {pattern}: {e}"))?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => files.push(path),
            Err(e) => tracing::warn!(error = %e, "skipping unreadable path during discovery"),
        }
    }
    files.sort();
    Ok(files)
}
