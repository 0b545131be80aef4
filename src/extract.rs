/// Single replay extraction: invoke the external parser for one file
/// (header payload + details payload) and normalize the output into a
/// MatchRecord. Failures never escape this module — every error path
/// degrades to the sentinel record and a diagnostic log line, so one
/// bad replay can't take down its siblings or the run.
use crate::config::ParserConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Hero name recorded when extraction fails or the player is absent.
pub const UNKNOWN_HERO: &str = "Unknown";

/// heroprotocol reports elapsed game loops; divide by this to get
/// seconds. Changing it rescales every duration in the output.
const GAME_LOOPS_PER_SECOND: f64 = 8.0;

/// Metadata for one parsed match. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    /// Match duration in seconds (0 for failed extractions).
    pub duration: f64,
    /// Hero the requested player picked, or "Unknown".
    pub hero: String,
}

impl MatchRecord {
    /// The record every failure mode collapses into.
    pub fn sentinel() -> Self {
        Self {
            duration: 0.0,
            hero: UNKNOWN_HERO.to_string(),
        }
    }
}

/// One pending extraction. Identity is the file path.
#[derive(Debug, Clone)]
pub struct ExtractionTask {
    pub file_path: PathBuf,
    pub player_name: String,
}

/// Header payload: total elapsed game loops for the match.
#[derive(Debug, Deserialize)]
struct HeaderPayload {
    #[serde(rename = "m_elapsedGameLoops")]
    elapsed_game_loops: u64,
}

/// Details payload: the player roster with hero selections.
#[derive(Debug, Deserialize)]
struct DetailsPayload {
    #[serde(rename = "m_playerList")]
    player_list: Vec<RosterEntry>,
}

#[derive(Debug, Deserialize)]
struct RosterEntry {
    #[serde(rename = "m_name")]
    name: String,
    #[serde(rename = "m_hero")]
    hero: String,
}

/// Per-file extraction failures. Internal to this module: callers only
/// ever see the sentinel record.
#[derive(Debug)]
enum ExtractError {
    /// Failed to spawn the parser subprocess.
    Spawn(std::io::Error),
    /// Parser ran but exited non-zero (None if killed by signal).
    NonZeroExit(Option<i32>),
    /// Parser exited 0 but produced no output.
    EmptyOutput,
    /// Output did not match the declared payload schema.
    Malformed(serde_json::Error),
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::Spawn(source) => {
                write!(f, "failed to spawn parser subprocess: {}", source)
            }
            ExtractError::NonZeroExit(Some(code)) => {
                write!(f, "parser exited with status {}", code)
            }
            ExtractError::NonZeroExit(None) => write!(f, "parser killed by signal"),
            ExtractError::EmptyOutput => write!(f, "parser produced no output"),
            ExtractError::Malformed(source) => {
                write!(f, "parser output failed schema validation: {}", source)
            }
        }
    }
}

/// Run the parser in one mode (`--header` / `--details`) against a file
/// and return its raw stdout.
async fn invoke(parser: &ParserConfig, mode: &str, file: &Path) -> Result<Vec<u8>, ExtractError> {
    let output = Command::new(&parser.command)
        .args(&parser.args)
        .arg("--json")
        .arg(mode)
        .arg(file)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(ExtractError::Spawn)?;

    if !output.status.success() {
        return Err(ExtractError::NonZeroExit(output.status.code()));
    }
    if output.stdout.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(ExtractError::EmptyOutput);
    }
    Ok(output.stdout)
}

async fn try_extract(
    parser: &ParserConfig,
    task: &ExtractionTask,
) -> Result<MatchRecord, ExtractError> {
    let header_raw = invoke(parser, "--header", &task.file_path).await?;
    let details_raw = invoke(parser, "--details", &task.file_path).await?;

    let header: HeaderPayload =
        serde_json::from_slice(&header_raw).map_err(ExtractError::Malformed)?;
    let details: DetailsPayload =
        serde_json::from_slice(&details_raw).map_err(ExtractError::Malformed)?;

    // Roster names carry padding in some replays; compare trimmed.
    let wanted = task.player_name.trim();
    let hero = details
        .player_list
        .iter()
        .find(|entry| entry.name.trim() == wanted)
        .map(|entry| entry.hero.clone())
        .unwrap_or_else(|| UNKNOWN_HERO.to_string());

    Ok(MatchRecord {
        duration: header.elapsed_game_loops as f64 / GAME_LOOPS_PER_SECOND,
        hero,
    })
}

/// Extract match metadata for one replay file. Never fails: any error
/// is logged and mapped to the sentinel record.
pub async fn extract(parser: &ParserConfig, task: &ExtractionTask) -> MatchRecord {
    match try_extract(parser, task).await {
        Ok(record) => record,
        Err(err) => {
            tracing::warn!(
                file = %task.file_path.display(),
                error = %err,
                "extraction failed, recording match as Unknown"
            );
            MatchRecord::sentinel()
        }
    }
}

/// Check that the parser command is invocable at all (`-h` must exit 0).
/// Called once before any extraction work starts.
pub async fn probe(parser: &ParserConfig) -> bool {
    Command::new(&parser.command)
        .args(&parser.args)
        .arg("-h")
        .stdin(Stdio::null())
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}
