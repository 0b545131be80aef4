use serde::Deserialize;
use std::path::Path;

/// Top-level configuration loaded from playtime.toml.
#[derive(Debug, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PlaytimeConfig {
    pub parser: ParserConfig,
    pub scheduler: SchedulerConfig,
}

/// How to invoke the external replay parser. The mode flag and file
/// path are appended per invocation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub command: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Number of sequential batches the replay set is split into.
    /// More batches means fewer concurrent parser processes per batch.
    pub batch_count: usize,
}

// --- Default implementations ---

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            command: "python3".to_string(),
            args: vec!["-m".to_string(), "heroprotocol".to_string()],
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { batch_count: 50 }
    }
}

/// Load config from `path`, falling back to defaults when the file is
/// absent. A present-but-invalid file is an error, not a silent default.
pub fn load(path: &Path) -> Result<PlaytimeConfig, String> {
    if !path.exists() {
        return Ok(PlaytimeConfig::default());
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {e}", path.display()))?;
    toml::from_str(&text).map_err(|e| format!("failed to parse config {}: {e}", path.display()))
}
