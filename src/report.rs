/// Terminal output: render the summary for the console and write the
/// JSON artifact.
use crate::aggregate::Summary;
use crate::error::RunError;
use std::path::{Path, PathBuf};

/// Default output filename, stamped with today's date.
pub fn default_output_path() -> PathBuf {
    PathBuf::from(format!(
        "hots-playtime-{}.json",
        chrono::Local::now().format("%Y-%m-%d")
    ))
}

/// Pretty form shown on stdout before the file is written.
pub fn render(summary: &Summary) -> String {
    // Summary serialization is infallible for this shape; fall back to
    // the debug form rather than panicking if that ever changes.
    serde_json::to_string_pretty(summary).unwrap_or_else(|_| format!("{summary:?}"))
}

/// Write the summary JSON to `path`. Single write, no partial output
/// on failure.
pub fn write_summary(summary: &Summary, path: &Path) -> Result<(), RunError> {
    let json = serde_json::to_string(summary).map_err(|e| RunError::OutputWrite {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    std::fs::write(path, json).map_err(|e| RunError::OutputWrite {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}
