use std::path::Path;
use std::time::Duration;

/// Build the display name for a track: its file name with the matched audio
/// extension removed. Falls back to the full file name when nothing matches.
pub fn display_name(path: &Path, extensions: &[String]) -> String {
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN");

    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|e| e.to_ascii_lowercase());

    match (ext, path.file_stem().and_then(|s| s.to_str())) {
        (Some(ext), Some(stem))
            if !stem.trim().is_empty() && extensions.iter().any(|e| *e == ext) =>
        {
            stem.to_string()
        }
        _ => file_name.to_string(),
    }
}

/// Format an optional duration as `M:SS`, `-` when unknown.
pub fn format_duration(d: Option<Duration>) -> String {
    let Some(d) = d else {
        return "-".to_string();
    };

    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
