use chrono::{DateTime, Local};
use std::fs::Metadata;
use std::time::SystemTime;

/// Supported extensions, lowercase and without the dot
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// `chrono` pattern for entry dates, e.g. `2024-01-01T10:00`
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// The extension is whatever follows the last `.` of the name, so `.png` is a
/// PNG and `archive.png.zip` is not. Names without a `.` never match.
pub fn is_image_name(name: &str) -> bool {
    extension_of(name).is_some_and(|ext| {
        let ext = ext.to_lowercase();
        IMAGE_EXTENSIONS.contains(&ext.as_str())
    })
}

/// Text after the last `.` of a file name, unlike `Path::extension` this
/// treats `.png` as having the extension `png`
pub fn extension_of(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(_, ext)| ext)
}

/// Format a timestamp in local time
pub fn format_date(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format(DATE_FORMAT).to_string()
}

/// Modification time, falling back to now when the platform can't tell
pub fn modified_or_now(metadata: std::io::Result<Metadata>) -> SystemTime {
    metadata
        .and_then(|meta| meta.modified())
        .unwrap_or_else(|e| {
            tracing::debug!("No modification time available ({}), using now", e);
            SystemTime::now()
        })
}
