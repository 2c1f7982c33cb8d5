use std::fs::{self, Metadata};
use std::io::ErrorKind;
use std::path::Path;

use crate::error::ScanError;

use super::source_utils::{format_date, is_image_name, modified_or_now};
use super::{ImageEntry, Source};

/// Validate `path` and list the supported images it names.
///
/// A directory yields its immediate children in listing order; a file yields
/// itself. Unsupported files are filtered out silently, so an empty result is
/// not an error.
///
/// # Errors
///
/// - `ScanError::NotFound` if nothing exists at `path`
/// - `ScanError::AccessError` if `path` exists but can't be stat'ed
/// - `ScanError::DirectoryReadError` if the directory can't be listed
pub fn scan(path: impl AsRef<Path>) -> Result<Vec<ImageEntry>, ScanError> {
    let path = path.as_ref();

    let metadata = fs::metadata(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ScanError::NotFound {
            path: path.to_path_buf(),
            source,
        },
        _ => ScanError::AccessError {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let source = Source::resolve(path, &metadata);
    tracing::debug!("[Source]: {:?}", source);

    let entries = match &source {
        Source::Directory(dir) => scan_directory(dir)?,
        Source::ImagePath(file) => scan_file(file, metadata).into_iter().collect(),
    };

    tracing::debug!("Found {} image(s) in {:?}", entries.len(), source.path());
    Ok(entries)
}

fn scan_directory(dir: &Path) -> Result<Vec<ImageEntry>, ScanError> {
    let read_dir = fs::read_dir(dir).map_err(|source| ScanError::DirectoryReadError {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut entries = vec![];
    for dir_entry in read_dir {
        let dir_entry = match dir_entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {:?}: {}", dir, e);
                continue;
            }
        };

        if dir_entry.file_type().is_ok_and(|t| t.is_dir()) {
            continue;
        }

        let name = dir_entry.file_name().to_string_lossy().into_owned();
        if !is_image_name(&name) {
            continue;
        }

        let modified = modified_or_now(dir_entry.metadata());
        entries.push(ImageEntry {
            name,
            date: format_date(modified),
            source_path: dir_entry.path(),
        });
    }
    Ok(entries)
}

fn scan_file(file: &Path, metadata: Metadata) -> Option<ImageEntry> {
    let name = file.file_name()?.to_string_lossy().into_owned();
    if !is_image_name(&name) {
        return None;
    }

    let modified = modified_or_now(Ok(metadata));
    Some(ImageEntry {
        name,
        date: format_date(modified),
        source_path: file.to_path_buf(),
    })
}
