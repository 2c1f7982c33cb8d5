// -- submodules
mod scanner;
mod source_utils;

pub use scanner::scan;
pub use source_utils::{DATE_FORMAT, IMAGE_EXTENSIONS, extension_of, format_date, is_image_name};

// -- external imports
use std::fs::Metadata;
use std::path::{Path, PathBuf};

/// A qualifying image file found by the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    /// File name only (e.g., "IMG_0001.jpg")
    pub name: String,

    /// Last modification time, formatted as `YYYY-MM-DDTHH:MM`
    pub date: String,

    /// Where the file was found
    pub source_path: PathBuf,
}

/// What a scanned path turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Path to a single file
    ImagePath(PathBuf),

    /// Path to a directory whose immediate children are candidates
    Directory(PathBuf),
}

impl Source {
    /// Classify an already stat'ed path
    pub fn resolve(path: &Path, metadata: &Metadata) -> Self {
        if metadata.is_dir() {
            Source::Directory(path.to_path_buf())
        } else {
            Source::ImagePath(path.to_path_buf())
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Source::ImagePath(p) | Source::Directory(p) => p,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Source::Directory(_))
    }
}
