use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use strum::{Display, EnumString, VariantNames};

use crate::error::ScanError;
use crate::size_class::{SizeTable, ThumbSize};
use crate::source::{ImageEntry, scan};
use crate::toml_utils::deserialize_variant;

// -- enums

/// How scanned entries are expanded into collection records
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, VariantNames, Default)]
pub enum Expansion {
    /// One record per image and size class, each carrying a single thumbnail.
    /// This is the shape the desktop front-end has always received.
    #[default]
    #[strum(serialize = "PerClass")]
    PerClass,

    /// One record per image carrying every size class
    #[strum(serialize = "Consolidated")]
    Consolidated,
}

// -- structs

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectArgs {
    /// Folder (or single image) to collect; the picker is asked when unset
    pub source: Option<PathBuf>,

    /// Base directory full-size images are expected in
    pub full_images_dir: PathBuf,

    /// Base directory holding one sub-directory per size class
    pub thumbnails_dir: PathBuf,

    /// Record expansion policy
    #[serde(deserialize_with = "deserialize_variant")]
    pub expansion: Expansion,

    /// Thumbnail size classes, in expansion order
    pub sizes: SizeTable,
}

impl Default for CollectArgs {
    fn default() -> Self {
        Self {
            source: None,
            full_images_dir: PathBuf::from("fullImages"),
            thumbnails_dir: PathBuf::from("thumbnails"),
            expansion: Expansion::default(),
            sizes: SizeTable::default(),
        }
    }
}

impl CollectArgs {
    /// Canonical location of the full-size copy of `name`
    pub fn full_image_path(&self, name: &str) -> PathBuf {
        self.full_images_dir.join(name)
    }

    /// Canonical location of the `class` thumbnail of `name`
    pub fn thumbnail_path(&self, class: &str, name: &str) -> PathBuf {
        self.thumbnails_dir.join(class).join(name)
    }
}

/// One entry of a collection as handed to the front-end
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageWithThumbnails {
    /// Where the full-size image is expected to reside
    pub image: PathBuf,

    /// Original file name
    pub name: String,

    /// Modification time, `YYYY-MM-DDTHH:MM`
    pub date: String,

    /// Size-class name to thumbnail location, in size-table order
    pub thumbs: IndexMap<String, PathBuf>,
}

// -- public API

/// Expand scanned entries into collection records.
///
/// No file is read or written: every path is computed from the entry name and
/// the size-class names.
pub fn build(entries: &[ImageEntry], args: &CollectArgs) -> Vec<ImageWithThumbnails> {
    match args.expansion {
        Expansion::PerClass => entries
            .iter()
            .flat_map(|entry| {
                args.sizes
                    .iter()
                    .map(move |size| make_record(entry, args, [size]))
            })
            .collect(),
        Expansion::Consolidated => entries
            .iter()
            .map(|entry| make_record(entry, args, &args.sizes))
            .collect(),
    }
}

/// Scan `path` and build its collection in one go.
///
/// # Errors
///
/// Any `ScanError` aborts the whole request; no partial collection is returned.
pub fn collect(
    path: impl AsRef<Path>,
    args: &CollectArgs,
) -> Result<Vec<ImageWithThumbnails>, ScanError> {
    let start_time = Instant::now();
    let path = path.as_ref();

    let entries = scan(path)?;
    let collection = build(&entries, args);

    tracing::info!(
        "Collected {} image(s) into {} record(s) from {:?} in {:.3?}",
        entries.len(),
        collection.len(),
        path,
        start_time.elapsed()
    );
    Ok(collection)
}

fn make_record<'a>(
    entry: &ImageEntry,
    args: &CollectArgs,
    sizes: impl IntoIterator<Item = &'a ThumbSize>,
) -> ImageWithThumbnails {
    let thumbs = sizes
        .into_iter()
        .map(|size| {
            (
                size.name.clone(),
                args.thumbnail_path(&size.name, &entry.name),
            )
        })
        .collect();

    ImageWithThumbnails {
        image: args.full_image_path(&entry.name),
        name: entry.name.clone(),
        date: entry.date.clone(),
        thumbs,
    }
}

// -- tests
