/// Collect a folder of images from a TOML config, print the collection as JSON
/// and render its thumbnails.
use std::path::PathBuf;

use anyhow::{Context, Result};
use sketch_deck::{FixedPicker, FolderPicker, Session, init_logger, parse_toml};

fn main() -> Result<()> {
    let project_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let config_toml = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| project_root.join("assets/configs/default.toml"));

    let config = parse_toml(&config_toml, &project_root)
        .with_context(|| format!("Failed to parse TOML config {:?}", config_toml))?;
    init_logger(config.render.verbose);

    let picker = folder_picker(config.collect.source.clone());
    let mut session = Session::try_from(config)?;

    let Some(collection) = session.select(picker.as_ref())? else {
        return Ok(());
    };

    let json = serde_json::to_string_pretty(&collection).context("Failed to encode collection")?;
    println!("{json}");

    if let Some(report) = session.wait()? {
        for failed in &report.failed {
            tracing::warn!("Not rendered: {:?} ({})", failed.source_path, failed.reason);
        }
        tracing::info!(
            "Thumbnails ready for {} image(s) ({} file(s))",
            report.rendered,
            report.thumbnails
        );
    }
    Ok(())
}

#[cfg(feature = "dialog")]
fn folder_picker(source: Option<PathBuf>) -> Box<dyn FolderPicker> {
    match source {
        Some(path) => Box::new(FixedPicker(Some(path))),
        None => Box::new(sketch_deck::DialogPicker::default()),
    }
}

#[cfg(not(feature = "dialog"))]
fn folder_picker(source: Option<PathBuf>) -> Box<dyn FolderPicker> {
    if source.is_none() {
        tracing::warn!("No `collect.source` configured and the `dialog` feature is disabled");
    }
    Box::new(FixedPicker(source))
}
