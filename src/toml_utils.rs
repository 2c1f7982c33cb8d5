// -- imports
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use strum::VariantNames;

use crate::collector::CollectArgs;
use crate::error::{AppError, Result};
use crate::render::RenderArgs;

// -- config

/// Everything a run needs, as read from a TOML file
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub collect: CollectArgs,
    pub render: RenderArgs,
}

impl Config {
    /// Parse TOML config file with explicit project root for path resolution.
    ///
    /// # Arguments
    ///
    /// * `toml_path` - Path to the TOML config file
    /// * `project_root` - Base directory for resolving relative paths
    ///
    /// # Errors
    ///
    /// Returns `AppError` if:
    /// - The path is not a valid toml file
    /// - File read fails
    /// - TOML parsing fails
    /// - The thumbnail size table is unusable
    pub fn from_toml(toml_path: &Path, project_root: &Path) -> Result<Self> {
        if !toml_path.is_file() || toml_path.extension().is_none_or(|ext| ext != "toml") {
            return Err(AppError::Config(format!(
                "TOML config path is not a valid .toml file: {:?}",
                toml_path
            )));
        }

        let content = std::fs::read_to_string(toml_path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.collect.sizes.validate()?;
        config.resolve_paths(project_root);

        Ok(config)
    }

    /// Resolve a relative `source` against project root.
    ///
    /// `full_images_dir` and `thumbnails_dir` are prefixes of the paths handed
    /// to the UI, so they stay exactly as written.
    fn resolve_paths(&mut self, project_root: &Path) {
        if let Some(ref mut source) = self.collect.source {
            if !source.is_absolute() {
                *source = project_root.join(source.as_path());
            }
        }
    }
}

// -- public API

/// Parse TOML config file.
///
/// # Arguments
///
/// * `toml_path` - Path to the TOML config file
/// * `project_root` - Base directory for resolving relative paths
///
/// # Errors
///
/// Returns `AppError` if TOML parsing, validation or path resolution fails.
pub fn parse_toml(toml_path: &Path, project_root: &Path) -> Result<Config> {
    Config::from_toml(toml_path, project_root)
}

/// Deserialize a strum enum from its variant name, with a helpful error message
pub fn deserialize_variant<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr + VariantNames,
{
    let value = String::deserialize(deserializer)?;
    T::from_str(&value).map_err(|_| {
        serde::de::Error::invalid_value(
            serde::de::Unexpected::Str(&value),
            &format!("one of {}", T::VARIANTS.join(", ")).as_str(),
        )
    })
}

// -- tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::Expansion;
    use crate::render::{Fit, RenderFn};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_from_toml_with_custom_values() {
        let temp_dir = TempDir::new().unwrap();
        let toml_path = temp_dir.path().join("config.toml");
        let toml_content = r#"
[collect]
source = "pictures"
full_images_dir = "static/fullImages"
thumbnails_dir = "/var/thumbs"
expansion = "Consolidated"

[[collect.sizes]]
name = "small-view"
width = 90
height = 90

[[collect.sizes]]
name = "banner"
width = 640
height = 120

[render]
enabled = false
render_fn = "Sequential"
workers = 2
fit = "Contain"
copy_full_images = true
verbose = true
"#;
        fs::write(&toml_path, toml_content).unwrap();

        let config = Config::from_toml(&toml_path, temp_dir.path()).unwrap();

        let collect = &config.collect;
        assert_eq!(collect.source, Some(temp_dir.path().join("pictures")));
        assert_eq!(collect.full_images_dir, PathBuf::from("static/fullImages"));
        assert_eq!(collect.thumbnails_dir, PathBuf::from("/var/thumbs"));
        assert_eq!(collect.expansion, Expansion::Consolidated);
        assert_eq!(collect.sizes.len(), 2);
        assert_eq!(collect.sizes[1].name, "banner");
        assert_eq!(collect.sizes[1].width, 640);

        let render = &config.render;
        assert!(!render.enabled);
        assert_eq!(render.render_fn, RenderFn::Sequential);
        assert_eq!(render.workers, Some(2));
        assert_eq!(render.fit, Fit::Contain);
        assert!(render.copy_full_images);
        assert!(render.verbose);
    }

    #[test]
    fn test_from_toml_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let toml_path = temp_dir.path().join("config.toml");
        fs::write(&toml_path, "").unwrap();

        let config = parse_toml(&toml_path, temp_dir.path()).unwrap();

        assert!(config.collect.source.is_none());
        assert_eq!(config.collect.expansion, Expansion::PerClass);
        assert_eq!(config.collect.sizes.len(), 5);
        assert_eq!(config.collect.thumbnails_dir, PathBuf::from("thumbnails"));
        assert_eq!(config.collect.full_images_dir, PathBuf::from("fullImages"));
        assert!(config.render.enabled);
        assert_eq!(config.render.render_fn, RenderFn::WorkerPool);
        assert_eq!(config.render.fit, Fit::Cover);
    }

    #[test]
    fn test_from_toml_keeps_base_dirs_relative() {
        let temp_dir = TempDir::new().unwrap();
        let toml_path = temp_dir.path().join("config.toml");
        fs::write(
            &toml_path,
            "[collect]\nfull_images_dir = \"static/full\"\nthumbnails_dir = \"static/thumbs\"\n",
        )
        .unwrap();

        let config = parse_toml(&toml_path, Path::new("/somewhere/else")).unwrap();
        let record_path = config.collect.thumbnail_path("small-view", "a.jpg");
        assert_eq!(record_path, PathBuf::from("static/thumbs/small-view/a.jpg"));
        assert_eq!(
            config.collect.full_image_path("a.jpg"),
            PathBuf::from("static/full/a.jpg")
        );
    }

    #[test]
    fn test_from_toml_invalid_path() {
        let invalid_path = PathBuf::from("/nonexistent/config.toml");
        let project_root = PathBuf::from("/tmp");
        assert!(Config::from_toml(&invalid_path, &project_root).is_err());
    }

    #[test]
    fn test_from_toml_invalid_extension() {
        let temp_dir = TempDir::new().unwrap();
        let invalid_path = temp_dir.path().join("config.txt");
        fs::write(&invalid_path, "[render]\nenabled = false").unwrap();
        assert!(Config::from_toml(&invalid_path, temp_dir.path()).is_err());
    }

    #[test]
    fn test_parse_toml_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let invalid_toml_path = temp_dir.path().join("invalid.toml");
        fs::write(&invalid_toml_path, "invalid toml [[[").unwrap();
        assert!(parse_toml(&invalid_toml_path, temp_dir.path()).is_err());
    }

    #[test]
    fn test_parse_toml_unknown_variant() {
        let temp_dir = TempDir::new().unwrap();
        let toml_path = temp_dir.path().join("config.toml");
        fs::write(&toml_path, "[collect]\nexpansion = \"Sideways\"\n").unwrap();

        let err = parse_toml(&toml_path, temp_dir.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("PerClass"), "{message}");
        assert!(message.contains("Consolidated"), "{message}");
    }

    #[test]
    fn test_parse_toml_rejects_bad_sizes() {
        let temp_dir = TempDir::new().unwrap();
        let toml_path = temp_dir.path().join("config.toml");
        let toml_content = r#"
[[collect.sizes]]
name = "twice"
width = 10
height = 10

[[collect.sizes]]
name = "twice"
width = 20
height = 20
"#;
        fs::write(&toml_path, toml_content).unwrap();

        assert!(matches!(
            parse_toml(&toml_path, temp_dir.path()),
            Err(AppError::Config(_))
        ));
    }
}
