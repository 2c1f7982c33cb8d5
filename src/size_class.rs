use serde::Deserialize;
use std::collections::HashSet;
use std::ops::Deref;

use crate::error::{AppError, Result};

/// A named thumbnail dimension profile
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ThumbSize {
    /// Class name, also the sub-directory thumbnails of this class live in
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl ThumbSize {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }
}

/// Ordered, immutable list of size classes.
///
/// Iteration order is the order classes were declared in, which is also the
/// order the collection builder expands entries in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SizeTable(Vec<ThumbSize>);

impl SizeTable {
    /// Build a table from explicit classes, rejecting unusable ones.
    pub fn new(sizes: Vec<ThumbSize>) -> Result<Self> {
        let table = Self(sizes);
        table.validate()?;
        Ok(table)
    }

    pub fn get(&self, name: &str) -> Option<&ThumbSize> {
        self.0.iter().find(|size| size.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|size| size.name.as_str())
    }

    /// Check the table can be used to build canonical paths.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - The table is empty
    /// - A name is empty, duplicated or contains a path separator
    /// - A width or height is zero
    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(AppError::Config(
                "thumbnail size table must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for size in &self.0 {
            if size.name.is_empty() || size.name.contains(['/', '\\']) || size.name == ".." {
                return Err(AppError::Config(format!(
                    "invalid thumbnail size class name: {:?}",
                    size.name
                )));
            }
            if !seen.insert(size.name.as_str()) {
                return Err(AppError::Config(format!(
                    "duplicate thumbnail size class: {:?}",
                    size.name
                )));
            }
            if size.width == 0 || size.height == 0 {
                return Err(AppError::Config(format!(
                    "thumbnail size class {:?} has a zero dimension ({}x{})",
                    size.name, size.width, size.height
                )));
            }
        }
        Ok(())
    }
}

impl Default for SizeTable {
    fn default() -> Self {
        Self(vec![
            ThumbSize::new("small-view", 90, 90),
            ThumbSize::new("medium-view", 150, 150),
            ThumbSize::new("large-view", 226, 226),
            ThumbSize::new("gigantic-view", 600, 600),
            ThumbSize::new("details-view", 26, 26),
        ])
    }
}

impl Deref for SizeTable {
    type Target = [ThumbSize];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a SizeTable {
    type Item = &'a ThumbSize;
    type IntoIter = std::slice::Iter<'a, ThumbSize>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
