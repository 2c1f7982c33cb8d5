use std::path::PathBuf;

/// Something that lets the user choose a folder
pub trait FolderPicker {
    /// The chosen absolute path, or `None` if the user cancelled
    fn select_folder(&self) -> Option<PathBuf>;
}

/// A picker whose answer is known up front (config files, scripts, tests)
#[derive(Debug, Clone, Default)]
pub struct FixedPicker(pub Option<PathBuf>);

impl FolderPicker for FixedPicker {
    fn select_folder(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

/// Native folder dialog
#[cfg(feature = "dialog")]
#[derive(Debug, Clone)]
pub struct DialogPicker {
    pub title: String,
}

#[cfg(feature = "dialog")]
impl Default for DialogPicker {
    fn default() -> Self {
        Self {
            title: "Select Folder to add".to_string(),
        }
    }
}

#[cfg(feature = "dialog")]
impl FolderPicker for DialogPicker {
    fn select_folder(&self) -> Option<PathBuf> {
        rfd::FileDialog::new().set_title(&self.title).pick_folder()
    }
}
