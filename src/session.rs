use std::path::Path;
use std::sync::Arc;

use crate::collector::{CollectArgs, ImageWithThumbnails, build};
use crate::error::{AppError, Result};
use crate::picker::FolderPicker;
use crate::render::{Imaging, RenderArgs, RenderHandle, RenderReport, plan_jobs, spawn_render};
use crate::source::scan;
use crate::toml_utils::Config;

/// The folder currently on display and the thumbnails being rendered for it.
///
/// Opening another folder cancels whatever is still rendering for the
/// previous one.
#[derive(Debug)]
pub struct Session {
    collect: CollectArgs,
    render: RenderArgs,
    imaging: Arc<Imaging>,
    active: Option<RenderHandle>,
}

impl Session {
    /// # Errors
    ///
    /// Returns `AppError::Config` if imaging is already running under another
    /// decoder limit.
    pub fn new(collect: CollectArgs, render: RenderArgs) -> Result<Self> {
        let imaging = Imaging::acquire(render.max_decode_bytes)?;
        Ok(Self {
            collect,
            render,
            imaging,
            active: None,
        })
    }

    /// Build the collection for `path` and start rendering its thumbnails.
    ///
    /// # Errors
    ///
    /// Scan errors are returned as is; the previous render is cancelled either way.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<Vec<ImageWithThumbnails>> {
        let path = path.as_ref();
        if let Some(report) = self.cancel()? {
            tracing::debug!("Previous render stopped: {:?}", report);
        }

        let entries = scan(path)?;
        let collection = build(&entries, &self.collect);
        tracing::info!(
            "Opened {:?}: {} image(s), {} record(s)",
            path,
            entries.len(),
            collection.len()
        );

        if self.render.enabled && !entries.is_empty() {
            let jobs = plan_jobs(&entries, &self.collect);
            let handle = spawn_render(jobs, self.render.clone(), Arc::clone(&self.imaging))?;
            self.active = Some(handle);
        }

        Ok(collection)
    }

    /// Ask `picker` for a folder and open it; `Ok(None)` if the user cancelled
    pub fn select(
        &mut self,
        picker: &dyn FolderPicker,
    ) -> Result<Option<Vec<ImageWithThumbnails>>> {
        match picker.select_folder() {
            Some(path) => self.open(path).map(Some),
            None => {
                tracing::info!("No folder selected");
                Ok(None)
            }
        }
    }

    /// Wait for the active render, if any
    pub fn wait(&mut self) -> Result<Option<RenderReport>> {
        self.active.take().map(RenderHandle::join).transpose()
    }

    /// Stop the active render, if any, and return what it managed to do
    pub fn cancel(&mut self) -> Result<Option<RenderReport>> {
        if let Some(handle) = &self.active {
            handle.cancel();
        }
        self.wait()
    }

    pub fn is_rendering(&self) -> bool {
        self.active.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl TryFrom<Config> for Session {
    type Error = AppError;

    fn try_from(config: Config) -> Result<Self> {
        Self::new(config.collect, config.render)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Err(e) = self.cancel() {
            tracing::error!("Failed to stop rendering: {}", e);
        }
    }
}
