use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crate::error::{AppError, Result};

use super::{Imaging, RenderArgs, RenderJob, RenderReport, auto_render};

/// Shared cancellation flag for a render run
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A render running on its own thread
#[derive(Debug)]
pub struct RenderHandle {
    token: CancelToken,
    thread: JoinHandle<RenderReport>,
}

impl RenderHandle {
    /// Ask the render to stop; outstanding jobs are dropped
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the render to end and return its report
    pub fn join(self) -> Result<RenderReport> {
        self.thread
            .join()
            .map_err(|_| AppError::Worker("render thread panicked".to_string()))
    }
}

/// Start rendering `jobs` in the background
///
/// # Errors
///
/// Returns `AppError::Io` if the render thread can't be spawned.
pub fn spawn_render(
    jobs: Vec<RenderJob>,
    args: RenderArgs,
    imaging: Arc<Imaging>,
) -> Result<RenderHandle> {
    let token = CancelToken::new();
    let thread_token = token.clone();

    let thread = thread::Builder::new()
        .name("thumbnail-render".to_string())
        .spawn(move || auto_render(jobs, &args, &imaging, &thread_token))?;

    Ok(RenderHandle { token, thread })
}
