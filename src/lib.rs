mod collector;
mod error;
mod logging;
mod picker;
mod progress_bar;
mod render;
mod session;
mod size_class;
mod source;
mod toml_utils;

pub use error::{AppError, RenderError, Result, ScanError};
pub use logging::init_logger;
pub use progress_bar::progress_bar_style;
pub use size_class::{SizeTable, ThumbSize};
pub use source::{
    DATE_FORMAT, IMAGE_EXTENSIONS, ImageEntry, Source, extension_of, format_date, is_image_name,
    scan,
};
pub use toml_utils::{Config, parse_toml};

// Core collection API
pub use collector::{CollectArgs, Expansion, ImageWithThumbnails, build, collect};

// Thumbnail rendering
pub use render::{
    CancelToken, FailedImage, Fit, Imaging, JobOutcome, RenderArgs, RenderFn, RenderHandle,
    RenderJob, RenderReport, auto_render, fit_image, plan_jobs, render_job, save_thumbnail,
    sequential_render, spawn_render, worker_pool_render,
};

// Shell boundary
#[cfg(feature = "dialog")]
pub use picker::DialogPicker;
pub use picker::{FixedPicker, FolderPicker};
pub use session::Session;
