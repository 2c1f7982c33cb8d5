use indicatif::{ProgressBar, ProgressFinish, ProgressStyle};

/// Get a standardized progress bar style
pub fn progress_bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg}: {wide_bar:.cyan/blue} {pos}/{len} [{elapsed_precise}]")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

/// Progress bar for `total` render jobs
pub fn render_progress_bar(total: usize) -> ProgressBar {
    ProgressBar::new(total as u64)
        .with_style(progress_bar_style())
        .with_message("Rendering thumbnails")
        .with_finish(ProgressFinish::WithMessage("Finished".into()))
}
