use indicatif::ProgressIterator;

use crate::progress_bar::render_progress_bar;

use super::{CancelToken, Imaging, RenderArgs, RenderJob, RenderReport, render_job};

/// Naive sequential rendering: process images one by one
pub fn sequential_render(
    jobs: Vec<RenderJob>,
    args: &RenderArgs,
    imaging: &Imaging,
    token: &CancelToken,
) -> RenderReport {
    tracing::info!("Running sequential thumbnail rendering...");
    tracing::info!("Total images to render: {}", jobs.len());

    let mut report = RenderReport::default();
    let pb = render_progress_bar(jobs.len());

    for job in jobs.iter().progress_with(pb) {
        report.record(render_job(job, args, imaging, token));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::plan_jobs;
    use crate::render::tests::fixture;
    use crate::source::scan;
    use tempfile::TempDir;

    #[test]
    fn test_sequential_render() {
        let temp_dir = TempDir::new().unwrap();
        let (source_dir, collect_args) = fixture(&temp_dir);
        let jobs = plan_jobs(&scan(&source_dir).unwrap(), &collect_args);

        let imaging = Imaging::acquire(None).unwrap();
        let report = sequential_render(jobs, &RenderArgs::default(), &imaging, &CancelToken::new());

        assert_eq!(report.rendered, 2);
        assert_eq!(report.thumbnails, 10);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].source_path.ends_with("broken.jpeg"));

        let small = collect_args.thumbnail_path("small-view", "wide.jpg");
        assert_eq!(image::image_dimensions(&small).unwrap(), (90, 90));
        let gigantic = collect_args.thumbnail_path("gigantic-view", "tall.png");
        assert_eq!(image::image_dimensions(&gigantic).unwrap(), (600, 600));
    }
}
