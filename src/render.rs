// -- submodules
mod handle;
mod imaging;
mod sequential;
mod thumbnail;
mod worker_pool;

pub use handle::{CancelToken, RenderHandle, spawn_render};
pub use imaging::Imaging;
pub use sequential::sequential_render;
pub use thumbnail::{fit_image, save_thumbnail};
pub use worker_pool::worker_pool_render;

// -- external imports
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use strum::{Display, EnumString, VariantNames};

use crate::collector::CollectArgs;
use crate::error::RenderError;
use crate::size_class::ThumbSize;
use crate::source::ImageEntry;
use crate::toml_utils::deserialize_variant;

// -- enums

/// Rendering strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, VariantNames, Default)]
pub enum RenderFn {
    #[strum(serialize = "Sequential")]
    Sequential,

    #[default]
    #[strum(serialize = "WorkerPool")]
    WorkerPool,
}

/// How a source image is fitted into a size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, VariantNames, Default)]
pub enum Fit {
    /// Fill the whole box, cropping the overflow around the centre
    #[default]
    #[strum(serialize = "Cover")]
    Cover,

    /// Fit inside the box, keeping the aspect ratio
    #[strum(serialize = "Contain")]
    Contain,
}

// -- structs

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderArgs {
    /// Whether thumbnails are rendered after a collection is built
    pub enabled: bool,

    /// Rendering strategy to use
    #[serde(deserialize_with = "deserialize_variant")]
    pub render_fn: RenderFn,

    /// Worker threads for `WorkerPool` (defaults to available parallelism)
    pub workers: Option<usize>,

    /// Job queue capacity for `WorkerPool`
    pub channel_capacity: Option<usize>,

    /// Resize policy
    #[serde(deserialize_with = "deserialize_variant")]
    pub fit: Fit,

    /// Also copy each source image to its canonical full-image path
    pub copy_full_images: bool,

    /// Decoder allocation limit in bytes
    pub max_decode_bytes: Option<u64>,

    /// Show verbose output
    pub verbose: bool,
}

impl Default for RenderArgs {
    fn default() -> Self {
        Self {
            enabled: true,
            render_fn: RenderFn::default(),
            workers: None,
            channel_capacity: Some(8),
            fit: Fit::default(),
            copy_full_images: false,
            max_decode_bytes: None,
            verbose: false,
        }
    }
}

impl RenderArgs {
    pub fn worker_count(&self) -> usize {
        self.workers
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
            .max(1)
    }
}

/// All the thumbnails of one source image, rendered from a single decode
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub name: String,
    pub source_path: PathBuf,
    pub full_image: PathBuf,
    pub targets: Vec<(ThumbSize, PathBuf)>,
}

/// Result of a single job
#[derive(Debug)]
pub enum JobOutcome {
    Rendered { name: String, thumbnails: usize },
    Failed { source_path: PathBuf, error: RenderError },
    Cancelled { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedImage {
    pub source_path: PathBuf,
    pub reason: String,
}

/// Totals of a render run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Images whose thumbnails were all written
    pub rendered: usize,

    /// Thumbnail files written
    pub thumbnails: usize,

    /// Images skipped because of an error
    pub failed: Vec<FailedImage>,

    /// Jobs dropped by cancellation
    pub cancelled: usize,
}

impl RenderReport {
    pub fn record(&mut self, outcome: JobOutcome) {
        match outcome {
            JobOutcome::Rendered { thumbnails, .. } => {
                self.rendered += 1;
                self.thumbnails += thumbnails;
            }
            JobOutcome::Failed { source_path, error } => self.failed.push(FailedImage {
                source_path,
                reason: error.to_string(),
            }),
            JobOutcome::Cancelled { .. } => self.cancelled += 1,
        }
    }

    /// Jobs accounted for so far
    pub fn processed(&self) -> usize {
        self.rendered + self.failed.len() + self.cancelled
    }
}

// -- public API

/// Turn scanned entries into render jobs using the collection's canonical paths
pub fn plan_jobs(entries: &[ImageEntry], args: &CollectArgs) -> Vec<RenderJob> {
    entries
        .iter()
        .map(|entry| RenderJob {
            name: entry.name.clone(),
            source_path: entry.source_path.clone(),
            full_image: args.full_image_path(&entry.name),
            targets: args
                .sizes
                .iter()
                .map(|size| (size.clone(), args.thumbnail_path(&size.name, &entry.name)))
                .collect(),
        })
        .collect()
}

/// Render all jobs with the configured strategy.
///
/// Per-image failures are logged and reported, never returned as errors.
pub fn auto_render(
    jobs: Vec<RenderJob>,
    args: &RenderArgs,
    imaging: &Imaging,
    token: &CancelToken,
) -> RenderReport {
    let start_time = Instant::now();
    let total_jobs = jobs.len();

    let report = match args.render_fn {
        RenderFn::Sequential => sequential_render(jobs, args, imaging, token),
        RenderFn::WorkerPool => worker_pool_render(jobs, args, imaging, token),
    };

    if report.cancelled > 0 {
        tracing::warn!(
            "Rendering cancelled, {} of {} image(s) skipped",
            report.cancelled,
            total_jobs
        );
    }
    tracing::info!(
        "Rendered {} thumbnail(s) for {} image(s), {} failed, in {:.3?}",
        report.thumbnails,
        report.rendered,
        report.failed.len(),
        start_time.elapsed()
    );
    report
}

/// Render every thumbnail of one job
pub fn render_job(
    job: &RenderJob,
    args: &RenderArgs,
    imaging: &Imaging,
    token: &CancelToken,
) -> JobOutcome {
    let cancelled = || JobOutcome::Cancelled {
        name: job.name.clone(),
    };
    let failed = |error: RenderError| {
        tracing::error!("Skipping image {:?}: {}", job.source_path, error);
        JobOutcome::Failed {
            source_path: job.source_path.clone(),
            error,
        }
    };

    if token.is_cancelled() {
        return cancelled();
    }

    let image = match imaging.decode(&job.source_path) {
        Ok(img) => img,
        Err(e) => return failed(e),
    };

    if args.copy_full_images {
        if let Err(e) = copy_full_image(&job.source_path, &job.full_image) {
            return failed(e);
        }
    }

    let mut written = 0;
    for (size, dest) in &job.targets {
        if token.is_cancelled() {
            return cancelled();
        }
        if args.verbose {
            tracing::debug!("[Rendering]: {} as {}", job.name, size.name);
        }

        let thumb = fit_image(&image, size, args.fit);
        if let Err(e) = save_thumbnail(thumb, dest) {
            return failed(e);
        }
        written += 1;
    }

    JobOutcome::Rendered {
        name: job.name.clone(),
        thumbnails: written,
    }
}

fn copy_full_image(source: &Path, dest: &Path) -> Result<(), RenderError> {
    let io_err = |source| RenderError::Io {
        path: dest.to_path_buf(),
        source,
    };

    // copying a file onto itself would truncate it
    if let (Ok(a), Ok(b)) = (fs::canonicalize(source), fs::canonicalize(dest)) {
        if a == b {
            return Ok(());
        }
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::copy(source, dest).map_err(io_err)?;
    Ok(())
}

// -- tests

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::TempDir;

    /// Write a small solid-colour image, format picked from the extension
    pub(crate) fn write_image(path: &Path, width: u32, height: u32) {
        let format = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(crate::source::extension_of)
            .and_then(ImageFormat::from_extension)
            .unwrap_or(ImageFormat::Jpeg);
        match format {
            ImageFormat::Png => RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, 128]))
                .save_with_format(path, format)
                .unwrap(),
            _ => RgbImage::from_pixel(width, height, Rgb([30, 200, 30]))
                .save_with_format(path, format)
                .unwrap(),
        }
    }

    /// Source directory with two good images and a corrupt one
    pub(crate) fn fixture(temp_dir: &TempDir) -> (PathBuf, CollectArgs) {
        let source_dir = temp_dir.path().join("pictures");
        fs::create_dir(&source_dir).unwrap();
        write_image(&source_dir.join("wide.jpg"), 120, 60);
        write_image(&source_dir.join("tall.png"), 40, 100);
        fs::write(source_dir.join("broken.jpeg"), b"definitely not a jpeg").unwrap();

        let args = CollectArgs {
            full_images_dir: temp_dir.path().join("fullImages"),
            thumbnails_dir: temp_dir.path().join("thumbnails"),
            ..Default::default()
        };
        (source_dir, args)
    }

    #[test]
    fn test_plan_jobs() {
        let args = CollectArgs::default();
        let entries = vec![ImageEntry {
            name: "a.jpg".to_string(),
            date: "2024-01-01T10:00".to_string(),
            source_path: PathBuf::from("/pictures/a.jpg"),
        }];

        let jobs = plan_jobs(&entries, &args);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].full_image, Path::new("fullImages/a.jpg"));
        assert_eq!(jobs[0].targets.len(), 5);
        assert_eq!(jobs[0].targets[0].0.name, "small-view");
        assert_eq!(jobs[0].targets[0].1, Path::new("thumbnails/small-view/a.jpg"));
    }

    #[test]
    fn test_render_job_skips_corrupt_image() {
        let temp_dir = TempDir::new().unwrap();
        let (source_dir, collect_args) = fixture(&temp_dir);
        let entries = crate::source::scan(&source_dir).unwrap();
        let broken = plan_jobs(&entries, &collect_args)
            .into_iter()
            .find(|job| job.name == "broken.jpeg")
            .unwrap();

        let imaging = Imaging::acquire(None).unwrap();
        let outcome = render_job(
            &broken,
            &RenderArgs::default(),
            &imaging,
            &CancelToken::new(),
        );
        match outcome {
            JobOutcome::Failed { error, .. } => {
                assert!(matches!(error, RenderError::Decode { .. }))
            }
            other => panic!("Expected Failed, got {:?}", other),
        }
        assert!(!collect_args.thumbnail_path("small-view", "broken.jpeg").exists());
    }

    #[test]
    fn test_render_job_cancelled_before_start() {
        let temp_dir = TempDir::new().unwrap();
        let (source_dir, collect_args) = fixture(&temp_dir);
        let entries = crate::source::scan(source_dir.join("wide.jpg")).unwrap();
        let jobs = plan_jobs(&entries, &collect_args);

        let token = CancelToken::new();
        token.cancel();
        let imaging = Imaging::acquire(None).unwrap();
        let outcome = render_job(&jobs[0], &RenderArgs::default(), &imaging, &token);
        assert!(matches!(outcome, JobOutcome::Cancelled { .. }));
        assert!(!collect_args.thumbnails_dir.exists());
    }

    #[test]
    fn test_render_job_copies_full_image() {
        let temp_dir = TempDir::new().unwrap();
        let (source_dir, collect_args) = fixture(&temp_dir);
        let entries = crate::source::scan(source_dir.join("tall.png")).unwrap();
        let jobs = plan_jobs(&entries, &collect_args);

        let args = RenderArgs {
            copy_full_images: true,
            ..Default::default()
        };
        let imaging = Imaging::acquire(None).unwrap();
        let outcome = render_job(&jobs[0], &args, &imaging, &CancelToken::new());
        assert!(matches!(
            outcome,
            JobOutcome::Rendered { thumbnails: 5, .. }
        ));

        let copied = collect_args.full_image_path("tall.png");
        assert_eq!(
            fs::read(&copied).unwrap(),
            fs::read(source_dir.join("tall.png")).unwrap()
        );
    }

    #[test]
    fn test_render_job_dot_only_png_name() {
        let temp_dir = TempDir::new().unwrap();
        let (source_dir, collect_args) = fixture(&temp_dir);
        write_image(&source_dir.join(".png"), 30, 20);
        let entries = crate::source::scan(source_dir.join(".png")).unwrap();
        let jobs = plan_jobs(&entries, &collect_args);

        let imaging = Imaging::acquire(None).unwrap();
        let outcome = render_job(&jobs[0], &RenderArgs::default(), &imaging, &CancelToken::new());
        assert!(matches!(
            outcome,
            JobOutcome::Rendered { thumbnails: 5, .. }
        ));

        let thumb = collect_args.thumbnail_path("small-view", ".png");
        let written = image::ImageReader::open(&thumb)
            .unwrap()
            .with_guessed_format()
            .unwrap();
        assert_eq!(written.format(), Some(ImageFormat::Png));
        assert_eq!(written.into_dimensions().unwrap(), (90, 90));
    }

    #[test]
    fn test_copy_full_image_onto_itself() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("same.jpg");
        write_image(&path, 4, 4);
        let before = fs::read(&path).unwrap();

        copy_full_image(&path, &path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_report_record() {
        let mut report = RenderReport::default();
        report.record(JobOutcome::Rendered {
            name: "a.jpg".to_string(),
            thumbnails: 5,
        });
        report.record(JobOutcome::Cancelled {
            name: "b.jpg".to_string(),
        });
        report.record(JobOutcome::Failed {
            source_path: PathBuf::from("c.jpg"),
            error: RenderError::Io {
                path: PathBuf::from("c.jpg"),
                source: std::io::Error::other("disk full"),
            },
        });

        assert_eq!(report.rendered, 1);
        assert_eq!(report.thumbnails, 5);
        assert_eq!(report.cancelled, 1);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].reason.contains("disk full"));
        assert_eq!(report.processed(), 3);
    }

    #[test]
    fn test_worker_count() {
        let args = RenderArgs {
            workers: Some(0),
            ..Default::default()
        };
        assert_eq!(args.worker_count(), 1);
        assert!(RenderArgs::default().worker_count() >= 1);
    }
}
