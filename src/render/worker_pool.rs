use std::sync::{Arc, Mutex, mpsc};
use std::thread;

use crate::progress_bar::render_progress_bar;

use super::{CancelToken, Imaging, JobOutcome, RenderArgs, RenderJob, RenderReport, render_job};

/// Channel-based worker pool rendering
///
/// A feeder thread queues jobs on a bounded channel; `workers` threads take
/// jobs off it and send outcomes back to the calling thread, which keeps the
/// report and the progress bar. Outcomes arrive in completion order.
pub fn worker_pool_render(
    jobs: Vec<RenderJob>,
    args: &RenderArgs,
    imaging: &Imaging,
    token: &CancelToken,
) -> RenderReport {
    let total_jobs = jobs.len();
    let workers = args.worker_count().min(total_jobs.max(1));
    let channel_capacity = args.channel_capacity.unwrap_or(8).max(1);
    let verbose = args.verbose;

    tracing::info!("Running worker-pool thumbnail rendering...");
    tracing::info!("Workers: {}", workers);
    tracing::info!("Total images to render: {}", total_jobs);

    let (job_tx, job_rx) = mpsc::sync_channel::<RenderJob>(channel_capacity);
    let (outcome_tx, outcome_rx) = mpsc::channel::<JobOutcome>();
    let job_rx = Arc::new(Mutex::new(job_rx));

    let pb = render_progress_bar(total_jobs);
    let mut report = RenderReport::default();

    thread::scope(|s| {
        // Feeder: stops queueing as soon as rendering is cancelled
        let feed_handler = s.spawn(move || {
            for job in jobs {
                if token.is_cancelled() {
                    break;
                }
                if job_tx.send(job).is_err() {
                    break;
                }
            }
        });

        let worker_handlers: Vec<_> = (0..workers)
            .map(|worker_idx| {
                let job_rx = Arc::clone(&job_rx);
                let outcome_tx = outcome_tx.clone();
                s.spawn(move || {
                    loop {
                        let next = match job_rx.lock() {
                            Ok(rx) => rx.recv(),
                            Err(_) => break,
                        };
                        let Ok(job) = next else {
                            break;
                        };

                        if verbose {
                            tracing::debug!("[Worker {}]: {}", worker_idx, job.name);
                        }
                        let outcome = render_job(&job, args, imaging, token);
                        if outcome_tx.send(outcome).is_err() {
                            break;
                        }
                    }
                })
            })
            .collect();

        // Workers hold the remaining receiver/sender clones
        drop(job_rx);
        drop(outcome_tx);

        for outcome in outcome_rx {
            report.record(outcome);
            pb.inc(1);
        }

        if feed_handler.join().is_err() {
            tracing::error!("Render feeder thread panicked");
        }
        for handler in worker_handlers {
            if handler.join().is_err() {
                tracing::error!("Render worker thread panicked");
            }
        }
    });

    // jobs the feeder never queued
    report.cancelled += total_jobs.saturating_sub(report.processed());
    pb.finish_using_style();
    report
}
