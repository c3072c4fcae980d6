//! Bounded-concurrency downloader
//!
//! A [`Downloader`] drains a [`TaskQueue`] with a fixed number of workers:
//!
//! 1. `run()` snapshots the queue size as the run total
//! 2. spawns `num_workers` workers that loop dequeue -> execute -> classify -> mark done
//! 3. waits for the queue to drain
//! 4. signals every worker to stop and joins them
//! 5. hands back the successful responses in completion order
//!
//! Failures never leave a worker: non-200 statuses and transport errors are
//! logged and counted in [`RunStats`], and simply do not show up in the
//! returned responses.

mod procedure;
mod sink;
mod worker;

pub use procedure::execute;
pub use sink::ResultSink;

use crate::config::DownloaderConfig;
use crate::observability::RunStats;
use crate::outcome::Response;
use crate::queue::TaskQueue;
use crate::transport::Transport;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;
use worker::Worker;

#[derive(Debug, Error)]
pub enum DownloaderError {
    #[error("num_workers must be a positive integer, got {0}")]
    InvalidWorkerCount(usize),
}

/// State shared by every worker of one run
pub(crate) struct Shared<T: ?Sized> {
    pub queue: Arc<TaskQueue>,
    pub stats: Arc<RunStats>,
    pub sink: ResultSink,
    pub transport: Arc<T>,
}

/// Worker pool bound to one queue and one transport. Single use: `run` consumes it.
pub struct Downloader<T: ?Sized> {
    shared: Arc<Shared<T>>,
    num_workers: usize,
}

impl<T> Downloader<T>
where
    T: Transport + ?Sized + 'static,
{
    pub fn new(
        transport: Arc<T>,
        queue: Arc<TaskQueue>,
        num_workers: usize,
    ) -> Result<Self, DownloaderError> {
        if num_workers == 0 {
            return Err(DownloaderError::InvalidWorkerCount(num_workers));
        }

        Ok(Self {
            shared: Arc::new(Shared {
                queue,
                stats: Arc::new(RunStats::new()),
                sink: ResultSink::new(),
                transport,
            }),
            num_workers,
        })
    }

    pub fn from_config(
        transport: Arc<T>,
        queue: Arc<TaskQueue>,
        config: &DownloaderConfig,
    ) -> Result<Self, DownloaderError> {
        Self::new(transport, queue, config.num_workers)
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Handle to the run counters; stays readable after `run` returns
    pub fn stats(&self) -> Arc<RunStats> {
        self.shared.stats.clone()
    }

    /// Drain the queue and return every successful response
    pub async fn run(self) -> Vec<Response> {
        let span = info_span!(
            "download_run",
            run_id = %Uuid::now_v7(),
            num_workers = self.num_workers
        );
        self.drain().instrument(span).await
    }

    async fn drain(self) -> Vec<Response> {
        let shared = self.shared;
        shared.stats.set_total(shared.queue.len());
        info!(total = shared.stats.total(), "Starting downloader");

        let (stop_tx, stop_rx) = watch::channel(false);
        let mut workers = JoinSet::new();

        for id in 0..self.num_workers {
            let worker = Worker {
                id,
                shared: shared.clone(),
                stop: stop_rx.clone(),
            };
            workers.spawn(worker.run().instrument(info_span!("worker", worker_id = id)));
        }
        drop(stop_rx);

        shared.queue.wait_drained().await;

        // Every worker is now idle in dequeue, which is where stop is observed
        let _ = stop_tx.send(true);
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Worker exited abnormally");
            }
        }

        let snapshot = shared.stats.snapshot();
        info!(
            total = snapshot.total,
            completed = snapshot.completed,
            succeeded = snapshot.succeeded,
            http_errors = snapshot.http_errors,
            failed = snapshot.failed,
            "Downloader finished"
        );

        shared.sink.take()
    }
}
