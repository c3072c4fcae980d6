use super::Shared;
use super::procedure::process;
use crate::transport::Transport;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// One member of the pool: dequeue, process, repeat until told to stop
pub(super) struct Worker<T: ?Sized> {
    pub id: usize,
    pub shared: Arc<Shared<T>>,
    pub stop: watch::Receiver<bool>,
}

impl<T> Worker<T>
where
    T: Transport + ?Sized,
{
    pub async fn run(mut self) {
        debug!(worker_id = self.id, "Worker started");

        loop {
            // Stop is only observed while idle; a request in flight always finishes
            let request = tokio::select! {
                biased;
                _ = stopped(&mut self.stop) => break,
                request = self.shared.queue.dequeue() => request,
            };

            process(&self.shared, request).await;
        }

        debug!(worker_id = self.id, "Worker stopped");
    }
}

async fn stopped(stop: &mut watch::Receiver<bool>) {
    // A dropped sender also means stop
    let _ = stop.wait_for(|stop| *stop).await;
}
