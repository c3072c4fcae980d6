use crate::request::Request;
use std::collections::VecDeque;
use std::sync::Mutex;
use thiserror::Error;
use tokio::sync::{Notify, watch};
use tracing::debug;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("mark_done() called more times than items were enqueued")]
    TooManyDone,
}

/// Unbounded FIFO shared between producers and the downloader's workers
///
/// Besides plain hand-off it tracks how many dequeued items are still being
/// worked on, so [`TaskQueue::wait_drained`] can resolve once every item ever
/// enqueued has been taken out *and* reported back through
/// [`TaskQueue::mark_done`].
#[derive(Debug)]
pub struct TaskQueue {
    buffer: Mutex<VecDeque<Request>>,
    available: Notify,
    /// Items enqueued but not yet marked done
    unfinished: watch::Sender<usize>,
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskQueue {
    pub fn new() -> Self {
        let (unfinished, _) = watch::channel(0);
        Self {
            buffer: Mutex::new(VecDeque::new()),
            available: Notify::new(),
            unfinished,
        }
    }

    /// Append a request to the tail. Never blocks.
    pub fn enqueue(&self, request: Request) {
        // Count first so a fast worker can never mark it done before it is counted
        self.unfinished.send_modify(|n| *n += 1);
        self.lock_buffer().push_back(request);
        self.available.notify_one();
    }

    /// Wait until a request is available and take it
    ///
    /// Cancel safe: if the returned future is dropped while waiting, nothing
    /// is removed from the queue.
    pub async fn dequeue(&self) -> Request {
        loop {
            let notified = self.available.notified();
            if let Some(request) = self.try_dequeue() {
                return request;
            }
            notified.await;
        }
    }

    /// Take the head of the queue if there is one
    pub fn try_dequeue(&self) -> Option<Request> {
        self.lock_buffer().pop_front()
    }

    /// Report that a previously dequeued request has been fully processed
    pub fn mark_done(&self) -> Result<(), QueueError> {
        let mut result = Ok(());
        self.unfinished.send_if_modified(|n| {
            if *n == 0 {
                result = Err(QueueError::TooManyDone);
                false
            } else {
                *n -= 1;
                true
            }
        });

        if result.is_ok() && self.unfinished() == 0 {
            debug!("Task queue drained");
        }
        result
    }

    /// Wait until every enqueued request has been dequeued and marked done
    pub async fn wait_drained(&self) {
        let mut rx = self.unfinished.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait
        let _ = rx.wait_for(|n| *n == 0).await;
    }

    /// Number of requests waiting to be dequeued
    pub fn len(&self) -> usize {
        self.lock_buffer().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of requests enqueued but not yet marked done
    pub fn unfinished(&self) -> usize {
        *self.unfinished.borrow()
    }

    fn lock_buffer(&self) -> std::sync::MutexGuard<'_, VecDeque<Request>> {
        // A poisoned buffer is still a valid VecDeque; keep going
        self.buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FromIterator<Request> for TaskQueue {
    fn from_iter<I: IntoIterator<Item = Request>>(iter: I) -> Self {
        let queue = TaskQueue::new();
        for request in iter {
            queue.enqueue(request);
        }
        queue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_fifo_order() {
        let queue: TaskQueue = ["a", "b", "c"].into_iter().map(Request::get).collect();
        assert_eq!(queue.len(), 3);

        assert_eq!(queue.dequeue().await.target, "a");
        assert_eq!(queue.dequeue().await.target, "b");
        assert_eq!(queue.dequeue().await.target, "c");
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_dequeue_waits_for_enqueue() {
        let queue = Arc::new(TaskQueue::new());

        let consumer = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.dequeue().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!consumer.is_finished());

        queue.enqueue(Request::get("late"));
        let request = timeout(Duration::from_secs(1), consumer).await.unwrap().unwrap();
        assert_eq!(request.target, "late");
    }

    #[tokio::test]
    async fn test_cancelled_dequeue_takes_nothing() {
        let queue = TaskQueue::new();

        let result = timeout(Duration::from_millis(20), queue.dequeue()).await;
        assert!(result.is_err());

        queue.enqueue(Request::get("kept"));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.dequeue().await.target, "kept");
    }

    #[tokio::test]
    async fn test_wait_drained_requires_mark_done() {
        let queue = Arc::new(TaskQueue::new());
        queue.enqueue(Request::get("a"));
        queue.enqueue(Request::get("b"));

        queue.dequeue().await;
        queue.dequeue().await;
        assert!(queue.is_empty());
        assert_eq!(queue.unfinished(), 2);

        // Empty but not done yet
        assert!(timeout(Duration::from_millis(20), queue.wait_drained()).await.is_err());

        queue.mark_done().unwrap();
        assert!(timeout(Duration::from_millis(20), queue.wait_drained()).await.is_err());

        queue.mark_done().unwrap();
        timeout(Duration::from_secs(1), queue.wait_drained()).await.unwrap();
    }

    #[tokio::test]
    async fn test_wait_drained_on_empty_queue_returns() {
        let queue = TaskQueue::new();
        timeout(Duration::from_secs(1), queue.wait_drained()).await.unwrap();
    }

    #[test]
    fn test_too_many_done() {
        let queue = TaskQueue::new();
        assert!(matches!(queue.mark_done(), Err(QueueError::TooManyDone)));

        queue.enqueue(Request::get("a"));
        queue.try_dequeue().unwrap();
        queue.mark_done().unwrap();
        assert!(matches!(queue.mark_done(), Err(QueueError::TooManyDone)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_consumers_each_item_once() {
        let queue = Arc::new(TaskQueue::new());
        let mut consumers = Vec::new();

        for _ in 0..4 {
            let queue = queue.clone();
            consumers.push(tokio::spawn(async move {
                let mut seen = Vec::new();
                while let Ok(request) = timeout(Duration::from_millis(100), queue.dequeue()).await {
                    seen.push(request.target);
                    queue.mark_done().unwrap();
                }
                seen
            }));
        }

        for i in 0..200 {
            queue.enqueue(Request::get(format!("item-{}", i)));
        }

        let mut all = Vec::new();
        for consumer in consumers {
            all.extend(consumer.await.unwrap());
        }

        all.sort();
        all.dedup();
        assert_eq!(all.len(), 200);
        assert_eq!(queue.unfinished(), 0);
    }
}
