//! Execution and classification of a single request

use super::Shared;
use crate::observability::RunStats;
use crate::outcome::{Outcome, RequestError, STATUS_NOT_FOUND};
use crate::queue::TaskQueue;
use crate::request::{Method, Request};
use crate::transport::Transport;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error, info, warn};

/// Run one request against the transport and turn whatever happens into an [`Outcome`]
///
/// Never fails and never panics outward: unsupported methods, transport
/// errors and panics inside the transport all come back as
/// `Outcome::TransportError`.
pub async fn execute<T>(transport: &T, request: Request) -> Outcome
where
    T: Transport + ?Sized,
{
    let payload = match &request.method {
        Method::Get => None,
        Method::Post => request.payload.as_ref(),
        Method::Other(verb) => {
            return Outcome::TransportError(RequestError::UnsupportedMethod(verb.clone()));
        }
    };

    let call = transport.execute(&request.method, &request.target, payload);
    let result = AssertUnwindSafe(call).catch_unwind().await;

    match result {
        Ok(Ok(raw)) => Outcome::from_raw(request, raw),
        Ok(Err(e)) => Outcome::TransportError(e.into()),
        Err(panic) => Outcome::TransportError(RequestError::Panicked(panic_message(panic))),
    }
}

/// Process one dequeued request end to end: execute, classify, record, release
pub(super) async fn process<T>(shared: &Shared<T>, request: Request)
where
    T: Transport + ?Sized,
{
    debug!(%request, "Working on request");

    let label = request.to_string();
    let _release = CompletionGuard {
        queue: &shared.queue,
        stats: &shared.stats,
    };

    let outcome = execute(&*shared.transport, request).await;
    record(shared, &label, outcome);
}

fn record<T: ?Sized>(shared: &Shared<T>, label: &str, outcome: Outcome) {
    match outcome {
        Outcome::Success(response) => {
            shared.stats.request_succeeded();
            shared.sink.push(response);
        }
        Outcome::HttpError { status, reason } => {
            let not_found = status == STATUS_NOT_FOUND;
            shared.stats.http_error(not_found);
            if not_found {
                info!("{} {} - {}", status, reason, label);
            } else {
                error!("{} {} - {}", status, reason, label);
            }
        }
        Outcome::TransportError(e) => {
            shared.stats.request_failed();
            warn!(error = %e, "{} while working on {}", e.kind(), label);
        }
    }
}

/// Counts the request as finished and releases it back to the queue on drop
///
/// Dropping happens on every exit path of [`process`], unwinding included,
/// so `wait_drained` can never be left waiting on a lost `mark_done`.
struct CompletionGuard<'a> {
    queue: &'a TaskQueue,
    stats: &'a RunStats,
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        let completed = self.stats.request_completed();
        info!("{} / {} collected!", completed, self.stats.total());

        if let Err(e) = self.queue.mark_done() {
            error!(error = %e, "Queue accounting out of sync");
        }
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
