use crate::outcome::Response;
use std::sync::{Mutex, MutexGuard};

/// Successful responses collected across all workers, in completion order
#[derive(Debug, Default)]
pub struct ResultSink {
    responses: Mutex<Vec<Response>>,
}

impl ResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: Response) {
        self.lock().push(response);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move everything collected so far out of the sink
    pub fn take(&self) -> Vec<Response> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Response>> {
        self.responses.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;
    use bytes::Bytes;

    fn response(target: &str) -> Response {
        Response {
            request: Request::get(target),
            status: 200,
            body: Bytes::from_static(b"ok"),
        }
    }

    #[test]
    fn test_take_empties_sink() {
        let sink = ResultSink::new();
        sink.push(response("a"));
        sink.push(response("b"));
        assert_eq!(sink.len(), 2);

        let taken = sink.take();
        assert_eq!(taken[0].request.target, "a");
        assert_eq!(taken[1].request.target, "b");
        assert!(sink.is_empty());
    }
}
