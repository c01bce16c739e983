// Request pipeline module - per-request context carried through the proxy hooks

use std::time::{Duration, Instant};
use uuid::Uuid;

/// Which terminal path a request took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Original bytes streamed as stored
    Passthrough,
    /// Original fetched in full and run through the transformer
    Transform,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Passthrough => "passthrough",
            RequestKind::Transform => "transform",
        }
    }
}

/// Request context that holds everything the logging hook needs once the
/// response has been written
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    start: Instant,
    path: String,
    kind: RequestKind,
    outcome: &'static str,
}

impl RequestContext {
    /// Create a new RequestContext
    /// Automatically generates a unique request ID (UUID v4) and starts the clock
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            start: Instant::now(),
            path: String::new(),
            kind: RequestKind::Passthrough,
            outcome: "ok",
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: RequestKind) {
        self.kind = kind;
    }

    /// Metrics label of the final response
    pub fn outcome(&self) -> &'static str {
        self.outcome
    }

    pub fn set_outcome(&mut self, outcome: &'static str) {
        self.outcome = outcome;
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
