//! State of a prediction request cycle.

use serde::Serialize;
use wind_common::PredictionResult;

/// What the presentation layer shows: a loading flag, the last error, and
/// the last successful result.
///
/// Changed only through [`start`](Self::start), [`succeed`](Self::succeed) and
/// [`fail`](Self::fail). A failure leaves the previous result in place, so a
/// stale result and a fresh error can be visible together.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PredictionState {
    loading: bool,
    error: Option<String>,
    result: Option<PredictionResult>,
}

impl PredictionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    /// A request went out.
    pub fn start(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// A request came back with a result; it replaces the previous one whole.
    pub fn succeed(&mut self, result: PredictionResult) {
        self.result = Some(result);
        self.loading = false;
    }

    /// A request failed with a user-facing message.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.loading = false;
    }

    /// Drop the loading flag for a request that was abandoned.
    pub(crate) fn release(&mut self) {
        self.loading = false;
    }
}
