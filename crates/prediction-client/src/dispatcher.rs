//! Prediction dispatch: one request cycle from input record to state update.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{info, instrument, warn};
use wind_common::{InputRecord, PredictionResult, WindResult};

use crate::api::{HealthStatus, HttpPredictionApi, PredictionApi};
use crate::config::ClientConfig;
use crate::response::{normalize, RawResponse};
use crate::state::PredictionState;

/// Issues predictions and records their outcome.
///
/// Overlapping [`predict`](Self::predict) calls on the same state are allowed.
/// The state lock is never held across the network await, so whichever call
/// completes last owns the result slot.
pub struct Dispatcher<A = HttpPredictionApi> {
    api: A,
}

impl Dispatcher<HttpPredictionApi> {
    /// Dispatcher talking HTTP to the configured service.
    pub fn from_config(config: ClientConfig) -> WindResult<Self> {
        Ok(Self::new(HttpPredictionApi::new(config)?))
    }
}

impl<A: PredictionApi> Dispatcher<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Request a prediction and normalize the reply, without touching any state.
    #[instrument(skip(self, input))]
    pub async fn fetch(&self, input: &InputRecord) -> WindResult<PredictionResult> {
        let body = self.api.predict(input).await?;
        let raw = RawResponse::decode(body)?;
        Ok(normalize(raw, input))
    }

    /// Run one request cycle against `state`.
    ///
    /// Errors never escape: they land in the state's error slot as a
    /// user-facing message, leaving any earlier result in place. The loading
    /// flag is cleared on every exit, including when this future is dropped
    /// before completing.
    #[instrument(skip_all)]
    pub async fn predict(&self, state: &Mutex<PredictionState>, input: InputRecord) {
        let cycle = Cycle::start(state);

        match self.fetch(&input).await {
            Ok(result) => {
                info!(
                    normalized_output = result.prediction.normalized_output,
                    power_output_mw = result.prediction.power_output_mw,
                    level = %result.prediction.production_level,
                    "Prediction completed"
                );
                cycle.succeed(result);
            }
            Err(err) => {
                warn!(error = %err, "Prediction failed");
                cycle.fail(err.user_message());
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn health(&self) -> WindResult<HealthStatus> {
        self.api.health().await
    }
}

/// An in-flight request cycle. Releases the loading flag if it is dropped
/// without settling.
struct Cycle<'a> {
    state: &'a Mutex<PredictionState>,
    settled: bool,
}

impl<'a> Cycle<'a> {
    fn start(state: &'a Mutex<PredictionState>) -> Self {
        lock(state).start();
        Self {
            state,
            settled: false,
        }
    }

    fn succeed(mut self, result: PredictionResult) {
        lock(self.state).succeed(result);
        self.settled = true;
    }

    fn fail(mut self, message: String) {
        lock(self.state).fail(message);
        self.settled = true;
    }
}

impl Drop for Cycle<'_> {
    fn drop(&mut self) {
        if !self.settled {
            lock(self.state).release();
        }
    }
}

fn lock(state: &Mutex<PredictionState>) -> MutexGuard<'_, PredictionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
