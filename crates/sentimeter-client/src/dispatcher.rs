//! Prediction dispatcher: owns the session state and drives one request per
//! submit call.
//!
//! The state lock is only held while reducing an event, never across the
//! network call, so a second submit can be issued while the first is still
//! pending. Stale resolutions are dropped by the reducer.

use std::sync::{Mutex, PoisonError};

use sentimeter_core::{
    BulkResult, DecodeOptions, Event, PredictionMode, Sentiment, SessionState, aggregate, decode,
    distribution,
};
use tracing::{info, warn};

use crate::error::DispatchError;
use crate::service::{BulkUpload, PredictionService};

/// A resolved request.
///
/// `applied` is false when a later request had already resolved, in which
/// case `value` was not stored in the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission<T> {
    pub value: T,
    pub seq: u64,
    pub applied: bool,
}

pub struct Dispatcher<S> {
    service: S,
    options: DecodeOptions,
    state: Mutex<SessionState>,
}

impl<S: PredictionService> Dispatcher<S> {
    pub fn new(service: S, options: DecodeOptions) -> Self {
        Self {
            service,
            options,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Snapshot of the current session.
    pub fn state(&self) -> SessionState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn mode(&self) -> PredictionMode {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).mode
    }

    pub fn select_mode(&self, mode: PredictionMode) {
        info!(mode = mode.as_str(), "mode selected");
        self.update(Event::ModeSelected(mode), |_| ());
    }

    /// Classify one text and store the verdict.
    ///
    /// Blank text is rejected before any request is made. On failure the
    /// previous verdict is left in place.
    pub async fn submit_text(&self, text: &str) -> Result<Submission<Sentiment>, DispatchError> {
        if text.trim().is_empty() {
            return Err(DispatchError::Validation("empty text"));
        }

        let seq = self.update(Event::TextSubmitted, |s| s.text.last_issued);
        info!(seq, "text prediction issued");

        match self.service.predict_text(text).await {
            Ok(label) => {
                let verdict = Sentiment::parse(&label);
                let applied = self.update(
                    Event::TextResolved {
                        seq,
                        verdict: verdict.clone(),
                    },
                    |s| s.text.last_applied == seq,
                );
                Ok(Submission {
                    value: verdict,
                    seq,
                    applied,
                })
            }
            Err(err) => {
                warn!(seq, error = %err, "text prediction failed");
                self.fail(PredictionMode::Text, seq);
                Err(err.into())
            }
        }
    }

    /// Upload a table, decode the response, and store the per-category
    /// summaries.
    ///
    /// A missing file is rejected before any request is made. On failure the
    /// previous bulk result is left in place.
    pub async fn submit_bulk(
        &self,
        upload: Option<BulkUpload>,
    ) -> Result<Submission<BulkResult>, DispatchError> {
        let upload = upload.ok_or(DispatchError::Validation("no file"))?;

        let seq = self.update(Event::BulkSubmitted, |s| s.bulk.last_issued);
        info!(seq, file = %upload.file_name, "bulk prediction issued");

        let body = match self.service.predict_bulk(upload).await {
            Ok(body) => body,
            Err(err) => {
                warn!(seq, error = %err, "bulk prediction failed");
                self.fail(PredictionMode::Bulk, seq);
                return Err(err.into());
            }
        };

        let decoded = match decode(&body, &self.options) {
            Ok(decoded) => decoded,
            Err(err) => {
                warn!(seq, error = %err, "bulk response could not be decoded");
                self.fail(PredictionMode::Bulk, seq);
                return Err(err.into());
            }
        };

        let result = BulkResult {
            summaries: aggregate(&decoded.records),
            distribution: distribution(&decoded.records),
            warning: decoded.warning,
        };
        info!(
            seq,
            records = decoded.records.len(),
            categories = result.summaries.len(),
            skipped = decoded.skipped(),
            "bulk prediction aggregated"
        );

        let applied = self.update(
            Event::BulkResolved {
                seq,
                result: result.clone(),
            },
            |s| s.bulk.last_applied == seq,
        );
        Ok(Submission {
            value: result,
            seq,
            applied,
        })
    }

    fn fail(&self, mode: PredictionMode, seq: u64) {
        self.update(Event::RequestFailed { mode, seq }, |_| ());
    }

    /// Apply `event` and read something back from the new state under the
    /// same lock.
    fn update<T>(&self, event: Event, read: impl FnOnce(&SessionState) -> T) -> T {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let next = std::mem::take(&mut *guard).apply(event);
        *guard = next;
        read(&*guard)
    }
}
