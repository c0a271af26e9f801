//! Session state and its update function.
//!
//! All displayed results live in one [`SessionState`] value that changes only
//! through [`reduce`]. Each submitted request gets a per-mode sequence number
//! when it is issued; a resolution is applied only if its number is higher
//! than the last one applied for that mode, so a slow early request can never
//! overwrite the answer to a later one.

use serde::Serialize;

use crate::aggregate::{CategorySummary, SentimentDistribution};
use crate::error::PartialDecodeWarning;
use crate::record::{PredictionMode, Sentiment};

/// Outcome of one bulk submission, as handed to the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkResult {
    pub summaries: Vec<CategorySummary>,
    pub distribution: SentimentDistribution,
    pub warning: Option<PartialDecodeWarning>,
}

/// Request bookkeeping and latest result for one mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel<T> {
    pub last_issued: u64,
    pub last_applied: u64,
    pub in_flight: usize,
    pub value: Option<T>,
}

impl<T> Default for Channel<T> {
    fn default() -> Self {
        Self {
            last_issued: 0,
            last_applied: 0,
            in_flight: 0,
            value: None,
        }
    }
}

impl<T> Channel<T> {
    fn issue(&mut self) {
        self.last_issued += 1;
        self.in_flight += 1;
    }

    fn settle(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    fn resolve(&mut self, seq: u64, value: T) {
        self.settle();
        if seq > self.last_applied {
            self.last_applied = seq;
            self.value = Some(value);
        } else {
            tracing::warn!(
                seq,
                last_applied = self.last_applied,
                "discarding stale response"
            );
        }
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub mode: PredictionMode,
    pub text: Channel<Sentiment>,
    pub bulk: Channel<BulkResult>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ModeSelected(PredictionMode),
    TextSubmitted,
    TextResolved { seq: u64, verdict: Sentiment },
    BulkSubmitted,
    BulkResolved { seq: u64, result: BulkResult },
    RequestFailed { mode: PredictionMode, seq: u64 },
}

/// What the presentation layer renders for the current mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View<'a> {
    Unselected,
    Text(Option<&'a Sentiment>),
    Bulk(Option<&'a BulkResult>),
}

impl SessionState {
    pub fn apply(mut self, event: Event) -> Self {
        match event {
            Event::ModeSelected(mode) => {
                self.mode = mode;
                if mode != PredictionMode::Text {
                    self.text.value = None;
                }
                if mode != PredictionMode::Bulk {
                    self.bulk.value = None;
                }
            }
            Event::TextSubmitted => self.text.issue(),
            Event::TextResolved { seq, verdict } => self.text.resolve(seq, verdict),
            Event::BulkSubmitted => self.bulk.issue(),
            Event::BulkResolved { seq, result } => self.bulk.resolve(seq, result),
            Event::RequestFailed { mode, .. } => match mode {
                PredictionMode::Text => self.text.settle(),
                PredictionMode::Bulk => self.bulk.settle(),
                PredictionMode::Unselected => {}
            },
        }
        self
    }

    pub fn view(&self) -> View<'_> {
        match self.mode {
            PredictionMode::Unselected => View::Unselected,
            PredictionMode::Text => View::Text(self.text.value.as_ref()),
            PredictionMode::Bulk => View::Bulk(self.bulk.value.as_ref()),
        }
    }
}

pub fn reduce(state: SessionState, event: Event) -> SessionState {
    state.apply(event)
}
