//! Admission of visits into the analytics pipeline.
//!
//! The recorder decides whether a visit is recorded and hands it to the visit
//! worker without waiting on storage or geolocation. Its errors are typed so
//! callers can log them, but no caller is expected to act on them: a failed
//! recording never changes the response a visitor gets.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::domain::click_event::{VisitEvent, Visitor};
use crate::domain::dedup::DedupWindow;
use crate::error::AppError;

/// What happened to a visit handed to the recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Enqueued for the visit worker.
    Queued,
    /// Dropped by the dedup window; nothing will be written.
    Suppressed,
}

#[derive(Debug, Error)]
pub enum RecordingError {
    #[error("visit queue is full")]
    QueueFull,

    #[error("visit queue is closed")]
    QueueClosed,

    #[error("failed to store visit: {0}")]
    Storage(#[from] AppError),
}

/// Click dedup plus a non-blocking handoff to the visit queue.
#[derive(Clone)]
pub struct ClickRecorder {
    dedup: Arc<DedupWindow>,
    tx: mpsc::Sender<VisitEvent>,
}

impl ClickRecorder {
    pub fn new(dedup: Arc<DedupWindow>, tx: mpsc::Sender<VisitEvent>) -> Self {
        Self { dedup, tx }
    }

    /// The dedup state, exposed for inspection.
    pub fn dedup(&self) -> &DedupWindow {
        &self.dedup
    }

    /// Free slots in the visit queue.
    pub fn queue_capacity(&self) -> usize {
        self.tx.capacity()
    }

    /// True once the visit worker has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Records a click on `link_id` unless one was admitted moments ago.
    ///
    /// Never awaits: a full queue drops the event.
    pub fn record_click(
        &self,
        link_id: i64,
        visitor: Visitor,
    ) -> Result<RecordOutcome, RecordingError> {
        if !self.dedup.admit(link_id) {
            metrics::counter!("clicks_suppressed_total").increment(1);
            tracing::debug!(link_id, "Duplicate click suppressed");
            return Ok(RecordOutcome::Suppressed);
        }

        self.enqueue(VisitEvent::Click { link_id, visitor })
    }

    /// Records a view of a public linktree page. Views are not deduplicated.
    pub fn record_view(
        &self,
        linktree_id: i64,
        visitor: Visitor,
    ) -> Result<RecordOutcome, RecordingError> {
        self.enqueue(VisitEvent::View {
            linktree_id,
            visitor,
        })
    }

    fn enqueue(&self, event: VisitEvent) -> Result<RecordOutcome, RecordingError> {
        let kind = event.kind();

        match self.tx.try_send(event) {
            Ok(()) => {
                metrics::counter!("visits_queued_total", "kind" => kind).increment(1);
                Ok(RecordOutcome::Queued)
            }
            Err(TrySendError::Full(_)) => {
                metrics::counter!("visits_dropped_total", "kind" => kind).increment(1);
                Err(RecordingError::QueueFull)
            }
            Err(TrySendError::Closed(_)) => {
                metrics::counter!("visits_dropped_total", "kind" => kind).increment(1);
                Err(RecordingError::QueueClosed)
            }
        }
    }
}
