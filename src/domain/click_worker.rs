//! Background worker that turns queued visits into stored clicks and views.
//!
//! The queue is drained by a single loop; each event is processed on its own
//! task, with a semaphore capping how many run at once. Failures are logged
//! and counted, then dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};

use crate::domain::click_event::{VisitEvent, Visitor};
use crate::domain::click_recorder::RecordingError;
use crate::domain::entities::{NewClick, NewView, VisitDetails};
use crate::domain::geo::{GeoLocation, GeoLocator};
use crate::domain::repositories::StatsRepository;
use crate::utils::user_agent;

/// Default cap on a single geolocation lookup.
pub const DEFAULT_GEO_TIMEOUT: Duration = Duration::from_millis(3000);

/// Enriches a visit with device, browser and location, then stores it.
#[derive(Clone)]
pub struct VisitProcessor {
    stats: Arc<dyn StatsRepository>,
    geo: Arc<dyn GeoLocator>,
    geo_timeout: Duration,
}

impl VisitProcessor {
    pub fn new(
        stats: Arc<dyn StatsRepository>,
        geo: Arc<dyn GeoLocator>,
        geo_timeout: Duration,
    ) -> Self {
        Self {
            stats,
            geo,
            geo_timeout,
        }
    }

    /// Stores one visit row.
    ///
    /// A failed or slow geolocation is not an error: the row is written with
    /// "Unknown" city and country.
    ///
    /// # Errors
    ///
    /// Returns [`RecordingError::Storage`] if the insert fails.
    pub async fn process(&self, event: VisitEvent) -> Result<(), RecordingError> {
        let details = self.describe(event.visitor()).await;

        match event {
            VisitEvent::Click { link_id, .. } => {
                self.stats
                    .record_click(NewClick { link_id, details })
                    .await?;
            }
            VisitEvent::View { linktree_id, .. } => {
                self.stats
                    .record_view(NewView {
                        linktree_id,
                        details,
                    })
                    .await?;
            }
        }

        Ok(())
    }

    async fn describe(&self, visitor: &Visitor) -> VisitDetails {
        let profile = user_agent::classify(visitor.user_agent.as_deref());
        let location = match visitor.ip.as_deref() {
            Some(ip) => self.locate(ip).await,
            None => GeoLocation::default(),
        };

        VisitDetails {
            city: location.city_or_unknown(),
            country: location.country_or_unknown(),
            device: profile.device,
            browser: profile.browser,
        }
    }

    async fn locate(&self, ip: &str) -> GeoLocation {
        match tokio::time::timeout(self.geo_timeout, self.geo.locate(ip)).await {
            Ok(Some(location)) => location,
            Ok(None) => GeoLocation::default(),
            Err(_) => {
                tracing::warn!(
                    provider = self.geo.name(),
                    timeout_ms = self.geo_timeout.as_millis() as u64,
                    "Geolocation lookup timed out"
                );
                GeoLocation::default()
            }
        }
    }
}

/// Drains the visit queue until every sender is dropped.
///
/// At most `concurrency` events are processed at the same time. In-flight
/// events are awaited before returning.
pub async fn run_visit_worker(
    mut rx: mpsc::Receiver<VisitEvent>,
    processor: VisitProcessor,
    concurrency: usize,
) {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = tokio::task::JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let processor = processor.clone();

        tasks.spawn(async move {
            let kind = event.kind();
            let target_id = event.target_id();

            match processor.process(event).await {
                Ok(()) => {
                    metrics::counter!("visits_recorded_total", "kind" => kind).increment(1);
                }
                Err(e) => {
                    metrics::counter!("visits_failed_total", "kind" => kind).increment(1);
                    tracing::error!(kind, target_id, error = %e, "Failed to record visit");
                }
            }

            drop(permit);
        });

        // Reap finished tasks so the set does not grow with the queue.
        while tasks.try_join_next().is_some() {}
    }

    while tasks.join_next().await.is_some() {}
    tracing::info!("Visit worker stopped");
}
