use std::sync::Arc;

use metrics::counter;
use repository::DocumentStore;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::projection::Projection;

/// Catches projections up against the store's global event feed.
///
/// Each pass asks every registered projection for its checkpoint, reads
/// the events past it, and applies them in sequence order. Projections
/// at different positions catch up independently.
pub struct ProjectionProcessor<S> {
    store: S,
    projections: Vec<Arc<dyn Projection>>,
}

impl<S: DocumentStore> ProjectionProcessor<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            projections: Vec::new(),
        }
    }

    /// Registers a projection for catch-up.
    pub fn register(&mut self, projection: Arc<dyn Projection>) {
        self.projections.push(projection);
    }

    /// Runs one catch-up pass over every registered projection.
    ///
    /// Returns the total number of events applied.
    #[instrument(skip(self))]
    pub async fn run_once(&self) -> Result<u64> {
        let mut applied = 0u64;
        for projection in &self.projections {
            applied += self.catch_up(projection.as_ref()).await?;
        }
        Ok(applied)
    }

    /// Rebuilds every projection from the start of the feed.
    #[instrument(skip(self))]
    pub async fn rebuild(&self) -> Result<u64> {
        for projection in &self.projections {
            projection.reset().await?;
        }
        self.run_once().await
    }

    async fn catch_up(&self, projection: &dyn Projection) -> Result<u64> {
        let position = projection.position().await;
        let events = self.store.events_since(position).await?;
        let count = events.len() as u64;

        for event in &events {
            projection.apply(event).await?;
            counter!("projection_events_applied", "projection" => projection.name())
                .increment(1);
        }
        if count > 0 {
            debug!(
                projection = projection.name(),
                from = position,
                applied = count,
                "projection caught up"
            );
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use async_trait::async_trait;
    use repository::{EventRecord, InMemoryDocumentStore};

    use super::*;

    /// Counts events and tracks its checkpoint, nothing more.
    #[derive(Default)]
    struct CountingProjection {
        seen: AtomicU64,
        position: AtomicU64,
    }

    #[async_trait]
    impl Projection for CountingProjection {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn apply(&self, event: &EventRecord) -> Result<()> {
            self.seen.fetch_add(1, Ordering::SeqCst);
            self.position.store(event.sequence, Ordering::SeqCst);
            Ok(())
        }

        async fn position(&self) -> u64 {
            self.position.load(Ordering::SeqCst)
        }

        async fn reset(&self) -> Result<()> {
            self.seen.store(0, Ordering::SeqCst);
            self.position.store(0, Ordering::SeqCst);
            Ok(())
        }
    }

    async fn seed_events(store: &InMemoryDocumentStore, count: usize) {
        use common::AggregateId;
        use repository::{DocumentRecord, Version};

        let id = AggregateId::new();
        let mut version = Version::initial();
        for i in 0..count {
            let record = DocumentRecord::from_state(
                id,
                "Will",
                None,
                "Draft",
                vec![],
                version,
                &serde_json::json!({ "step": i }),
            )
            .unwrap();
            let event = EventRecord::new(
                id,
                "Will",
                "ClauseUpdated",
                version,
                serde_json::json!({ "step": i }),
            );
            version = store.save(record, version, vec![event]).await.unwrap();
        }
    }

    #[tokio::test]
    async fn processor_applies_only_new_events() {
        let store = InMemoryDocumentStore::new();
        let projection = Arc::new(CountingProjection::default());
        let mut processor = ProjectionProcessor::new(store.clone());
        processor.register(projection.clone());

        seed_events(&store, 3).await;
        assert_eq!(processor.run_once().await.unwrap(), 3);
        assert_eq!(projection.seen.load(Ordering::SeqCst), 3);

        // nothing new
        assert_eq!(processor.run_once().await.unwrap(), 0);

        seed_events(&store, 2).await;
        assert_eq!(processor.run_once().await.unwrap(), 2);
        assert_eq!(projection.seen.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn rebuild_resets_and_replays() {
        let store = InMemoryDocumentStore::new();
        let projection = Arc::new(CountingProjection::default());
        let mut processor = ProjectionProcessor::new(store.clone());
        processor.register(projection.clone());

        seed_events(&store, 4).await;
        processor.run_once().await.unwrap();

        assert_eq!(processor.rebuild().await.unwrap(), 4);
        assert_eq!(projection.seen.load(Ordering::SeqCst), 4);
    }
}
