use async_trait::async_trait;
use repository::EventRecord;

use crate::error::Result;

/// A read model fed from the event feed.
///
/// Implementations are responsible for their own checkpoint: `position`
/// returns the sequence of the last event applied, and the processor
/// feeds them only events past that point. Events the projection does
/// not care about must still advance the checkpoint.
#[async_trait]
pub trait Projection: Send + Sync {
    /// Stable name, used in logs and metrics labels.
    fn name(&self) -> &'static str;

    /// Applies one event and advances the checkpoint.
    async fn apply(&self, event: &EventRecord) -> Result<()>;

    /// Sequence of the last event applied, 0 when empty.
    async fn position(&self) -> u64;

    /// Clears the read model and resets the checkpoint for a rebuild.
    async fn reset(&self) -> Result<()>;
}
