//! Read-side projections for the will registry.
//!
//! Projections consume the store's global event feed and maintain
//! in-memory read models. Each projection keeps its own checkpoint
//! (the last event sequence it applied) so the processor can catch it
//! up incrementally.

pub mod error;
pub mod processor;
pub mod projection;
pub mod views;

pub use error::{ProjectionError, Result};
pub use processor::ProjectionProcessor;
pub use projection::Projection;
pub use views::active_wills::{ActiveWillSummary, ActiveWillsProjection};
pub use views::disinheritance_risk::{DisinheritanceRiskProjection, RiskEntry};
