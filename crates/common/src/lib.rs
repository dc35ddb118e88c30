//! Shared types for the testament registry.

mod types;

pub use types::{AggregateId, PersonId};
