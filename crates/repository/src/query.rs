use chrono::{DateTime, Utc};

use crate::PersonId;

/// Builder for constructing document searches.
///
/// Allows filtering documents by owner, status, nominated executor,
/// and last-update time, with pagination.
#[derive(Debug, Clone, Default)]
pub struct DocumentQuery {
    /// Filter by owning testator.
    pub owner: Option<PersonId>,

    /// Filter by lifecycle status tag (any of these).
    pub statuses: Option<Vec<String>>,

    /// Filter by a nominated executor.
    pub nominated_executor: Option<PersonId>,

    /// Filter by documents updated at or after this timestamp.
    pub updated_after: Option<DateTime<Utc>>,

    /// Filter by documents updated at or before this timestamp.
    pub updated_before: Option<DateTime<Utc>>,

    /// Maximum number of documents to return.
    pub limit: Option<usize>,

    /// Number of documents to skip.
    pub offset: Option<usize>,
}

impl DocumentQuery {
    /// Creates a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query for documents owned by a testator.
    pub fn for_owner(owner: PersonId) -> Self {
        Self {
            owner: Some(owner),
            ..Default::default()
        }
    }

    /// Filters by owner.
    pub fn owner(mut self, owner: PersonId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Filters by a single status tag.
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.statuses = Some(vec![status.into()]);
        self
    }

    /// Filters by multiple status tags (any of these).
    pub fn statuses(mut self, statuses: Vec<String>) -> Self {
        self.statuses = Some(statuses);
        self
    }

    /// Filters by nominated executor.
    pub fn nominated_executor(mut self, executor: PersonId) -> Self {
        self.nominated_executor = Some(executor);
        self
    }

    /// Filters to documents updated at or after this timestamp.
    pub fn updated_after(mut self, timestamp: DateTime<Utc>) -> Self {
        self.updated_after = Some(timestamp);
        self
    }

    /// Filters to documents updated at or before this timestamp.
    pub fn updated_before(mut self, timestamp: DateTime<Utc>) -> Self {
        self.updated_before = Some(timestamp);
        self
    }

    /// Limits the number of documents returned.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skips this many documents before returning results.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_for_owner() {
        let owner = PersonId::new();
        let query = DocumentQuery::for_owner(owner);

        assert_eq!(query.owner, Some(owner));
        assert!(query.statuses.is_none());
    }

    #[test]
    fn query_builder_chain() {
        let owner = PersonId::new();
        let executor = PersonId::new();
        let query = DocumentQuery::new()
            .owner(owner)
            .status("Active")
            .nominated_executor(executor)
            .limit(25)
            .offset(50);

        assert_eq!(query.owner, Some(owner));
        assert_eq!(query.statuses, Some(vec!["Active".to_string()]));
        assert_eq!(query.nominated_executor, Some(executor));
        assert_eq!(query.limit, Some(25));
        assert_eq!(query.offset, Some(50));
    }
}
