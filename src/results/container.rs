//! Result container for merging and deduplicating sub-query results

use super::types::*;
use std::collections::HashSet;

/// What happened to a record offered to the container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Added,
    Duplicate,
    MissingId,
}

/// Ordered, id-unique collection of tagged records for one aggregation.
///
/// Owned by a single coordinating task; never shared across calls.
#[derive(Debug, Default)]
pub struct ResultContainer {
    /// Kept records in first-seen order
    records: Vec<TaggedRecord>,
    /// Ids already kept
    seen: HashSet<String>,
}

impl ResultContainer {
    /// Create a new empty result container
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a record. The first category for an id wins.
    pub fn add(&mut self, record: RawProviderRecord, category: &str) -> Admission {
        let id = match record.id() {
            Some(id) => id,
            None => return Admission::MissingId,
        };

        if !self.seen.insert(id.clone()) {
            return Admission::Duplicate;
        }

        self.records.push(TaggedRecord {
            id,
            record,
            category: category.to_string(),
        });
        Admission::Added
    }

    /// Offer all records from one sub-query, in order, updating `stats`
    pub fn extend(
        &mut self,
        records: Vec<RawProviderRecord>,
        category: &str,
        stats: &mut AggregationStats,
    ) -> usize {
        let mut added = 0;
        for record in records {
            match self.add(record, category) {
                Admission::Added => added += 1,
                Admission::Duplicate => stats.duplicates += 1,
                Admission::MissingId => stats.missing_id += 1,
            }
        }
        added
    }

    /// Kept records so far
    pub fn records(&self) -> &[TaggedRecord] {
        &self.records
    }

    /// Get total result count
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the container, keeping first-seen order
    pub fn into_records(self) -> Vec<TaggedRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str) -> RawProviderRecord {
        RawProviderRecord::new(json!({ "id": id }))
    }

    #[test]
    fn test_result_deduplication() {
        let mut container = ResultContainer::new();

        assert_eq!(container.add(record("a"), "supercharger"), Admission::Added);
        assert_eq!(container.add(record("a"), "dc charging"), Admission::Duplicate);

        assert_eq!(container.len(), 1);
        assert_eq!(container.records()[0].category, "supercharger");
    }

    #[test]
    fn test_first_seen_order() {
        let mut container = ResultContainer::new();
        let mut stats = AggregationStats::new(2);

        container.extend(vec![record("b"), record("a")], "first", &mut stats);
        container.extend(vec![record("c"), record("b")], "second", &mut stats);

        let ids: Vec<_> = container.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(stats.duplicates, 1);
    }

    #[test]
    fn test_missing_id_skipped() {
        let mut container = ResultContainer::new();
        let mut stats = AggregationStats::new(1);

        let added = container.extend(
            vec![RawProviderRecord::new(json!({"poi": {"name": "x"}})), record("a")],
            "parks",
            &mut stats,
        );

        assert_eq!(added, 1);
        assert_eq!(stats.missing_id, 1);
        assert_eq!(container.len(), 1);
        assert_eq!(container.records()[0].id, "a");
    }
}
