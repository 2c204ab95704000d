//! Mapping from raw provider records to the canonical shape

use super::types::*;

/// Turns tagged provider records into [`CanonicalPoi`]s.
///
/// Only defaults missing fields; present values are not validated.
#[derive(Debug, Clone)]
pub struct ResponseNormalizer {
    kind: RecordKind,
    source: String,
}

impl ResponseNormalizer {
    pub fn new(kind: RecordKind, source: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
        }
    }

    pub fn normalize(&self, tagged: TaggedRecord) -> CanonicalPoi {
        let TaggedRecord {
            id,
            record,
            category,
        } = tagged;

        let raw_categories = record
            .get(&["poi", "categories"])
            .and_then(|c| c.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|c| c.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        CanonicalPoi {
            id,
            name: record
                .get_str(&["poi", "name"])
                .unwrap_or(self.kind.placeholder_name())
                .to_string(),
            category,
            address: record
                .get_str(&["address", "freeformAddress"])
                .unwrap_or_default()
                .to_string(),
            latitude: record.get_f64(&["position", "lat"]),
            longitude: record.get_f64(&["position", "lon"]),
            distance_meters: record.get_f64(&["dist"]),
            phone: record.get_str(&["poi", "phone"]).map(str::to_string),
            url: record.get_str(&["poi", "url"]).map(str::to_string),
            raw_categories,
            source: self.source.clone(),
        }
    }

    pub fn normalize_all(&self, records: Vec<TaggedRecord>) -> Vec<CanonicalPoi> {
        records.into_iter().map(|r| self.normalize(r)).collect()
    }
}
