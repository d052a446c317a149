//! In-memory record lookup, for tests and offline fixtures.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use serde::Deserialize;
use tracing::debug;

use crate::domain::{BlockRecord, BlockValue, RecordRequest, RecordValuesResponse};
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::{LookupError, RecordLookup};

#[derive(Debug, Default, Deserialize)]
struct RecordMap {
    #[serde(default)]
    block: HashMap<String, BlockRecord>,
}

/// Either a bare record map or a page-chunk answer wrapping one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordMapFile {
    Wrapped {
        #[serde(rename = "recordMap")]
        record_map: RecordMap,
    },
    Bare(RecordMap),
}

/// Answers lookups from a fixed id → record map.
///
/// Unknown ids are answered with `{"role": "none"}` like the remote does.
/// Every served batch is logged so callers can inspect the request pattern.
#[derive(Debug, Default)]
pub struct InMemoryLookup {
    records: HashMap<String, BlockRecord>,
    batches: Mutex<Vec<Vec<String>>>,
}

impl InMemoryLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Readable records for every value.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = BlockValue>,
    {
        let mut lookup = Self::new();
        for value in values {
            lookup.insert(value.id.clone(), BlockRecord::reader(value));
        }
        lookup
    }

    /// Parse a JSON record map: `{"block": {"<id>": {"role": ..., "value": {...}}}}`,
    /// optionally wrapped in `{"recordMap": ...}`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let map = match serde_json::from_str::<RecordMapFile>(json)? {
            RecordMapFile::Wrapped { record_map } => record_map,
            RecordMapFile::Bare(map) => map,
        };
        Ok(Self {
            records: map.block,
            batches: Mutex::new(Vec::new()),
        })
    }

    pub fn from_file(path: &Path) -> InfraResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| InfraError::io(format!("read fixture {}", path.display()), e))?;
        let lookup = Self::from_json(&content).map_err(|e| InfraError::Fixture {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!("loaded {} records from {}", lookup.len(), path.display());
        Ok(lookup)
    }

    pub fn insert(&mut self, id: impl Into<String>, record: BlockRecord) {
        self.records.insert(id.into(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ids of every batch served so far, in call order.
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches
            .lock()
            .map(|b| b.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl RecordLookup for InMemoryLookup {
    fn get_record_values(
        &self,
        requests: &[RecordRequest],
    ) -> Result<RecordValuesResponse, LookupError> {
        let ids: Vec<String> = requests.iter().map(|r| r.id.clone()).collect();
        match self.batches.lock() {
            Ok(mut batches) => batches.push(ids),
            Err(poisoned) => poisoned.into_inner().push(ids),
        }

        let results = requests
            .iter()
            .map(|r| {
                self.records
                    .get(&r.id)
                    .cloned()
                    .unwrap_or_else(BlockRecord::no_access)
            })
            .collect();
        Ok(RecordValuesResponse { results })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    #[test]
    fn test_unknown_id_answers_no_access() {
        let lookup = InMemoryLookup::from_values(vec![BlockValue::new("a", "text")]);

        let response = lookup
            .get_record_values(&[RecordRequest::block("a"), RecordRequest::block("zz")])
            .unwrap();

        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].id(), Some("a"));
        assert_eq!(response.results[1].role, Role::NoAccess);
        assert_eq!(lookup.batches(), vec![vec!["a".to_string(), "zz".to_string()]]);
    }

    #[test]
    fn test_from_json_accepts_wrapped_record_map() {
        let json = r#"{"recordMap": {"block": {"a": {"role": "reader", "value": {"id": "a", "type": "page"}}}}}"#;

        let lookup = InMemoryLookup::from_json(json).unwrap();

        assert_eq!(lookup.len(), 1);
    }
}
