//! Frontier fetcher
//!
//! Resolves a root block and all of its descendants level by level: one
//! batched lookup per depth level, each batch built from the children
//! declared by the previous level's records.

use std::sync::Arc;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{BlockRecord, ExclusionReason, RecordRequest};
use crate::infrastructure::traits::RecordLookup;

/// Default bound on the number of levels fetched below (and including) the root.
pub const DEFAULT_MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Maximum number of lookup rounds; 0 disables the limit.
    pub max_depth: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Progress of one fetch, threaded through the iterations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchState {
    /// Ids to request in the next iteration
    pub frontier: Vec<String>,
    /// Records kept so far, in level order
    pub records: Vec<BlockRecord>,
    /// Ids dropped by the descendant filter, with the reason
    pub excluded: Vec<(String, ExclusionReason)>,
    /// Number of completed iterations
    pub iteration: usize,
}

impl FetchState {
    pub fn new(root_id: impl Into<String>) -> Self {
        Self {
            frontier: vec![root_id.into()],
            ..Self::default()
        }
    }

    pub fn is_done(&self) -> bool {
        self.frontier.is_empty()
    }

    /// True until the root batch has been consumed.
    pub fn is_root_batch(&self) -> bool {
        self.iteration == 0
    }
}

/// One `{id, table: "block"}` request per id, in order.
pub fn make_record_requests(ids: &[String]) -> Vec<RecordRequest> {
    ids.iter().map(|id| RecordRequest::block(id.as_str())).collect()
}

/// Split one batch answer into kept records and excluded ids.
///
/// The root batch is kept whole. In later batches, inaccessible records and
/// pages are dropped; the excluded id is the record's own id or, for a
/// record without value, the id requested at the same position.
pub fn partition_batch(
    requests: &[RecordRequest],
    results: Vec<BlockRecord>,
    root_batch: bool,
) -> (Vec<BlockRecord>, Vec<(String, ExclusionReason)>) {
    if root_batch {
        return (results, Vec::new());
    }

    let positional = results.len() == requests.len();
    let mut kept = Vec::with_capacity(results.len());
    let mut excluded = Vec::new();

    for (position, record) in results.into_iter().enumerate() {
        let Some(reason) = record.exclusion_reason() else {
            kept.push(record);
            continue;
        };
        let id = record
            .id()
            .map(str::to_string)
            .or_else(|| positional.then(|| requests[position].id.clone()));
        if let Some(id) = id {
            debug!("excluding {} ({}, type {:?})", id, reason, record.block_type());
            excluded.push((id, reason));
        }
    }

    (kept, excluded)
}

/// Declared children of all records, first occurrence wins.
pub fn collect_children_ids(records: &[BlockRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(BlockRecord::children_ids)
        .unique()
        .cloned()
        .collect()
}

/// Level-order fetcher over a record lookup.
pub struct FrontierFetcher {
    lookup: Arc<dyn RecordLookup>,
    options: FetchOptions,
}

impl FrontierFetcher {
    pub fn new(lookup: Arc<dyn RecordLookup>) -> Self {
        Self::with_options(lookup, FetchOptions::default())
    }

    pub fn with_options(lookup: Arc<dyn RecordLookup>, options: FetchOptions) -> Self {
        Self { lookup, options }
    }

    /// Run a single iteration: request the frontier, filter, advance.
    #[instrument(level = "debug", skip_all, fields(iteration = state.iteration, batch = state.frontier.len()))]
    pub fn step(&self, state: FetchState) -> ApplicationResult<FetchState> {
        let FetchState {
            frontier,
            mut records,
            mut excluded,
            iteration,
        } = state;
        let root_batch = iteration == 0;

        let requests = make_record_requests(&frontier);
        let response = self.lookup.get_record_values(&requests)?;
        debug!(
            "requested {} ids, received {} records",
            requests.len(),
            response.results.len()
        );

        let (kept, dropped) = partition_batch(&requests, response.results, root_batch);
        let next = collect_children_ids(&kept);

        records.extend(kept);
        excluded.extend(dropped);

        Ok(FetchState {
            frontier: next,
            records,
            excluded,
            iteration: iteration + 1,
        })
    }

    /// Iterate from `state` until the frontier is empty.
    pub fn run(&self, mut state: FetchState) -> ApplicationResult<FetchState> {
        let root = state.frontier.first().cloned().unwrap_or_default();
        while !state.is_done() {
            if self.options.max_depth > 0 && state.iteration >= self.options.max_depth {
                return Err(ApplicationError::DepthLimitExceeded {
                    root,
                    max_depth: self.options.max_depth,
                });
            }
            state = self.step(state)?;
        }
        debug!(
            "fetched {} records in {} rounds",
            state.records.len(),
            state.iteration
        );
        Ok(state)
    }

    /// Fetch `root_id` and every descendant, root first.
    pub fn resolve_descendants(&self, root_id: &str) -> ApplicationResult<Vec<BlockRecord>> {
        Ok(self.run(FetchState::new(root_id))?.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BlockValue, Role};

    #[test]
    fn test_collect_children_ids_keeps_first_seen_order() {
        let records = vec![
            BlockRecord::reader(BlockValue::new("a", "text").with_content(["x", "y"])),
            BlockRecord::reader(BlockValue::new("b", "text")),
            BlockRecord::reader(BlockValue::new("c", "text").with_content(["y", "z"])),
        ];

        assert_eq!(collect_children_ids(&records), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_partition_uses_request_id_for_valueless_record() {
        let requests = make_record_requests(&["a".to_string(), "b".to_string()]);
        let results = vec![
            BlockRecord::reader(BlockValue::new("a", "text")),
            BlockRecord::no_access(),
        ];

        let (kept, excluded) = partition_batch(&requests, results, false);

        assert_eq!(kept.len(), 1);
        assert_eq!(excluded, vec![("b".to_string(), ExclusionReason::NoAccess)]);
    }

    #[test]
    fn test_partition_keeps_root_batch_whole() {
        let requests = make_record_requests(&["p".to_string()]);
        let results = vec![BlockRecord::new(Role::NoAccess, BlockValue::new("p", "page"))];

        let (kept, excluded) = partition_batch(&requests, results, true);

        assert_eq!(kept.len(), 1);
        assert!(excluded.is_empty());
    }
}
