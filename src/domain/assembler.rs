//! Tree assembly from a flat record list.
//!
//! Linking follows forward `content` references only. Parent ids in the
//! source data are wrong for pages and links to pages, so they are ignored.

use std::collections::HashMap;

use generational_arena::Index;
use tracing::{debug, instrument, warn};

use crate::domain::arena::TreeArena;
use crate::domain::error::DomainError;
use crate::domain::node::BlockNode;
use crate::domain::record::{BlockRecord, ExclusionReason};

/// Result type for assembly operations.
pub type AssemblyResult<T> = Result<T, DomainError>;

/// A child that was declared by more than one block; the last declaration owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reparented {
    pub child: String,
    pub previous_parent: String,
    pub parent: String,
}

/// A child reference left out of the tree because its record was excluded while fetching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub parent: String,
    pub child: String,
    pub reason: ExclusionReason,
}

/// Assembled tree plus the flagged conditions met while linking.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub root: BlockNode,
    /// Children claimed by several parents
    pub reparented: Vec<Reparented>,
    /// Ids that appeared more than once in the record list (last one indexed)
    pub shadowed: Vec<String>,
    /// Child references to excluded records, in linking order
    pub skipped: Vec<Skipped>,
}

impl Assembly {
    /// Skipped references whose record was inaccessible or missing.
    pub fn missing(&self) -> impl Iterator<Item = &Skipped> {
        self.skipped
            .iter()
            .filter(|s| s.reason == ExclusionReason::NoAccess)
    }
}

/// Builds a [`BlockNode`] tree from records whose first element is the root.
#[derive(Debug, Default)]
pub struct TreeAssembler {
    excluded: HashMap<String, ExclusionReason>,
}

impl TreeAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids left out while fetching, with the reason.
    ///
    /// References to these ids are never linked, even when a record with the
    /// same id is present (a link back to the root page). Each one is
    /// reported in [`Assembly::skipped`].
    pub fn with_excluded<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = (S, ExclusionReason)>,
        S: Into<String>,
    {
        self.excluded
            .extend(ids.into_iter().map(|(id, reason)| (id.into(), reason)));
        self
    }

    #[instrument(level = "debug", skip_all, fields(records = records.len()))]
    pub fn assemble(&self, records: Vec<BlockRecord>) -> AssemblyResult<Assembly> {
        if records.is_empty() {
            return Err(DomainError::EmptyRecords);
        }

        let mut arena = TreeArena::with_capacity(records.len());
        let mut slots: Vec<Index> = Vec::with_capacity(records.len());
        let mut index: HashMap<String, Index> = HashMap::with_capacity(records.len());
        let mut shadowed = Vec::new();

        for (position, record) in records.into_iter().enumerate() {
            let value = record.value.ok_or(DomainError::RecordWithoutValue {
                position,
                role: record.role,
            })?;
            let id = value.id.clone();
            let idx = arena.insert(value);
            slots.push(idx);
            if index.insert(id.clone(), idx).is_some() {
                warn!("duplicate record {}, keeping the last one", id);
                shadowed.push(id);
            }
        }

        let mut reparented = Vec::new();
        let mut skipped = Vec::new();
        for (position, &parent_idx) in slots.iter().enumerate() {
            let (parent_id, children_ids) = match arena.get(parent_idx) {
                Some(node) => (node.value.id.clone(), node.value.children_ids().to_vec()),
                None => continue,
            };
            // Shadowed copies stay unlinked; the root slot is always linked.
            if position > 0 && index.get(&parent_id) != Some(&parent_idx) {
                continue;
            }

            for child_id in children_ids {
                if let Some(&reason) = self.excluded.get(&child_id) {
                    match reason {
                        ExclusionReason::Page => {
                            debug!("skipping page {} under {}", child_id, parent_id)
                        }
                        ExclusionReason::NoAccess => {
                            warn!("block {} under {} is missing or inaccessible", child_id, parent_id)
                        }
                    }
                    skipped.push(Skipped {
                        parent: parent_id.clone(),
                        child: child_id,
                        reason,
                    });
                    continue;
                }

                let child_idx = match index.get(&child_id) {
                    Some(&idx) => idx,
                    None => {
                        return Err(DomainError::DanglingChild {
                            parent: parent_id,
                            child: child_id,
                        })
                    }
                };

                if let Some(previous_idx) = arena.attach(parent_idx, child_idx) {
                    let previous_parent = arena
                        .get(previous_idx)
                        .map(|n| n.value.id.clone())
                        .unwrap_or_default();
                    warn!(
                        "block {} declared by {} and {}, keeping it under {}",
                        child_id, previous_parent, parent_id, parent_id
                    );
                    reparented.push(Reparented {
                        child: child_id,
                        previous_parent,
                        parent: parent_id.clone(),
                    });
                }
            }
        }

        let root = arena.detach(slots[0])?;
        debug!("assembled {} nodes", root.node_count());

        Ok(Assembly {
            root,
            reparented,
            shadowed,
            skipped,
        })
    }
}

/// Assemble records into a tree rooted at `records[0]`.
///
/// Every declared child must be present in `records`.
pub fn assemble(records: Vec<BlockRecord>) -> AssemblyResult<BlockNode> {
    TreeAssembler::new().assemble(records).map(|a| a.root)
}
