//! Page download service
//!
//! Fetches a root block with all descendants and assembles them into a tree.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::services::fetcher::{FetchOptions, FetchState, FrontierFetcher};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Assembly, BlockNode, TreeAssembler};
use crate::infrastructure::traits::RecordLookup;

/// Service for downloading a page as a block tree.
pub struct DownloadService {
    fetcher: FrontierFetcher,
}

impl DownloadService {
    pub fn new(lookup: Arc<dyn RecordLookup>) -> Self {
        Self::with_options(lookup, FetchOptions::default())
    }

    pub fn with_options(lookup: Arc<dyn RecordLookup>, options: FetchOptions) -> Self {
        Self {
            fetcher: FrontierFetcher::with_options(lookup, options),
        }
    }

    /// Download `root_id` and return the assembled tree with its report.
    ///
    /// Children dropped by the fetcher (pages, inaccessible blocks) are left
    /// out of the tree and listed in [`Assembly::skipped`]; any other
    /// unresolved child is a dangling reference.
    #[instrument(level = "debug", skip(self))]
    pub fn download(&self, root_id: &str) -> ApplicationResult<Assembly> {
        check_root_id(root_id)?;

        let state = self.fetcher.run(FetchState::new(root_id))?;
        let assembly = TreeAssembler::new()
            .with_excluded(state.excluded)
            .assemble(state.records)?;

        info!(
            "downloaded {}: {} blocks, depth {}, {} skipped, {} flagged",
            root_id,
            assembly.root.node_count(),
            assembly.root.depth(),
            assembly.skipped.len(),
            assembly.reparented.len() + assembly.shadowed.len()
        );

        Ok(assembly)
    }

    /// Download `root_id` and return the root node.
    pub fn download_tree(&self, root_id: &str) -> ApplicationResult<BlockNode> {
        self.download(root_id).map(|a| a.root)
    }
}

/// Download the page `root_id` through `agent` as a block tree.
pub fn download_tree(root_id: &str, agent: Arc<dyn RecordLookup>) -> ApplicationResult<BlockNode> {
    DownloadService::new(agent).download_tree(root_id)
}

fn check_root_id(root_id: &str) -> ApplicationResult<()> {
    if root_id.is_empty() || root_id.chars().any(char::is_whitespace) {
        return Err(ApplicationError::InvalidRootId(root_id.to_string()));
    }
    Ok(())
}
