//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on the `RecordLookup` boundary trait
//! but are themselves concrete structs, not traits.

mod download;
mod fetcher;

pub use download::{download_tree, DownloadService};
pub use fetcher::{
    collect_children_ids, make_record_requests, partition_batch, FetchOptions, FetchState,
    FrontierFetcher, DEFAULT_MAX_DEPTH,
};
