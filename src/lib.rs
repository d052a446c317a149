//! Rebuild block-based pages from a remote content API as a single-rooted tree.
//!
//! A page is fetched level by level through a batched [`RecordLookup`], then
//! assembled from forward child references into an owned [`BlockNode`] tree.
//! Sub-pages and links to other pages are never descended into.
//!
//! ```no_run
//! use std::sync::Arc;
//! use pagetree::{download_tree, NotionClient, Settings};
//!
//! let client = Arc::new(NotionClient::from_settings(&Settings::default()));
//! let tree = download_tree("0123abcd-4567-89ab-cdef-0123456789ab", client)?;
//! println!("{} blocks", tree.node_count());
//! # Ok::<(), pagetree::ApplicationError>(())
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::services::{download_tree, DownloadService, FrontierFetcher};
pub use application::{ApplicationError, ApplicationResult};
pub use config::Settings;
pub use domain::{assemble, BlockNode, BlockRecord, BlockValue, DomainError};
pub use infrastructure::{InMemoryLookup, LookupError, NotionClient, RecordLookup};
