//! Domain layer: records, block trees and their transformation
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod assembler;
pub mod error;
pub mod node;
pub mod page_id;
pub mod record;
pub mod transform;

pub use arena::{ArenaNode, TreeArena};
pub use assembler::{assemble, Assembly, AssemblyResult, Reparented, Skipped, TreeAssembler};
pub use error::DomainError;
pub use node::{BlockNode, PreOrderIter, TreeDisplay};
pub use page_id::parse_page_id;
pub use record::{
    BlockRecord, BlockValue, ExclusionReason, RecordRequest, RecordValuesResponse, Role, BLOCK_TABLE,
    PAGE_TYPE,
};
pub use transform::{transform, transform_tree, Nast, NastKind};
