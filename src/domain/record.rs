//! Remote record types as returned by the content API.
//!
//! Records are flat: a block only knows its own children through the
//! `content` list. `parent_id` is carried along but never trusted for linking.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Table tag for block records.
pub const BLOCK_TABLE: &str = "block";

/// Type tag for pages and "link to page" blocks.
pub const PAGE_TYPE: &str = "page";

/// Visibility marker attached to every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Editor,
    ReadAndWrite,
    CommentOnly,
    Reader,
    /// Inaccessible or nonexistent record.
    #[serde(rename = "none")]
    NoAccess,
    #[serde(other)]
    Unknown,
}

/// One entry of a batched lookup request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRequest {
    pub id: String,
    pub table: String,
}

impl RecordRequest {
    pub fn block(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            table: BLOCK_TABLE.to_string(),
        }
    }
}

/// Payload of a block record.
///
/// Fields the tree builder does not interpret (`view_ids`, `permissions`,
/// `created_by`, ...) are kept in `extra` so nothing from the remote is lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockValue {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Value>,
    /// Declared children, in document order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_time: Option<i64>,
    /// Unreliable for pages and links to pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alive: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BlockValue {
    /// Minimal value with only an id and a type.
    pub fn new(id: impl Into<String>, block_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: None,
            block_type: block_type.into(),
            properties: None,
            format: None,
            content: None,
            created_time: None,
            last_edited_time: None,
            parent_id: None,
            parent_table: None,
            alive: None,
            extra: Map::new(),
        }
    }

    pub fn with_content<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content = Some(children.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_properties(mut self, properties: Value) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn with_format(mut self, format: Value) -> Self {
        self.format = Some(format);
        self
    }

    /// Declared child ids, empty when the block has no `content`.
    pub fn children_ids(&self) -> &[String] {
        self.content.as_deref().unwrap_or_default()
    }

    pub fn is_page(&self) -> bool {
        self.block_type == PAGE_TYPE
    }

    /// Look up a key of the `format` object.
    pub fn format_field(&self, key: &str) -> Option<&Value> {
        self.format.as_ref().and_then(|f| f.get(key))
    }

    /// Look up a key of the `properties` object.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref().and_then(|p| p.get(key))
    }
}

/// A record as answered by the lookup: a role plus, when accessible, a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<BlockValue>,
}

impl BlockRecord {
    pub fn new(role: Role, value: BlockValue) -> Self {
        Self {
            role,
            value: Some(value),
        }
    }

    /// Readable record, the common case in tests and fixtures.
    pub fn reader(value: BlockValue) -> Self {
        Self::new(Role::Reader, value)
    }

    /// The answer for an id the caller may not see.
    pub fn no_access() -> Self {
        Self {
            role: Role::NoAccess,
            value: None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.value.as_ref().map(|v| v.id.as_str())
    }

    pub fn block_type(&self) -> Option<&str> {
        self.value.as_ref().map(|v| v.block_type.as_str())
    }

    pub fn children_ids(&self) -> &[String] {
        self.value
            .as_ref()
            .map(BlockValue::children_ids)
            .unwrap_or_default()
    }

    /// Why this record must not be descended into outside the root batch.
    ///
    /// Inaccessible or missing records come back with role `none` or without
    /// a value. Sub-pages and links to pages both carry a parent outside the
    /// current document.
    pub fn exclusion_reason(&self) -> Option<ExclusionReason> {
        match &self.value {
            _ if self.role == Role::NoAccess => Some(ExclusionReason::NoAccess),
            None => Some(ExclusionReason::NoAccess),
            Some(value) if value.is_page() => Some(ExclusionReason::Page),
            Some(_) => None,
        }
    }
}

/// Reason a descendant record was left out of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExclusionReason {
    /// Sub-page or link to a page
    Page,
    /// Deleted, never existing or not visible to the caller
    NoAccess,
}

impl std::fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExclusionReason::Page => write!(f, "page"),
            ExclusionReason::NoAccess => write!(f, "no access"),
        }
    }
}

/// Body of a `getRecordValues` answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordValuesResponse {
    #[serde(default)]
    pub results: Vec<BlockRecord>,
}
