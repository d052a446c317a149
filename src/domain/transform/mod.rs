//! Block-type transformers: raw block plus transformed children in,
//! normalized presentation node out.
//!
//! Dispatch is a closed match on the type tag. Supporting a new block type
//! means adding a [`NastKind`] variant and one arm in [`transform`].

pub mod embed;
pub mod rich_text;

use serde::Serialize;
use serde_json::Value;

use crate::domain::node::BlockNode;
use crate::domain::record::BlockValue;

pub use embed::EmbedData;
pub use rich_text::{RichText, TextRun};

/// Normalized presentation node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Nast {
    pub id: String,
    #[serde(flatten)]
    pub kind: NastKind,
    pub color: Option<String>,
    pub created_time: Option<i64>,
    pub last_edited_time: Option<i64>,
    pub children: Vec<Nast>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NastKind {
    Page {
        title: RichText,
    },
    Text {
        text: RichText,
    },
    Heading {
        depth: u8,
        text: RichText,
    },
    ToDo {
        text: RichText,
        checked: bool,
    },
    BulletedListItem {
        text: RichText,
    },
    NumberedListItem {
        text: RichText,
    },
    Toggle {
        text: RichText,
    },
    Quote {
        text: RichText,
    },
    Callout {
        text: RichText,
        icon: Option<String>,
    },
    Divider,
    Code {
        text: RichText,
        language: Option<String>,
    },
    Embed(EmbedData),
    Video(EmbedData),
    Unsupported {
        #[serde(rename = "blockType")]
        block_type: String,
    },
}

impl NastKind {
    /// Variant tag as it appears in serialized output.
    pub fn tag(&self) -> &'static str {
        match self {
            NastKind::Page { .. } => "page",
            NastKind::Text { .. } => "text",
            NastKind::Heading { .. } => "heading",
            NastKind::ToDo { .. } => "to_do",
            NastKind::BulletedListItem { .. } => "bulleted_list_item",
            NastKind::NumberedListItem { .. } => "numbered_list_item",
            NastKind::Toggle { .. } => "toggle",
            NastKind::Quote { .. } => "quote",
            NastKind::Callout { .. } => "callout",
            NastKind::Divider => "divider",
            NastKind::Code { .. } => "code",
            NastKind::Embed(_) => "embed",
            NastKind::Video(_) => "video",
            NastKind::Unsupported { .. } => "unsupported",
        }
    }
}

/// `format.block_color`, if set.
pub fn block_color(value: &BlockValue) -> Option<String> {
    value
        .format_field("block_color")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// `properties.title` as rich text.
pub fn block_title(value: &BlockValue) -> RichText {
    RichText::from_property(value.property("title"))
}

/// Transform one block given its already transformed children.
pub fn transform(value: &BlockValue, children: Vec<Nast>) -> Nast {
    let text = || block_title(value);
    let kind = match value.block_type.as_str() {
        "page" => NastKind::Page { title: text() },
        "text" => NastKind::Text { text: text() },
        "header" => NastKind::Heading {
            depth: 1,
            text: text(),
        },
        "sub_header" => NastKind::Heading {
            depth: 2,
            text: text(),
        },
        "sub_sub_header" => NastKind::Heading {
            depth: 3,
            text: text(),
        },
        "to_do" => NastKind::ToDo {
            text: text(),
            checked: rich_text::property_str(value.property("checked")) == Some("Yes"),
        },
        "bulleted_list" => NastKind::BulletedListItem { text: text() },
        "numbered_list" => NastKind::NumberedListItem { text: text() },
        "toggle" => NastKind::Toggle { text: text() },
        "quote" => NastKind::Quote { text: text() },
        "callout" => NastKind::Callout {
            text: text(),
            icon: value
                .format_field("page_icon")
                .and_then(Value::as_str)
                .map(str::to_string),
        },
        "divider" => NastKind::Divider,
        "code" => NastKind::Code {
            text: text(),
            language: rich_text::property_str(value.property("language")).map(str::to_string),
        },
        "embed" => NastKind::Embed(EmbedData::from_value(value)),
        "video" => NastKind::Video(EmbedData::from_value(value)),
        other => NastKind::Unsupported {
            block_type: other.to_string(),
        },
    };

    Nast {
        id: value.id.clone(),
        kind,
        color: block_color(value),
        created_time: value.created_time,
        last_edited_time: value.last_edited_time,
        children,
    }
}

/// Transform a whole block tree, children before their parent.
pub fn transform_tree(node: &BlockNode) -> Nast {
    let children = node.children.iter().map(transform_tree).collect();
    transform(node.value(), children)
}
