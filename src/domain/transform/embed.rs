//! Embed and video blocks.

use serde::Serialize;
use serde_json::Value;

use crate::domain::record::BlockValue;

pub const DEFAULT_WIDTH: f64 = 9999.0;
pub const DEFAULT_SOURCE: &str = "#";
/// 16:9
pub const DEFAULT_ASPECT_RATIO: f64 = 0.562;

/// Display settings of an embedded frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedData {
    pub width: f64,
    pub source: String,
    pub full_width: bool,
    pub page_width: bool,
    pub aspect_ratio: f64,
    pub preserve_scale: bool,
}

impl Default for EmbedData {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            source: DEFAULT_SOURCE.to_string(),
            full_width: false,
            page_width: false,
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            preserve_scale: true,
        }
    }
}

impl EmbedData {
    /// Read embed settings from the block's `format`, each field defaulting on its own.
    ///
    /// Width and aspect ratio also fall back when zero; the flags fall back
    /// only when absent.
    pub fn from_value(value: &BlockValue) -> Self {
        let defaults = Self::default();
        Self {
            width: non_zero(value.format_field("block_width")).unwrap_or(defaults.width),
            source: value
                .format_field("display_source")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or(defaults.source),
            full_width: value
                .format_field("block_full_width")
                .and_then(Value::as_bool)
                .unwrap_or(defaults.full_width),
            page_width: value
                .format_field("block_page_width")
                .and_then(Value::as_bool)
                .unwrap_or(defaults.page_width),
            aspect_ratio: non_zero(value.format_field("block_aspect_ratio"))
                .unwrap_or(defaults.aspect_ratio),
            preserve_scale: value
                .format_field("block_preserve_scale")
                .and_then(Value::as_bool)
                .unwrap_or(defaults.preserve_scale),
        }
    }
}

fn non_zero(v: Option<&Value>) -> Option<f64> {
    v.and_then(Value::as_f64).filter(|n| *n != 0.0)
}
