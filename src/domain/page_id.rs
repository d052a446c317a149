//! Page id parsing.
//!
//! Accepts a dashed uuid, a bare 32-hex id, or a page URL such as
//! `https://www.notion.so/workspace/My-Page-0123456789abcdef0123456789abcdef?v=...`.
//! The result is always the dashed lowercase form the record API expects.

use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

use crate::domain::error::DomainError;

fn trailing_hex_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)([0-9a-f]{32}|[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12})$")
            .expect("static regex")
    })
}

/// Normalize a page reference into a dashed uuid string.
pub fn parse_page_id(input: &str) -> Result<String, DomainError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidPageId(input.to_string()));
    }

    // Drop query and fragment, then look at the last path segment only.
    let path = trimmed
        .split(['?', '#'])
        .next()
        .unwrap_or(trimmed)
        .trim_end_matches('/');
    let segment = path.rsplit('/').next().unwrap_or(path);

    let candidate = trailing_hex_regex()
        .captures(segment)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| DomainError::InvalidPageId(input.to_string()))?;

    Uuid::parse_str(candidate)
        .map(|id| id.hyphenated().to_string())
        .map_err(|_| DomainError::InvalidPageId(input.to_string()))
}
