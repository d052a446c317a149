//! Styled text as stored in block `properties`.
//!
//! The remote encodes a title as `[["plain", [["b"], ["a", "https://..."]]], ["more"]]`:
//! a list of runs, each a string plus an optional list of marks.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextRun {
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RichText(pub Vec<TextRun>);

impl RichText {
    /// Parse a property value; anything that is not a run list yields empty text.
    pub fn from_property(value: Option<&Value>) -> Self {
        let runs = value
            .and_then(Value::as_array)
            .map(|runs| runs.iter().filter_map(parse_run).collect())
            .unwrap_or_default();
        Self(runs)
    }

    pub fn plain(&self) -> String {
        self.0.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|r| r.text.is_empty())
    }
}

fn parse_run(run: &Value) -> Option<TextRun> {
    let parts = run.as_array()?;
    let text = parts.first()?.as_str()?.to_string();
    let marks = parts
        .get(1)
        .and_then(Value::as_array)
        .map(|marks| marks.iter().filter_map(parse_mark).collect())
        .unwrap_or_default();
    Some(TextRun { text, marks })
}

fn parse_mark(mark: &Value) -> Option<Vec<String>> {
    let parts = mark.as_array()?;
    Some(
        parts
            .iter()
            .map(|p| match p {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
    )
}

/// First string of a single-run property such as `checked: [["Yes"]]`.
pub fn property_str(value: Option<&Value>) -> Option<&str> {
    value?.get(0)?.get(0)?.as_str()
}
