use serde_json::{Map, Value};
use tracing::debug;

use crate::record::CampaignRecord;

/// Fields whose presence marks an object as the campaign schema.
pub const CAMPAIGN_KEYS: [&str; 6] = [
    "campaign_overview",
    "written_content",
    "seo_recommendations",
    "visual_assets",
    "consistency_notes",
    "revision_flags",
];

/// Wrapper keys searched for a nested schema object, highest priority first.
pub const CONTAINER_KEYS: [&str; 7] = [
    "data", "result", "response", "content", "output", "message", "text",
];

/// Deepest container hop (counted from the payload root) that is still examined.
pub const MAX_DEPTH: usize = 8;

/// Strings shorter than this are never treated as embedded JSON.
const MIN_EMBEDDED_LEN: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Locate the campaign schema anywhere reachable in an upstream envelope.
///
/// Returns `None` when the envelope has no truthy `success` flag or when no
/// object exposing the campaign fields is found within [`MAX_DEPTH`] hops.
/// Search order: the `response` sub-object, then the whole envelope, then
/// the `raw_response` text decoded as JSON.
pub fn resolve(payload: &Value) -> Option<CampaignRecord> {
    if !payload.get("success").is_some_and(is_truthy) {
        debug!("envelope has no success flag, skipping resolution");
        return None;
    }

    if let Some(record) = payload.get("response").and_then(|v| search(v, 1)) {
        debug!(pass = "response", "campaign fields resolved");
        return Some(record);
    }

    if let Some(record) = search(payload, 0) {
        debug!(pass = "envelope", "campaign fields resolved");
        return Some(record);
    }

    if let Some(record) = payload
        .get("raw_response")
        .and_then(Value::as_str)
        .and_then(|raw| search_embedded(raw, 1))
    {
        debug!(pass = "raw_response", "campaign fields resolved");
        return Some(record);
    }

    debug!("no campaign fields found in envelope");
    None
}

/// Parse raw envelope text, then [`resolve`] it.
pub fn resolve_str(raw: &str) -> Result<Option<CampaignRecord>, ParseError> {
    let payload: Value = serde_json::from_str(raw)?;
    Ok(resolve(&payload))
}

fn search(value: &Value, depth: usize) -> Option<CampaignRecord> {
    if depth > MAX_DEPTH {
        return None;
    }
    let Value::Object(obj) = value else {
        return None;
    };

    if let Some(record) = direct_match(obj) {
        return Some(record);
    }

    let ancestor_summary = obj.get("summary").and_then(Value::as_str);
    CONTAINER_KEYS
        .iter()
        .filter_map(|key| obj.get(*key))
        .filter(|child| is_truthy(child))
        .find_map(|child| match child {
            Value::Object(_) => search(child, depth + 1),
            Value::String(s) => search_embedded(s, depth + 1),
            _ => None,
        })
        .map(|record| record.with_summary_fallback(ancestor_summary))
}

/// Decode a string as JSON (whole, else its outermost `{...}` span) and search it.
fn search_embedded(text: &str, depth: usize) -> Option<CampaignRecord> {
    if text.chars().count() < MIN_EMBEDDED_LEN {
        return None;
    }
    let parsed = serde_json::from_str::<Value>(text)
        .ok()
        .or_else(|| brace_span(text).and_then(|span| serde_json::from_str(span).ok()))?;
    search(&parsed, depth)
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn direct_match(obj: &Map<String, Value>) -> Option<CampaignRecord> {
    let has_fields = CAMPAIGN_KEYS
        .iter()
        .any(|key| matches!(obj.get(*key), Some(Value::String(s)) if !s.is_empty()));
    if !has_fields {
        return None;
    }

    let field = |key: &str| obj.get(key).map(coerce_string).unwrap_or_default();
    Some(CampaignRecord {
        summary: field("summary"),
        campaign_overview: field("campaign_overview"),
        written_content: field("written_content"),
        seo_recommendations: field("seo_recommendations"),
        visual_assets: field("visual_assets"),
        consistency_notes: field("consistency_notes"),
        revision_flags: field("revision_flags"),
    })
}

pub(crate) fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => number_text(n),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Integral floats print without a fraction (`1.0` -> `"1"`, `-0.0` -> `"0"`).
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => {
            if f == 0.0 {
                "0".to_string()
            } else {
                format!("{:.0}", f)
            }
        }
        _ => n.to_string(),
    }
}

/// Loose-JSON truthiness: `false`, `0`, `""` and `null` are falsy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ── Tests ──
