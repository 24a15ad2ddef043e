//! Lenient reply parsing.

use serde_json::Value;
use tracing::warn;

use para_core::{CategorySet, GenerativeResult};

/// `"0.85"` or `"85%"`.
fn parse_confidence_text(text: &str) -> Option<f64> {
    let text = text.trim();
    match text.strip_suffix('%') {
        Some(percent) => percent.trim().parse::<f64>().ok().map(|p| p / 100.0),
        None => text.parse::<f64>().ok(),
    }
}

/// Parse a model reply into a normalized result.
///
/// Tolerates code fences and prose around the object: everything between
/// the first `{` and the last `}` is parsed. `category` must normalize onto
/// the configured set and `confidence` must be numeric (a numeric string is
/// accepted, as is a percentage). Out-of-range confidence is clamped and flagged invalid.
pub fn parse_reply(raw: &str, categories: &CategorySet) -> Result<GenerativeResult, String> {
    let object = extract_object(raw).ok_or_else(|| "no JSON object in reply".to_string())?;
    let value: Value =
        serde_json::from_str(object).map_err(|e| format!("invalid JSON: {e}"))?;
    let map = value
        .as_object()
        .ok_or_else(|| "reply is not a JSON object".to_string())?;

    let label = map
        .get("category")
        .and_then(Value::as_str)
        .ok_or_else(|| "missing string field 'category'".to_string())?;
    let category = categories
        .normalize(label)
        .ok_or_else(|| format!("unknown category '{label}'"))?;

    let confidence = match map.get("confidence") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_confidence_text(s),
        _ => None,
    }
    .filter(|c| c.is_finite())
    .ok_or_else(|| "missing numeric field 'confidence'".to_string())?;

    let rationale = ["rationale", "reasoning", "reason"]
        .iter()
        .find_map(|k| map.get(*k).and_then(Value::as_str))
        .unwrap_or_default();

    let result = GenerativeResult::new(category, confidence).with_rationale(rationale);
    if !result.valid {
        warn!(
            raw_confidence = confidence,
            clamped = result.confidence,
            "generative confidence out of range, clamped"
        );
    }
    Ok(result)
}

/// Slice from the first `{` to the last `}`.
fn extract_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}
