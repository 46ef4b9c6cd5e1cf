//! Turning generated text into a validated recipe draft.

use crate::error::PipelineError;
use crate::model::{Mode, RecipeDraft, UNTITLED};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)```(?:json)?").expect("fence pattern is valid"));

/// Removes markdown code-fence markers wherever they appear and trims.
pub fn strip_fences(text: &str) -> String {
    FENCE.replace_all(text, "").trim().to_string()
}

/// Parses generated text and validates it for `mode`.
///
/// - Extract: at least one ingredient or step is required; a missing title
///   falls back to [`UNTITLED`].
/// - Generate: a title and at least one ingredient are required.
///
/// An object whose `error` field is set (not `null`, `false`, `0` or `""`)
/// is a refusal, whatever else it contains.
pub fn parse_recipe_output(text: &str, mode: Mode) -> Result<RecipeDraft, PipelineError> {
    let cleaned = strip_fences(text);
    let value: Value = serde_json::from_str(&cleaned).map_err(|_| PipelineError::MalformedOutput)?;
    let object = value.as_object().ok_or(PipelineError::MalformedOutput)?;

    if let Some(reason) = object.get("error").and_then(refusal_reason) {
        return Err(PipelineError::UpstreamRefused(reason));
    }

    let title = object
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    let ingredients = string_list(object.get("ingredients"));
    let steps = string_list(object.get("steps"));

    match mode {
        Mode::Extract => {
            if ingredients.is_empty() && steps.is_empty() {
                return Err(PipelineError::NoExtractableContent);
            }
            let title = if title.is_empty() {
                UNTITLED.to_string()
            } else {
                title
            };
            Ok(RecipeDraft::new(title, ingredients, steps))
        }
        Mode::Generate => {
            if title.is_empty() || ingredients.is_empty() {
                return Err(PipelineError::InvalidGeneration);
            }
            Ok(RecipeDraft::new(title, ingredients, steps))
        }
    }
}

fn refusal_reason(error: &Value) -> Option<String> {
    match error {
        Value::Null | Value::Bool(false) => None,
        Value::String(reason) if reason.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(reason) => Some(reason.clone()),
        other => Some(other.to_string()),
    }
}

/// Lenient array reading: scalars are stringified, blanks dropped, anything
/// that is not an array counts as empty.
fn string_list(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect()
}
