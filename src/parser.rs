//! Decode the model's answer string into a [`StructuredResult`].

use crate::error::ExtractError;
use crate::schema::StructuredResult;

/// Parse the model answer, which is expected to be JSON text.
///
/// An empty or malformed answer is a [`ExtractError::Parse`]; an empty result
/// is never substituted.
pub fn parse_answer(answer: &str) -> Result<StructuredResult, ExtractError> {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        return Err(ExtractError::Parse("model returned an empty answer".to_string()));
    }
    let json_str = unwrap_code_fence(trimmed);

    // First validate syntax
    let value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| ExtractError::Parse(format!("Invalid JSON syntax ({}): {}", e, excerpt(json_str))))?;

    if !value.is_object() {
        return Err(ExtractError::Parse(format!(
            "expected a JSON object: {}",
            excerpt(json_str)
        )));
    }

    // Then the expected shape
    serde_json::from_value(value)
        .map_err(|e| ExtractError::Parse(format!("JSON structure mismatch ({}): {}", e, excerpt(json_str))))
}

/// Models sometimes wrap JSON in a markdown fence even in JSON mode.
///
/// Only a fence enclosing the whole answer is removed; backticks inside JSON
/// strings and prose around a fence are left for the JSON parser to judge.
fn unwrap_code_fence(answer: &str) -> &str {
    let inner = match answer
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    {
        Some(inner) => inner,
        None => return answer,
    };
    inner.strip_prefix("json").unwrap_or(inner).trim()
}

fn excerpt(text: &str) -> String {
    text.chars().take(200).collect()
}
