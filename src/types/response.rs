use serde_json::Value;

use crate::{
    error::{PlannerError, Result},
    types::itinerary::ItineraryPlan,
};

/// A decoded itinerary together with the raw JSON object it came from
#[derive(Clone, Debug)]
pub struct DecodedPlan {
    pub plan: ItineraryPlan,
    pub payload: Value,
}

/// Decode a response that should be a bare JSON object (JSON mode).
pub fn decode_itinerary(raw: &str) -> Result<DecodedPlan> {
    let payload: Value = serde_json::from_str(raw.trim()).map_err(|err| {
        PlannerError::ResponseDecode(format!("response is not valid JSON: {}", err))
    })?;
    decode_payload(payload)
}

/// Decode free-form model text that carries the JSON object somewhere inside it,
/// usually in a ```json fence.
pub fn decode_structured_output(raw: &str) -> Result<DecodedPlan> {
    if let Ok(payload) = serde_json::from_str::<Value>(raw.trim()) {
        return decode_payload(payload);
    }

    let block = extract_json_block(raw);
    if block.is_empty() {
        return Err(PlannerError::ResponseDecode(
            "response did not contain any JSON".to_string(),
        ));
    }
    decode_itinerary(block)
}

/// Check the top-level shape, then deserialize the lenient plan
pub fn decode_payload(payload: Value) -> Result<DecodedPlan> {
    if !payload.is_object() {
        return Err(PlannerError::ResponseDecode(format!(
            "expected a JSON object at the top level, got {}",
            json_kind(&payload)
        )));
    }

    let plan = serde_path_to_error::deserialize(&payload).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        PlannerError::ResponseDecode(format!(
            "failed to deserialize `ItineraryPlan` at {}: {}",
            location,
            err.inner()
        ))
    })?;

    Ok(DecodedPlan { plan, payload })
}

fn extract_json_block(text: &str) -> &str {
    let trimmed = text.trim();

    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        let body = after_fence
            .strip_prefix("json")
            .or_else(|| after_fence.strip_prefix("JSON"))
            .unwrap_or(after_fence);
        // closing fence is the last one; string values may contain backticks
        let body = match body.rfind("```") {
            Some(end) => &body[..end],
            None => body,
        };
        return body.trim();
    }

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
