use crate::{schemas::SchemaHandle, types::itinerary::ItineraryPlan};
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use tracing::debug;

const MAX_SCHEMA_ERRORS: usize = 3;

/// Check a decoded payload against a schema.
///
/// The model is not a schema-checked service, so a mismatch never rejects
/// the plan. It comes back as a warning for the caller to surface.
pub fn schema_drift(schema: &SchemaHandle, payload: &Value) -> Option<String> {
    let validator = match JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema.schema_json())
    {
        Ok(validator) => validator,
        Err(err) => {
            debug!(
                target: "trip_planner::schema",
                schema = schema.schema_name(),
                error = %err,
                "schema failed to compile"
            );
            return None;
        }
    };

    let errors = match validator.validate(payload) {
        Ok(()) => return None,
        Err(errors) => errors,
    };

    let mut details = Vec::new();
    let mut truncated = false;

    for (idx, error) in errors.enumerate() {
        if idx < MAX_SCHEMA_ERRORS {
            let mut path = error.instance_path.to_string();
            if path.is_empty() {
                path = "<root>".to_string();
            }
            details.push(format!("{}: {}", path, error));
        } else {
            truncated = true;
            break;
        }
    }

    let mut detail_str = if details.is_empty() {
        "payload failed schema validation".to_string()
    } else {
        details.join("; ")
    };

    if truncated {
        detail_str.push_str("; additional errors truncated");
    }

    Some(format!(
        "response does not fully match the `{}` schema: {}",
        schema.schema_name(),
        detail_str
    ))
}

/// Warn when the model returned a different number of days than requested
pub fn day_count_mismatch(plan: &ItineraryPlan, duration_days: u32) -> Option<String> {
    let days = plan.days().len();
    if plan.daily_plan.is_none() || days == duration_days as usize {
        return None;
    }
    Some(format!(
        "daily_plan has {} {} but the trip lasts {} {}",
        days,
        if days == 1 { "entry" } else { "entries" },
        duration_days,
        if duration_days == 1 { "day" } else { "days" },
    ))
}
