use crate::{error::Result, types::trip_spec::TripSpec};

const PLANNER_PERSONA: &str = "You are a meticulous travel planner. \
Use realistic timing & distances, respect budget/style, and keep safety in mind. \
If info is uncertain, make sensible assumptions.";

/// One field of the response as described to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseField {
    pub name: &'static str,
    pub type_hint: &'static str,
    pub description: &'static str,
}

/// Declared response fields, in the order the model should emit them
pub const RESPONSE_FIELDS: &[ResponseField] = &[
    ResponseField {
        name: "summary",
        type_hint: "string",
        description: "2-3 sentence overview of the trip.",
    },
    ResponseField {
        name: "visa_and_tips",
        type_hint: "List[string]",
        description: "List of short bullet tips; include visa notes if relevant to passport and destination.",
    },
    ResponseField {
        name: "daily_plan",
        type_hint: "List[object]",
        description: "List of day objects (length equals duration_days). \
Each day has: day (int), title (string), morning (list), afternoon (list), evening (list), \
food (list), transport_notes (string), est_cost_usd (number)",
    },
    ResponseField {
        name: "total_estimated_cost_usd",
        type_hint: "number",
        description: "Number: total rough cost in USD.",
    },
    ResponseField {
        name: "map_links",
        type_hint: "List[string]",
        description: "Optional list of Google Maps links to major POIs.",
    },
    ResponseField {
        name: "packing_or_seasonal_tips",
        type_hint: "List[string]",
        description: "List of short packing or season tips.",
    },
];

/// Literal response template used with the provider's JSON object mode
pub const JSON_TEMPLATE: &str = r#"{
  "summary": "2-3 sentence overview of the trip",
  "visa_and_tips": ["short practical tip, including visa notes for this passport and destination"],
  "daily_plan": [
    {
      "day": 1,                       // 1-based day number
      "title": "theme of the day",
      "morning": ["activity"],
      "afternoon": ["activity"],
      "evening": ["activity"],
      "food": ["dish or place to eat"],
      "transport_notes": "how to get around",
      "est_cost_usd": 120             // number, rough daily spend
    }
  ],
  "total_estimated_cost_usd": 840,   // number, whole trip
  "map_links": ["https://maps.google.com/?q=..."],
  "packing_or_seasonal_tips": ["short tip"]
}"#;

/// System and user messages sent to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Format instructions listing each declared field, fenced as JSON
pub fn format_instructions() -> String {
    let mut lines = Vec::with_capacity(RESPONSE_FIELDS.len() + 4);
    lines.push(
        "The output should be a markdown code snippet formatted in the following schema, \
including the leading and trailing \"```json\" and \"```\":"
            .to_string(),
    );
    lines.push(String::new());
    lines.push("```json".to_string());
    lines.push("{".to_string());
    for field in RESPONSE_FIELDS {
        lines.push(format!(
            "\t\"{}\": {}  // {}",
            field.name, field.type_hint, field.description
        ));
    }
    lines.push("}".to_string());
    lines.push("```".to_string());
    lines.join("\n")
}

fn language_instruction(language: Option<&str>) -> String {
    match language {
        Some(language) => format!("Write every text value in {}.", language),
        None => "Write the summary in English.".to_string(),
    }
}

fn day_count_instruction(spec: &TripSpec) -> String {
    format!(
        "Keep exactly {} entries in daily_plan, one per day, numbered from 1.",
        spec.duration_days()
    )
}

fn user_message(spec: &TripSpec) -> Result<String> {
    Ok(format!("Trip spec:\n{}", spec.to_prompt_json()?))
}

/// Prompt for the structured-output strategy: field list plus format instructions
pub fn compose_structured(spec: &TripSpec, language: Option<&str>) -> Result<PromptPair> {
    let system = format!(
        "{}\n{}\n{}\nReturn ONLY valid JSON in the following format, with no prose before or after it:\n{}",
        PLANNER_PERSONA,
        day_count_instruction(spec),
        language_instruction(language),
        format_instructions()
    );

    Ok(PromptPair {
        system,
        user: user_message(spec)?,
    })
}

/// Prompt for the JSON-mode strategy: literal template with comments
pub fn compose_json_template(spec: &TripSpec, language: Option<&str>) -> Result<PromptPair> {
    let system = format!(
        "{}\n{}\n{}\nRespond with a single JSON object shaped like this template \
(comments are for you only, do not include them):\n{}\nReturn ONLY the JSON object, no prose.",
        PLANNER_PERSONA,
        day_count_instruction(spec),
        language_instruction(language),
        JSON_TEMPLATE
    );

    Ok(PromptPair {
        system,
        user: user_message(spec)?,
    })
}

/// Language hint from the session, falling back to the one on the form
pub fn effective_language<'a>(session: Option<&'a str>, spec: &'a TripSpec) -> Option<&'a str> {
    session.or_else(|| spec.language())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::trip_spec::RawTripForm;

    fn spec(days: u32) -> TripSpec {
        TripSpec::from_form(&RawTripForm {
            destination: "Kyoto, Japan".to_string(),
            duration_days: days,
            ..RawTripForm::default()
        })
        .unwrap()
    }

    #[test]
    fn test_structured_prompt_mentions_every_field() {
        let prompt = compose_structured(&spec(4), None).unwrap();

        for field in RESPONSE_FIELDS {
            assert!(prompt.system.contains(field.name), "missing {}", field.name);
        }
        assert!(prompt.system.contains("Keep exactly 4 entries in daily_plan"));
        assert!(prompt.system.contains("sensible assumptions"));
        assert!(prompt.system.contains("Return ONLY valid JSON"));
        assert!(prompt.system.contains("in English"));
        assert!(prompt.user.starts_with("Trip spec:\n{"));
        assert!(prompt.user.contains("\"destination\": \"Kyoto, Japan\""));
    }

    #[test]
    fn test_json_template_prompt() {
        let prompt = compose_json_template(&spec(2), Some("Arabic")).unwrap();
        assert!(prompt.system.contains("\"daily_plan\""));
        assert!(prompt.system.contains("\"est_cost_usd\""));
        assert!(prompt.system.contains("Keep exactly 2 entries"));
        assert!(prompt.system.contains("Write every text value in Arabic."));
        assert!(prompt.system.contains("no prose"));
    }

    #[test]
    fn test_prompts_are_deterministic() {
        let first = compose_structured(&spec(3), Some("French")).unwrap();
        let second = compose_structured(&spec(3), Some("French")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_format_instructions_are_fenced() {
        let instructions = format_instructions();
        assert!(instructions.contains("```json\n{\n\t\"summary\": string"));
        assert!(instructions.ends_with("}\n```"));
    }
}
