use serde_json::json;
use trip_planner_rs::{
    itinerary_schema,
    schemas::schema_drift,
    services::prompt::{JSON_TEMPLATE, RESPONSE_FIELDS},
};

#[test]
fn test_schema_has_correct_structure() {
    let schema = itinerary_schema().schema_json();

    // Should be an object type
    assert_eq!(schema["type"], "object");

    // Every field is optional
    assert!(schema.get("required").is_none());

    let props = schema["properties"].as_object().unwrap();
    for field in [
        "summary",
        "visa_and_tips",
        "daily_plan",
        "total_estimated_cost_usd",
        "map_links",
        "packing_or_seasonal_tips",
    ] {
        assert!(props.contains_key(field), "missing property {field}");
    }
    assert_eq!(props.len(), 6);
}

#[test]
fn test_schema_describes_fields() {
    let schema = itinerary_schema().schema_json();
    let summary = &schema["properties"]["summary"];
    assert!(summary["description"]
        .as_str()
        .unwrap()
        .contains("overview"));

    // day objects live in the definitions
    let day = &schema["definitions"]["DayPlan"]["properties"];
    for field in [
        "day",
        "title",
        "morning",
        "afternoon",
        "evening",
        "food",
        "transport_notes",
        "est_cost_usd",
    ] {
        assert!(day.get(field).is_some(), "DayPlan is missing {field}");
    }
}

#[test]
fn test_prompt_fields_match_schema() {
    let mut declared: Vec<&str> = RESPONSE_FIELDS.iter().map(|field| field.name).collect();
    let mut schema_fields = itinerary_schema().property_names();
    declared.sort_unstable();
    schema_fields.sort_unstable();
    assert_eq!(declared, schema_fields);

    for field in RESPONSE_FIELDS {
        assert!(
            JSON_TEMPLATE.contains(&format!("\"{}\"", field.name)),
            "template is missing {}",
            field.name
        );
    }
}

#[test]
fn test_drift_is_tolerated_but_reported() {
    let loose = json!({
        "summary": "Fine",
        "visa_and_tips": "text instead of a list is allowed",
        "daily_plan": [{"day": 1, "morning": "also text"}, "free text day"],
        "total_estimated_cost_usd": "about 900"
    });
    assert_eq!(schema_drift(itinerary_schema(), &loose), None);

    let wrong = json!({"summary": {"nested": true}, "map_links": [1, 2]});
    let warning = schema_drift(itinerary_schema(), &wrong).unwrap();
    assert!(warning.contains("ItineraryPlan"));
}
