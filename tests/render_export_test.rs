use serde_json::json;
use trip_planner_rs::{
    render_plan, to_json, to_markdown,
    types::{response::decode_structured_output, ItineraryPlan},
    view::ViewNode,
};

fn drifted_plan() -> ItineraryPlan {
    // Lists as strings, a day as plain text, costs as strings
    let raw = r#"Sure! Here you go:
```json
{
  "summary": "Two relaxed days in Porto.",
  "visa_and_tips": "Schengen rules apply.",
  "daily_plan": [
    {"day": "1", "title": "Ribeira", "morning": "Walk the riverside", "evening": ["Port tasting"], "est_cost_usd": "~$90"},
    "Day trip to the Douro valley"
  ],
  "total_estimated_cost_usd": "180",
  "map_links": "https://maps.google.com/?q=Porto"
}
```
Enjoy!"#;
    decode_structured_output(raw).unwrap().plan
}

#[test]
fn test_drifted_answer_renders_every_section() {
    let plan = drifted_plan();
    let view = render_plan(&plan);

    assert_eq!(
        view.nodes[0],
        ViewNode::Banner("Two relaxed days in Porto.".to_string())
    );
    assert!(view.group("Visa & Practical Tips").is_some());
    assert!(view.group("Day 1: Ribeira").is_some());
    assert!(view.group("Day 2").is_some());
    assert!(view.has_heading("Total Estimated Cost: ~$180"));
    assert!(view.has_heading("Useful Map Links"));
    assert!(!view.has_heading("Packing / Seasonal Tips"));

    let text = view.to_string();
    assert!(text.contains("Walk the riverside"));
    assert!(text.contains("Estimated daily cost: ~$90"));
    assert!(!text.contains("Douro"));
}

#[test]
fn test_markdown_of_drifted_answer() {
    let markdown = to_markdown(&drifted_plan());
    let expected = [
        "# AI Travel Planner Itinerary\n",
        "**Summary:** Two relaxed days in Porto.\n",
        "## Visa & Tips",
        "- Schengen rules apply.",
        "",
        "## Daily Plan",
        "### Day 1 – Ribeira",
        "**Morning:**",
        "- Walk the riverside",
        "**Evening:**",
        "- Port tasting",
        "_Estimated cost_: $90",
        "",
        "### Day 2 – ",
        "Day trip to the Douro valley",
        "",
        "**Total Estimated Cost**: ~$180\n",
        "## Map Links",
        "- https://maps.google.com/?q=Porto",
        "",
    ]
    .join("\n");
    assert_eq!(markdown, expected);
}

#[test]
fn test_exports_are_stable() {
    let plan: ItineraryPlan = serde_json::from_value(json!({
        "summary": "Café hopping in Paris — três dias",
        "daily_plan": [{"day": 1, "title": "Marais", "food": ["Falafel"]}]
    }))
    .unwrap();

    assert_eq!(to_markdown(&plan), to_markdown(&plan));
    let first = to_json(&plan).unwrap();
    assert_eq!(first, to_json(&plan).unwrap());
    assert!(first.contains("Café hopping in Paris — três dias"));
}
