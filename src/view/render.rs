use crate::types::itinerary::{Amount, DailyPlan, DayEntry, DayPlan, ItineraryPlan, TextOrList};

/// A piece of the rendered itinerary
#[derive(Debug, Clone, PartialEq)]
pub enum ViewNode {
    /// Highlighted summary line
    Banner(String),
    Heading { level: u8, text: String },
    /// A list, or a single block of text when the model sent text instead
    Content(TextOrList),
    /// Collapsible section
    Group {
        label: String,
        expanded: bool,
        children: Vec<ViewNode>,
    },
    /// Side-by-side labelled lists
    Columns(Vec<Column>),
    Labeled { label: String, content: TextOrList },
    Note { label: String, text: String },
    Caption(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub label: String,
    pub content: TextOrList,
}

/// Renderable form of an itinerary, independent of any surface
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItineraryView {
    pub nodes: Vec<ViewNode>,
}

impl ItineraryView {
    /// Top-level collapsible groups, in order
    pub fn groups(&self) -> impl Iterator<Item = (&str, bool, &[ViewNode])> {
        self.nodes.iter().filter_map(|node| match node {
            ViewNode::Group {
                label,
                expanded,
                children,
            } => Some((label.as_str(), *expanded, children.as_slice())),
            _ => None,
        })
    }

    pub fn group(&self, label: &str) -> Option<&[ViewNode]> {
        self.groups()
            .find(|(candidate, _, _)| *candidate == label)
            .map(|(_, _, children)| children)
    }

    pub fn has_heading(&self, prefix: &str) -> bool {
        self.nodes.iter().any(|node| {
            matches!(node, ViewNode::Heading { text, .. } if text.starts_with(prefix))
        })
    }
}

pub const VISA_GROUP: &str = "Visa & Practical Tips";
pub const SCHEDULE_HEADING: &str = "Daily Schedule";
pub const TOTAL_COST_PREFIX: &str = "Total Estimated Cost";
pub const MAP_LINKS_HEADING: &str = "Useful Map Links";
pub const PACKING_HEADING: &str = "Packing / Seasonal Tips";

/// Walk a plan and lay out every section it has. Absent sections are left out.
pub fn render_plan(plan: &ItineraryPlan) -> ItineraryView {
    let mut nodes = Vec::new();

    if let Some(summary) = plan.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        nodes.push(ViewNode::Banner(summary.to_string()));
    }

    if let Some(tips) = present(plan.visa_and_tips.as_ref()) {
        nodes.push(ViewNode::Group {
            label: VISA_GROUP.to_string(),
            expanded: true,
            children: vec![ViewNode::Content(tips.clone())],
        });
    }

    if let Some(daily) = plan.daily_plan.as_ref().filter(|daily| !daily.is_empty()) {
        nodes.push(ViewNode::Heading {
            level: 2,
            text: SCHEDULE_HEADING.to_string(),
        });
        match daily {
            DailyPlan::TextBlock(text) => {
                nodes.push(ViewNode::Content(TextOrList::TextBlock(text.clone())));
            }
            DailyPlan::Days(entries) => {
                let expanded_index = plan.first_day_index();
                for (index, entry) in entries.iter().enumerate() {
                    nodes.push(render_day(entry, index, expanded_index == Some(index)));
                }
            }
        }
    }

    if let Some(total) = plan.total_cost() {
        nodes.push(ViewNode::Heading {
            level: 3,
            text: format!("{}: ~${}", TOTAL_COST_PREFIX, total),
        });
    }

    for (heading, field) in [
        (MAP_LINKS_HEADING, plan.map_links.as_ref()),
        (PACKING_HEADING, plan.packing_or_seasonal_tips.as_ref()),
    ] {
        if let Some(content) = present(field) {
            nodes.push(ViewNode::Heading {
                level: 3,
                text: heading.to_string(),
            });
            nodes.push(ViewNode::Content(content.clone()));
        }
    }

    ItineraryView { nodes }
}

/// `Day N: title`, numbering by position when the model left the day out
pub fn day_label(entry: &DayEntry, index: usize) -> String {
    let number = entry.day_number().unwrap_or(index as u32 + 1);
    match entry
        .as_day()
        .and_then(|day| day.title.as_deref())
        .filter(|title| !title.trim().is_empty())
    {
        Some(title) => format!("Day {}: {}", number, title),
        None => format!("Day {}", number),
    }
}

fn render_day(entry: &DayEntry, index: usize, expanded: bool) -> ViewNode {
    let children = match entry {
        DayEntry::Text(text) => vec![ViewNode::Content(TextOrList::TextBlock(text.clone()))],
        DayEntry::Day(day) => day_children(day),
    };

    ViewNode::Group {
        label: day_label(entry, index),
        expanded,
        children,
    }
}

fn day_children(day: &DayPlan) -> Vec<ViewNode> {
    let mut children = Vec::new();

    let columns: Vec<Column> = day
        .slots()
        .into_iter()
        .filter_map(|(label, content)| {
            present(content).map(|content| Column {
                label: label.to_string(),
                content: content.clone(),
            })
        })
        .collect();
    if !columns.is_empty() {
        children.push(ViewNode::Columns(columns));
    }

    if let Some(food) = present(day.food.as_ref()) {
        children.push(ViewNode::Labeled {
            label: "Food".to_string(),
            content: food.clone(),
        });
    }

    if let Some(notes) = present(day.transport_notes.as_ref()) {
        children.push(ViewNode::Note {
            label: "Transport Notes".to_string(),
            text: notes.joined("; "),
        });
    }

    if let Some(cost) = day.est_cost_usd.as_ref().filter(|cost| !cost.is_empty_text()) {
        children.push(ViewNode::Caption(cost_caption(cost)));
    }

    children
}

fn cost_caption(cost: &Amount) -> String {
    format!("Estimated daily cost: ~${}", cost)
}

fn present(field: Option<&TextOrList>) -> Option<&TextOrList> {
    field.filter(|content| !content.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plan(value: serde_json::Value) -> ItineraryPlan {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_string_instead_of_list_renders_as_block() {
        let view = render_plan(&plan(json!({
            "daily_plan": [{"day": 1, "title": "Arrival", "morning": "Check in and nap"}]
        })));

        let children = view.group("Day 1: Arrival").unwrap();
        assert_eq!(
            children[0],
            ViewNode::Columns(vec![Column {
                label: "Morning".to_string(),
                content: TextOrList::TextBlock("Check in and nap".to_string()),
            }])
        );
    }

    #[test]
    fn test_absent_sections_are_omitted() {
        let view = render_plan(&plan(json!({"summary": "Quick trip."})));
        assert_eq!(view.nodes, vec![ViewNode::Banner("Quick trip.".to_string())]);
        assert!(!view.has_heading(TOTAL_COST_PREFIX));

        let view = render_plan(&ItineraryPlan::default());
        assert!(view.nodes.is_empty());
    }

    #[test]
    fn test_only_first_day_is_expanded() {
        let view = render_plan(&plan(json!({
            "daily_plan": [
                {"day": 1, "title": "A"},
                {"day": 2, "title": "B"},
                {"day": 3, "title": "C"}
            ]
        })));
        let expanded: Vec<bool> = view
            .groups()
            .map(|(_, expanded, _)| expanded)
            .collect();
        assert_eq!(expanded, vec![true, false, false]);
    }

    #[test]
    fn test_first_entry_expanded_without_day_one() {
        let view = render_plan(&plan(json!({
            "daily_plan": [{"title": "Museums"}, "Free day"]
        })));
        let groups: Vec<(&str, bool)> = view
            .groups()
            .map(|(label, expanded, _)| (label, expanded))
            .collect();
        assert_eq!(groups, vec![("Day 1: Museums", true), ("Day 2", false)]);
        assert_eq!(
            view.group("Day 2").unwrap(),
            [ViewNode::Content(TextOrList::TextBlock("Free day".to_string()))]
        );
    }

    #[test]
    fn test_day_sections_in_order() {
        let view = render_plan(&plan(json!({
            "daily_plan": [{
                "day": 1,
                "title": "Old Town",
                "morning": ["Castle"],
                "evening": ["Night market"],
                "food": ["Dumplings"],
                "transport_notes": "Walk",
                "est_cost_usd": 60
            }],
            "total_estimated_cost_usd": 60
        })));

        let children = view.group("Day 1: Old Town").unwrap();
        assert!(matches!(&children[0], ViewNode::Columns(columns) if columns.len() == 2));
        assert!(matches!(&children[1], ViewNode::Labeled { label, .. } if label == "Food"));
        assert_eq!(
            children[2],
            ViewNode::Note {
                label: "Transport Notes".to_string(),
                text: "Walk".to_string()
            }
        );
        assert_eq!(
            children[3],
            ViewNode::Caption("Estimated daily cost: ~$60".to_string())
        );
        assert!(view.has_heading("Total Estimated Cost: ~$60"));
    }

    #[test]
    fn test_blank_day_cost_has_no_caption() {
        let view = render_plan(&plan(json!({
            "daily_plan": [
                {"day": 1, "title": "Beach", "est_cost_usd": ""},
                {"day": 2, "title": "Park", "est_cost_usd": 0}
            ]
        })));
        assert!(view.group("Day 1: Beach").unwrap().is_empty());
        assert_eq!(
            view.group("Day 2: Park").unwrap(),
            [ViewNode::Caption("Estimated daily cost: ~$0".to_string())]
        );
    }

    #[test]
    fn test_schedule_as_free_text() {
        let view = render_plan(&plan(json!({"daily_plan": "Wander as you like."})));
        assert_eq!(
            view.nodes,
            vec![
                ViewNode::Heading {
                    level: 2,
                    text: SCHEDULE_HEADING.to_string()
                },
                ViewNode::Content(TextOrList::TextBlock("Wander as you like.".to_string())),
            ]
        );
    }
}
