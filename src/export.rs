//! JSON and Markdown exports of an itinerary.

use crate::error::Result;
use crate::types::itinerary::{DailyPlan, DayEntry, DayPlan, ItineraryPlan, TextOrList};

pub const JSON_FILE_NAME: &str = "itinerary.json";
pub const MARKDOWN_FILE_NAME: &str = "itinerary.md";

/// A file offered for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: &'static str,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Pretty JSON with 2-space indent; non-ASCII characters are written as-is.
pub fn to_json(plan: &ItineraryPlan) -> Result<String> {
    Ok(serde_json::to_string_pretty(plan)?)
}

pub fn to_markdown(plan: &ItineraryPlan) -> String {
    let mut lines: Vec<String> = vec!["# AI Travel Planner Itinerary\n".to_string()];

    if let Some(summary) = plan.summary.as_deref().filter(|s| !s.is_empty()) {
        lines.push(format!("**Summary:** {}\n", summary));
    }

    if let Some(tips) = present(plan.visa_and_tips.as_ref()) {
        lines.push("## Visa & Tips".to_string());
        push_bullets(&mut lines, tips);
        lines.push(String::new());
    }

    if let Some(daily) = plan.daily_plan.as_ref().filter(|daily| !daily.is_empty()) {
        lines.push("## Daily Plan".to_string());
        if daily.days().is_empty() {
            // free-text schedule
            push_bullets(&mut lines, &TextOrList::TextBlock(plan_text(daily)));
            lines.push(String::new());
        }
        for (index, entry) in daily.days().iter().enumerate() {
            let number = entry.day_number().unwrap_or(index as u32 + 1);
            match entry {
                DayEntry::Day(day) => push_day(&mut lines, number, day),
                DayEntry::Text(text) => {
                    lines.push(format!("### Day {} – ", number));
                    lines.push(single_line(text));
                }
            }
            lines.push(String::new());
        }
    }

    if let Some(total) = plan.total_cost() {
        lines.push(format!("**Total Estimated Cost**: ~${}\n", total));
    }

    if let Some(links) = present(plan.map_links.as_ref()) {
        lines.push("## Map Links".to_string());
        push_bullets(&mut lines, links);
        lines.push(String::new());
    }

    if let Some(tips) = present(plan.packing_or_seasonal_tips.as_ref()) {
        lines.push("## Packing / Seasonal Tips".to_string());
        push_bullets(&mut lines, tips);
        lines.push(String::new());
    }

    lines.join("\n")
}

/// `itinerary.json` then `itinerary.md`
pub fn downloads(plan: &ItineraryPlan) -> Result<Vec<Download>> {
    Ok(vec![
        Download {
            file_name: JSON_FILE_NAME,
            mime: "application/json",
            bytes: to_json(plan)?.into_bytes(),
        },
        Download {
            file_name: MARKDOWN_FILE_NAME,
            mime: "text/markdown",
            bytes: to_markdown(plan).into_bytes(),
        },
    ])
}

fn push_day(lines: &mut Vec<String>, number: u32, day: &DayPlan) {
    lines.push(format!(
        "### Day {} – {}",
        number,
        day.title.as_deref().unwrap_or_default()
    ));

    for (label, items) in day.slots() {
        if let Some(items) = present(items) {
            lines.push(format!("**{}:**", label));
            push_bullets(lines, items);
        }
    }

    if let Some(food) = present(day.food.as_ref()) {
        lines.push("**Food:**".to_string());
        push_bullets(lines, food);
    }

    if let Some(notes) = present(day.transport_notes.as_ref()) {
        lines.push(format!("**Transport Notes:** {}", single_line(&notes.joined("; "))));
    }

    if let Some(cost) = day.est_cost_usd.as_ref().filter(|cost| !cost.is_empty_text()) {
        lines.push(format!("_Estimated cost_: ${}", cost));
    }
}

fn push_bullets(lines: &mut Vec<String>, content: &TextOrList) {
    match content {
        TextOrList::TextBlock(text) => lines.push(format!("- {}", single_line(text))),
        TextOrList::BulletList(items) => {
            lines.extend(items.iter().map(|item| format!("- {}", item)));
        }
    }
}

fn plan_text(daily: &DailyPlan) -> String {
    match daily {
        DailyPlan::TextBlock(text) => text.clone(),
        DailyPlan::Days(_) => String::new(),
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn present(field: Option<&TextOrList>) -> Option<&TextOrList> {
    field.filter(|content| !content.is_empty())
}
