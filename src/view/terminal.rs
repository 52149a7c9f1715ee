use std::fmt;

use crate::types::itinerary::TextOrList;
use crate::view::render::{ItineraryView, ViewNode};

const INDENT: &str = "  ";

/// Plain-text drawing of an [`ItineraryView`].
///
/// Collapsed groups print their header only, unless `expand_all` is set.
#[derive(Debug, Clone, Copy)]
pub struct TerminalView<'a> {
    view: &'a ItineraryView,
    expand_all: bool,
}

impl<'a> TerminalView<'a> {
    pub fn new(view: &'a ItineraryView) -> Self {
        Self {
            view,
            expand_all: false,
        }
    }

    pub fn expand_all(mut self, expand_all: bool) -> Self {
        self.expand_all = expand_all;
        self
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, node: &ViewNode, depth: usize) -> fmt::Result {
        let pad = INDENT.repeat(depth);
        match node {
            ViewNode::Banner(text) => {
                writeln!(f, "{pad}> {text}")?;
                writeln!(f)
            }
            ViewNode::Heading { level, text } => {
                writeln!(f)?;
                writeln!(f, "{pad}{} {text}", "#".repeat(*level as usize))
            }
            ViewNode::Content(content) => write_content(f, content, &pad),
            ViewNode::Group {
                label,
                expanded,
                children,
            } => {
                let open = *expanded || self.expand_all;
                writeln!(f, "{pad}{} {label}", if open { "[-]" } else { "[+]" })?;
                if open {
                    for child in children {
                        self.write_node(f, child, depth + 1)?;
                    }
                }
                Ok(())
            }
            ViewNode::Columns(columns) => {
                for column in columns {
                    writeln!(f, "{pad}{}:", column.label)?;
                    write_content(f, &column.content, &format!("{pad}{INDENT}"))?;
                }
                Ok(())
            }
            ViewNode::Labeled { label, content } => {
                writeln!(f, "{pad}{label}:")?;
                write_content(f, content, &format!("{pad}{INDENT}"))
            }
            ViewNode::Note { label, text } => writeln!(f, "{pad}(i) {label}: {text}"),
            ViewNode::Caption(text) => writeln!(f, "{pad}{text}"),
        }
    }
}

fn write_content(f: &mut fmt::Formatter<'_>, content: &TextOrList, pad: &str) -> fmt::Result {
    match content {
        TextOrList::TextBlock(text) => {
            for line in text.lines() {
                writeln!(f, "{pad}{line}")?;
            }
            Ok(())
        }
        TextOrList::BulletList(items) => {
            for item in items {
                writeln!(f, "{pad}- {item}")?;
            }
            Ok(())
        }
    }
}

impl fmt::Display for TerminalView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.view.nodes {
            self.write_node(f, node, 0)?;
        }
        Ok(())
    }
}

impl ItineraryView {
    pub fn terminal(&self) -> TerminalView<'_> {
        TerminalView::new(self)
    }
}

impl fmt::Display for ItineraryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.terminal(), f)
    }
}

#[cfg(test)]
mod tests {
    use crate::types::itinerary::ItineraryPlan;
    use crate::view::render_plan;
    use serde_json::json;

    fn view() -> crate::view::ItineraryView {
        let plan: ItineraryPlan = serde_json::from_value(json!({
            "summary": "Three days in Lisbon.",
            "visa_and_tips": ["No visa needed"],
            "daily_plan": [
                {"day": 1, "title": "Alfama", "morning": "Tram 28", "food": ["Pastel de nata"]},
                {"day": 2, "title": "Belem", "morning": ["Tower"]}
            ],
            "total_estimated_cost_usd": 540
        }))
        .unwrap();
        render_plan(&plan)
    }

    #[test]
    fn test_collapsed_days_show_header_only() {
        let text = view().to_string();
        assert!(text.starts_with("> Three days in Lisbon.\n"));
        assert!(text.contains("[-] Visa & Practical Tips\n  - No visa needed\n"));
        assert!(text.contains("[-] Day 1: Alfama\n  Morning:\n    Tram 28\n  Food:\n    - Pastel de nata\n"));
        assert!(text.contains("[+] Day 2: Belem\n"));
        assert!(!text.contains("Tower"));
        assert!(text.contains("### Total Estimated Cost: ~$540\n"));
    }

    #[test]
    fn test_expand_all() {
        let view = view();
        let text = view.terminal().expand_all(true).to_string();
        assert!(text.contains("[-] Day 2: Belem\n  Morning:\n    - Tower\n"));
    }
}
