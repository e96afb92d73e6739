use super::Workspace;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;
use trellis_editor::{walk_element, walk_page, walk_slot, Element, ElementId, Page, Value, Visitor};

#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Page to print (all pages when omitted)
    pub page: Option<String>,

    /// Show property values
    #[arg(short, long)]
    pub properties: bool,
}

/// Indented outline of a page
struct Outline {
    properties: bool,
    lines: Vec<String>,
}

impl Outline {
    fn indent(depth: usize) -> String {
        "  ".repeat(depth)
    }
}

impl Visitor for Outline {
    fn visit_element(&mut self, page: &Page, element: &Element, depth: usize) {
        let pattern = element.pattern_id().unwrap_or("?");
        self.lines.push(format!(
            "{}{} {} {}",
            Self::indent(depth * 2),
            element.name().bold(),
            format!("<{}>", pattern).cyan(),
            format!("#{}", element.id()).dimmed()
        ));

        if self.properties {
            for (property_id, value) in element.properties() {
                self.lines.push(format!(
                    "{}{}: {}",
                    Self::indent(depth * 2 + 2),
                    property_id.yellow(),
                    display_value(value)
                ));
            }
        }

        walk_element(self, page, element, depth);
    }

    fn visit_slot(&mut self, page: &Page, element: &Element, slot_id: &str, children: &[ElementId], depth: usize) {
        if children.is_empty() {
            return;
        }
        self.lines
            .push(format!("{}{}", Self::indent(depth * 2 + 1), format!("[{}]", slot_id).dimmed()));
        walk_slot(self, page, element, slot_id, children, depth);
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Element(record) => format!("<{}>", record.name),
        other => other.to_json().to_string(),
    }
}

pub fn tree(args: TreeArgs, cwd: &Path) -> Result<()> {
    let mut workspace = Workspace::open(cwd)?;
    let page_ids = match args.page {
        Some(page_id) => vec![page_id],
        None => workspace.page_ids(),
    };

    for page_id in page_ids {
        workspace.open_page(&page_id)?;
        let Some(page) = workspace.session.document().page(&page_id) else {
            continue;
        };

        println!("📄 {} {}", page.name().bright_white().bold(), format!("({})", page_id).dimmed());
        let mut outline = Outline {
            properties: args.properties,
            lines: Vec::new(),
        };
        walk_page(&mut outline, page);
        for line in outline.lines {
            println!("{}", line);
        }
        println!();
    }

    Ok(())
}
