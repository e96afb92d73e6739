use super::Workspace;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::Path;
use trellis_editor::{calculate_drop_index, ElementLocationCommand};

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Page holding the element
    pub page: String,

    /// Element id
    pub element: String,

    /// New parent element
    #[arg(long, conflicts_with = "before")]
    pub parent: Option<String>,

    /// Slot of the new parent (defaults to the parent's default slot)
    #[arg(long, requires = "parent")]
    pub slot: Option<String>,

    /// Position in the slot (defaults to the end)
    #[arg(long, requires = "parent")]
    pub index: Option<usize>,

    /// Drop the element where this sibling is
    #[arg(long)]
    pub before: Option<String>,

    /// Remove the element from the page
    #[arg(long, conflicts_with_all = ["parent", "before"])]
    pub delete: bool,
}

pub async fn move_element(args: MoveArgs, cwd: &Path) -> Result<()> {
    let mut workspace = Workspace::open(cwd)?;
    workspace.open_page(&args.page)?;
    let document = workspace.session.document();

    let command = if args.delete {
        ElementLocationCommand::remove(document, &args.page, &args.element)?
    } else if let Some(target) = &args.before {
        let page = document
            .page(&args.page)
            .with_context(|| format!("Page {} is not open", args.page))?;
        let location = page
            .location_of(target)
            .with_context(|| format!("{} has no parent to drop into", target))?;
        let index = calculate_drop_index(page, &args.element, target);
        ElementLocationCommand::new(
            document,
            &args.page,
            &args.element,
            Some(&location.parent_id),
            Some(&location.slot_id),
            index,
        )?
    } else {
        let parent = args
            .parent
            .as_deref()
            .context("Pass --parent, --before or --delete")?;
        ElementLocationCommand::new(
            document,
            &args.page,
            &args.element,
            Some(parent),
            args.slot.as_deref(),
            args.index,
        )?
    };

    if !workspace.session.execute(command).await {
        return Err(anyhow::anyhow!("Move of {} could not be applied", args.element));
    }
    workspace.save_page(&args.page)?;

    let page = workspace.session.document().page(&args.page);
    match page.and_then(|p| p.location_of(&args.element)) {
        Some(location) => println!(
            "{} Moved {} into {} [{}] at {}",
            "✓".green(),
            args.element.bright_white().bold(),
            location.parent_id,
            location.slot_id,
            location.index
        ),
        None => println!("{} Removed {}", "✓".green(), args.element.bright_white().bold()),
    }
    Ok(())
}
