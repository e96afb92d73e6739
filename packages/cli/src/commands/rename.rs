use super::Workspace;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;
use trellis_editor::ElementNameCommand;

#[derive(Args, Debug)]
pub struct RenameArgs {
    /// Page holding the element
    pub page: String,

    /// Element id
    pub element: String,

    /// New name (empty resets to the pattern name)
    #[arg(default_value = "")]
    pub name: String,
}

pub async fn rename(args: RenameArgs, cwd: &Path) -> Result<()> {
    let mut workspace = Workspace::open(cwd)?;
    workspace.open_page(&args.page)?;

    let command = ElementNameCommand::new(workspace.session.document(), &args.page, &args.element, args.name)?;
    let previous = command.previous_name().to_string();
    let name = command.effective_name().to_string();

    if !workspace.session.execute(command).await {
        return Err(anyhow::anyhow!("Rename of {} could not be applied", args.element));
    }
    workspace.save_page(&args.page)?;

    println!(
        "{} Renamed {} → {}",
        "✓".green(),
        previous.dimmed(),
        name.bright_white().bold()
    );
    Ok(())
}
