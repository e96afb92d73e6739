use super::Workspace;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;
use tracing::debug;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Page to check (all pages when omitted)
    pub page: Option<String>,
}

pub fn check(args: CheckArgs, cwd: &Path) -> Result<()> {
    println!("🔍 {} page integrity", "Checking".green().bold());
    println!();

    let mut workspace = Workspace::open(cwd)?;
    let page_ids = match args.page {
        Some(page_id) => vec![page_id],
        None => workspace.page_ids(),
    };

    let mut failures = 0;
    for page_id in &page_ids {
        let result = workspace
            .open_page(page_id)
            .and_then(|()| match workspace.session.document().page(page_id) {
                Some(page) => Ok(page.check_integrity()?),
                None => Err(anyhow::anyhow!("Page {} did not open", page_id)),
            });

        match result {
            Ok(()) => {
                let elements = workspace
                    .session
                    .document()
                    .page(page_id)
                    .map(|p| p.elements_by_id().len())
                    .unwrap_or(0);
                debug!(page_id = %page_id, elements, "Page is consistent");
                println!("   {} {} ({} elements)", "✓".green(), page_id, elements);
            }
            Err(e) => {
                failures += 1;
                println!("   {} {}: {:#}", "✗".red(), page_id, e);
            }
        }
    }

    println!();
    println!("   Pages checked: {}", page_ids.len());

    if failures > 0 {
        return Err(anyhow::anyhow!("{} page(s) failed the integrity check", failures));
    }

    println!("✨ {} All pages are consistent", "Done".green().bold());
    Ok(())
}
