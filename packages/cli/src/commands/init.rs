use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use trellis_common::JsonFilePersistence;
use trellis_editor::{
    Document, EnumOption, Page, Pattern, PatternLibrary, PatternProperty, Project, PropertyKind, StaticPatternLibrary,
};

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Project name
    #[arg(short, long, default_value = "Untitled")]
    pub name: String,

    /// Pages directory
    #[arg(short, long, default_value = "pages")]
    pub pages_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

/// Starter pattern library written by `init`
pub fn starter_patterns() -> Vec<Pattern> {
    let align = PropertyKind::Enum {
        options: ["start", "center", "end"]
            .iter()
            .map(|id| EnumOption {
                id: id.to_string(),
                name: id.to_string(),
            })
            .collect(),
    };

    vec![
        Pattern::new("box", "Box")
            .with_property(PatternProperty::new("gap", PropertyKind::Number).with_default(8.0))
            .with_property(PatternProperty::new("align", align).with_default("start"))
            .with_slot("children", true),
        Pattern::new("text", "Text")
            .with_property(PatternProperty::new("content", PropertyKind::String).with_default("Hello, world"))
            .with_property(PatternProperty::new("bold", PropertyKind::Boolean).with_default(false)),
        Pattern::new("image", "Image").with_property(PatternProperty::new("src", PropertyKind::Asset)),
    ]
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Trellis project...".bright_blue().bold());

    let config = Config {
        pages_dir: args.pages_dir.clone(),
        ..Config::default()
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    let patterns = starter_patterns();
    fs::write(config.patterns_path(cwd), serde_json::to_string_pretty(&patterns)?)?;
    println!("  {} Created {}", "✓".green(), config.patterns_file);

    // Starter page: a Box holding one Text
    let library = patterns.into_iter().fold(StaticPatternLibrary::new(), |lib, p| lib.with_pattern(p));
    let box_pattern = starter_pattern(&library, "box")?;
    let text_pattern = starter_pattern(&library, "text")?;

    let mut page = Page::new("home", "Home", &box_pattern);
    let root = page.root_id().to_string();
    let text = page.create_element(&text_pattern);
    page.add_child(&root, &text, Some(box_pattern.default_slot()), None)?;

    let project_id = args.name.to_lowercase().replace(' ', "-");
    let mut document = Document::new(
        Project::new(project_id, args.name.clone()),
        Arc::new(library),
        Arc::new(JsonFilePersistence::new(cwd)),
    );
    document.add_page(page, config.page_path("home"));
    document.save_page("home")?;
    document.save_project(&config.project_path())?;
    println!("  {} Created {}/home.json", "✓".green(), config.pages_dir);
    println!("  {} Created {}", "✓".green(), config.project_file);

    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: trellis tree");
    println!("  2. Run: trellis rename home {} Greeting", text);

    Ok(())
}

fn starter_pattern(library: &StaticPatternLibrary, id: &str) -> Result<Arc<Pattern>> {
    library
        .pattern(id)
        .ok_or_else(|| anyhow::anyhow!("Starter pattern {} missing", id))
}
