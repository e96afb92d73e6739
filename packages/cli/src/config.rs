use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "trellis.config.json";

/// Trellis configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding one JSON file per page
    #[serde(default = "default_pages_dir")]
    pub pages_dir: String,

    /// Pattern library, a JSON array of patterns
    #[serde(default = "default_patterns_file")]
    pub patterns_file: String,

    /// Project file listing the pages
    #[serde(default = "default_project_file")]
    pub project_file: String,
}

fn default_pages_dir() -> String {
    "pages".to_string()
}

fn default_patterns_file() -> String {
    "patterns.json".to_string()
}

fn default_project_file() -> String {
    "project.json".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Page file path relative to the project root
    pub fn page_path(&self, page_id: &str) -> PathBuf {
        PathBuf::from(&self.pages_dir).join(format!("{}.json", page_id))
    }

    pub fn patterns_path(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.patterns_file)
    }

    pub fn project_path(&self) -> PathBuf {
        PathBuf::from(&self.project_file)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pages_dir: default_pages_dir(),
            patterns_file: default_patterns_file(),
            project_file: default_project_file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "pagesDir": "site/pages",
            "patternsFile": "library.json"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.pages_dir, "site/pages");
        assert_eq!(config.patterns_file, "library.json");
        assert_eq!(config.project_file, "project.json");
        assert_eq!(config.page_path("home"), PathBuf::from("site/pages/home.json"));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.pages_dir, "pages");
        assert_eq!(config.patterns_file, "patterns.json");
        assert_eq!(config.project_path(), PathBuf::from("project.json"));
    }

    #[test]
    fn test_missing_config_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());
    }
}
