//! Configuration management for pagewise

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::book::headings::HeadingDialect;
use crate::book::markdown::ParseOptions;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Heading convention of study documents
    pub dialect: HeadingDialect,

    /// Whether documents group sections under chapters
    pub has_chapters: bool,

    /// Number of `#` before a chapter heading
    pub chapter_heading_depth: usize,

    /// Number of `#` before a section heading
    pub section_heading_depth: usize,

    /// Reading speed used to estimate `time req`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes_per_page: Option<f64>,

    /// Fixed pages per day for the planner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_quota: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        let options = ParseOptions::default();
        Self {
            dialect: HeadingDialect::default(),
            has_chapters: options.has_chapters,
            chapter_heading_depth: options.chapter_heading_depth,
            section_heading_depth: options.section_heading_depth,
            minutes_per_page: None,
            daily_quota: None,
        }
    }
}

impl Config {
    /// Load configuration from disk, or defaults if there is no config file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() { Self::load_from(&config_path) } else { Ok(Self::default()) }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config {:?}", path))
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", "pagewise").context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Heading layout for the parser
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            has_chapters: self.has_chapters,
            chapter_heading_depth: self.chapter_heading_depth,
            section_heading_depth: self.section_heading_depth,
        }
    }
}
