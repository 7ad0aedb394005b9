// Library exports for splom

pub mod csv_reader;
pub mod data;
pub mod graph;
pub mod palette;
pub mod parser;

// Layout and selection engine
pub mod brush;
pub mod catalog;
pub mod compiler;
pub mod drill;
pub mod engine;
pub mod ir;
pub mod layout;
pub mod scale;
pub mod view;

pub use engine::{rebuild, ScatterMatrix};
pub use view::ViewState;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RenderOptions {
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
}

/// Settings file: an optional starting view plus render options
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub view: Option<ViewState>,
    pub render: RenderOptions,
}

impl Config {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let mut config: Config = serde_json::from_str(text).context("Invalid config JSON")?;
        config.view = config.view.map(ViewState::sanitized);
        Ok(config)
    }
}
