//! TOML configuration for asset locations, card style and share links.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CardError, Result};

pub type Color = [u8; 4];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub assets: AssetPaths,
    pub style: CardStyle,
    pub share: ShareConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub background: PathBuf,
    pub tiles_dir: PathBuf,
    /// Defaults to `<tiles_dir>/metadata.json`.
    pub metadata: Option<PathBuf>,
    /// No caption is drawn without a font.
    pub font: Option<PathBuf>,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            background: PathBuf::from("public/background_template.png"),
            tiles_dir: PathBuf::from("public/squares"),
            metadata: None,
            font: None,
        }
    }
}

impl AssetPaths {
    pub fn metadata_path(&self) -> PathBuf {
        self.metadata
            .clone()
            .unwrap_or_else(|| self.tiles_dir.join("metadata.json"))
    }

    /// Makes relative paths relative to `base`.
    pub fn resolve_against(&mut self, base: &Path) {
        let fix = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        fix(&mut self.background);
        fix(&mut self.tiles_dir);
        if let Some(p) = self.metadata.as_mut() {
            fix(p);
        }
        if let Some(p) = self.font.as_mut() {
            fix(p);
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CardStyle {
    pub highlight_color: Color,
    pub win_color: Color,
    pub border_color: Color,
    pub border_width: f32,
    pub text_color: Color,
    pub text_size: f32,
    /// `{name}` and `{title}` are substituted.
    pub caption: String,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            highlight_color: [255, 214, 0, 110],
            win_color: [0, 200, 83, 150],
            border_color: [0, 0, 0, 220],
            border_width: 4.0,
            text_color: [25, 25, 25, 255],
            text_size: 48.0,
            caption: "{name} - {title}".to_string(),
        }
    }
}

impl CardStyle {
    pub fn caption_for(&self, name: &str, title: &str) -> String {
        self.caption.replace("{name}", name).replace("{title}", title)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    pub base_url: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: "https://bingo.example/".to_string(),
        }
    }
}

impl CardConfig {
    pub fn from_toml(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Reads a config file; relative asset paths resolve against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| CardError::io(path, e))?;
        let mut config = Self::from_toml(&text).map_err(|source| CardError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(dir) = path.parent() {
            config.assets.resolve_against(dir);
        }
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
