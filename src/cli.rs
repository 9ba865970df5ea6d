// cli.rs - Command-line interface configuration
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::ContextConfig;

/// Demo scene to run
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    /// Bouncing filled boxes
    Boxes,
    /// Bouncing points joined by lines
    Web,
    /// Bouncing words in the built-in font at growing scales
    Ascii,
    /// Atlas font text over a translucent background
    AtlasText,
    /// Falling horizontal lines
    Rain,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "fbg-demo")]
#[command(about = "Software framebuffer graphics demos", long_about = None)]
pub struct Cli {
    /// Scene to run
    #[arg(value_enum)]
    pub scene: SceneKind,

    /// JSON context config; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    /// Bytes per pixel (3 or 4)
    #[arg(long)]
    pub components: Option<usize>,

    /// Framebuffer device
    #[arg(long, default_value = "/dev/fb0")]
    pub device: PathBuf,

    /// Render in memory instead of to a device
    #[arg(long, default_value = "false")]
    pub headless: bool,

    /// Alternate between two device pages and pan between them
    #[arg(long = "page-flip", default_value = "false")]
    pub page_flip: bool,

    /// Stop after this many frames instead of running until interrupted
    #[arg(long)]
    pub frames: Option<u64>,

    /// Word drawn by the ascii scene
    #[arg(long, default_value = "FBG")]
    pub word: String,
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied
    pub fn context_config(&self) -> Result<ContextConfig> {
        let mut config = match &self.config {
            Some(path) => ContextConfig::from_path(path)?,
            None => ContextConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(components) = self.components {
            config.components = components;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scene_and_overrides() {
        let cli = Cli::try_parse_from(["fbg-demo", "atlas-text", "--headless", "--width", "320", "--frames", "10"]).unwrap();
        assert_eq!(cli.scene, SceneKind::AtlasText);
        assert!(cli.headless);
        assert_eq!(cli.frames, Some(10));

        let config = cli.context_config().unwrap();
        assert_eq!((config.width, config.height), (320, 480));
    }

    #[test]
    fn rejects_unknown_scene() {
        assert!(Cli::try_parse_from(["fbg-demo", "teapot"]).is_err());
    }

    #[test]
    fn invalid_override_fails_validation() {
        let cli = Cli::try_parse_from(["fbg-demo", "web", "--components", "5"]).unwrap();
        assert!(cli.context_config().is_err());
    }
}
