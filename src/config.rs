use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Render context settings, loadable from JSON
///
/// Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    pub width: u32,
    pub height: u32,
    /// Bytes per pixel: 3 (RGB) or 4 (RGB + pad)
    pub components: usize,
    /// Reallocate buffers on resize requests
    pub allow_resizing: bool,
    /// Present blue first regardless of what the device reports
    pub bgr: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            components: 3,
            allow_resizing: true,
            bgr: false,
        }
    }
}

impl ContextConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Invalid context config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_json_str(&json).with_context(|| format!("Failed to load config: {:?}", path))
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.width > 0 && self.height > 0,
            "dimensions must be non-zero, got {}x{}",
            self.width,
            self.height
        );
        ensure!(
            matches!(self.components, 3 | 4),
            "components must be 3 or 4, got {}",
            self.components
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = ContextConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ContextConfig::default());
    }

    #[test]
    fn partial_override() {
        let config = ContextConfig::from_json_str(r#"{"width": 320, "components": 4}"#).unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 480);
        assert_eq!(config.components, 4);
        assert!(config.allow_resizing);
    }

    #[test]
    fn rejects_bad_components() {
        assert!(ContextConfig::from_json_str(r#"{"components": 2}"#).is_err());
    }

    #[test]
    fn rejects_zero_size() {
        assert!(ContextConfig::from_json_str(r#"{"height": 0}"#).is_err());
    }

    #[test]
    fn reads_from_file() {
        let path = std::env::temp_dir().join("fbg_config_reads_from_file.json");
        std::fs::write(&path, r#"{"width": 100, "height": 50, "bgr": true}"#).unwrap();
        let config = ContextConfig::from_path(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!((config.width, config.height), (100, 50));
        assert!(config.bgr);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(ContextConfig::from_path("/nonexistent/fbg.json").is_err());
    }
}
