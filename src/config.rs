//! Document settings, persisted as JSON

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, warn};

/// ISO A4 in points.
pub const A4: (f32, f32) = (595.275_6, 841.889_8);
/// US Letter in points.
pub const LETTER: (f32, f32) = (612.0, 792.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub page_width: f32,
    pub page_height: f32,
    /// Flate-compress every stream when the document is written.
    pub compress: bool,
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            page_width: A4.0,
            page_height: A4.1,
            compress: true,
            title: None,
            author: None,
            subject: None,
            creator: Some(concat!("pdfcanvas ", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }
}

impl CanvasConfig {
    pub fn with_page_size(mut self, (width, height): (f32, f32)) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author<S: Into<String>>(mut self, author: S) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn page_size(&self) -> (f32, f32) {
        (self.page_width, self.page_height)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&data)?;
        debug!("Loaded canvas config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Like [`CanvasConfig::load`], but a missing or corrupt file gives the
    /// defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No canvas config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("Ignoring unreadable canvas config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        atomic_write(path.as_ref(), &data)?;
        Ok(())
    }
}

fn atomic_write(path: &Path, data: &str) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");

    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(data.as_bytes())?;
        file.sync_all()?;
    }

    fs::rename(&tmp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CanvasConfig::default();
        assert_eq!(config.page_size(), A4);
        assert!(config.compress);
        assert!(config.creator.as_deref().unwrap().starts_with("pdfcanvas"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canvas.json");
        let config = CanvasConfig::default()
            .with_page_size(LETTER)
            .with_title("Diagrams")
            .with_compression(false);

        config.save(&path).unwrap();
        assert!(!path.with_extension("tmp").exists());
        assert_eq!(CanvasConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canvas.json");
        fs::write(&path, r#"{ "page_width": 300.0, "author": "me" }"#).unwrap();

        let config = CanvasConfig::load(&path).unwrap();
        assert_eq!(config.page_width, 300.0);
        assert_eq!(config.page_height, A4.1);
        assert_eq!(config.author.as_deref(), Some("me"));
    }

    #[test]
    fn test_load_or_default_on_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canvas.json");
        fs::write(&path, "not json").unwrap();

        assert!(CanvasConfig::load(&path).is_err());
        assert_eq!(CanvasConfig::load_or_default(&path), CanvasConfig::default());
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = CanvasConfig::load_or_default(dir.path().join("absent.json"));
        assert_eq!(config, CanvasConfig::default());
    }
}
