//! Persisted UI preferences
//!
//! Theme and display preferences survive across sessions as a small
//! JSON file keyed by a namespace. Row data and the column schema are
//! deliberately not persisted; every fresh load starts from the demo
//! dataset.

use crate::error::{Error, Result};
use crate::state::DEFAULT_PAGE_SIZE;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Color theme for the display layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

/// Persisted preference state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    pub theme: Theme,
    pub page_size: usize,
    /// When the file was last written
    pub updated: DateTime<Utc>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            page_size: DEFAULT_PAGE_SIZE,
            updated: Utc::now(),
        }
    }
}

impl Preferences {
    /// File path for a namespace inside a store directory
    pub fn path_for(dir: &Path, namespace: &str) -> PathBuf {
        dir.join(format!("{namespace}.json"))
    }

    /// Load preferences, or defaults if the file does not exist yet
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save preferences, stamping the update time
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.updated = Utc::now();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::load(Preferences::path_for(dir.path(), "grid")).unwrap();
        assert_eq!(prefs.theme, Theme::Light);
        assert_eq!(prefs.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = Preferences::path_for(dir.path(), "grid");

        let mut prefs = Preferences::default();
        prefs.theme = prefs.theme.toggled();
        prefs.page_size = 25;
        prefs.save(&path).unwrap();

        let loaded = Preferences::load(&path).unwrap();
        assert_eq!(loaded.theme, Theme::Dark);
        assert_eq!(loaded.page_size, 25);
    }

    #[test]
    fn test_theme_toggle_round_trip() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }
}
