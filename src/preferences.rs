//! Persisted user preferences. Only the color theme is stored.

use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const THEME_KEY: &str = "roleready-theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A small JSON key/value file. Keys other than the theme are preserved on
/// write.
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored theme. A missing file, unreadable file or unknown value all
    /// read as [`Theme::Light`].
    pub fn theme(&self) -> Theme {
        let stored = self
            .read_entries()
            .get(THEME_KEY)
            .and_then(Value::as_str)
            .map(str::to_string);

        match stored {
            Some(raw) => Theme::parse(&raw).unwrap_or_else(|| {
                warn!("Ignoring unknown stored theme '{}'", raw);
                Theme::default()
            }),
            None => Theme::default(),
        }
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        let mut entries = self.read_entries();
        entries.insert(THEME_KEY.to_string(), Value::String(theme.as_str().to_string()));

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        debug!("Saved theme '{}' to {}", theme, self.path.display());
        Ok(())
    }

    /// Flip the stored theme and return the new value.
    pub fn toggle_theme(&self) -> Result<Theme> {
        let theme = self.theme().toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }

    fn read_entries(&self) -> Map<String, Value> {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return Map::new();
        };
        match serde_json::from_str::<Map<String, Value>>(&content) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    "Preference file {} is not a JSON object: {}",
                    self.path.display(),
                    e
                );
                Map::new()
            }
        }
    }
}
