use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::utils::constants::DEFAULT_CLOCK_FORMAT;
use crate::utils::datetime::format_clock;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("invalid clock position `{0}` (expected top-right, top-left, bottom-right or bottom-left)")]
    InvalidPosition(String),
}

/// Screen corner the clock widget is pinned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayPosition {
    #[default]
    TopRight,
    TopLeft,
    BottomRight,
    BottomLeft,
}

impl DisplayPosition {
    pub const ALL: [DisplayPosition; 4] = [
        DisplayPosition::TopRight,
        DisplayPosition::TopLeft,
        DisplayPosition::BottomRight,
        DisplayPosition::BottomLeft,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayPosition::TopRight => "top-right",
            DisplayPosition::TopLeft => "top-left",
            DisplayPosition::BottomRight => "bottom-right",
            DisplayPosition::BottomLeft => "bottom-left",
        }
    }
}

impl fmt::Display for DisplayPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayPosition {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DisplayPosition::ALL
            .into_iter()
            .find(|position| position.as_str() == s)
            .ok_or_else(|| SettingsError::InvalidPosition(s.to_string()))
    }
}

/// Clock widget settings, persisted under `datetime-settings`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub show: bool,
    pub position: DisplayPosition,
    pub format: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show: true,
            position: DisplayPosition::TopRight,
            format: DEFAULT_CLOCK_FORMAT.to_string(),
        }
    }
}

impl DisplaySettings {
    /// Clock text for `now`, or `None` while the widget is hidden
    pub fn render_clock<T>(&self, now: &T) -> Option<String>
    where
        T: Datelike + Timelike,
    {
        self.show.then(|| format_clock(&self.format, now))
    }
}

/// Partial settings. Present fields overwrite, absent ones are kept.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplaySettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<DisplayPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl DisplaySettingsPatch {
    pub fn show(mut self, show: bool) -> Self {
        self.show = Some(show);
        self
    }

    pub fn position(mut self, position: DisplayPosition) -> Self {
        self.position = Some(position);
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn apply(self, settings: &mut DisplaySettings) {
        if let Some(show) = self.show {
            settings.show = show;
        }
        if let Some(position) = self.position {
            settings.position = position;
        }
        if let Some(format) = self.format {
            settings.format = format;
        }
    }

    /// Build a patch from a stored JSON object field by field. Keys with the
    /// wrong type or an unknown position are skipped and returned so the
    /// caller can report them. Unrelated keys are ignored.
    pub fn from_stored(stored: &Map<String, Value>) -> (Self, Vec<String>) {
        let mut patch = Self::default();
        let mut rejected = Vec::new();

        if let Some(value) = stored.get("show") {
            match value.as_bool() {
                Some(show) => patch.show = Some(show),
                None => rejected.push("show".to_string()),
            }
        }
        if let Some(value) = stored.get("position") {
            match value.as_str().map(DisplayPosition::from_str) {
                Some(Ok(position)) => patch.position = Some(position),
                _ => rejected.push("position".to_string()),
            }
        }
        if let Some(value) = stored.get("format") {
            match value.as_str() {
                Some(format) => patch.format = Some(format.to_string()),
                None => rejected.push("format".to_string()),
            }
        }

        (patch, rejected)
    }
}
