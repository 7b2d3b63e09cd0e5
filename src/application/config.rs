use crate::application::{Appearance, PickerOptions};
use crate::domain::AllowedDates;
use crate::entities::{ActivePicker, Granularity, PickerError};
use anyhow::Context;
use chrono::Weekday;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Picker settings read from a JSON file. Every field is optional; command
/// line flags are applied on top.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Config {
    #[serde(rename = "type")]
    pub granularity: String,
    pub value: Option<String>,
    /// `None` leaves every date selectable; an empty list allows nothing.
    pub allowed_dates: Option<Vec<String>>,
    pub min: Option<String>,
    pub max: Option<String>,
    pub scrollable: bool,
    pub autosave: bool,
    pub active_picker: Option<String>,
    pub picker_date: Option<String>,
    pub show_current: bool,
    /// 0 is Sunday.
    pub first_day_of_week: u32,
    pub theme: String,
    pub color: Option<String>,
    pub header_color: Option<String>,
    pub prepend_icon: Option<String>,
    pub append_icon: Option<String>,
    /// File every emitted event is appended to.
    pub event_log: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            granularity: Granularity::Date.as_str().to_string(),
            value: None,
            allowed_dates: None,
            min: None,
            max: None,
            scrollable: false,
            autosave: false,
            active_picker: None,
            picker_date: None,
            show_current: true,
            first_day_of_week: 0,
            theme: "dark".to_string(),
            color: None,
            header_color: None,
            prepend_icon: None,
            append_icon: None,
            event_log: None,
        }
    }
}

impl Config {
    /// Loads `$DATEPICK_CONFIG`, falling back to
    /// `<config dir>/datepick/config.json`. A missing file yields defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let path = std::env::var("DATEPICK_CONFIG")
            .map(PathBuf::from)
            .ok()
            .or_else(Self::default_path);

        match path {
            Some(path) if path.exists() => Self::from_file(&path),
            Some(path) => {
                log::debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("datepick").join("config.json"))
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn picker_options(&self) -> Result<PickerOptions, PickerError> {
        let granularity: Granularity = self.granularity.parse()?;
        let active_picker = self
            .active_picker
            .as_deref()
            .map(str::parse::<ActivePicker>)
            .transpose()?;
        let first_day_of_week = WEEKDAYS
            .get(self.first_day_of_week as usize)
            .copied()
            .ok_or(PickerError::InvalidFirstDayOfWeek(self.first_day_of_week))?;

        let mut appearance = Appearance {
            color: self.color.clone(),
            header_color: self.header_color.clone(),
            ..Appearance::default()
        };
        if let Some(icon) = &self.prepend_icon {
            appearance.prepend_icon = icon.clone();
        }
        if let Some(icon) = &self.append_icon {
            appearance.append_icon = icon.clone();
        }

        let allowed_dates = match &self.allowed_dates {
            Some(entries) => AllowedDates::only(entries.iter().cloned()),
            None => AllowedDates::Unrestricted,
        };

        Ok(PickerOptions {
            granularity,
            value: self.value.clone(),
            allowed_dates,
            min: self.min.clone(),
            max: self.max.clone(),
            scrollable: self.scrollable,
            autosave: self.autosave,
            active_picker,
            picker_date: self.picker_date.clone(),
            show_current: self.show_current,
            first_day_of_week,
            appearance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.json");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let options = Config::default().picker_options().unwrap();
        assert_eq!(options.granularity, Granularity::Date);
        assert!(options.show_current);
        assert_eq!(options.first_day_of_week, Weekday::Sun);
        assert!(matches!(options.allowed_dates, AllowedDates::Unrestricted));
        assert_eq!(options.appearance.prepend_icon, "chevron_left");
    }

    #[test]
    fn test_from_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{
                "type": "month",
                "value": "2013-05",
                "allowed_dates": ["2013-01", "2013-03"],
                "autosave": true,
                "active_picker": "year",
                "first_day_of_week": 1,
                "append_icon": "arrow_right"
            }"#,
        );

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.theme, "dark");

        let options = config.picker_options().unwrap();
        assert_eq!(options.granularity, Granularity::Month);
        assert_eq!(options.value.as_deref(), Some("2013-05"));
        assert!(options.autosave);
        assert_eq!(options.active_picker, Some(ActivePicker::Year));
        assert_eq!(options.first_day_of_week, Weekday::Mon);
        assert_eq!(options.appearance.append_icon, "arrow_right");
        assert!(matches!(options.allowed_dates, AllowedDates::Only(ref e) if e.len() == 2));
    }

    #[test]
    fn test_invalid_json_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "{ not json");

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("config.json"));
    }

    #[test]
    fn test_missing_file_is_an_error_when_named() {
        let dir = TempDir::new().unwrap();
        assert!(Config::from_file(&dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn test_invalid_settings() {
        let config = Config {
            granularity: "week".to_string(),
            ..Config::default()
        };
        assert_eq!(
            config.picker_options().unwrap_err(),
            PickerError::InvalidGranularity("week".to_string())
        );

        let config = Config {
            active_picker: Some("DECADE".to_string()),
            ..Config::default()
        };
        assert!(matches!(
            config.picker_options(),
            Err(PickerError::InvalidActivePicker(_))
        ));

        let config = Config {
            first_day_of_week: 7,
            ..Config::default()
        };
        assert!(matches!(
            config.picker_options(),
            Err(PickerError::InvalidFirstDayOfWeek(7))
        ));
    }
}
