use crate::application::{Config, DatePicker, PickerOptions, PickerView, SessionOutcome, Theme};
use crate::domain::DateToken;
use crate::entities::Granularity;
use crate::infrastructure::EventLogger;
use anyhow::Context;

pub struct PickerApp {
    config: Config,
    plugins: bool,
}

impl PickerApp {
    pub fn new(config: Config) -> Self {
        Self::with_default_plugins(config)
    }

    /// Pickers built by this app log every event, and append them to the
    /// configured event log.
    pub fn with_default_plugins(config: Config) -> Self {
        Self {
            config,
            plugins: true,
        }
    }

    pub fn without_plugins(config: Config) -> Self {
        Self {
            config,
            plugins: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn picker_options(&self) -> anyhow::Result<PickerOptions> {
        self.config
            .picker_options()
            .context("invalid picker configuration")
    }

    pub fn build_picker(&self, options: PickerOptions) -> DatePicker {
        let mut picker = DatePicker::new(options);
        if self.plugins {
            let logger = match &self.config.event_log {
                Some(path) => EventLogger::with_file(path.clone()),
                None => EventLogger::new(),
            };
            picker.listen(logger);
        }
        picker
    }

    pub fn theme(&self) -> Theme {
        Theme::by_name(&self.config.theme)
            .with_overrides(self.config.color.as_deref(), self.config.header_color.as_deref())
    }

    /// Opens the terminal picker. Returns the chosen value, or `None` when
    /// the user cancelled.
    pub fn run_tui(&self) -> anyhow::Result<Option<String>> {
        let picker = self.build_picker(self.picker_options()?);
        let mut view =
            PickerView::new(picker, self.theme()).context("failed to start terminal picker")?;

        match view.run()? {
            SessionOutcome::Selected(value) => Ok(Some(value)),
            SessionOutcome::Cancelled => Ok(None),
        }
    }

    /// Canonical form of `raw` at `granularity`.
    pub fn parse(raw: &str, granularity: Granularity) -> anyhow::Result<String> {
        DateToken::parse_exact(raw, granularity)
            .map(|token| token.to_string())
            .with_context(|| format!("'{}' is not a valid {} value", raw, granularity))
    }

    /// The value a picker with the configured options opens on.
    pub fn first_allowed(&self) -> anyhow::Result<String> {
        Ok(DatePicker::new(self.picker_options()?).input_date())
    }
}
