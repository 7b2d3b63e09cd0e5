use crate::entities::PickerEvent;
use crate::infrastructure::PickerListener;
use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Plugin that logs every picker event, and optionally appends it to a file
pub struct EventLogger {
    log_path: Option<PathBuf>,
}

impl EventLogger {
    pub fn new() -> Self {
        Self { log_path: None }
    }

    pub fn with_file(log_path: PathBuf) -> Self {
        Self {
            log_path: Some(log_path),
        }
    }
}

impl Default for EventLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl PickerListener for EventLogger {
    fn on_event(&self, event: &PickerEvent) -> Result<()> {
        let (name, payload) = (event.name(), event.payload());
        log::info!("{} {}", name, payload);

        let Some(log_path) = &self.log_path else {
            return Ok(());
        };

        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        writeln!(
            file,
            "[{}] {} {}",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
            name,
            payload
        )?;

        Ok(())
    }

    fn name(&self) -> &str {
        "Event Logger"
    }
}
