pub mod app;
pub mod cli;
pub mod config;
pub mod formatters;
pub mod picker;
pub mod tui;

pub use app::*;
pub use cli::*;
pub use config::*;
pub use formatters::*;
pub use picker::*;
pub use tui::*;
