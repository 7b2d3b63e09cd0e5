pub mod event_logger;

pub use event_logger::*;
