pub mod hooks;
pub mod plugins;
pub mod popup;
pub mod scheduler;

#[cfg(test)]
pub mod test_utils;

pub use hooks::*;
pub use plugins::*;
pub use popup::*;
pub use scheduler::*;
