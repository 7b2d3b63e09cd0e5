pub mod picker_view;
pub mod session;
pub mod theme;

pub use picker_view::*;
pub use session::*;
pub use theme::*;
