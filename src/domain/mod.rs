pub mod allowed;
pub mod navigator;
pub mod table;
pub mod token;
pub mod view;

pub use allowed::*;
pub use navigator::*;
pub use table::*;
pub use token::*;
pub use view::*;
