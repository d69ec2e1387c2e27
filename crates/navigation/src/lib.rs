pub mod config;
pub mod error;
pub mod history;
pub mod level;
pub mod lifecycle;
pub mod navigator;
pub mod source;

pub use config::*;
pub use error::*;
pub use history::*;
pub use level::*;
pub use lifecycle::*;
pub use navigator::*;
pub use source::*;
