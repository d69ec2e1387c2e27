pub mod frame;
pub mod hooks;
pub mod listeners;

pub use frame::*;
pub use hooks::*;
pub use listeners::*;
