pub mod extrude;
pub mod framing;
pub mod labels;

pub use extrude::*;
pub use framing::*;
pub use labels::*;
