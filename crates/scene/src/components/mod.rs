pub mod geometry;
pub mod material;
pub mod tag;

pub use geometry::*;
pub use material::*;
pub use tag::*;
