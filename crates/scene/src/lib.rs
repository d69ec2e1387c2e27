pub mod camera;
pub mod components;
pub mod graph;
pub mod highlight;
pub mod labels;
pub mod picking;

pub use graph::*;
