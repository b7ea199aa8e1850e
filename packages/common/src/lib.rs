pub mod element_path;
pub mod geometry;
pub mod property_path;

pub use element_path::*;
pub use geometry::*;
pub use property_path::*;
