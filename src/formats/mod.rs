///! Binary file formats for the geometry preprocessing output

pub mod geometry;

pub use geometry::{CompressedGeometry, CompressedGeometryFile};
