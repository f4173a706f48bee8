//! Edge-geometry compression store for contraction-hierarchy preprocessing.
//!
//! When the contractor removes a node and merges its two incident edges into
//! a shortcut, the bypassed intermediate nodes and sub-segment weights are
//! recorded here per surviving edge id, then written out once as a CSR-style
//! binary stream for the route reconstruction stage.

pub mod formats;
pub mod ids;
pub mod segment;
pub mod slots;
pub mod store;

pub use formats::{CompressedGeometry, CompressedGeometryFile};
pub use ids::{
    EdgeId, EdgeWeight, NodeId, INVALID_EDGE_ID, INVALID_EDGE_WEIGHT, INVALID_NODE_ID,
};
pub use segment::SegmentInformation;
pub use slots::SlotArena;
pub use store::{CompressedNode, CompressionStatistics, GeometryStore};
