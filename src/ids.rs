///! Identifier aliases and sentinel values for the contraction-side graph

/// Node identifier in the node-based graph.
pub type NodeId = u32;

/// Edge identifier in the edge-based graph.
pub type EdgeId = u32;

/// Edge weight in profile units (deci-seconds for the default car profile).
pub type EdgeWeight = u32;

/// Sentinel for "no node" / uninitialized node slots.
pub const INVALID_NODE_ID: NodeId = u32::MAX;

/// Sentinel for "no edge" / uninitialized edge slots.
pub const INVALID_EDGE_ID: EdgeId = u32::MAX;

/// Sentinel for unreachable / unbounded weight.
pub const INVALID_EDGE_WEIGHT: EdgeWeight = u32::MAX;
