///! Edge geometry store - records which node chains a shortcut edge stands for
///!
///! During contraction, removing a node merges two adjacent edges into one
///! shortcut identified by the surviving edge id. The store keeps, per
///! surviving edge, the ordered chain of bypassed nodes and sub-segment
///! weights so route geometry can be unpacked after the query phase. An edge
///! with no entry here is atomic: it still represents exactly one original
///! graph edge.

use log::{info, warn};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::ids::{EdgeId, EdgeWeight, NodeId, INVALID_EDGE_ID, INVALID_EDGE_WEIGHT, INVALID_NODE_ID};
use crate::slots::SlotArena;

/// One bypassed node and the weight of the sub-segment ending at it.
///
/// Never mutated in place once written; chains only grow by append or splice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressedNode {
    pub node_id: NodeId,
    pub weight: EdgeWeight,
}

type Bucket = Vec<CompressedNode>;

/// Snapshot of chain-length statistics, see [`GeometryStore::report_statistics`].
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CompressionStatistics {
    pub live_buckets: usize,
    pub total_nodes: usize,
    pub longest_chain: usize,
    pub compression_ratio: f32,
    pub avg_chain_length: f32,
}

/// Compressed edge geometry, keyed by surviving edge id.
///
/// Buckets live in a slot arena; each live slot is referenced by exactly one
/// edge id through the edge index, and slots of absorbed edges are cleared
/// and recycled. Single-threaded by design: callers parallelizing the
/// contraction around it must serialize all calls through one writer.
#[derive(Debug, Default)]
pub struct GeometryStore {
    buckets: SlotArena<Bucket>,
    edge_index: FxHashMap<EdgeId, usize>,
}

impl GeometryStore {
    pub fn new() -> Self {
        GeometryStore {
            buckets: SlotArena::new(),
            edge_index: FxHashMap::default(),
        }
    }

    /// Whether `edge_id` has been compressed at least once.
    pub fn has_entry(&self, edge_id: EdgeId) -> bool {
        self.edge_index.contains_key(&edge_id)
    }

    /// Slot index for a compressed edge.
    ///
    /// The entry must exist; looking up an atomic edge is a programming
    /// error, not a recoverable condition.
    pub fn slot_of(&self, edge_id: EdgeId) -> usize {
        let slot = *self
            .edge_index
            .get(&edge_id)
            .expect("slot_of called for an edge with no geometry entry");
        assert!(slot < self.buckets.capacity());
        slot
    }

    /// Record the contraction of `via_node`, which previously connected the
    /// end of `edge_id_1` to the start of `edge_id_2`. The merged shortcut
    /// keeps the identity of `edge_id_1`.
    ///
    /// The chain for `edge_id_1` grows as
    /// `<surv_1, .., surv_n, via_node, rem_1, .., rem_n>`: the via node is
    /// appended first (seeding the bucket on first compression), then either
    /// `edge_id_2`'s whole chain is spliced on and its entry dropped, or, if
    /// `edge_id_2` is atomic, `target_node` is appended directly.
    pub fn compress_edge(
        &mut self,
        edge_id_1: EdgeId,
        edge_id_2: EdgeId,
        via_node: NodeId,
        target_node: NodeId,
        weight_1: EdgeWeight,
        weight_2: EdgeWeight,
    ) {
        // TODO: recognize super-trivial geometries and skip storing them
        assert_ne!(edge_id_1, INVALID_EDGE_ID);
        assert_ne!(edge_id_2, INVALID_EDGE_ID);
        assert_ne!(via_node, INVALID_NODE_ID);
        assert_ne!(target_node, INVALID_NODE_ID);
        assert_ne!(weight_1, INVALID_EDGE_WEIGHT);
        assert_ne!(weight_2, INVALID_EDGE_WEIGHT);

        if !self.has_entry(edge_id_1) {
            let slot = self.buckets.acquire();
            self.edge_index.insert(edge_id_1, slot);
        }

        let slot_1 = self.slot_of(edge_id_1);

        if self.buckets.get(slot_1).is_empty() {
            // First compression of this edge: seed the chain with the via
            // node and the cost of the first sub-segment.
            self.buckets.get_mut(slot_1).push(CompressedNode {
                node_id: via_node,
                weight: weight_1,
            });
        }
        debug_assert!(!self.buckets.get(slot_1).is_empty());

        if self.has_entry(edge_id_2) {
            // Second edge is itself a chain: splice its whole bucket onto
            // ours, then unregister it and recycle its slot.
            let slot_2 = self.slot_of(edge_id_2);
            let absorbed = std::mem::take(self.buckets.get_mut(slot_2));
            self.buckets.get_mut(slot_1).extend(absorbed);

            self.edge_index.remove(&edge_id_2);
            debug_assert!(!self.has_entry(edge_id_2));
            debug_assert!(self.buckets.get(slot_2).is_empty());
            self.buckets.release(slot_2);
        } else {
            // Second edge is atomic: its far endpoint closes the chain.
            self.buckets.get_mut(slot_1).push(CompressedNode {
                node_id: target_node,
                weight: weight_2,
            });
        }
    }

    /// Node chain for a compressed edge.
    ///
    /// Hard precondition that the edge has an entry; check [`has_entry`]
    /// first if the edge may still be atomic.
    ///
    /// [`has_entry`]: GeometryStore::has_entry
    pub fn bucket_of(&self, edge_id: EdgeId) -> &[CompressedNode] {
        let slot = *self
            .edge_index
            .get(&edge_id)
            .expect("bucket_of called for an edge with no geometry entry");
        self.buckets.get(slot)
    }

    /// Live buckets in ascending slot-index order, for serialization.
    pub fn live_buckets(&self) -> Vec<&[CompressedNode]> {
        let mut slots: Vec<usize> = self.edge_index.values().copied().collect();
        slots.sort_unstable();
        slots
            .into_iter()
            .map(|slot| self.buckets.get(slot).as_slice())
            .collect()
    }

    /// Number of edges that currently own a chain.
    pub fn live_bucket_count(&self) -> usize {
        self.edge_index.len()
    }

    /// Total nodes stored across all live chains.
    pub fn total_node_count(&self) -> usize {
        self.edge_index
            .values()
            .map(|&slot| self.buckets.get(slot).len())
            .sum()
    }

    /// Compute and log chain-length statistics. Read-only.
    pub fn report_statistics(&self) -> CompressionStatistics {
        let live_buckets = self.live_bucket_count();
        let mut total_nodes = 0;
        let mut longest_chain = 0;
        for &slot in self.edge_index.values() {
            let len = self.buckets.get(slot).len();
            total_nodes += len;
            longest_chain = longest_chain.max(len);
        }

        // Edges arrive as forward/backward directed pairs upstream, so the
        // live count should be even. That pairing is not enforced here;
        // advisory only.
        if live_buckets % 2 != 0 {
            warn!(
                "odd number of live geometry buckets ({}), expected directed pairs",
                live_buckets
            );
        }

        let stats = CompressionStatistics {
            live_buckets,
            total_nodes,
            longest_chain,
            compression_ratio: live_buckets as f32 / total_nodes.max(1) as f32,
            avg_chain_length: total_nodes as f32 / live_buckets.max(1) as f32,
        };
        info!(
            "compressed edges: {}, compressed geometries: {}, longest chain length: {}, cmpr ratio: {}, avg chain length: {}",
            stats.live_buckets,
            stats.total_nodes,
            stats.longest_chain,
            stats.compression_ratio,
            stats.avg_chain_length
        );
        stats
    }
}
