///! geometry.bin format - CSR-indexed compressed edge geometry
///!
///! Layout, all u32 little-endian, no header or checksum footer (the route
///! reconstruction stage consumes this layout as-is):
///!
///! ```text
///! offset_count                    = bucket_count + 1
///! offsets[offset_count]           prefix sums of bucket lengths; the last
///!                                 entry is the sentinel = total node count
///! total_node_count                sentinel declared again standalone
///! node_ids[total_node_count]      node ids per bucket, in slot-index order
///! ```
///!
///! Only node ids survive serialization; per-segment weights stay in memory.
///! Bucket `i` decodes to the range `[offsets[i], offsets[i + 1])`.

use anyhow::Result;
use log::debug;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::store::GeometryStore;

/// Decoded geometry stream: CSR offsets plus the flat node-id array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedGeometry {
    pub offsets: Vec<u32>,
    pub node_ids: Vec<u32>,
}

impl CompressedGeometry {
    pub fn bucket_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Node ids of bucket `index`.
    pub fn bucket(&self, index: usize) -> &[u32] {
        let start = self.offsets[index] as usize;
        let end = self.offsets[index + 1] as usize;
        &self.node_ids[start..end]
    }
}

pub struct CompressedGeometryFile;

impl CompressedGeometryFile {
    /// Write the store's live buckets as a geometry stream.
    ///
    /// Read-only with respect to the store; writing twice without state
    /// changes in between yields byte-identical output. I/O failures are
    /// returned to the caller, internal count mismatches abort.
    pub fn write<P: AsRef<Path>>(path: P, store: &GeometryStore) -> Result<()> {
        let buckets = store.live_buckets();
        let offset_count = buckets.len() as u32 + 1;

        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(&offset_count.to_le_bytes())?;
        debug!("number of geometry offsets: {}", offset_count);

        // CSR index: running totals, then the sentinel.
        let mut prefix_sum = 0u32;
        for bucket in &buckets {
            writer.write_all(&prefix_sum.to_le_bytes())?;
            prefix_sum += bucket.len() as u32;
        }
        writer.write_all(&prefix_sum.to_le_bytes())?;

        // Total node count, declared again as a standalone field.
        writer.write_all(&prefix_sum.to_le_bytes())?;
        debug!("number of geometry nodes: {}", prefix_sum);

        let mut control_sum = 0u32;
        for bucket in &buckets {
            control_sum += bucket.len() as u32;
            for compressed_node in *bucket {
                writer.write_all(&compressed_node.node_id.to_le_bytes())?;
            }
        }
        assert_eq!(
            control_sum, prefix_sum,
            "bucket node counts diverged from the declared total"
        );

        writer.flush()?;
        Ok(())
    }

    /// Read a geometry stream back into offsets and node ids.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<CompressedGeometry> {
        let mut reader = BufReader::new(File::open(path)?);

        let offset_count = read_u32(&mut reader)?;
        if offset_count == 0 {
            anyhow::bail!("geometry stream declares zero offsets");
        }

        let mut offsets = Vec::with_capacity(offset_count as usize);
        for _ in 0..offset_count {
            offsets.push(read_u32(&mut reader)?);
        }
        for window in offsets.windows(2) {
            if window[0] > window[1] {
                anyhow::bail!("geometry offsets not monotonically non-decreasing");
            }
        }

        let sentinel = offsets[offset_count as usize - 1];
        let total_node_count = read_u32(&mut reader)?;
        if total_node_count != sentinel {
            anyhow::bail!(
                "declared node count {} does not match offset sentinel {}",
                total_node_count,
                sentinel
            );
        }

        let mut node_ids = Vec::with_capacity(total_node_count as usize);
        for _ in 0..total_node_count {
            node_ids.push(read_u32(&mut reader)?);
        }

        Ok(CompressedGeometry { offsets, node_ids })
    }
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_store_stream() {
        let store = GeometryStore::new();
        let tmpfile = NamedTempFile::new().unwrap();
        CompressedGeometryFile::write(tmpfile.path(), &store).unwrap();

        let decoded = CompressedGeometryFile::read(tmpfile.path()).unwrap();
        assert_eq!(decoded.offsets, vec![0]);
        assert!(decoded.node_ids.is_empty());
        assert_eq!(decoded.bucket_count(), 0);
    }

    #[test]
    fn test_single_bucket_stream() {
        let mut store = GeometryStore::new();
        store.compress_edge(10, 20, 5, 6, 3, 4);
        store.compress_edge(30, 10, 7, 8, 1, 2);

        let tmpfile = NamedTempFile::new().unwrap();
        CompressedGeometryFile::write(tmpfile.path(), &store).unwrap();

        let decoded = CompressedGeometryFile::read(tmpfile.path()).unwrap();
        assert_eq!(decoded.offsets, vec![0, 3]);
        assert_eq!(decoded.node_ids, vec![7, 5, 6]);
        assert_eq!(decoded.bucket(0), &[7, 5, 6]);
    }

    #[test]
    fn test_write_is_idempotent() {
        let mut store = GeometryStore::new();
        store.compress_edge(1, 2, 100, 101, 10, 11);
        store.compress_edge(3, 4, 200, 201, 20, 21);

        let first = NamedTempFile::new().unwrap();
        let second = NamedTempFile::new().unwrap();
        CompressedGeometryFile::write(first.path(), &store).unwrap();
        CompressedGeometryFile::write(second.path(), &store).unwrap();

        let bytes_1 = std::fs::read(first.path()).unwrap();
        let bytes_2 = std::fs::read(second.path()).unwrap();
        assert_eq!(bytes_1, bytes_2);
    }

    #[test]
    fn test_buckets_in_slot_order() {
        let mut store = GeometryStore::new();
        // Three edges in insertion order; slots are handed out low-first, so
        // the stream order follows the compression order here.
        store.compress_edge(50, 51, 1, 2, 1, 1);
        store.compress_edge(60, 61, 3, 4, 1, 1);
        store.compress_edge(70, 71, 5, 6, 1, 1);

        let tmpfile = NamedTempFile::new().unwrap();
        CompressedGeometryFile::write(tmpfile.path(), &store).unwrap();

        let decoded = CompressedGeometryFile::read(tmpfile.path()).unwrap();
        assert_eq!(decoded.offsets, vec![0, 2, 4, 6]);
        assert_eq!(decoded.bucket(0), &[1, 2]);
        assert_eq!(decoded.bucket(1), &[3, 4]);
        assert_eq!(decoded.bucket(2), &[5, 6]);
    }

    #[test]
    fn test_truncated_stream_is_an_error() {
        let mut store = GeometryStore::new();
        store.compress_edge(10, 20, 5, 6, 3, 4);

        let tmpfile = NamedTempFile::new().unwrap();
        CompressedGeometryFile::write(tmpfile.path(), &store).unwrap();

        let mut bytes = std::fs::read(tmpfile.path()).unwrap();
        bytes.truncate(bytes.len() - 4);
        std::fs::write(tmpfile.path(), &bytes).unwrap();

        assert!(CompressedGeometryFile::read(tmpfile.path()).is_err());
    }

    #[test]
    fn test_unwritable_destination_is_an_error() {
        let store = GeometryStore::new();
        let result = CompressedGeometryFile::write("/nonexistent-dir/geometry.bin", &store);
        assert!(result.is_err());
    }
}
