use crate::DEFAULT_CHUNK_SIZE;

/// A contiguous byte range of the payload sent as one protocol unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// Absolute byte offset within the payload.
    pub offset: u64,
    /// Exact number of bytes in this chunk.
    pub len: u64,
}

impl Chunk {
    /// Offset one past the last byte of this chunk.
    pub fn end(&self) -> u64 {
        self.offset + self.len
    }
}

/// Ordered chunks covering `[0, total)` with no gaps or overlaps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkPlan {
    chunks: Vec<Chunk>,
    total: u64,
}

impl ChunkPlan {
    /// Chunks in ascending offset order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Total bytes covered by the plan.
    pub fn total_bytes(&self) -> u64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chunk> {
        self.chunks.iter()
    }
}

impl<'a> IntoIterator for &'a ChunkPlan {
    type Item = &'a Chunk;
    type IntoIter = std::slice::Iter<'a, Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.iter()
    }
}

/// Splits `total` bytes into `unit`-sized chunks; the final chunk may be shorter.
///
/// If `unit` is 0, [`DEFAULT_CHUNK_SIZE`] (1 MiB) is used. A zero-length
/// payload yields an empty plan.
pub fn plan_chunks(total: u64, unit: u64) -> ChunkPlan {
    let unit = if unit == 0 { DEFAULT_CHUNK_SIZE } else { unit };

    let mut chunks = Vec::with_capacity(total.div_ceil(unit) as usize);
    let mut offset = 0;
    while offset < total {
        let len = unit.min(total - offset);
        chunks.push(Chunk { offset, len });
        offset += len;
    }

    ChunkPlan { chunks, total }
}
