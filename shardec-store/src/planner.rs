//! Block partition planning
//!
//! A file is encoded as a sequence of independent blocks; each block
//! is `k * frag_len` contiguous source bytes, split into k fragments
//! and extended with p parity fragments. The block grid is a pure
//! function of `(file_len, k, frag_len)` and never of the worker
//! count, so the fragment stores come out byte-identical no matter
//! how much parallelism the encoder runs with. The final block reads
//! past end of file as zeros; the manifest's `file_len` strips that
//! padding back out at decode time.

use shardec_core::{CodeParams, Result, ShardecError};

/// Default per-fragment slice length within one block (1 MiB).
///
/// Small files shrink below this so they still form a single full
/// block; see [`auto_frag_len`].
pub const DEFAULT_FRAG_LEN: u64 = 1024 * 1024;

/// One unit of parallel encode work: a contiguous block of
/// `k * frag_len` source bytes and the store offset its fragments
/// land at (`index * frag_len` in every store).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockPlan {
    /// Block index; also the work unit handed to one encode worker
    pub index: usize,
    /// Byte offset of the block within the source file
    pub offset: u64,
    /// Block length in bytes (`k * frag_len`; the last block may
    /// extend past end of file and is zero-padded on read)
    pub len: u64,
    /// Fragment slice length within this block
    pub frag_len: u64,
}

/// Fragment length policy: target [`DEFAULT_FRAG_LEN`], shrunk so a
/// small file still yields one full block rather than a mostly-padding
/// grid.
pub fn auto_frag_len(file_len: u64, params: &CodeParams) -> u64 {
    DEFAULT_FRAG_LEN
        .min(file_len.div_ceil(params.data_fragments as u64))
        .max(1)
}

/// Partition `file_len` bytes into disjoint block plans.
///
/// The plans exactly tile `[0, block_count * k * frag_len)`, which
/// covers the whole file plus the zero-padded tail - no gaps, no
/// overlap, no silently dropped remainder. Fails with
/// `DegenerateBlock` when there is nothing to partition.
pub fn plan(file_len: u64, params: &CodeParams, frag_len: u64) -> Result<Vec<BlockPlan>> {
    if file_len == 0 || frag_len == 0 {
        return Err(ShardecError::DegenerateBlock {
            file_len,
            k: params.data_fragments,
        });
    }

    let block_len = frag_len * params.data_fragments as u64;
    let block_count = file_len.div_ceil(block_len) as usize;

    Ok((0..block_count)
        .map(|index| BlockPlan {
            index,
            offset: index as u64 * block_len,
            len: block_len,
            frag_len,
        })
        .collect())
}
