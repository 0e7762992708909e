//! Parallel block encoder
//!
//! One task per block plan, fanned out over a fixed-width rayon pool
//! and joined once per encode call. Tasks share only the read-only
//! input handle, the read-only encode matrix, and the pre-sized
//! fragment stores; every write lands in a range no other task
//! touches, so no locking is needed. Any task failure aborts the
//! whole encode - partial fragment sets are unsafe to leave behind,
//! and the manifest is only written after the join succeeds.

use crate::io;
use crate::layout::{self, Manifest};
use crate::planner::{self, BlockPlan};
use rayon::prelude::*;
use shardec_core::{gf, CodeParams, Matrix, Result, ShardecError};
use std::fs::{File, OpenOptions};
use std::path::Path;
use tracing::{debug, info};

/// Encode-side tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions {
    /// Number of encode workers. Controls parallelism width only; the
    /// fragment stores are byte-identical for any value.
    pub workers: usize,
    /// Override the per-fragment slice length. Defaults to
    /// [`planner::auto_frag_len`].
    pub frag_len: Option<u64>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism()
                .map(usize::from)
                .unwrap_or(1),
            frag_len: None,
        }
    }
}

impl EncodeOptions {
    /// Set the worker count (clamped to at least one)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Pin the fragment slice length instead of deriving it
    pub fn with_frag_len(mut self, frag_len: u64) -> Self {
        self.frag_len = Some(frag_len);
        self
    }
}

/// Encode `input` into `m` fragment stores under `prefix`.
///
/// Writes `<prefix>.0 .. <prefix>.<m-1>` plus `<prefix>.manifest`;
/// returns the manifest. Fatal on any worker I/O failure; no partial
/// results are recovered.
pub fn encode_file(
    input: &Path,
    prefix: &Path,
    params: &CodeParams,
    options: &EncodeOptions,
) -> Result<Manifest> {
    let file = File::open(input)?;
    let file_len = file.metadata()?.len();
    let frag_len = options
        .frag_len
        .unwrap_or_else(|| planner::auto_frag_len(file_len, params));
    let plans = planner::plan(file_len, params, frag_len)?;
    let manifest = Manifest::new(*params, frag_len, plans.len(), file_len);

    info!(
        file = %input.display(),
        file_len,
        k = params.data_fragments,
        p = params.parity_fragments,
        frag_len,
        blocks = manifest.block_count,
        workers = options.workers,
        "encoding"
    );

    let encode_matrix = Matrix::cauchy(params.total(), params.data_fragments);
    let parity_rows = encode_matrix.rows_from(params.data_fragments);

    // Pre-size the stores so workers can write disjoint ranges
    // concurrently without extending the files.
    let mut stores = Vec::with_capacity(params.total());
    for index in 0..params.total() {
        let store = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(layout::fragment_path(prefix, index))?;
        store.set_len(manifest.store_len())?;
        stores.push(store);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.workers.max(1))
        .build()
        .map_err(|e| ShardecError::Internal(e.to_string()))?;
    pool.install(|| {
        plans
            .par_iter()
            .try_for_each(|plan| encode_block(&file, &stores, params, parity_rows, plan))
    })?;

    // Written last: a manifest on disk means the fragment set is complete.
    manifest.save(prefix)?;
    Ok(manifest)
}

/// Encode one block: read k source fragments, derive p parity
/// fragments, write all m slices at this block's store offset.
fn encode_block(
    input: &File,
    stores: &[File],
    params: &CodeParams,
    parity_rows: &[u8],
    plan: &BlockPlan,
) -> Result<()> {
    let frag_len = plan.frag_len as usize;

    let mut sources = vec![vec![0u8; frag_len]; params.data_fragments];
    for (j, frag) in sources.iter_mut().enumerate() {
        io::read_at_zero_padded(input, frag, plan.offset + j as u64 * plan.frag_len)?;
    }

    let inputs: Vec<&[u8]> = sources.iter().map(Vec::as_slice).collect();
    let mut parity = vec![vec![0u8; frag_len]; params.parity_fragments];
    gf::recombine(parity_rows, &inputs, &mut parity);

    let store_offset = plan.index as u64 * plan.frag_len;
    for (store, frag) in stores.iter().zip(sources.iter().chain(parity.iter())) {
        io::write_full_at(store, frag, store_offset)?;
    }

    debug!(block = plan.index, offset = plan.offset, "block encoded");
    Ok(())
}
