//! Erasure-aware decoder
//!
//! Inventory scan first: every fragment store that cannot be opened,
//! is the wrong length, or fails to read joins the erasure set -
//! missing and unreadable are deliberately not distinguished. If the
//! set stays within the parity budget, one recombine over the whole
//! surviving stores reconstructs the lost ones (the linear combination
//! is bytewise, and every store shares the same block layout, so
//! per-block and whole-store recovery are the same computation). The
//! source fragments are then reassembled block-major and trimmed to
//! the original file length.

use crate::io;
use crate::layout::{self, Manifest};
use shardec_core::{gf, DecodePlan, Matrix, Result};
use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

/// Reassemble the original file from the fragment stores under
/// `prefix`, reconstructing up to `p` lost fragments along the way.
pub fn decode_file(prefix: &Path, output: &Path) -> Result<()> {
    let manifest = Manifest::load(prefix)?;
    let params = manifest.params;
    let store_len = manifest.store_len();

    let mut fragments: Vec<Option<Vec<u8>>> = Vec::with_capacity(params.total());
    let mut missing = Vec::new();
    for index in 0..params.total() {
        match read_store(&layout::fragment_path(prefix, index), store_len) {
            Ok(data) => fragments.push(Some(data)),
            Err(err) => {
                warn!(index, error = %err, "fragment store unreadable, treating as erasure");
                missing.push(index);
                fragments.push(None);
            }
        }
    }

    info!(
        prefix = %prefix.display(),
        lost = missing.len(),
        max = params.max_failures(),
        "decoding"
    );

    if !missing.is_empty() {
        let encode_matrix = Matrix::cauchy(params.total(), params.data_fragments);
        let plan = DecodePlan::build(&encode_matrix, &params, &missing)?;
        let survivors: Vec<&[u8]> = plan
            .decode_index
            .iter()
            .map(|&i| {
                fragments[i]
                    .as_deref()
                    .expect("decode index only selects surviving fragments")
            })
            .collect();

        let mut recovered = vec![vec![0u8; store_len as usize]; missing.len()];
        gf::recombine(plan.matrix.as_slice(), &survivors, &mut recovered);
        for (&index, data) in missing.iter().zip(recovered) {
            fragments[index] = Some(data);
        }
    }

    // Reassemble the source fragments block-major and trim the
    // padding; parity fragments never reach the output.
    let out = File::create(output)?;
    let frag_len = manifest.frag_len;
    let mut remaining = manifest.file_len;
    let mut pos = 0u64;
    'blocks: for block in 0..manifest.block_count {
        for source in fragments.iter().take(params.data_fragments) {
            if remaining == 0 {
                break 'blocks;
            }
            let data = source
                .as_deref()
                .expect("source fragments are present after reconstruction");
            let start = block * frag_len as usize;
            let take = remaining.min(frag_len) as usize;
            io::write_full_at(&out, &data[start..start + take], pos)?;
            pos += take as u64;
            remaining -= take as u64;
        }
    }

    Ok(())
}

/// Read one fragment store in full; any failure (absent, truncated,
/// unreadable) is reported to the caller as an erasure candidate.
fn read_store(path: &Path, expected_len: u64) -> std::io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let len = file.metadata()?.len();
    if len != expected_len {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("store has {len} bytes, expected {expected_len}"),
        ));
    }
    let mut data = vec![0u8; expected_len as usize];
    let read = io::read_full_at(&file, &mut data, 0)?;
    if read != data.len() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "short read from fragment store",
        ));
    }
    Ok(data)
}
