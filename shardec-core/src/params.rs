//! Code parameter validation
//!
//! A code is `k` data fragments plus `p` parity fragments; any `k` of
//! the `m = k + p` fragments reconstruct the data, so up to `p`
//! simultaneous losses are survivable.

use crate::error::{Result, ShardecError};
use serde::{Deserialize, Serialize};

/// Hard ceiling on `k + p`: fragment indices are GF(2^8) field
/// elements, so at most 255 total fragments exist for any code.
pub const MAX_TOTAL_FRAGMENTS: usize = 255;

/// Default number of data fragments (k)
pub const DEFAULT_DATA_FRAGMENTS: usize = 6;
/// Default number of parity fragments (p)
pub const DEFAULT_PARITY_FRAGMENTS: usize = 3;

/// Validated erasure-code parameters.
///
/// Immutable once constructed; cheap to copy, owned by every
/// operation that needs it. [`CodeParams::new`] is the only
/// constructor that checks the field-size invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeParams {
    /// Number of data fragments (k)
    pub data_fragments: usize,
    /// Number of parity fragments (p)
    pub parity_fragments: usize,
}

impl Default for CodeParams {
    fn default() -> Self {
        Self {
            data_fragments: DEFAULT_DATA_FRAGMENTS,
            parity_fragments: DEFAULT_PARITY_FRAGMENTS,
        }
    }
}

impl CodeParams {
    /// Validate and construct code parameters.
    ///
    /// Fails with `InvalidParameters` when `k < 1`, `p < 1`, or
    /// `k + p >= 255`. Performs no I/O.
    pub fn new(data_fragments: usize, parity_fragments: usize) -> Result<Self> {
        if data_fragments < 1
            || parity_fragments < 1
            || data_fragments + parity_fragments >= MAX_TOTAL_FRAGMENTS
        {
            return Err(ShardecError::InvalidParameters {
                k: data_fragments,
                p: parity_fragments,
            });
        }
        Ok(Self {
            data_fragments,
            parity_fragments,
        })
    }

    /// Total number of fragments (m = k + p)
    pub fn total(&self) -> usize {
        self.data_fragments + self.parity_fragments
    }

    /// Maximum number of fragment losses that can be tolerated
    pub fn max_failures(&self) -> usize {
        self.parity_fragments
    }
}
