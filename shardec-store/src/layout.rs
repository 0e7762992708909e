//! Fragment store naming and the manifest sidecar
//!
//! A file encoded under prefix `P` becomes `m` flat byte stores
//! `P.0 .. P.<m-1>` (store `i` holds fragment `i` of every block, in
//! block order) plus a JSON sidecar `P.manifest` recording the code
//! parameters and geometry. The manifest is what lets decode strip
//! the tail padding back out and refuse mismatched parameters instead
//! of silently mis-decoding.

use serde::{Deserialize, Serialize};
use shardec_core::{CodeParams, Result, ShardecError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Current manifest format version
pub const MANIFEST_VERSION: u32 = 1;

/// Path of fragment store `index` under `prefix`: `<prefix>.<index>`
pub fn fragment_path(prefix: &Path, index: usize) -> PathBuf {
    let mut name = prefix.as_os_str().to_os_string();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

/// Path of the manifest sidecar: `<prefix>.manifest`
pub fn manifest_path(prefix: &Path) -> PathBuf {
    let mut name = prefix.as_os_str().to_os_string();
    name.push(".manifest");
    PathBuf::from(name)
}

/// Geometry of one encoded fragment set.
///
/// Written last during encode, so its presence doubles as a
/// completion marker; decode refuses to run without it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Manifest format version
    pub version: u32,
    /// Code parameters the fragment set was encoded with
    pub params: CodeParams,
    /// Length of one fragment slice within one block, in bytes
    pub frag_len: u64,
    /// Number of blocks the file was partitioned into
    pub block_count: usize,
    /// Original file length; decode truncates its output to this
    pub file_len: u64,
}

impl Manifest {
    pub fn new(params: CodeParams, frag_len: u64, block_count: usize, file_len: u64) -> Self {
        Self {
            version: MANIFEST_VERSION,
            params,
            frag_len,
            block_count,
            file_len,
        }
    }

    /// Expected length of every fragment store
    pub fn store_len(&self) -> u64 {
        self.block_count as u64 * self.frag_len
    }

    pub fn save(&self, prefix: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)?;
        fs::write(manifest_path(prefix), json)?;
        Ok(())
    }

    pub fn load(prefix: &Path) -> Result<Self> {
        let path = manifest_path(prefix);
        let raw = fs::read(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ShardecError::Manifest(format!("manifest not found at {}", path.display()))
            } else {
                ShardecError::Io(e)
            }
        })?;
        let manifest: Manifest = serde_json::from_slice(&raw)?;
        if manifest.version != MANIFEST_VERSION {
            return Err(ShardecError::Manifest(format!(
                "unsupported manifest version {} (expected {})",
                manifest.version, MANIFEST_VERSION
            )));
        }
        // re-validate rather than trusting the sidecar
        CodeParams::new(
            manifest.params.data_fragments,
            manifest.params.parity_fragments,
        )?;
        Ok(manifest)
    }
}
