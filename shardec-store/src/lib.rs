//! Shardec Fragment Store
//!
//! On-disk side of the codec:
//! - `io` - positional read/write loops over shared file handles
//! - `layout` - fragment store naming and the manifest sidecar
//! - `planner` - partitioning a file into independent encode blocks
//! - `encoder` - parallel block encoding into m fragment stores
//! - `decoder` - erasure-aware reassembly of the original file

pub mod decoder;
pub mod encoder;
pub mod io;
pub mod layout;
pub mod planner;

pub use decoder::decode_file;
pub use encoder::{encode_file, EncodeOptions};
pub use layout::{fragment_path, manifest_path, Manifest};
pub use planner::{auto_frag_len, plan, BlockPlan, DEFAULT_FRAG_LEN};
