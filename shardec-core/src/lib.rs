//! Shardec Core Library
//!
//! Erasure-coding math for the shardec fragment store. This crate
//! provides:
//! - GF(2^8) field arithmetic and the bulk fragment recombine kernel
//! - Systematic Cauchy encode matrices and erasure-aware decode plans
//! - Code parameter validation (k data + p parity, k + p < 255)
//! - Common error handling
//!
//! Everything here is pure computation; file layout and I/O live in
//! `shardec-store`.

pub mod error;
pub mod gf;
pub mod matrix;
pub mod params;

pub use error::{Result, ShardecError};
pub use matrix::{DecodePlan, Matrix};
pub use params::{
    CodeParams, DEFAULT_DATA_FRAGMENTS, DEFAULT_PARITY_FRAGMENTS, MAX_TOTAL_FRAGMENTS,
};
