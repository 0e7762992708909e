//! End-to-end fragment store tests: file -> encode -> erasures -> decode -> file
//!
//! Run with: cargo test --package shardec-store --test round_trip

use shardec_core::params::CodeParams;
use shardec_core::{gf, ShardecError};
use shardec_store::{decode_file, encode_file, fragment_path, manifest_path, EncodeOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Generate test file data of specified size
fn generate_file(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}

fn write_input(dir: &Path, data: &[u8]) -> PathBuf {
    let path = dir.join("input.bin");
    fs::write(&path, data).unwrap();
    path
}

fn recovered_path(dir: &Path) -> PathBuf {
    dir.join("recovered.bin")
}

fn options(workers: usize, frag_len: u64) -> EncodeOptions {
    EncodeOptions::default()
        .with_workers(workers)
        .with_frag_len(frag_len)
}

#[test]
fn test_round_trip_all_fragments_present() {
    let dir = TempDir::new().unwrap();
    let data = generate_file(64 * 1024);
    let input = write_input(dir.path(), &data);
    let params = CodeParams::new(4, 2).unwrap();

    let manifest = encode_file(&input, &input, &params, &options(4, 4096)).unwrap();
    assert_eq!(manifest.file_len, data.len() as u64);
    assert_eq!(manifest.block_count, 4); // 64 KiB / (4 * 4 KiB)

    // all m stores exist with the advertised length
    for i in 0..params.total() {
        let store = fragment_path(&input, i);
        assert_eq!(fs::metadata(&store).unwrap().len(), manifest.store_len());
    }

    let out = recovered_path(dir.path());
    decode_file(&input, &out).unwrap();
    assert_eq!(fs::read(&out).unwrap(), data);
}

#[test]
fn test_round_trip_recovers_from_max_erasures() {
    let dir = TempDir::new().unwrap();
    let data = generate_file(48 * 1024);
    let input = write_input(dir.path(), &data);
    let params = CodeParams::new(4, 2).unwrap();

    encode_file(&input, &input, &params, &options(2, 2048)).unwrap();

    // lose one source and one parity fragment (p = 2, the maximum)
    fs::remove_file(fragment_path(&input, 1)).unwrap();
    fs::remove_file(fragment_path(&input, 5)).unwrap();

    let out = recovered_path(dir.path());
    decode_file(&input, &out).unwrap();
    assert_eq!(fs::read(&out).unwrap(), data);
}

#[test]
fn test_every_single_erasure_recovers() {
    let params = CodeParams::new(3, 2).unwrap();
    let data = generate_file(30_000);

    for lost in 0..params.total() {
        let dir = TempDir::new().unwrap();
        let input = write_input(dir.path(), &data);
        encode_file(&input, &input, &params, &options(1, 1024)).unwrap();
        fs::remove_file(fragment_path(&input, lost)).unwrap();

        let out = recovered_path(dir.path());
        decode_file(&input, &out).unwrap();
        assert_eq!(fs::read(&out).unwrap(), data, "lost fragment {lost}");
    }
}

#[test]
fn test_too_many_erasures_fails() {
    let dir = TempDir::new().unwrap();
    let data = generate_file(24 * 1024);
    let input = write_input(dir.path(), &data);
    let params = CodeParams::new(4, 2).unwrap();

    encode_file(&input, &input, &params, &options(2, 1024)).unwrap();

    // p + 1 losses must fail loudly, never produce wrong output
    for i in [0, 2, 4] {
        fs::remove_file(fragment_path(&input, i)).unwrap();
    }

    let out = recovered_path(dir.path());
    let result = decode_file(&input, &out);
    assert!(matches!(
        result,
        Err(ShardecError::TooManyErasures { lost: 3, max: 2 })
    ));
}

#[test]
fn test_unaligned_length_round_trips() {
    // not a multiple of k, of frag_len, or of anything else
    let dir = TempDir::new().unwrap();
    let data = generate_file(10_007);
    let input = write_input(dir.path(), &data);
    let params = CodeParams::new(4, 2).unwrap();

    let manifest = encode_file(&input, &input, &params, &options(2, 512)).unwrap();
    assert_eq!(manifest.block_count, 5); // ceil(10007 / 2048)

    fs::remove_file(fragment_path(&input, 3)).unwrap();

    let out = recovered_path(dir.path());
    decode_file(&input, &out).unwrap();
    let recovered = fs::read(&out).unwrap();
    assert_eq!(recovered.len(), data.len());
    assert_eq!(recovered, data);
}

#[test]
fn test_worker_count_does_not_change_fragments() {
    let data = generate_file(96 * 1024);
    let params = CodeParams::new(4, 2).unwrap();

    let mut fragment_sets = Vec::new();
    for workers in [1, 2, 8] {
        let dir = TempDir::new().unwrap();
        let input = write_input(dir.path(), &data);
        encode_file(&input, &input, &params, &options(workers, 4096)).unwrap();

        let stores: Vec<Vec<u8>> = (0..params.total())
            .map(|i| fs::read(fragment_path(&input, i)).unwrap())
            .collect();
        let manifest = fs::read(manifest_path(&input)).unwrap();
        fragment_sets.push((stores, manifest));
    }

    assert_eq!(fragment_sets[0], fragment_sets[1]);
    assert_eq!(fragment_sets[0], fragment_sets[2]);
}

#[test]
fn test_concrete_two_plus_one_vector() {
    // k=2, p=1 over the 8-byte input 11 22 33 44 55 66 77 88:
    // F0 and F1 are the two halves, F2 the Cauchy parity combination.
    let dir = TempDir::new().unwrap();
    let data = vec![0x11u8, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88];
    let input = write_input(dir.path(), &data);
    let params = CodeParams::new(2, 1).unwrap();

    encode_file(&input, &input, &params, &options(1, 4)).unwrap();

    let f0 = fs::read(fragment_path(&input, 0)).unwrap();
    let f1 = fs::read(fragment_path(&input, 1)).unwrap();
    let f2 = fs::read(fragment_path(&input, 2)).unwrap();
    assert_eq!(f0, &data[..4]);
    assert_eq!(f1, &data[4..]);

    // parity row of the 3x2 Cauchy matrix is [inv(2), inv(3)]
    let expected: Vec<u8> = (0..4)
        .map(|b| gf::mul(gf::inv(2), f0[b]) ^ gf::mul(gf::inv(3), f1[b]))
        .collect();
    assert_eq!(f2, expected);

    // losing F1 must reconstruct it byte-for-byte
    fs::remove_file(fragment_path(&input, 1)).unwrap();
    let out = recovered_path(dir.path());
    decode_file(&input, &out).unwrap();
    assert_eq!(fs::read(&out).unwrap(), data);
}

#[test]
fn test_corrupt_length_store_treated_as_erasure() {
    let dir = TempDir::new().unwrap();
    let data = generate_file(16 * 1024);
    let input = write_input(dir.path(), &data);
    let params = CodeParams::new(4, 2).unwrap();

    encode_file(&input, &input, &params, &options(2, 1024)).unwrap();

    // truncate one store instead of deleting it
    let victim = fragment_path(&input, 2);
    let mut truncated = fs::read(&victim).unwrap();
    truncated.truncate(100);
    fs::write(&victim, truncated).unwrap();

    let out = recovered_path(dir.path());
    decode_file(&input, &out).unwrap();
    assert_eq!(fs::read(&out).unwrap(), data);
}

#[test]
fn test_decode_without_manifest_fails() {
    let dir = TempDir::new().unwrap();
    let data = generate_file(8 * 1024);
    let input = write_input(dir.path(), &data);
    let params = CodeParams::new(4, 2).unwrap();

    encode_file(&input, &input, &params, &options(1, 1024)).unwrap();
    fs::remove_file(manifest_path(&input)).unwrap();

    let out = recovered_path(dir.path());
    assert!(matches!(
        decode_file(&input, &out),
        Err(ShardecError::Manifest(_))
    ));
}

#[test]
fn test_empty_file_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), &[]);
    let params = CodeParams::new(4, 2).unwrap();

    let result = encode_file(&input, &input, &params, &EncodeOptions::default());
    assert!(matches!(
        result,
        Err(ShardecError::DegenerateBlock { file_len: 0, .. })
    ));
}
