//! GF(2^8) codec primitives
//!
//! Scalar table-driven arithmetic over the field GF(2^8) with the
//! irreducible polynomial x^8 + x^4 + x^3 + x^2 + 1 (0x11d), the same
//! field ISA-L uses, so fragment sets produced here interoperate with
//! ISA-L-encoded ones. Addition is XOR; multiplication goes through
//! compile-time log/exp tables.
//!
//! The bulk entry point is [`recombine`], which computes linear
//! combinations of equal-length byte buffers. Both parity generation
//! and erasure recovery are recombine calls with different
//! coefficient rows.

/// Irreducible polynomial for the field (ISA-L convention).
const GF_POLY: u32 = 0x11d;

const fn build_exp() -> [u8; 512] {
    let mut exp = [0u8; 512];
    let mut x: u32 = 1;
    let mut i = 0;
    while i < 255 {
        exp[i] = x as u8;
        // doubled so log sums index without a mod 255
        exp[i + 255] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= GF_POLY;
        }
        i += 1;
    }
    exp
}

const fn build_log() -> [u8; 256] {
    let exp = build_exp();
    let mut log = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        log[exp[i] as usize] = i as u8;
        i += 1;
    }
    log
}

const EXP: [u8; 512] = build_exp();
const LOG: [u8; 256] = build_log();

/// Field multiplication.
#[inline]
pub fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    EXP[LOG[a as usize] as usize + LOG[b as usize] as usize]
}

/// Multiplicative inverse; `inv(0)` is 0 (ISA-L convention).
#[inline]
pub fn inv(a: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    EXP[255 - LOG[a as usize] as usize]
}

/// Full product row for one coefficient: `mul_table(c)[b] == mul(c, b)`.
///
/// The moral equivalent of one row of ISA-L's `g_tbls`; [`recombine`]
/// builds one per coefficient so the inner loop is a single lookup
/// and XOR per byte.
pub fn mul_table(c: u8) -> [u8; 256] {
    let mut table = [0u8; 256];
    for (b, entry) in table.iter_mut().enumerate() {
        *entry = mul(c, b as u8);
    }
    table
}

/// Bulk recombine: `outputs[r] = Σ_j coeffs[r * k + j] · inputs[j]`
/// bytewise over GF(2^8), where `k = inputs.len()`.
///
/// All input and output buffers must share one length. Coefficient
/// rows are the parity rows of the encode matrix when encoding, or
/// the decode matrix rows when recovering erasures.
pub fn recombine(coeffs: &[u8], inputs: &[&[u8]], outputs: &mut [Vec<u8>]) {
    let k = inputs.len();
    assert_eq!(
        coeffs.len(),
        k * outputs.len(),
        "coefficient rows must be outputs x inputs"
    );
    let frag_len = inputs.first().map_or(0, |frag| frag.len());
    assert!(
        inputs.iter().all(|frag| frag.len() == frag_len),
        "input fragments must share one length"
    );

    for (row, out) in outputs.iter_mut().enumerate() {
        assert_eq!(out.len(), frag_len, "output fragments must share one length");
        out.fill(0);
        for (j, input) in inputs.iter().enumerate() {
            let c = coeffs[row * k + j];
            if c == 0 {
                continue;
            }
            let table = mul_table(c);
            for (o, &i) in out.iter_mut().zip(input.iter()) {
                *o ^= table[i as usize];
            }
        }
    }
}
