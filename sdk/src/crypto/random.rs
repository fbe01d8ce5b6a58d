//! Random values from the OS CSPRNG.
//!
//! `OsRng` is stateless and safe to call from any thread. Every call returns
//! fresh values.

use rand::rngs::OsRng;
use rand::{Rng, RngCore};

/// `len` random bytes.
pub fn random_u8_values(len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    OsRng.fill_bytes(&mut out);
    out
}

/// `len` random 16-bit values.
pub fn random_u16_values(len: usize) -> Vec<u16> {
    (0..len).map(|_| OsRng.gen()).collect()
}

/// `len` random 32-bit values.
pub fn random_u32_values(len: usize) -> Vec<u32> {
    (0..len).map(|_| OsRng.next_u32()).collect()
}

/// A fixed-size random array, for nonces and IVs.
pub(crate) fn random_array<const N: usize>() -> [u8; N] {
    let mut out = [0u8; N];
    OsRng.fill_bytes(&mut out);
    out
}
