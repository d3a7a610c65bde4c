#![allow(unused)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const TOL: f64 = 1e-10;

pub fn assert_close(a: f64, e: f64, tol: f64) {
    let scale = 1.0_f64.max(e.abs());
    let ok = (a - e).abs() <= tol * scale;
    assert!(ok, "mismatch: got {a}, expect {e} (tol={tol})");
}

pub fn assert_slice_close(a: &[f64], e: &[f64], tol: f64) {
    assert_eq!(a.len(), e.len(), "len mismatch");
    for (i, (&ai, &ei)) in a.iter().zip(e.iter()).enumerate() {
        let scale = 1.0_f64.max(ei.abs());
        let ok = (ai - ei).abs() <= tol * scale;
        assert!(ok, "idx {i}: got {ai}, expect {ei} (tol={tol})");
    }
}

/// Column `j` of a column-major matrix with `nrow` rows.
pub fn column(m: &[f64], nrow: usize, j: usize) -> &[f64] {
    &m[j * nrow..(j + 1) * nrow]
}

/// Standard basis vector `e_i` of length `n`.
pub fn basis(n: usize, i: usize) -> Vec<f64> {
    let mut e = vec![0.0; n];
    e[i] = 1.0;
    e
}

pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Column-major `nrow × ncol` matrix with entries in [-1, 1).
pub fn random_matrix(rng: &mut StdRng, nrow: usize, ncol: usize) -> Vec<f64> {
    (0..nrow * ncol).map(|_| rng.random_range(-1.0..1.0)).collect()
}
