// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **BLAS/LAPACK Integration Module** - *Householder QR Bindings*
//!
//! Low-level bindings for the LAPACK routines that produce and consume a compact
//! Householder QR factorisation, plus the BLAS triangular solve used to recover
//! coefficients from `R`.
//!
//! ## Overview
//!
//! ### LAPACK Decompositions
//! - **QR Decomposition**: Householder factorisation `A = QR` (`DGEQRF`)
//! - **Q formation**: explicit orthonormal `Q` from the reflectors (`DORGQR`)
//! - **Q application**: `C ← op(Q)·C` without forming `Q` (`DORMQR`)
//!
//! ### Level 2 BLAS
//! - **TRSV**: upper-triangular solve `R·x = b`
//!
//! All matrices are column-major. Every wrapper checks that the slices cover the
//! extent LAPACK may touch for the given dimensions and leading dimension before the
//! `unsafe` call, and translates `info` into [`KernelError::Lapack`].
//!
//! ## External Dependencies
//!
//! This module requires linking against BLAS and LAPACK, which the `linear_algebra`
//! feature does through OpenBLAS.

use blas::dtrsv;
use lapack::{dgeqrf, dormqr, dorgqr};
use minarrow::vec64;

use crate::config::WORKSPACE_QUERY;
use crate::errors::{KernelError, LapackOperation, check_info};
use crate::utils::{col_major_extent, workspace_len};

#[inline(always)]
fn ensure_extent(
    buf_len: usize,
    nrow: i32,
    ncol: i32,
    ld: i32,
    what: &str,
) -> Result<(), KernelError> {
    if nrow < 0 || ncol < 0 || ld < 0 {
        return Err(KernelError::InvalidArguments(format!(
            "{}: negative dimension ({} × {}, ld = {})",
            what, nrow, ncol, ld
        )));
    }
    let need = col_major_extent(nrow as usize, ncol as usize, ld as usize);
    if buf_len < need {
        return Err(KernelError::InvalidArguments(format!(
            "{} too small: need {} elements, got {}",
            what, need, buf_len
        )));
    }
    Ok(())
}

/// Panel-wise QR decomposition using Householder reflectors.
///
/// On exit `a` holds `R` on and above the diagonal and the reflector vectors below it;
/// `taus` receives the `min(m, n)` reflector scalars.
#[inline(always)]
pub fn qr_panel(
    m: i32,
    n: i32,
    a: &mut [f64],
    lda: i32,         // m × n panel, overwritten with R + Householder vectors
    taus: &mut [f64], // len ≥ min(m, n), receives τ scalars
) -> Result<(), KernelError> {
    ensure_extent(a.len(), m, n, lda, "A buffer")?;
    if taus.len() < m.min(n).max(0) as usize {
        return Err(KernelError::InvalidArguments("TAU buffer too small".into()));
    }

    // Workspace query
    let mut work_q = [0.0_f64];
    let mut info = 0;
    unsafe { dgeqrf(m, n, a, lda, taus, &mut work_q, WORKSPACE_QUERY, &mut info) };
    check_info("dgeqrf", LapackOperation::WorkspaceQuery, info)?;

    let mut work = vec64![0.0; workspace_len(work_q[0])];
    let lwork = work.len() as i32;

    unsafe { dgeqrf(m, n, a, lda, taus, &mut work, lwork, &mut info) };
    check_info("dgeqrf", LapackOperation::Factorise, info)
}

/// Forms orthonormal matrix Q from QR factorisation.
#[inline(always)]
pub fn qr_form_q(
    m: i32,
    n: i32,
    k: i32, // number of elementary reflectors (τ.len() ≥ k)
    a: &mut [f64],
    lda: i32,     // on entry: reflectors from `qr_panel`; on exit: Q
    taus: &[f64], // τ from `qr_panel`
) -> Result<(), KernelError> {
    ensure_extent(a.len(), m, n, lda, "A buffer")?;
    if k < 0 || taus.len() < k as usize {
        return Err(KernelError::InvalidArguments("TAU buffer too small".into()));
    }

    // workspace query
    let mut work_q = [0.0_f64];
    let mut info = 0;
    unsafe { dorgqr(m, n, k, a, lda, taus, &mut work_q, WORKSPACE_QUERY, &mut info) };
    check_info("dorgqr", LapackOperation::WorkspaceQuery, info)?;

    let mut work = vec64![0.0; workspace_len(work_q[0])];
    let lwork = work.len() as i32;

    unsafe { dorgqr(m, n, k, a, lda, taus, &mut work, lwork, &mut info) };
    check_info("dorgqr", LapackOperation::FormQ, info)
}

/// Optimal `dormqr` workspace length for `C ← op(Q)·C` (side `L`) or `C ← C·op(Q)`
/// (side `R`).
///
/// `c` must be the buffer that will later be transformed; LAPACK validates `ldc`
/// against it but does not read or write it during the query.
#[inline(always)]
pub fn ormqr_workspace(
    side: u8,
    trans: u8,
    m: i32,
    n: i32,
    k: i32,
    a: &[f64],
    lda: i32,
    tau: &[f64],
    c: &mut [f64],
    ldc: i32,
) -> Result<usize, KernelError> {
    ormqr_check(side, m, n, k, a, lda, tau, c, ldc)?;

    let mut work_q = [0.0_f64];
    let mut info = 0;
    unsafe {
        dormqr(
            side,
            trans,
            m,
            n,
            k,
            a,
            lda,
            tau,
            c,
            ldc,
            &mut work_q,
            WORKSPACE_QUERY, // workspace query
            &mut info,
        );
    }
    check_info("dormqr", LapackOperation::WorkspaceQuery, info)?;
    Ok(workspace_len(work_q[0]))
}

/// Applies the orthogonal factor of a QR factorisation, `C ← op(Q)·C` for side `L`.
///
/// `work` should have the length reported by [`ormqr_workspace`] for the same
/// dimensions.
#[inline(always)]
pub fn ormqr(
    side: u8,
    trans: u8,
    m: i32,
    n: i32,
    k: i32,
    a: &[f64], // reflectors, nq × k column-major
    lda: i32,
    tau: &[f64],   // len ≥ k
    c: &mut [f64], // m × n column-major, overwritten
    ldc: i32,
    work: &mut [f64],
) -> Result<(), KernelError> {
    ormqr_check(side, m, n, k, a, lda, tau, c, ldc)?;
    if work.is_empty() {
        return Err(KernelError::InvalidArguments("work buffer is empty".into()));
    }
    let lwork = i32::try_from(work.len()).unwrap_or(i32::MAX);

    let mut info = 0;
    unsafe {
        dormqr(
            side, trans, m, n, k, a, lda, tau, c, ldc, work, lwork, &mut info,
        );
    }
    check_info("dormqr", LapackOperation::Apply, info)
}

#[inline(always)]
fn ormqr_check(
    side: u8,
    m: i32,
    n: i32,
    k: i32,
    a: &[f64],
    lda: i32,
    tau: &[f64],
    c: &[f64],
    ldc: i32,
) -> Result<(), KernelError> {
    // order of Q
    let nq = if side == b'L' || side == b'l' { m } else { n };
    ensure_extent(a.len(), nq, k, lda, "A buffer")?;
    ensure_extent(c.len(), m, n, ldc, "C buffer")?;
    if tau.len() < k as usize {
        return Err(KernelError::InvalidArguments("TAU buffer too small".into()));
    }
    Ok(())
}

/// Solves **U X = B** where **U** is upper-triangular.
#[inline(always)]
pub fn trisolve_upper(
    n: i32,
    nrhs: i32,
    u: &[f64],
    ldu: i32, // n×n upper-triangular, may be the leading block of a taller matrix
    b: &mut [f64],
    ldb: i32,
) -> Result<(), KernelError> {
    ensure_extent(u.len(), n, n, ldu, "U buffer")?;
    ensure_extent(b.len(), n, nrhs, ldb, "B buffer")?;
    if n == 0 {
        return Ok(());
    }

    for j in 0..nrhs {
        let col = &mut b[(j * ldb) as usize..][..n as usize];
        unsafe {
            dtrsv(
                b'U', // UPLO = upper
                b'N', // trans = NoTrans
                b'N', // DIAG = Non-unit
                n, u, ldu, col, 1,
            );
        }
    }
    Ok(())
}
