// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **QR Apply Kernel** - *Implicit Q Application via DORMQR*
//!
//! Applies the orthogonal factor `Q` (or `Qᵀ`) of a compact Householder QR
//! factorisation to right-hand sides without forming `Q`.
//!
//! Construction validates the factorisation against its reflector scalars, asks
//! `DORMQR` for its optimal workspace once, and allocates it. Every later
//! [`QrApply::apply`] reuses that workspace.
//!
//! ## Lifetimes
//! [`QrApply`] borrows the factorisation matrix and `qraux`; it cannot outlive them.
//!
//! ## Concurrency
//! `apply` takes `&mut self` because the workspace is shared between calls, so a single
//! instance cannot be driven from two threads at once. Separate instances are
//! independent.

use minarrow::{Vec64, vec64};

use crate::config::SINGLE_RHS;
use crate::errors::{KernelError, log_length_mismatch};
use crate::kernels::scientific::blas_lapack::{ormqr, ormqr_workspace};
use crate::kernels::scientific::qr::{QrMatrix, Transpose};
use crate::utils::lapack_int;

const SIDE_LEFT: u8 = b'L';

/// Applies `Q` or `Qᵀ` from the left to vectors of length `nobs`.
#[derive(Debug)]
pub struct QrApply<'a> {
    qr: &'a [f64],
    qraux: &'a [f64],
    trans: Transpose,
    nobs: usize,
    ncoef: usize,
    // LAPACK-typed copies of the dimensions
    m: i32,
    k: i32,
    lda: i32,
    rhs: Vec64<f64>,
    work: Vec64<f64>,
}

impl<'a> QrApply<'a> {
    /// Validates the factorisation and sizes the workspace.
    ///
    /// # Errors
    /// - `LengthMismatch` if `qraux.len() != qr.ncol()`; no LAPACK call is made.
    /// - `Lapack { operation: WorkspaceQuery, .. }` if `DORMQR` rejects the
    ///   dimensions, e.g. `info = -5` when there are more coefficients than observations.
    ///
    /// `lda = ldc = max(1, nobs)`, so a `0 × 0` factorisation constructs instead of
    /// failing the query with `info = -7` as a bare `lda = nobs` call would.
    pub fn new(
        qr: QrMatrix<'a>,
        qraux: &'a [f64],
        trans: Transpose,
    ) -> Result<Self, KernelError> {
        let nobs = qr.nrow();
        let ncoef = qr.ncol();
        if qraux.len() != ncoef {
            return Err(KernelError::LengthMismatch(format!(
                "QR auxiliary vector should be of length 'ncol(Q)': {}",
                log_length_mismatch("QrApply::new", ncoef, qraux.len())
            )));
        }

        let m = lapack_int(nobs, "nobs")?;
        let k = lapack_int(ncoef, "ncoef")?;
        let lda = lapack_int(qr.leading_dim(), "lda")?;

        // The default buffer doubles as the query's C operand; it is only
        // checked against ldc, never read.
        let mut rhs = vec64![0.0; nobs];
        let lwork = ormqr_workspace(
            SIDE_LEFT,
            trans.as_lapack_char(),
            m,
            SINGLE_RHS,
            k,
            qr.as_slice(),
            lda,
            qraux,
            &mut rhs,
            lda,
        )?;
        tracing::debug!(nobs, ncoef, ?trans, lwork, "sized dormqr workspace");

        Ok(Self {
            qr: qr.as_slice(),
            qraux,
            trans,
            nobs,
            ncoef,
            m,
            k,
            lda,
            rhs,
            work: vec64![0.0; lwork],
        })
    }

    /// Transforms `rhs` in place: `rhs ← op(Q)·rhs`.
    ///
    /// `rhs.len()` must equal [`nobs`](Self::nobs).
    pub fn apply(&mut self, rhs: &mut [f64]) -> Result<(), KernelError> {
        if rhs.len() != self.nobs {
            return Err(KernelError::LengthMismatch(log_length_mismatch(
                "QrApply::apply",
                self.nobs,
                rhs.len(),
            )));
        }
        ormqr(
            SIDE_LEFT,
            self.trans.as_lapack_char(),
            self.m,
            SINGLE_RHS,
            self.k,
            self.qr,
            self.lda,
            self.qraux,
            rhs,
            self.lda,
            &mut self.work,
        )
    }

    /// Transforms the internal buffer in place and returns it.
    ///
    /// Fill the buffer first through [`rhs_mut`](Self::rhs_mut).
    pub fn apply_internal(&mut self) -> Result<&[f64], KernelError> {
        ormqr(
            SIDE_LEFT,
            self.trans.as_lapack_char(),
            self.m,
            SINGLE_RHS,
            self.k,
            self.qr,
            self.lda,
            self.qraux,
            &mut self.rhs,
            self.lda,
            &mut self.work,
        )?;
        Ok(&self.rhs)
    }

    /// Transforms each column of a column-major `nobs × ncol` buffer in turn.
    pub fn apply_columns(&mut self, rhs: &mut [f64], ncol: usize) -> Result<(), KernelError> {
        let expected = self.nobs.checked_mul(ncol).ok_or_else(|| {
            KernelError::InvalidArguments(format!("{} × {} overflows usize", self.nobs, ncol))
        })?;
        if rhs.len() != expected {
            return Err(KernelError::LengthMismatch(log_length_mismatch(
                "QrApply::apply_columns",
                expected,
                rhs.len(),
            )));
        }
        if self.nobs == 0 {
            return Ok(());
        }
        for col in rhs.chunks_exact_mut(self.nobs) {
            self.apply(col)?;
        }
        Ok(())
    }

    /// Internal right-hand-side buffer of length `nobs`.
    #[inline]
    pub fn rhs(&self) -> &[f64] {
        &self.rhs
    }

    /// Mutable access to the internal buffer, for loading a vector before
    /// [`apply_internal`](Self::apply_internal).
    #[inline]
    pub fn rhs_mut(&mut self) -> &mut [f64] {
        &mut self.rhs
    }

    #[inline]
    pub fn nobs(&self) -> usize {
        self.nobs
    }

    #[inline]
    pub fn ncoef(&self) -> usize {
        self.ncoef
    }

    #[inline]
    pub fn transpose(&self) -> Transpose {
        self.trans
    }

    /// Workspace length chosen by the query.
    #[inline]
    pub fn workspace_len(&self) -> usize {
        self.work.len()
    }
}
