// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **QR Factorisation Types** - *Compact Householder Storage*
//!
//! Types describing a compact Householder QR factorisation as LAPACK stores it:
//! a column-major `nobs × ncoef` matrix holding `R` on and above the diagonal and the
//! reflector vectors below it, paired with `ncoef` reflector scalars (`qraux`, LAPACK's
//! `tau`).
//!
//! - [`QrMatrix`] borrows caller-owned factorisation storage.
//! - [`QrFactors`] owns a factorisation produced here with `DGEQRF`.
//! - [`Transpose`] selects `Q` or `Qᵀ` when applying the factor.

use minarrow::{Vec64, vec64};

use crate::errors::{KernelError, log_length_mismatch};
use crate::kernels::scientific::blas_lapack::{qr_form_q, qr_panel};
use crate::utils::{lapack_int, leading_dim};

/// Which orthogonal factor to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transpose {
    /// Apply `Q`.
    #[default]
    No,
    /// Apply `Qᵀ`.
    Yes,
}

impl Transpose {
    /// LAPACK `TRANS` character.
    #[inline(always)]
    pub fn as_lapack_char(self) -> u8 {
        match self {
            Transpose::No => b'N',
            Transpose::Yes => b'T',
        }
    }

    /// Parses a LAPACK `TRANS` character, `N` or `T` in either case.
    pub fn from_lapack_char(c: u8) -> Result<Self, KernelError> {
        match c {
            b'N' | b'n' => Ok(Transpose::No),
            b'T' | b't' => Ok(Transpose::Yes),
            other => Err(KernelError::InvalidArguments(format!(
                "transpose flag must be 'N' or 'T', got {:?}",
                other as char
            ))),
        }
    }

    /// The opposite direction.
    #[inline(always)]
    pub fn flip(self) -> Self {
        match self {
            Transpose::No => Transpose::Yes,
            Transpose::Yes => Transpose::No,
        }
    }
}

/// Borrowed column-major factorisation matrix.
///
/// Anything built on this view borrows the caller's buffer and cannot outlive it.
#[derive(Debug, Clone, Copy)]
pub struct QrMatrix<'a> {
    data: &'a [f64],
    nrow: usize,
    ncol: usize,
}

impl<'a> QrMatrix<'a> {
    /// Wraps `data` as an `nrow × ncol` column-major matrix.
    ///
    /// Fails with `InvalidArguments` unless `data.len() == nrow * ncol`.
    pub fn new(data: &'a [f64], nrow: usize, ncol: usize) -> Result<Self, KernelError> {
        let expected = nrow.checked_mul(ncol).ok_or_else(|| {
            KernelError::InvalidArguments(format!("{} × {} overflows usize", nrow, ncol))
        })?;
        if data.len() != expected {
            return Err(KernelError::InvalidArguments(log_length_mismatch(
                "QrMatrix::new",
                expected,
                data.len(),
            )));
        }
        Ok(Self { data, nrow, ncol })
    }

    #[inline]
    pub fn nrow(&self) -> usize {
        self.nrow
    }

    #[inline]
    pub fn ncol(&self) -> usize {
        self.ncol
    }

    #[inline]
    pub fn as_slice(&self) -> &'a [f64] {
        self.data
    }

    /// Column stride, `max(1, nrow)`.
    #[inline]
    pub fn leading_dim(&self) -> usize {
        leading_dim(self.nrow)
    }
}

/// Owned Householder QR factorisation of a column-major design matrix.
///
/// The `qr` storage and `qraux` scalars are in LAPACK's compact layout and can be handed
/// to [`QrApply`](crate::kernels::scientific::qr_apply::QrApply) through [`QrFactors::view`].
#[derive(Debug, Clone)]
pub struct QrFactors {
    qr: Vec64<f64>,
    qraux: Vec64<f64>,
    nrow: usize,
    ncol: usize,
}

impl QrFactors {
    /// Factorises the column-major `nrow × ncol` matrix `x` with `DGEQRF`.
    ///
    /// Requires `ncol <= nrow` so that every column gets a reflector.
    pub fn factorise(x: &[f64], nrow: usize, ncol: usize) -> Result<Self, KernelError> {
        QrMatrix::new(x, nrow, ncol)?;
        if ncol > nrow {
            return Err(KernelError::InvalidArguments(format!(
                "QrFactors::factorise => {} columns exceed {} rows",
                ncol, nrow
            )));
        }

        let mut qr = vec64![0.0; x.len()];
        qr.copy_from_slice(x);
        let mut qraux = vec64![0.0; ncol];

        let m = lapack_int(nrow, "nrow")?;
        let n = lapack_int(ncol, "ncol")?;
        let lda = lapack_int(leading_dim(nrow), "lda")?;
        qr_panel(m, n, &mut qr, lda, &mut qraux)?;

        tracing::debug!(nrow, ncol, "factorised design matrix");
        Ok(Self {
            qr,
            qraux,
            nrow,
            ncol,
        })
    }

    /// Borrowed view of the compact factorisation storage.
    #[inline]
    pub fn view(&self) -> QrMatrix<'_> {
        QrMatrix {
            data: &self.qr,
            nrow: self.nrow,
            ncol: self.ncol,
        }
    }

    /// Reflector scalars, one per column.
    #[inline]
    pub fn qraux(&self) -> &[f64] {
        &self.qraux
    }

    #[inline]
    pub fn nrow(&self) -> usize {
        self.nrow
    }

    #[inline]
    pub fn ncol(&self) -> usize {
        self.ncol
    }

    /// Diagonal of `R`.
    pub fn r_diagonal(&self) -> Vec<f64> {
        (0..self.ncol).map(|j| self.qr[j + j * self.nrow]).collect()
    }

    /// Forms `Q` explicitly with `DORGQR`, column-major.
    ///
    /// `full = false` gives the thin `nrow × ncol` factor, `full = true` the square
    /// `nrow × nrow` one.
    pub fn explicit_q(&self, full: bool) -> Result<Vec64<f64>, KernelError> {
        let ncol_q = if full { self.nrow } else { self.ncol };
        let mut q = vec64![0.0; self.nrow * ncol_q];
        // reflectors occupy the first `ncol` columns
        q[..self.qr.len()].copy_from_slice(&self.qr);

        let m = lapack_int(self.nrow, "nrow")?;
        let n = lapack_int(ncol_q, "ncol")?;
        let k = lapack_int(self.ncol, "k")?;
        let lda = lapack_int(leading_dim(self.nrow), "lda")?;
        qr_form_q(m, n, k, &mut q, lda, &self.qraux)?;
        Ok(q)
    }
}
