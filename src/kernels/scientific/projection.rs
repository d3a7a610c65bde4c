// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Least-Squares Projection Kernels** - *Fitted Values, Residuals and Coefficients*
//!
//! Least-squares quantities from a precomputed QR factorisation of a design matrix `X`,
//! using only applications of `Q`/`Qᵀ` and a triangular solve against `R`.
//!
//! With `z = Qᵀy`:
//! - **Fitted values** `ŷ = Q·[z₁..z_p, 0, .., 0]`
//! - **Residuals** `y − ŷ = Q·[0, .., 0, z_{p+1}..z_n]`
//! - **Coefficients** `β = R⁻¹·[z₁..z_p]`
//!
//! The projector holds one `Qᵀ` and one `Q` [`QrApply`] over the same factorisation,
//! so each workspace is sized once and reused across responses.

use minarrow::{FloatArray, Vec64, vec64};

use crate::errors::{KernelError, log_length_mismatch};
use crate::kernels::scientific::blas_lapack::trisolve_upper;
use crate::kernels::scientific::qr::{QrMatrix, Transpose};
use crate::kernels::scientific::qr_apply::QrApply;
use crate::utils::lapack_int;

/// Projects responses onto, or away from, the column space of a factorised design.
#[derive(Debug)]
pub struct QrProjector<'a> {
    qr: QrMatrix<'a>,
    to_rotated: QrApply<'a>,
    from_rotated: QrApply<'a>,
}

impl<'a> QrProjector<'a> {
    /// Builds both directions over the same factorisation.
    ///
    /// Fails exactly as [`QrApply::new`] does.
    pub fn new(qr: QrMatrix<'a>, qraux: &'a [f64]) -> Result<Self, KernelError> {
        let to_rotated = QrApply::new(qr, qraux, Transpose::Yes)?;
        let from_rotated = QrApply::new(qr, qraux, Transpose::No)?;
        Ok(Self {
            qr,
            to_rotated,
            from_rotated,
        })
    }

    #[inline]
    pub fn nobs(&self) -> usize {
        self.to_rotated.nobs()
    }

    #[inline]
    pub fn ncoef(&self) -> usize {
        self.to_rotated.ncoef()
    }

    /// Residuals `y − ŷ`.
    pub fn residuals(&mut self, y: &[f64]) -> Result<FloatArray<f64>, KernelError> {
        let mut out = self.load(y, "QrProjector::residuals")?;
        self.residuals_in_place(&mut out)?;
        Ok(FloatArray::from_vec64(out, None))
    }

    /// Overwrites `y` with its residuals.
    pub fn residuals_in_place(&mut self, y: &mut [f64]) -> Result<(), KernelError> {
        self.check_len(y.len(), "QrProjector::residuals_in_place")?;
        let p = self.ncoef();
        self.to_rotated.apply(y)?;
        y[..p].fill(0.0);
        self.from_rotated.apply(y)
    }

    /// Fitted values `ŷ`.
    pub fn fitted(&mut self, y: &[f64]) -> Result<FloatArray<f64>, KernelError> {
        let mut out = self.load(y, "QrProjector::fitted")?;
        let p = self.ncoef();
        self.to_rotated.apply(&mut out)?;
        out[p..].fill(0.0);
        self.from_rotated.apply(&mut out)?;
        Ok(FloatArray::from_vec64(out, None))
    }

    /// Least-squares coefficients, solved against the `R` stored in the factorisation.
    ///
    /// Fails with `InvalidArguments` if `R` has an exactly zero diagonal entry.
    pub fn coefficients(&mut self, y: &[f64]) -> Result<FloatArray<f64>, KernelError> {
        let p = self.ncoef();
        let nobs = self.nobs();
        let mut z = self.load(y, "QrProjector::coefficients")?;
        if p == 0 {
            return Ok(FloatArray::from_vec64(Vec64::new(), None));
        }

        let r = self.qr.as_slice();
        if let Some(j) = (0..p).find(|&j| r[j + j * nobs] == 0.0) {
            return Err(KernelError::InvalidArguments(format!(
                "R is singular: diagonal entry {} is zero",
                j
            )));
        }

        self.to_rotated.apply(&mut z)?;
        let mut beta = vec64![0.0; p];
        beta.copy_from_slice(&z[..p]);

        let n = lapack_int(p, "ncoef")?;
        let ldu = lapack_int(self.qr.leading_dim(), "ldu")?;
        trisolve_upper(n, 1, r, ldu, &mut beta, n)?;
        Ok(FloatArray::from_vec64(beta, None))
    }

    fn load(&self, y: &[f64], fname: &str) -> Result<Vec64<f64>, KernelError> {
        self.check_len(y.len(), fname)?;
        let mut out = vec64![0.0; y.len()];
        out.copy_from_slice(y);
        Ok(out)
    }

    #[inline]
    fn check_len(&self, len: usize, fname: &str) -> Result<(), KernelError> {
        if len != self.nobs() {
            return Err(KernelError::LengthMismatch(log_length_mismatch(
                fname,
                self.nobs(),
                len,
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_response_len() {
        let qr = [2.0, 1.0, 0.0, 3.0, 4.0, 1.0];
        let qraux = [1.0, 1.0];
        let mut p = QrProjector::new(QrMatrix::new(&qr, 3, 2).unwrap(), &qraux).unwrap();
        assert!(matches!(
            p.residuals(&[1.0, 2.0]),
            Err(KernelError::LengthMismatch(_))
        ));
        let mut y = [0.0; 4];
        assert!(matches!(
            p.residuals_in_place(&mut y),
            Err(KernelError::LengthMismatch(_))
        ));
    }

    #[test]
    fn singular_r_is_reported() {
        // R = [[0, 1], [0, 1]] on top of zero reflectors
        let qr = [0.0, 0.0, 0.0, 1.0, 1.0, 0.0];
        let qraux = [0.0, 0.0];
        let mut p = QrProjector::new(QrMatrix::new(&qr, 3, 2).unwrap(), &qraux).unwrap();
        assert!(matches!(
            p.coefficients(&[1.0, 2.0, 3.0]),
            Err(KernelError::InvalidArguments(_))
        ));
    }

    #[test]
    fn no_coefficients_leaves_everything_in_residuals() {
        let qr: [f64; 0] = [];
        let qraux: [f64; 0] = [];
        let mut p = QrProjector::new(QrMatrix::new(&qr, 3, 0).unwrap(), &qraux).unwrap();
        let y = [1.0, -2.0, 0.5];
        let res = p.residuals(&y).unwrap();
        let fit = p.fitted(&y).unwrap();
        for i in 0..3 {
            assert_eq!(res.data[i], y[i]);
            assert_eq!(fit.data[i], 0.0);
        }
        assert_eq!(p.coefficients(&y).unwrap().data.len(), 0);
    }
}
