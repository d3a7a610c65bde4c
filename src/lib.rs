// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under the Mozilla Public License (MPL) 2.0.
// See LICENSE for details.

//! # **QR Kernels**
//!
//! Applies the implicit orthogonal factor of a Householder QR factorisation through
//! LAPACK `DORMQR`, and builds least-squares fitted values, residuals and coefficients
//! on top of it.
//!
//! ```ignore
//! use qr_kernels::kernels::scientific::qr::{QrFactors, Transpose};
//! use qr_kernels::kernels::scientific::qr_apply::QrApply;
//!
//! let factors = QrFactors::factorise(&x, nobs, ncoef)?;
//! let mut qt = QrApply::new(factors.view(), factors.qraux(), Transpose::Yes)?;
//! qt.apply(&mut y)?; // y ← Qᵀy
//! ```

// Link OpenBLAS when linear_algebra feature is enabled.
// This forces the linker to include the OpenBLAS symbols.
#[cfg(feature = "linear_algebra")]
extern crate openblas_src;

pub mod kernels {
    pub mod scientific {
        #[cfg(feature = "linear_algebra")]
        pub mod blas_lapack;
        #[cfg(feature = "linear_algebra")]
        pub mod projection;
        #[cfg(feature = "linear_algebra")]
        pub mod qr;
        #[cfg(feature = "linear_algebra")]
        pub mod qr_apply;
    }
}

pub mod config;
pub mod errors;
pub mod utils;
