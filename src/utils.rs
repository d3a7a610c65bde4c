// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Utility Functions** - *LAPACK Marshalling Helpers*
//!
//! Dimension conversion and buffer helpers shared by the QR kernels.

use crate::config::MIN_WORKSPACE_LEN;
use crate::errors::KernelError;

/// Converts a dimension to the 32-bit integer LAPACK expects.
#[inline(always)]
pub fn lapack_int(value: usize, what: &str) -> Result<i32, KernelError> {
    i32::try_from(value).map_err(|_| {
        KernelError::InvalidArguments(format!(
            "{} = {} exceeds the LAPACK integer range",
            what, value
        ))
    })
}

/// Leading dimension for a column-major matrix with `nrow` rows.
///
/// LAPACK requires `ld >= max(1, nrow)`, including for empty matrices.
#[inline(always)]
pub fn leading_dim(nrow: usize) -> usize {
    nrow.max(1)
}

/// Number of elements LAPACK may touch in a column-major `nrow × ncol` matrix stored
/// with leading dimension `ld`.
#[inline(always)]
pub fn col_major_extent(nrow: usize, ncol: usize, ld: usize) -> usize {
    if nrow == 0 || ncol == 0 {
        0
    } else {
        ld * (ncol - 1) + nrow
    }
}

/// Workspace length from the value LAPACK wrote into `work[0]` during a query,
/// rounded to the nearest integer.
#[inline(always)]
pub fn workspace_len(reported: f64) -> usize {
    let rounded = (reported + 0.5).floor();
    if rounded.is_finite() && rounded > MIN_WORKSPACE_LEN as f64 {
        rounded as usize
    } else {
        MIN_WORKSPACE_LEN
    }
}
