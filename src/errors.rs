// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Error Types** - *QR Kernel Error Handling*
//!
//! Error types for the QR kernels with structured error reporting.
//!
//! ## Error Categories
//! - **Length Errors**: auxiliary vector, right-hand side or response lengths that
//!   disagree with the factorisation's dimensions
//! - **Argument Errors**: malformed buffers, flags, or dimensions too large for LAPACK
//! - **LAPACK Errors**: a nonzero `info` status from the underlying routine, tagged with
//!   the routine name and the operation that was running
//!
//! Dimension errors are raised before any LAPACK call is made.

use core::fmt;
use std::error::Error;

/// The operation a LAPACK routine was performing when it reported failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LapackOperation {
    /// `lwork = -1` workspace size probe.
    WorkspaceQuery,
    /// Application of the orthogonal factor to a right-hand side.
    Apply,
    /// Householder QR factorisation of a design matrix.
    Factorise,
    /// Explicit formation of Q from its reflectors.
    FormQ,
}

impl fmt::Display for LapackOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LapackOperation::WorkspaceQuery => write!(f, "workspace query"),
            LapackOperation::Apply => write!(f, "apply"),
            LapackOperation::Factorise => write!(f, "factorisation"),
            LapackOperation::FormQ => write!(f, "Q formation"),
        }
    }
}

/// Error type for all QR kernel operations.
#[derive(Debug, Clone, PartialEq)]
pub enum KernelError {
    /// Buffer length disagrees with the factorisation dimensions.
    LengthMismatch(String),

    /// Invalid arguments provided to a kernel function.
    InvalidArguments(String),

    /// LAPACK returned a nonzero `info`.
    ///
    /// `info < 0` means argument number `-info` was illegal; `info > 0` is a
    /// routine-specific numerical failure.
    Lapack {
        routine: &'static str,
        operation: LapackOperation,
        info: i32,
    },
}

impl KernelError {
    /// The LAPACK status code, if this error came from LAPACK.
    pub fn lapack_info(&self) -> Option<i32> {
        match self {
            KernelError::Lapack { info, .. } => Some(*info),
            _ => None,
        }
    }
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::LengthMismatch(msg) => write!(f, "Length mismatch: {}", msg),
            KernelError::InvalidArguments(msg) => write!(f, "Invalid arguments: {}", msg),
            KernelError::Lapack {
                routine,
                operation,
                info,
            } if *info < 0 => write!(
                f,
                "LAPACK {} {} failed: argument {} was illegal",
                routine, operation, -info
            ),
            KernelError::Lapack {
                routine,
                operation,
                info,
            } => write!(
                f,
                "LAPACK {} {} failed with info = {}",
                routine, operation, info
            ),
        }
    }
}

impl Error for KernelError {}

/// Creates a formatted error message for length mismatches between an expected and a
/// supplied buffer length.
///
/// # Arguments
/// * `fname` - Function name where the mismatch occurred
/// * `expected` - Length required by the factorisation
/// * `got` - Length that was supplied
pub fn log_length_mismatch(fname: &str, expected: usize, got: usize) -> String {
    format!("{} => expected length {} got {}", fname, expected, got)
}

/// Translates a LAPACK `info` into a `Result`, emitting a warning on failure.
#[inline]
pub(crate) fn check_info(
    routine: &'static str,
    operation: LapackOperation,
    info: i32,
) -> Result<(), KernelError> {
    if info == 0 {
        return Ok(());
    }
    tracing::warn!(routine, %operation, info, "LAPACK routine reported failure");
    Err(KernelError::Lapack {
        routine,
        operation,
        info,
    })
}
