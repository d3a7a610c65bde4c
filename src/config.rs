// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

// These parameters follow the LAPACK calling convention and should not need adjustment.

//! # **Configuration Constants** - *LAPACK Calling Convention Parameters*
//!
//! Global configuration constants shared by the LAPACK-backed QR kernels.

/// `lwork` value that turns a LAPACK call into a workspace size query.
///
/// With this value the routine only writes the optimal workspace length into `work[0]`
/// and returns without touching its operands.
pub const WORKSPACE_QUERY: i32 = -1;

/// Smallest workspace LAPACK accepts, even for empty problems.
pub const MIN_WORKSPACE_LEN: usize = 1;

/// Number of right-hand-side columns handed to `dormqr` per call.
///
/// Multi-column buffers are transformed one column at a time so that the workspace
/// sized at construction stays valid.
pub const SINGLE_RHS: i32 = 1;
