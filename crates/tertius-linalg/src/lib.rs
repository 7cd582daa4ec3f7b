//! # tertius-linalg
//!
//! Exact sparse linear algebra over any [`Ring`](tertius_rings::Ring).
//!
//! This crate provides:
//! - Sparse vectors and matrices in CSR, LIL (list of rows) and COO
//!   (triplet) formats, with conversions between them and to dense
//! - An arithmetic kernel: products with vectors and dense blocks,
//!   elementwise and scalar operations
//! - Sparse LU with Markowitz pivoting and sparse reduced row echelon form
//! - Randomized Krylov solvers: Lanczos, block Lanczos, Wiedemann and block
//!   Wiedemann
//! - Kernel basis assembly on top of any of the Krylov solvers
//!
//! ## Choosing a method
//!
//! - Small or moderately sparse systems: [`LilMatrix::lu`] or
//!   [`LilMatrix::rref`], which are deterministic.
//! - Large sparse systems over a field: a [`KrylovSolver`]. These never
//!   fill in the matrix, but can fail on unlucky random choices; failures
//!   have [`ErrorKind::Unable`] and are worth retrying.
//!
//! Nothing here installs a `tracing` subscriber; solver progress is emitted
//! at `debug` and `trace` level for the caller to collect.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod arith;
pub mod berlekamp_massey;
pub mod convert;
pub mod coo;
pub mod csr;
pub mod dense_matrix;
pub mod dense_vec;
pub mod error;
pub mod krylov;
pub mod lil;
pub mod lu;
pub mod merge;
pub mod nullspace;
pub mod rref;
pub mod sparse_vec;

pub use arith::RowMajor;
pub use berlekamp_massey::{berlekamp_massey, BerlekampMasseyResult};
pub use coo::CooMatrix;
pub use csr::CsrMatrix;
pub use dense_matrix::DenseMatrix;
pub use error::{ErrorKind, LinalgError, Result};
pub use krylov::{
    BlockLanczos, BlockLanczosConfig, BlockWiedemann, BlockWiedemannConfig, KrylovSolver, Lanczos,
    LanczosConfig, Wiedemann, WiedemannConfig,
};
pub use lil::{LilMatrix, LilWindow};
pub use lu::LuDecomposition;
pub use nullspace::{nullspace, NullspaceConfig};
pub use rref::Rref;
pub use sparse_vec::SparseVector;

#[cfg(test)]
mod proptests;
