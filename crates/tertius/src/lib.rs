//! # Tertius
//!
//! Exact sparse linear algebra over abstract rings.
//!
//! This crate re-exports the ring layer ([`rings`]) and the sparse linear
//! algebra engine ([`linalg`]) behind one dependency.
//!
//! ## Quick Start
//!
//! ```rust
//! use tertius::prelude::*;
//!
//! let f = PrimeField::new(5);
//! let m = CsrMatrix::from_triplets(&f, 2, 2, &[(0, 0, 1), (0, 1, 2), (1, 0, 3)]).unwrap();
//! assert_eq!(m.mul_vec(&[1, 1]).unwrap(), vec![3, 3]);
//! assert_eq!(m.to_lil().rank().unwrap(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use tertius_linalg as linalg;
pub use tertius_rings as rings;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use tertius_linalg::{
        nullspace, BlockLanczos, BlockWiedemann, CooMatrix, CsrMatrix, DenseMatrix, ErrorKind,
        KrylovSolver, Lanczos, LilMatrix, LinalgError, NullspaceConfig, SparseVector, Wiedemann,
    };
    pub use tertius_rings::{Integers, PrimeField, Rationals, Ring, Truth};
}
