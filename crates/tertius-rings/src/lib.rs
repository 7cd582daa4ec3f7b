//! # tertius-rings
//!
//! Ring contexts for Tertius sparse linear algebra.
//!
//! A ring is described by a context value implementing [`Ring`]. Elements
//! are plain data; every operation goes through the context, so rings with
//! runtime parameters (a modulus chosen at runtime, say) need not store those
//! parameters in each element.
//!
//! This crate provides:
//! - The context trait [`Ring`] and the three-valued [`Truth`]
//! - Reference rings: Z/pZ ([`PrimeField`]), Z ([`Integers`]), Q ([`Rationals`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod finite_field;
pub mod integers;
pub mod rationals;
pub mod traits;

#[cfg(test)]
mod proptests;

pub use finite_field::{gf2, PrimeField};
pub use integers::Integers;
pub use rationals::Rationals;
pub use traits::{Ring, RingError, RingResult, Truth};
