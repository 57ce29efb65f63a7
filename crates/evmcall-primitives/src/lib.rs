//! # evmcall-primitives
//!
//! Primitive types shared by the evmcall crates: 20-byte addresses,
//! 256-bit digests and the signed/unsigned 256-bit integers that fill ABI
//! words.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod hash;
mod int;

pub use address::{Address, AddressError};
pub use hash::H256;
pub use int::{fits_unsigned, parse_u256, IntError, I256};

// Re-export primitive-types for U256
pub use primitive_types::U256;
