//! # evmcall-crypto
//!
//! Cryptographic primitives for evmcall.
//!
//! - Keccak-256 hashing
//! - EIP-55 mixed-case address checksums

#![warn(missing_docs)]
#![warn(clippy::all)]

mod checksum;
mod hash;

pub use checksum::to_checksum_address;
pub use hash::keccak256;
