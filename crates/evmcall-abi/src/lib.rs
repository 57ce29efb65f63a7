//! # evmcall-abi
//!
//! Builds EVM contract call data from a function signature (or an
//! interface description) and an ordered list of argument values.
//!
//! ## Pipeline
//!
//! - **Signature Parser**: `name(type,...)` text into [`FunctionSignature`]
//! - **Value Normalizer**: raw [`Value`]s checked against their declared
//!   [`TypeDescriptor`] into [`NormalizedValue`]s
//! - **ABI Codec**: 4-byte selector plus head/tail encoded body
//!
//! Addresses, fixed-width integers, tuples and arrays are built in. Other
//! leaf types (`bool`, `bytes32`, `string`, ...) are rejected with
//! [`AbiError::UnsupportedType`] unless a [`LeafCodec`] is registered.
//!
//! ## Quick Start
//!
//! ```rust
//! use evmcall_abi::{encode_call, CallEncoder, Value};
//!
//! let data = encode_call(
//!     "collect((uint256,address,uint128,uint128))",
//!     "collect",
//!     &[Value::seq(vec![
//!         Value::from(1001235u64),
//!         Value::from("0xe317d37afb4ea9882e09e83fa3742723d789f0c3"),
//!         Value::from(u128::MAX),
//!         Value::from(u128::MAX),
//!     ])],
//! )?;
//! assert!(data.starts_with("0xfc6f7865"));
//!
//! // Opt in to the standard leaf codecs
//! let encoder = CallEncoder::default().with_standard_leaf_types();
//! let call = encoder.encode("baz(uint32,bool)", "baz", &[69u32.into(), true.into()])?;
//! assert_eq!(call.selector, [0xcd, 0xcd, 0x77, 0xc0]);
//! # Ok::<(), evmcall_abi::AbiError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod encode;
mod encoder;
mod error;
mod interface;
pub mod leaf;
mod normalize;
pub mod signature;
mod types;
mod value;

pub use config::{EncoderConfig, DEFAULT_MAX_NESTING_DEPTH};
pub use encode::{encode, encode_with, function_selector, EncodedCall};
pub use encoder::{encode_call, CallEncoder, CallTarget};
pub use error::AbiError;
pub use interface::{resolve_from_interface, AbiEntry, AbiParam, Interface};
pub use leaf::{LeafCodec, LeafRegistry};
pub use normalize::{normalize, ChecksumRule, Eip55, Normalizer};
pub use signature::{canonicalize, parse, parse_type, SignatureParser};
pub use types::{FunctionSignature, TypeDescriptor};
pub use value::{LeafData, NormalizedValue, Value};

// Re-export primitives for convenience
pub use evmcall_primitives::{Address, I256, U256};
