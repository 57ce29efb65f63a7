//! # evmcall-uniswap
//!
//! Call data builders for Uniswap V3 contracts.
//!
//! Each builder fixes a signature and function name, arranges its typed
//! parameters in declaration order and hands them to
//! [`evmcall_abi::encode_call`]. Range checks (`uint24` fees, `int24`
//! ticks, `uint160` price limits) are left to the encoder.
//!
//! ## Example
//!
//! ```rust
//! use evmcall_uniswap::position_manager;
//!
//! let data = position_manager::burn(198395u64.into())?;
//! assert_eq!(
//!     data,
//!     "0x42966c6800000000000000000000000000000000000000000000000000000000000306fb"
//! );
//! # Ok::<(), evmcall_abi::AbiError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod pool;
pub mod position_manager;
pub mod router;

pub use position_manager::{CollectParams, DecreaseLiquidityParams, IncreaseLiquidityParams, MintParams};
pub use router::{ExactInputSingleParams, ExactOutputSingleParams};

use evmcall_abi::{encode_call, AbiError, Value};

/// Encode through the default encoder
fn call(signature: &str, function_name: &str, args: &[Value]) -> Result<String, AbiError> {
    tracing::trace!("Building {} call", function_name);
    encode_call(signature, function_name, args)
}
