//! SwapRouter calls

use evmcall_abi::{AbiError, Value};
use evmcall_primitives::{Address, U256};

use crate::call;

/// `exactInputSingle` signature
pub const EXACT_INPUT_SINGLE: &str =
    "exactInputSingle((address,address,uint24,address,uint256,uint256,uint256,uint160))";
/// `exactOutputSingle` signature
pub const EXACT_OUTPUT_SINGLE: &str =
    "exactOutputSingle((address,address,uint24,address,uint256,uint256,uint256,uint160))";

/// Parameters of `exactInputSingle`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactInputSingleParams {
    /// Token sold
    pub token_in: Address,
    /// Token bought
    pub token_out: Address,
    /// Fee tier of the pool
    pub fee: u32,
    /// Receiver of the bought tokens
    pub recipient: Address,
    /// Unix timestamp after which the swap reverts
    pub deadline: U256,
    /// Exact amount sold
    pub amount_in: U256,
    /// Least amount bought
    pub amount_out_minimum: U256,
    /// Price limit as sqrt(price) * 2^96, zero for none
    pub sqrt_price_limit_x96: U256,
}

impl From<&ExactInputSingleParams> for Value {
    fn from(p: &ExactInputSingleParams) -> Self {
        Value::Seq(vec![
            p.token_in.into(),
            p.token_out.into(),
            p.fee.into(),
            p.recipient.into(),
            p.deadline.into(),
            p.amount_in.into(),
            p.amount_out_minimum.into(),
            p.sqrt_price_limit_x96.into(),
        ])
    }
}

/// Parameters of `exactOutputSingle`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactOutputSingleParams {
    /// Token sold
    pub token_in: Address,
    /// Token bought
    pub token_out: Address,
    /// Fee tier of the pool
    pub fee: u32,
    /// Receiver of the bought tokens
    pub recipient: Address,
    /// Unix timestamp after which the swap reverts
    pub deadline: U256,
    /// Exact amount bought
    pub amount_out: U256,
    /// Most amount sold
    pub amount_in_maximum: U256,
    /// Price limit as sqrt(price) * 2^96, zero for none
    pub sqrt_price_limit_x96: U256,
}

impl From<&ExactOutputSingleParams> for Value {
    fn from(p: &ExactOutputSingleParams) -> Self {
        Value::Seq(vec![
            p.token_in.into(),
            p.token_out.into(),
            p.fee.into(),
            p.recipient.into(),
            p.deadline.into(),
            p.amount_out.into(),
            p.amount_in_maximum.into(),
            p.sqrt_price_limit_x96.into(),
        ])
    }
}

/// Swap an exact input amount through one pool
pub fn exact_input_single(params: &ExactInputSingleParams) -> Result<String, AbiError> {
    call(EXACT_INPUT_SINGLE, "exactInputSingle", &[params.into()])
}

/// Swap for an exact output amount through one pool
pub fn exact_output_single(params: &ExactOutputSingleParams) -> Result<String, AbiError> {
    call(EXACT_OUTPUT_SINGLE, "exactOutputSingle", &[params.into()])
}
