//! Direct UniswapV3Pool calls, bypassing the position manager

use evmcall_abi::{AbiError, CallEncoder, Value};
use evmcall_primitives::Address;

use crate::call;

/// `mint` signature
pub const MINT: &str = "mint(address,int24,int24,uint128,bytes)";
/// `burn` signature
pub const BURN: &str = "burn(int24,int24,uint128)";
/// `collect` signature
pub const COLLECT: &str = "collect((address,int24,int24,uint128,uint128))";

/// Add liquidity for `owner`; no position NFT is issued.
///
/// `data` is passed back to the caller's mint callback.
pub fn mint(
    owner: Address,
    tick_lower: i32,
    tick_upper: i32,
    amount: u128,
    data: &[u8],
) -> Result<String, AbiError> {
    tracing::trace!("Building mint call");
    CallEncoder::default().with_standard_leaf_types().encode_hex(
        MINT,
        "mint",
        &[
            owner.into(),
            tick_lower.into(),
            tick_upper.into(),
            amount.into(),
            Value::bytes(data),
        ],
    )
}

/// Burn liquidity from the sender's position
pub fn burn(tick_lower: i32, tick_upper: i32, amount: u128) -> Result<String, AbiError> {
    call(BURN, "burn", &[tick_lower.into(), tick_upper.into(), amount.into()])
}

/// Collect fees owed to a position
pub fn collect(
    recipient: Address,
    tick_lower: i32,
    tick_upper: i32,
    amount0_requested: u128,
    amount1_requested: u128,
) -> Result<String, AbiError> {
    let params = Value::Seq(vec![
        recipient.into(),
        tick_lower.into(),
        tick_upper.into(),
        amount0_requested.into(),
        amount1_requested.into(),
    ]);
    call(COLLECT, "collect", &[params])
}
