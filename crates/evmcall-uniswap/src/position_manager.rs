//! NonfungiblePositionManager calls

use evmcall_abi::{AbiError, Value};
use evmcall_primitives::{Address, U256};

use crate::call;

/// `mint` signature
pub const MINT: &str =
    "mint((address,address,uint24,int24,int24,uint256,uint256,uint256,uint256,address,uint256))";
/// `burn` signature
pub const BURN: &str = "burn(uint256)";
/// `collect` signature
pub const COLLECT: &str = "collect((uint256,address,uint128,uint128))";
/// `increaseLiquidity` signature
pub const INCREASE_LIQUIDITY: &str = "increaseLiquidity((uint256,uint256,uint256,uint256,uint256,uint256))";
/// `decreaseLiquidity` signature
pub const DECREASE_LIQUIDITY: &str = "decreaseLiquidity((uint256,uint128,uint256,uint256,uint256))";

/// Parameters of `mint`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintParams {
    /// First token of the pool
    pub token0: Address,
    /// Second token of the pool
    pub token1: Address,
    /// Fee tier in hundredths of a bip (3000 = 0.3%)
    pub fee: u32,
    /// Lower tick of the position
    pub tick_lower: i32,
    /// Upper tick of the position
    pub tick_upper: i32,
    /// Desired amount of token0
    pub amount0_desired: U256,
    /// Desired amount of token1
    pub amount1_desired: U256,
    /// Minimum amount of token0 to spend
    pub amount0_min: U256,
    /// Minimum amount of token1 to spend
    pub amount1_min: U256,
    /// Receiver of the position NFT
    pub recipient: Address,
    /// Unix timestamp after which the call reverts
    pub deadline: U256,
}

impl From<&MintParams> for Value {
    fn from(p: &MintParams) -> Self {
        Value::Seq(vec![
            p.token0.into(),
            p.token1.into(),
            p.fee.into(),
            p.tick_lower.into(),
            p.tick_upper.into(),
            p.amount0_desired.into(),
            p.amount1_desired.into(),
            p.amount0_min.into(),
            p.amount1_min.into(),
            p.recipient.into(),
            p.deadline.into(),
        ])
    }
}

/// Parameters of `collect`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectParams {
    /// Position NFT id
    pub token_id: U256,
    /// Receiver of the collected tokens
    pub recipient: Address,
    /// Most token0 to collect
    pub amount0_max: u128,
    /// Most token1 to collect
    pub amount1_max: u128,
}

impl CollectParams {
    /// Collect everything owed to `token_id`
    pub fn all(token_id: U256, recipient: Address) -> Self {
        Self {
            token_id,
            recipient,
            amount0_max: u128::MAX,
            amount1_max: u128::MAX,
        }
    }
}

impl From<&CollectParams> for Value {
    fn from(p: &CollectParams) -> Self {
        Value::Seq(vec![
            p.token_id.into(),
            p.recipient.into(),
            p.amount0_max.into(),
            p.amount1_max.into(),
        ])
    }
}

/// Parameters of `increaseLiquidity`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncreaseLiquidityParams {
    /// Position NFT id
    pub token_id: U256,
    /// Desired amount of token0
    pub amount0_desired: U256,
    /// Desired amount of token1
    pub amount1_desired: U256,
    /// Minimum amount of token0 to spend
    pub amount0_min: U256,
    /// Minimum amount of token1 to spend
    pub amount1_min: U256,
    /// Unix timestamp after which the call reverts
    pub deadline: U256,
}

impl From<&IncreaseLiquidityParams> for Value {
    fn from(p: &IncreaseLiquidityParams) -> Self {
        Value::Seq(vec![
            p.token_id.into(),
            p.amount0_desired.into(),
            p.amount1_desired.into(),
            p.amount0_min.into(),
            p.amount1_min.into(),
            p.deadline.into(),
        ])
    }
}

/// Parameters of `decreaseLiquidity`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecreaseLiquidityParams {
    /// Position NFT id
    pub token_id: U256,
    /// Liquidity to remove
    pub liquidity: u128,
    /// Minimum token0 accounted for the burned liquidity
    pub amount0_min: U256,
    /// Minimum token1 accounted for the burned liquidity
    pub amount1_min: U256,
    /// Unix timestamp after which the call reverts
    pub deadline: U256,
}

impl From<&DecreaseLiquidityParams> for Value {
    fn from(p: &DecreaseLiquidityParams) -> Self {
        Value::Seq(vec![
            p.token_id.into(),
            p.liquidity.into(),
            p.amount0_min.into(),
            p.amount1_min.into(),
            p.deadline.into(),
        ])
    }
}

/// Open a new position
pub fn mint(params: &MintParams) -> Result<String, AbiError> {
    call(MINT, "mint", &[params.into()])
}

/// Burn an empty position NFT; liquidity and owed tokens must be zero
pub fn burn(token_id: U256) -> Result<String, AbiError> {
    call(BURN, "burn", &[token_id.into()])
}

/// Collect owed tokens of a position
pub fn collect(params: &CollectParams) -> Result<String, AbiError> {
    call(COLLECT, "collect", &[params.into()])
}

/// Add liquidity to an existing position
pub fn increase_liquidity(params: &IncreaseLiquidityParams) -> Result<String, AbiError> {
    call(INCREASE_LIQUIDITY, "increaseLiquidity", &[params.into()])
}

/// Remove liquidity; the tokens become owed to the position
pub fn decrease_liquidity(params: &DecreaseLiquidityParams) -> Result<String, AbiError> {
    call(DECREASE_LIQUIDITY, "decreaseLiquidity", &[params.into()])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    #[test]
    fn test_selectors() {
        assert!(burn(U256::one()).unwrap().starts_with("0x42966c68"));
        assert!(collect(&CollectParams::all(U256::one(), addr(1))).unwrap().starts_with("0xfc6f7865"));

        let increase = IncreaseLiquidityParams {
            token_id: U256::from(12345u64),
            amount0_desired: U256::exp10(18),
            amount1_desired: U256::exp10(18),
            amount0_min: U256::from(950_000_000_000_000_000u64),
            amount1_min: U256::from(950_000_000_000_000_000u64),
            deadline: U256::from(1_640_995_200u64),
        };
        let data = increase_liquidity(&increase).unwrap();
        assert!(data.starts_with("0x219f5d17"));
        assert_eq!(data.len(), 2 + 8 + 6 * 64);
    }

    #[test]
    fn test_mint_fee_out_of_range() {
        let params = MintParams {
            token0: addr(1),
            token1: addr(2),
            fee: 1 << 24,
            tick_lower: -60,
            tick_upper: 60,
            amount0_desired: U256::zero(),
            amount1_desired: U256::zero(),
            amount0_min: U256::zero(),
            amount1_min: U256::zero(),
            recipient: addr(3),
            deadline: U256::zero(),
        };
        match mint(&params) {
            Err(AbiError::IntegerOutOfRange { position, ty, .. }) => {
                assert_eq!(position, "arg0.2");
                assert_eq!(ty, "uint24");
            }
            other => panic!("Expected IntegerOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_mint_tick_out_of_range() {
        let params = MintParams {
            token0: addr(1),
            token1: addr(2),
            fee: 3000,
            tick_lower: -(1 << 23) - 1,
            tick_upper: 60,
            amount0_desired: U256::zero(),
            amount1_desired: U256::zero(),
            amount0_min: U256::zero(),
            amount1_min: U256::zero(),
            recipient: addr(3),
            deadline: U256::zero(),
        };
        assert!(matches!(
            mint(&params),
            Err(AbiError::IntegerOutOfRange { ref position, .. }) if position == "arg0.3"
        ));
    }
}
