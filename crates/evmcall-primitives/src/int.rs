//! Integer literals and signed 256-bit values

use std::fmt;
use std::str::FromStr;

use primitive_types::U256;
use thiserror::Error;

/// Integer literal parsing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntError {
    /// Not a base-10 or `0x` hex literal
    #[error("invalid integer literal: {0:?}")]
    Invalid(String),
    /// Magnitude does not fit in 256 bits
    #[error("integer literal exceeds 256 bits: {0:?}")]
    Overflow(String),
}

/// Parse an unsigned literal: base-10, or hex with a `0x` prefix.
pub fn parse_u256(s: &str) -> Result<U256, IntError> {
    let trimmed = s.trim();
    let invalid = || IntError::Invalid(s.to_string());

    if let Some(digits) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let significant = digits.trim_start_matches('0');
        if significant.len() > 64 {
            return Err(IntError::Overflow(s.to_string()));
        }
        let padded = format!("{:0>64}", significant);
        let mut word = [0u8; 32];
        hex::decode_to_slice(&padded, &mut word).map_err(|_| invalid())?;
        return Ok(U256::from_big_endian(&word));
    }

    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    // only overflow is left once every character is a digit
    U256::from_dec_str(digits).map_err(|_| IntError::Overflow(s.to_string()))
}

/// True if `value` lies in `[0, 2^bits)`.
pub fn fits_unsigned(value: &U256, bits: usize) -> bool {
    value.bits() <= bits
}

/// Signed 256-bit integer kept as sign and magnitude.
///
/// Zero is never negative, so two values compare equal iff they denote the
/// same integer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct I256 {
    abs: U256,
    negative: bool,
}

impl I256 {
    /// Zero
    pub const ZERO: I256 = I256 {
        abs: U256::zero(),
        negative: false,
    };

    /// Create from magnitude and sign
    pub fn new(abs: U256, negative: bool) -> Self {
        Self {
            abs,
            negative: negative && !abs.is_zero(),
        }
    }

    /// Create from i128
    pub fn from_i128(value: i128) -> Self {
        Self::new(U256::from(value.unsigned_abs()), value < 0)
    }

    /// Magnitude
    pub fn abs(&self) -> U256 {
        self.abs
    }

    /// Sign
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.abs.is_zero()
    }

    /// True if the value lies in `[-2^(bits-1), 2^(bits-1))`.
    pub fn fits_signed(&self, bits: usize) -> bool {
        if bits == 0 || bits > 256 {
            return false;
        }
        let limit = U256::one() << (bits - 1);
        if self.negative {
            self.abs <= limit
        } else {
            self.abs < limit
        }
    }

    /// 32-byte two's complement encoding.
    ///
    /// Only meaningful when `fits_signed(256)` holds.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let value = if self.negative {
            (!self.abs).overflowing_add(U256::one()).0
        } else {
            self.abs
        };
        let mut word = [0u8; 32];
        value.to_big_endian(&mut word);
        word
    }
}

impl FromStr for I256 {
    type Err = IntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        if rest.starts_with(['-', '+']) {
            return Err(IntError::Invalid(s.to_string()));
        }
        let abs = parse_u256(rest).map_err(|e| match e {
            IntError::Invalid(_) => IntError::Invalid(s.to_string()),
            IntError::Overflow(_) => IntError::Overflow(s.to_string()),
        })?;
        Ok(Self::new(abs, negative))
    }
}

impl From<i128> for I256 {
    fn from(value: i128) -> Self {
        Self::from_i128(value)
    }
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.abs)
        } else {
            write!(f, "{}", self.abs)
        }
    }
}

impl fmt::Debug for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I256({})", self)
    }
}
