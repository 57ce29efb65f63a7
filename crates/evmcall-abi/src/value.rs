//! Raw call arguments and their encoder-ready form

use std::fmt;

use evmcall_primitives::{Address, I256, U256};

/// A caller-supplied argument, before it is checked against a type.
///
/// Tuples and arrays are both given as `Seq`; which one is meant comes from
/// the declared type, never from the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Signed native integer
    Int(I256),
    /// Unsigned native integer
    Uint(U256),
    /// Text: hex address, base-10 or `0x` integer literal, string payload
    Str(String),
    /// Boolean
    Bool(bool),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Already-parsed address
    Address(Address),
    /// Ordered sequence (tuple fields or array elements)
    Seq(Vec<Value>),
}

impl Value {
    /// Raw byte payload
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(data.into())
    }

    /// Sequence from anything convertible
    pub fn seq<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }

    /// Short name of the variant, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Uint(_) => "unsigned integer",
            Value::Str(_) => "string",
            Value::Bool(_) => "bool",
            Value::Bytes(_) => "bytes",
            Value::Address(_) => "address",
            Value::Seq(_) => "sequence",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Uint(v) => write!(f, "{}", v),
            Value::Str(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            Value::Address(a) => write!(f, "{}", a),
            Value::Seq(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(I256::from_i128(v as i128))
            }
        }
    )*};
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Uint(U256::from(v))
            }
        }
    )*};
}

impl_from_signed!(i8, i16, i32, i64, i128, isize);
impl_from_unsigned!(u8, u16, u32, u64, u128, usize);

impl From<U256> for Value {
    fn from(v: U256) -> Self {
        Value::Uint(v)
    }
}

impl From<I256> for Value {
    fn from(v: I256) -> Self {
        Value::Int(v)
    }
}

impl From<Address> for Value {
    fn from(v: Address) -> Self {
        Value::Address(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::seq(v)
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(v: [T; N]) -> Self {
        Value::seq(v)
    }
}

impl From<serde_json::Value> for Value {
    /// Numbers become integers, arrays sequences. Floats, objects and
    /// `null` are kept as their JSON text and fail type validation later.
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match v {
            Json::Bool(b) => Value::Bool(b),
            Json::String(s) => Value::Str(s),
            Json::Array(items) => Value::seq(items),
            Json::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Value::Uint(U256::from(u))
                } else if let Some(i) = n.as_i64() {
                    Value::Int(I256::from_i128(i as i128))
                } else {
                    Value::Str(n.to_string())
                }
            }
            other => Value::Str(other.to_string()),
        }
    }
}

/// Leaf bytes produced by a registered leaf codec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafData {
    /// Whether the bytes go to the tail behind an offset
    pub dynamic: bool,
    /// One 32-byte word when static, the full tail content when dynamic
    pub data: Vec<u8>,
}

/// An argument after validation against exactly one [`TypeDescriptor`].
///
/// [`TypeDescriptor`]: crate::TypeDescriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedValue {
    /// Address with its display form
    Address {
        /// Raw bytes, what gets encoded
        address: Address,
        /// Mixed-case checksum rendering
        checksummed: String,
    },
    /// Unsigned integer within its declared width
    Uint(U256),
    /// Signed integer within its declared width
    Int(I256),
    /// Tuple fields in declared order
    Tuple(Vec<NormalizedValue>),
    /// Array elements; `fixed` mirrors the declared length being present
    Array {
        /// Elements, each validated against the same element type
        elements: Vec<NormalizedValue>,
        /// Declared with `[N]`
        fixed: bool,
    },
    /// Opaque type handled by a leaf codec
    Leaf(LeafData),
    /// Opaque type passed through unvalidated
    Opaque(Value),
}

impl NormalizedValue {
    /// Short name of the variant, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            NormalizedValue::Address { .. } => "address",
            NormalizedValue::Uint(_) => "unsigned integer",
            NormalizedValue::Int(_) => "signed integer",
            NormalizedValue::Tuple(_) => "tuple",
            NormalizedValue::Array { .. } => "array",
            NormalizedValue::Leaf(_) => "leaf",
            NormalizedValue::Opaque(_) => "opaque value",
        }
    }
}
