//! Leaf codecs for types without a built-in encoding rule
//!
//! The core only knows addresses, integers, tuples and arrays. Any other
//! leaf type text (`bool`, `bytes32`, `string`, ...) is rejected unless a
//! [`LeafCodec`] is registered for that exact text.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use evmcall_primitives::U256;

use crate::Value;

/// Encoding rule for one leaf type
pub trait LeafCodec: Send + Sync {
    /// Dynamic leaves go to the tail behind an offset
    fn is_dynamic(&self) -> bool;

    /// Encode a value.
    ///
    /// Static codecs return exactly one 32-byte word; dynamic codecs return
    /// their whole tail content, a multiple of 32 bytes.
    fn encode(&self, value: &Value) -> Result<Vec<u8>, String>;
}

/// Leaf codecs keyed by canonical type text
#[derive(Clone, Default)]
pub struct LeafRegistry {
    codecs: HashMap<String, Arc<dyn LeafCodec>>,
}

impl LeafRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `bool`, `bytes1`..`bytes32`, `bytes` and `string`
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register_standard();
        registry
    }

    /// Add the standard codecs to this registry
    pub fn register_standard(&mut self) {
        self.register("bool", BoolCodec);
        self.register("bytes", BytesCodec);
        self.register("string", StringCodec);
        for size in 1..=32 {
            self.register(format!("bytes{}", size), FixedBytesCodec { size });
        }
    }

    /// Register (or replace) the codec for `type_name`
    pub fn register(&mut self, type_name: impl Into<String>, codec: impl LeafCodec + 'static) {
        self.codecs.insert(type_name.into(), Arc::new(codec));
    }

    /// Codec for `type_name`
    pub fn get(&self, type_name: &str) -> Option<&Arc<dyn LeafCodec>> {
        self.codecs.get(type_name)
    }

    /// Whether `type_name` has a codec
    pub fn contains(&self, type_name: &str) -> bool {
        self.codecs.contains_key(type_name)
    }

    /// Whether the codec for `type_name` is dynamic; unknown types are not
    pub fn is_dynamic(&self, type_name: &str) -> bool {
        self.codecs.get(type_name).is_some_and(|c| c.is_dynamic())
    }
}

impl fmt::Debug for LeafRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.codecs.keys().collect();
        names.sort();
        f.debug_struct("LeafRegistry").field("types", &names).finish()
    }
}

/// `bool`: a word holding 0 or 1
#[derive(Debug, Clone, Copy)]
pub struct BoolCodec;

impl LeafCodec for BoolCodec {
    fn is_dynamic(&self) -> bool {
        false
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, String> {
        match value {
            Value::Bool(b) => {
                let mut buf = [0u8; 32];
                buf[31] = u8::from(*b);
                Ok(buf.to_vec())
            }
            other => Err(format!("expected bool, got {}", other.kind())),
        }
    }
}

/// `bytesN`: up to N bytes, right-padded into one word
#[derive(Debug, Clone, Copy)]
pub struct FixedBytesCodec {
    /// N, 1 to 32
    pub size: usize,
}

impl LeafCodec for FixedBytesCodec {
    fn is_dynamic(&self) -> bool {
        false
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, String> {
        if self.size == 0 || self.size > 32 {
            return Err(format!("bytes{} is not a valid fixed-size byte type", self.size));
        }
        let data = byte_payload(value)?;
        if data.len() > self.size {
            return Err(format!("{} bytes do not fit bytes{}", data.len(), self.size));
        }
        let mut buf = [0u8; 32];
        buf[..data.len()].copy_from_slice(&data);
        Ok(buf.to_vec())
    }
}

/// `bytes`: length word then right-padded data
#[derive(Debug, Clone, Copy)]
pub struct BytesCodec;

impl LeafCodec for BytesCodec {
    fn is_dynamic(&self) -> bool {
        true
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, String> {
        Ok(encode_bytes(&byte_payload(value)?))
    }
}

/// `string`: UTF-8 bytes laid out like `bytes`
#[derive(Debug, Clone, Copy)]
pub struct StringCodec;

impl LeafCodec for StringCodec {
    fn is_dynamic(&self) -> bool {
        true
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, String> {
        match value {
            Value::Str(s) => Ok(encode_bytes(s.as_bytes())),
            other => Err(format!("expected string, got {}", other.kind())),
        }
    }
}

/// Bytes from `Value::Bytes`, a `0x` hex string, or the UTF-8 of any other string
fn byte_payload(value: &Value) -> Result<Vec<u8>, String> {
    match value {
        Value::Bytes(b) => Ok(b.clone()),
        Value::Str(s) => match s.strip_prefix("0x") {
            Some(digits) => hex::decode(digits).map_err(|e| format!("invalid hex {:?}: {}", s, e)),
            None => Ok(s.as_bytes().to_vec()),
        },
        other => Err(format!("expected bytes, got {}", other.kind())),
    }
}

/// Encode dynamic bytes
fn encode_bytes(data: &[u8]) -> Vec<u8> {
    let mut result = vec![0u8; 32];
    U256::from(data.len()).to_big_endian(&mut result);

    let padded_len = data.len().div_ceil(32) * 32;
    let mut padded = vec![0u8; padded_len];
    padded[..data.len()].copy_from_slice(data);
    result.extend(padded);

    result
}
