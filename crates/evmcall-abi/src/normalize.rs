//! Type-directed argument normalization
//!
//! Walks a [`TypeDescriptor`] and the matching raw [`Value`] together and
//! produces a [`NormalizedValue`], or the first violation found.

use evmcall_crypto::to_checksum_address;
use evmcall_primitives::{fits_unsigned, parse_u256, Address, IntError, I256, U256};

use crate::config::DEFAULT_MAX_NESTING_DEPTH;
use crate::leaf::LeafRegistry;
use crate::value::LeafData;
use crate::{AbiError, NormalizedValue, TypeDescriptor, Value};

/// Display rule for normalized addresses
pub trait ChecksumRule: Send + Sync {
    /// Render `address` for display
    fn checksum(&self, address: &Address) -> String;
}

/// EIP-55 mixed-case checksum
#[derive(Debug, Clone, Copy, Default)]
pub struct Eip55;

impl ChecksumRule for Eip55 {
    fn checksum(&self, address: &Address) -> String {
        to_checksum_address(address)
    }
}

/// Normalize one value against one type, with no leaf codecs.
pub fn normalize(ty: &TypeDescriptor, value: &Value) -> Result<NormalizedValue, AbiError> {
    let leaves = LeafRegistry::new();
    Normalizer::new(&leaves).normalize(ty, value, "value")
}

/// Normalizer bound to a leaf registry and an address display rule
pub struct Normalizer<'a> {
    leaves: &'a LeafRegistry,
    checksum: &'a dyn ChecksumRule,
    max_depth: usize,
}

impl<'a> Normalizer<'a> {
    /// EIP-55 display and the default nesting bound
    pub fn new(leaves: &'a LeafRegistry) -> Self {
        Self {
            leaves,
            checksum: &Eip55,
            max_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }

    /// Use another address display rule
    pub fn with_checksum(mut self, rule: &'a dyn ChecksumRule) -> Self {
        self.checksum = rule;
        self
    }

    /// Reject types nested deeper than `max_depth`
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Normalize `value` as `ty`; `position` labels errors (`arg0`, ...)
    pub fn normalize(
        &self,
        ty: &TypeDescriptor,
        value: &Value,
        position: &str,
    ) -> Result<NormalizedValue, AbiError> {
        if ty.exceeds_depth(self.max_depth) {
            return Err(AbiError::malformed(
                &format!("{} type", position),
                format!("type nesting deeper than {}", self.max_depth),
            ));
        }
        self.walk(ty, value, position)
    }

    fn walk(&self, ty: &TypeDescriptor, value: &Value, position: &str) -> Result<NormalizedValue, AbiError> {
        tracing::trace!(position, ty = %ty, "normalizing");
        match ty {
            TypeDescriptor::Address => {
                let address = self.address(value, position)?;
                Ok(NormalizedValue::Address {
                    address,
                    checksummed: self.checksum.checksum(&address),
                })
            }
            TypeDescriptor::Uint(bits) => unsigned(ty, *bits, value, position).map(NormalizedValue::Uint),
            TypeDescriptor::Int(bits) => signed(ty, *bits, value, position).map(NormalizedValue::Int),
            TypeDescriptor::Tuple(types) => {
                let items = sequence(ty, value, position)?;
                if items.len() != types.len() {
                    return Err(arity(ty, position, types.len(), items.len()));
                }
                types
                    .iter()
                    .zip(items)
                    .enumerate()
                    .map(|(i, (field_ty, item))| self.walk(field_ty, item, &format!("{}.{}", position, i)))
                    .collect::<Result<Vec<_>, _>>()
                    .map(NormalizedValue::Tuple)
            }
            TypeDescriptor::Array(element, length) => {
                let items = sequence(ty, value, position)?;
                if let Some(n) = length {
                    if items.len() != *n {
                        return Err(arity(ty, position, *n, items.len()));
                    }
                }
                let elements = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.walk(element, item, &format!("{}[{}]", position, i)))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(NormalizedValue::Array {
                    elements,
                    fixed: length.is_some(),
                })
            }
            TypeDescriptor::Opaque(text) => match self.leaves.get(text) {
                Some(codec) => {
                    let dynamic = codec.is_dynamic();
                    let data = codec.encode(value).map_err(|reason| AbiError::InvalidValue {
                        position: position.to_string(),
                        ty: text.clone(),
                        reason,
                    })?;
                    let well_formed = if dynamic { data.len() % 32 == 0 } else { data.len() == 32 };
                    if !well_formed || data.is_empty() {
                        return Err(AbiError::InvalidValue {
                            position: position.to_string(),
                            ty: text.clone(),
                            reason: format!("leaf codec produced {} bytes", data.len()),
                        });
                    }
                    Ok(NormalizedValue::Leaf(LeafData { dynamic, data }))
                }
                None => Ok(NormalizedValue::Opaque(value.clone())),
            },
        }
    }

    fn address(&self, value: &Value, position: &str) -> Result<Address, AbiError> {
        let invalid = |reason: String| AbiError::InvalidAddress {
            position: position.to_string(),
            value: value.to_string(),
            reason,
        };
        match value {
            Value::Address(address) => Ok(*address),
            Value::Str(s) => Address::from_hex(s.trim()).map_err(|e| invalid(e.to_string())),
            Value::Bytes(b) => Address::from_slice(b).map_err(|e| invalid(e.to_string())),
            other => Err(invalid(format!("expected hex string, got {}", other.kind()))),
        }
    }
}

fn sequence<'v>(ty: &TypeDescriptor, value: &'v Value, position: &str) -> Result<&'v [Value], AbiError> {
    match value {
        Value::Seq(items) => Ok(items),
        other => Err(AbiError::ShapeMismatch {
            position: position.to_string(),
            ty: ty.to_string(),
            found: other.kind().to_string(),
        }),
    }
}

fn arity(ty: &TypeDescriptor, position: &str, expected: usize, got: usize) -> AbiError {
    AbiError::TypeArityMismatch {
        position: position.to_string(),
        ty: ty.to_string(),
        expected,
        got,
    }
}

fn invalid_integer(ty: &TypeDescriptor, value: &Value, position: &str) -> AbiError {
    AbiError::InvalidInteger {
        position: position.to_string(),
        ty: ty.to_string(),
        value: value.to_string(),
    }
}

fn out_of_range(ty: &TypeDescriptor, value: &Value, position: &str) -> AbiError {
    AbiError::IntegerOutOfRange {
        position: position.to_string(),
        ty: ty.to_string(),
        value: value.to_string(),
    }
}

/// Any integer-shaped value as sign and magnitude
fn integer(ty: &TypeDescriptor, value: &Value, position: &str) -> Result<I256, AbiError> {
    match value {
        Value::Int(v) => Ok(*v),
        Value::Uint(v) => Ok(I256::new(*v, false)),
        Value::Str(s) => s.parse::<I256>().map_err(|e| match e {
            IntError::Invalid(_) => invalid_integer(ty, value, position),
            IntError::Overflow(_) => out_of_range(ty, value, position),
        }),
        _ => Err(invalid_integer(ty, value, position)),
    }
}

fn unsigned(ty: &TypeDescriptor, bits: usize, value: &Value, position: &str) -> Result<U256, AbiError> {
    // hex strings above 2^255 only parse as unsigned
    let magnitude = match value {
        Value::Str(s) if !s.trim().starts_with('-') => {
            parse_u256(s).map_err(|e| match e {
                IntError::Invalid(_) => invalid_integer(ty, value, position),
                IntError::Overflow(_) => out_of_range(ty, value, position),
            })?
        }
        _ => {
            let v = integer(ty, value, position)?;
            if v.is_negative() {
                return Err(out_of_range(ty, value, position));
            }
            v.abs()
        }
    };
    if !fits_unsigned(&magnitude, bits) {
        return Err(out_of_range(ty, value, position));
    }
    Ok(magnitude)
}

fn signed(ty: &TypeDescriptor, bits: usize, value: &Value, position: &str) -> Result<I256, AbiError> {
    let v = integer(ty, value, position)?;
    if !v.fits_signed(bits) {
        return Err(out_of_range(ty, value, position));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf::{BoolCodec, LeafCodec};
    use crate::signature::parse_type;
    use proptest::prelude::*;

    fn ty(text: &str) -> TypeDescriptor {
        parse_type(text).unwrap()
    }

    // ==================== Addresses ====================

    #[test]
    fn test_address_any_case() {
        let expected = "0xE317d37AFb4Ea9882E09e83Fa3742723D789f0c3";
        for input in [
            "0xe317d37afb4ea9882e09e83fa3742723d789f0c3",
            "0xE317D37AFB4EA9882E09E83FA3742723D789F0C3",
            "e317d37afb4ea9882e09e83fa3742723d789f0c3",
        ] {
            match normalize(&TypeDescriptor::Address, &Value::from(input)).unwrap() {
                NormalizedValue::Address { address, checksummed } => {
                    assert_eq!(checksummed, expected);
                    assert_eq!(address.to_hex(), expected.to_lowercase());
                }
                other => panic!("Expected Address, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_address_invalid() {
        for bad in [
            Value::from("0x1234"),
            Value::from("0xzz17d37afb4ea9882e09e83fa3742723d789f0c3"),
            Value::from(12u8),
            Value::bytes(vec![0u8; 19]),
        ] {
            assert!(
                matches!(normalize(&TypeDescriptor::Address, &bad), Err(AbiError::InvalidAddress { .. })),
                "{:?}",
                bad
            );
        }
    }

    #[test]
    fn test_address_from_typed_value() {
        let addr = Address::from_bytes([0x11; 20]);
        assert!(matches!(
            normalize(&TypeDescriptor::Address, &Value::from(addr)),
            Ok(NormalizedValue::Address { address, .. }) if address == addr
        ));
    }

    #[test]
    fn test_custom_checksum_rule() {
        struct Lower;
        impl ChecksumRule for Lower {
            fn checksum(&self, address: &Address) -> String {
                address.to_hex()
            }
        }
        let leaves = LeafRegistry::new();
        let normalizer = Normalizer::new(&leaves).with_checksum(&Lower);
        let value = Value::from("0xE317D37AFB4EA9882E09E83FA3742723D789F0C3");
        match normalizer.normalize(&TypeDescriptor::Address, &value, "arg0").unwrap() {
            NormalizedValue::Address { checksummed, .. } => {
                assert_eq!(checksummed, "0xe317d37afb4ea9882e09e83fa3742723d789f0c3");
            }
            other => panic!("Expected Address, got {:?}", other),
        }
    }

    // ==================== Integers ====================

    #[test]
    fn test_uint24_boundary() {
        let max = (1u64 << 24) - 1;
        assert_eq!(
            normalize(&ty("uint24"), &Value::from(max)).unwrap(),
            NormalizedValue::Uint(U256::from(max))
        );
        assert!(matches!(
            normalize(&ty("uint24"), &Value::from(1u64 << 24)),
            Err(AbiError::IntegerOutOfRange { .. })
        ));
    }

    #[test]
    fn test_uint_from_strings() {
        assert_eq!(
            normalize(&ty("uint256"), &Value::from("198395")).unwrap(),
            NormalizedValue::Uint(U256::from(198395u64))
        );
        assert_eq!(
            normalize(&ty("uint256"), &Value::from("0x306fb")).unwrap(),
            NormalizedValue::Uint(U256::from(198395u64))
        );
        let max = format!("0x{}", "f".repeat(64));
        assert_eq!(normalize(&ty("uint256"), &Value::from(max)).unwrap(), NormalizedValue::Uint(U256::MAX));
    }

    #[test]
    fn test_uint_rejects_negative() {
        for v in [Value::from(-1i32), Value::from("-1")] {
            assert!(matches!(normalize(&ty("uint8"), &v), Err(AbiError::IntegerOutOfRange { .. })));
        }
    }

    #[test]
    fn test_invalid_integer() {
        for v in [Value::from("12abc"), Value::from("1.5"), Value::from(true), Value::seq([1u8])] {
            assert!(
                matches!(normalize(&ty("uint256"), &v), Err(AbiError::InvalidInteger { .. })),
                "{:?}",
                v
            );
        }
        assert!(matches!(normalize(&ty("int24"), &Value::from("--3")), Err(AbiError::InvalidInteger { .. })));
    }

    #[test]
    fn test_int24_boundaries() {
        assert!(normalize(&ty("int24"), &Value::from(-8_388_608i64)).is_ok());
        assert!(normalize(&ty("int24"), &Value::from(8_388_607i64)).is_ok());
        assert!(matches!(
            normalize(&ty("int24"), &Value::from(8_388_608i64)),
            Err(AbiError::IntegerOutOfRange { .. })
        ));
        assert!(matches!(
            normalize(&ty("int24"), &Value::from("-8388609")),
            Err(AbiError::IntegerOutOfRange { .. })
        ));
        assert_eq!(
            normalize(&ty("int24"), &Value::from("-887220")).unwrap(),
            NormalizedValue::Int(I256::from_i128(-887220))
        );
    }

    #[test]
    fn test_literal_beyond_256_bits_is_out_of_range() {
        let huge = format!("1{}", "0".repeat(80));
        assert!(matches!(normalize(&ty("uint256"), &Value::from(huge)), Err(AbiError::IntegerOutOfRange { .. })));
    }

    proptest! {
        #[test]
        fn prop_unsigned_range(bits in (1usize..=16).prop_map(|k| k * 8), v in any::<u128>()) {
            let fits = bits >= 128 || v < (1u128 << bits);
            let result = normalize(&TypeDescriptor::Uint(bits), &Value::from(v));
            prop_assert_eq!(result.is_ok(), fits);
        }

        #[test]
        fn prop_signed_range(bits in (1usize..=16).prop_map(|k| k * 8), v in any::<i128>()) {
            let fits = bits >= 128 || (v >= -(1i128 << (bits - 1)) && v < (1i128 << (bits - 1)));
            let result = normalize(&TypeDescriptor::Int(bits), &Value::from(v));
            prop_assert_eq!(result.is_ok(), fits);
        }
    }

    // ==================== Tuples and arrays ====================

    #[test]
    fn test_tuple_preserves_order() {
        let t = ty("(uint8,int8,address)");
        let value = Value::seq(vec![
            Value::from(1u8),
            Value::from(-1i8),
            Value::from("0x0000000000000000000000000000000000000001"),
        ]);
        let NormalizedValue::Tuple(items) = normalize(&t, &value).unwrap() else {
            panic!("expected tuple");
        };
        assert_eq!(items[0], NormalizedValue::Uint(U256::one()));
        assert_eq!(items[1], NormalizedValue::Int(I256::from_i128(-1)));
        assert!(matches!(items[2], NormalizedValue::Address { .. }));
    }

    #[test]
    fn test_tuple_arity_mismatch() {
        let err = normalize(&ty("(uint8,uint8,uint8)"), &Value::seq([1u8, 2])).unwrap_err();
        assert_eq!(
            err,
            AbiError::TypeArityMismatch {
                position: "value".into(),
                ty: "(uint8,uint8,uint8)".into(),
                expected: 3,
                got: 2,
            }
        );
    }

    #[test]
    fn test_nested_arity_mismatch_reports_path() {
        let t = ty("(uint8,(uint8,uint8,uint8))");
        let value = Value::seq(vec![Value::from(1u8), Value::seq([1u8, 2])]);
        match normalize(&t, &value) {
            Err(AbiError::TypeArityMismatch { position, expected: 3, got: 2, .. }) => {
                assert_eq!(position, "value.1");
            }
            other => panic!("Expected TypeArityMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_tuple_requires_sequence() {
        assert!(matches!(
            normalize(&ty("(uint8)"), &Value::from(1u8)),
            Err(AbiError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_fixed_array_length() {
        assert!(normalize(&ty("uint8[2]"), &Value::seq([1u8, 2])).is_ok());
        assert!(matches!(
            normalize(&ty("uint8[2]"), &Value::seq([1u8, 2, 3])),
            Err(AbiError::TypeArityMismatch { expected: 2, got: 3, .. })
        ));
    }

    #[test]
    fn test_dynamic_array_elements_share_type() {
        let result = normalize(&ty("uint8[]"), &Value::seq([1u64, 255, 256]));
        match result {
            Err(AbiError::IntegerOutOfRange { position, .. }) => assert_eq!(position, "value[2]"),
            other => panic!("Expected IntegerOutOfRange, got {:?}", other),
        }
        assert_eq!(
            normalize(&ty("uint8[]"), &Value::seq(Vec::<u8>::new())).unwrap(),
            NormalizedValue::Array { elements: vec![], fixed: false }
        );
    }

    // ==================== Opaque ====================

    #[test]
    fn test_opaque_passes_through() {
        let value = Value::from("anything");
        assert_eq!(
            normalize(&ty("bool"), &value).unwrap(),
            NormalizedValue::Opaque(value)
        );
    }

    #[test]
    fn test_opaque_with_codec() {
        let mut leaves = LeafRegistry::new();
        leaves.register("bool", BoolCodec);
        let normalizer = Normalizer::new(&leaves);
        let normalized = normalizer.normalize(&ty("bool"), &Value::Bool(true), "arg0").unwrap();
        assert_eq!(
            normalized,
            NormalizedValue::Leaf(LeafData { dynamic: false, data: BoolCodec.encode(&Value::Bool(true)).unwrap() })
        );
        assert!(matches!(
            normalizer.normalize(&ty("bool"), &Value::from(1u8), "arg0"),
            Err(AbiError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_misbehaving_codec_rejected() {
        struct Short;
        impl LeafCodec for Short {
            fn is_dynamic(&self) -> bool {
                false
            }
            fn encode(&self, _: &Value) -> Result<Vec<u8>, String> {
                Ok(vec![1, 2, 3])
            }
        }
        let mut leaves = LeafRegistry::new();
        leaves.register("short", Short);
        assert!(matches!(
            Normalizer::new(&leaves).normalize(&ty("short"), &Value::Bool(true), "arg0"),
            Err(AbiError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_depth_bound_on_hand_built_descriptor() {
        let mut ty = TypeDescriptor::Uint(8);
        for _ in 0..100_000 {
            ty = TypeDescriptor::array(ty);
        }
        let leaves = LeafRegistry::new();
        match Normalizer::new(&leaves).normalize(&ty, &Value::seq(Vec::<u8>::new()), "arg0") {
            Err(AbiError::MalformedSignature { signature, .. }) => assert_eq!(signature, "arg0 type"),
            other => panic!("Expected MalformedSignature, got {:?}", other),
        }
        let mut current = ty;
        while let TypeDescriptor::Array(inner, _) = current {
            current = *inner;
        }
    }

    #[test]
    fn test_depth_bound() {
        let leaves = LeafRegistry::new();
        let normalizer = Normalizer::new(&leaves).with_max_depth(1);
        assert!(normalizer.normalize(&ty("uint8[]"), &Value::seq([1u8]), "arg0").is_ok());
        assert!(matches!(
            normalizer.normalize(&ty("uint8[][]"), &Value::seq([Value::seq([1u8])]), "arg0"),
            Err(AbiError::MalformedSignature { .. })
        ));
    }
}
