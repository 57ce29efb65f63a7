//! ABI encoding: selector plus head/tail body

use std::fmt;

use evmcall_crypto::keccak256;
use evmcall_primitives::{fits_unsigned, U256};

use crate::config::DEFAULT_MAX_NESTING_DEPTH;
use crate::leaf::LeafRegistry;
use crate::{AbiError, FunctionSignature, NormalizedValue, TypeDescriptor};

/// First 4 bytes of the Keccak-256 of a canonical signature
pub fn function_selector(canonical: &str) -> [u8; 4] {
    keccak256(canonical.as_bytes()).prefix4()
}

/// Encoded function call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCall {
    /// Function selector
    pub selector: [u8; 4],
    /// Encoded arguments
    pub body: Vec<u8>,
}

impl EncodedCall {
    /// Selector followed by body
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = self.selector.to_vec();
        result.extend_from_slice(&self.body);
        result
    }

    /// `0x` + lowercase hex of [`to_bytes`](Self::to_bytes)
    pub fn to_hex(&self) -> String {
        format!("0x{}{}", hex::encode(self.selector), hex::encode(&self.body))
    }
}

impl fmt::Display for EncodedCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Encode normalized arguments for `signature`, laying out leaf types
/// with the standard codecs.
pub fn encode(signature: &FunctionSignature, args: &[NormalizedValue]) -> Result<EncodedCall, AbiError> {
    encode_with(signature, args, &LeafRegistry::standard(), DEFAULT_MAX_NESTING_DEPTH)
}

/// Encode normalized arguments for `signature`.
///
/// Head sizes and offsets follow the declared types. An `Opaque` type takes
/// its layout from the codec registered in `leaves` and is
/// [`AbiError::UnsupportedType`] without one.
pub fn encode_with(
    signature: &FunctionSignature,
    args: &[NormalizedValue],
    leaves: &LeafRegistry,
    max_depth: usize,
) -> Result<EncodedCall, AbiError> {
    for (i, ty) in signature.parameters.iter().enumerate() {
        if ty.exceeds_depth(max_depth) {
            return Err(AbiError::malformed(
                &signature.name,
                format!("arg{} nested deeper than {}", i, max_depth),
            ));
        }
    }
    for (i, ty) in signature.parameters.iter().enumerate() {
        if let Some(leaf) = ty.opaque_leaves().into_iter().find(|t| !leaves.contains(t)) {
            return Err(AbiError::UnsupportedType {
                position: format!("arg{}", i),
                ty: leaf.to_string(),
            });
        }
    }

    let canonical = signature.canonical();
    if args.len() != signature.parameters.len() {
        return Err(AbiError::TypeArityMismatch {
            position: "arguments".to_string(),
            ty: canonical,
            expected: signature.parameters.len(),
            got: args.len(),
        });
    }

    let params: Vec<Param<'_>> = signature
        .parameters
        .iter()
        .zip(args)
        .enumerate()
        .map(|(i, (ty, value))| Param {
            ty,
            value,
            position: format!("arg{}", i),
        })
        .collect();
    let body = encode_params(&params, leaves)?;

    Ok(EncodedCall {
        selector: function_selector(&canonical),
        body,
    })
}

struct Param<'a> {
    ty: &'a TypeDescriptor,
    value: &'a NormalizedValue,
    position: String,
}

/// Encode a sequence: static values inline, dynamic values behind offsets
fn encode_params(params: &[Param<'_>], leaves: &LeafRegistry) -> Result<Vec<u8>, AbiError> {
    let head_size = params
        .iter()
        .try_fold(0usize, |acc, p| acc.checked_add(p.ty.head_len(leaves)))
        .ok_or_else(|| AbiError::EncodingOverflow {
            position: params.first().map(|p| p.position.clone()).unwrap_or_default(),
            ty: "head".to_string(),
            value: "size exceeds usize".to_string(),
        })?;

    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();

    for param in params {
        if param.ty.is_dynamic(leaves) {
            // offset from the start of this sequence
            let offset = head_size + tail.len();
            head.extend(encode_u256(&U256::from(offset)));
            tail.extend(encode_token(param, leaves)?);
        } else {
            head.extend(encode_token(param, leaves)?);
        }
    }

    tracing::trace!(head = head.len(), tail = tail.len(), "encoded sequence");
    head.extend(tail);
    Ok(head)
}

/// Encode a single value against its declared type
fn encode_token(param: &Param<'_>, leaves: &LeafRegistry) -> Result<Vec<u8>, AbiError> {
    let position = &param.position;
    match (param.ty, param.value) {
        (TypeDescriptor::Address, NormalizedValue::Address { address, .. }) => Ok(address.to_word().to_vec()),
        (TypeDescriptor::Uint(bits), NormalizedValue::Uint(value)) => {
            if !fits_unsigned(value, *bits) {
                return Err(overflow(param, value.to_string()));
            }
            Ok(encode_u256(value))
        }
        (TypeDescriptor::Int(bits), NormalizedValue::Int(value)) => {
            if !value.fits_signed(*bits) {
                return Err(overflow(param, value.to_string()));
            }
            Ok(value.to_be_bytes().to_vec())
        }
        (TypeDescriptor::Tuple(types), NormalizedValue::Tuple(items)) => {
            if types.len() != items.len() {
                return Err(arity(param, types.len(), items.len()));
            }
            let fields: Vec<Param<'_>> = types
                .iter()
                .zip(items)
                .enumerate()
                .map(|(i, (ty, value))| Param {
                    ty,
                    value,
                    position: format!("{}.{}", position, i),
                })
                .collect();
            encode_params(&fields, leaves)
        }
        (TypeDescriptor::Array(element, length), NormalizedValue::Array { elements, fixed })
            if length.is_some() == *fixed =>
        {
            if let Some(n) = length {
                if *n != elements.len() {
                    return Err(arity(param, *n, elements.len()));
                }
            }
            let items: Vec<Param<'_>> = elements
                .iter()
                .enumerate()
                .map(|(i, value)| Param {
                    ty: element,
                    value,
                    position: format!("{}[{}]", position, i),
                })
                .collect();
            let mut result = Vec::new();
            if length.is_none() {
                result.extend(encode_u256(&U256::from(elements.len())));
            }
            result.extend(encode_params(&items, leaves)?);
            Ok(result)
        }
        (TypeDescriptor::Opaque(text), NormalizedValue::Leaf(leaf)) if leaf.dynamic == leaves.is_dynamic(text) => {
            Ok(leaf.data.clone())
        }
        (TypeDescriptor::Opaque(text), NormalizedValue::Opaque(_)) => Err(AbiError::UnsupportedType {
            position: position.clone(),
            ty: text.clone(),
        }),
        (ty, value) => Err(AbiError::ShapeMismatch {
            position: position.clone(),
            ty: ty.to_string(),
            found: value.kind().to_string(),
        }),
    }
}

fn overflow(param: &Param<'_>, value: String) -> AbiError {
    AbiError::EncodingOverflow {
        position: param.position.clone(),
        ty: param.ty.to_string(),
        value,
    }
}

fn arity(param: &Param<'_>, expected: usize, got: usize) -> AbiError {
    AbiError::TypeArityMismatch {
        position: param.position.clone(),
        ty: param.ty.to_string(),
        expected,
        got,
    }
}

/// Encode a U256 as 32 bytes
fn encode_u256(value: &U256) -> Vec<u8> {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    bytes.to_vec()
}
