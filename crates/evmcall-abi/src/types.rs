//! ABI type descriptors and function signatures

use std::fmt;

use crate::leaf::LeafRegistry;

/// One parameter type.
///
/// `Display` renders the canonical text used for selector hashing:
/// no whitespace, tuples as `(a,b)`, arrays as `t[]` or `t[N]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// 20-byte address
    Address,
    /// Unsigned integer with bit size (8, 16, ..., 256)
    Uint(usize),
    /// Signed integer with bit size
    Int(usize),
    /// Tuple (struct); component order is positional and never changes
    Tuple(Vec<TypeDescriptor>),
    /// Array of one element type; `None` length means dynamic
    Array(Box<TypeDescriptor>, Option<usize>),
    /// Type text with no built-in encoding rule (`bool`, `bytes32`, ...)
    Opaque(String),
}

impl TypeDescriptor {
    /// Dynamic-length array of `element`
    pub fn array(element: TypeDescriptor) -> Self {
        TypeDescriptor::Array(Box::new(element), None)
    }

    /// Fixed-length array of `element`
    pub fn fixed_array(element: TypeDescriptor, len: usize) -> Self {
        TypeDescriptor::Array(Box::new(element), Some(len))
    }

    /// Every `Opaque` leaf, depth first
    pub fn opaque_leaves(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(ty) = stack.pop() {
            match ty {
                TypeDescriptor::Opaque(text) => out.push(text.as_str()),
                TypeDescriptor::Tuple(types) => stack.extend(types.iter().rev()),
                TypeDescriptor::Array(element, _) => stack.push(element),
                _ => {}
            }
        }
        out
    }

    /// True if nesting goes deeper than `max_depth`; a tuple or array level
    /// counts 1. Recursion stops one level past the bound.
    pub fn exceeds_depth(&self, max_depth: usize) -> bool {
        match self {
            TypeDescriptor::Tuple(types) => {
                max_depth == 0 || types.iter().any(|t| t.exceeds_depth(max_depth - 1))
            }
            TypeDescriptor::Array(element, _) => max_depth == 0 || element.exceeds_depth(max_depth - 1),
            _ => false,
        }
    }

    /// Dynamic types live in the tail behind an offset. Opaque leaves
    /// take their layout from the registered codec.
    pub fn is_dynamic(&self, leaves: &LeafRegistry) -> bool {
        match self {
            TypeDescriptor::Array(_, None) => true,
            TypeDescriptor::Array(element, Some(_)) => element.is_dynamic(leaves),
            TypeDescriptor::Tuple(types) => types.iter().any(|t| t.is_dynamic(leaves)),
            TypeDescriptor::Opaque(text) => leaves.is_dynamic(text),
            _ => false,
        }
    }

    /// Bytes this type takes in its enclosing head region
    pub fn head_len(&self, leaves: &LeafRegistry) -> usize {
        if self.is_dynamic(leaves) {
            return 32;
        }
        match self {
            TypeDescriptor::Array(element, Some(len)) => element.head_len(leaves).saturating_mul(*len),
            TypeDescriptor::Tuple(types) => types
                .iter()
                .fold(0usize, |acc, t| acc.saturating_add(t.head_len(leaves))),
            _ => 32,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Address => f.write_str("address"),
            TypeDescriptor::Uint(bits) => write!(f, "uint{}", bits),
            TypeDescriptor::Int(bits) => write!(f, "int{}", bits),
            TypeDescriptor::Tuple(types) => {
                f.write_str("(")?;
                write_list(f, types)?;
                f.write_str(")")
            }
            TypeDescriptor::Array(element, None) => write!(f, "{}[]", element),
            TypeDescriptor::Array(element, Some(len)) => write!(f, "{}[{}]", element, len),
            TypeDescriptor::Opaque(text) => f.write_str(text),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[TypeDescriptor]) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}", ty)?;
    }
    Ok(())
}

/// Parsed function signature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionSignature {
    /// Function name, `[A-Za-z_][A-Za-z0-9_]*`
    pub name: String,
    /// Top-level parameter types in declaration order
    pub parameters: Vec<TypeDescriptor>,
}

impl FunctionSignature {
    /// Create a new signature
    pub fn new(name: impl Into<String>, parameters: Vec<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }

    /// Canonical text, e.g. `transfer(address,uint256)`
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        write_list(f, &self.parameters)?;
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_display() {
        assert_eq!(TypeDescriptor::Address.to_string(), "address");
        assert_eq!(TypeDescriptor::Uint(24).to_string(), "uint24");
        assert_eq!(TypeDescriptor::Int(256).to_string(), "int256");
        assert_eq!(TypeDescriptor::array(TypeDescriptor::Uint(8)).to_string(), "uint8[]");
        assert_eq!(
            TypeDescriptor::fixed_array(TypeDescriptor::array(TypeDescriptor::Address), 3).to_string(),
            "address[][3]"
        );
        assert_eq!(
            TypeDescriptor::Tuple(vec![
                TypeDescriptor::Address,
                TypeDescriptor::Tuple(vec![TypeDescriptor::Int(24), TypeDescriptor::Uint(128)]),
            ])
            .to_string(),
            "(address,(int24,uint128))"
        );
        assert_eq!(TypeDescriptor::Tuple(vec![]).to_string(), "()");
    }

    #[test]
    fn test_signature_canonical() {
        let sig = FunctionSignature::new(
            "collect",
            vec![TypeDescriptor::Tuple(vec![
                TypeDescriptor::Uint(256),
                TypeDescriptor::Address,
                TypeDescriptor::Uint(128),
                TypeDescriptor::Uint(128),
            ])],
        );
        assert_eq!(sig.canonical(), "collect((uint256,address,uint128,uint128))");
        assert_eq!(FunctionSignature::new("f", vec![]).canonical(), "f()");
    }

    #[test]
    fn test_opaque_leaves() {
        let ty = TypeDescriptor::Tuple(vec![
            TypeDescriptor::Opaque("bool".into()),
            TypeDescriptor::array(TypeDescriptor::Opaque("string".into())),
            TypeDescriptor::Uint(8),
        ]);
        assert_eq!(ty.opaque_leaves(), vec!["bool", "string"]);
        assert!(TypeDescriptor::Address.opaque_leaves().is_empty());
    }

    #[test]
    fn test_exceeds_depth() {
        assert!(!TypeDescriptor::Address.exceeds_depth(0));
        assert!(!TypeDescriptor::array(TypeDescriptor::Uint(8)).exceeds_depth(1));
        assert!(TypeDescriptor::array(TypeDescriptor::Uint(8)).exceeds_depth(0));
        let nested = TypeDescriptor::Tuple(vec![TypeDescriptor::Tuple(vec![TypeDescriptor::array(
            TypeDescriptor::Address,
        )])]);
        assert!(!nested.exceeds_depth(3));
        assert!(nested.exceeds_depth(2));
        assert!(TypeDescriptor::Tuple(vec![]).exceeds_depth(0));
    }

    #[test]
    fn test_exceeds_depth_on_very_deep_descriptor() {
        let mut ty = TypeDescriptor::Uint(8);
        for _ in 0..200_000 {
            ty = TypeDescriptor::array(ty);
        }
        assert!(ty.exceeds_depth(32));
        assert!(ty.opaque_leaves().is_empty());
        // dropping a 200k-deep box chain recursively would itself overflow
        let mut current = ty;
        while let TypeDescriptor::Array(inner, _) = current {
            current = *inner;
        }
    }

    // ==================== Layout ====================

    #[test]
    fn test_static_sizes() {
        let leaves = LeafRegistry::new();
        let tuple = TypeDescriptor::Tuple(vec![TypeDescriptor::Uint(256); 3]);
        assert!(!tuple.is_dynamic(&leaves));
        assert_eq!(tuple.head_len(&leaves), 96);

        let fixed = TypeDescriptor::fixed_array(tuple, 2);
        assert!(!fixed.is_dynamic(&leaves));
        assert_eq!(fixed.head_len(&leaves), 192);
    }

    #[test]
    fn test_dynamic_propagates() {
        let leaves = LeafRegistry::new();
        let dynamic = TypeDescriptor::array(TypeDescriptor::Uint(256));
        assert!(dynamic.is_dynamic(&leaves));
        assert_eq!(dynamic.head_len(&leaves), 32);

        let tuple = TypeDescriptor::Tuple(vec![TypeDescriptor::Address, dynamic.clone()]);
        assert!(tuple.is_dynamic(&leaves));
        assert_eq!(tuple.head_len(&leaves), 32);

        // zero-length fixed array of a dynamic element is still dynamic
        let empty = TypeDescriptor::fixed_array(dynamic, 0);
        assert!(empty.is_dynamic(&leaves));
        assert_eq!(empty.head_len(&leaves), 32);

        let empty_static = TypeDescriptor::fixed_array(TypeDescriptor::Uint(8), 0);
        assert!(!empty_static.is_dynamic(&leaves));
        assert_eq!(empty_static.head_len(&leaves), 0);
    }

    #[test]
    fn test_opaque_layout_from_codec() {
        let leaves = LeafRegistry::standard();
        assert!(TypeDescriptor::Opaque("string".into()).is_dynamic(&leaves));
        assert!(TypeDescriptor::fixed_array(TypeDescriptor::Opaque("bytes".into()), 0).is_dynamic(&leaves));
        assert!(!TypeDescriptor::Opaque("bytes32".into()).is_dynamic(&leaves));
        assert_eq!(TypeDescriptor::Opaque("bool".into()).head_len(&leaves), 32);
    }
}
