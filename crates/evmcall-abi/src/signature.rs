//! Function signature parsing
//!
//! `name(type,type,...)` where a type is `address`, `uintN`, `intN`, a
//! parenthesised tuple of types, any type followed by `[]` or `[N]`, or
//! other text kept as [`TypeDescriptor::Opaque`].

use crate::config::DEFAULT_MAX_NESTING_DEPTH;
use crate::{AbiError, FunctionSignature, TypeDescriptor};

/// Parse a signature with the default nesting limit
pub fn parse(signature: &str) -> Result<FunctionSignature, AbiError> {
    SignatureParser::default().parse(signature)
}

/// Parse a single type with the default nesting limit
pub fn parse_type(text: &str) -> Result<TypeDescriptor, AbiError> {
    SignatureParser::default().parse_type(text)
}

/// Canonical text of a parsed signature; the exact bytes hashed for the selector
pub fn canonicalize(signature: &FunctionSignature) -> String {
    signature.canonical()
}

/// Recursive-descent signature parser with a nesting bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureParser {
    max_depth: usize,
}

impl Default for SignatureParser {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NESTING_DEPTH)
    }
}

impl SignatureParser {
    /// Parser rejecting tuple/array nesting deeper than `max_depth`
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Nesting bound
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Parse `name(type,...)`
    pub fn parse(&self, signature: &str) -> Result<FunctionSignature, AbiError> {
        let s = signature.trim();

        let name_end = s
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(s.len());
        let name = &s[..name_end];
        if !is_identifier(name) {
            return Err(AbiError::malformed(signature, "missing or invalid function name"));
        }

        let rest = s[name_end..].trim_start();
        if !rest.starts_with('(') {
            return Err(AbiError::malformed(signature, "expected '(' after function name"));
        }
        let close = matching_paren(rest)
            .ok_or_else(|| AbiError::malformed(signature, "unbalanced parentheses"))?;
        if close != rest.len() - 1 {
            return Err(AbiError::malformed(
                signature,
                format!("unexpected text after parameter list: {:?}", &rest[close + 1..]),
            ));
        }

        let parameters = split_top_level(&rest[1..close])
            .into_iter()
            .map(|segment| self.classify(segment, 1, signature))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FunctionSignature::new(name, parameters))
    }

    /// Parse one type, e.g. `(address,uint256)[]`
    pub fn parse_type(&self, text: &str) -> Result<TypeDescriptor, AbiError> {
        self.classify(text, 1, text)
    }

    fn classify(&self, text: &str, depth: usize, signature: &str) -> Result<TypeDescriptor, AbiError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AbiError::malformed(signature, "empty parameter type"));
        }

        if text.ends_with(']') {
            // the last '[' opens the outermost suffix: `(a,b[2])[3]` splits at "[3]"
            let Some(open) = text.rfind('[') else {
                return Err(AbiError::malformed(signature, format!("unmatched ']' in {:?}", text)));
            };
            let base = &text[..open];
            let dims = text[open + 1..text.len() - 1].trim();
            if base.trim().is_empty() {
                return Err(AbiError::malformed(signature, format!("array suffix without element type: {:?}", text)));
            }
            let length = if dims.is_empty() {
                None
            } else {
                match dims.parse::<usize>() {
                    Ok(n) => Some(n),
                    Err(_) => return Ok(opaque(text)),
                }
            };
            self.check_depth(depth, signature)?;
            let element = self.classify(base, depth + 1, signature)?;
            return Ok(TypeDescriptor::Array(Box::new(element), length));
        }

        if text.starts_with('(') {
            let close = matching_paren(text)
                .ok_or_else(|| AbiError::malformed(signature, format!("unbalanced parentheses in {:?}", text)))?;
            if close != text.len() - 1 {
                return Err(AbiError::malformed(signature, format!("unexpected text after tuple in {:?}", text)));
            }
            self.check_depth(depth, signature)?;
            let components = split_top_level(&text[1..close])
                .into_iter()
                .map(|segment| self.classify(segment, depth + 1, signature))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(TypeDescriptor::Tuple(components));
        }

        if text.contains(['(', ')', '[', ',']) {
            return Err(AbiError::malformed(signature, format!("stray delimiter in {:?}", text)));
        }
        if text.contains(char::is_whitespace) {
            return Err(AbiError::malformed(signature, format!("whitespace inside type {:?}", text)));
        }

        Ok(classify_leaf(text))
    }

    fn check_depth(&self, depth: usize, signature: &str) -> Result<(), AbiError> {
        if depth > self.max_depth {
            return Err(AbiError::malformed(
                signature,
                format!("type nesting deeper than {}", self.max_depth),
            ));
        }
        Ok(())
    }
}

fn classify_leaf(text: &str) -> TypeDescriptor {
    if text == "address" {
        return TypeDescriptor::Address;
    }
    if let Some(rest) = text.strip_prefix("uint") {
        if let Some(bits) = int_width(rest) {
            return TypeDescriptor::Uint(bits);
        }
    } else if let Some(rest) = text.strip_prefix("int") {
        if let Some(bits) = int_width(rest) {
            return TypeDescriptor::Int(bits);
        }
    }
    opaque(text)
}

/// `""` is the 256-bit alias; otherwise 8..=256 in steps of 8
fn int_width(rest: &str) -> Option<usize> {
    if rest.is_empty() {
        return Some(256);
    }
    if !rest.bytes().all(|b| b.is_ascii_digit()) || rest.starts_with('0') {
        return None;
    }
    let bits: usize = rest.parse().ok()?;
    (bits % 8 == 0 && (8..=256).contains(&bits)).then_some(bits)
}

fn opaque(text: &str) -> TypeDescriptor {
    TypeDescriptor::Opaque(text.chars().filter(|c| !c.is_whitespace()).collect())
}

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Index of the ')' closing the '(' at byte 0
fn matching_paren(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in s.bytes().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on commas at paren depth 0. Blank input yields no segments.
fn split_top_level(list: &str) -> Vec<&str> {
    if list.trim().is_empty() {
        return Vec::new();
    }
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, b) in list.bytes().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                segments.push(list[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(list[start..].trim());
    segments
}
