//! Contract interface (JSON ABI) lookup

use serde::{Deserialize, Serialize};

use crate::signature::{is_identifier, SignatureParser};
use crate::{AbiError, FunctionSignature};

/// One input parameter of an interface entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiParam {
    /// Type text, e.g. `uint256`, `tuple`, `tuple[]`
    #[serde(rename = "type")]
    pub kind: String,
    /// Parameter name (unused for encoding)
    #[serde(default)]
    pub name: String,
    /// Fields of a `tuple` type
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<AbiParam>,
}

impl AbiParam {
    /// Create a parameter with a plain type
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            components: Vec::new(),
        }
    }

    /// Create a `tuple` parameter from its fields
    pub fn tuple(name: impl Into<String>, components: Vec<AbiParam>) -> Self {
        Self {
            kind: "tuple".to_string(),
            name: name.into(),
            components,
        }
    }

    /// Type text with `tuple` expanded from `components`, so
    /// `tuple[]` with fields `address, uint24` becomes `(address,uint24)[]`
    pub fn type_text(&self) -> String {
        match self.kind.strip_prefix("tuple") {
            Some(suffix) if suffix.is_empty() || suffix.starts_with('[') => {
                let fields: Vec<String> = self.components.iter().map(|c| c.type_text()).collect();
                format!("({}){}", fields.join(","), suffix)
            }
            _ => self.kind.clone(),
        }
    }
}

/// One interface entry; only `function` entries take part in lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiEntry {
    /// `function`, `event`, `constructor`, ...; an entry without one is
    /// never a function
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Function name
    #[serde(default)]
    pub name: String,
    /// Declared inputs in order
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
}

impl AbiEntry {
    /// Function entry
    pub fn function(name: impl Into<String>, inputs: Vec<AbiParam>) -> Self {
        Self {
            kind: Some("function".to_string()),
            name: name.into(),
            inputs,
        }
    }

    /// Whether this entry is a function
    pub fn is_function(&self) -> bool {
        self.kind.as_deref() == Some("function")
    }
}

/// Ordered list of interface entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Interface {
    entries: Vec<AbiEntry>,
}

impl Interface {
    /// Wrap entries
    pub fn new(entries: Vec<AbiEntry>) -> Self {
        Self { entries }
    }

    /// Parse a JSON ABI array
    pub fn from_json(json: &str) -> Result<Self, AbiError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Entries in declaration order
    pub fn entries(&self) -> &[AbiEntry] {
        &self.entries
    }

    /// First function entry named `name`
    pub fn function(&self, name: &str) -> Option<&AbiEntry> {
        find_function(&self.entries, name)
    }
}

impl From<Vec<AbiEntry>> for Interface {
    fn from(entries: Vec<AbiEntry>) -> Self {
        Self::new(entries)
    }
}

fn find_function<'a>(entries: &'a [AbiEntry], name: &str) -> Option<&'a AbiEntry> {
    entries.iter().find(|e| e.is_function() && e.name == name)
}

/// Resolve `name` against an interface with the default nesting limit.
///
/// The first function entry with that name wins; overloads declared later
/// are never considered.
pub fn resolve_from_interface(entries: &[AbiEntry], name: &str) -> Result<FunctionSignature, AbiError> {
    resolve_with(&SignatureParser::default(), entries, name)
}

pub(crate) fn resolve_with(
    parser: &SignatureParser,
    entries: &[AbiEntry],
    name: &str,
) -> Result<FunctionSignature, AbiError> {
    let entry = find_function(entries, name).ok_or_else(|| AbiError::FunctionNotFound(name.to_string()))?;
    if !is_identifier(&entry.name) {
        return Err(AbiError::malformed(&entry.name, "invalid function name"));
    }

    let parameters = entry
        .inputs
        .iter()
        .map(|input| parser.parse_type(&input.type_text()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| match e {
            AbiError::MalformedSignature { signature, reason } => AbiError::MalformedSignature {
                signature: format!("{} input {}", entry.name, signature),
                reason,
            },
            other => other,
        })?;

    Ok(FunctionSignature::new(entry.name.clone(), parameters))
}
