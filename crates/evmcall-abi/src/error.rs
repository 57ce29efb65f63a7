//! Call encoding errors

use thiserror::Error;

/// Errors raised while turning a signature and arguments into call data.
///
/// `position` fields hold a path to the offending argument: `arg1` is the
/// second top-level argument, `arg0.2` the third field of the first
/// argument's tuple, `arg0[4]` the fifth element of an array.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// Signature text is not `name(type,...)` with balanced parentheses
    #[error("malformed signature {signature:?}: {reason}")]
    MalformedSignature {
        /// Offending text
        signature: String,
        /// What is wrong with it
        reason: String,
    },

    /// No function entry with this name in the interface
    #[error("function {0:?} not found in interface")]
    FunctionNotFound(String),

    /// Signature names a different function than requested
    #[error("function name mismatch: signature has {found:?} but expected {expected:?}")]
    FunctionNameMismatch {
        /// Requested name
        expected: String,
        /// Name parsed from the signature
        found: String,
    },

    /// Argument count or tuple/array length differs from the declared type
    #[error("arity mismatch at {position}: {ty} expects {expected} values, got {got}")]
    TypeArityMismatch {
        /// Argument path
        position: String,
        /// Declared type
        ty: String,
        /// Declared length
        expected: usize,
        /// Supplied length
        got: usize,
    },

    /// Value is not a 20-byte hex address
    #[error("invalid address at {position}: {value:?} ({reason})")]
    InvalidAddress {
        /// Argument path
        position: String,
        /// Supplied value
        value: String,
        /// Parse failure
        reason: String,
    },

    /// Value is not an integer literal
    #[error("invalid integer at {position} for {ty}: {value:?}")]
    InvalidInteger {
        /// Argument path
        position: String,
        /// Declared type
        ty: String,
        /// Supplied value
        value: String,
    },

    /// Integer does not fit the declared bit width
    #[error("integer out of range at {position}: {value} does not fit {ty}")]
    IntegerOutOfRange {
        /// Argument path
        position: String,
        /// Declared type
        ty: String,
        /// Supplied value
        value: String,
    },

    /// Type has no encoding rule and no registered leaf codec
    #[error("unsupported type {ty:?} at {position}")]
    UnsupportedType {
        /// Argument path
        position: String,
        /// Type text
        ty: String,
    },

    /// A normalized integer reached the codec outside its width
    #[error("encoding overflow at {position}: {value} does not fit {ty}")]
    EncodingOverflow {
        /// Argument path
        position: String,
        /// Declared type
        ty: String,
        /// Offending value
        value: String,
    },

    /// Value has the wrong shape for its type (scalar where a sequence is
    /// required, or a normalized value paired with a foreign descriptor)
    #[error("shape mismatch at {position}: {ty} cannot take {found}")]
    ShapeMismatch {
        /// Argument path
        position: String,
        /// Declared type
        ty: String,
        /// Kind of value supplied
        found: String,
    },

    /// A registered leaf codec rejected its input
    #[error("invalid value at {position} for {ty}: {reason}")]
    InvalidValue {
        /// Argument path
        position: String,
        /// Declared type
        ty: String,
        /// Codec message
        reason: String,
    },

    /// Interface description could not be deserialized
    #[error("invalid interface: {0}")]
    InvalidInterface(String),

    /// Encoder configuration could not be deserialized
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl AbiError {
    pub(crate) fn malformed(signature: &str, reason: impl Into<String>) -> Self {
        AbiError::MalformedSignature {
            signature: signature.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for AbiError {
    fn from(e: serde_json::Error) -> Self {
        AbiError::InvalidInterface(e.to_string())
    }
}

impl From<toml::de::Error> for AbiError {
    fn from(e: toml::de::Error) -> Self {
        AbiError::InvalidConfig(e.to_string())
    }
}
