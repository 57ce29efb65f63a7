//! The call encoder: signature or interface in, call data out

use std::fmt;
use std::sync::Arc;

use crate::encode::{encode_with, EncodedCall};
use crate::interface::{resolve_with, AbiEntry, Interface};
use crate::leaf::{LeafCodec, LeafRegistry};
use crate::normalize::{ChecksumRule, Eip55, Normalizer};
use crate::signature::SignatureParser;
use crate::{AbiError, EncoderConfig, FunctionSignature, Value};

/// Where the function's parameter types come from
#[derive(Debug, Clone, Copy)]
pub enum CallTarget<'a> {
    /// `name(type,...)` text
    Signature(&'a str),
    /// Interface entries searched by name
    Interface(&'a [AbiEntry]),
}

impl<'a> From<&'a str> for CallTarget<'a> {
    fn from(signature: &'a str) -> Self {
        CallTarget::Signature(signature)
    }
}

impl<'a> From<&'a String> for CallTarget<'a> {
    fn from(signature: &'a String) -> Self {
        CallTarget::Signature(signature)
    }
}

impl<'a> From<&'a [AbiEntry]> for CallTarget<'a> {
    fn from(entries: &'a [AbiEntry]) -> Self {
        CallTarget::Interface(entries)
    }
}

impl<'a> From<&'a Vec<AbiEntry>> for CallTarget<'a> {
    fn from(entries: &'a Vec<AbiEntry>) -> Self {
        CallTarget::Interface(entries)
    }
}

impl<'a> From<&'a Interface> for CallTarget<'a> {
    fn from(interface: &'a Interface) -> Self {
        CallTarget::Interface(interface.entries())
    }
}

/// Encode a call with a default [`CallEncoder`], returning `0x` hex.
///
/// ```
/// use evmcall_abi::encode_call;
///
/// let data = encode_call("burn(uint256)", "burn", &[198395u64.into()]).unwrap();
/// assert_eq!(
///     data,
///     "0x42966c6800000000000000000000000000000000000000000000000000000000000306fb"
/// );
/// ```
pub fn encode_call<'a>(
    target: impl Into<CallTarget<'a>>,
    function_name: &str,
    args: &[Value],
) -> Result<String, AbiError> {
    CallEncoder::default().encode_hex(target, function_name, args)
}

/// Configured encoder.
///
/// Holds no per-call state; one instance can serve any number of threads.
#[derive(Clone)]
pub struct CallEncoder {
    config: EncoderConfig,
    leaves: LeafRegistry,
    checksum: Arc<dyn ChecksumRule>,
}

impl Default for CallEncoder {
    fn default() -> Self {
        Self::new(EncoderConfig::default())
    }
}

impl fmt::Debug for CallEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallEncoder")
            .field("config", &self.config)
            .field("leaves", &self.leaves)
            .finish_non_exhaustive()
    }
}

impl CallEncoder {
    /// Create an encoder; `standard_leaf_types` preloads the standard codecs
    pub fn new(config: EncoderConfig) -> Self {
        let leaves = if config.standard_leaf_types {
            LeafRegistry::standard()
        } else {
            LeafRegistry::new()
        };
        Self {
            config,
            leaves,
            checksum: Arc::new(Eip55),
        }
    }

    /// Add the `bool`, `bytesN`, `bytes` and `string` codecs
    pub fn with_standard_leaf_types(mut self) -> Self {
        self.leaves.register_standard();
        self.config.standard_leaf_types = true;
        self
    }

    /// Register a codec for an otherwise unsupported leaf type
    pub fn register_leaf(&mut self, type_name: impl Into<String>, codec: impl LeafCodec + 'static) {
        self.leaves.register(type_name, codec);
    }

    /// Replace the address display rule
    pub fn with_checksum_rule(mut self, rule: impl ChecksumRule + 'static) -> Self {
        self.checksum = Arc::new(rule);
        self
    }

    /// Active configuration
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Registered leaf codecs
    pub fn leaves(&self) -> &LeafRegistry {
        &self.leaves
    }

    /// Parser honouring the configured nesting bound
    pub fn parser(&self) -> SignatureParser {
        SignatureParser::new(self.config.max_nesting_depth)
    }

    /// Resolve the signature of `function_name` from `target`
    pub fn resolve<'a>(
        &self,
        target: impl Into<CallTarget<'a>>,
        function_name: &str,
    ) -> Result<FunctionSignature, AbiError> {
        let parser = self.parser();
        match target.into() {
            CallTarget::Signature(text) => {
                let signature = parser.parse(text)?;
                if signature.name != function_name {
                    return Err(AbiError::FunctionNameMismatch {
                        expected: function_name.to_string(),
                        found: signature.name,
                    });
                }
                Ok(signature)
            }
            CallTarget::Interface(entries) => resolve_with(&parser, entries, function_name),
        }
    }

    /// Resolve, validate and encode one call
    pub fn encode<'a>(
        &self,
        target: impl Into<CallTarget<'a>>,
        function_name: &str,
        args: &[Value],
    ) -> Result<EncodedCall, AbiError> {
        let signature = self.resolve(target, function_name)?;
        tracing::debug!("Encoding {} ({} arguments)", signature, args.len());

        if args.len() != signature.parameters.len() {
            return Err(AbiError::TypeArityMismatch {
                position: "arguments".to_string(),
                ty: signature.canonical(),
                expected: signature.parameters.len(),
                got: args.len(),
            });
        }

        for (i, ty) in signature.parameters.iter().enumerate() {
            if let Some(leaf) = ty.opaque_leaves().into_iter().find(|t| !self.leaves.contains(t)) {
                return Err(AbiError::UnsupportedType {
                    position: format!("arg{}", i),
                    ty: leaf.to_string(),
                });
            }
        }

        let normalizer = Normalizer::new(&self.leaves)
            .with_checksum(self.checksum.as_ref())
            .with_max_depth(self.config.max_nesting_depth);
        let normalized = signature
            .parameters
            .iter()
            .zip(args)
            .enumerate()
            .map(|(i, (ty, value))| normalizer.normalize(ty, value, &format!("arg{}", i)))
            .collect::<Result<Vec<_>, _>>()?;

        let call = encode_with(&signature, &normalized, &self.leaves, self.config.max_nesting_depth)?;
        tracing::debug!(
            "Encoded {} selector=0x{} body={} bytes",
            signature.name,
            hex::encode(call.selector),
            call.body.len()
        );
        Ok(call)
    }

    /// [`encode`](Self::encode) rendered as `0x` hex
    pub fn encode_hex<'a>(
        &self,
        target: impl Into<CallTarget<'a>>,
        function_name: &str,
        args: &[Value],
    ) -> Result<String, AbiError> {
        self.encode(target, function_name, args).map(|call| call.to_hex())
    }
}
