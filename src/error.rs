//! Error taxonomy for module decoding
//!
//! Three fatal categories, none recovered internally: the module loader
//! decides whether to abort the whole compilation or discard one file.

use thiserror::Error;

use crate::symbols::SymbolKind;

/// Result type alias for decode operations
pub type LinkResult<T> = Result<T, LinkError>;

/// Top-level error type
#[derive(Debug, Error)]
pub enum LinkError {
    /// Format/version corruption in the persisted module
    #[error("malformed module: {0}")]
    Malformed(#[from] MalformedModule),

    /// A partial-analysis artifact reached a context that forbids it
    #[error("policy violation: {0}")]
    Policy(#[from] PolicyViolation),

    /// Caller/version mismatch on the decode path
    #[error("unsupported construct: {0}")]
    Unsupported(#[from] UnsupportedConstruct),
}

/// Structural corruption in the serialized module
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedModule {
    /// Declaration record with an unknown or unset kind tag
    #[error("unknown or unset declaration kind tag")]
    UnknownDeclarationTag,

    /// Symbol reference resolved to a kind outside the requested capability
    #[error("symbol reference resolved to {found:?}, expected {expected}")]
    WrongCapability {
        expected: &'static str,
        found: SymbolKind,
    },

    /// Same signature declared under two different symbol kinds
    #[error("signature already declared as {existing:?}, requested {requested:?}")]
    SignatureKindMismatch {
        existing: SymbolKind,
        requested: SymbolKind,
    },

    /// A symbol was bound to a second declaration
    #[error("symbol already bound to a declaration")]
    DuplicateBinding,

    /// Parent requested while no enclosing declaration was open
    #[error("parent scope stack is empty")]
    EmptyScopeStack,

    /// Type index out of bounds
    #[error("type index {0} out of bounds")]
    BadTypeIndex(u32),

    /// Body index out of bounds
    #[error("body index {0} out of bounds")]
    BadBodyIndex(u32),

    /// Expression body record where a statement body was required, or
    /// vice versa
    #[error("body record kind does not match the requested body shape")]
    BodyKindMismatch,

    /// Interned string index out of bounds
    #[error("string index {0} out of bounds")]
    BadStringIndex(u32),

    /// Signature index out of bounds
    #[error("signature index {0} out of bounds")]
    BadSignatureIndex(u32),

    /// Invalid visibility encoding in a flag word
    #[error("invalid visibility encoding {0}")]
    InvalidVisibility(u64),

    /// Invalid modality encoding in a flag word
    #[error("invalid modality encoding {0}")]
    InvalidModality(u64),

    /// Invalid class kind encoding in a flag word
    #[error("invalid class kind encoding {0}")]
    InvalidClassKind(u64),

    /// Invalid variance encoding in a flag word
    #[error("invalid variance encoding {0}")]
    InvalidVariance(u64),
}

/// Partial-analysis artifacts reaching a fully-linked context
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyViolation {
    /// Error type record while malformed nodes are disallowed
    #[error("error type encountered while malformed nodes are disallowed")]
    ErrorTypeNotAllowed,

    /// Error declaration record while malformed nodes are disallowed
    #[error("error declaration encountered while malformed nodes are disallowed")]
    ErrorDeclarationNotAllowed,
}

/// Declaration kinds disallowed through the generic decode path
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnsupportedConstruct {
    /// Type parameters are only decoded through the dedicated two-phase list
    #[error("type parameter outside the dedicated two-phase list")]
    TypeParameterOutsideList,

    /// Value parameters are only decoded by their owning function
    #[error("value parameter outside a function declaration")]
    ValueParameterOutsideFunction,
}

impl LinkError {
    /// Is this a malformed-module failure?
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }

    /// Is this a policy violation?
    pub const fn is_policy(&self) -> bool {
        matches!(self, Self::Policy(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MalformedModule::BadTypeIndex(42);
        assert!(err.to_string().contains("42"));

        let err = LinkError::from(PolicyViolation::ErrorTypeNotAllowed);
        assert!(err.is_policy());
        assert!(!err.is_malformed());
    }
}
