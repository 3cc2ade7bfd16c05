//! Decoded type model
//!
//! Types are trees, not interned: two structurally equal types are distinct
//! values. Sharing of serialized substructure is handled by the decoder's
//! per-session index memo, never by structural deduplication.

use serde::{Deserialize, Serialize};

use crate::ir::body::Annotation;
use crate::symbols::SymbolId;

/// Declaration-site variance of a type parameter or use-site projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Variance {
    /// `=` position: must match exactly
    #[default]
    Invariant,
    /// `+` position: produces values of the argument type
    Covariant,
    /// `-` position: consumes values of the argument type
    Contravariant,
}

/// A use-site type argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeArgument {
    /// Star projection: the argument is unknown and unusable
    Star,
    /// A concrete argument with an optional use-site projection
    Typed { variance: Variance, ty: IrType },
}

impl TypeArgument {
    /// A plain invariant argument
    pub fn invariant(ty: IrType) -> Self {
        Self::Typed {
            variance: Variance::Invariant,
            ty,
        }
    }

    /// Is this a star projection?
    pub const fn is_star(&self) -> bool {
        matches!(self, Self::Star)
    }
}

/// Expansion record of a type-alias application.
///
/// Kept alongside the expanded type so tooling can report the abbreviation
/// the author wrote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeAbbreviation {
    /// The type-alias symbol this abbreviation applies
    pub alias: SymbolId,
    /// Nullability written at the abbreviation site
    pub nullable: bool,
    /// Arguments to the alias itself
    pub arguments: Vec<TypeArgument>,
    /// Annotations on the abbreviation
    pub annotations: Vec<Annotation>,
}

/// A classifier-based type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleType {
    /// Classifier symbol (class or type parameter)
    pub classifier: SymbolId,
    /// Nullability marker
    pub nullable: bool,
    /// Ordered type arguments
    pub arguments: Vec<TypeArgument>,
    /// Type annotations
    pub annotations: Vec<Annotation>,
    /// Alias expansion this type came from, if any
    pub abbreviation: Option<Box<TypeAbbreviation>>,
}

/// Decoded type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IrType {
    /// Classifier reference with arguments: `Foo<A, B>?`
    Simple(SimpleType),
    /// Dynamically typed value; carries only annotations
    Dynamic { annotations: Vec<Annotation> },
    /// Partial-analysis artifact; only decodable when malformed nodes
    /// are allowed
    Error { annotations: Vec<Annotation> },
}

impl IrType {
    /// Create a plain non-null classifier type with no arguments
    pub fn simple(classifier: SymbolId) -> Self {
        Self::Simple(SimpleType {
            classifier,
            nullable: false,
            arguments: Vec::new(),
            annotations: Vec::new(),
            abbreviation: None,
        })
    }

    /// Is this an error type?
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Classifier symbol, if this is a simple type
    pub fn classifier(&self) -> Option<SymbolId> {
        match self {
            Self::Simple(simple) => Some(simple.classifier),
            _ => None,
        }
    }
}
