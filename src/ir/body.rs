//! Bodies and annotations
//!
//! Expression semantics live with the expression decoder collaborator; this
//! model only carries enough structure to attach decoded bodies and
//! annotations to declarations, plus the explicit error placeholders the
//! lazy-loading policy substitutes for skipped bodies. A skipped body is
//! never absent: `None` means the record had no body at all.

use lasso::Spur;
use serde::{Deserialize, Serialize};

use crate::ir::ty::IrType;
use crate::symbols::SymbolId;

/// Constant values in bodies and annotation arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
}

/// Minimal expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Const(Literal),
    /// Evaluation sequence; value of the last element
    Seq(Vec<Expr>),
    /// Error-typed marker standing in for a body the session chose not to
    /// materialize
    Error { message: String },
}

impl Expr {
    /// Is this an error marker?
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Minimal statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Expr(Expr),
    Return(Option<Expr>),
    /// Error-typed statement standing in for a skipped statement body
    Error { message: String },
}

/// A decoded expression body (initializers, default values)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionBody {
    pub expr: Expr,
}

impl ExpressionBody {
    pub fn new(expr: Expr) -> Self {
        Self { expr }
    }

    /// Placeholder for a body the materialization policy skipped
    pub fn skipped(message: impl Into<String>) -> Self {
        Self {
            expr: Expr::Error {
                message: message.into(),
            },
        }
    }

    /// Was this body skipped rather than decoded?
    pub const fn is_skipped(&self) -> bool {
        self.expr.is_error()
    }
}

/// A decoded statement body (function bodies, initializer blocks)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementBody {
    pub statements: Vec<Stmt>,
}

impl StatementBody {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }

    /// Single-statement error block for a skipped statement body
    pub fn skipped(message: impl Into<String>) -> Self {
        Self {
            statements: vec![Stmt::Error {
                message: message.into(),
            }],
        }
    }

    /// Was this body skipped rather than decoded?
    pub fn is_skipped(&self) -> bool {
        matches!(self.statements.as_slice(), [Stmt::Error { .. }])
    }
}

/// Argument of an annotation: a closed variant, dispatched by the
/// annotation decoder instead of open visitor objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnnotationValue {
    Constant(Literal),
    Array(Vec<AnnotationValue>),
    EnumEntry {
        /// Enum class symbol
        class: SymbolId,
        /// Entry name
        entry: Spur,
    },
    ClassLiteral(IrType),
    Nested(Box<Annotation>),
}

/// A decoded annotation instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation class constructor symbol
    pub constructor: SymbolId,
    /// Named arguments in record order
    pub arguments: Vec<(Spur, AnnotationValue)>,
}
