//! Decoded IR object model
//!
//! # Module Organization
//!
//! - `decl` - declaration variants, the module graph arena, parent links
//! - `ty` - type variants and use-site arguments
//! - `flags` - packed modifier words and their per-kind records
//! - `origin` - declaration origin tags
//! - `body` - bodies, annotations, and lazy-skip placeholders

pub mod body;
pub mod decl;
pub mod flags;
pub mod origin;
pub mod ty;

pub use body::{Annotation, AnnotationValue, Expr, ExpressionBody, Literal, StatementBody, Stmt};
pub use decl::{
    AnonymousInitializerDecl, ClassDecl, ConstructorDecl, CoordRange, DeclBase, DeclId, DeclKind,
    Declaration, EnumEntryDecl, FieldDecl, FileId, FunctionBase, FunctionDecl, IrGraph,
    LocalDelegatedPropertyDecl, Parent, PropertyDecl, TypeAliasDecl, TypeParameterDecl,
    ValueParameterDecl, VariableDecl,
};
pub use flags::{
    ClassFlags, ClassKind, FieldFlags, FunctionFlags, LocalVarFlags, Modality, PropertyFlags,
    TypeAliasFlags, TypeParameterFlags, ValueParameterFlags, Visibility,
};
pub use origin::{KnownOrigin, Origin};
pub use ty::{IrType, SimpleType, TypeAbbreviation, TypeArgument, Variance};
