//! Decoded declaration model and the module IR graph
//!
//! Declarations live in an [`IrGraph`] arena and reference each other by
//! [`DeclId`]. The parent link is a back-reference through the owning
//! symbol (or the enclosing file), never an ownership edge: containers own
//! their children through member lists.

use lasso::Spur;
use serde::{Deserialize, Serialize};

use crate::ir::body::{Annotation, ExpressionBody, StatementBody};
use crate::ir::flags::{
    ClassFlags, FieldFlags, FunctionFlags, LocalVarFlags, PropertyFlags, TypeAliasFlags,
    TypeParameterFlags, ValueParameterFlags,
};
use crate::ir::origin::Origin;
use crate::ir::ty::IrType;
use crate::symbols::SymbolId;

/// Index into the declaration arena of one module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclId(pub u32);

impl DeclId {
    /// Get the raw index value
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// Identifier of a source file within the module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct FileId(pub u32);

/// Source coordinate span as raw offsets, or absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoordRange {
    pub start: u32,
    pub end: u32,
}

impl CoordRange {
    /// Absent span
    pub const UNDEFINED: Self = Self {
        start: u32::MAX,
        end: u32::MAX,
    };

    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Is this span absent?
    pub const fn is_undefined(self) -> bool {
        self.start == u32::MAX
    }
}

impl Default for CoordRange {
    fn default() -> Self {
        Self::UNDEFINED
    }
}

/// What a declaration hangs off: the enclosing file at module root, or the
/// symbol of an enclosing declaration still under construction below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parent {
    File(FileId),
    Symbol(SymbolId),
}

/// Attributes shared by every declaration kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclBase {
    /// Owning symbol, bound to this declaration
    pub symbol: SymbolId,
    /// Source span, or [`CoordRange::UNDEFINED`]
    pub span: CoordRange,
    /// Why this node exists
    pub origin: Origin,
    /// Decoded annotations
    pub annotations: Vec<Annotation>,
    /// Back-reference to the enclosing scope
    pub parent: Parent,
}

/// A class, interface, enum class, object or annotation class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: Spur,
    pub flags: ClassFlags,
    pub type_parameters: Vec<DeclId>,
    pub supertypes: Vec<IrType>,
    /// Members that were decoded; skipped fake overrides are absent here
    pub members: Vec<DeclId>,
    /// Implicit receiver parameter (serialized at index -1)
    pub this_receiver: Option<DeclId>,
}

/// Everything a function-like declaration carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionBase {
    pub name: Spur,
    pub flags: FunctionFlags,
    pub type_parameters: Vec<DeclId>,
    pub return_type: IrType,
    pub dispatch_receiver: Option<DeclId>,
    pub extension_receiver: Option<DeclId>,
    pub value_parameters: Vec<DeclId>,
    /// None when the record carried no body; a skipped body is an
    /// error-tagged placeholder, never None
    pub body: Option<StatementBody>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub base: FunctionBase,
    /// Owning property symbol for getters/setters
    pub corresponding_property: Option<SymbolId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorDecl {
    pub base: FunctionBase,
    pub is_primary: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub name: Spur,
    pub flags: PropertyFlags,
    pub getter: Option<DeclId>,
    pub setter: Option<DeclId>,
    pub backing_field: Option<DeclId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: Spur,
    pub flags: FieldFlags,
    pub ty: IrType,
    pub initializer: Option<ExpressionBody>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDecl {
    pub name: Spur,
    pub flags: LocalVarFlags,
    pub ty: IrType,
    /// Always decoded eagerly: variables only occur inside bodies that are
    /// already materializing
    pub initializer: Option<ExpressionBody>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeAliasDecl {
    pub name: Spur,
    pub flags: TypeAliasFlags,
    pub type_parameters: Vec<DeclId>,
    pub expanded: IrType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumEntryDecl {
    pub name: Spur,
    /// The entry's overriding anonymous subclass, if it has one
    pub corresponding_class: Option<DeclId>,
    pub initializer: Option<ExpressionBody>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymousInitializerDecl {
    pub body: StatementBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalDelegatedPropertyDecl {
    pub name: Spur,
    pub flags: LocalVarFlags,
    pub ty: IrType,
    pub delegate: DeclId,
    pub getter: DeclId,
    pub setter: Option<DeclId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeParameterDecl {
    pub name: Spur,
    /// Position in the owner's parameter list
    pub index: u32,
    pub flags: TypeParameterFlags,
    /// Bound types; may reference sibling parameters
    pub bounds: Vec<IrType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueParameterDecl {
    pub name: Spur,
    /// Positional index; -1 denotes an unindexed receiver-like parameter
    pub index: i32,
    pub flags: ValueParameterFlags,
    pub ty: IrType,
    /// Element type when this is a vararg parameter
    pub vararg_element: Option<IrType>,
    pub default_value: Option<ExpressionBody>,
}

/// Kind-specific payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeclKind {
    Class(ClassDecl),
    Function(FunctionDecl),
    Constructor(ConstructorDecl),
    Property(PropertyDecl),
    Field(FieldDecl),
    Variable(VariableDecl),
    TypeAlias(TypeAliasDecl),
    EnumEntry(EnumEntryDecl),
    AnonymousInitializer(AnonymousInitializerDecl),
    LocalDelegatedProperty(LocalDelegatedPropertyDecl),
    TypeParameter(TypeParameterDecl),
    ValueParameter(ValueParameterDecl),
    /// Placeholder for a declaration the producer could not analyze;
    /// only decodable when malformed nodes are allowed
    Error,
}

/// One decoded declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub base: DeclBase,
    pub kind: DeclKind,
}

impl Declaration {
    /// Class payload accessor
    pub fn as_class(&self) -> Option<&ClassDecl> {
        match &self.kind {
            DeclKind::Class(class) => Some(class),
            _ => None,
        }
    }

    /// Function payload accessor
    pub fn as_function(&self) -> Option<&FunctionDecl> {
        match &self.kind {
            DeclKind::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Property payload accessor
    pub fn as_property(&self) -> Option<&PropertyDecl> {
        match &self.kind {
            DeclKind::Property(property) => Some(property),
            _ => None,
        }
    }
}

/// Arena owning every declaration decoded for one module.
///
/// Produced by a decode session and owned by the module's in-memory IR
/// afterwards.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrGraph {
    decls: Vec<Declaration>,
}

impl IrGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a declaration, returning its id
    pub fn alloc(&mut self, decl: Declaration) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        self.decls.push(decl);
        id
    }

    /// Declaration by id
    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.decls[id.0 as usize]
    }

    /// Mutable declaration by id
    pub fn decl_mut(&mut self, id: DeclId) -> &mut Declaration {
        &mut self.decls[id.0 as usize]
    }

    /// Number of declarations decoded so far
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// Is the graph empty?
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Iterate all declarations with their ids
    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &Declaration)> {
        self.decls
            .iter()
            .enumerate()
            .map(|(i, d)| (DeclId(i as u32), d))
    }
}
