//! Serialized record layer
//!
//! Structured records as produced by the raw-bytes decoding stage (which is
//! a separate collaborator). Everything here references shared substructure
//! by table index: strings, signatures, types and bodies all live in
//! side tables served by a [`super::source::ModuleSource`].

use serde::{Deserialize, Serialize};

use crate::ir::decl::CoordRange;
use crate::ir::ty::Variance;
use crate::symbols::SymbolKind;

/// Index into the module's type table
pub type TypeIndex = u32;
/// Index into the module's body table
pub type BodyIndex = u32;
/// Index into the module's interned string table
pub type StringIndex = u32;
/// Index into the module's signature table
pub type SignatureIndex = u32;

/// An encoded symbol reference: the kind the producer claims plus the
/// signature that identifies the entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRef {
    pub kind: SymbolKind,
    pub signature: SignatureIndex,
}

impl SymbolRef {
    pub const fn new(kind: SymbolKind, signature: SignatureIndex) -> Self {
        Self { kind, signature }
    }

    /// Reference for a declaration whose symbol is created fresh in local
    /// scope; the signature slot is deliberately invalid and must never be
    /// resolved
    pub const fn scoped(kind: SymbolKind) -> Self {
        Self {
            kind,
            signature: u32::MAX,
        }
    }
}

/// Serialized form of a [`crate::symbols::Signature`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureRecord {
    Public {
        package: StringIndex,
        path: Vec<StringIndex>,
        member_hash: Option<u64>,
    },
    FileLocal {
        container: SignatureIndex,
        local_id: u64,
    },
    Scoped {
        container: SignatureIndex,
        index: u32,
    },
}

/// Serialized constant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LiteralRecord {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
}

/// Serialized expression (structure only; semantics belong to the
/// expression decoder collaborator)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprRecord {
    Const(LiteralRecord),
    Seq(Vec<ExprRecord>),
}

/// Serialized statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StmtRecord {
    Expr(ExprRecord),
    Return(Option<ExprRecord>),
}

/// Serialized body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BodyRecord {
    Expression(ExprRecord),
    Statements(Vec<StmtRecord>),
}

/// Serialized annotation argument; closed variant set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnnotationArgRecord {
    Constant(LiteralRecord),
    Array(Vec<AnnotationArgRecord>),
    EnumEntry {
        class: SymbolRef,
        entry: StringIndex,
    },
    ClassLiteral(TypeIndex),
    Nested(Box<AnnotationRecord>),
}

/// Serialized annotation instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub constructor: SymbolRef,
    pub arguments: Vec<(StringIndex, AnnotationArgRecord)>,
}

/// Serialized type argument
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TypeArgumentRecord {
    Star,
    Typed {
        variance: Variance,
        index: TypeIndex,
    },
}

/// Serialized type-alias abbreviation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbbreviationRecord {
    pub alias: SymbolRef,
    pub nullable: bool,
    pub arguments: Vec<TypeArgumentRecord>,
    pub annotations: Vec<AnnotationRecord>,
}

/// Serialized type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeRecord {
    Simple {
        classifier: SymbolRef,
        nullable: bool,
        arguments: Vec<TypeArgumentRecord>,
        annotations: Vec<AnnotationRecord>,
        abbreviation: Option<AbbreviationRecord>,
    },
    Dynamic {
        annotations: Vec<AnnotationRecord>,
    },
    Error {
        annotations: Vec<AnnotationRecord>,
    },
}

impl TypeRecord {
    /// Plain non-null classifier reference with no arguments
    pub const fn simple(classifier: SymbolRef) -> Self {
        Self::Simple {
            classifier,
            nullable: false,
            arguments: Vec::new(),
            annotations: Vec::new(),
            abbreviation: None,
        }
    }
}

/// Fields shared by every declaration record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclBaseRecord {
    pub symbol: SymbolRef,
    pub coordinates: CoordRange,
    /// Origin tag name, as a string index
    pub origin: StringIndex,
    /// Packed modifier word; layout depends on the declaration kind
    pub flags: u64,
    pub annotations: Vec<AnnotationRecord>,
}

impl DeclBaseRecord {
    pub fn new(symbol: SymbolRef) -> Self {
        Self {
            symbol,
            coordinates: CoordRange::UNDEFINED,
            origin: 0,
            flags: 0,
            annotations: Vec::new(),
        }
    }

    pub fn with_flags(mut self, flags: u64) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_origin(mut self, origin: StringIndex) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_span(mut self, coordinates: CoordRange) -> Self {
        self.coordinates = coordinates;
        self
    }

    pub fn with_annotations(mut self, annotations: Vec<AnnotationRecord>) -> Self {
        self.annotations = annotations;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ClassRecord {
    pub name: StringIndex,
    pub type_parameters: Vec<DeclRecord>,
    pub supertypes: Vec<TypeIndex>,
    pub members: Vec<DeclRecord>,
    pub this_receiver: Option<Box<DeclRecord>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FunctionRecord {
    pub name: StringIndex,
    pub type_parameters: Vec<DeclRecord>,
    pub return_type: TypeIndex,
    pub dispatch_receiver: Option<Box<DeclRecord>>,
    pub extension_receiver: Option<Box<DeclRecord>>,
    pub value_parameters: Vec<DeclRecord>,
    pub body: Option<BodyIndex>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PropertyRecord {
    pub name: StringIndex,
    pub getter: Option<Box<DeclRecord>>,
    pub setter: Option<Box<DeclRecord>>,
    pub backing_field: Option<Box<DeclRecord>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FieldRecord {
    pub name: StringIndex,
    pub ty: TypeIndex,
    pub initializer: Option<BodyIndex>,
    /// Legacy producers may give the field its own property identity;
    /// reconciled against the owning property after decode
    pub corresponding_property: Option<SymbolRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VariableRecord {
    pub name: StringIndex,
    pub ty: TypeIndex,
    pub initializer: Option<BodyIndex>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TypeAliasRecord {
    pub name: StringIndex,
    pub type_parameters: Vec<DeclRecord>,
    pub expanded: TypeIndex,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EnumEntryRecord {
    pub name: StringIndex,
    pub corresponding_class: Option<Box<DeclRecord>>,
    pub initializer: Option<BodyIndex>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymousInitializerRecord {
    pub body: BodyIndex,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalDelegatedPropertyRecord {
    pub name: StringIndex,
    pub ty: TypeIndex,
    pub delegate: Box<DeclRecord>,
    pub getter: Box<DeclRecord>,
    pub setter: Option<Box<DeclRecord>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TypeParameterRecord {
    pub name: StringIndex,
    pub index: u32,
    pub bounds: Vec<TypeIndex>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ValueParameterRecord {
    pub name: StringIndex,
    /// -1 denotes a receiver-like parameter
    pub index: i32,
    pub ty: TypeIndex,
    pub vararg_element: Option<TypeIndex>,
    pub default_value: Option<BodyIndex>,
}

/// Kind-specific payload of a declaration record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeclKindRecord {
    Class(ClassRecord),
    Function(FunctionRecord),
    Constructor(FunctionRecord),
    Property(PropertyRecord),
    Field(FieldRecord),
    Variable(VariableRecord),
    TypeAlias(TypeAliasRecord),
    EnumEntry(EnumEntryRecord),
    AnonymousInitializer(AnonymousInitializerRecord),
    LocalDelegatedProperty(LocalDelegatedPropertyRecord),
    TypeParameter(TypeParameterRecord),
    ValueParameter(ValueParameterRecord),
    Error,
    /// The producer wrote a tag this reader does not know, or none at all
    Unset,
}

/// One serialized declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclRecord {
    pub base: DeclBaseRecord,
    pub kind: DeclKindRecord,
}

impl DeclRecord {
    pub fn new(base: DeclBaseRecord, kind: DeclKindRecord) -> Self {
        Self { base, kind }
    }
}
