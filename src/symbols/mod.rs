//! Symbol identities and the signature-keyed symbol table
//!
//! A [`Signature`] is the globally stable identity of a link-visible entity;
//! a symbol is a handle that eventually denotes exactly one declaration.
//! Symbols live in an arena of identity slots so a handle can exist unbound
//! (to satisfy a forward or self reference) before the declaration it denotes
//! is constructed, and is bound exactly once.

use lasso::Spur;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::MalformedModule;
use crate::ir::decl::DeclId;

/// Handle into the symbol arena.
///
/// Cheap to copy and valid for the lifetime of the owning [`SymbolTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

impl SymbolId {
    /// Get the raw index value
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// What kind of declaration a symbol denotes.
///
/// Checked against the requested [`Capability`] when a serialized reference
/// is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Class,
    Constructor,
    Function,
    Property,
    Field,
    EnumEntry,
    TypeAlias,
    TypeParameter,
    Variable,
    ValueParameter,
    LocalDelegatedProperty,
    AnonymousInitializer,
    /// Placeholder identity for an error declaration
    ErrorDeclaration,
}

impl SymbolKind {
    /// Can this symbol stand in classifier position of a simple type?
    pub const fn is_classifier(self) -> bool {
        matches!(self, Self::Class | Self::TypeParameter)
    }
}

/// Capability a resolution site requires of the referenced symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Class or type parameter
    Classifier,
    Class,
    Constructor,
    Function,
    Property,
    Field,
    EnumEntry,
    TypeAlias,
    TypeParameter,
}

impl Capability {
    /// Does `kind` satisfy this capability?
    pub const fn admits(self, kind: SymbolKind) -> bool {
        match self {
            Self::Classifier => kind.is_classifier(),
            Self::Class => matches!(kind, SymbolKind::Class),
            Self::Constructor => matches!(kind, SymbolKind::Constructor),
            Self::Function => matches!(kind, SymbolKind::Function),
            Self::Property => matches!(kind, SymbolKind::Property),
            Self::Field => matches!(kind, SymbolKind::Field),
            Self::EnumEntry => matches!(kind, SymbolKind::EnumEntry),
            Self::TypeAlias => matches!(kind, SymbolKind::TypeAlias),
            Self::TypeParameter => matches!(kind, SymbolKind::TypeParameter),
        }
    }

    /// Human-readable name for diagnostics
    pub const fn name(self) -> &'static str {
        match self {
            Self::Classifier => "classifier",
            Self::Class => "class",
            Self::Constructor => "constructor",
            Self::Function => "function",
            Self::Property => "property",
            Self::Field => "field",
            Self::EnumEntry => "enum entry",
            Self::TypeAlias => "type alias",
            Self::TypeParameter => "type parameter",
        }
    }
}

/// Globally stable cross-module identity of a link-visible declaration.
///
/// Two declarations in different modules with the same signature denote the
/// same logical entity. Immutable once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signature {
    /// Visible across module boundaries
    Public {
        /// Package the entity lives in
        package: Spur,
        /// Dot-path of declaration names inside the package
        path: Vec<Spur>,
        /// Disambiguating member hash (overload sets, accessors)
        member_hash: Option<u64>,
    },
    /// Hoisted file-private entity; linkable inside one module only
    FileLocal {
        container: Box<Signature>,
        local_id: u64,
    },
    /// Positionally scoped inside a container (global type parameters)
    Scoped {
        container: Box<Signature>,
        index: u32,
    },
}

impl Signature {
    /// Is this identity visible to other modules?
    ///
    /// Scoped signatures inherit visibility from their container.
    pub fn is_public(&self) -> bool {
        match self {
            Self::Public { .. } => true,
            Self::FileLocal { .. } => false,
            Self::Scoped { container, .. } => container.is_public(),
        }
    }

    /// Build a scoped signature for the `index`th entity inside `self`
    pub fn scoped(&self, index: u32) -> Self {
        Self::Scoped {
            container: Box::new(self.clone()),
            index,
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    kind: SymbolKind,
    signature: Option<Signature>,
    payload: Option<DeclId>,
}

/// Arena of symbol identity slots, keyed by signature for link-visible
/// symbols.
///
/// `declare` reuses the existing slot for a signature so forward and self
/// references resolve to the same unbound handle; `bind` attaches the
/// payload exactly once.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    slots: Vec<Slot>,
    by_signature: FxHashMap<Signature, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare-or-reuse a link-visible symbol for `signature`.
    ///
    /// Fails if the signature is already declared under a different kind.
    pub fn declare(
        &mut self,
        kind: SymbolKind,
        signature: Signature,
    ) -> Result<SymbolId, MalformedModule> {
        if let Some(&id) = self.by_signature.get(&signature) {
            let existing = self.slots[id.0 as usize].kind;
            if existing != kind {
                return Err(MalformedModule::SignatureKindMismatch {
                    existing,
                    requested: kind,
                });
            }
            return Ok(id);
        }
        let id = SymbolId(self.slots.len() as u32);
        self.slots.push(Slot {
            kind,
            signature: Some(signature.clone()),
            payload: None,
        });
        self.by_signature.insert(signature, id);
        Ok(id)
    }

    /// Declare a fresh locally-scoped symbol (variables, parameters,
    /// scoped type parameters). Never keyed by signature.
    pub fn declare_scoped(&mut self, kind: SymbolKind) -> SymbolId {
        let id = SymbolId(self.slots.len() as u32);
        self.slots.push(Slot {
            kind,
            signature: None,
            payload: None,
        });
        id
    }

    /// Bind a symbol to its declaration. Exactly-once: a second bind fails.
    pub fn bind(&mut self, id: SymbolId, decl: DeclId) -> Result<(), MalformedModule> {
        let slot = &mut self.slots[id.0 as usize];
        if slot.payload.is_some() {
            return Err(MalformedModule::DuplicateBinding);
        }
        slot.payload = Some(decl);
        Ok(())
    }

    /// Overwrite a symbol's binding.
    ///
    /// Only for the property/field shared-identity reconciliation path;
    /// last-resolved-wins.
    pub fn rebind(&mut self, id: SymbolId, decl: DeclId) {
        self.slots[id.0 as usize].payload = Some(decl);
    }

    /// Re-insert the signature mapping for an already-created symbol.
    ///
    /// Forward-reference safety net for global type parameters: guarantees
    /// the linker resolves the signature to this slot even if an earlier
    /// speculative lookup raced it in.
    pub fn reexport(&mut self, id: SymbolId) {
        if let Some(signature) = self.slots[id.0 as usize].signature.clone() {
            self.by_signature.insert(signature, id);
        }
    }

    /// Symbol kind of a slot
    pub fn kind(&self, id: SymbolId) -> SymbolKind {
        self.slots[id.0 as usize].kind
    }

    /// Signature of a slot (None for locally-scoped symbols)
    pub fn signature(&self, id: SymbolId) -> Option<&Signature> {
        self.slots[id.0 as usize].signature.as_ref()
    }

    /// Declaration bound to a symbol, if any yet
    pub fn binding(&self, id: SymbolId) -> Option<DeclId> {
        self.slots[id.0 as usize].payload
    }

    /// Has the symbol been bound to a declaration?
    pub fn is_bound(&self, id: SymbolId) -> bool {
        self.slots[id.0 as usize].payload.is_some()
    }

    /// Does the symbol carry a signature at all (i.e. is it link-visible)?
    pub fn is_link_visible(&self, id: SymbolId) -> bool {
        self.slots[id.0 as usize].signature.is_some()
    }

    /// Does the symbol carry a publicly visible signature?
    pub fn has_public_signature(&self, id: SymbolId) -> bool {
        self.signature(id).is_some_and(Signature::is_public)
    }

    /// Look up an existing symbol by signature without declaring one
    pub fn find(&self, signature: &Signature) -> Option<SymbolId> {
        self.by_signature.get(signature).copied()
    }

    /// Number of slots in the arena
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Is the arena empty?
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
