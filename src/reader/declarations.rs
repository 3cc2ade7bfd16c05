//! Declaration decoding
//!
//! [`DeclarationDecoder`] drives one module-decode session: it walks
//! declaration records top-down, resolves every serialized symbol reference
//! through the shared [`SymbolTable`], and allocates decoded declarations
//! into a fresh [`IrGraph`]. Children are decoded before their container is
//! allocated; the parent link is the enclosing symbol taken from the scope
//! stack, so no placeholder declarations ever exist.
//!
//! A symbol is tracked as under construction from the moment its record
//! starts decoding until its declaration is bound, including on the error
//! path, so a failed decode never leaves a stale in-progress entry behind.

use lasso::{Rodeo, Spur};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::error::{LinkResult, MalformedModule, PolicyViolation, UnsupportedConstruct};
use crate::ir::decl::{
    AnonymousInitializerDecl, ClassDecl, ConstructorDecl, DeclBase, DeclId, Declaration, DeclKind,
    EnumEntryDecl, FieldDecl, FunctionBase, FunctionDecl, IrGraph, LocalDelegatedPropertyDecl,
    Parent, PropertyDecl, TypeAliasDecl, TypeParameterDecl, ValueParameterDecl, VariableDecl,
};
use crate::ir::flags::{
    ClassFlags, FieldFlags, FunctionFlags, LocalVarFlags, PropertyFlags, TypeAliasFlags,
    TypeParameterFlags, ValueParameterFlags,
};
use crate::ir::origin::{KnownOrigin, Origin};
use crate::reader::bodies::BodyDecoder;
use crate::reader::fake_overrides::FakeOverrideQueue;
use crate::reader::records::{
    AnonymousInitializerRecord, ClassRecord, DeclBaseRecord, DeclKindRecord, DeclRecord,
    EnumEntryRecord, FieldRecord, FunctionRecord, LocalDelegatedPropertyRecord, PropertyRecord,
    SignatureRecord, SignatureIndex, StringIndex, SymbolRef, TypeAliasRecord, TypeIndex,
    TypeParameterRecord, ValueParameterRecord, VariableRecord,
};
use crate::reader::scope::ParentScopeStack;
use crate::reader::settings::DecodeSettings;
use crate::reader::source::ModuleSource;
use crate::symbols::{Capability, Signature, SymbolId, SymbolKind, SymbolTable};

/// Where a type-parameter list hangs: classifier-level lists carry
/// link-visible signatures, function-level lists are scope-local.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeParameterScope {
    Global,
    Local,
}

/// One module-decode session.
///
/// Borrows the shared cross-module state (symbol table, string interner,
/// body decoder) and owns the per-session state: the declaration graph
/// being built, the scope stack, the type memo, the under-construction
/// registry and the fake-override queue.
pub struct DeclarationDecoder<'a, S: ModuleSource, B: BodyDecoder> {
    pub(crate) source: &'a S,
    pub(crate) symbols: &'a mut SymbolTable,
    pub(crate) strings: &'a mut Rodeo,
    pub(crate) bodies: &'a mut B,
    pub(crate) settings: DecodeSettings,
    pub(crate) graph: IrGraph,
    pub(crate) scope: ParentScopeStack,
    pub(crate) type_cache: FxHashMap<TypeIndex, crate::ir::ty::IrType>,
    pub(crate) in_progress: FxHashSet<SymbolId>,
    pub(crate) fake_overrides: FakeOverrideQueue,
}

impl<'a, S: ModuleSource, B: BodyDecoder> DeclarationDecoder<'a, S, B> {
    pub fn new(
        source: &'a S,
        symbols: &'a mut SymbolTable,
        strings: &'a mut Rodeo,
        bodies: &'a mut B,
        settings: DecodeSettings,
    ) -> Self {
        Self {
            source,
            symbols,
            strings,
            bodies,
            settings,
            graph: IrGraph::new(),
            scope: ParentScopeStack::new(),
            type_cache: FxHashMap::default(),
            in_progress: FxHashSet::default(),
            fake_overrides: FakeOverrideQueue::new(),
        }
    }

    /// Decode one top-level declaration record under `parent`
    pub fn decode_declaration(&mut self, record: &DeclRecord, parent: Parent) -> LinkResult<DeclId> {
        self.with_scope(parent, |this| this.decode_member(record))
    }

    /// End the session, handing the decoded graph and the classes queued
    /// for fake-override reconstruction to the caller
    pub fn finish(self) -> (IrGraph, FakeOverrideQueue) {
        (self.graph, self.fake_overrides)
    }

    /// The graph decoded so far
    pub fn graph(&self) -> &IrGraph {
        &self.graph
    }

    /// The shared symbol table
    pub fn symbols(&self) -> &SymbolTable {
        self.symbols
    }

    /// Classes queued for fake-override reconstruction so far
    pub fn fake_override_queue(&self) -> &FakeOverrideQueue {
        &self.fake_overrides
    }

    /// Is this symbol's declaration currently being decoded?
    pub fn is_under_construction(&self, symbol: SymbolId) -> bool {
        self.in_progress.contains(&symbol)
    }

    /// Number of declarations currently being decoded
    pub fn under_construction_count(&self) -> usize {
        self.in_progress.len()
    }

    // ========================================================================
    // Shared decode protocol
    // ========================================================================

    fn with_scope<T>(
        &mut self,
        parent: Parent,
        f: impl FnOnce(&mut Self) -> LinkResult<T>,
    ) -> LinkResult<T> {
        self.scope.push(parent);
        let result = f(self);
        self.scope.pop();
        result
    }

    fn with_under_construction<T>(
        &mut self,
        symbol: SymbolId,
        f: impl FnOnce(&mut Self) -> LinkResult<T>,
    ) -> LinkResult<T> {
        self.in_progress.insert(symbol);
        let result = f(self);
        self.in_progress.remove(&symbol);
        result
    }

    /// Intern a module-table string into the shared interner
    pub(crate) fn name(&mut self, index: StringIndex) -> LinkResult<Spur> {
        let source = self.source;
        let value = source.string(index)?;
        Ok(self.strings.get_or_intern(value))
    }

    /// Decode a signature record into a stable identity
    pub(crate) fn decode_signature(&mut self, index: SignatureIndex) -> LinkResult<Signature> {
        let source = self.source;
        match source.signature(index)? {
            SignatureRecord::Public {
                package,
                path,
                member_hash,
            } => {
                let member_hash = *member_hash;
                let package = self.name(*package)?;
                let mut segments = Vec::with_capacity(path.len());
                for &segment in path {
                    segments.push(self.name(segment)?);
                }
                Ok(Signature::Public {
                    package,
                    path: segments,
                    member_hash,
                })
            }
            SignatureRecord::FileLocal {
                container,
                local_id,
            } => {
                let (container, local_id) = (*container, *local_id);
                Ok(Signature::FileLocal {
                    container: Box::new(self.decode_signature(container)?),
                    local_id,
                })
            }
            SignatureRecord::Scoped { container, index } => {
                let (container, index) = (*container, *index);
                Ok(Signature::Scoped {
                    container: Box::new(self.decode_signature(container)?),
                    index,
                })
            }
        }
    }

    /// Resolve a serialized symbol reference under the capability the use
    /// site requires. Declares the symbol unbound if it is new.
    pub(crate) fn resolve_symbol(
        &mut self,
        reference: SymbolRef,
        capability: Capability,
    ) -> LinkResult<SymbolId> {
        if !capability.admits(reference.kind) {
            return Err(MalformedModule::WrongCapability {
                expected: capability.name(),
                found: reference.kind,
            }
            .into());
        }
        let signature = self.decode_signature(reference.signature)?;
        Ok(self.symbols.declare(reference.kind, signature)?)
    }

    fn decode_origin(&mut self, index: StringIndex) -> LinkResult<Origin> {
        let source = self.source;
        let tag = source.string(index)?;
        Ok(match KnownOrigin::from_name(tag) {
            Some(known) => Origin::Known(known),
            None => Origin::Custom(self.strings.get_or_intern(tag)),
        })
    }

    /// Assemble the shared base of a declaration: parent from the scope
    /// stack, origin, span, annotations
    fn decode_base(&mut self, record: &DeclBaseRecord, symbol: SymbolId) -> LinkResult<DeclBase> {
        let parent = self.scope.parent()?;
        let origin = self.decode_origin(record.origin)?;
        let annotations = self.decode_annotations(&record.annotations)?;
        Ok(DeclBase {
            symbol,
            span: record.coordinates,
            origin,
            annotations,
            parent,
        })
    }

    /// Allocate the finished declaration and bind its symbol to it
    fn finish_declaration(
        &mut self,
        symbol: SymbolId,
        base: DeclBase,
        kind: DeclKind,
    ) -> LinkResult<DeclId> {
        let id = self.graph.alloc(Declaration { base, kind });
        self.symbols.bind(symbol, id)?;
        Ok(id)
    }

    /// Kind dispatch for member and top-level records
    fn decode_member(&mut self, record: &DeclRecord) -> LinkResult<DeclId> {
        match &record.kind {
            DeclKindRecord::Class(class) => self.decode_class(&record.base, class),
            DeclKindRecord::Function(function) => {
                self.decode_function_record(&record.base, function, false)
            }
            DeclKindRecord::Constructor(ctor) => self.decode_constructor(&record.base, ctor),
            DeclKindRecord::Property(property) => self.decode_property(&record.base, property),
            DeclKindRecord::Field(field) => self.decode_field(&record.base, field, false),
            DeclKindRecord::Variable(variable) => self.decode_variable(&record.base, variable),
            DeclKindRecord::TypeAlias(alias) => self.decode_type_alias(&record.base, alias),
            DeclKindRecord::EnumEntry(entry) => self.decode_enum_entry(&record.base, entry),
            DeclKindRecord::AnonymousInitializer(init) => {
                self.decode_anonymous_initializer(&record.base, init)
            }
            DeclKindRecord::LocalDelegatedProperty(property) => {
                self.decode_local_delegated_property(&record.base, property)
            }
            DeclKindRecord::TypeParameter(_) => {
                Err(UnsupportedConstruct::TypeParameterOutsideList.into())
            }
            DeclKindRecord::ValueParameter(_) => {
                Err(UnsupportedConstruct::ValueParameterOutsideFunction.into())
            }
            DeclKindRecord::Error => self.decode_error_declaration(&record.base),
            DeclKindRecord::Unset => Err(MalformedModule::UnknownDeclarationTag.into()),
        }
    }

    // ========================================================================
    // Classes
    // ========================================================================

    fn decode_class(&mut self, base: &DeclBaseRecord, record: &ClassRecord) -> LinkResult<DeclId> {
        let flags = ClassFlags::decode(base.flags)?;
        let symbol = self.resolve_symbol(base.symbol, Capability::Class)?;
        self.with_under_construction(symbol, |this| {
            let decl_base = this.decode_base(base, symbol)?;
            let name = this.name(record.name)?;
            let payload = this.with_scope(Parent::Symbol(symbol), |this| {
                let type_parameters =
                    this.decode_type_parameters(&record.type_parameters, TypeParameterScope::Global)?;
                let mut supertypes = Vec::with_capacity(record.supertypes.len());
                for &index in &record.supertypes {
                    supertypes.push(this.decode_type(index)?);
                }
                let mut members = Vec::with_capacity(record.members.len());
                for member in &record.members {
                    if this.should_skip_fake_override(symbol, member)? {
                        continue;
                    }
                    members.push(this.decode_member(member)?);
                }
                let this_receiver = match &record.this_receiver {
                    Some(receiver) => {
                        Some(this.decode_receiver(receiver, this.settings.materialize_bodies)?)
                    }
                    None => None,
                };
                Ok(ClassDecl {
                    name,
                    flags,
                    type_parameters,
                    supertypes,
                    members,
                    this_receiver,
                })
            })?;
            let id = this.finish_declaration(symbol, decl_base, DeclKind::Class(payload))?;
            // Any link-visible class may have had members skipped above, so
            // the queue condition must be at least as wide as the skip
            // condition or a skipped member is stranded forever
            if !this.settings.eager_fake_overrides
                && this.symbols.is_link_visible(symbol)
                && this.platform_approves(symbol)
            {
                this.fake_overrides.enqueue(symbol);
            }
            Ok(id)
        })
    }

    fn platform_approves(&self, class: SymbolId) -> bool {
        self.symbols
            .signature(class)
            .is_some_and(|signature| (self.settings.platform_fake_overrides)(signature))
    }

    /// Should this serialized member be dropped in favor of the global
    /// fake-override reconstruction pass?
    ///
    /// Only peeks: resolves the member's signature without declaring a
    /// symbol or touching the graph.
    fn should_skip_fake_override(
        &mut self,
        class: SymbolId,
        member: &DeclRecord,
    ) -> LinkResult<bool> {
        if self.settings.eager_fake_overrides {
            return Ok(false);
        }
        // Functions and properties only; fields are always kept
        let is_fake = match &member.kind {
            DeclKindRecord::Function(_) => {
                FunctionFlags::decode(member.base.flags)?.is_fake_override
            }
            DeclKindRecord::Property(_) => {
                PropertyFlags::decode(member.base.flags)?.is_fake_override
            }
            _ => return Ok(false),
        };
        if !is_fake || !self.platform_approves(class) {
            return Ok(false);
        }
        let signature = self.decode_signature(member.base.symbol.signature)?;
        if !signature.is_public() {
            return Ok(false);
        }
        debug!(
            class = class.as_u32(),
            "skipping serialized fake override for global reconstruction"
        );
        Ok(true)
    }

    // ========================================================================
    // Functions and constructors
    // ========================================================================

    fn decode_function_record(
        &mut self,
        base: &DeclBaseRecord,
        record: &FunctionRecord,
        force_bodies: bool,
    ) -> LinkResult<DeclId> {
        let flags = FunctionFlags::decode(base.flags)?;
        let symbol = self.resolve_symbol(base.symbol, Capability::Function)?;
        self.with_under_construction(symbol, |this| {
            let decl_base = this.decode_base(base, symbol)?;
            let function = this.decode_function_base(symbol, record, flags, force_bodies)?;
            this.finish_declaration(
                symbol,
                decl_base,
                DeclKind::Function(FunctionDecl {
                    base: function,
                    corresponding_property: None,
                }),
            )
        })
    }

    fn decode_constructor(
        &mut self,
        base: &DeclBaseRecord,
        record: &FunctionRecord,
    ) -> LinkResult<DeclId> {
        let flags = FunctionFlags::decode(base.flags)?;
        let symbol = self.resolve_symbol(base.symbol, Capability::Constructor)?;
        self.with_under_construction(symbol, |this| {
            let decl_base = this.decode_base(base, symbol)?;
            let function = this.decode_function_base(symbol, record, flags, false)?;
            this.finish_declaration(
                symbol,
                decl_base,
                DeclKind::Constructor(ConstructorDecl {
                    base: function,
                    is_primary: flags.is_primary,
                }),
            )
        })
    }

    /// Shared function shape. The body-materialization decision is made
    /// once, against the declared return type, and passed down explicitly
    /// to default values and the body itself.
    fn decode_function_base(
        &mut self,
        symbol: SymbolId,
        record: &FunctionRecord,
        flags: FunctionFlags,
        force_bodies: bool,
    ) -> LinkResult<FunctionBase> {
        self.with_scope(Parent::Symbol(symbol), |this| {
            let type_parameters =
                this.decode_type_parameters(&record.type_parameters, TypeParameterScope::Local)?;
            let name = this.name(record.name)?;
            let return_type = this.decode_type(record.return_type)?;
            let materialize = force_bodies || this.materialize_function_body(flags, &return_type);
            let dispatch_receiver = match &record.dispatch_receiver {
                Some(receiver) => Some(this.decode_receiver(receiver, materialize)?),
                None => None,
            };
            let extension_receiver = match &record.extension_receiver {
                Some(receiver) => Some(this.decode_receiver(receiver, materialize)?),
                None => None,
            };
            let mut value_parameters = Vec::with_capacity(record.value_parameters.len());
            for parameter in &record.value_parameters {
                value_parameters.push(this.decode_value_parameter_record(parameter, materialize)?);
            }
            let body = match record.body {
                Some(index) => Some(this.statement_body(index, materialize, "function body")?),
                None => None,
            };
            Ok(FunctionBase {
                name,
                flags,
                type_parameters,
                return_type,
                dispatch_receiver,
                extension_receiver,
                value_parameters,
                body,
            })
        })
    }

    /// Receivers are value parameters serialized at index -1; they follow
    /// the owner's materialization decision like any other parameter
    fn decode_receiver(&mut self, record: &DeclRecord, materialize: bool) -> LinkResult<DeclId> {
        self.decode_value_parameter_record(record, materialize)
    }

    fn decode_value_parameter_record(
        &mut self,
        record: &DeclRecord,
        materialize: bool,
    ) -> LinkResult<DeclId> {
        let DeclKindRecord::ValueParameter(parameter) = &record.kind else {
            return Err(MalformedModule::UnknownDeclarationTag.into());
        };
        self.decode_value_parameter(&record.base, parameter, materialize)
    }

    fn decode_value_parameter(
        &mut self,
        base: &DeclBaseRecord,
        record: &ValueParameterRecord,
        materialize: bool,
    ) -> LinkResult<DeclId> {
        let flags = ValueParameterFlags::decode(base.flags)?;
        let symbol = self.symbols.declare_scoped(SymbolKind::ValueParameter);
        self.with_under_construction(symbol, |this| {
            let decl_base = this.decode_base(base, symbol)?;
            let name = this.name(record.name)?;
            let ty = this.decode_type(record.ty)?;
            let vararg_element = match record.vararg_element {
                Some(index) => Some(this.decode_type(index)?),
                None => None,
            };
            let default_value = match record.default_value {
                Some(index) => {
                    Some(this.expression_body(index, materialize, "parameter default value")?)
                }
                None => None,
            };
            this.finish_declaration(
                symbol,
                decl_base,
                DeclKind::ValueParameter(ValueParameterDecl {
                    name,
                    index: record.index,
                    flags,
                    ty,
                    vararg_element,
                    default_value,
                }),
            )
        })
    }

    // ========================================================================
    // Type parameters: two-phase
    // ========================================================================

    /// Decode a type-parameter list in two phases: declare every sibling's
    /// symbol and declaration first, then decode bounds, which may
    /// reference any sibling in either direction.
    fn decode_type_parameters(
        &mut self,
        records: &[DeclRecord],
        scope: TypeParameterScope,
    ) -> LinkResult<Vec<DeclId>> {
        let mut pending: Vec<(DeclId, &TypeParameterRecord)> = Vec::with_capacity(records.len());
        for record in records {
            let DeclKindRecord::TypeParameter(parameter) = &record.kind else {
                return Err(UnsupportedConstruct::TypeParameterOutsideList.into());
            };
            let flags = TypeParameterFlags::decode(record.base.flags)?;
            let symbol = match scope {
                TypeParameterScope::Global => {
                    let symbol =
                        self.resolve_symbol(record.base.symbol, Capability::TypeParameter)?;
                    // Safety net: make sure the signature mapping points at
                    // this slot even if a forward reference raced it in
                    self.symbols.reexport(symbol);
                    symbol
                }
                TypeParameterScope::Local => {
                    self.symbols.declare_scoped(SymbolKind::TypeParameter)
                }
            };
            let id = self.with_under_construction(symbol, |this| {
                let decl_base = this.decode_base(&record.base, symbol)?;
                let name = this.name(parameter.name)?;
                this.finish_declaration(
                    symbol,
                    decl_base,
                    DeclKind::TypeParameter(TypeParameterDecl {
                        name,
                        index: parameter.index,
                        flags,
                        bounds: Vec::new(),
                    }),
                )
            })?;
            pending.push((id, parameter));
        }
        let mut ids = Vec::with_capacity(pending.len());
        for (id, parameter) in pending {
            let mut bounds = Vec::with_capacity(parameter.bounds.len());
            for &index in &parameter.bounds {
                bounds.push(self.decode_type(index)?);
            }
            if let DeclKind::TypeParameter(decl) = &mut self.graph.decl_mut(id).kind {
                decl.bounds = bounds;
            }
            ids.push(id);
        }
        Ok(ids)
    }

    // ========================================================================
    // Properties and fields
    // ========================================================================

    fn decode_property(
        &mut self,
        base: &DeclBaseRecord,
        record: &PropertyRecord,
    ) -> LinkResult<DeclId> {
        let flags = PropertyFlags::decode(base.flags)?;
        let symbol = self.resolve_symbol(base.symbol, Capability::Property)?;
        self.with_under_construction(symbol, |this| {
            let decl_base = this.decode_base(base, symbol)?;
            let name = this.name(record.name)?;
            let effectively_private = flags.visibility.is_private_or_local();
            let (getter, setter, backing_field, shared_identity) =
                this.with_scope(Parent::Symbol(symbol), |this| {
                    let getter = match &record.getter {
                        Some(accessor) => Some(this.decode_accessor(accessor, symbol, false)?),
                        None => None,
                    };
                    let setter = match &record.setter {
                        Some(accessor) => Some(this.decode_accessor(accessor, symbol, false)?),
                        None => None,
                    };
                    let mut shared_identity = None;
                    let backing_field = match &record.backing_field {
                        Some(field_record) => {
                            let DeclKindRecord::Field(field) = &field_record.kind else {
                                return Err(MalformedModule::UnknownDeclarationTag.into());
                            };
                            shared_identity = field.corresponding_property;
                            Some(this.decode_field(
                                &field_record.base,
                                field,
                                effectively_private,
                            )?)
                        }
                        None => None,
                    };
                    Ok((getter, setter, backing_field, shared_identity))
                })?;
            let id = this.finish_declaration(
                symbol,
                decl_base,
                DeclKind::Property(PropertyDecl {
                    name,
                    flags,
                    getter,
                    setter,
                    backing_field,
                }),
            )?;
            // Legacy identity sharing: the backing field may carry its own
            // property identity. Reconcile it to this property's declaration,
            // last resolution wins.
            if let Some(shared) = shared_identity {
                let alias = this.resolve_symbol(shared, Capability::Property)?;
                if alias != symbol {
                    debug!(
                        property = symbol.as_u32(),
                        alias = alias.as_u32(),
                        "rebinding shared property identity from backing field"
                    );
                    this.symbols.rebind(alias, id);
                }
            }
            Ok(id)
        })
    }

    /// Property accessors are plain functions re-linked to their owner
    fn decode_accessor(
        &mut self,
        record: &DeclRecord,
        property: SymbolId,
        force_bodies: bool,
    ) -> LinkResult<DeclId> {
        let DeclKindRecord::Function(function) = &record.kind else {
            return Err(MalformedModule::UnknownDeclarationTag.into());
        };
        let id = self.decode_function_record(&record.base, function, force_bodies)?;
        if let DeclKind::Function(decl) = &mut self.graph.decl_mut(id).kind {
            decl.corresponding_property = Some(property);
        }
        Ok(id)
    }

    fn decode_field(
        &mut self,
        base: &DeclBaseRecord,
        record: &FieldRecord,
        effectively_private: bool,
    ) -> LinkResult<DeclId> {
        let flags = FieldFlags::decode(base.flags)?;
        let symbol = self.resolve_symbol(base.symbol, Capability::Field)?;
        self.with_under_construction(symbol, |this| {
            let decl_base = this.decode_base(base, symbol)?;
            let name = this.name(record.name)?;
            let ty = this.decode_type(record.ty)?;
            let materialize = this.materialize_field_initializer(flags, effectively_private, &ty);
            let initializer = match record.initializer {
                Some(index) => {
                    Some(this.expression_body(index, materialize, "field initializer")?)
                }
                None => None,
            };
            this.finish_declaration(
                symbol,
                decl_base,
                DeclKind::Field(FieldDecl {
                    name,
                    flags,
                    ty,
                    initializer,
                }),
            )
        })
    }

    // ========================================================================
    // Remaining declaration kinds
    // ========================================================================

    /// Variables only occur inside bodies that are already materializing,
    /// so their initializers are always decoded
    fn decode_variable(
        &mut self,
        base: &DeclBaseRecord,
        record: &VariableRecord,
    ) -> LinkResult<DeclId> {
        let flags = LocalVarFlags::decode(base.flags)?;
        let symbol = self.symbols.declare_scoped(SymbolKind::Variable);
        self.with_under_construction(symbol, |this| {
            let decl_base = this.decode_base(base, symbol)?;
            let name = this.name(record.name)?;
            let ty = this.decode_type(record.ty)?;
            let initializer = match record.initializer {
                Some(index) => Some(this.expression_body(index, true, "variable initializer")?),
                None => None,
            };
            this.finish_declaration(
                symbol,
                decl_base,
                DeclKind::Variable(VariableDecl {
                    name,
                    flags,
                    ty,
                    initializer,
                }),
            )
        })
    }

    fn decode_type_alias(
        &mut self,
        base: &DeclBaseRecord,
        record: &TypeAliasRecord,
    ) -> LinkResult<DeclId> {
        let flags = TypeAliasFlags::decode(base.flags)?;
        let symbol = self.resolve_symbol(base.symbol, Capability::TypeAlias)?;
        self.with_under_construction(symbol, |this| {
            let decl_base = this.decode_base(base, symbol)?;
            let name = this.name(record.name)?;
            let (type_parameters, expanded) = this.with_scope(Parent::Symbol(symbol), |this| {
                let type_parameters =
                    this.decode_type_parameters(&record.type_parameters, TypeParameterScope::Global)?;
                let expanded = this.decode_type(record.expanded)?;
                Ok((type_parameters, expanded))
            })?;
            this.finish_declaration(
                symbol,
                decl_base,
                DeclKind::TypeAlias(TypeAliasDecl {
                    name,
                    flags,
                    type_parameters,
                    expanded,
                }),
            )
        })
    }

    /// Enum entries decode their corresponding class and initializer
    /// eagerly: the entry is unusable without either
    fn decode_enum_entry(
        &mut self,
        base: &DeclBaseRecord,
        record: &EnumEntryRecord,
    ) -> LinkResult<DeclId> {
        let symbol = self.resolve_symbol(base.symbol, Capability::EnumEntry)?;
        self.with_under_construction(symbol, |this| {
            let decl_base = this.decode_base(base, symbol)?;
            let name = this.name(record.name)?;
            let (corresponding_class, initializer) =
                this.with_scope(Parent::Symbol(symbol), |this| {
                    let corresponding_class = match &record.corresponding_class {
                        Some(class) => Some(this.decode_member(class)?),
                        None => None,
                    };
                    let initializer = match record.initializer {
                        Some(index) => {
                            Some(this.expression_body(index, true, "enum entry initializer")?)
                        }
                        None => None,
                    };
                    Ok((corresponding_class, initializer))
                })?;
            this.finish_declaration(
                symbol,
                decl_base,
                DeclKind::EnumEntry(EnumEntryDecl {
                    name,
                    corresponding_class,
                    initializer,
                }),
            )
        })
    }

    fn decode_anonymous_initializer(
        &mut self,
        base: &DeclBaseRecord,
        record: &AnonymousInitializerRecord,
    ) -> LinkResult<DeclId> {
        let symbol = self.symbols.declare_scoped(SymbolKind::AnonymousInitializer);
        self.with_under_construction(symbol, |this| {
            let decl_base = this.decode_base(base, symbol)?;
            let body = this.statement_body(
                record.body,
                this.settings.materialize_bodies,
                "initializer block",
            )?;
            this.finish_declaration(
                symbol,
                decl_base,
                DeclKind::AnonymousInitializer(AnonymousInitializerDecl { body }),
            )
        })
    }

    /// Delegated-property machinery is only reached from a materializing
    /// body, so every part of it decodes eagerly
    fn decode_local_delegated_property(
        &mut self,
        base: &DeclBaseRecord,
        record: &LocalDelegatedPropertyRecord,
    ) -> LinkResult<DeclId> {
        let flags = LocalVarFlags::decode(base.flags)?;
        let symbol = self
            .symbols
            .declare_scoped(SymbolKind::LocalDelegatedProperty);
        self.with_under_construction(symbol, |this| {
            let decl_base = this.decode_base(base, symbol)?;
            let name = this.name(record.name)?;
            let (ty, delegate, getter, setter) =
                this.with_scope(Parent::Symbol(symbol), |this| {
                    let ty = this.decode_type(record.ty)?;
                    let DeclKindRecord::Variable(variable) = &record.delegate.kind else {
                        return Err(MalformedModule::UnknownDeclarationTag.into());
                    };
                    let delegate = this.decode_variable(&record.delegate.base, variable)?;
                    let getter = this.decode_accessor(&record.getter, symbol, true)?;
                    let setter = match &record.setter {
                        Some(accessor) => Some(this.decode_accessor(accessor, symbol, true)?),
                        None => None,
                    };
                    Ok((ty, delegate, getter, setter))
                })?;
            this.finish_declaration(
                symbol,
                decl_base,
                DeclKind::LocalDelegatedProperty(LocalDelegatedPropertyDecl {
                    name,
                    flags,
                    ty,
                    delegate,
                    getter,
                    setter,
                }),
            )
        })
    }

    /// Error declarations carry no payload; they get a fresh placeholder
    /// identity that is never keyed by signature
    fn decode_error_declaration(&mut self, base: &DeclBaseRecord) -> LinkResult<DeclId> {
        if !self.settings.allow_malformed {
            return Err(PolicyViolation::ErrorDeclarationNotAllowed.into());
        }
        let symbol = self.symbols.declare_scoped(SymbolKind::ErrorDeclaration);
        self.with_under_construction(symbol, |this| {
            let decl_base = this.decode_base(base, symbol)?;
            this.finish_declaration(symbol, decl_base, DeclKind::Error)
        })
    }
}
