//! End-to-end decode sessions over in-memory modules

use lasso::Rodeo;

use irlink::ir::{
    ClassFlags, DeclKind, FieldFlags, FileId, FunctionFlags, Parent, PropertyFlags, Visibility,
};
use irlink::reader::records::{
    ClassRecord, DeclBaseRecord, DeclKindRecord, DeclRecord, ExprRecord, FieldRecord,
    FunctionRecord, LiteralRecord, PropertyRecord, SignatureIndex, SignatureRecord, StmtRecord,
    SymbolRef, TypeIndex,
};
use irlink::reader::records::BodyRecord;
use irlink::reader::records::TypeRecord;
use irlink::reader::{
    decode_module, DecodeSettings, DecodedModule, InMemoryModule, RecordBodyDecoder,
};
use irlink::symbols::{SymbolKind, SymbolTable};
use irlink::LinkResult;

/// Builder around an [`InMemoryModule`] for assembling test modules
struct ModuleBuilder {
    module: InMemoryModule,
}

impl ModuleBuilder {
    fn new() -> Self {
        let mut module = InMemoryModule::new();
        // Index 0 is the default origin tag
        module.add_string("DEFINED");
        Self { module }
    }

    fn public_signature(&mut self, path: &[&str]) -> SignatureIndex {
        let package = self.module.add_string("demo");
        let path = path
            .iter()
            .map(|segment| self.module.add_string(*segment))
            .collect();
        self.module.add_signature(SignatureRecord::Public {
            package,
            path,
            member_hash: None,
        })
    }

    fn file_local_signature(&mut self, container: SignatureIndex, local_id: u64) -> SignatureIndex {
        self.module.add_signature(SignatureRecord::FileLocal {
            container,
            local_id,
        })
    }

    fn class_type(&mut self, signature: SignatureIndex) -> TypeIndex {
        self.module
            .add_type(TypeRecord::simple(SymbolRef::new(SymbolKind::Class, signature)))
    }

    fn unit_body(&mut self) -> u32 {
        self.module
            .add_body(BodyRecord::Statements(vec![StmtRecord::Return(None)]))
    }

    fn int_initializer(&mut self, value: i64) -> u32 {
        self.module.add_body(BodyRecord::Expression(ExprRecord::Const(
            LiteralRecord::Int(value),
        )))
    }

    fn function(
        &mut self,
        name: &str,
        signature: SignatureIndex,
        flags: FunctionFlags,
        return_type: TypeIndex,
        body: Option<u32>,
    ) -> DeclRecord {
        let name = self.module.add_string(name);
        DeclRecord::new(
            DeclBaseRecord::new(SymbolRef::new(SymbolKind::Function, signature))
                .with_flags(flags.encode()),
            DeclKindRecord::Function(FunctionRecord {
                name,
                return_type,
                body,
                ..FunctionRecord::default()
            }),
        )
    }

    fn class(
        &mut self,
        name: &str,
        signature: SignatureIndex,
        members: Vec<DeclRecord>,
    ) -> DeclRecord {
        let name = self.module.add_string(name);
        DeclRecord::new(
            DeclBaseRecord::new(SymbolRef::new(SymbolKind::Class, signature))
                .with_flags(ClassFlags::default().encode()),
            DeclKindRecord::Class(ClassRecord {
                name,
                members,
                ..ClassRecord::default()
            }),
        )
    }

    fn decode(
        &self,
        declarations: &[DeclRecord],
        symbols: &mut SymbolTable,
        strings: &mut Rodeo,
        settings: DecodeSettings,
    ) -> LinkResult<DecodedModule> {
        let mut bodies = RecordBodyDecoder::new();
        decode_module(
            &self.module,
            declarations,
            symbols,
            strings,
            &mut bodies,
            settings,
            FileId(0),
        )
    }
}

fn session() -> (SymbolTable, Rodeo) {
    (SymbolTable::new(), Rodeo::default())
}

#[test]
fn lazy_session_keeps_inline_bodies_and_skips_the_rest() {
    let mut builder = ModuleBuilder::new();
    let unit_sig = builder.public_signature(&["Unit"]);
    let unit_ty = builder.class_type(unit_sig);
    let class_sig = builder.public_signature(&["Api"]);
    let fast_sig = builder.public_signature(&["Api", "fast"]);
    let slow_sig = builder.public_signature(&["Api", "slow"]);

    let fast_body = builder.unit_body();
    let slow_body = builder.unit_body();
    let fast = builder.function(
        "fast",
        fast_sig,
        FunctionFlags {
            is_inline: true,
            ..FunctionFlags::default()
        },
        unit_ty,
        Some(fast_body),
    );
    let slow = builder.function("slow", slow_sig, FunctionFlags::default(), unit_ty, Some(slow_body));
    let class = builder.class("Api", class_sig, vec![fast, slow]);

    let (mut symbols, mut strings) = session();
    let settings = DecodeSettings::default().with_materialize_bodies(false);
    let decoded = builder
        .decode(&[class], &mut symbols, &mut strings, settings)
        .unwrap();

    let class_decl = decoded.graph.decl(decoded.top_level[0]);
    let members = &class_decl.as_class().unwrap().members;
    assert_eq!(members.len(), 2);

    let fast_decl = decoded.graph.decl(members[0]).as_function().unwrap();
    let slow_decl = decoded.graph.decl(members[1]).as_function().unwrap();
    assert!(!fast_decl.base.body.as_ref().unwrap().is_skipped());
    assert!(slow_decl.base.body.as_ref().unwrap().is_skipped());

    // Members hang off the class symbol, the class off the file
    let class_symbol = class_decl.base.symbol;
    assert_eq!(
        decoded.graph.decl(members[0]).base.parent,
        Parent::Symbol(class_symbol)
    );
    assert_eq!(class_decl.base.parent, Parent::File(FileId(0)));
}

#[test]
fn leaked_private_type_forces_field_initializer() {
    let mut builder = ModuleBuilder::new();
    let class_sig = builder.public_signature(&["Owner"]);
    let public_ty_sig = builder.public_signature(&["Int"]);
    let public_ty = builder.class_type(public_ty_sig);
    // A class hoisted out of a private scope: linkable only inside the file
    let local_sig = builder.file_local_signature(class_sig, 1);
    let local_ty = builder.class_type(local_sig);

    let private_property = |builder: &mut ModuleBuilder, name: &str, sig, field_sig, ty| {
        let init = builder.int_initializer(42);
        let field_name = builder.module.add_string(name);
        let backing_field = DeclRecord::new(
            DeclBaseRecord::new(SymbolRef::new(SymbolKind::Field, field_sig)).with_flags(
                FieldFlags {
                    visibility: Visibility::Private,
                    ..FieldFlags::default()
                }
                .encode(),
            ),
            DeclKindRecord::Field(FieldRecord {
                name: field_name,
                ty,
                initializer: Some(init),
                ..FieldRecord::default()
            }),
        );
        let property_name = builder.module.add_string(name);
        DeclRecord::new(
            DeclBaseRecord::new(SymbolRef::new(SymbolKind::Property, sig)).with_flags(
                PropertyFlags {
                    visibility: Visibility::Private,
                    ..PropertyFlags::default()
                }
                .encode(),
            ),
            DeclKindRecord::Property(PropertyRecord {
                name: property_name,
                backing_field: Some(Box::new(backing_field)),
                ..PropertyRecord::default()
            }),
        )
    };

    let leaking_sig = builder.public_signature(&["Owner", "cache"]);
    let leaking_field_sig = builder.public_signature(&["Owner", "cache.field"]);
    let plain_sig = builder.public_signature(&["Owner", "count"]);
    let plain_field_sig = builder.public_signature(&["Owner", "count.field"]);

    let leaking = private_property(&mut builder, "cache", leaking_sig, leaking_field_sig, local_ty);
    let plain = private_property(&mut builder, "count", plain_sig, plain_field_sig, public_ty);
    let class = builder.class("Owner", class_sig, vec![leaking, plain]);

    let (mut symbols, mut strings) = session();
    let settings = DecodeSettings::default().with_materialize_bodies(false);
    let decoded = builder
        .decode(&[class], &mut symbols, &mut strings, settings)
        .unwrap();

    let members = &decoded
        .graph
        .decl(decoded.top_level[0])
        .as_class()
        .unwrap()
        .members;

    let field_initializer = |property_id| {
        let property = decoded.graph.decl(property_id).as_property().unwrap();
        let field_id = property.backing_field.unwrap();
        let DeclKind::Field(field) = &decoded.graph.decl(field_id).kind else {
            panic!("expected field");
        };
        field.initializer.clone().unwrap()
    };

    // The file-local field type escapes its private scope: skipping the
    // initializer would strand it, so the session decodes it anyway
    assert!(!field_initializer(members[0]).is_skipped());
    // The public-typed sibling stays lazy
    assert!(field_initializer(members[1]).is_skipped());
}

#[test]
fn accessors_link_back_to_their_property() {
    let mut builder = ModuleBuilder::new();
    let unit_sig = builder.public_signature(&["Unit"]);
    let unit_ty = builder.class_type(unit_sig);
    let class_sig = builder.public_signature(&["Box"]);
    let property_sig = builder.public_signature(&["Box", "value"]);
    let getter_sig = builder.public_signature(&["Box", "value.get"]);

    let getter = builder.function(
        "<get-value>",
        getter_sig,
        FunctionFlags::default(),
        unit_ty,
        None,
    );
    let property_name = builder.module.add_string("value");
    let property = DeclRecord::new(
        DeclBaseRecord::new(SymbolRef::new(SymbolKind::Property, property_sig))
            .with_flags(PropertyFlags::default().encode()),
        DeclKindRecord::Property(PropertyRecord {
            name: property_name,
            getter: Some(Box::new(getter)),
            ..PropertyRecord::default()
        }),
    );
    let class = builder.class("Box", class_sig, vec![property]);

    let (mut symbols, mut strings) = session();
    let decoded = builder
        .decode(&[class], &mut symbols, &mut strings, DecodeSettings::default())
        .unwrap();

    let members = &decoded
        .graph
        .decl(decoded.top_level[0])
        .as_class()
        .unwrap()
        .members;
    let property = decoded.graph.decl(members[0]);
    let getter_id = property.as_property().unwrap().getter.unwrap();
    let getter = decoded.graph.decl(getter_id).as_function().unwrap();
    assert_eq!(getter.corresponding_property, Some(property.base.symbol));
    // The getter's parent is the property, not the class
    assert_eq!(
        decoded.graph.decl(getter_id).base.parent,
        Parent::Symbol(property.base.symbol)
    );
}

#[test]
fn fake_overrides_deferred_to_the_global_pass() {
    let mut builder = ModuleBuilder::new();
    let unit_sig = builder.public_signature(&["Unit"]);
    let unit_ty = builder.class_type(unit_sig);
    let class_sig = builder.public_signature(&["Impl"]);
    let own_sig = builder.public_signature(&["Impl", "run"]);
    let override_sig = builder.public_signature(&["Impl", "toString"]);

    let records = |builder: &mut ModuleBuilder| {
        let own = builder.function("run", own_sig, FunctionFlags::default(), unit_ty, None);
        let inherited = builder.function(
            "toString",
            override_sig,
            FunctionFlags {
                is_fake_override: true,
                ..FunctionFlags::default()
            },
            unit_ty,
            None,
        );
        builder.class("Impl", class_sig, vec![own, inherited])
    };

    // Deferred: the serialized override is dropped, the class is queued
    let class = records(&mut builder);
    let (mut symbols, mut strings) = session();
    let settings = DecodeSettings::default().with_materialize_bodies(false);
    let decoded = builder
        .decode(&[class], &mut symbols, &mut strings, settings)
        .unwrap();
    let class_decl = decoded.graph.decl(decoded.top_level[0]);
    assert_eq!(class_decl.as_class().unwrap().members.len(), 1);
    assert_eq!(decoded.fake_overrides, vec![class_decl.base.symbol]);

    // Eager: the serialized override is decoded in place, nothing queued
    let class = records(&mut builder);
    let (mut symbols, mut strings) = session();
    let settings = DecodeSettings::default().with_eager_fake_overrides(true);
    let decoded = builder
        .decode(&[class], &mut symbols, &mut strings, settings)
        .unwrap();
    assert_eq!(
        decoded
            .graph
            .decl(decoded.top_level[0])
            .as_class()
            .unwrap()
            .members
            .len(),
        2
    );
    assert!(decoded.fake_overrides.is_empty());
}

#[test]
fn file_local_class_with_skipped_override_is_still_queued() {
    // A file-private class is link-visible inside its module, so its
    // public-signatured overrides are skippable; the class itself must
    // then be queued or the skipped member is lost
    let mut builder = ModuleBuilder::new();
    let unit_sig = builder.public_signature(&["Unit"]);
    let unit_ty = builder.class_type(unit_sig);
    let container_sig = builder.public_signature(&["owner.file"]);
    let class_sig = builder.file_local_signature(container_sig, 1);
    let override_sig = builder.public_signature(&["Hidden", "toString"]);

    let inherited = builder.function(
        "toString",
        override_sig,
        FunctionFlags {
            is_fake_override: true,
            ..FunctionFlags::default()
        },
        unit_ty,
        None,
    );
    let class = builder.class("Hidden", class_sig, vec![inherited]);

    let (mut symbols, mut strings) = session();
    let decoded = builder
        .decode(&[class], &mut symbols, &mut strings, DecodeSettings::default())
        .unwrap();

    let class_decl = decoded.graph.decl(decoded.top_level[0]);
    assert!(class_decl.as_class().unwrap().members.is_empty());
    assert_eq!(decoded.fake_overrides, vec![class_decl.base.symbol]);
}

#[test]
fn platform_filter_vetoes_deferral() {
    let mut builder = ModuleBuilder::new();
    let unit_sig = builder.public_signature(&["Unit"]);
    let unit_ty = builder.class_type(unit_sig);
    let class_sig = builder.public_signature(&["Impl"]);
    let override_sig = builder.public_signature(&["Impl", "toString"]);

    let inherited = builder.function(
        "toString",
        override_sig,
        FunctionFlags {
            is_fake_override: true,
            ..FunctionFlags::default()
        },
        unit_ty,
        None,
    );
    let class = builder.class("Impl", class_sig, vec![inherited]);

    let (mut symbols, mut strings) = session();
    let settings = DecodeSettings::default().with_platform_filter(|_| false);
    let decoded = builder
        .decode(&[class], &mut symbols, &mut strings, settings)
        .unwrap();

    // Reconstruction unavailable: the serialized member must be kept
    let class_decl = decoded.graph.decl(decoded.top_level[0]);
    assert_eq!(class_decl.as_class().unwrap().members.len(), 1);
    assert!(decoded.fake_overrides.is_empty());
}

#[test]
fn symbols_link_across_modules_by_signature() {
    // Module A defines demo.Node; module B references it before/without
    // seeing the definition again
    let mut module_a = ModuleBuilder::new();
    let node_sig_a = module_a.public_signature(&["Node"]);
    let class = module_a.class("Node", node_sig_a, Vec::new());

    let mut module_b = ModuleBuilder::new();
    let node_sig_b = module_b.public_signature(&["Node"]);
    let node_ty = module_b.class_type(node_sig_b);
    let fun_sig = module_b.public_signature(&["head"]);
    let function = module_b.function("head", fun_sig, FunctionFlags::default(), node_ty, None);

    let (mut symbols, mut strings) = session();
    let decoded_a = module_a
        .decode(&[class], &mut symbols, &mut strings, DecodeSettings::default())
        .unwrap();
    let decoded_b = module_b
        .decode(&[function], &mut symbols, &mut strings, DecodeSettings::default())
        .unwrap();

    let node_symbol = decoded_a.graph.decl(decoded_a.top_level[0]).base.symbol;
    let head = decoded_b
        .graph
        .decl(decoded_b.top_level[0])
        .as_function()
        .unwrap();
    assert_eq!(head.base.return_type.classifier(), Some(node_symbol));
    assert_eq!(
        symbols.binding(node_symbol),
        Some(decoded_a.top_level[0])
    );
}
