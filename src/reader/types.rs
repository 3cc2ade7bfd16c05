//! Type decoding
//!
//! Types are decoded from the module's type table by index and memoized
//! per session: the same index yields a value-equal type without touching
//! the source again. Structurally equal types at different indices stay
//! distinct values; sharing is an accident of serialization, not a
//! semantic property.

use crate::error::{LinkResult, PolicyViolation};
use crate::ir::ty::{IrType, SimpleType, TypeAbbreviation, TypeArgument};
use crate::reader::bodies::BodyDecoder;
use crate::reader::declarations::DeclarationDecoder;
use crate::reader::records::{AbbreviationRecord, TypeArgumentRecord, TypeIndex, TypeRecord};
use crate::reader::source::ModuleSource;
use crate::symbols::Capability;

impl<S: ModuleSource, B: BodyDecoder> DeclarationDecoder<'_, S, B> {
    /// Decode the type at `index`, consulting the per-session memo first
    pub fn decode_type(&mut self, index: TypeIndex) -> LinkResult<IrType> {
        if let Some(cached) = self.type_cache.get(&index) {
            return Ok(cached.clone());
        }
        let record = self.source.type_record(index)?.clone();
        let ty = match record {
            TypeRecord::Simple {
                classifier,
                nullable,
                arguments,
                annotations,
                abbreviation,
            } => {
                let classifier = self.resolve_symbol(classifier, Capability::Classifier)?;
                let arguments = self.decode_type_arguments(&arguments)?;
                let annotations = self.decode_annotations(&annotations)?;
                let abbreviation = match abbreviation {
                    Some(record) => Some(Box::new(self.decode_abbreviation(&record)?)),
                    None => None,
                };
                IrType::Simple(SimpleType {
                    classifier,
                    nullable,
                    arguments,
                    annotations,
                    abbreviation,
                })
            }
            TypeRecord::Dynamic { annotations } => IrType::Dynamic {
                annotations: self.decode_annotations(&annotations)?,
            },
            TypeRecord::Error { annotations } => {
                if !self.settings.allow_malformed {
                    return Err(PolicyViolation::ErrorTypeNotAllowed.into());
                }
                IrType::Error {
                    annotations: self.decode_annotations(&annotations)?,
                }
            }
        };
        self.type_cache.insert(index, ty.clone());
        Ok(ty)
    }

    fn decode_type_arguments(
        &mut self,
        records: &[TypeArgumentRecord],
    ) -> LinkResult<Vec<TypeArgument>> {
        let mut out = Vec::with_capacity(records.len());
        for record in records {
            out.push(match *record {
                TypeArgumentRecord::Star => TypeArgument::Star,
                TypeArgumentRecord::Typed { variance, index } => TypeArgument::Typed {
                    variance,
                    ty: self.decode_type(index)?,
                },
            });
        }
        Ok(out)
    }

    fn decode_abbreviation(
        &mut self,
        record: &AbbreviationRecord,
    ) -> LinkResult<TypeAbbreviation> {
        let alias = self.resolve_symbol(record.alias, Capability::TypeAlias)?;
        Ok(TypeAbbreviation {
            alias,
            nullable: record.nullable,
            arguments: self.decode_type_arguments(&record.arguments)?,
            annotations: self.decode_annotations(&record.annotations)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LinkError;
    use crate::ir::ty::Variance;
    use crate::reader::bodies::RecordBodyDecoder;
    use crate::reader::records::{SignatureRecord, SymbolRef};
    use crate::reader::settings::DecodeSettings;
    use crate::reader::source::InMemoryModule;
    use crate::symbols::{SymbolKind, SymbolTable};
    use lasso::Rodeo;

    struct Fixture {
        module: InMemoryModule,
        symbols: SymbolTable,
        strings: Rodeo,
        bodies: RecordBodyDecoder,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                module: InMemoryModule::new(),
                symbols: SymbolTable::new(),
                strings: Rodeo::default(),
                bodies: RecordBodyDecoder::new(),
            }
        }

        fn class_ref(&mut self, name: &str) -> SymbolRef {
            let package = self.module.add_string("demo");
            let path = vec![self.module.add_string(name)];
            let signature = self.module.add_signature(SignatureRecord::Public {
                package,
                path,
                member_hash: None,
            });
            SymbolRef::new(SymbolKind::Class, signature)
        }

        fn decoder(
            &mut self,
            settings: DecodeSettings,
        ) -> DeclarationDecoder<'_, InMemoryModule, RecordBodyDecoder> {
            DeclarationDecoder::new(
                &self.module,
                &mut self.symbols,
                &mut self.strings,
                &mut self.bodies,
                settings,
            )
        }
    }

    #[test]
    fn test_memo_serves_repeat_lookups_without_refetching() {
        let mut fx = Fixture::new();
        let class = fx.class_ref("List");
        let index = fx.module.add_type(TypeRecord::simple(class));

        let mut decoder = fx.decoder(DecodeSettings::default());
        let first = decoder.decode_type(index).unwrap();
        let second = decoder.decode_type(index).unwrap();
        assert_eq!(first, second);
        drop(decoder);
        // One fetch for the decode, none for the memo hit
        assert_eq!(fx.module.type_fetch_count(), 1);
    }

    #[test]
    fn test_nested_arguments_resolve_through_the_memo() {
        let mut fx = Fixture::new();
        let list = fx.class_ref("List");
        let item = fx.class_ref("Item");
        let item_ty = fx.module.add_type(TypeRecord::simple(item));
        let list_ty = fx.module.add_type(TypeRecord::Simple {
            classifier: list,
            nullable: true,
            arguments: vec![TypeArgumentRecord::Typed {
                variance: Variance::Covariant,
                index: item_ty,
            }],
            annotations: Vec::new(),
            abbreviation: None,
        });

        let mut decoder = fx.decoder(DecodeSettings::default());
        let ty = decoder.decode_type(list_ty).unwrap();
        let IrType::Simple(simple) = &ty else {
            panic!("expected simple type");
        };
        assert!(simple.nullable);
        assert_eq!(simple.arguments.len(), 1);

        // Decoding the argument again hits the memo populated by the
        // nested decode
        let again = decoder.decode_type(item_ty).unwrap();
        let TypeArgument::Typed { ty: arg_ty, .. } = &simple.arguments[0] else {
            panic!("expected typed argument");
        };
        assert_eq!(&again, arg_ty);
        drop(decoder);
        assert_eq!(fx.module.type_fetch_count(), 2);
    }

    #[test]
    fn test_error_type_gated_by_policy() {
        let mut fx = Fixture::new();
        let index = fx.module.add_type(TypeRecord::Error {
            annotations: Vec::new(),
        });

        let mut decoder = fx.decoder(DecodeSettings::default());
        let err = decoder.decode_type(index).unwrap_err();
        assert!(matches!(
            err,
            LinkError::Policy(PolicyViolation::ErrorTypeNotAllowed)
        ));
        drop(decoder);

        let mut decoder = fx.decoder(DecodeSettings::default().with_allow_malformed(true));
        let ty = decoder.decode_type(index).unwrap();
        assert!(ty.is_error());
    }

    #[test]
    fn test_classifier_capability_enforced() {
        let mut fx = Fixture::new();
        let mut class = fx.class_ref("NotAClass");
        class.kind = SymbolKind::Property;
        let index = fx.module.add_type(TypeRecord::simple(class));

        let mut decoder = fx.decoder(DecodeSettings::default());
        let err = decoder.decode_type(index).unwrap_err();
        assert!(err.is_malformed());
    }
}
