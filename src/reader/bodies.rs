//! Body materialization and annotation decoding
//!
//! The session-wide `materialize_bodies` switch gates function bodies,
//! parameter default values and field initializers. Two per-declaration
//! overrides force materialization in a lazy session: inline necessity
//! (inline callers need the body regardless of laziness) and escaped
//! private types (skipping the member would strand the escaped type's
//! members for every later consumer that reaches them through this
//! member's declared type). The decision is made once per declaration and
//! threaded down as an explicit parameter.
//!
//! A skipped body is always an explicit error-tagged placeholder carrying
//! a diagnostic string, never an absent body.

use tracing::debug;

use crate::error::{LinkResult, MalformedModule};
use crate::ir::body::{
    Annotation, AnnotationValue, Expr, ExpressionBody, Literal, StatementBody, Stmt,
};
use crate::ir::flags::{FieldFlags, FunctionFlags};
use crate::ir::ty::IrType;
use crate::reader::declarations::DeclarationDecoder;
use crate::reader::records::{
    AnnotationArgRecord, AnnotationRecord, BodyIndex, BodyRecord, ExprRecord, LiteralRecord,
    StmtRecord,
};
use crate::reader::source::ModuleSource;
use crate::symbols::{Capability, SymbolKind};

/// Expression/statement decoder collaborator: builds bodies from records
pub trait BodyDecoder {
    fn decode_expression_body(&mut self, record: &BodyRecord) -> LinkResult<ExpressionBody>;
    fn decode_statement_body(&mut self, record: &BodyRecord) -> LinkResult<StatementBody>;
}

/// Default collaborator interpreting structured body records directly
#[derive(Debug, Default)]
pub struct RecordBodyDecoder;

impl RecordBodyDecoder {
    pub fn new() -> Self {
        Self
    }

    fn expr(record: &ExprRecord) -> Expr {
        match record {
            ExprRecord::Const(lit) => Expr::Const(literal(lit)),
            ExprRecord::Seq(items) => Expr::Seq(items.iter().map(Self::expr).collect()),
        }
    }

    fn stmt(record: &StmtRecord) -> Stmt {
        match record {
            StmtRecord::Expr(expr) => Stmt::Expr(Self::expr(expr)),
            StmtRecord::Return(expr) => Stmt::Return(expr.as_ref().map(Self::expr)),
        }
    }
}

pub(crate) fn literal(record: &LiteralRecord) -> Literal {
    match record {
        LiteralRecord::Null => Literal::Null,
        LiteralRecord::Bool(value) => Literal::Bool(*value),
        LiteralRecord::Int(value) => Literal::Int(*value),
        LiteralRecord::Str(value) => Literal::Str(value.clone()),
    }
}

impl BodyDecoder for RecordBodyDecoder {
    fn decode_expression_body(&mut self, record: &BodyRecord) -> LinkResult<ExpressionBody> {
        match record {
            BodyRecord::Expression(expr) => Ok(ExpressionBody::new(Self::expr(expr))),
            BodyRecord::Statements(_) => Err(MalformedModule::BodyKindMismatch.into()),
        }
    }

    fn decode_statement_body(&mut self, record: &BodyRecord) -> LinkResult<StatementBody> {
        match record {
            BodyRecord::Statements(stmts) => {
                Ok(StatementBody::new(stmts.iter().map(Self::stmt).collect()))
            }
            BodyRecord::Expression(_) => Err(MalformedModule::BodyKindMismatch.into()),
        }
    }
}

impl<S: ModuleSource, B: BodyDecoder> DeclarationDecoder<'_, S, B> {
    /// Decode an expression body, or substitute a placeholder when the
    /// policy said not to materialize it
    pub(crate) fn expression_body(
        &mut self,
        index: BodyIndex,
        materialize: bool,
        what: &str,
    ) -> LinkResult<ExpressionBody> {
        if !materialize {
            return Ok(ExpressionBody::skipped(format!(
                "{what} was not materialized by the lazy-loading session"
            )));
        }
        let record = self.source.body_record(index)?.clone();
        self.bodies.decode_expression_body(&record)
    }

    /// Decode a statement body, or substitute a placeholder block
    pub(crate) fn statement_body(
        &mut self,
        index: BodyIndex,
        materialize: bool,
        what: &str,
    ) -> LinkResult<StatementBody> {
        if !materialize {
            return Ok(StatementBody::skipped(format!(
                "{what} was not materialized by the lazy-loading session"
            )));
        }
        let record = self.source.body_record(index)?.clone();
        self.bodies.decode_statement_body(&record)
    }

    /// Should this function's body (and default values) materialize now?
    ///
    /// Evaluated once per declaration against the declared return type,
    /// not the body.
    pub(crate) fn materialize_function_body(
        &self,
        flags: FunctionFlags,
        declared: &IrType,
    ) -> bool {
        if self.settings.materialize_bodies {
            return true;
        }
        if flags.is_inline && self.settings.allow_inline_bodies {
            debug!("materializing inline function body in lazy session");
            return true;
        }
        if flags.visibility.is_private_or_local() && self.type_escapes_private_scope(declared) {
            debug!("materializing body of private member with escaped private type");
            return true;
        }
        false
    }

    /// Should this field's initializer materialize now?
    ///
    /// `effectively_private` is the owning property's classification when
    /// the field backs a property.
    pub(crate) fn materialize_field_initializer(
        &self,
        flags: FieldFlags,
        effectively_private: bool,
        declared: &IrType,
    ) -> bool {
        if self.settings.materialize_bodies {
            return true;
        }
        let private = effectively_private || flags.visibility.is_private_or_local();
        if private && self.type_escapes_private_scope(declared) {
            debug!("materializing initializer of private field with escaped private type");
            return true;
        }
        false
    }

    /// Does this declared type expose a classifier that is not reachable
    /// through any public signature (an anonymous/local type leaked out of
    /// its private scope)?
    pub(crate) fn type_escapes_private_scope(&self, ty: &IrType) -> bool {
        let Some(classifier) = ty.classifier() else {
            return false;
        };
        if self.symbols.kind(classifier) == SymbolKind::TypeParameter {
            return false;
        }
        !self.symbols.has_public_signature(classifier)
    }

    /// Decode an annotation list
    pub(crate) fn decode_annotations(
        &mut self,
        records: &[AnnotationRecord],
    ) -> LinkResult<Vec<Annotation>> {
        let mut out = Vec::with_capacity(records.len());
        for record in records {
            out.push(self.decode_annotation(record)?);
        }
        Ok(out)
    }

    fn decode_annotation(&mut self, record: &AnnotationRecord) -> LinkResult<Annotation> {
        let constructor = self.resolve_symbol(record.constructor, Capability::Constructor)?;
        let mut arguments = Vec::with_capacity(record.arguments.len());
        for (name, value) in &record.arguments {
            let name = self.name(*name)?;
            arguments.push((name, self.decode_annotation_value(value)?));
        }
        Ok(Annotation {
            constructor,
            arguments,
        })
    }

    fn decode_annotation_value(
        &mut self,
        record: &AnnotationArgRecord,
    ) -> LinkResult<AnnotationValue> {
        Ok(match record {
            AnnotationArgRecord::Constant(lit) => AnnotationValue::Constant(literal(lit)),
            AnnotationArgRecord::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.decode_annotation_value(item)?);
                }
                AnnotationValue::Array(out)
            }
            AnnotationArgRecord::EnumEntry { class, entry } => AnnotationValue::EnumEntry {
                class: self.resolve_symbol(*class, Capability::Class)?,
                entry: self.name(*entry)?,
            },
            AnnotationArgRecord::ClassLiteral(index) => {
                AnnotationValue::ClassLiteral(self.decode_type(*index)?)
            }
            AnnotationArgRecord::Nested(inner) => {
                AnnotationValue::Nested(Box::new(self.decode_annotation(inner)?))
            }
        })
    }
}
