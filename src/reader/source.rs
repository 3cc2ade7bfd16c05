//! Record access collaborator
//!
//! The decoder reads raw records through [`ModuleSource`]; how they got
//! from bytes into memory is the concern of the serialization stage, not
//! this crate. [`InMemoryModule`] is the table-backed implementation used
//! by tests and by loaders that decode the wire format up front.

use std::cell::Cell;

use crate::error::{LinkResult, MalformedModule};
use crate::reader::records::{
    BodyIndex, BodyRecord, DeclRecord, SignatureIndex, SignatureRecord, StringIndex, TypeIndex,
    TypeRecord,
};

/// Access to one module's serialized record tables
pub trait ModuleSource {
    /// Raw type record by index
    fn type_record(&self, index: TypeIndex) -> LinkResult<&TypeRecord>;

    /// Raw body record by index
    fn body_record(&self, index: BodyIndex) -> LinkResult<&BodyRecord>;

    /// Interned string by index
    fn string(&self, index: StringIndex) -> LinkResult<&str>;

    /// Signature record by index
    fn signature(&self, index: SignatureIndex) -> LinkResult<&SignatureRecord>;
}

/// Table-backed module source
#[derive(Debug, Default, Clone)]
pub struct InMemoryModule {
    strings: Vec<String>,
    types: Vec<TypeRecord>,
    bodies: Vec<BodyRecord>,
    signatures: Vec<SignatureRecord>,
    /// Top-level declaration records, in module order
    pub declarations: Vec<DeclRecord>,
    type_fetches: Cell<usize>,
    body_fetches: Cell<usize>,
}

impl InMemoryModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a string, returning its index
    pub fn add_string(&mut self, value: impl Into<String>) -> StringIndex {
        let index = self.strings.len() as u32;
        self.strings.push(value.into());
        index
    }

    /// Add a type record, returning its index
    pub fn add_type(&mut self, record: TypeRecord) -> TypeIndex {
        let index = self.types.len() as u32;
        self.types.push(record);
        index
    }

    /// Add a body record, returning its index
    pub fn add_body(&mut self, record: BodyRecord) -> BodyIndex {
        let index = self.bodies.len() as u32;
        self.bodies.push(record);
        index
    }

    /// Add a signature record, returning its index
    pub fn add_signature(&mut self, record: SignatureRecord) -> SignatureIndex {
        let index = self.signatures.len() as u32;
        self.signatures.push(record);
        index
    }

    /// How many type records have been fetched
    pub fn type_fetch_count(&self) -> usize {
        self.type_fetches.get()
    }

    /// How many body records have been fetched
    pub fn body_fetch_count(&self) -> usize {
        self.body_fetches.get()
    }
}

impl ModuleSource for InMemoryModule {
    fn type_record(&self, index: TypeIndex) -> LinkResult<&TypeRecord> {
        self.type_fetches.set(self.type_fetches.get() + 1);
        self.types
            .get(index as usize)
            .ok_or_else(|| MalformedModule::BadTypeIndex(index).into())
    }

    fn body_record(&self, index: BodyIndex) -> LinkResult<&BodyRecord> {
        self.body_fetches.set(self.body_fetches.get() + 1);
        self.bodies
            .get(index as usize)
            .ok_or_else(|| MalformedModule::BadBodyIndex(index).into())
    }

    fn string(&self, index: StringIndex) -> LinkResult<&str> {
        self.strings
            .get(index as usize)
            .map(String::as_str)
            .ok_or_else(|| MalformedModule::BadStringIndex(index).into())
    }

    fn signature(&self, index: SignatureIndex) -> LinkResult<&SignatureRecord> {
        self.signatures
            .get(index as usize)
            .ok_or_else(|| MalformedModule::BadSignatureIndex(index).into())
    }
}
