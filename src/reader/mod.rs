//! Module decoding: serialized records into linked IR
//!
//! The entry point is [`decode_module`], which runs one
//! [`DeclarationDecoder`] session over a module's top-level declaration
//! records. Symbol identity is shared across sessions through the caller's
//! [`crate::symbols::SymbolTable`], so references between modules decoded
//! one after another link up by signature.

pub mod bodies;
pub mod declarations;
pub mod fake_overrides;
pub mod records;
pub mod scope;
pub mod settings;
pub mod source;
pub mod types;

use lasso::Rodeo;

pub use bodies::{BodyDecoder, RecordBodyDecoder};
pub use declarations::DeclarationDecoder;
pub use fake_overrides::FakeOverrideQueue;
pub use records::DeclRecord;
pub use settings::{DecodeSettings, PlatformFilter};
pub use source::{InMemoryModule, ModuleSource};

use crate::error::LinkResult;
use crate::ir::decl::{DeclId, FileId, IrGraph, Parent};
use crate::symbols::{SymbolId, SymbolTable};

/// Result of one module-decode session
#[derive(Debug)]
pub struct DecodedModule {
    /// Every declaration decoded in this session
    pub graph: IrGraph,
    /// Ids of the top-level declarations, in record order
    pub top_level: Vec<DeclId>,
    /// Classes whose fake overrides await global reconstruction
    pub fake_overrides: Vec<SymbolId>,
}

/// Decode a module's top-level declarations in one session.
///
/// Fatal on the first error; the caller decides whether to abort the whole
/// compilation or discard this module.
pub fn decode_module<S: ModuleSource, B: BodyDecoder>(
    source: &S,
    declarations: &[DeclRecord],
    symbols: &mut SymbolTable,
    strings: &mut Rodeo,
    bodies: &mut B,
    settings: DecodeSettings,
    file: FileId,
) -> LinkResult<DecodedModule> {
    let mut decoder = DeclarationDecoder::new(source, symbols, strings, bodies, settings);
    let mut top_level = Vec::with_capacity(declarations.len());
    for record in declarations {
        top_level.push(decoder.decode_declaration(record, Parent::File(file))?);
    }
    let (graph, queue) = decoder.finish();
    Ok(DecodedModule {
        graph,
        top_level,
        fake_overrides: queue.into_classes(),
    })
}
