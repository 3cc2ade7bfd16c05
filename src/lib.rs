//! irlink: serialized IR module decoding with cross-module symbol linking
//!
//! Decodes a compiler's serialized intermediate representation back into a
//! linked in-memory object graph. One [`symbols::SymbolTable`] is shared
//! across decode sessions, so declarations that reference entities in other
//! modules resolve to the same symbol the defining module binds later.
//!
//! # Module Organization
//!
//! - `symbols` - stable signatures and the bind-once symbol arena
//! - `ir` - the decoded object model: declarations, types, bodies, flags
//! - `reader` - record tables, the declaration/type decoders, decode policy
//! - `error` - the fatal error taxonomy decode sessions surface
//!
//! # Example
//!
//! ```no_run
//! use irlink::reader::{decode_module, DecodeSettings, InMemoryModule, RecordBodyDecoder};
//! use irlink::symbols::SymbolTable;
//! use irlink::ir::FileId;
//! use lasso::Rodeo;
//!
//! # fn main() -> Result<(), irlink::error::LinkError> {
//! let module = InMemoryModule::new();
//! let mut symbols = SymbolTable::new();
//! let mut strings = Rodeo::default();
//! let mut bodies = RecordBodyDecoder::new();
//!
//! let decoded = decode_module(
//!     &module,
//!     &module.declarations,
//!     &mut symbols,
//!     &mut strings,
//!     &mut bodies,
//!     DecodeSettings::default(),
//!     FileId(0),
//! )?;
//! for id in &decoded.top_level {
//!     let _decl = decoded.graph.decl(*id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod ir;
pub mod reader;
pub mod symbols;

pub use error::{LinkError, LinkResult};
pub use ir::{DeclId, Declaration, IrGraph, IrType};
pub use reader::{decode_module, DecodeSettings, DecodedModule, DeclarationDecoder};
pub use symbols::{Signature, SymbolId, SymbolKind, SymbolTable};
