//! Python symbol table: collected by name while tracing, written by address
//!
//! During the trace every call looks its function name up in
//! [`SymbolAllocator`], a `BTreeMap` keyed by name. At exit the map is
//! drained into a [`SymbolTable`] sorted by address, which is the order the
//! trace reader expects in `python.sym`.

pub mod allocator;
pub mod table;

pub use allocator::SymbolAllocator;
pub use table::{symbol_file_path, Symbol, SymbolTable};
