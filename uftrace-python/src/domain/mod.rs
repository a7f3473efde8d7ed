//! Domain model for uftrace-python
//!
//! Core newtypes and structured errors shared by the discovery, symbol
//! table and bridge modules.

pub mod errors;
pub mod types;

pub use errors::{DiscoveryError, SymtabError};
pub use types::SymbolAddr;
