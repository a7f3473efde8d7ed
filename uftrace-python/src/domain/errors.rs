//! Structured error types for uftrace-python
//!
//! Using thiserror for automatic Display implementation and error chaining.
//! None of these ever reach the Python side: discovery errors leave the
//! hooks unresolved and symbol table errors are logged and dropped.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Failed to read /proc/self/maps: {0}")]
    MapsUnreadable(#[source] io::Error),

    #[error("No mapping of a library named {prefix}* in this process")]
    ModuleNotMapped { prefix: String },

    #[error("Failed to read {}: {source}", .path.display())]
    ModuleUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {}: {reason}", .path.display())]
    MalformedModule { path: PathBuf, reason: String },

    #[error("{} has no symbol table", .path.display())]
    NoSymbolTable { path: PathBuf },

    #[error(
        "Hook symbols incomplete in {} (enter: {enter_found}, exit: {exit_found})",
        .path.display()
    )]
    HooksMissing { path: PathBuf, enter_found: bool, exit_found: bool },
}

#[derive(Error, Debug)]
pub enum SymtabError {
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
