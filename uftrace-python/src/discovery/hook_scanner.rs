//! Symbol table scan of the native tracer library
//!
//! Reads the library's ELF file from disk and looks up the hook symbols in
//! its static symbol table (`.symtab`). Symbol values are load-relative, so
//! the runtime address is `load_base + st_value`.

use log::debug;
use object::{Object, ObjectSymbol, ObjectSymbolTable};
use std::fs;
use std::path::Path;

use uftrace_python_common::{HOOK_ENTER_SYMBOL, HOOK_EXIT_SYMBOL};

use super::hooks::HookAddrs;
use crate::domain::DiscoveryError;

/// Names of the two entry points to look for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookNames<'a> {
    pub enter: &'a str,
    pub exit: &'a str,
}

impl Default for HookNames<'static> {
    fn default() -> Self {
        Self { enter: HOOK_ENTER_SYMBOL, exit: HOOK_EXIT_SYMBOL }
    }
}

/// Scan a module file for the hook symbols
///
/// Missing symbols are not an error here: the returned [`HookAddrs`] just
/// has `None` for them.
///
/// # Errors
/// Returns an error if the file cannot be read, is not a parseable object
/// file, or has no static symbol table.
pub fn scan_module(
    path: &Path,
    load_base: u64,
    names: &HookNames<'_>,
) -> Result<HookAddrs, DiscoveryError> {
    let data = fs::read(path)
        .map_err(|source| DiscoveryError::ModuleUnreadable { path: path.to_path_buf(), source })?;

    scan_image(&data, load_base, names).map_err(|err| match err {
        ScanFailure::Parse(reason) => {
            DiscoveryError::MalformedModule { path: path.to_path_buf(), reason }
        }
        ScanFailure::NoSymtab => DiscoveryError::NoSymbolTable { path: path.to_path_buf() },
    })
}

enum ScanFailure {
    Parse(String),
    NoSymtab,
}

fn scan_image(data: &[u8], load_base: u64, names: &HookNames<'_>) -> Result<HookAddrs, ScanFailure> {
    let obj = object::File::parse(data).map_err(|e| ScanFailure::Parse(e.to_string()))?;

    // Only SHT_SYMTAB, the dynamic symbol table is never consulted
    let symtab = obj.symbol_table().ok_or(ScanFailure::NoSymtab)?;

    let mut addrs = HookAddrs::default();

    for symbol in symtab.symbols() {
        // An import of the hook would resolve to load_base + 0
        if symbol.is_undefined() {
            continue;
        }

        let Ok(name) = symbol.name() else {
            continue;
        };

        let slot = if name == names.enter {
            &mut addrs.enter
        } else if name == names.exit {
            &mut addrs.exit
        } else {
            continue;
        };

        let addr = load_base.wrapping_add(symbol.address());
        debug!("Symbol {name} at 0x{:x} (base 0x{load_base:x})", symbol.address());
        *slot = Some(addr);
    }

    Ok(addrs)
}
