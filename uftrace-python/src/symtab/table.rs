//! Address-ordered symbol table and its `.sym` file format
//!
//! Format, one line per symbol, ascending address:
//!
//! ```text
//! 1 t a
//! 2 t mymod.b
//! 3 t __sym_end
//! ```
//!
//! The last line is a sentinel whose address is one past the highest
//! allocated address, so a reader knows where the final symbol ends.

use log::info;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use uftrace_python_common::{SYMBOL_END_MARKER, SYMBOL_FILE_EXT, SYMBOL_FILE_STEM, SYMBOL_TYPE_TEXT};

use crate::domain::{SymbolAddr, SymtabError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub addr: SymbolAddr,
    pub name: String,
}

/// Symbols sorted by address plus the end-of-table address
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    end: SymbolAddr,
}

impl SymbolTable {
    /// Sort `symbols` by address. `end` is the first unallocated address.
    #[must_use]
    pub fn from_unordered(mut symbols: Vec<Symbol>, end: SymbolAddr) -> Self {
        symbols.sort_unstable_by_key(|sym| sym.addr);
        Self { symbols, end }
    }

    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    #[must_use]
    pub fn end_addr(&self) -> SymbolAddr {
        self.end
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Write every symbol line followed by the `__sym_end` sentinel
    ///
    /// # Errors
    /// Returns any error from the underlying writer
    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        for sym in &self.symbols {
            writeln!(out, "{:x} {SYMBOL_TYPE_TEXT} {}", sym.addr, sym.name)?;
        }
        writeln!(out, "{:x} {SYMBOL_TYPE_TEXT} {SYMBOL_END_MARKER}", self.end)?;
        out.flush()
    }

    /// Append the table to `<dir>/python.sym`
    ///
    /// The file is opened in append mode: runs sharing a data directory
    /// accumulate tables instead of overwriting each other. The directory
    /// itself is not created.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or written
    pub fn append_to_dir(&self, dir: &Path) -> Result<PathBuf, SymtabError> {
        let path = symbol_file_path(dir);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| SymtabError::Open { path: path.clone(), source })?;

        self.write_to(BufWriter::new(file))
            .map_err(|source| SymtabError::Write { path: path.clone(), source })?;

        info!("Wrote {} python symbols to {}", self.symbols.len(), path.display());
        Ok(path)
    }
}

/// `<dir>/python.sym`
#[must_use]
pub fn symbol_file_path(dir: &Path) -> PathBuf {
    dir.join(format!("{SYMBOL_FILE_STEM}.{SYMBOL_FILE_EXT}"))
}
