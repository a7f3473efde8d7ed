//! Synthetic address allocation
//!
//! Python functions have no machine address, so each distinct qualified
//! name gets the next integer the first time it is seen. Addresses follow
//! first-observation order: replaying the same call sequence always gives
//! the same mapping.

use std::collections::BTreeMap;

use super::table::{Symbol, SymbolTable};
use crate::domain::SymbolAddr;

/// Name-keyed index of every function seen while tracing
#[derive(Debug)]
pub struct SymbolAllocator {
    by_name: BTreeMap<String, SymbolAddr>,
    next: SymbolAddr,
    sealed: bool,
}

impl SymbolAllocator {
    #[must_use]
    pub const fn new() -> Self {
        Self { by_name: BTreeMap::new(), next: SymbolAddr::FIRST, sealed: false }
    }

    /// Return the address of `name`, allocating one on first sight
    ///
    /// Once sealed the index no longer grows: unseen names get
    /// [`SymbolAddr::UNKNOWN`]. The same happens when the address space is
    /// used up, since the last address is kept for the end-of-table line.
    pub fn lookup_or_insert(&mut self, name: &str) -> SymbolAddr {
        if let Some(&addr) = self.by_name.get(name) {
            return addr;
        }
        if self.sealed {
            return SymbolAddr::UNKNOWN;
        }

        let Some(following) = self.next.successor() else {
            return SymbolAddr::UNKNOWN;
        };

        let addr = self.next;
        self.next = following;
        self.by_name.insert(name.to_string(), addr);
        addr
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<SymbolAddr> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Address the next new name would get
    #[must_use]
    pub fn next_addr(&self) -> SymbolAddr {
        self.next
    }

    /// Empty the index into an address-ordered table and seal the allocator
    ///
    /// Returns `None` if already sealed, so a table is produced at most once.
    pub fn seal(&mut self) -> Option<SymbolTable> {
        if self.sealed {
            return None;
        }
        self.sealed = true;

        let symbols = std::mem::take(&mut self.by_name)
            .into_iter()
            .map(|(name, addr)| Symbol { addr, name })
            .collect();

        Some(SymbolTable::from_unordered(symbols, self.next))
    }
}

impl Default for SymbolAllocator {
    fn default() -> Self {
        Self::new()
    }
}
