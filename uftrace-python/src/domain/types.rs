//! Newtype wrappers for domain values

use std::fmt;

use uftrace_python_common::FIRST_SYMBOL_ADDR;

/// Synthetic address standing in for a Python function's machine address.
///
/// Dense, starts at [`FIRST_SYMBOL_ADDR`], never reused within a process.
/// [`SymbolAddr::UNKNOWN`] is what the enter hook receives when a frame
/// cannot be named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolAddr(pub u32);

impl SymbolAddr {
    pub const UNKNOWN: Self = Self(0);
    pub const FIRST: Self = Self(FIRST_SYMBOL_ADDR);

    /// The address allocated right after this one, `None` past `u32::MAX`
    #[must_use]
    pub fn successor(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::LowerHex for SymbolAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}
