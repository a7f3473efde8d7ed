//! Native hook cache
//!
//! [`HookAddrs`] is what a symbol scan found, [`NativeHooks`] is the
//! callable pair built from it. The pair only exists when both hooks were
//! found, which keeps the "both resolved or neither" rule in the type.

#![allow(unsafe_code)] // calling through addresses found in another library

use std::ffi::c_ulong;
use std::fmt;

use uftrace_python_common::HookFn;

use crate::domain::SymbolAddr;

/// Absolute addresses found by a symbol scan, either may be missing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HookAddrs {
    pub enter: Option<u64>,
    pub exit: Option<u64>,
}

/// Receiver of traced events.
///
/// The bridge talks to the tracer only through this trait, so tests can
/// record calls instead of jumping into native code.
pub trait HookSink {
    /// Function entered, `addr` is its synthetic address (0 if unknown)
    fn enter(&self, addr: SymbolAddr);

    /// Innermost function returned
    fn exit(&self);
}

/// Resolved tracer entry points
#[derive(Clone, Copy)]
pub struct NativeHooks {
    enter: HookFn,
    exit: HookFn,
}

impl NativeHooks {
    /// Build callable hooks from scanned addresses
    ///
    /// Returns `None` unless both addresses are present and non-zero.
    ///
    /// # Safety
    /// Both addresses must point at functions with the [`HookFn`] ABI that
    /// stay mapped for the rest of the process lifetime.
    #[must_use]
    pub unsafe fn from_addrs(addrs: HookAddrs) -> Option<Self> {
        let enter = addrs.enter.filter(|&a| a != 0)?;
        let exit = addrs.exit.filter(|&a| a != 0)?;

        let enter = usize::try_from(enter).ok()?;
        let exit = usize::try_from(exit).ok()?;

        // SAFETY: non-zero, and the caller vouches for the ABI
        Some(Self {
            enter: std::mem::transmute::<usize, HookFn>(enter),
            exit: std::mem::transmute::<usize, HookFn>(exit),
        })
    }
}

impl HookSink for NativeHooks {
    fn enter(&self, addr: SymbolAddr) {
        // SAFETY: see `from_addrs`
        unsafe { (self.enter)(c_ulong::from(addr.0), 0) }
    }

    fn exit(&self) {
        // SAFETY: see `from_addrs`
        unsafe { (self.exit)(0, 0) }
    }
}

impl fmt::Debug for NativeHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeHooks")
            .field("enter", &(self.enter as usize as *const ()))
            .field("exit", &(self.exit as usize as *const ()))
            .finish()
    }
}
