//! # uftrace-python - Python Function Tracing for uftrace
//!
//! A CPython extension that feeds Python call/return events into uftrace's
//! native function tracer (`libmcount`) and leaves behind a symbol table so
//! the recorded trace shows Python function names.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Python Program                            │
//! │             sys.settrace(uftrace_python.trace)                  │
//! └───────────────────────┬─────────────────────────────────────────┘
//!                         │ (frame, "call" | "return", arg)
//!                         ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 uftrace-python (This Crate)                     │
//! │                                                                 │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐        │
//! │  │    Bridge    │──▶│    Symtab    │──▶│  python.sym  │        │
//! │  │ (frame name) │   │ (name → addr)│   │  (at exit)   │        │
//! │  └──────┬───────┘   └──────────────┘   └──────────────┘        │
//! │         │ enter(addr, 0) / exit(0, 0)                           │
//! │  ┌──────┴───────┐                                               │
//! │  │  Discovery   │ /proc/self/maps + ELF .symtab (at import)     │
//! │  └──────┬───────┘                                               │
//! └─────────┼───────────────────────────────────────────────────────┘
//!           ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │     libmcount.so: __cyg_profile_func_enter / _exit              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Synthetic Addresses
//!
//! The tracer records addresses, and Python functions have none. Each
//! distinct qualified name (`mymod.Class.method`) gets a small integer
//! instead, starting at 1 in order of first call. At exit the mapping is
//! appended to `$UFTRACE_DIR/python.sym` sorted by address, so the trace
//! reader can symbolize it like any other module.
//!
//! ## Module Structure
//!
//! - [`discovery`]: find `libmcount` in the memory map and resolve its hooks
//! - [`symtab`]: synthetic address allocation and the `.sym` file
//! - [`bridge`]: event dispatch and frame naming
//! - [`lifecycle`]: activation at import, symbol table write at exit
//! - [`config`]: environment variables and logging setup
//! - [`domain`]: newtypes and error types
//!
//! The CPython binding itself is behind the `python-ext` feature. Importable
//! builds add `extension-module` so the library doesn't link `libpython`.

pub mod bridge;
pub mod config;
pub mod discovery;
pub mod domain;
pub mod lifecycle;
pub mod symtab;

#[cfg(feature = "python-ext")]
mod python;
