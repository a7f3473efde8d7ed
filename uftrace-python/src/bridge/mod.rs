//! # Event Bridge
//!
//! Turns interpreter call/return events into tracer hook calls.
//!
//! ```text
//! sys.settrace callback
//!        │ (frame, "call")                 (frame, "return")
//!        ▼                                        │
//!   qualified_name(frame) → "mymod.foo"           │
//!        │                                        │
//!        ▼                                        │
//!   SymbolAllocator::lookup_or_insert → 0x2       │
//!        │                                        ▼
//!        ▼                                   exit(0, 0)
//!   enter(0x2, 0)
//! ```
//!
//! Returns carry no address: the tracer pairs them with calls by stack
//! depth, which works because the interpreter delivers events properly
//! nested.
//!
//! Without resolved hooks the bridge still names and allocates, it just
//! doesn't call anything.

pub mod naming;

use log::debug;
use std::sync::{Mutex, MutexGuard, OnceLock};

pub use naming::{qualified_name, FrameView};

use crate::discovery::HookSink;
use crate::domain::SymbolAddr;
use crate::symtab::{SymbolAllocator, SymbolTable};

/// Interpreter trace event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEvent {
    Call,
    Return,
    /// `line`, `exception`, `opcode` and anything newer
    Other,
}

impl From<&str> for TraceEvent {
    fn from(event: &str) -> Self {
        match event {
            "call" => Self::Call,
            "return" => Self::Return,
            _ => Self::Other,
        }
    }
}

/// Process-wide tracing state: the symbol index and the hook cache
pub struct EventBridge<H> {
    symbols: Mutex<SymbolAllocator>,
    hooks: OnceLock<H>,
}

impl<H: HookSink> EventBridge<H> {
    #[must_use]
    pub const fn new() -> Self {
        Self { symbols: Mutex::new(SymbolAllocator::new()), hooks: OnceLock::new() }
    }

    /// Install resolved hooks. Only the first call has an effect.
    pub fn install_hooks(&self, hooks: H) -> bool {
        self.hooks.set(hooks).is_ok()
    }

    #[must_use]
    pub fn hooks_resolved(&self) -> bool {
        self.hooks.get().is_some()
    }

    /// Handle one trace event
    pub fn handle(&self, frame: &impl FrameView, event: TraceEvent) {
        match event {
            TraceEvent::Call => {
                self.on_call(frame);
            }
            TraceEvent::Return => self.on_return(),
            TraceEvent::Other => {}
        }
    }

    /// Name the frame, allocate its address and report the entry
    ///
    /// Returns the address passed to the enter hook.
    pub fn on_call(&self, frame: &impl FrameView) -> SymbolAddr {
        let addr = match qualified_name(frame) {
            Some(name) => self.symbols().lookup_or_insert(&name),
            None => {
                debug!("Unnamed frame, reporting unknown function");
                SymbolAddr::UNKNOWN
            }
        };

        if let Some(hooks) = self.hooks.get() {
            hooks.enter(addr);
        }
        addr
    }

    pub fn on_return(&self) {
        if let Some(hooks) = self.hooks.get() {
            hooks.exit();
        }
    }

    /// Address already assigned to `name`, if any
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<SymbolAddr> {
        self.symbols().get(name)
    }

    #[must_use]
    pub fn symbol_count(&self) -> usize {
        self.symbols().len()
    }

    /// Drain the collected symbols into an address-ordered table
    ///
    /// The first call seals the bridge and returns the table, later calls
    /// return `None`. Calls after sealing still reach the enter hook, with
    /// address 0.
    pub fn finalize(&self) -> Option<SymbolTable> {
        self.symbols().seal()
    }

    fn symbols(&self) -> MutexGuard<'_, SymbolAllocator> {
        // A panic while holding the lock can't leave the index half-updated
        self.symbols.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<H: HookSink> Default for EventBridge<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum HookCall {
        Enter(u32),
        Exit,
    }

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<HookCall>>,
    }

    impl HookSink for &Recorder {
        fn enter(&self, addr: SymbolAddr) {
            self.calls.lock().unwrap().push(HookCall::Enter(addr.0));
        }

        fn exit(&self) {
            self.calls.lock().unwrap().push(HookCall::Exit);
        }
    }

    struct Frame(Option<&'static str>, &'static str);

    impl FrameView for Frame {
        fn code_name(&self) -> Option<String> {
            self.0.map(str::to_string)
        }

        fn module_name(&self) -> Option<String> {
            Some(self.1.to_string())
        }
    }

    fn main_fn(name: &'static str) -> Frame {
        Frame(Some(name), "__main__")
    }

    #[test]
    fn test_event_names() {
        assert_eq!(TraceEvent::from("call"), TraceEvent::Call);
        assert_eq!(TraceEvent::from("return"), TraceEvent::Return);
        assert_eq!(TraceEvent::from("line"), TraceEvent::Other);
        assert_eq!(TraceEvent::from("c_call"), TraceEvent::Other);
    }

    #[test]
    fn test_basic_trace() {
        let recorder = Recorder::default();
        let bridge = EventBridge::new();
        assert!(bridge.install_hooks(&recorder));

        // a() calls b(), both return
        bridge.handle(&main_fn("a"), TraceEvent::Call);
        bridge.handle(&main_fn("b"), TraceEvent::Call);
        bridge.handle(&main_fn("b"), TraceEvent::Return);
        bridge.handle(&main_fn("a"), TraceEvent::Return);

        assert_eq!(
            *recorder.calls.lock().unwrap(),
            vec![HookCall::Enter(1), HookCall::Enter(2), HookCall::Exit, HookCall::Exit]
        );

        let table = bridge.finalize().expect("first finalize");
        let names: Vec<_> = table.symbols().iter().map(|s| (s.addr.0, s.name.as_str())).collect();
        assert_eq!(names, vec![(1, "a"), (2, "b")]);
        assert_eq!(table.end_addr(), SymbolAddr(3));
    }

    #[test]
    fn test_repeated_calls() {
        let recorder = Recorder::default();
        let bridge = EventBridge::new();
        bridge.install_hooks(&recorder);

        for name in ["a", "b", "a"] {
            bridge.handle(&main_fn(name), TraceEvent::Call);
            bridge.handle(&main_fn(name), TraceEvent::Return);
        }

        let enters: Vec<_> = recorder
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                HookCall::Enter(addr) => Some(*addr),
                HookCall::Exit => None,
            })
            .collect();
        assert_eq!(enters, vec![1, 2, 1]);
        assert_eq!(bridge.symbol_count(), 2);
        assert_eq!(bridge.lookup("a"), Some(SymbolAddr(1)));
        assert_eq!(bridge.lookup("b"), Some(SymbolAddr(2)));
    }

    #[test]
    fn test_unnamed_frame_enters_unknown() {
        let recorder = Recorder::default();
        let bridge = EventBridge::new();
        bridge.install_hooks(&recorder);

        assert_eq!(bridge.on_call(&Frame(None, "mymod")), SymbolAddr::UNKNOWN);
        assert_eq!(*recorder.calls.lock().unwrap(), vec![HookCall::Enter(0)]);
        assert_eq!(bridge.symbol_count(), 0);
    }

    #[test]
    fn test_other_events_are_ignored() {
        let recorder = Recorder::default();
        let bridge = EventBridge::new();
        bridge.install_hooks(&recorder);

        bridge.handle(&main_fn("a"), TraceEvent::Other);

        assert!(recorder.calls.lock().unwrap().is_empty());
        assert_eq!(bridge.symbol_count(), 0);
    }

    #[test]
    fn test_unresolved_hooks_still_allocate() {
        let bridge: EventBridge<&Recorder> = EventBridge::new();
        assert!(!bridge.hooks_resolved());

        assert_eq!(bridge.on_call(&Frame(Some("foo"), "mymod")), SymbolAddr(1));
        bridge.on_return();
        assert_eq!(bridge.lookup("mymod.foo"), Some(SymbolAddr(1)));
    }

    #[test]
    fn test_hooks_install_once() {
        let first = Recorder::default();
        let second = Recorder::default();
        let bridge = EventBridge::new();

        assert!(bridge.install_hooks(&first));
        assert!(!bridge.install_hooks(&second));

        bridge.on_return();
        assert_eq!(first.calls.lock().unwrap().len(), 1);
        assert!(second.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_finalize_once() {
        let bridge: EventBridge<&Recorder> = EventBridge::new();
        bridge.on_call(&main_fn("a"));

        assert_eq!(bridge.finalize().map(|t| t.len()), Some(1));
        assert!(bridge.finalize().is_none());

        // Events after finalize no longer grow the table
        assert_eq!(bridge.on_call(&main_fn("late")), SymbolAddr::UNKNOWN);
    }
}
