//! CPython binding
//!
//! ```python
//! import sys, uftrace_python
//! sys.settrace(uftrace_python.trace)
//! ```
//!
//! `trace` is a callable object that returns itself from every call. The
//! interpreter keeps whatever a trace function returns as the local trace
//! function of the frame, so returning anything else would unsubscribe it.

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyString};

use crate::bridge::{FrameView, TraceEvent};
use crate::config::init_logging;
use crate::lifecycle::{self, BRIDGE};

/// A live interpreter frame
struct PyFrame<'a, 'py> {
    frame: &'a Bound<'py, PyAny>,
}

impl FrameView for PyFrame<'_, '_> {
    fn code_name(&self) -> Option<String> {
        let code = self.frame.getattr("f_code").ok()?;

        // co_qualname exists since 3.11
        let name = if code.hasattr("co_qualname").unwrap_or(false) {
            code.getattr("co_qualname")
        } else {
            code.getattr("co_name")
        };
        utf8_string(&name.ok()?)
    }

    fn module_name(&self) -> Option<String> {
        let globals = self.frame.getattr("f_globals").ok()?;
        let globals = globals.downcast::<PyDict>().ok()?;
        let module = globals.get_item("__name__").ok()??;
        utf8_string(&module)
    }
}

fn utf8_string(obj: &Bound<'_, PyAny>) -> Option<String> {
    let s = obj.downcast::<PyString>().ok()?;
    s.to_str().ok().map(str::to_owned)
}

/// Trace function for `sys.settrace` / `threading.settrace`
#[pyclass(module = "uftrace_python", frozen)]
struct TraceHandler;

#[pymethods]
impl TraceHandler {
    /// Handle one event and stay installed
    ///
    /// Never raises: a raising trace function is removed by the interpreter.
    #[pyo3(signature = (frame, event, arg=None))]
    fn __call__<'py>(
        slf: &Bound<'py, Self>,
        frame: &Bound<'py, PyAny>,
        event: &Bound<'py, PyAny>,
        arg: Option<&Bound<'py, PyAny>>,
    ) -> Bound<'py, Self> {
        let _ = arg;

        if let Ok(event) = event.downcast::<PyString>() {
            if let Ok(event) = event.to_str() {
                BRIDGE.handle(&PyFrame { frame }, TraceEvent::from(event));
            }
        }
        slf.clone()
    }
}

/// C extension module to trace python functions with uftrace
#[pymodule]
fn uftrace_python(m: &Bound<'_, PyModule>) -> PyResult<()> {
    init_logging();

    m.add_class::<TraceHandler>()?;
    m.add("trace", Bound::new(m.py(), TraceHandler)?)?;

    lifecycle::init();
    Ok(())
}
