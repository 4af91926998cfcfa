//! Runtime that executes exception control flow written as Rust closures.
//!
//! A [`Runtime`] owns a [`ClassRegistry`], a call-frame stack used for tracebacks and
//! the stack of exceptions currently being handled (for implicit chaining and bare
//! re-raise). It is generic over the resource tracker, the print writer and the tracer,
//! so [`NoLimitTracker`](crate::NoLimitTracker) and [`NoopTracer`](crate::NoopTracer)
//! compile down to nothing.

mod call;
mod exceptions;

use std::{borrow::Cow, fmt};

pub use exceptions::TryStatement;

use crate::{
    exception_private::{ExcType, RunResult, SimpleException},
    exception_public::Exception,
    io::PrintWriter,
    resource::ResourceTracker,
    tracer::RaiseTracer,
    types::{ClassDef, ClassId, ClassRegistry},
};

/// Frame name used for code running outside of any call.
pub const MODULE_FRAME: &str = "<module>";

/// Executes lessons and user code against a class registry.
///
/// # Type Parameters
/// * `T` - resource tracker enforcing limits
/// * `P` - writer receiving printed output
/// * `Tr` - tracer observing raises, handlers and frames
#[derive(Debug)]
pub struct Runtime<'a, T: ResourceTracker, P: PrintWriter, Tr: RaiseTracer> {
    registry: ClassRegistry,
    tracker: T,
    print: &'a mut P,
    tracer: Tr,
    /// File name shown in tracebacks.
    script_name: String,
    /// Names of the active call frames, outermost first.
    frames: Vec<String>,
    /// Exceptions currently being handled, innermost last.
    handling: Vec<SimpleException>,
    /// Number of user classes registered through this runtime.
    user_classes: usize,
}

impl<'a, T: ResourceTracker, P: PrintWriter, Tr: RaiseTracer> Runtime<'a, T, P, Tr> {
    pub fn new(script_name: impl Into<String>, tracker: T, print: &'a mut P, tracer: Tr) -> Self {
        Self {
            registry: ClassRegistry::new(),
            tracker,
            print,
            tracer,
            script_name: script_name.into(),
            frames: Vec::new(),
            handling: Vec::new(),
            user_classes: 0,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    #[must_use]
    pub fn tracer(&self) -> &Tr {
        &self.tracer
    }

    pub fn tracer_mut(&mut self) -> &mut Tr {
        &mut self.tracer
    }

    /// Consumes the runtime and returns the tracer, e.g. to inspect recorded events.
    pub fn into_tracer(self) -> Tr {
        self.tracer
    }

    #[must_use]
    pub fn script_name(&self) -> &str {
        &self.script_name
    }

    /// Writes `text` followed by a newline to the print writer.
    pub fn print_line(&mut self, text: impl fmt::Display) -> RunResult<()> {
        self.print.stdout_write(Cow::Owned(text.to_string()))?;
        self.print.stdout_push('\n')
    }

    /// Registers a user class.
    ///
    /// Fails with `TypeError` when no consistent linearization exists and with an
    /// uncatchable `MemoryError` when the class limit is reached.
    pub fn define_class(&mut self, def: ClassDef) -> RunResult<ClassId> {
        if let Err(err) = self.tracker.on_define_class(self.user_classes + 1) {
            return Err(self.raise_error(err.into()));
        }
        let max_mro_length = self.tracker.max_mro_length();
        let id = match self.registry.define_class_limited(def, max_mro_length) {
            Ok(id) => id,
            Err(err) => return Err(self.raise_error(err)),
        };
        self.user_classes += 1;
        if let Some(class) = self.registry.get(id) {
            self.tracer.on_class_defined(class.name(), class.mro().len());
        }
        Ok(id)
    }

    /// Looks up a class by name, raising `NameError` when it does not exist.
    pub fn lookup_class(&mut self, name: &str) -> RunResult<ClassId> {
        match self.registry.lookup(name) {
            Some(id) => Ok(id),
            None => Err(self.raise_error(ExcType::name_error(name))),
        }
    }

    /// `isinstance(exc, class)`.
    #[must_use]
    pub fn isinstance(&self, exc: &SimpleException, class: impl Into<ClassId>) -> bool {
        self.registry.is_subclass(exc.class_id(), class.into())
    }

    /// `issubclass(child, parent)`.
    #[must_use]
    pub fn issubclass(&self, child: impl Into<ClassId>, parent: impl Into<ClassId>) -> bool {
        self.registry.is_subclass(child.into(), parent.into())
    }

    /// Name of the innermost active frame.
    #[must_use]
    pub fn current_frame_name(&self) -> &str {
        frame_name(&self.frames)
    }

    /// Number of active call frames.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The exception being handled by the innermost active handler or `finally` block.
    #[must_use]
    pub fn current_exception(&self) -> Option<&SimpleException> {
        self.handling.last()
    }

    /// Runs `body` as module-level code and reports an escaping exception.
    ///
    /// Frame and handler state is reset afterwards so the runtime can run further modules
    /// against the same registry.
    pub fn run_module<R>(&mut self, body: impl FnOnce(&mut Self) -> RunResult<R>) -> Result<R, Exception> {
        let result = body(self);
        self.frames.clear();
        self.handling.clear();
        result.map_err(|err| err.into_python_exception(&self.script_name))
    }
}

fn frame_name(frames: &[String]) -> &str {
    frames.last().map_or(MODULE_FRAME, String::as_str)
}
