use std::{
    borrow::Cow,
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
    exception_public::{Exception, StackFrame},
    object::Object,
    types::{ClassId, ClassObject},
};

/// Result type alias for operations that can produce a runtime error.
pub type RunResult<T> = Result<T, RunError>;

/// Builtin exception types, in the order of the Python exception hierarchy documentation.
///
/// Declaration order matters: every variant is declared after its parent, and the class
/// registry seeds builtin classes in this order so that `ExcType::class_id` is a constant
/// mapping (`object` takes id 0).
///
/// Uses strum derives for automatic `Display`, `FromStr`, and `Into<&'static str>` implementations.
/// The string representation matches the variant name exactly (e.g., `ValueError` -> "ValueError").
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr, Serialize, Deserialize,
)]
pub enum ExcType {
    /// Root of every exception class.
    BaseException,
    SystemExit,
    KeyboardInterrupt,
    /// Raised when a generator's close() method is called.
    /// Inherits from BaseException, not Exception.
    GeneratorExit,
    /// Base class for all non-exit exceptions - the usual catch-all.
    Exception,
    StopIteration,
    StopAsyncIteration,

    // --- ArithmeticError hierarchy ---
    ArithmeticError,
    FloatingPointError,
    OverflowError,
    ZeroDivisionError,

    AssertionError,
    AttributeError,
    BufferError,
    EOFError,

    // --- ImportError hierarchy ---
    ImportError,
    ModuleNotFoundError,

    // --- LookupError hierarchy ---
    LookupError,
    IndexError,
    KeyError,

    MemoryError,

    // --- NameError hierarchy ---
    NameError,
    /// Accessing a local variable before assignment.
    UnboundLocalError,

    // --- OSError hierarchy ---
    /// `IOError` and `EnvironmentError` are aliases kept for compatibility.
    #[strum(to_string = "OSError", serialize = "IOError", serialize = "EnvironmentError")]
    OSError,
    BlockingIOError,
    ChildProcessError,
    ConnectionError,
    BrokenPipeError,
    ConnectionAbortedError,
    ConnectionRefusedError,
    ConnectionResetError,
    FileExistsError,
    FileNotFoundError,
    InterruptedError,
    IsADirectoryError,
    NotADirectoryError,
    PermissionError,
    ProcessLookupError,
    TimeoutError,

    ReferenceError,

    // --- RuntimeError hierarchy ---
    RuntimeError,
    NotImplementedError,
    RecursionError,

    // --- SyntaxError hierarchy ---
    SyntaxError,
    IndentationError,
    TabError,

    SystemError,
    TypeError,

    // --- ValueError hierarchy ---
    ValueError,
    UnicodeError,
    UnicodeDecodeError,
    UnicodeEncodeError,
    UnicodeTranslateError,

    // --- Warning hierarchy ---
    Warning,
    DeprecationWarning,
    PendingDeprecationWarning,
    RuntimeWarning,
    SyntaxWarning,
    UserWarning,
    FutureWarning,
    ImportWarning,
    UnicodeWarning,
    BytesWarning,
    ResourceWarning,
}

impl ExcType {
    /// Legacy names bound to an existing builtin class, as `IOError is OSError` in Python.
    pub const ALIASES: [(&'static str, Self); 2] = [("IOError", Self::OSError), ("EnvironmentError", Self::OSError)];

    /// Returns the single direct parent of this builtin type.
    ///
    /// `BaseException` returns `None`: its only base is `object`, which is not an exception type.
    #[must_use]
    pub fn parent(self) -> Option<Self> {
        let parent = match self {
            Self::BaseException => return None,
            Self::SystemExit | Self::KeyboardInterrupt | Self::GeneratorExit | Self::Exception => Self::BaseException,
            Self::FloatingPointError | Self::OverflowError | Self::ZeroDivisionError => Self::ArithmeticError,
            Self::ModuleNotFoundError => Self::ImportError,
            Self::IndexError | Self::KeyError => Self::LookupError,
            Self::UnboundLocalError => Self::NameError,
            Self::BlockingIOError
            | Self::ChildProcessError
            | Self::ConnectionError
            | Self::FileExistsError
            | Self::FileNotFoundError
            | Self::InterruptedError
            | Self::IsADirectoryError
            | Self::NotADirectoryError
            | Self::PermissionError
            | Self::ProcessLookupError
            | Self::TimeoutError => Self::OSError,
            Self::BrokenPipeError
            | Self::ConnectionAbortedError
            | Self::ConnectionRefusedError
            | Self::ConnectionResetError => Self::ConnectionError,
            Self::NotImplementedError | Self::RecursionError => Self::RuntimeError,
            Self::IndentationError => Self::SyntaxError,
            Self::TabError => Self::IndentationError,
            Self::UnicodeError => Self::ValueError,
            Self::UnicodeDecodeError | Self::UnicodeEncodeError | Self::UnicodeTranslateError => Self::UnicodeError,
            Self::DeprecationWarning
            | Self::PendingDeprecationWarning
            | Self::RuntimeWarning
            | Self::SyntaxWarning
            | Self::UserWarning
            | Self::FutureWarning
            | Self::ImportWarning
            | Self::UnicodeWarning
            | Self::BytesWarning
            | Self::ResourceWarning => Self::Warning,
            _ => Self::Exception,
        };
        Some(parent)
    }

    /// Checks if this exception type is a subclass of another exception type.
    ///
    /// Returns true if `self` would be caught by `except handler_type:`.
    #[must_use]
    pub fn is_subclass_of(self, handler_type: Self) -> bool {
        let mut current = Some(self);
        while let Some(exc_type) = current {
            if exc_type == handler_type {
                return true;
            }
            current = exc_type.parent();
        }
        false
    }

    /// Returns the linearization of this builtin type, starting with itself.
    ///
    /// Builtin exceptions use single inheritance, so this is simply the parent chain.
    /// The implicit trailing `object` is not included.
    #[must_use]
    pub fn mro(self) -> Vec<Self> {
        let mut mro = vec![self];
        let mut current = self.parent();
        while let Some(parent) = current {
            mro.push(parent);
            current = parent.parent();
        }
        mro
    }

    /// Registry handle of this builtin class.
    ///
    /// Builtins are seeded in declaration order right after `object`.
    #[must_use]
    pub const fn class_id(self) -> ClassId {
        ClassId::new(self as u32 + 1)
    }

    /// Creates a TypeError with a custom message.
    #[must_use]
    pub(crate) fn type_error(msg: impl fmt::Display) -> RunError {
        SimpleException::new_msg(Self::TypeError, msg).into()
    }

    /// Creates an AttributeError for when an attribute is not found.
    ///
    /// Matches CPython's format: `'{type_name}' object has no attribute '{attr}'`
    #[must_use]
    pub(crate) fn attribute_error(type_name: impl fmt::Display, attr: &str) -> RunError {
        SimpleException::new_msg(
            Self::AttributeError,
            format!("'{type_name}' object has no attribute '{attr}'"),
        )
        .into()
    }

    /// Creates a TypeError for calling an attribute that holds a plain value.
    ///
    /// Matches CPython's format: `'{type}' object is not callable`
    #[must_use]
    pub(crate) fn type_error_not_callable(type_name: &str) -> RunError {
        SimpleException::new_msg(Self::TypeError, format!("'{type_name}' object is not callable")).into()
    }

    /// Creates a TypeError for invalid exception type in except clause.
    ///
    /// Matches CPython's format: `TypeError: catching classes that do not inherit from BaseException is not allowed`
    #[must_use]
    pub(crate) fn except_invalid_type_error() -> RunError {
        SimpleException::new_msg(
            Self::TypeError,
            "catching classes that do not inherit from BaseException is not allowed",
        )
        .into()
    }

    /// Creates a TypeError for raising a class that is not an exception class.
    #[must_use]
    pub(crate) fn raise_invalid_type_error() -> RunError {
        SimpleException::new_msg(Self::TypeError, "exceptions must derive from BaseException").into()
    }

    /// Creates a NameError for looking up an undefined class name.
    ///
    /// Matches CPython's format: `NameError: name 'x' is not defined`
    #[must_use]
    pub(crate) fn name_error(name: &str) -> RunError {
        SimpleException::new_msg(Self::NameError, format!("name '{name}' is not defined")).into()
    }

    /// Creates the RuntimeError raised by a bare `raise` outside of any handler.
    #[must_use]
    pub(crate) fn no_active_exception() -> RunError {
        SimpleException::new_msg(Self::RuntimeError, "No active exception to reraise").into()
    }
}

impl From<ExcType> for ClassId {
    fn from(exc_type: ExcType) -> Self {
        exc_type.class_id()
    }
}

/// Source of instance identities, shared by every runtime in the process.
static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

fn next_instance_id() -> u64 {
    NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed)
}

/// A live exception instance.
///
/// Carries the class it was created from (handle plus the names needed for display
/// without a registry), the constructor arguments, and the traceback accumulated while
/// it propagates. Each instance has a unique identity so a bare re-raise can be told
/// apart from raising a new exception inside a handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleException {
    class_id: ClassId,
    class_name: String,
    /// Nearest builtin ancestor, used by the public API.
    exc_type: ExcType,
    /// Class names of the MRO (class first, then bases), including `object`.
    mro_names: Vec<String>,
    args: Vec<Object>,
    instance_id: u64,
    /// Frame names the exception passed through, innermost first.
    traceback: Vec<String>,
    /// Explicit chaining cause set by `raise X from Y`.
    #[serde(default)]
    cause: Option<Box<Self>>,
    /// Implicit chaining context set when raising during exception handling.
    #[serde(default)]
    context: Option<Box<Self>>,
    /// Whether implicit context should be suppressed in tracebacks.
    #[serde(default)]
    suppress_context: bool,
}

impl fmt::Display for SimpleException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.py_repr())
    }
}

impl SimpleException {
    /// Creates a builtin exception with no arguments.
    #[must_use]
    pub fn new_none(exc_type: ExcType) -> Self {
        Self::builtin(exc_type, Vec::new())
    }

    /// Creates a builtin exception with a single string argument.
    #[must_use]
    pub fn new_msg(exc_type: ExcType, arg: impl fmt::Display) -> Self {
        Self::builtin(exc_type, vec![Object::String(arg.to_string())])
    }

    /// Creates a builtin exception with arbitrary arguments.
    #[must_use]
    pub fn builtin(exc_type: ExcType, args: Vec<Object>) -> Self {
        let mut mro_names: Vec<String> = exc_type.mro().into_iter().map(|t| t.to_string()).collect();
        mro_names.push("object".to_owned());
        Self::from_parts(exc_type.class_id(), exc_type.to_string(), exc_type, mro_names, args)
    }

    /// Creates an instance of a registered exception class.
    ///
    /// The caller must have checked that `class` derives from `BaseException`.
    pub(crate) fn from_class(class: &ClassObject, exc_type: ExcType, mro_names: Vec<String>, args: Vec<Object>) -> Self {
        Self::from_parts(class.id(), class.name().to_owned(), exc_type, mro_names, args)
    }

    fn from_parts(
        class_id: ClassId,
        class_name: String,
        exc_type: ExcType,
        mro_names: Vec<String>,
        args: Vec<Object>,
    ) -> Self {
        Self {
            class_id,
            class_name,
            exc_type,
            mro_names,
            args,
            instance_id: next_instance_id(),
            traceback: Vec::new(),
            cause: None,
            context: None,
            suppress_context: false,
        }
    }

    #[must_use]
    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Nearest builtin exception type in this instance's MRO.
    #[must_use]
    pub fn exc_type(&self) -> ExcType {
        self.exc_type
    }

    #[must_use]
    pub fn mro_names(&self) -> &[String] {
        &self.mro_names
    }

    #[must_use]
    pub fn args(&self) -> &[Object] {
        &self.args
    }

    /// Identity of this instance; preserved by clones and re-raises.
    #[must_use]
    pub fn instance_id(&self) -> u64 {
        self.instance_id
    }

    /// Frame names the exception passed through, innermost first.
    #[must_use]
    pub fn traceback(&self) -> &[String] {
        &self.traceback
    }

    #[must_use]
    pub fn cause(&self) -> Option<&Self> {
        self.cause.as_deref()
    }

    #[must_use]
    pub fn context(&self) -> Option<&Self> {
        self.context.as_deref()
    }

    #[must_use]
    pub fn suppress_context(&self) -> bool {
        self.suppress_context
    }

    pub fn set_context(&mut self, context: Option<Self>) {
        self.context = context.map(Box::new);
    }

    pub fn set_cause(&mut self, cause: Option<Self>) {
        self.cause = cause.map(Box::new);
    }

    pub fn set_suppress_context(&mut self, suppress_context: bool) {
        self.suppress_context = suppress_context;
    }

    /// Returns true when this instance or one of its implicit contexts has `instance_id`.
    fn context_chain_contains(&self, instance_id: u64) -> bool {
        let mut current = Some(self);
        while let Some(exc) = current {
            if exc.instance_id == instance_id {
                return true;
            }
            current = exc.context();
        }
        false
    }

    /// Returns true when the MRO of this instance contains a class with the given name.
    ///
    /// Name-based and therefore blind to shadowing; handler matching uses class ids instead.
    #[must_use]
    pub fn has_class_named(&self, name: &str) -> bool {
        self.mro_names.iter().any(|n| n == name)
    }

    /// `e.args` as a tuple value.
    #[must_use]
    pub fn args_tuple(&self) -> Object {
        Object::Tuple(self.args.clone())
    }

    /// `str(e)`: empty for no arguments, the argument's `str` for one, the args tuple repr otherwise.
    ///
    /// `KeyError` and its subclasses show a single argument as its repr.
    #[must_use]
    pub fn py_str(&self) -> String {
        exception_str(self.exc_type, &self.args)
    }

    /// `repr(e)`, e.g. `ValueError('bad')` or `TestError()`.
    #[must_use]
    pub fn py_repr(&self) -> String {
        let args: Vec<String> = self.args.iter().map(Object::py_repr).collect();
        format!("{}({})", self.class_name, args.join(", "))
    }

    /// Records the frame the exception is raised in, if it has no traceback yet.
    pub(crate) fn ensure_frame(&mut self, frame_name: &str) {
        if self.traceback.is_empty() {
            self.traceback.push(frame_name.to_owned());
        }
    }

    /// Records the frame a bare `raise` re-raises from.
    ///
    /// Re-raising from the frame the traceback already ends in adds nothing. From a frame
    /// nested inside the handler, that frame becomes the new outermost entry.
    pub(crate) fn reraised_in(&mut self, frame_name: &str) {
        if self.traceback.last().is_none_or(|last| last != frame_name) {
            self.traceback.push(frame_name.to_owned());
        }
    }

    /// Adds a caller's frame as the outermost frame in the traceback.
    ///
    /// Used when an exception propagates out of a call frame.
    pub(crate) fn add_caller_frame(&mut self, frame_name: &str) {
        self.traceback.push(frame_name.to_owned());
    }

    /// Converts this exception to an owned [`Exception`] for the public API.
    #[must_use]
    pub fn into_python_exception(self, filename: &str) -> Exception {
        let traceback = self
            .traceback
            .iter()
            .rev()
            .map(|name| StackFrame::new(filename, name))
            .collect();
        Exception::new_full(
            self.exc_type,
            self.class_name,
            self.mro_names,
            self.args,
            traceback,
            self.cause.map(|c| Box::new(c.into_python_exception(filename))),
            self.context.map(|c| Box::new(c.into_python_exception(filename))),
            self.suppress_context,
        )
    }
}

/// `str()` of an exception instance from its nearest builtin type and its args.
pub(crate) fn exception_str(exc_type: ExcType, args: &[Object]) -> String {
    match args {
        [] => String::new(),
        [arg] if exc_type == ExcType::KeyError => arg.py_repr(),
        [arg] => arg.py_str(),
        args => Object::Tuple(args.to_vec()).py_repr(),
    }
}

/// Runtime error types that can occur during execution.
///
/// Three variants:
/// - `Internal`: Bug in the runtime implementation (static message)
/// - `Exc`: exception that can be caught by a handler clause
/// - `UncatchableExc`: exception from resource limits that CANNOT be caught
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunError {
    /// Internal runtime error - indicates a bug in raiseflow, not in user code.
    Internal(Cow<'static, str>),
    /// Catchable exception (e.g., ValueError, TypeError).
    Exc(Box<SimpleException>),
    /// Exception from a resource limit.
    ///
    /// Skips every handler clause but still runs finalization blocks, so resource
    /// limit violations cannot be suppressed.
    UncatchableExc(Box<SimpleException>),
}

impl From<SimpleException> for RunError {
    fn from(exc: SimpleException) -> Self {
        Self::Exc(Box::new(exc))
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal(msg) => write!(f, "internal error in raiseflow: {msg}"),
            Self::Exc(exc) | Self::UncatchableExc(exc) => {
                let msg = exc.py_str();
                if msg.is_empty() {
                    f.write_str(exc.class_name())
                } else {
                    write!(f, "{}: {msg}", exc.class_name())
                }
            }
        }
    }
}

impl std::error::Error for RunError {}

impl RunError {
    /// Converts this runtime error to an [`Exception`] for the public API.
    ///
    /// Internal errors are converted to `RuntimeError` exceptions with no traceback.
    #[must_use]
    pub fn into_python_exception(self, filename: &str) -> Exception {
        match self {
            Self::Exc(exc) | Self::UncatchableExc(exc) => exc.into_python_exception(filename),
            Self::Internal(err) => Exception::runtime_error(format!("Internal error in raiseflow: {err}")),
        }
    }

    pub fn internal(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Internal(msg.into())
    }

    /// The exception carried by this error, catchable or not.
    #[must_use]
    pub fn exception(&self) -> Option<&SimpleException> {
        match self {
            Self::Exc(exc) | Self::UncatchableExc(exc) => Some(exc),
            Self::Internal(_) => None,
        }
    }

    /// Returns true if this error is a catchable exception whose class is exactly `exc_type`.
    #[must_use]
    pub fn is_exception_type(&self, exc_type: ExcType) -> bool {
        match self {
            Self::Exc(exc) => exc.class_id() == exc_type.class_id(),
            _ => false,
        }
    }

    /// Records `frame_name` as the raising frame of an exception that has no traceback yet.
    pub(crate) fn with_frame(mut self, frame_name: &str) -> Self {
        if let Self::Exc(exc) | Self::UncatchableExc(exc) = &mut self {
            exc.ensure_frame(frame_name);
        }
        self
    }

    pub(crate) fn add_caller_frame(&mut self, frame_name: &str) {
        if let Self::Exc(exc) | Self::UncatchableExc(exc) = self {
            exc.add_caller_frame(frame_name);
        }
    }

    /// Makes `handled` the implicit context of an exception raised while it is handled.
    ///
    /// Replaces any context the instance carried from an earlier raise. Leaves the error
    /// alone when it is the handled instance itself (a re-raise) or when it already sits
    /// in `handled`'s context chain, which would make the chain cyclic.
    #[must_use]
    pub(crate) fn raised_during(mut self, handled: &SimpleException) -> Self {
        if let Self::Exc(exc) | Self::UncatchableExc(exc) = &mut self
            && !handled.context_chain_contains(exc.instance_id())
        {
            exc.set_context(Some(handled.clone()));
        }
        self
    }

    /// Sets `handled` as the context of an error leaving a handler or finally block,
    /// unless the error is the handled instance or already carries a context.
    #[must_use]
    pub(crate) fn chain_context(mut self, handled: &SimpleException) -> Self {
        if let Self::Exc(exc) | Self::UncatchableExc(exc) = &mut self
            && exc.instance_id() != handled.instance_id()
            && exc.context().is_none()
        {
            exc.set_context(Some(handled.clone()));
        }
        self
    }
}

