//! The notebook lessons, replayed against a [`Runtime`].
//!
//! Each lesson is module-level code: it prints to the runtime's writer and may end with an
//! unhandled exception (`raise-args` always does).

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
    exception_private::{ExcType, RunResult},
    io::PrintWriter,
    object::Object,
    resource::ResourceTracker,
    tracer::RaiseTracer,
    types::{ClassDef, ClassId, MethodCall},
    vm::Runtime,
};

/// A runnable lesson, named in kebab-case on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Lesson {
    /// Prints the builtin exception tree.
    Hierarchy,
    /// Raises an exception with two arguments and leaves it unhandled.
    RaiseArgs,
    /// A try statement using every kind of clause.
    Handling,
    /// `assertRaises` built from a try statement.
    AssertRaises,
    /// Which handler and which override run for a multiply-inherited exception.
    Resolution,
    /// Prints the linearization of the multiply-inherited exception.
    Mro,
}

impl Lesson {
    /// One-line summary shown by `raiseflow list`.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Hierarchy => "the builtin exception hierarchy",
            Self::RaiseArgs => "raising an exception with arguments, unhandled",
            Self::Handling => "try / except / else / finally with named, anonymous, tuple and default clauses",
            Self::AssertRaises => "assertRaises implemented with a try statement",
            Self::Resolution => "handler selection and method override resolution",
            Self::Mro => "the C3 linearization of TestError",
        }
    }

    /// File name the lesson's tracebacks refer to.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Hierarchy => "ExceptionHierarchy.py",
            Self::RaiseArgs => "ErrorsExceptions.py",
            Self::Handling => "HandlingExceptions.py",
            Self::AssertRaises => "AssertRaises.py",
            Self::Resolution => "ExceptionResolution.py",
            Self::Mro => "MethodResolution.py",
        }
    }

    pub fn run<T: ResourceTracker, P: PrintWriter, Tr: RaiseTracer>(self, rt: &mut Runtime<'_, T, P, Tr>) -> RunResult<()> {
        match self {
            Self::Hierarchy => {
                let tree = rt.registry().render_tree(ExcType::BaseException.class_id());
                rt.print_line(tree)
            }
            Self::RaiseArgs => {
                let t = rt.new_exception(ExcType::Exception, vec!["RARWRRWRWRW".into(), "123".into()])?;
                rt.raise(t)
            }
            Self::Handling => handle_example(rt, ExcType::SyntaxError, vec![Object::from(vec!["foo", "bar"])]),
            Self::AssertRaises => {
                let raised = assert_raises(rt, ExcType::Exception, |rt| {
                    push(rt, &Object::List(Vec::new()), &Object::from("arg"))
                })?;
                rt.print_line(Object::Bool(raised))
            }
            Self::Resolution => {
                let classes = TeradataClasses::define(rt)?;
                rt.try_block(|rt| rt.raise_new(classes.test, Vec::new()))
                    .except([classes.retryable], |rt, e| rt.call_method(e, "f").map(drop))
                    .except([classes.teradata], |rt, _| rt.print_line("TeradataException"))
                    .except_any(|rt, _| rt.print_line("Unhandled"))
                    .orelse(|rt| rt.print_line("No exception thrown"))
                    .run()
            }
            Self::Mro => {
                let classes = TeradataClasses::define(rt)?;
                let mro = rt.registry().mro_repr(classes.test);
                rt.print_line(mro)?;
                rt.print_line("The class that comes first in the list has precedence over classes that come later")
            }
        }
    }
}

/// Raises `class(*args)` inside a try statement with named, anonymous, tuple and default
/// clauses plus `else` and `finally` blocks.
///
/// The default clause prints a notice and re-raises.
pub fn handle_example<T: ResourceTracker, P: PrintWriter, Tr: RaiseTracer>(
    rt: &mut Runtime<'_, T, P, Tr>,
    class: impl Into<ClassId>,
    args: Vec<Object>,
) -> RunResult<()> {
    let class: ClassId = class.into();
    rt.try_block(|rt| rt.raise_new(class, args))
        .except([ExcType::SyntaxError], |rt, inst| {
            rt.print_line(format!("syntax error! {}", inst.args_tuple()))
        })
        .except([ExcType::OSError], |rt, _| rt.print_line("unhandled io error"))
        .except(
            [ExcType::UnicodeDecodeError, ExcType::TypeError, ExcType::NameError],
            |rt, e| {
                if rt.isinstance(e, ExcType::UnicodeDecodeError) {
                    rt.print_line("unicode decode error")
                } else if rt.issubclass(e.class_id(), ExcType::TypeError) {
                    rt.print_line("type error")
                } else {
                    rt.print_line("name error")
                }
            },
        )
        .except_any(|rt, _| {
            rt.print_line("Unexpected exception raised")?;
            rt.reraise()
        })
        .orelse(|rt| rt.print_line("else: executes code if no exception is raised in try"))
        .finally(|rt| rt.print_line("finally: always executed last"))
        .run()
}

/// Returns whether `func` raises an instance of `exception`.
///
/// Any other exception counts as "did not raise the expected exception".
pub fn assert_raises<'r, 'a, T: ResourceTracker, P: PrintWriter, Tr: RaiseTracer>(
    rt: &'r mut Runtime<'a, T, P, Tr>,
    exception: impl Into<ClassId>,
    func: impl FnOnce(&mut Runtime<'a, T, P, Tr>) -> RunResult<()> + 'r,
) -> RunResult<bool> {
    let exception: ClassId = exception.into();
    rt.try_block(move |rt| func(rt).map(|()| false))
        .except([exception], |_, _| Ok(true))
        .except_any(|_, _| Ok(false))
        .run()
}

/// A queue push that always fails with a bare `Exception`.
fn push<T: ResourceTracker, P: PrintWriter, Tr: RaiseTracer>(
    rt: &mut Runtime<'_, T, P, Tr>,
    _queue: &Object,
    _item: &Object,
) -> RunResult<()> {
    rt.call("push", |rt| rt.raise_new(ExcType::Exception, Vec::new()))
}

/// The exception hierarchy of the database driver example.
///
/// `SystemError` deliberately shadows the builtin of the same name.
#[derive(Debug, Clone, Copy)]
pub struct TeradataClasses {
    pub teradata: ClassId,
    pub retryable: ClassId,
    pub system: ClassId,
    pub dbs: ClassId,
    pub pde: ClassId,
    /// Inherits from both `PDEError` and `DBSError`.
    pub test: ClassId,
}

impl TeradataClasses {
    pub fn define<T: ResourceTracker, P: PrintWriter, Tr: RaiseTracer>(rt: &mut Runtime<'_, T, P, Tr>) -> RunResult<Self> {
        let teradata = rt.define_class(ClassDef::new("TeradataException").base(ExcType::Exception))?;
        let retryable = rt.define_class(
            ClassDef::new("RetryableError")
                .base(teradata)
                .method("f", print_name("RetryableError")),
        )?;
        let system = rt.define_class(
            ClassDef::new("SystemError")
                .base(teradata)
                .method("f", print_name("SystemError")),
        )?;
        let dbs = rt.define_class(ClassDef::new("DBSError").base(retryable).method("f", print_name("DBSError")))?;
        let pde = rt.define_class(ClassDef::new("PDEError").base(system).method("f", print_name("PDEError")))?;
        let test = rt.define_class(ClassDef::new("TestError").base(pde).base(dbs))?;
        Ok(Self {
            teradata,
            retryable,
            system,
            dbs,
            pde,
            test,
        })
    }
}

fn print_name(name: &'static str) -> impl Fn(&mut MethodCall<'_>) -> RunResult<Object> + 'static {
    move |call| {
        call.print_line(name)?;
        Ok(Object::None)
    }
}
