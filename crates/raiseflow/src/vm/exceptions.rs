//! Raising, re-raising and the try / except / else / finally statement.

use smallvec::SmallVec;

use super::{Runtime, frame_name};
use crate::{
    exception_private::{ExcType, RunError, RunResult, SimpleException},
    io::PrintWriter,
    object::Object,
    resource::ResourceTracker,
    tracer::RaiseTracer,
    types::ClassId,
};

impl<'a, T: ResourceTracker, P: PrintWriter, Tr: RaiseTracer> Runtime<'a, T, P, Tr> {
    /// Finishes raising an error at the current execution point.
    ///
    /// Records the current frame if the exception has no traceback yet and chains the
    /// exception being handled as implicit context. Every error the runtime produces
    /// goes through here.
    pub(crate) fn raise_error(&mut self, err: RunError) -> RunError {
        let frame = frame_name(&self.frames);
        let mut err = err.with_frame(frame);
        if let Some(handled) = self.handling.last() {
            err = err.raised_during(handled);
        }
        if let Some(exc) = err.exception() {
            self.tracer.on_raise(exc.class_name(), frame, self.frames.len());
        }
        err
    }

    /// Creates an instance of `class`, e.g. `ValueError("bad", 1)`.
    ///
    /// Raises `TypeError` when `class` does not derive from `BaseException`.
    pub fn new_exception(&mut self, class: impl Into<ClassId>, args: Vec<Object>) -> RunResult<SimpleException> {
        self.registry
            .instantiate(class.into(), args)
            .map_err(|err| self.raise_error(err))
    }

    /// `raise exc`.
    pub fn raise<R>(&mut self, exc: SimpleException) -> RunResult<R> {
        Err(self.raise_error(exc.into()))
    }

    /// `raise Class(*args)`.
    pub fn raise_new<R>(&mut self, class: impl Into<ClassId>, args: Vec<Object>) -> RunResult<R> {
        let exc = self.new_exception(class, args)?;
        self.raise(exc)
    }

    /// `raise exc from cause`; `None` is `raise exc from None`.
    ///
    /// Either way the implicit context is hidden from the traceback.
    pub fn raise_from<R>(&mut self, mut exc: SimpleException, cause: Option<SimpleException>) -> RunResult<R> {
        exc.set_cause(cause);
        exc.set_suppress_context(true);
        self.raise(exc)
    }

    /// Bare `raise`: re-raises the exception being handled unchanged.
    ///
    /// Raises `RuntimeError` when no exception is being handled.
    pub fn reraise<R>(&mut self) -> RunResult<R> {
        match self.handling.last() {
            Some(exc) => {
                self.tracer.on_reraise(exc.class_name());
                let mut exc = exc.clone();
                exc.reraised_in(frame_name(&self.frames));
                Err(RunError::Exc(Box::new(exc)))
            }
            None => Err(self.raise_error(ExcType::no_active_exception())),
        }
    }

    /// Starts a try statement protecting `body`.
    ///
    /// ```
    /// use raiseflow::{CollectStringPrint, ExcType, NoLimitTracker, NoopTracer, Runtime};
    ///
    /// let mut print = CollectStringPrint::new();
    /// let mut rt = Runtime::new("demo.py", NoLimitTracker, &mut print, NoopTracer);
    /// let caught = rt
    ///     .try_block(|rt| rt.raise_new(ExcType::ZeroDivisionError, vec!["division by zero".into()]))
    ///     .except([ExcType::ArithmeticError], |_, exc| Ok(exc.py_str()))
    ///     .run()
    ///     .unwrap();
    /// assert_eq!(caught, "division by zero");
    /// ```
    pub fn try_block<'r, R>(
        &'r mut self,
        body: impl FnOnce(&mut Self) -> RunResult<R> + 'r,
    ) -> TryStatement<'r, 'a, T, P, Tr, R> {
        TryStatement {
            rt: self,
            body: Box::new(body),
            clauses: Vec::new(),
            catch_all: None,
            orelse: None,
            finally: None,
        }
    }

    /// Selects the handler for `err` and runs it.
    ///
    /// Only catchable exceptions are dispatched; internal and uncatchable errors pass
    /// through untouched.
    fn dispatch<R>(
        &mut self,
        err: RunError,
        clauses: Vec<Clause<'_, Self, R>>,
        catch_all: Option<Handler<'_, Self, R>>,
    ) -> RunResult<R> {
        let RunError::Exc(exc) = err else {
            return Err(err);
        };
        let clause_count = clauses.len();
        for (index, clause) in clauses.into_iter().enumerate() {
            if !clause.classes.iter().all(|&c| self.registry.is_exception_class(c)) {
                self.handling.push((*exc).clone());
                let err = self.raise_error(ExcType::except_invalid_type_error());
                self.handling.pop();
                return Err(err);
            }
            if clause.classes.iter().any(|&c| self.registry.is_subclass(exc.class_id(), c)) {
                return self.handle(index, false, *exc, clause.handler);
            }
        }
        if let Some(handler) = catch_all {
            return self.handle(clause_count, true, *exc, handler);
        }
        self.tracer.on_propagate(exc.class_name());
        Err(RunError::Exc(exc))
    }

    fn handle<R>(
        &mut self,
        index: usize,
        catch_all: bool,
        exc: SimpleException,
        handler: Handler<'_, Self, R>,
    ) -> RunResult<R> {
        self.tracer.on_handler(index, catch_all, exc.class_name());
        self.handling.push(exc.clone());
        let result = handler(self, &exc);
        self.handling.pop();
        result.map_err(|err| err.chain_context(&exc))
    }

    /// Runs a `finally` block once for the given outcome.
    ///
    /// An error from the block replaces a catchable in-flight exception, which becomes its
    /// context. An uncatchable in-flight error is never replaced.
    fn run_finally<R>(&mut self, outcome: RunResult<R>, finally: Block<'_, Self, ()>) -> RunResult<R> {
        self.tracer.on_finally();
        let in_flight = match &outcome {
            Err(RunError::Exc(exc)) => Some((**exc).clone()),
            _ => None,
        };
        if let Some(exc) = &in_flight {
            self.handling.push(exc.clone());
        }
        let finally_result = finally(self);
        if in_flight.is_some() {
            self.handling.pop();
        }
        match (finally_result, outcome) {
            (Ok(()), outcome) => outcome,
            (Err(_), Err(uncatchable @ RunError::UncatchableExc(_))) => Err(uncatchable),
            (Err(err), _) => match in_flight {
                Some(exc) => Err(err.chain_context(&exc)),
                None => Err(err),
            },
        }
    }
}

type Block<'r, Rt, R> = Box<dyn FnOnce(&mut Rt) -> RunResult<R> + 'r>;
type Handler<'r, Rt, R> = Box<dyn FnOnce(&mut Rt, &SimpleException) -> RunResult<R> + 'r>;

/// One `except (A, B) as e:` clause.
struct Clause<'r, Rt, R> {
    classes: SmallVec<[ClassId; 2]>,
    handler: Handler<'r, Rt, R>,
}

/// A try statement under construction, created by [`Runtime::try_block`].
///
/// Semantics of [`run`](Self::run):
/// - handler clauses are examined in declaration order and the first clause naming the
///   raised class or one of its ancestors runs; the catch-all clause is examined last
/// - errors raised by a handler or by the `else` block are not seen by sibling clauses
/// - the `finally` block runs exactly once on every exit path, uncatchable errors included
#[must_use = "a try statement does nothing until `run` is called"]
pub struct TryStatement<'r, 'a, T: ResourceTracker, P: PrintWriter, Tr: RaiseTracer, R> {
    rt: &'r mut Runtime<'a, T, P, Tr>,
    body: Block<'r, Runtime<'a, T, P, Tr>, R>,
    clauses: Vec<Clause<'r, Runtime<'a, T, P, Tr>, R>>,
    catch_all: Option<Handler<'r, Runtime<'a, T, P, Tr>, R>>,
    orelse: Option<Block<'r, Runtime<'a, T, P, Tr>, ()>>,
    finally: Option<Block<'r, Runtime<'a, T, P, Tr>, ()>>,
}

impl<'r, 'a, T: ResourceTracker, P: PrintWriter, Tr: RaiseTracer, R> TryStatement<'r, 'a, T, P, Tr, R> {
    /// Adds `except (classes...) as e:`.
    pub fn except<C: Into<ClassId>>(
        mut self,
        classes: impl IntoIterator<Item = C>,
        handler: impl FnOnce(&mut Runtime<'a, T, P, Tr>, &SimpleException) -> RunResult<R> + 'r,
    ) -> Self {
        self.clauses.push(Clause {
            classes: classes.into_iter().map(Into::into).collect(),
            handler: Box::new(handler),
        });
        self
    }

    /// Adds a bare `except:` clause, which is always examined after every other clause.
    ///
    /// A second catch-all clause replaces the first.
    pub fn except_any(
        mut self,
        handler: impl FnOnce(&mut Runtime<'a, T, P, Tr>, &SimpleException) -> RunResult<R> + 'r,
    ) -> Self {
        self.catch_all = Some(Box::new(handler));
        self
    }

    /// Adds an `else:` block, run only when the body raised nothing.
    pub fn orelse(mut self, block: impl FnOnce(&mut Runtime<'a, T, P, Tr>) -> RunResult<()> + 'r) -> Self {
        self.orelse = Some(Box::new(block));
        self
    }

    /// Adds a `finally:` block.
    pub fn finally(mut self, block: impl FnOnce(&mut Runtime<'a, T, P, Tr>) -> RunResult<()> + 'r) -> Self {
        self.finally = Some(Box::new(block));
        self
    }

    /// Executes the statement, returning the value of the body or of the handler that ran.
    pub fn run(self) -> RunResult<R> {
        let Self {
            rt,
            body,
            clauses,
            catch_all,
            orelse,
            finally,
        } = self;

        let outcome = match body(rt) {
            Ok(value) => match orelse {
                Some(orelse) => {
                    rt.tracer.on_else();
                    orelse(rt).map(|()| value)
                }
                None => Ok(value),
            },
            Err(err) => rt.dispatch(err, clauses, catch_all),
        };

        match finally {
            Some(finally) => rt.run_finally(outcome, finally),
            None => outcome,
        }
    }
}
