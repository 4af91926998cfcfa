//! Exception flow tracing infrastructure.
//!
//! Provides a trait-based tracing system for the runtime with zero-cost abstraction.
//! When using [`NoopTracer`], all trace methods compile away entirely via monomorphization,
//! the same way [`NoLimitTracker`](crate::NoLimitTracker) keeps resource
//! checking cheap.
//!
//! # Architecture
//!
//! The [`RaiseTracer`] trait defines hook points at the events of exception control flow
//! (calls, raises, handler selection, `else` and `finally` blocks, class definitions).
//! Concrete implementations collect different kinds of data:
//!
//! | Tracer | Purpose |
//! |--------|---------|
//! | [`NoopTracer`] | Zero-cost no-op (default) |
//! | [`StderrTracer`] | Human-readable event log to stderr |
//! | [`ProfilingTracer`] | Raise counts per class and call depth tracking |
//! | [`RecordingTracer`] | Full event recording for assertions or post-mortem |
//!
//! # Usage
//!
//! The runtime is parameterized as `Runtime<'a, T: ResourceTracker, P: PrintWriter, Tr: RaiseTracer>`.
//! Callers choose the tracer at construction time:
//!
//! ```
//! use raiseflow::{NoLimitTracker, NoPrint, ProfilingTracer, Runtime};
//!
//! let mut print = NoPrint;
//! let mut rt = Runtime::new("demo.py", NoLimitTracker, &mut print, ProfilingTracer::new());
//! let _ = rt.run_module(|rt| rt.raise_new::<()>(raiseflow::ExcType::ValueError, vec![]));
//! assert_eq!(rt.tracer().report().total_raises, 1);
//! ```

use std::fmt;

use ahash::AHashMap;

/// Trace event emitted during execution.
///
/// Used by [`RecordingTracer`] to capture a full trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// A call pushed a new frame.
    Call {
        name: String,
        /// Call stack depth after the push.
        depth: usize,
    },
    /// A call popped its frame.
    Return {
        /// Call stack depth after the pop.
        depth: usize,
    },
    /// A new exception was raised (not a re-raise).
    Raise {
        type_name: String,
        frame: String,
        depth: usize,
    },
    /// The in-flight exception was re-raised unchanged.
    Reraise { type_name: String },
    /// A handler clause was selected.
    Handler {
        /// Index of the clause in declaration order.
        clause: usize,
        /// Whether the clause was the catch-all one.
        catch_all: bool,
        type_name: String,
    },
    /// No handler clause matched and the exception leaves the try statement.
    Propagate { type_name: String },
    /// The `else` block ran.
    Else,
    /// The `finally` block ran.
    Finally,
    /// A user class was registered.
    ClassDefined { name: String, mro_len: usize },
}

/// Hook points for observing exception control flow.
///
/// Every method has a no-op default so implementations only override what they need.
pub trait RaiseTracer {
    /// Called after a frame has been pushed.
    #[inline]
    fn on_call(&mut self, _name: &str, _depth: usize) {}

    /// Called after a frame has been popped.
    #[inline]
    fn on_return(&mut self, _depth: usize) {}

    /// Called when a new exception is raised in `frame`.
    #[inline]
    fn on_raise(&mut self, _type_name: &str, _frame: &str, _depth: usize) {}

    /// Called on a bare re-raise of the exception being handled.
    #[inline]
    fn on_reraise(&mut self, _type_name: &str) {}

    /// Called when handler clause `clause` is chosen for an exception.
    #[inline]
    fn on_handler(&mut self, _clause: usize, _catch_all: bool, _type_name: &str) {}

    /// Called when no clause of a try statement matched.
    #[inline]
    fn on_propagate(&mut self, _type_name: &str) {}

    #[inline]
    fn on_else(&mut self) {}

    #[inline]
    fn on_finally(&mut self) {}

    /// Called after a user class has been registered.
    #[inline]
    fn on_class_defined(&mut self, _name: &str, _mro_len: usize) {}
}

/// Zero-cost tracer: every hook is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl RaiseTracer for NoopTracer {}

// ============================================================================
// StderrTracer: human-readable event log
// ============================================================================

/// Tracer that prints a human-readable event log to stderr.
///
/// Output format:
/// ```text
///   >>> CALL hierarchy            depth=1
///   !!! RAISE TestError           in f  depth=2
///   ~~> HANDLER #0                TestError
///   ... FINALLY
///   <<< RETURN                    depth=0
/// ```
#[derive(Debug, Default)]
pub struct StderrTracer {
    /// Maximum number of events to print. None = unlimited.
    limit: Option<usize>,
    count: usize,
    stopped: bool,
}

impl StderrTracer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tracer that stops printing after `limit` events.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    fn emit(&mut self, line: fmt::Arguments<'_>) {
        if self.stopped {
            return;
        }
        eprintln!("{line}");
        self.count += 1;
        if let Some(limit) = self.limit
            && self.count >= limit
        {
            eprintln!("--- trace limit reached ({limit} events) ---");
            self.stopped = true;
        }
    }
}

impl RaiseTracer for StderrTracer {
    fn on_call(&mut self, name: &str, depth: usize) {
        self.emit(format_args!("  >>> CALL {name:<20} depth={depth}"));
    }

    fn on_return(&mut self, depth: usize) {
        self.emit(format_args!("  <<< RETURN                    depth={depth}"));
    }

    fn on_raise(&mut self, type_name: &str, frame: &str, depth: usize) {
        self.emit(format_args!("  !!! RAISE {type_name:<19} in {frame}  depth={depth}"));
    }

    fn on_reraise(&mut self, type_name: &str) {
        self.emit(format_args!("  !!! RERAISE {type_name}"));
    }

    fn on_handler(&mut self, clause: usize, catch_all: bool, type_name: &str) {
        let kind = if catch_all { "HANDLER (any)" } else { "HANDLER" };
        self.emit(format_args!("  ~~> {kind} #{clause:<8} {type_name}"));
    }

    fn on_propagate(&mut self, type_name: &str) {
        self.emit(format_args!("  ^^^ PROPAGATE {type_name}"));
    }

    fn on_else(&mut self) {
        self.emit(format_args!("  ... ELSE"));
    }

    fn on_finally(&mut self) {
        self.emit(format_args!("  ... FINALLY"));
    }

    fn on_class_defined(&mut self, name: &str, mro_len: usize) {
        self.emit(format_args!("  +++ CLASS {name:<19} mro_len={mro_len}"));
    }
}

// ============================================================================
// ProfilingTracer: raise counts and call depth tracking
// ============================================================================

/// Tracer that collects execution statistics.
///
/// Retrieve results via [`ProfilingTracer::report`] after execution.
#[derive(Debug, Default)]
pub struct ProfilingTracer {
    raise_counts: AHashMap<String, u64>,
    total_raises: u64,
    total_reraises: u64,
    total_handled: u64,
    total_propagated: u64,
    total_finally: u64,
    total_calls: u64,
    max_depth: usize,
    classes_defined: u64,
}

/// Summary report from a profiling trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilingReport {
    /// Raises per class name, most frequent first (ties by name).
    pub raise_counts: Vec<(String, u64)>,
    pub total_raises: u64,
    pub total_reraises: u64,
    pub total_handled: u64,
    pub total_propagated: u64,
    pub total_finally: u64,
    pub total_calls: u64,
    pub max_depth: usize,
    pub classes_defined: u64,
}

impl ProfilingTracer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn report(&self) -> ProfilingReport {
        let mut raise_counts: Vec<_> = self.raise_counts.iter().map(|(k, &v)| (k.clone(), v)).collect();
        raise_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ProfilingReport {
            raise_counts,
            total_raises: self.total_raises,
            total_reraises: self.total_reraises,
            total_handled: self.total_handled,
            total_propagated: self.total_propagated,
            total_finally: self.total_finally,
            total_calls: self.total_calls,
            max_depth: self.max_depth,
            classes_defined: self.classes_defined,
        }
    }
}

impl RaiseTracer for ProfilingTracer {
    #[inline]
    fn on_call(&mut self, _name: &str, depth: usize) {
        self.total_calls += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    fn on_raise(&mut self, type_name: &str, _frame: &str, _depth: usize) {
        self.total_raises += 1;
        *self.raise_counts.entry(type_name.to_owned()).or_insert(0) += 1;
    }

    fn on_reraise(&mut self, _type_name: &str) {
        self.total_reraises += 1;
    }

    fn on_handler(&mut self, _clause: usize, _catch_all: bool, _type_name: &str) {
        self.total_handled += 1;
    }

    fn on_propagate(&mut self, _type_name: &str) {
        self.total_propagated += 1;
    }

    fn on_finally(&mut self) {
        self.total_finally += 1;
    }

    fn on_class_defined(&mut self, _name: &str, _mro_len: usize) {
        self.classes_defined += 1;
    }
}

impl fmt::Display for ProfilingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Raise Profiling Report ===")?;
        writeln!(f, "Total raises:       {}", self.total_raises)?;
        writeln!(f, "Re-raises:          {}", self.total_reraises)?;
        writeln!(f, "Handled:            {}", self.total_handled)?;
        writeln!(f, "Propagated:         {}", self.total_propagated)?;
        writeln!(f, "Finally blocks:     {}", self.total_finally)?;
        writeln!(f, "Total calls:        {}", self.total_calls)?;
        writeln!(f, "Max call depth:     {}", self.max_depth)?;
        writeln!(f, "Classes defined:    {}", self.classes_defined)?;
        if !self.raise_counts.is_empty() {
            writeln!(f)?;
            writeln!(f, "--- Raises by class ---")?;
            for (name, count) in &self.raise_counts {
                writeln!(f, "  {name:<28} {count:>6}")?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// RecordingTracer: full event log
// ============================================================================

/// Tracer that records every event in order.
///
/// The event stream of two runs can be compared to find where control flow diverged.
#[derive(Debug, Default)]
pub struct RecordingTracer {
    events: Vec<TraceEvent>,
    /// Optional limit on number of events recorded.
    limit: Option<usize>,
}

impl RecordingTracer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new recording tracer that stops recording after `limit` events.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            events: Vec::with_capacity(limit.min(1024)),
            limit: Some(limit),
        }
    }

    #[must_use]
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    #[must_use]
    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }

    /// Number of recorded events matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&TraceEvent) -> bool) -> usize {
        self.events.iter().filter(|e| predicate(e)).count()
    }

    fn record(&mut self, event: TraceEvent) {
        if self.limit.is_some_and(|l| self.events.len() >= l) {
            return;
        }
        self.events.push(event);
    }
}

impl RaiseTracer for RecordingTracer {
    fn on_call(&mut self, name: &str, depth: usize) {
        self.record(TraceEvent::Call {
            name: name.to_owned(),
            depth,
        });
    }

    fn on_return(&mut self, depth: usize) {
        self.record(TraceEvent::Return { depth });
    }

    fn on_raise(&mut self, type_name: &str, frame: &str, depth: usize) {
        self.record(TraceEvent::Raise {
            type_name: type_name.to_owned(),
            frame: frame.to_owned(),
            depth,
        });
    }

    fn on_reraise(&mut self, type_name: &str) {
        self.record(TraceEvent::Reraise {
            type_name: type_name.to_owned(),
        });
    }

    fn on_handler(&mut self, clause: usize, catch_all: bool, type_name: &str) {
        self.record(TraceEvent::Handler {
            clause,
            catch_all,
            type_name: type_name.to_owned(),
        });
    }

    fn on_propagate(&mut self, type_name: &str) {
        self.record(TraceEvent::Propagate {
            type_name: type_name.to_owned(),
        });
    }

    fn on_else(&mut self) {
        self.record(TraceEvent::Else);
    }

    fn on_finally(&mut self) {
        self.record(TraceEvent::Finally);
    }

    fn on_class_defined(&mut self, name: &str, mro_len: usize) {
        self.record(TraceEvent::ClassDefined {
            name: name.to_owned(),
            mro_len,
        });
    }
}
