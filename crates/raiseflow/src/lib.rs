#![doc = include_str!("../../../README.md")]

mod exception_private;
mod exception_public;
mod io;
pub mod lessons;
mod object;
mod resource;
pub mod tracer;
mod types;
mod vm;

pub use crate::{
    exception_private::{ExcType, RunError, RunResult, SimpleException},
    exception_public::{Exception, StackFrame},
    io::{CollectStringPrint, NoPrint, PrintWriter, StdPrint},
    lessons::Lesson,
    object::Object,
    resource::{
        DEFAULT_MAX_RECURSION_DEPTH, LimitedTracker, MAX_INHERITANCE_DEPTH, MAX_MRO_LENGTH, NoLimitTracker,
        ResourceError, ResourceLimits, ResourceTracker,
    },
    tracer::{NoopTracer, ProfilingReport, ProfilingTracer, RaiseTracer, RecordingTracer, StderrTracer, TraceEvent},
    types::{Attr, ClassDef, ClassId, ClassObject, ClassRegistry, MethodCall, NativeMethod, OBJECT_CLASS_ID, c3_merge},
    vm::{MODULE_FRAME, Runtime, TryStatement},
};
