/// Tests for the replayed notebook lessons.
use pretty_assertions::assert_eq;
use raiseflow::{
    ClassId, CollectStringPrint, ExcType, Exception, Lesson, NoLimitTracker, Object, RecordingTracer, Runtime,
    TraceEvent, lessons::handle_example,
};
use strum::IntoEnumIterator;

fn run_lesson(lesson: Lesson) -> (Result<(), Exception>, String, Vec<TraceEvent>) {
    let mut print = CollectStringPrint::new();
    let mut rt = Runtime::new(lesson.file_name(), NoLimitTracker, &mut print, RecordingTracer::new());
    let result = rt.run_module(|rt| lesson.run(rt));
    let events = rt.into_tracer().into_events();
    (result, print.into_output(), events)
}

fn run_handle_example(class: ExcType, args: Vec<Object>) -> (Result<(), Exception>, String) {
    let mut print = CollectStringPrint::new();
    let mut rt = Runtime::new("HandlingExceptions.py", NoLimitTracker, &mut print, RecordingTracer::new());
    let result = rt.run_module(|rt| handle_example(rt, class, args));
    drop(rt);
    (result, print.into_output())
}

#[test]
fn lesson_names_round_trip_through_the_command_line_form() {
    let names: Vec<String> = Lesson::iter().map(|l| l.to_string()).collect();
    assert_eq!(
        names,
        ["hierarchy", "raise-args", "handling", "assert-raises", "resolution", "mro"]
    );
    assert_eq!("assert-raises".parse::<Lesson>().unwrap(), Lesson::AssertRaises);
    assert!("AssertRaises".parse::<Lesson>().is_err());
}

#[test]
fn hierarchy_prints_the_builtin_tree() {
    let (result, output, _) = run_lesson(Lesson::Hierarchy);
    result.unwrap();
    assert!(output.starts_with(
        "BaseException\n +-- SystemExit\n +-- KeyboardInterrupt\n +-- GeneratorExit\n +-- Exception\n      +-- StopIteration\n"
    ));
    assert!(output.contains("\n      +-- OSError\n      |    +-- BlockingIOError\n"));
    assert!(output.contains("\n      |    +-- ConnectionError\n      |    |    +-- BrokenPipeError\n"));
    assert!(output.contains("\n      |    +-- IndentationError\n      |         +-- TabError\n"));
    assert!(output.ends_with("           +-- ResourceWarning\n"));
}

#[test]
fn raise_args_ends_with_unhandled_exception() {
    let (result, output, events) = run_lesson(Lesson::RaiseArgs);
    let exc = result.unwrap_err();
    assert_eq!(output, "");
    assert_eq!(exc.args().len(), 2);
    assert_eq!(
        exc.to_string(),
        "Traceback (most recent call last):\n  File \"ErrorsExceptions.py\", in <module>\nException: ('RARWRRWRWRW', '123')"
    );
    assert_eq!(
        events,
        [TraceEvent::Raise {
            type_name: "Exception".to_owned(),
            frame: "<module>".to_owned(),
            depth: 0,
        }]
    );
}

#[test]
fn handling_runs_the_named_clause_then_finally() {
    let (result, output, _) = run_lesson(Lesson::Handling);
    result.unwrap();
    assert_eq!(output, "syntax error! (['foo', 'bar'],)\nfinally: always executed last\n");
}

#[test]
fn handle_example_tuple_clause() {
    for (class, expected) in [
        (ExcType::TypeError, "type error"),
        (ExcType::NameError, "name error"),
        (ExcType::UnboundLocalError, "name error"),
        (ExcType::UnicodeDecodeError, "unicode decode error"),
    ] {
        let (result, output) = run_handle_example(class, Vec::new());
        result.unwrap();
        assert_eq!(output, format!("{expected}\nfinally: always executed last\n"), "{class}");
    }
}

/// Any `OSError` subclass is handled by the anonymous `OSError` clause.
#[test]
fn handle_example_os_error_subclass() {
    let (result, output) = run_handle_example(ExcType::FileNotFoundError, vec!["missing.txt".into()]);
    result.unwrap();
    assert_eq!(output, "unhandled io error\nfinally: always executed last\n");
}

/// The default clause re-raises, so the exception escapes after `finally` runs.
#[test]
fn handle_example_default_clause_reraises() {
    let (result, output) = run_handle_example(ExcType::ValueError, vec!["unexpected".into()]);
    assert_eq!(
        output,
        "Unexpected exception raised\nfinally: always executed last\n"
    );
    let exc = result.unwrap_err();
    assert_eq!(
        exc.to_string(),
        "Traceback (most recent call last):\n  File \"HandlingExceptions.py\", in <module>\nValueError: unexpected"
    );
    assert!(exc.context().is_none());
}

#[test]
fn assert_raises_reports_expected_exception() {
    let (result, output, events) = run_lesson(Lesson::AssertRaises);
    result.unwrap();
    assert_eq!(output, "True\n");
    assert!(events.contains(&TraceEvent::Raise {
        type_name: "Exception".to_owned(),
        frame: "push".to_owned(),
        depth: 1,
    }));
}

#[test]
fn assert_raises_with_other_outcomes() {
    let mut print = CollectStringPrint::new();
    let mut rt = Runtime::new("AssertRaises.py", NoLimitTracker, &mut print, RecordingTracer::new());
    let (wrong, none) = rt
        .run_module(|rt| {
            let wrong = raiseflow::lessons::assert_raises(rt, ExcType::KeyError, |rt| {
                rt.raise_new(ExcType::ValueError, Vec::new())
            })?;
            let none = raiseflow::lessons::assert_raises(rt, ExcType::KeyError, |_| Ok(()))?;
            Ok((wrong, none))
        })
        .unwrap();
    assert!(!wrong);
    assert!(!none);
}

/// TestError is caught by the RetryableError clause, and `e.f()` resolves to PDEError's
/// override because PDEError precedes DBSError in the linearization.
#[test]
fn resolution_selects_first_clause_and_first_override() {
    let (result, output, events) = run_lesson(Lesson::Resolution);
    result.unwrap();
    assert_eq!(output, "PDEError\n");
    assert!(events.contains(&TraceEvent::Handler {
        clause: 0,
        catch_all: false,
        type_name: "TestError".to_owned(),
    }));
    assert!(!events.contains(&TraceEvent::Else));
}

#[test]
fn mro_lesson_prints_linearization() {
    let (result, output, events) = run_lesson(Lesson::Mro);
    result.unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        [
            "[<class '__main__.TestError'>, <class '__main__.PDEError'>, <class '__main__.SystemError'>, \
             <class '__main__.DBSError'>, <class '__main__.RetryableError'>, <class '__main__.TeradataException'>, \
             <class 'Exception'>, <class 'BaseException'>, <class 'object'>]",
            "The class that comes first in the list has precedence over classes that come later",
        ]
    );
    let defined = events
        .iter()
        .filter(|e| matches!(e, TraceEvent::ClassDefined { .. }))
        .count();
    assert_eq!(defined, 6);
}

/// Calling `super().f()` from PDEError's position continues with SystemError's override.
#[test]
fn teradata_super_call() {
    let mut print = CollectStringPrint::new();
    let mut rt = Runtime::new("MethodResolution.py", NoLimitTracker, &mut print, RecordingTracer::new());
    let result = rt.run_module(|rt| {
        let classes = raiseflow::lessons::TeradataClasses::define(rt)?;
        let exc = rt.new_exception(classes.test, Vec::new())?;
        rt.call_method(&exc, "f")?;
        rt.call_super_method(&exc, classes.pde, "f")?;
        rt.call_super_method(&exc, classes.system, "f")?;
        let shadow: ClassId = rt.lookup_class("SystemError")?;
        Ok(shadow == classes.system)
    });
    assert!(result.unwrap());
    assert_eq!(print.output(), "PDEError\nSystemError\nDBSError\n");
}
