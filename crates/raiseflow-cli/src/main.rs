use std::{env, process::ExitCode, str::FromStr, time::Instant};

use raiseflow::{
    ExcType, Lesson, NoLimitTracker, NoPrint, NoopTracer, ProfilingTracer, RaiseTracer, Runtime, StdPrint,
    StderrTracer, lessons::TeradataClasses,
};
use strum::IntoEnumIterator;

const USAGE: &str = "\
usage: raiseflow [LESSON ...] [--trace] [--profile] [--json]
       raiseflow list
       raiseflow mro <ExceptionName>";

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    List,
    Mro(String),
    Run(Options),
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    lessons: Vec<Lesson>,
    trace: bool,
    profile: bool,
    json: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("error: {err}\n\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match command {
        Command::Help => {
            println!("{USAGE}");
            ExitCode::SUCCESS
        }
        Command::List => {
            for lesson in Lesson::iter() {
                let name: &'static str = lesson.into();
                println!("{name:<15} {}", lesson.description());
            }
            ExitCode::SUCCESS
        }
        Command::Mro(name) => print_mro(&name),
        Command::Run(options) => {
            if options.trace {
                run_lessons(&options, StderrTracer::new()).0
            } else if options.profile {
                let start = Instant::now();
                let (code, tracer) = run_lessons(&options, ProfilingTracer::new());
                let elapsed = start.elapsed();
                eprint!("{}", tracer.report());
                eprintln!("Elapsed:            {elapsed:?}");
                code
            } else {
                run_lessons(&options, NoopTracer).0
            }
        }
    }
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    match args.first().map(String::as_str) {
        Some("-h" | "--help" | "help") => return Ok(Command::Help),
        Some("list") => {
            return if args.len() == 1 {
                Ok(Command::List)
            } else {
                Err("`list` takes no arguments".to_owned())
            };
        }
        Some("mro") => {
            return match &args[1..] {
                [name] => Ok(Command::Mro(name.clone())),
                _ => Err("`mro` takes exactly one exception name".to_owned()),
            };
        }
        _ => {}
    }

    let mut options = Options::default();
    for arg in args {
        match arg.as_str() {
            "--trace" => options.trace = true,
            "--profile" => options.profile = true,
            "--json" => options.json = true,
            flag if flag.starts_with('-') => return Err(format!("unknown option '{flag}'")),
            name => {
                let lesson =
                    Lesson::from_str(name).map_err(|_| format!("unknown lesson '{name}', see `raiseflow list`"))?;
                options.lessons.push(lesson);
            }
        }
    }
    if options.trace && options.profile {
        return Err("--trace and --profile cannot be combined".to_owned());
    }
    if options.lessons.is_empty() {
        options.lessons = Lesson::iter().collect();
    }
    Ok(Command::Run(options))
}

/// Runs every requested lesson in its own runtime, threading the tracer through.
///
/// An unhandled exception is reported on stderr and the remaining lessons still run.
fn run_lessons<Tr: RaiseTracer>(options: &Options, mut tracer: Tr) -> (ExitCode, Tr) {
    let mut print = StdPrint;
    let mut code = ExitCode::SUCCESS;
    for &lesson in &options.lessons {
        let mut rt = Runtime::new(lesson.file_name(), NoLimitTracker, &mut print, tracer);
        let result = rt.run_module(|rt| lesson.run(rt));
        tracer = rt.into_tracer();

        if let Err(exc) = result {
            // stdout printed before the exception comes first
            StdPrint::flush();
            if options.json {
                match exc.to_json() {
                    Ok(json) => eprintln!("{json}"),
                    Err(err) => eprintln!("error: {err}"),
                }
            } else {
                eprintln!("{exc}");
            }
            code = ExitCode::FAILURE;
        }
    }
    (code, tracer)
}

/// Prints the MRO of a builtin exception or of one of the lesson classes.
fn print_mro(name: &str) -> ExitCode {
    match mro_of(name) {
        Ok(mro) => {
            println!("{mro}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Resolves `name` the way lesson code does, so the lesson classes shadow builtins of
/// the same name, and renders its MRO.
fn mro_of(name: &str) -> Result<String, String> {
    let mut print = NoPrint;
    let mut rt = Runtime::new("<mro>", NoLimitTracker, &mut print, NoopTracer);
    rt.run_module(|rt| {
        TeradataClasses::define(rt)?;
        let class = rt.lookup_class(name)?;
        Ok(rt.registry().mro_repr(class))
    })
    .map_err(|err| match err.exc_type() {
        ExcType::NameError => format!("error: unknown exception class '{name}'"),
        _ => err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn no_arguments_runs_every_lesson() {
        let Ok(Command::Run(options)) = parse_args(&[]) else {
            panic!("expected run command");
        };
        assert_eq!(options.lessons, Lesson::iter().collect::<Vec<_>>());
        assert!(!options.trace && !options.profile && !options.json);
    }

    #[test]
    fn lessons_and_flags() {
        let command = parse_args(&args(&["mro", "TestError"])).unwrap();
        assert_eq!(command, Command::Mro("TestError".to_owned()));

        let Ok(Command::Run(options)) = parse_args(&args(&["handling", "--json", "raise-args"])) else {
            panic!("expected run command");
        };
        assert_eq!(options.lessons, [Lesson::Handling, Lesson::RaiseArgs]);
        assert!(options.json);
    }

    #[test]
    fn mro_lookup_matches_lesson_name_resolution() {
        assert_eq!(
            mro_of("IOError").unwrap(),
            "[<class 'OSError'>, <class 'Exception'>, <class 'BaseException'>, <class 'object'>]"
        );
        assert!(mro_of("SystemError").unwrap().starts_with(
            "[<class '__main__.SystemError'>, <class '__main__.TeradataException'>, <class 'Exception'>"
        ));
        assert_eq!(mro_of("Nope").unwrap_err(), "error: unknown exception class 'Nope'");
    }

    #[test]
    fn usage_errors() {
        assert!(parse_args(&args(&["nope"])).is_err());
        assert!(parse_args(&args(&["--verbose"])).is_err());
        assert!(parse_args(&args(&["--trace", "--profile"])).is_err());
        assert!(parse_args(&args(&["mro"])).is_err());
        assert!(parse_args(&args(&["list", "extra"])).is_err());
    }
}
