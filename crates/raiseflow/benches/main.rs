// Use codspeed-criterion-compat when running on CodSpeed (CI), real criterion otherwise (for flamegraphs)
#[cfg(codspeed)]
use codspeed_criterion_compat::{Bencher, Criterion, black_box, criterion_group, criterion_main};
#[cfg(not(codspeed))]
use criterion::{Bencher, Criterion, black_box, criterion_group, criterion_main};
use raiseflow::{ClassDef, ClassId, ClassRegistry, ExcType, NoLimitTracker, NoPrint, NoopTracer, RunResult, Runtime};

/// Builds a chain of `depth` diamonds on top of `Exception` and returns the bottom class.
///
/// Each level `Dn(Ln, Rn)` with `Ln(Dn-1)` and `Rn(Dn-1)`, so every linearization merges
/// two overlapping base lists.
fn diamond_chain(registry: &mut ClassRegistry, depth: usize) -> ClassId {
    let mut bottom = ExcType::Exception.class_id();
    for level in 0..depth {
        let left = registry
            .define_class(ClassDef::new(format!("L{level}")).base(bottom))
            .unwrap();
        let right = registry
            .define_class(ClassDef::new(format!("R{level}")).base(bottom))
            .unwrap();
        bottom = registry
            .define_class(ClassDef::new(format!("D{level}")).base(left).base(right))
            .unwrap();
    }
    bottom
}

fn bench_linearize(bench: &mut Bencher, depth: usize) {
    bench.iter(|| {
        let mut registry = ClassRegistry::new();
        let bottom = diamond_chain(&mut registry, depth);
        black_box(registry.get(bottom).map(|class| class.mro().len()));
    });
}

/// Raises the bottom class of a diamond chain through `frames` calls and catches it with
/// the last of several clauses.
fn bench_dispatch(bench: &mut Bencher, frames: usize) {
    let mut print = NoPrint;
    let mut rt = Runtime::new("bench.py", NoLimitTracker, &mut print, NoopTracer);
    let mut rights = Vec::new();
    let bottom = rt
        .run_module(|rt| {
            let mut bottom = ExcType::Exception.class_id();
            for level in 0..8 {
                let left = rt.define_class(ClassDef::new(format!("L{level}")).base(bottom))?;
                let right = rt.define_class(ClassDef::new(format!("R{level}")).base(bottom))?;
                bottom = rt.define_class(ClassDef::new(format!("D{level}")).base(left).base(right))?;
                rights.push(right);
            }
            Ok(bottom)
        })
        .unwrap();
    let target = rights[0];

    bench.iter(|| {
        let caught = rt
            .run_module(|rt| {
                rt.try_block(|rt| raise_nested(rt, bottom, frames))
                    .except([ExcType::KeyError, ExcType::OSError], |_, _| Ok(0))
                    .except([ExcType::ArithmeticError], |_, _| Ok(1))
                    .except([target], |_, exc| Ok(exc.instance_id()))
                    .finally(|_| Ok(()))
                    .run()
            })
            .unwrap();
        black_box(caught);
    });
}

fn raise_nested(
    rt: &mut Runtime<'_, NoLimitTracker, NoPrint, NoopTracer>,
    class: ClassId,
    frames: usize,
) -> RunResult<u64> {
    if frames == 0 {
        rt.raise_new(class, vec!["bench".into()])
    } else {
        rt.call("nested", |rt| raise_nested(rt, class, frames - 1))
    }
}

/// Configures the linearization and dispatch benchmark group.
fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("linearize_diamond_chain_10", |b| bench_linearize(b, 10));
    c.bench_function("linearize_diamond_chain_100", |b| bench_linearize(b, 100));
    c.bench_function("dispatch_depth_1", |b| bench_dispatch(b, 1));
    c.bench_function("dispatch_depth_50", |b| bench_dispatch(b, 50));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
