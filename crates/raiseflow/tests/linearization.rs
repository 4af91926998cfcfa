/// Tests for C3 linearization of user classes and subclass checks.
use pretty_assertions::assert_eq;
use raiseflow::{ClassDef, ClassId, ClassRegistry, ExcType, OBJECT_CLASS_ID, c3_merge};

fn define(registry: &mut ClassRegistry, name: &str, bases: &[ClassId]) -> ClassId {
    let def = bases.iter().fold(ClassDef::new(name), |def, &base| def.base(base));
    registry.define_class(def).unwrap()
}

/// D(B, C), B(A), C(A) linearizes to [D, B, C, A, object].
#[test]
fn diamond_linearization() {
    let mut registry = ClassRegistry::new();
    let a = define(&mut registry, "A", &[]);
    let b = define(&mut registry, "B", &[a]);
    let c = define(&mut registry, "C", &[a]);
    let d = define(&mut registry, "D", &[b, c]);

    assert_eq!(registry.get(d).unwrap().mro(), [d, b, c, a, OBJECT_CLASS_ID]);
    assert_eq!(registry.mro_names(d), ["D", "B", "C", "A", "object"]);
}

/// X(A, B), Y(B, A), Z(X, Y) has no consistent order.
#[test]
fn conflicting_precedence_fails() {
    let mut registry = ClassRegistry::new();
    let a = define(&mut registry, "A", &[]);
    let b = define(&mut registry, "B", &[]);
    let x = define(&mut registry, "X", &[a, b]);
    let y = define(&mut registry, "Y", &[b, a]);

    for _ in 0..2 {
        let err = registry
            .define_class(ClassDef::new("Z").base(x).base(y))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "TypeError: Cannot create a consistent method resolution order (MRO) for bases X, Y"
        );
    }
}

/// The classic example from the Python 2.3 MRO write-up.
#[test]
fn python_docs_example() {
    let mut registry = ClassRegistry::new();
    let o = OBJECT_CLASS_ID;
    let f = define(&mut registry, "F", &[o]);
    let e = define(&mut registry, "E", &[o]);
    let d = define(&mut registry, "D", &[o]);
    let c = define(&mut registry, "C", &[d, f]);
    let b = define(&mut registry, "B", &[d, e]);
    let a = define(&mut registry, "A", &[b, c]);

    assert_eq!(registry.mro_names(a), ["A", "B", "C", "D", "E", "F", "object"]);
}

/// Every ancestor appears exactly once and every class precedes its own bases.
#[test]
fn linearization_contains_each_ancestor_once() {
    let mut registry = ClassRegistry::new();
    let root = define(&mut registry, "Root", &[ExcType::Exception.class_id()]);
    let mids: Vec<ClassId> = (0..5)
        .map(|i| define(&mut registry, &format!("M{i}"), &[root]))
        .collect();
    let pairs: Vec<ClassId> = mids
        .windows(2)
        .enumerate()
        .map(|(i, pair)| define(&mut registry, &format!("P{i}"), pair))
        .collect();
    let leaf = define(&mut registry, "Leaf", &pairs);
    assert_eq!(
        registry.mro_names(leaf),
        [
            "Leaf",
            "P0",
            "M0",
            "P1",
            "M1",
            "P2",
            "M2",
            "P3",
            "M3",
            "M4",
            "Root",
            "Exception",
            "BaseException",
            "object"
        ]
    );

    let mro = registry.get(leaf).unwrap().mro().to_vec();
    let mut seen = mro.clone();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), mro.len(), "duplicate entry in {:?}", registry.mro_names(leaf));
    assert_eq!(mro.first(), Some(&leaf));
    assert_eq!(mro.last(), Some(&OBJECT_CLASS_ID));

    for (position, &class) in mro.iter().enumerate() {
        for &base in registry.get(class).unwrap().bases() {
            let base_position = mro.iter().position(|&c| c == base).unwrap();
            assert!(base_position > position);
            assert!(registry.is_subclass(leaf, base));
        }
    }
}

/// A subclass keeps the relative order of its bases' linearizations.
#[test]
fn linearization_is_monotonic() {
    let mut registry = ClassRegistry::new();
    let a = define(&mut registry, "A", &[]);
    let b = define(&mut registry, "B", &[a]);
    let c = define(&mut registry, "C", &[a]);
    let d = define(&mut registry, "D", &[b, c]);
    let e = define(&mut registry, "E", &[c]);
    let f = define(&mut registry, "F", &[d, e]);

    let parent = registry.get(d).unwrap().mro().to_vec();
    let child = registry.get(f).unwrap().mro().to_vec();
    let positions: Vec<usize> = parent
        .iter()
        .map(|class| child.iter().position(|c| c == class).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    assert_eq!(registry.mro_names(f), ["F", "D", "B", "E", "C", "A", "object"]);
}

#[test]
fn merge_is_generic() {
    let merged = c3_merge(vec![vec!["B", "A"], vec!["C", "A"], vec!["B", "C"]]).unwrap();
    assert_eq!(merged, ["B", "C", "A"]);
}

/// Builtins: ZeroDivisionError descends from ArithmeticError, KeyboardInterrupt does not
/// descend from Exception.
#[test]
fn builtin_subclass_checks() {
    let registry = ClassRegistry::new();
    assert!(registry.is_subclass(
        ExcType::ZeroDivisionError.class_id(),
        ExcType::ArithmeticError.class_id()
    ));
    assert!(!registry.is_subclass(
        ExcType::KeyboardInterrupt.class_id(),
        ExcType::Exception.class_id()
    ));
    assert!(registry.is_subclass(
        ExcType::KeyboardInterrupt.class_id(),
        ExcType::BaseException.class_id()
    ));
    assert!(ExcType::BrokenPipeError.is_subclass_of(ExcType::OSError));
    assert!(!ExcType::GeneratorExit.is_subclass_of(ExcType::Exception));
}

/// `IOError` and `EnvironmentError` name the same class as `OSError`.
#[test]
fn os_error_aliases() {
    for name in ["OSError", "IOError", "EnvironmentError"] {
        assert_eq!(name.parse::<ExcType>().unwrap(), ExcType::OSError);
    }
    assert_eq!(ExcType::OSError.to_string(), "OSError");
}

/// A user class named like a builtin shadows the name but not the builtin class.
#[test]
fn user_class_shadows_builtin_name() {
    let mut registry = ClassRegistry::new();
    let shadow = define(&mut registry, "SystemError", &[ExcType::Exception.class_id()]);
    assert_eq!(registry.lookup("SystemError"), Some(shadow));
    assert_ne!(shadow, ExcType::SystemError.class_id());
    assert_eq!(registry.class_repr(shadow), "<class '__main__.SystemError'>");
    assert_eq!(
        registry.class_repr(ExcType::SystemError.class_id()),
        "<class 'SystemError'>"
    );
}
