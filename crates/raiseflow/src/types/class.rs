use std::{borrow::Cow, fmt, rc::Rc};

use ahash::{AHashMap, AHashSet};
use indexmap::IndexMap;
use smallvec::{SmallVec, smallvec};
use strum::IntoEnumIterator;

use crate::{
    exception_private::{ExcType, RunError, RunResult, SimpleException},
    io::PrintWriter,
    object::Object,
    resource::{MAX_INHERITANCE_DEPTH, MAX_MRO_LENGTH},
};

/// Handle of a class inside a [`ClassRegistry`].
///
/// Uses `u32` to keep handles small; ids are assigned in registration order, so a class
/// can only ever name classes with smaller ids as its bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct ClassId(u32);

impl ClassId {
    #[inline]
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index value.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// `object`, the implicit base of every class.
pub const OBJECT_CLASS_ID: ClassId = ClassId(0);

/// Context handed to a native method when it is invoked on an exception instance.
pub struct MethodCall<'c> {
    /// The instance the method was looked up on (`self`).
    pub instance: &'c SimpleException,
    /// The class in the instance's MRO that provided the method.
    pub defining_class: ClassId,
    pub registry: &'c ClassRegistry,
    print: &'c mut dyn PrintWriter,
}

impl<'c> MethodCall<'c> {
    pub(crate) fn new(
        instance: &'c SimpleException,
        defining_class: ClassId,
        registry: &'c ClassRegistry,
        print: &'c mut dyn PrintWriter,
    ) -> Self {
        Self {
            instance,
            defining_class,
            registry,
            print,
        }
    }

    /// Writes `text` followed by a newline, like `print(text)`.
    pub fn print_line(&mut self, text: impl fmt::Display) -> RunResult<()> {
        self.print.stdout_write(Cow::Owned(text.to_string()))?;
        self.print.stdout_push('\n')
    }

    /// Name of the class that provided the method.
    #[must_use]
    pub fn defining_class_name(&self) -> &str {
        self.registry.get(self.defining_class).map_or("?", ClassObject::name)
    }
}

type MethodFn = dyn Fn(&mut MethodCall<'_>) -> RunResult<Object>;

/// A behavior defined natively on a class.
#[derive(Clone)]
pub struct NativeMethod(Rc<MethodFn>);

impl NativeMethod {
    pub fn new(f: impl Fn(&mut MethodCall<'_>) -> RunResult<Object> + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub(crate) fn invoke(&self, call: &mut MethodCall<'_>) -> RunResult<Object> {
        (self.0)(call)
    }
}

impl fmt::Debug for NativeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<native method>")
    }
}

/// Entry of a class namespace.
#[derive(Debug, Clone)]
pub enum Attr {
    Value(Object),
    Method(NativeMethod),
}

/// Declaration of a user class, consumed by [`ClassRegistry::define_class`].
///
/// Bases are kept in declaration order; that order is the local precedence the
/// linearization has to respect.
#[derive(Debug, Clone)]
pub struct ClassDef {
    name: String,
    bases: SmallVec<[ClassId; 2]>,
    namespace: IndexMap<String, Attr>,
}

impl ClassDef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: SmallVec::new(),
            namespace: IndexMap::new(),
        }
    }

    /// Appends a direct base class.
    #[must_use]
    pub fn base(mut self, base: impl Into<ClassId>) -> Self {
        self.bases.push(base.into());
        self
    }

    /// Defines a class attribute holding a plain value.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Object>) -> Self {
        self.namespace.insert(name.into(), Attr::Value(value.into()));
        self
    }

    /// Defines a method. Redefining a name replaces the previous entry.
    #[must_use]
    pub fn method(
        mut self,
        name: impl Into<String>,
        f: impl Fn(&mut MethodCall<'_>) -> RunResult<Object> + 'static,
    ) -> Self {
        self.namespace.insert(name.into(), Attr::Method(NativeMethod::new(f)));
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A registered class: its bases, its cached linearization and its namespace.
#[derive(Debug)]
pub struct ClassObject {
    id: ClassId,
    name: String,
    module: String,
    /// Direct base classes in declaration order (`[object]` when none were declared).
    bases: SmallVec<[ClassId; 2]>,
    /// Method Resolution Order computed by C3 linearization, self first.
    mro: Vec<ClassId>,
    /// Every class in `mro`, for constant-time subclass checks.
    ancestors: AHashSet<ClassId>,
    namespace: IndexMap<String, Attr>,
    /// Set for `object`-derived builtin exception classes.
    builtin: Option<ExcType>,
    /// Direct subclasses in registration order.
    subclasses: Vec<ClassId>,
}

impl ClassObject {
    #[must_use]
    pub fn id(&self) -> ClassId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Module the class was defined in: `builtins` for builtins.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    #[must_use]
    pub fn bases(&self) -> &[ClassId] {
        &self.bases
    }

    /// Returns the full MRO, including self as the first element.
    #[must_use]
    pub fn mro(&self) -> &[ClassId] {
        &self.mro
    }

    #[must_use]
    pub fn namespace(&self) -> &IndexMap<String, Attr> {
        &self.namespace
    }

    #[must_use]
    pub fn builtin(&self) -> Option<ExcType> {
        self.builtin
    }

    #[must_use]
    pub fn subclasses(&self) -> &[ClassId] {
        &self.subclasses
    }

    /// Checks whether this class is `other` or inherits from it.
    #[must_use]
    pub fn is_subclass_of(&self, other: ClassId) -> bool {
        self.ancestors.contains(&other)
    }

    /// `module.name` for user classes, the bare name for builtins.
    #[must_use]
    pub fn qualname(&self) -> Cow<'_, str> {
        if self.module == "builtins" {
            Cow::Borrowed(&self.name)
        } else {
            Cow::Owned(format!("{}.{}", self.module, self.name))
        }
    }
}

/// Every class known to a runtime: `object`, the builtin exception hierarchy and user classes.
///
/// Builtins are seeded on construction in `ExcType` declaration order, so
/// `ExcType::class_id` is valid for every registry. Names map to the most recent class
/// registered under them; a user class may shadow a builtin name without affecting the
/// builtin's handle.
#[derive(Debug)]
pub struct ClassRegistry {
    classes: Vec<ClassObject>,
    names: AHashMap<String, ClassId>,
    module_name: String,
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRegistry {
    /// Creates a registry whose user classes live in the `__main__` module.
    #[must_use]
    pub fn new() -> Self {
        Self::with_module("__main__")
    }

    #[must_use]
    pub fn with_module(module_name: impl Into<String>) -> Self {
        let mut registry = Self {
            classes: Vec::with_capacity(ExcType::iter().len() + 1),
            names: AHashMap::new(),
            module_name: module_name.into(),
        };
        registry.push_class(ClassObject {
            id: OBJECT_CLASS_ID,
            name: "object".to_owned(),
            module: "builtins".to_owned(),
            bases: SmallVec::new(),
            mro: vec![OBJECT_CLASS_ID],
            ancestors: AHashSet::from_iter([OBJECT_CLASS_ID]),
            namespace: IndexMap::new(),
            builtin: None,
            subclasses: Vec::new(),
        });
        for exc_type in ExcType::iter() {
            registry.insert_builtin(exc_type);
        }
        for (alias, exc_type) in ExcType::ALIASES {
            registry.names.insert(alias.to_owned(), exc_type.class_id());
        }
        registry
    }

    /// Registers a builtin exception class; its parent must already be registered.
    fn insert_builtin(&mut self, exc_type: ExcType) {
        let id = exc_type.class_id();
        debug_assert_eq!(id.index(), self.classes.len(), "builtins must be seeded in declaration order");
        let parent = exc_type.parent().map_or(OBJECT_CLASS_ID, ExcType::class_id);
        let mut mro = vec![id];
        mro.extend_from_slice(&self.classes[parent.index()].mro);
        self.push_class(ClassObject {
            id,
            name: exc_type.to_string(),
            module: "builtins".to_owned(),
            bases: smallvec![parent],
            ancestors: mro.iter().copied().collect(),
            mro,
            namespace: IndexMap::new(),
            builtin: Some(exc_type),
            subclasses: Vec::new(),
        });
    }

    fn push_class(&mut self, class: ClassObject) {
        let id = class.id;
        for base in &class.bases {
            if let Some(base_class) = self.classes.get_mut(base.index()) {
                base_class.subclasses.push(id);
            }
        }
        self.names.insert(class.name.clone(), id);
        self.classes.push(class);
    }

    /// Number of registered classes, builtins included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Always false: `object` and the builtins are registered on construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    #[must_use]
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    #[must_use]
    pub fn get(&self, id: ClassId) -> Option<&ClassObject> {
        self.classes.get(id.index())
    }

    /// Looks a class up by name; the most recently registered class with that name wins.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.names.get(name).copied()
    }

    /// Registers a user class, computing and caching its linearization.
    pub fn define_class(&mut self, def: ClassDef) -> RunResult<ClassId> {
        self.define_class_limited(def, MAX_MRO_LENGTH)
    }

    /// Registers a user class, rejecting linearizations longer than `max_mro_length`.
    ///
    /// Nothing is registered when linearization fails.
    pub fn define_class_limited(&mut self, def: ClassDef, max_mro_length: usize) -> RunResult<ClassId> {
        let index = u32::try_from(self.classes.len()).map_err(|_| RunError::internal("class registry is full"))?;
        let id = ClassId::new(index);
        let mro = compute_c3_mro(id, &def.bases, self, max_mro_length)?;
        let bases = if def.bases.is_empty() {
            smallvec![OBJECT_CLASS_ID]
        } else {
            def.bases
        };
        self.push_class(ClassObject {
            id,
            name: def.name,
            module: self.module_name.clone(),
            bases,
            ancestors: mro.iter().copied().collect(),
            mro,
            namespace: def.namespace,
            builtin: None,
            subclasses: Vec::new(),
        });
        Ok(id)
    }

    /// `issubclass(child, parent)`, answered from the cached ancestor set.
    #[must_use]
    pub fn is_subclass(&self, child: ClassId, parent: ClassId) -> bool {
        self.get(child).is_some_and(|class| class.is_subclass_of(parent))
    }

    /// Whether instances of `class` can be raised and caught.
    #[must_use]
    pub fn is_exception_class(&self, class: ClassId) -> bool {
        self.is_subclass(class, ExcType::BaseException.class_id())
    }

    /// Creates an instance of an exception class with the given arguments.
    ///
    /// Fails with `TypeError` when `class` is unknown or does not derive from `BaseException`.
    pub fn instantiate(&self, class: ClassId, args: Vec<Object>) -> RunResult<SimpleException> {
        let Some(class_obj) = self.get(class).filter(|c| c.is_subclass_of(ExcType::BaseException.class_id())) else {
            return Err(ExcType::raise_invalid_type_error());
        };
        let exc_type = class_obj
            .mro
            .iter()
            .find_map(|&id| self.get(id).and_then(ClassObject::builtin))
            .unwrap_or(ExcType::BaseException);
        Ok(SimpleException::from_class(class_obj, exc_type, self.mro_names(class), args))
    }

    /// Names of the classes in the MRO of `class`, self first.
    #[must_use]
    pub fn mro_names(&self, class: ClassId) -> Vec<String> {
        self.get(class)
            .map(|c| {
                c.mro
                    .iter()
                    .filter_map(|&id| self.get(id).map(|m| m.name.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Finds the first class in the MRO of `class` whose namespace defines `name`.
    #[must_use]
    pub fn lookup_attr(&self, class: ClassId, name: &str) -> Option<(ClassId, &Attr)> {
        let class_obj = self.get(class)?;
        self.scan_mro(&class_obj.mro, name)
    }

    /// `super()`-style lookup: scans the MRO of `class` starting after `after`.
    ///
    /// Fails with `TypeError` when `after` is not in the MRO of `class`.
    pub fn lookup_attr_after(&self, class: ClassId, after: ClassId, name: &str) -> RunResult<Option<(ClassId, &Attr)>> {
        let class_obj = self.get(class).ok_or_else(|| ExcType::type_error("super() argument 1 must be a type"))?;
        let Some(position) = class_obj.mro.iter().position(|&id| id == after) else {
            return Err(ExcType::type_error(
                "super(type, obj): obj must be an instance or subtype of type",
            ));
        };
        Ok(self.scan_mro(&class_obj.mro[position + 1..], name))
    }

    fn scan_mro<'r>(&'r self, mro: &[ClassId], name: &str) -> Option<(ClassId, &'r Attr)> {
        mro.iter()
            .find_map(|&id| self.get(id)?.namespace.get(name).map(|attr| (id, attr)))
    }

    /// `repr()` of a class object, e.g. `<class 'Exception'>` or `<class '__main__.TestError'>`.
    #[must_use]
    pub fn class_repr(&self, class: ClassId) -> String {
        match self.get(class) {
            Some(class_obj) => format!("<class '{}'>", class_obj.qualname()),
            None => "<class '?'>".to_owned(),
        }
    }

    /// `repr()` of the MRO of `class` rendered as a list, like `C.mro()`.
    #[must_use]
    pub fn mro_repr(&self, class: ClassId) -> String {
        let items: Vec<String> = self
            .get(class)
            .map(|c| c.mro.iter().map(|&id| self.class_repr(id)).collect())
            .unwrap_or_default();
        format!("[{}]", items.join(", "))
    }

    /// Renders `root` and its subclasses as an ASCII tree in the style of the Python docs:
    ///
    /// ```text
    /// BaseException
    ///  +-- SystemExit
    ///  +-- Exception
    ///       +-- ArithmeticError
    ///       |    +-- ZeroDivisionError
    /// ```
    #[must_use]
    pub fn render_tree(&self, root: ClassId) -> String {
        let mut out = String::new();
        if let Some(class) = self.get(root) {
            out.push_str(&class.name);
            self.render_children(class, "", &mut out);
        }
        out
    }

    fn render_children(&self, class: &ClassObject, prefix: &str, out: &mut String) {
        let count = class.subclasses.len();
        for (i, &child_id) in class.subclasses.iter().enumerate() {
            let Some(child) = self.get(child_id) else {
                continue;
            };
            out.push('\n');
            out.push_str(prefix);
            out.push_str(" +-- ");
            out.push_str(&child.name);
            let extension = if i + 1 == count { "     " } else { " |   " };
            self.render_children(child, &format!("{prefix}{extension}"), out);
        }
    }
}

// ============================================================================
// C3 Linearization
// ============================================================================

/// Merges linearizations the C3 way.
///
/// Repeatedly takes the first head (scanning the sequences in order) that does not appear
/// in the tail of any sequence, removes it from the front of every sequence that starts
/// with it, and appends it to the result. Returns `None` when no such head exists while
/// sequences remain, i.e. the precedence constraints conflict.
#[must_use]
pub fn c3_merge<T: Copy + Eq>(mut sequences: Vec<Vec<T>>) -> Option<Vec<T>> {
    let mut result = Vec::new();
    loop {
        sequences.retain(|s| !s.is_empty());
        if sequences.is_empty() {
            return Some(result);
        }

        // a good head does not appear in the tail of any list
        let next = sequences
            .iter()
            .map(|s| s[0])
            .find(|candidate| !sequences.iter().any(|other| other[1..].contains(candidate)))?;

        result.push(next);
        for seq in &mut sequences {
            if seq[0] == next {
                seq.remove(0);
            }
        }
    }
}

/// Computes the C3 linearization (MRO) for a class with the given base classes.
///
/// The MROs of all bases are merged together with the list of bases itself, which
/// guarantees local precedence and monotonicity. This is the same algorithm used by
/// CPython since Python 2.3.
///
/// # Arguments
/// * `self_id` - id the new class will be registered under
/// * `bases` - direct base classes in declaration order
/// * `registry` - registry holding the bases
/// * `max_mro_length` - longest accepted result
///
/// # Returns
/// The full MRO starting with `self_id`, or a `TypeError` if the hierarchy is
/// inconsistent (would produce an ambiguous ordering).
pub(crate) fn compute_c3_mro(
    self_id: ClassId,
    bases: &[ClassId],
    registry: &ClassRegistry,
    max_mro_length: usize,
) -> RunResult<Vec<ClassId>> {
    if bases.is_empty() {
        // No bases - implicit (object,)
        return Ok(vec![self_id, OBJECT_CLASS_ID]);
    }

    let mut linearizations: Vec<Vec<ClassId>> = Vec::with_capacity(bases.len() + 1);
    for (i, &base_id) in bases.iter().enumerate() {
        let Some(base) = registry.get(base_id) else {
            return Err(ExcType::type_error("bases must be classes"));
        };
        if bases[..i].contains(&base_id) {
            return Err(ExcType::type_error(format!("duplicate base class {}", base.name())));
        }
        if base.mro.len() > MAX_INHERITANCE_DEPTH {
            return Err(ExcType::type_error(format!(
                "inheritance chain too deep (maximum depth {MAX_INHERITANCE_DEPTH})"
            )));
        }
        linearizations.push(base.mro.clone());
    }
    // the list of bases itself is merged last
    linearizations.push(bases.to_vec());

    let Some(merged) = c3_merge(linearizations) else {
        let base_names: Vec<&str> = bases
            .iter()
            .filter_map(|&id| registry.get(id).map(ClassObject::name))
            .collect();
        return Err(ExcType::type_error(format!(
            "Cannot create a consistent method resolution order (MRO) for bases {}",
            base_names.join(", ")
        )));
    };

    let mut result = Vec::with_capacity(merged.len() + 1);
    result.push(self_id);
    result.extend(merged);
    if result.len() > max_mro_length {
        return Err(ExcType::type_error("MRO exceeds maximum length"));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(registry: &ClassRegistry, class: ClassId) -> Vec<String> {
        registry.mro_names(class)
    }

    #[test]
    fn c3_merge_interleaves_sequences() {
        let merged = c3_merge(vec![vec!['B', 'A', 'o'], vec!['C', 'A', 'o'], vec!['B', 'C']]);
        assert_eq!(merged, Some(vec!['B', 'C', 'A', 'o']));
    }

    #[test]
    fn c3_merge_detects_conflicts() {
        let merged = c3_merge(vec![vec![1, 2], vec![2, 1], vec![1, 2]]);
        assert_eq!(merged, None);
    }

    #[test]
    fn builtin_ids_follow_declaration_order() {
        let registry = ClassRegistry::new();
        for exc_type in ExcType::iter() {
            let class = registry.get(exc_type.class_id()).expect("builtin registered");
            assert_eq!(class.builtin(), Some(exc_type));
            assert_eq!(class.name(), exc_type.to_string());
        }
        assert_eq!(registry.len(), ExcType::iter().len() + 1);
    }

    #[test]
    fn legacy_aliases_name_os_error() {
        let registry = ClassRegistry::new();
        for (alias, exc_type) in ExcType::ALIASES {
            assert_eq!(alias.parse::<ExcType>(), Ok(exc_type));
            assert_eq!(registry.lookup(alias), Some(ExcType::OSError.class_id()));
        }
        assert_eq!(registry.class_repr(ExcType::OSError.class_id()), "<class 'OSError'>");
    }

    #[test]
    fn builtin_mro_matches_parent_chain() {
        let registry = ClassRegistry::new();
        assert_eq!(
            names(&registry, ExcType::TabError.class_id()),
            [
                "TabError",
                "IndentationError",
                "SyntaxError",
                "Exception",
                "BaseException",
                "object"
            ]
        );
    }

    #[test]
    fn class_without_bases_derives_from_object() {
        let mut registry = ClassRegistry::new();
        let a = registry.define_class(ClassDef::new("A")).unwrap();
        assert_eq!(registry.get(a).unwrap().bases(), [OBJECT_CLASS_ID]);
        assert_eq!(names(&registry, a), ["A", "object"]);
        assert!(!registry.is_exception_class(a));
    }

    #[test]
    fn duplicate_base_is_rejected() {
        let mut registry = ClassRegistry::new();
        let a = registry.define_class(ClassDef::new("A")).unwrap();
        let err = registry.define_class(ClassDef::new("B").base(a).base(a)).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: duplicate base class A");
    }

    #[test]
    fn foreign_base_is_rejected() {
        let mut registry = ClassRegistry::new();
        let err = registry
            .define_class(ClassDef::new("B").base(ClassId::new(9_999)))
            .unwrap_err();
        assert_eq!(err.to_string(), "TypeError: bases must be classes");
    }

    #[test]
    fn failed_definition_registers_nothing() {
        let mut registry = ClassRegistry::new();
        let a = registry.define_class(ClassDef::new("A")).unwrap();
        let b = registry.define_class(ClassDef::new("B")).unwrap();
        let x = registry.define_class(ClassDef::new("X").base(a).base(b)).unwrap();
        let y = registry.define_class(ClassDef::new("Y").base(b).base(a)).unwrap();
        let before = registry.len();
        assert!(registry.define_class(ClassDef::new("Z").base(x).base(y)).is_err());
        assert_eq!(registry.len(), before);
        assert_eq!(registry.lookup("Z"), None);
    }

    #[test]
    fn mro_length_limit_is_enforced() {
        let mut registry = ClassRegistry::new();
        let err = registry
            .define_class_limited(ClassDef::new("Deep").base(ExcType::TabError), 3)
            .unwrap_err();
        assert_eq!(err.to_string(), "TypeError: MRO exceeds maximum length");
    }

    #[test]
    fn super_lookup_skips_up_to_the_given_class() {
        let mut registry = ClassRegistry::new();
        let base = registry
            .define_class(ClassDef::new("Base").attr("kind", "base"))
            .unwrap();
        let child = registry
            .define_class(ClassDef::new("Child").base(base).attr("kind", "child"))
            .unwrap();
        let (owner, _) = registry.lookup_attr(child, "kind").unwrap();
        assert_eq!(owner, child);
        let (owner, _) = registry.lookup_attr_after(child, child, "kind").unwrap().unwrap();
        assert_eq!(owner, base);
        assert!(registry.lookup_attr_after(child, base, "kind").unwrap().is_none());
        assert!(registry.lookup_attr_after(base, child, "kind").is_err());
    }

    #[test]
    fn class_repr_distinguishes_builtins() {
        let mut registry = ClassRegistry::new();
        let custom = registry
            .define_class(ClassDef::new("Custom").base(ExcType::Exception))
            .unwrap();
        assert_eq!(registry.class_repr(ExcType::Exception.class_id()), "<class 'Exception'>");
        assert_eq!(registry.class_repr(custom), "<class '__main__.Custom'>");
        assert_eq!(
            registry.mro_repr(custom),
            "[<class '__main__.Custom'>, <class 'Exception'>, <class 'BaseException'>, <class 'object'>]"
        );
    }

    #[test]
    fn render_tree_uses_doc_layout() {
        let registry = ClassRegistry::new();
        let tree = registry.render_tree(ExcType::ArithmeticError.class_id());
        assert_eq!(
            tree,
            "ArithmeticError\n +-- FloatingPointError\n +-- OverflowError\n +-- ZeroDivisionError"
        );
        let tree = registry.render_tree(ExcType::SyntaxError.class_id());
        assert_eq!(tree, "SyntaxError\n +-- IndentationError\n      +-- TabError");
        let tree = registry.render_tree(ExcType::BaseException.class_id());
        assert!(tree.contains("\n      +-- ArithmeticError\n      |    +-- FloatingPointError"));
    }
}
