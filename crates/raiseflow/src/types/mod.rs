pub(crate) mod class;

pub use class::{
    Attr, ClassDef, ClassId, ClassObject, ClassRegistry, MethodCall, NativeMethod, OBJECT_CLASS_ID, c3_merge,
};
