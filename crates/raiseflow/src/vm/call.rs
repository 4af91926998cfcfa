//! Call frames and attribute dispatch on exception instances.

use super::{Runtime, frame_name};
use crate::{
    exception_private::{ExcType, RunResult, SimpleException},
    io::PrintWriter,
    object::Object,
    resource::ResourceTracker,
    tracer::RaiseTracer,
    types::{Attr, ClassId, MethodCall, NativeMethod},
};

impl<T: ResourceTracker, P: PrintWriter, Tr: RaiseTracer> Runtime<'_, T, P, Tr> {
    /// Runs `body` in a new call frame named `name`.
    ///
    /// Exceeding the recursion limit raises `RecursionError` in the caller's frame.
    /// An error leaving the frame gets the caller's frame appended to its traceback.
    pub fn call<R>(&mut self, name: &str, body: impl FnOnce(&mut Self) -> RunResult<R>) -> RunResult<R> {
        let depth = self.frames.len() + 1;
        if let Err(err) = self.tracker.check_recursion_depth(depth) {
            return Err(self.raise_error(err.into()));
        }
        if let Err(err) = self.tracker.check_time() {
            return Err(self.raise_error(err.into()));
        }

        self.frames.push(name.to_owned());
        self.tracer.on_call(name, depth);
        let result = body(self);
        self.frames.pop();
        self.tracer.on_return(self.frames.len());

        result.map_err(|mut err| {
            err.add_caller_frame(frame_name(&self.frames));
            err
        })
    }

    /// `instance.name`: the builtin `args` tuple, else the first definition along the MRO.
    ///
    /// Methods are returned as their bound-method repr.
    pub fn getattr(&mut self, instance: &SimpleException, name: &str) -> RunResult<Object> {
        if name == "args" {
            return Ok(instance.args_tuple());
        }
        match self.registry.lookup_attr(instance.class_id(), name) {
            Some((_, Attr::Value(value))) => Ok(value.clone()),
            Some((owner, Attr::Method(_))) => {
                let owner_name = self.registry.get(owner).map_or("?", |c| c.name());
                Ok(Object::String(format!(
                    "<bound method {owner_name}.{name} of {}>",
                    instance.py_repr()
                )))
            }
            None => Err(self.raise_error(ExcType::attribute_error(instance.class_name(), name))),
        }
    }

    /// `instance.name()`: resolves `name` along the MRO and invokes it in a new frame.
    pub fn call_method(&mut self, instance: &SimpleException, name: &str) -> RunResult<Object> {
        let resolved = self
            .registry
            .lookup_attr(instance.class_id(), name)
            .map(|(owner, attr)| (owner, attr.clone()));
        self.invoke_resolved(instance, name, resolved)
    }

    /// `super(after, instance).name()`: resolution starts after `after` in the MRO.
    pub fn call_super_method(
        &mut self,
        instance: &SimpleException,
        after: impl Into<ClassId>,
        name: &str,
    ) -> RunResult<Object> {
        let resolved = match self.registry.lookup_attr_after(instance.class_id(), after.into(), name) {
            Ok(found) => found.map(|(owner, attr)| (owner, attr.clone())),
            Err(err) => return Err(self.raise_error(err)),
        };
        self.invoke_resolved(instance, name, resolved)
    }

    fn invoke_resolved(
        &mut self,
        instance: &SimpleException,
        name: &str,
        resolved: Option<(ClassId, Attr)>,
    ) -> RunResult<Object> {
        match resolved {
            Some((owner, Attr::Method(method))) => self.call(name, |rt| rt.invoke_native(instance, owner, &method)),
            Some((_, Attr::Value(value))) => Err(self.raise_error(ExcType::type_error_not_callable(value.type_name()))),
            None => Err(self.raise_error(ExcType::attribute_error(instance.class_name(), name))),
        }
    }

    fn invoke_native(&mut self, instance: &SimpleException, owner: ClassId, method: &NativeMethod) -> RunResult<Object> {
        let result = {
            let mut call = MethodCall::new(instance, owner, &self.registry, &mut *self.print);
            method.invoke(&mut call)
        };
        result.map_err(|err| self.raise_error(err))
    }
}
