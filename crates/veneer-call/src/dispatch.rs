//! Generic call-time dispatch over a synthesized surface.
//!
//! One polymorphic forwarding layer serves every generated class: a
//! [`BoundObject`] pairs a class-tagged opaque handle with the surface
//! table, resolves method, property, and iterator names to their backing
//! foreign functions, and forwards through the adapter with the receiver
//! handle inserted at position 0.

use veneer_model::FunctionDecl;
use veneer_surface::{ClassSurface, IteratorEntry, Surface};

use crate::adapter::{check_signature, ForeignCallAdapter};
use crate::error::{CallError, Result};
use crate::value::{Handle, Value};

/// A synthesized surface paired with the adapter that executes its calls.
///
/// Safe for concurrent read-only use once built.
#[derive(Debug)]
pub struct ApiSurface<A> {
    surface: Surface,
    adapter: A,
}

impl<A: ForeignCallAdapter> ApiSurface<A> {
    pub fn new(surface: Surface, adapter: A) -> Self {
        ApiSurface { surface, adapter }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Wrap a raw handle as an object of the named class.
    ///
    /// This is the only way in: handle wrapping is an explicit, auditable
    /// conversion, never implicit.
    pub fn bind(&self, class: &str, handle: Handle) -> Result<BoundObject<'_, A>> {
        let class = self.surface.class(class).ok_or_else(|| CallError::UnknownClass {
            name: class.to_string(),
        })?;
        Ok(BoundObject {
            api: self,
            class,
            handle,
        })
    }

    /// Call a function from the global namespace.
    pub fn call_global(&self, name: &str, args: &[Value]) -> Result<Value> {
        let entry = self.surface.global(name).ok_or_else(|| CallError::UnknownFunction {
            name: name.to_string(),
        })?;
        check_signature(&entry.backing, args)?;
        self.adapter.invoke(&entry.backing.name, args)
    }

    /// Call a handle-returning global function and wrap the result.
    ///
    /// The null sentinel wraps to `None`.
    pub fn global_object(&self, name: &str, args: &[Value]) -> Result<Option<BoundObject<'_, A>>> {
        let entry = self.surface.global(name).ok_or_else(|| CallError::UnknownFunction {
            name: name.to_string(),
        })?;
        check_signature(&entry.backing, args)?;
        let value = self.adapter.invoke(&entry.backing.name, args)?;
        self.wrap_result(&entry.backing, value)
    }

    fn wrap_result(&self, backing: &FunctionDecl, value: Value) -> Result<Option<BoundObject<'_, A>>> {
        let Some(class) = backing.return_type.opaque_name() else {
            return Err(CallError::SignatureMismatch {
                function: backing.name.clone(),
                detail: "function does not return a handle".to_string(),
            });
        };
        let handle = value.as_handle().ok_or_else(|| {
            CallError::Foreign(format!(
                "adapter returned {} for handle-typed result of '{}'",
                value.kind(),
                backing.name
            ))
        })?;
        if handle.is_null() {
            Ok(None)
        } else {
            Ok(Some(self.bind(class, handle)?))
        }
    }
}

/// A class-tagged opaque handle bound to its surface.
#[derive(Debug)]
pub struct BoundObject<'a, A> {
    api: &'a ApiSurface<A>,
    class: &'a ClassSurface,
    handle: Handle,
}

impl<'a, A> Clone for BoundObject<'a, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, A> Copy for BoundObject<'a, A> {}

impl<'a, A: ForeignCallAdapter> BoundObject<'a, A> {
    pub fn class_name(&self) -> &str {
        &self.class.owner_type
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    pub fn is_null(&self) -> bool {
        self.handle.is_null()
    }

    fn invoke_with_receiver(&self, backing: &FunctionDecl, exposed: &str, args: &[Value]) -> Result<Value> {
        if self.handle.is_null() {
            return Err(CallError::NullReceiver {
                class: self.class.owner_type.clone(),
                method: exposed.to_string(),
            });
        }
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push(Value::Handle(self.handle));
        full.extend_from_slice(args);
        check_signature(backing, &full)?;
        self.api.adapter.invoke(&backing.name, &full)
    }

    /// Call a method; the receiver handle goes in at position 0 and the
    /// given arguments forward positionally after it.
    pub fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
        let entry = self.class.method(method).ok_or_else(|| CallError::UnknownMethod {
            class: self.class.owner_type.clone(),
            method: method.to_string(),
        })?;
        self.invoke_with_receiver(&entry.backing, method, args)
    }

    /// Call a handle-returning method and wrap the result; the null
    /// sentinel wraps to `None`.
    pub fn call_object(&self, method: &str, args: &[Value]) -> Result<Option<BoundObject<'a, A>>> {
        let entry = self.class.method(method).ok_or_else(|| CallError::UnknownMethod {
            class: self.class.owner_type.clone(),
            method: method.to_string(),
        })?;
        let value = self.invoke_with_receiver(&entry.backing, method, args)?;
        self.api.wrap_result(&entry.backing, value)
    }

    /// Read a property.
    pub fn get(&self, property: &str) -> Result<Value> {
        let entry = self.class.property(property).ok_or_else(|| CallError::UnknownProperty {
            class: self.class.owner_type.clone(),
            property: property.to_string(),
        })?;
        let getter = entry.getter.as_ref().ok_or_else(|| CallError::PropertyNotReadable {
            class: self.class.owner_type.clone(),
            property: property.to_string(),
        })?;
        self.invoke_with_receiver(getter, property, &[])
    }

    /// Write a property.
    pub fn set(&self, property: &str, value: Value) -> Result<()> {
        let entry = self.class.property(property).ok_or_else(|| CallError::UnknownProperty {
            class: self.class.owner_type.clone(),
            property: property.to_string(),
        })?;
        let setter = entry.setter.as_ref().ok_or_else(|| CallError::PropertyNotWritable {
            class: self.class.owner_type.clone(),
            property: property.to_string(),
        })?;
        self.invoke_with_receiver(setter, property, std::slice::from_ref(&value))?;
        Ok(())
    }

    /// Start a sibling iteration.
    ///
    /// Each call restarts the sequence: the first step runs against this
    /// receiver again, then the next step walks element to element until
    /// the null sentinel. One cursor must not be advanced concurrently;
    /// independent cursors are independent.
    pub fn iter(&self, name: &str) -> Result<HandleIter<'a, A>> {
        let entry = self.class.iterator(name).ok_or_else(|| CallError::UnknownIterator {
            class: self.class.owner_type.clone(),
            name: name.to_string(),
        })?;
        Ok(HandleIter {
            api: self.api,
            entry,
            receiver: self.handle,
            current: None,
            done: false,
        })
    }
}

/// A lazy, finite cursor over a sibling chain.
#[derive(Debug)]
pub struct HandleIter<'a, A> {
    api: &'a ApiSurface<A>,
    entry: &'a IteratorEntry,
    receiver: Handle,
    current: Option<Handle>,
    done: bool,
}

impl<'a, A: ForeignCallAdapter> Iterator for HandleIter<'a, A> {
    type Item = Result<BoundObject<'a, A>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let (step, arg) = match self.current {
            None => (&self.entry.first_step, self.receiver),
            Some(previous) => (&self.entry.next_step, previous),
        };

        let args = [Value::Handle(arg)];
        if let Err(err) = check_signature(step, &args) {
            self.done = true;
            return Some(Err(err));
        }
        let value = match self.api.adapter.invoke(&step.name, &args) {
            Ok(value) => value,
            Err(err) => {
                self.done = true;
                return Some(Err(err));
            }
        };
        let handle = match value.as_handle() {
            Some(handle) => handle,
            None => {
                self.done = true;
                return Some(Err(CallError::Foreign(format!(
                    "iterator step '{}' returned {} instead of a handle",
                    step.name,
                    value.kind()
                ))));
            }
        };
        if handle.is_null() {
            self.done = true;
            return None;
        }
        self.current = Some(handle);

        let class = match step.return_type.opaque_name() {
            Some(class) => class,
            None => {
                self.done = true;
                return Some(Err(CallError::Foreign(format!(
                    "iterator step '{}' does not return a handle type",
                    step.name
                ))));
            }
        };
        match self.api.bind(class, handle) {
            Ok(object) => Some(Ok(object)),
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
