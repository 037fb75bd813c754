//! Registry of method descriptors, keyed by method name.
//!
//! A registry is built once per declared client, typically inside a
//! `LazyLock`, and only read afterwards.

use std::collections::HashMap;

use crate::{DescriptorBuilder, Error, MethodDescriptor, Result};

/// Descriptors of every method of a declared client.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    methods: HashMap<String, MethodDescriptor>,
}

impl Registry {
    /// Start registering methods.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// The descriptor registered for `method`.
    pub fn get(&self, method: &str) -> Result<&MethodDescriptor> {
        self.methods
            .get(method)
            .ok_or_else(|| Error::UnknownMethod(method.to_string()))
    }

    /// Returns `true` if `method` is registered.
    #[must_use]
    pub fn contains(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    /// Number of registered methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Registered descriptors, in no particular order.
    pub fn descriptors(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods.values()
    }
}

/// Builder for a [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    methods: HashMap<String, MethodDescriptor>,
}

impl RegistryBuilder {
    /// Finalize a method's annotations and register them.
    pub fn register(self, method: DescriptorBuilder) -> Result<Self> {
        self.register_descriptor(method.build()?)
    }

    /// Register an already-built descriptor.
    pub fn register_descriptor(mut self, descriptor: MethodDescriptor) -> Result<Self> {
        let name = descriptor.name().to_string();
        if self.methods.contains_key(&name) {
            return Err(Error::DuplicateMethod(name));
        }
        tracing::trace!(method = %name, verb = %descriptor.method(), path = %descriptor.path(), "registered method");
        self.methods.insert(name, descriptor);
        Ok(self)
    }

    /// Freeze the registry.
    #[must_use]
    pub fn build(self) -> Registry {
        Registry {
            methods: self.methods,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;
    use crate::{Method, path_param};

    fn users() -> Registry {
        Registry::builder()
            .register(
                DescriptorBuilder::new("get_user", Method::Get, "/users/{id}")
                    .param(0, path_param("id")),
            )
            .and_then(|b| b.register(DescriptorBuilder::new("list_users", Method::Get, "/users")))
            .expect("registry")
            .build()
    }

    #[test]
    fn lookup_by_method_name() {
        let registry = users();
        check!(registry.len() == 2);
        check!(registry.contains("get_user"));

        let descriptor = registry.get("get_user").expect("registered");
        check!(descriptor.path().as_str() == "/users/{id}");
    }

    #[test]
    fn unknown_method() {
        let registry = users();
        let_assert!(Err(Error::UnknownMethod(name)) = registry.get("delete_user"));
        check!(name == "delete_user");
    }

    #[test]
    fn duplicate_method_is_rejected() {
        let result = Registry::builder()
            .register(DescriptorBuilder::new("ping", Method::Get, "/ping"))
            .and_then(|b| b.register(DescriptorBuilder::new("ping", Method::Head, "/ping")));
        let_assert!(Err(Error::DuplicateMethod(name)) = result);
        check!(name == "ping");
    }

    #[test]
    fn empty_registry() {
        let registry = Registry::builder().build();
        check!(registry.is_empty());
        check!(registry.descriptors().count() == 0);
    }
}
