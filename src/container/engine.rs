//! Resolution engine: turns definitions into cached instances.
//!
//! `resolve`, `construct`, `build` and `resolve_arguments` recurse once per
//! service reference. Logging and observer calls live in separate helpers so
//! those recursive frames stay small.

use std::time::Instant;

use crate::class::{Arguments, ClassDescriptor, Instance, Resolved};
use crate::definition::{MethodCall, ServiceDefinition};
use crate::error::{DiError, DiResult};
use crate::internal::StackGuard;
use crate::reference::Argument;

use super::ContainerInner;

impl ContainerInner {
    /// Returns the cached instance for `name`, constructing it first if
    /// needed.
    ///
    /// Construction is serialized by a re-entrant lock: a thread that misses
    /// the cache takes the lock, looks again, and only then builds. Nested
    /// service references re-enter on the same thread.
    pub(crate) fn resolve(&self, name: &str) -> DiResult<Instance> {
        let definition = self
            .registry
            .definition(name)
            .ok_or_else(|| DiError::ServiceNotFound(name.to_string()))?;

        if let Some(instance) = self.cache_hit(name, "cache hit") {
            return Ok(instance);
        }

        let _build = self.build_lock.lock();
        if let Some(instance) = self.cache_hit(name, "built by another caller") {
            return Ok(instance);
        }

        let instance = self.construct(name, definition)?;
        Ok(self.registry.store(name, instance))
    }

    fn cache_hit(&self, name: &str, message: &'static str) -> Option<Instance> {
        let instance = self.registry.cached(name)?;
        tracing::trace!(service = name, "{}", message);
        self.observers.cache_hit(name);
        Some(instance)
    }

    fn construct(&self, name: &str, definition: &ServiceDefinition) -> DiResult<Instance> {
        let class = definition
            .class()
            .ok_or_else(|| DiError::MalformedEntry(name.to_string()))?;
        let descriptor = self
            .classes
            .get(class)
            .ok_or_else(|| DiError::ClassNotFound {
                service: name.to_string(),
                class: class.to_string(),
            })?;

        // Popped on every exit path, including unwinding out of a constructor.
        let _guard = StackGuard::enter(self.id, name)?;

        let started = self.starting(name, class);
        let outcome = self.build(name, definition, descriptor);
        self.finished(name, class, started, &outcome);
        outcome
    }

    fn starting(&self, name: &str, class: &str) -> Instant {
        tracing::debug!(service = name, class, "constructing service");
        self.observers.resolving(name);
        Instant::now()
    }

    fn finished(&self, name: &str, class: &str, started: Instant, outcome: &DiResult<Instance>) {
        match outcome {
            Ok(_) => {
                let elapsed = started.elapsed();
                tracing::debug!(service = name, class, ?elapsed, "constructed service");
                self.observers.resolved(name, elapsed);
            }
            Err(error) => {
                tracing::debug!(service = name, class, %error, "service construction failed");
                self.observers.failed(name, error);
            }
        }
    }

    fn build(
        &self,
        name: &str,
        definition: &ServiceDefinition,
        descriptor: &ClassDescriptor,
    ) -> DiResult<Instance> {
        let arguments = self.resolve_arguments(name, &definition.arguments)?;
        let instance = descriptor.construct(&arguments)?;
        self.initialize(name, descriptor, &instance, &definition.calls)?;
        Ok(instance)
    }

    /// Runs the definition's method calls in order on a fresh instance.
    fn initialize(
        &self,
        name: &str,
        descriptor: &ClassDescriptor,
        instance: &Instance,
        calls: &[MethodCall],
    ) -> DiResult<()> {
        for (index, call) in calls.iter().enumerate() {
            let method_name = call.method().ok_or_else(|| DiError::MalformedCall {
                service: name.to_string(),
                index,
            })?;
            let method = descriptor
                .method(method_name)
                .ok_or_else(|| DiError::UncallableMethod {
                    service: name.to_string(),
                    method: method_name.to_string(),
                })?;

            let arguments = self.resolve_arguments(name, &call.arguments)?;
            tracing::trace!(service = name, method = method_name, "invoking method");
            method(instance, &arguments)?;
        }
        Ok(())
    }

    // A plain loop: iterator adapters would add several frames per level in
    // unoptimized builds.
    fn resolve_arguments(&self, name: &str, arguments: &[Argument]) -> DiResult<Arguments> {
        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            let value = match argument {
                Argument::Service(reference) => Resolved::Service(self.resolve(reference.name())?),
                Argument::Parameter(reference) => {
                    Resolved::Value(self.parameters.get(reference.path())?.clone())
                }
                Argument::Literal(value) => Resolved::Value(value.clone()),
            };
            values.push(value);
        }

        Ok(Arguments::new(name, values))
    }
}
