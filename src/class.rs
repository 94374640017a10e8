//! Class registry: the construction primitive behind service definitions.
//!
//! Rust has no lookup of types by name, so every class a definition may
//! mention is registered up front as a constructor closure plus a table of
//! named methods. The resolution engine only ever composes these closures
//! with resolved arguments.

use std::any::{type_name, Any};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::value::Value;

/// Type-erased shared service instance.
pub type Instance = Arc<dyn Any + Send + Sync>;

type Constructor = Arc<dyn Fn(&Arguments) -> DiResult<Instance> + Send + Sync>;
type Method = Arc<dyn Fn(&Instance, &Arguments) -> DiResult<()> + Send + Sync>;

/// Constructor and methods registered under one class name.
pub struct ClassDescriptor {
    name: String,
    type_name: &'static str,
    constructor: Constructor,
    methods: HashMap<String, Method>,
}

impl ClassDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rust type produced by the constructor.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn has_method(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    /// Registered method names, sorted.
    pub fn methods(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub(crate) fn construct(&self, arguments: &Arguments) -> DiResult<Instance> {
        (self.constructor)(arguments)
    }

    pub(crate) fn method(&self, method: &str) -> Option<&Method> {
        self.methods.get(method)
    }
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("methods", &self.methods())
            .finish()
    }
}

/// Map from class name to [`ClassDescriptor`].
///
/// # Examples
///
/// ```rust
/// use ferrous_container::ClassRegistry;
/// use std::sync::atomic::{AtomicI64, Ordering};
///
/// struct Counter {
///     value: AtomicI64,
/// }
///
/// let mut classes = ClassRegistry::new();
/// classes
///     .register("Counter", |args| {
///         Ok(Counter { value: AtomicI64::new(args.i64(0)?) })
///     })
///     .method("add", |counter: &Counter, args| {
///         counter.value.fetch_add(args.i64(0)?, Ordering::SeqCst);
///         Ok(())
///     });
///
/// assert!(classes.contains("Counter"));
/// assert!(classes.has_method("Counter", "add"));
/// assert!(!classes.has_method("Counter", "remove"));
/// ```
#[derive(Default)]
pub struct ClassRegistry {
    classes: HashMap<String, ClassDescriptor>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `class` with a constructor producing `T`.
    ///
    /// Registering the same name twice replaces the earlier class, methods
    /// included.
    pub fn register<T, F>(&mut self, class: impl Into<String>, constructor: F) -> ClassBuilder<'_, T>
    where
        T: Any + Send + Sync,
        F: Fn(&Arguments) -> DiResult<T> + Send + Sync + 'static,
    {
        let name = class.into();
        let descriptor = ClassDescriptor {
            name: name.clone(),
            type_name: type_name::<T>(),
            constructor: Arc::new(move |args: &Arguments| {
                constructor(args).map(|instance| Arc::new(instance) as Instance)
            }),
            methods: HashMap::new(),
        };

        let slot = match self.classes.entry(name) {
            Entry::Occupied(mut occupied) => {
                occupied.insert(descriptor);
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => vacant.insert(descriptor),
        };

        ClassBuilder {
            descriptor: slot,
            _marker: PhantomData,
        }
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    pub fn has_method(&self, class: &str, method: &str) -> bool {
        self.classes
            .get(class)
            .is_some_and(|descriptor| descriptor.has_method(method))
    }

    pub fn get(&self, class: &str) -> Option<&ClassDescriptor> {
        self.classes.get(class)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub(crate) fn merge(&mut self, other: ClassRegistry) {
        self.classes.extend(other.classes);
    }
}

impl fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("classes", &format!("{} classes", self.classes.len()))
            .finish()
    }
}

/// Adds methods to a class just registered with [`ClassRegistry::register`].
pub struct ClassBuilder<'a, T> {
    descriptor: &'a mut ClassDescriptor,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T> ClassBuilder<'a, T>
where
    T: Any + Send + Sync,
{
    /// Registers a method callable from a definition's `calls`.
    ///
    /// Instances are shared, so methods receive `&T`; setters use interior
    /// mutability.
    pub fn method<F>(self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&T, &Arguments) -> DiResult<()> + Send + Sync + 'static,
    {
        let wrapped: Method = Arc::new(move |instance: &Instance, args: &Arguments| {
            let target = instance
                .downcast_ref::<T>()
                .ok_or_else(|| DiError::TypeMismatch {
                    service: args.service().to_string(),
                    expected: type_name::<T>(),
                })?;
            method(target, args)
        });
        self.descriptor.methods.insert(name.into(), wrapped);
        self
    }
}

/// A resolved argument: either a plain value or a service instance.
#[derive(Clone)]
pub enum Resolved {
    Value(Value),
    Service(Instance),
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Resolved::Service(_) => f.write_str("Service(..)"),
        }
    }
}

/// Positional arguments handed to a constructor or method.
///
/// Accessors fail with [`DiError::InvalidArgument`] when the position is
/// missing or holds the wrong kind of argument. Extra arguments are ignored.
#[derive(Debug, Clone)]
pub struct Arguments {
    service: String,
    values: Vec<Resolved>,
}

impl Arguments {
    pub fn new(service: impl Into<String>, values: Vec<Resolved>) -> Self {
        Self {
            service: service.into(),
            values,
        }
    }

    /// Name of the service being built.
    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Resolved> {
        self.values.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resolved> {
        self.values.iter()
    }

    pub fn value(&self, position: usize) -> DiResult<&Value> {
        match self.values.get(position) {
            Some(Resolved::Value(value)) => Ok(value),
            _ => Err(self.invalid(position, "value")),
        }
    }

    pub fn str(&self, position: usize) -> DiResult<&str> {
        self.value(position)
            .ok()
            .and_then(Value::as_str)
            .ok_or_else(|| self.invalid(position, "string"))
    }

    pub fn string(&self, position: usize) -> DiResult<String> {
        self.str(position).map(str::to_string)
    }

    pub fn i64(&self, position: usize) -> DiResult<i64> {
        self.value(position)
            .ok()
            .and_then(Value::as_i64)
            .ok_or_else(|| self.invalid(position, "integer"))
    }

    pub fn f64(&self, position: usize) -> DiResult<f64> {
        self.value(position)
            .ok()
            .and_then(Value::as_f64)
            .ok_or_else(|| self.invalid(position, "float"))
    }

    pub fn bool(&self, position: usize) -> DiResult<bool> {
        self.value(position)
            .ok()
            .and_then(Value::as_bool)
            .ok_or_else(|| self.invalid(position, "bool"))
    }

    /// Downcasts a service argument to its concrete type.
    pub fn instance<T: Any + Send + Sync>(&self, position: usize) -> DiResult<Arc<T>> {
        match self.values.get(position) {
            Some(Resolved::Service(instance)) => instance
                .clone()
                .downcast::<T>()
                .map_err(|_| self.invalid(position, type_name::<T>())),
            _ => Err(self.invalid(position, type_name::<T>())),
        }
    }

    fn invalid(&self, position: usize, expected: &'static str) -> DiError {
        DiError::InvalidArgument {
            service: self.service.clone(),
            position,
            expected,
        }
    }
}
