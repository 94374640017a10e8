//! Builder collecting definitions, parameters, classes and observers.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::class::ClassRegistry;
use crate::container::Container;
use crate::definition::ServiceDefinition;
use crate::observer::{ContainerObserver, Observers};
use crate::parameters::ParameterStore;
use crate::value::Value;

/// Collects everything a [`Container`] needs, then builds it.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Argument, ContainerBuilder, MethodCall, ServiceDefinition, Value};
/// use std::sync::atomic::{AtomicI64, Ordering};
///
/// struct Pool {
///     size: AtomicI64,
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder
///     .parameter("pool", Value::map([("size", 8)]))
///     .service(
///         "pool",
///         ServiceDefinition::new("Pool")
///             .with_call(MethodCall::new("resize").with_argument(Argument::parameter("pool.size"))),
///     );
/// builder
///     .classes_mut()
///     .register("Pool", |_| Ok(Pool { size: AtomicI64::new(1) }))
///     .method("resize", |pool: &Pool, args| {
///         pool.size.store(args.i64(0)?, Ordering::SeqCst);
///         Ok(())
///     });
///
/// let container = builder.build();
/// let pool = container.get_as::<Pool>("pool").unwrap();
/// assert_eq!(pool.size.load(Ordering::SeqCst), 8);
/// ```
#[derive(Default)]
pub struct ContainerBuilder {
    definitions: HashMap<String, ServiceDefinition>,
    parameters: BTreeMap<String, Value>,
    classes: ClassRegistry,
    observers: Observers,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a service definition.
    pub fn service(&mut self, name: impl Into<String>, definition: ServiceDefinition) -> &mut Self {
        self.definitions.insert(name.into(), definition);
        self
    }

    pub fn services<I>(&mut self, definitions: I) -> &mut Self
    where
        I: IntoIterator<Item = (String, ServiceDefinition)>,
    {
        self.definitions.extend(definitions);
        self
    }

    /// Adds or replaces a top-level parameter.
    pub fn parameter(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn parameters(&mut self, parameters: BTreeMap<String, Value>) -> &mut Self {
        self.parameters.extend(parameters);
        self
    }

    /// Merges classes into the builder's registry. Same-named classes are
    /// replaced.
    pub fn classes(&mut self, classes: ClassRegistry) -> &mut Self {
        self.classes.merge(classes);
        self
    }

    pub fn classes_mut(&mut self) -> &mut ClassRegistry {
        &mut self.classes
    }

    pub fn observer(&mut self, observer: Arc<dyn ContainerObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    /// Merges definitions and parameters loaded from a configuration file.
    #[cfg(feature = "config")]
    pub fn load(&mut self, config: crate::config::ContainerConfig) -> &mut Self {
        let (definitions, parameters) = config.into_parts();
        self.definitions.extend(definitions);
        self.parameters.extend(parameters);
        self
    }

    pub fn build(self) -> Container {
        Container::from_parts(
            self.definitions,
            ParameterStore::new(self.parameters),
            self.classes,
            self.observers,
        )
    }
}
