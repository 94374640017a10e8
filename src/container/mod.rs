//! Container facade for resolving services and parameters.
//!
//! The [`Container`] type is the public surface; the construction algorithm
//! lives in the private `engine` module.

use std::any::{type_name, Any};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::ReentrantMutex;

use crate::class::{ClassRegistry, Instance};
use crate::definition::ServiceDefinition;
use crate::descriptors::ServiceDescriptor;
use crate::error::{DiError, DiResult};
use crate::observer::Observers;
use crate::parameters::ParameterStore;
use crate::registration::ServiceRegistry;
use crate::validation::{self, ValidationResult};
use crate::value::Value;

mod engine;

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

/// Dependency injection container resolving services by name.
///
/// Services are built lazily on the first [`get`](Container::get), cached,
/// and shared afterwards: every later `get` for the same name returns the
/// same allocation.
///
/// # Thread Safety
///
/// `Container` is `Send + Sync` and clones cheaply (it uses `Arc`
/// internally). Cached lookups take a read lock only. Construction is
/// serialized per container, so concurrent callers asking for the same
/// uncached service see exactly one construction.
///
/// # Examples
///
/// ```
/// use ferrous_container::{Argument, ClassRegistry, Container, ServiceDefinition, Value};
/// use std::collections::{BTreeMap, HashMap};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let mut classes = ClassRegistry::new();
/// classes.register("Database", |args| Ok(Database { url: args.string(0)? }));
/// classes.register("UserService", |args| Ok(UserService { db: args.instance(0)? }));
///
/// let mut services = HashMap::new();
/// services.insert(
///     "db".to_string(),
///     ServiceDefinition::new("Database").with_argument(Argument::parameter("db.url")),
/// );
/// services.insert(
///     "users".to_string(),
///     ServiceDefinition::new("UserService").with_argument(Argument::service("db")),
/// );
///
/// let mut parameters = BTreeMap::new();
/// parameters.insert("db".to_string(), Value::map([("url", "postgres://localhost")]));
///
/// let container = Container::new(services, parameters, classes);
/// let users = container.get_as::<UserService>("users").unwrap();
/// assert_eq!(users.db.url, "postgres://localhost");
///
/// let db = container.get_as::<Database>("db").unwrap();
/// assert!(Arc::ptr_eq(&db, &users.db));
/// ```
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

pub(crate) struct ContainerInner {
    pub(crate) id: u64,
    pub(crate) registry: ServiceRegistry,
    pub(crate) parameters: ParameterStore,
    pub(crate) classes: ClassRegistry,
    pub(crate) observers: Observers,
    pub(crate) build_lock: ReentrantMutex<()>,
}

impl Container {
    /// Creates a container from definitions, a parameter tree and the
    /// classes the definitions may name.
    pub fn new(
        definitions: HashMap<String, ServiceDefinition>,
        parameters: BTreeMap<String, Value>,
        classes: ClassRegistry,
    ) -> Self {
        Self::from_parts(
            definitions,
            ParameterStore::new(parameters),
            classes,
            Observers::default(),
        )
    }

    pub(crate) fn from_parts(
        definitions: HashMap<String, ServiceDefinition>,
        parameters: ParameterStore,
        classes: ClassRegistry,
        observers: Observers,
    ) -> Self {
        let inner = ContainerInner {
            id: NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed),
            registry: ServiceRegistry::new(definitions),
            parameters,
            classes,
            observers,
            build_lock: ReentrantMutex::new(()),
        };
        tracing::debug!(
            container = inner.id,
            services = inner.registry.len(),
            classes = inner.classes.len(),
            "container created"
        );
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Resolves a service by name.
    ///
    /// Fails with [`DiError::ServiceNotFound`] when no definition exists, or
    /// with a container error (see [`DiError::container_kind`]) when the
    /// definition cannot be constructed. A failed construction caches
    /// nothing for `name`.
    pub fn get(&self, name: &str) -> DiResult<Instance> {
        self.inner.resolve(name)
    }

    /// Resolves a service and downcasts it to `T`.
    pub fn get_as<T: Any + Send + Sync>(&self, name: &str) -> DiResult<Arc<T>> {
        self.get(name)?
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch {
                service: name.to_string(),
                expected: type_name::<T>(),
            })
    }

    /// True iff a definition exists for `name`. The cache is not consulted.
    pub fn has(&self, name: &str) -> bool {
        self.inner.registry.contains(name)
    }

    /// Looks up a dotted parameter path. May return a whole sub-tree.
    pub fn get_parameter(&self, path: &str) -> DiResult<&Value> {
        self.inner.parameters.get(path)
    }

    pub fn has_parameter(&self, path: &str) -> bool {
        self.inner.parameters.contains(path)
    }

    /// Defined service names, sorted.
    pub fn service_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.inner.registry.definitions().map(|(name, _)| name).collect();
        names.sort_unstable();
        names
    }

    /// True once `name` has been constructed successfully.
    pub fn is_cached(&self, name: &str) -> bool {
        self.inner.registry.is_cached(name)
    }

    /// Number of services constructed so far.
    pub fn cached_count(&self) -> usize {
        self.inner.registry.cached_count()
    }

    /// Describes every definition, sorted by name.
    pub fn descriptors(&self) -> Vec<ServiceDescriptor> {
        let mut descriptors: Vec<ServiceDescriptor> = self
            .inner
            .registry
            .definitions()
            .map(|(name, definition)| {
                ServiceDescriptor::new(name, definition, self.inner.registry.is_cached(name))
            })
            .collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    /// Checks every definition without constructing anything.
    pub fn validate(&self) -> ValidationResult {
        validation::validate(
            self.inner.registry.definitions(),
            &self.inner.parameters,
            &self.inner.classes,
        )
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("id", &self.inner.id)
            .field("services", &self.inner.registry.len())
            .field("cached", &self.inner.registry.cached_count())
            .field("classes", &self.inner.classes)
            .finish()
    }
}
