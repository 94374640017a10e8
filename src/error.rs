//! Error types for the dependency injection container.

use std::fmt;

/// Dependency injection errors
///
/// Every failure raised while resolving a service or a parameter. Errors are
/// never caught inside the container: the first one aborts the top-level
/// [`Container::get`](crate::Container::get) call and is returned verbatim,
/// carrying the service or parameter name needed to diagnose it.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{ContainerBuilder, DiError};
///
/// let container = ContainerBuilder::new().build();
/// match container.get("mailer") {
///     Err(DiError::ServiceNotFound(name)) => assert_eq!(name, "mailer"),
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use ferrous_container::{ContainerErrorKind, DiError};
///
/// let circular = DiError::Circular(vec!["a".into(), "b".into(), "a".into()]);
/// assert_eq!(circular.to_string(), "Circular reference: a -> b -> a");
/// assert_eq!(circular.container_kind(), Some(ContainerErrorKind::CircularReference));
///
/// let missing = DiError::ParameterNotFound("db.host".into());
/// assert!(!missing.is_container_error());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiError {
    /// No definition exists for the requested service name
    ServiceNotFound(String),
    /// A dotted parameter path has no entry at some segment
    ParameterNotFound(String),
    /// Definition has no `class`
    MalformedEntry(String),
    /// The definition names a class that is not registered
    ClassNotFound { service: String, class: String },
    /// Construction revisited a service still being built (includes path)
    Circular(Vec<String>),
    /// The call at `index` has no `method`
    MalformedCall { service: String, index: usize },
    /// The class has no method with this name
    UncallableMethod { service: String, method: String },
    /// A constructor or method received an argument it cannot use
    InvalidArgument {
        service: String,
        position: usize,
        expected: &'static str,
    },
    /// Instance downcast failed
    TypeMismatch {
        service: String,
        expected: &'static str,
    },
    /// Maximum resolution depth exceeded
    DepthExceeded(usize),
    /// Definitions or parameters could not be loaded
    InvalidConfig(String),
}

/// Classification of the container-level failures.
///
/// Not-found errors and configuration loading errors have no container kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerErrorKind {
    MalformedEntry,
    ClassNotFound,
    CircularReference,
    MalformedCall,
    UncallableMethod,
    InvalidArgument,
    TypeMismatch,
    DepthExceeded,
}

impl DiError {
    /// Returns the container error kind, or `None` for not-found and
    /// configuration errors.
    pub fn container_kind(&self) -> Option<ContainerErrorKind> {
        match self {
            DiError::ServiceNotFound(_)
            | DiError::ParameterNotFound(_)
            | DiError::InvalidConfig(_) => None,
            DiError::MalformedEntry(_) => Some(ContainerErrorKind::MalformedEntry),
            DiError::ClassNotFound { .. } => Some(ContainerErrorKind::ClassNotFound),
            DiError::Circular(_) => Some(ContainerErrorKind::CircularReference),
            DiError::MalformedCall { .. } => Some(ContainerErrorKind::MalformedCall),
            DiError::UncallableMethod { .. } => Some(ContainerErrorKind::UncallableMethod),
            DiError::InvalidArgument { .. } => Some(ContainerErrorKind::InvalidArgument),
            DiError::TypeMismatch { .. } => Some(ContainerErrorKind::TypeMismatch),
            DiError::DepthExceeded(_) => Some(ContainerErrorKind::DepthExceeded),
        }
    }

    /// True for every error that has a [`ContainerErrorKind`].
    pub fn is_container_error(&self) -> bool {
        self.container_kind().is_some()
    }
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::ServiceNotFound(name) => write!(f, "Service not found: {}", name),
            DiError::ParameterNotFound(path) => write!(f, "Parameter not found: {}", path),
            DiError::MalformedEntry(service) => write!(
                f,
                "{} service entry must be a definition containing a \"class\"",
                service
            ),
            DiError::ClassNotFound { service, class } => {
                write!(f, "{} service class does not exist: {}", service, class)
            }
            DiError::Circular(path) => write!(f, "Circular reference: {}", path.join(" -> ")),
            DiError::MalformedCall { service, index } => write!(
                f,
                "{} service call #{} must contain a \"method\"",
                service, index
            ),
            DiError::UncallableMethod { service, method } => write!(
                f,
                "{} service asks for call to uncallable method: {}",
                service, method
            ),
            DiError::InvalidArgument {
                service,
                position,
                expected,
            } => write!(
                f,
                "{} service argument {} is invalid: expected {}",
                service, position, expected
            ),
            DiError::TypeMismatch { service, expected } => {
                write!(f, "Type mismatch for {}: expected {}", service, expected)
            }
            DiError::DepthExceeded(depth) => write!(f, "Max depth {} exceeded", depth),
            DiError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for DI operations
///
/// A convenience alias for `Result<T, DiError>` used throughout the crate,
/// including by the constructor and method closures registered on a
/// [`ClassRegistry`](crate::ClassRegistry).
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{DiError, DiResult};
///
/// fn lookup(found: bool) -> DiResult<u16> {
///     if found {
///         Ok(5432)
///     } else {
///         Err(DiError::ParameterNotFound("db.port".into()))
///     }
/// }
///
/// assert_eq!(lookup(true).unwrap(), 5432);
/// assert!(lookup(false).is_err());
/// ```
pub type DiResult<T> = Result<T, DiError>;
