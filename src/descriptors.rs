//! Service descriptors for introspection and diagnostics.

use crate::definition::ServiceDefinition;

/// Service descriptor for introspection and diagnostics
///
/// A read-only summary of one definition, as returned by
/// [`Container::descriptors`](crate::Container::descriptors).
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Argument, ContainerBuilder, ServiceDefinition};
///
/// let mut builder = ContainerBuilder::new();
/// builder
///     .service("logger", ServiceDefinition::new("Logger"))
///     .service(
///         "mailer",
///         ServiceDefinition::new("Mailer").with_argument(Argument::service("logger")),
///     );
/// let container = builder.build();
///
/// let descriptors = container.descriptors();
/// assert_eq!(descriptors[1].name, "mailer");
/// assert_eq!(descriptors[1].dependencies, vec!["logger".to_string()]);
/// assert!(!descriptors[1].cached);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Service name
    pub name: String,
    /// Class name, `None` for a malformed entry
    pub class: Option<String>,
    pub argument_count: usize,
    pub call_count: usize,
    /// Services referenced by arguments and calls, in declaration order
    pub dependencies: Vec<String>,
    /// Whether an instance has been constructed
    pub cached: bool,
}

impl ServiceDescriptor {
    pub(crate) fn new(name: &str, definition: &ServiceDefinition, cached: bool) -> Self {
        Self {
            name: name.to_string(),
            class: definition.class().map(str::to_string),
            argument_count: definition.arguments.len(),
            call_count: definition.calls.len(),
            dependencies: definition
                .dependencies()
                .map(|reference| reference.name().to_string())
                .collect(),
            cached,
        }
    }

    /// True when the definition has a class.
    pub fn is_well_formed(&self) -> bool {
        self.class.is_some()
    }
}
