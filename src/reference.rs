//! Reference markers used inside argument lists.

use std::fmt;

use crate::value::Value;

/// Points at a dotted parameter path such as `"db.host"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterReference(String);

impl ParameterReference {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParameterReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}%", self.0)
    }
}

/// Points at another service by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceReference(String);

impl ServiceReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// One entry of a constructor or method-call argument list.
///
/// Every variant is turned into a concrete value before the constructor or
/// method sees it: literals pass through, parameter references are looked up
/// in the parameter tree and service references are resolved (and cached)
/// through the container.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Argument, ServiceReference};
///
/// let args = vec![
///     Argument::literal("smtp"),
///     Argument::parameter("mailer.port"),
///     Argument::service("logger"),
/// ];
/// assert_eq!(args[2].as_service(), Some(&ServiceReference::new("logger")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Literal(Value),
    Parameter(ParameterReference),
    Service(ServiceReference),
}

impl Argument {
    pub fn literal(value: impl Into<Value>) -> Self {
        Argument::Literal(value.into())
    }

    pub fn parameter(path: impl Into<String>) -> Self {
        Argument::Parameter(ParameterReference::new(path))
    }

    pub fn service(name: impl Into<String>) -> Self {
        Argument::Service(ServiceReference::new(name))
    }

    pub fn as_service(&self) -> Option<&ServiceReference> {
        match self {
            Argument::Service(reference) => Some(reference),
            _ => None,
        }
    }

    pub fn as_parameter(&self) -> Option<&ParameterReference> {
        match self {
            Argument::Parameter(reference) => Some(reference),
            _ => None,
        }
    }
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Argument::Literal(value)
    }
}

impl From<ParameterReference> for Argument {
    fn from(reference: ParameterReference) -> Self {
        Argument::Parameter(reference)
    }
}

impl From<ServiceReference> for Argument {
    fn from(reference: ServiceReference) -> Self {
        Argument::Service(reference)
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Literal(value) => write!(f, "{}", value),
            Argument::Parameter(reference) => write!(f, "{}", reference),
            Argument::Service(reference) => write!(f, "{}", reference),
        }
    }
}
