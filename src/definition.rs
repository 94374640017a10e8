//! Declarative service definitions.

use crate::reference::{Argument, ServiceReference};

/// How to build one service: which class, with which constructor arguments,
/// followed by which method calls.
///
/// `class` is optional so that definitions arriving from untyped sources can
/// be stored as-is. A definition without a class fails with
/// [`DiError::MalformedEntry`](crate::DiError::MalformedEntry) when it is
/// resolved, not when it is registered.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Argument, MethodCall, ServiceDefinition};
///
/// let mailer = ServiceDefinition::new("Mailer")
///     .with_argument(Argument::parameter("mailer.transport"))
///     .with_call(MethodCall::new("setLogger").with_argument(Argument::service("logger")));
///
/// assert_eq!(mailer.class(), Some("Mailer"));
/// assert_eq!(mailer.dependencies().count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceDefinition {
    pub class: Option<String>,
    pub arguments: Vec<Argument>,
    pub calls: Vec<MethodCall>,
}

impl ServiceDefinition {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            arguments: Vec::new(),
            calls: Vec::new(),
        }
    }

    pub fn with_argument(mut self, argument: impl Into<Argument>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    pub fn with_arguments<I>(mut self, arguments: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Argument>,
    {
        self.arguments.extend(arguments.into_iter().map(Into::into));
        self
    }

    pub fn with_call(mut self, call: MethodCall) -> Self {
        self.calls.push(call);
        self
    }

    /// The class name, if present and non-empty.
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref().filter(|c| !c.is_empty())
    }

    /// Service references in constructor arguments and call arguments, in
    /// declaration order.
    pub fn dependencies(&self) -> impl Iterator<Item = &ServiceReference> {
        self.arguments
            .iter()
            .chain(self.calls.iter().flat_map(|call| call.arguments.iter()))
            .filter_map(Argument::as_service)
    }
}

/// A method invoked on a freshly constructed instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodCall {
    pub method: Option<String>,
    pub arguments: Vec<Argument>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, argument: impl Into<Argument>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    pub fn with_arguments<I>(mut self, arguments: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Argument>,
    {
        self.arguments.extend(arguments.into_iter().map(Into::into));
        self
    }

    /// The method name, if present and non-empty.
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref().filter(|m| !m.is_empty())
    }
}
