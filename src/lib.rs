//! # ferrous-container
//!
//! A declarative, string-keyed dependency injection container.
//!
//! ## Features
//!
//! - **Declarative definitions**: each service names a class, its constructor
//!   arguments and the methods to call after construction
//! - **Parameter references**: arguments may point at dotted paths in a nested
//!   parameter tree (`"db.host"`)
//! - **Service references**: arguments may point at other services, resolved
//!   recursively and shared through the cache
//! - **Lazy singletons**: every service is built on first request, once per
//!   container
//! - **Circular reference detection**: cycles fail with the full path instead
//!   of recursing forever
//! - **Thread-safe**: containers are `Send + Sync`, concurrent requests for
//!   the same service see exactly one construction
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_container::{Argument, ContainerBuilder, MethodCall, ServiceDefinition, Value};
//! use std::sync::{Arc, Mutex};
//!
//! struct Transport {
//!     host: String,
//! }
//!
//! struct Mailer {
//!     transport: Arc<Transport>,
//!     sender: Mutex<String>,
//! }
//!
//! let mut builder = ContainerBuilder::new();
//! builder
//!     .parameter("mail", Value::map([("host", "smtp.local"), ("from", "noreply@local")]))
//!     .service(
//!         "transport",
//!         ServiceDefinition::new("Transport").with_argument(Argument::parameter("mail.host")),
//!     )
//!     .service(
//!         "mailer",
//!         ServiceDefinition::new("Mailer")
//!             .with_argument(Argument::service("transport"))
//!             .with_call(MethodCall::new("setSender").with_argument(Argument::parameter("mail.from"))),
//!     );
//!
//! let classes = builder.classes_mut();
//! classes.register("Transport", |args| Ok(Transport { host: args.string(0)? }));
//! classes
//!     .register("Mailer", |args| {
//!         Ok(Mailer { transport: args.instance(0)?, sender: Mutex::new(String::new()) })
//!     })
//!     .method("setSender", |mailer: &Mailer, args| {
//!         *mailer.sender.lock().unwrap() = args.string(0)?;
//!         Ok(())
//!     });
//!
//! let container = builder.build();
//! let mailer = container.get_as::<Mailer>("mailer").unwrap();
//! assert_eq!(mailer.transport.host, "smtp.local");
//! assert_eq!(*mailer.sender.lock().unwrap(), "noreply@local");
//!
//! // Same instance on every request
//! let again = container.get_as::<Mailer>("mailer").unwrap();
//! assert!(Arc::ptr_eq(&mailer, &again));
//! ```
//!
//! ## Errors
//!
//! ```rust
//! use ferrous_container::{Argument, ContainerBuilder, ContainerErrorKind, ServiceDefinition};
//!
//! let mut builder = ContainerBuilder::new();
//! builder
//!     .service("a", ServiceDefinition::new("Node").with_argument(Argument::service("b")))
//!     .service("b", ServiceDefinition::new("Node").with_argument(Argument::service("a")));
//! builder.classes_mut().register("Node", |_| Ok(()));
//!
//! let container = builder.build();
//! let err = container.get("a").unwrap_err();
//! assert_eq!(err.container_kind(), Some(ContainerErrorKind::CircularReference));
//! assert_eq!(err.to_string(), "Circular reference: a -> b -> a");
//! ```

// Module declarations
pub mod builder;
pub mod class;
pub mod container;
pub mod definition;
pub mod descriptors;
pub mod error;
pub mod observer;
pub mod parameters;
pub mod reference;
pub mod validation;
pub mod value;

#[cfg(feature = "config")]
pub mod config;

// Internal modules
mod internal;
mod registration;

// Re-export core types
pub use builder::ContainerBuilder;
pub use class::{Arguments, ClassBuilder, ClassDescriptor, ClassRegistry, Instance, Resolved};
pub use container::Container;
pub use definition::{MethodCall, ServiceDefinition};
pub use descriptors::ServiceDescriptor;
pub use error::{ContainerErrorKind, DiError, DiResult};
pub use observer::{ContainerObserver, LoggingObserver};
pub use parameters::ParameterStore;
pub use reference::{Argument, ParameterReference, ServiceReference};
pub use validation::{ValidationResult, ValidationWarning};
pub use value::Value;

#[cfg(feature = "config")]
pub use config::ContainerConfig;
