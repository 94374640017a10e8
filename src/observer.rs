//! Diagnostic observers for service construction.
//!
//! Observers receive one event when construction of a service starts, and
//! one when it finishes or fails. Cache hits are reported separately. Calls
//! are synchronous and made while the container's construction lock is
//! held, so implementations should stay cheap.

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;

/// Observer trait for service resolution events.
///
/// # Examples
///
/// ```
/// use ferrous_container::{ContainerBuilder, ContainerObserver};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct CountingObserver {
///     built: AtomicUsize,
/// }
///
/// impl ContainerObserver for CountingObserver {
///     fn resolving(&self, _service: &str) {}
///
///     fn resolved(&self, _service: &str, _duration: Duration) {
///         self.built.fetch_add(1, Ordering::SeqCst);
///     }
/// }
///
/// let observer = Arc::new(CountingObserver::default());
/// let mut builder = ContainerBuilder::new();
/// builder.observer(observer.clone());
/// let container = builder.build();
/// assert_eq!(observer.built.load(Ordering::SeqCst), 0);
/// # drop(container);
/// ```
pub trait ContainerObserver: Send + Sync {
    /// Called before a service's arguments are resolved.
    fn resolving(&self, service: &str);

    /// Called after construction and all method calls succeeded.
    fn resolved(&self, service: &str, duration: Duration);

    /// Called when construction of `service` fails. The error is still
    /// returned to the caller afterwards.
    fn failed(&self, service: &str, error: &DiError) {
        let _ = (service, error);
    }

    /// Called when `get` is answered from the cache.
    fn cache_hit(&self, service: &str) {
        let _ = service;
    }
}

/// Container for registered observers.
#[derive(Default)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn ContainerObserver>>,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Arc<dyn ContainerObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn resolving(&self, service: &str) {
        for observer in &self.observers {
            observer.resolving(service);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, service: &str, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(service, duration);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, service: &str, error: &DiError) {
        for observer in &self.observers {
            observer.failed(service, error);
        }
    }

    #[inline]
    pub(crate) fn cache_hit(&self, service: &str) {
        for observer in &self.observers {
            observer.cache_hit(service);
        }
    }
}

/// Built-in observer that forwards events to `tracing`.
///
/// Resolutions are logged at `info`, failures at `warn`. Install a
/// `tracing` subscriber to see them.
///
/// # Examples
///
/// ```
/// use ferrous_container::{ContainerBuilder, LoggingObserver};
/// use std::sync::Arc;
///
/// let mut builder = ContainerBuilder::new();
/// builder.observer(Arc::new(LoggingObserver::with_prefix("[app]")));
/// let _container = builder.build();
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self {
            prefix: "[ferrous-container]".to_string(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerObserver for LoggingObserver {
    fn resolving(&self, service: &str) {
        tracing::info!(prefix = %self.prefix, service, "resolving");
    }

    fn resolved(&self, service: &str, duration: Duration) {
        tracing::info!(prefix = %self.prefix, service, ?duration, "resolved");
    }

    fn failed(&self, service: &str, error: &DiError) {
        tracing::warn!(prefix = %self.prefix, service, %error, "resolution failed");
    }
}
