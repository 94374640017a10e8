//! Static validation of service definitions.
//!
//! Catches configuration errors before the first `get`: every check here
//! mirrors a failure the resolution engine would raise at runtime, but is
//! performed for all definitions at once and without constructing anything.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::class::ClassRegistry;
use crate::definition::ServiceDefinition;
use crate::error::DiError;
use crate::parameters::ParameterStore;
use crate::reference::Argument;

/// Result of validating a container's definitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    /// Problems that make some `get` fail
    pub errors: Vec<DiError>,
    /// Informative findings that never fail a `get`
    pub warnings: Vec<ValidationWarning>,
}

/// A validation warning about a potentially unintended configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// No other definition references this service
    Unreferenced(String),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors concerning one service, in the order they were found.
    pub fn errors_for<'a>(&'a self, service: &'a str) -> impl Iterator<Item = &'a DiError> + 'a {
        self.errors.iter().filter(move |error| error_service(error) == Some(service))
    }
}

fn error_service(error: &DiError) -> Option<&str> {
    match error {
        DiError::MalformedEntry(service)
        | DiError::ClassNotFound { service, .. }
        | DiError::MalformedCall { service, .. }
        | DiError::UncallableMethod { service, .. }
        | DiError::InvalidArgument { service, .. }
        | DiError::TypeMismatch { service, .. } => Some(service),
        DiError::Circular(path) => path.first().map(String::as_str),
        _ => None,
    }
}

pub(crate) fn validate<'a>(
    definitions: impl Iterator<Item = (&'a str, &'a ServiceDefinition)>,
    parameters: &ParameterStore,
    classes: &ClassRegistry,
) -> ValidationResult {
    let definitions: BTreeMap<&str, &ServiceDefinition> = definitions.collect();
    let mut result = ValidationResult::default();
    let mut referenced: HashSet<&str> = HashSet::new();

    for (&name, definition) in &definitions {
        let class = match definition.class() {
            Some(class) => class,
            None => {
                result.errors.push(DiError::MalformedEntry(name.to_string()));
                continue;
            }
        };
        let descriptor = classes.get(class);
        if descriptor.is_none() {
            result.errors.push(DiError::ClassNotFound {
                service: name.to_string(),
                class: class.to_string(),
            });
        }

        check_arguments(&definition.arguments, &definitions, parameters, &mut result);

        for (index, call) in definition.calls.iter().enumerate() {
            match call.method() {
                None => result.errors.push(DiError::MalformedCall {
                    service: name.to_string(),
                    index,
                }),
                Some(method) => {
                    if descriptor.is_some_and(|d| !d.has_method(method)) {
                        result.errors.push(DiError::UncallableMethod {
                            service: name.to_string(),
                            method: method.to_string(),
                        });
                    }
                }
            }
            check_arguments(&call.arguments, &definitions, parameters, &mut result);
        }

        referenced.extend(definition.dependencies().map(|reference| reference.name()));
    }

    result.errors.extend(find_cycles(&definitions).into_iter().map(DiError::Circular));

    result.warnings = definitions
        .keys()
        .filter(|name| !referenced.contains(*name))
        .map(|name| ValidationWarning::Unreferenced(name.to_string()))
        .collect();

    result
}

fn check_arguments(
    arguments: &[Argument],
    definitions: &BTreeMap<&str, &ServiceDefinition>,
    parameters: &ParameterStore,
    result: &mut ValidationResult,
) {
    for argument in arguments {
        match argument {
            Argument::Service(reference) if !definitions.contains_key(reference.name()) => {
                result
                    .errors
                    .push(DiError::ServiceNotFound(reference.name().to_string()));
            }
            Argument::Parameter(reference) => {
                if let Err(error) = parameters.get(reference.path()) {
                    result.errors.push(error);
                }
            }
            _ => {}
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Visiting,
    Done,
}

/// Depth-first search over service references. Each back edge yields one
/// cycle path, closed by repeating its first service.
///
/// The search keeps its own work stack so that arbitrarily long chains
/// cannot exhaust the thread stack.
fn find_cycles(definitions: &BTreeMap<&str, &ServiceDefinition>) -> Vec<Vec<String>> {
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut cycles = Vec::new();
    let mut stack: Vec<(&str, std::vec::IntoIter<&str>)> = Vec::new();

    for &start in definitions.keys() {
        if marks.contains_key(start) {
            continue;
        }
        marks.insert(start, Mark::Visiting);
        stack.push((start, dependencies(start, definitions)));

        while let Some((_, pending)) = stack.last_mut() {
            let Some(next) = pending.next() else {
                if let Some((done, _)) = stack.pop() {
                    marks.insert(done, Mark::Done);
                }
                continue;
            };

            match marks.get(next) {
                Some(Mark::Visiting) => {
                    let begin = stack.iter().position(|(n, _)| *n == next).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        stack[begin..].iter().map(|(n, _)| n.to_string()).collect();
                    cycle.push(next.to_string());
                    cycles.push(cycle);
                }
                Some(Mark::Done) => {}
                None => {
                    marks.insert(next, Mark::Visiting);
                    stack.push((next, dependencies(next, definitions)));
                }
            }
        }
    }

    cycles
}

/// Defined services referenced by `name`, in declaration order. Dangling
/// references are reported elsewhere and skipped here.
fn dependencies<'a>(
    name: &str,
    definitions: &BTreeMap<&'a str, &'a ServiceDefinition>,
) -> std::vec::IntoIter<&'a str> {
    let Some(&definition) = definitions.get(name) else {
        return Vec::new().into_iter();
    };
    definition
        .dependencies()
        .filter_map(|reference| definitions.get_key_value(reference.name()).map(|(&key, _)| key))
        .collect::<Vec<_>>()
        .into_iter()
}
