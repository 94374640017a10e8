//! Loading service definitions and parameters from JSON or YAML.
//!
//! ```yaml
//! parameters:
//!   db:
//!     host: localhost
//! services:
//!   connection:
//!     class: Connection
//!     arguments: ["%db.host%"]
//!   repository:
//!     class: Repository
//!     arguments: ["@connection"]
//!     calls:
//!       - method: setTable
//!         arguments: [users]
//!       - [setCacheSize, [64]]
//! ```
//!
//! Argument strings of the form `@name` are service references and `%path%`
//! parameter references. `@@text` stands for the literal `@text`, and
//! `%%text%%` for the literal `%text%`. Every other value is a literal.
//!
//! Service entries are converted leniently: an entry that is not a map, has
//! no string `class`, or whose `arguments`/`calls` are not lists becomes a
//! definition without a class, so the problem surfaces as
//! [`DiError::MalformedEntry`] when that service is requested.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::definition::{MethodCall, ServiceDefinition};
use crate::error::{DiError, DiResult};
use crate::reference::Argument;
use crate::value::Value;

/// Raw container configuration: a parameter tree and untyped service entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerConfig {
    #[serde(default)]
    pub parameters: BTreeMap<String, Value>,
    #[serde(default)]
    pub services: BTreeMap<String, Value>,
}

impl ContainerConfig {
    pub fn from_json_str(content: &str) -> DiResult<Self> {
        serde_json::from_str(content).map_err(|e| DiError::InvalidConfig(e.to_string()))
    }

    pub fn from_yaml_str(content: &str) -> DiResult<Self> {
        serde_yaml::from_str(content).map_err(|e| DiError::InvalidConfig(e.to_string()))
    }

    /// Reads a `.json`, `.yaml` or `.yml` file.
    pub fn from_file(path: impl AsRef<Path>) -> DiResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| DiError::InvalidConfig(format!("{}: {}", path.display(), e)))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Err(DiError::InvalidConfig(format!(
                "{}: unsupported configuration format",
                path.display()
            ))),
        }
    }

    /// Converts the raw entries into typed definitions.
    pub fn into_parts(self) -> (HashMap<String, ServiceDefinition>, BTreeMap<String, Value>) {
        let definitions = self
            .services
            .iter()
            .map(|(name, entry)| (name.clone(), definition_from_value(entry)))
            .collect();
        (definitions, self.parameters)
    }
}

/// Converts one untyped service entry.
pub fn definition_from_value(entry: &Value) -> ServiceDefinition {
    let malformed = ServiceDefinition::default();
    let Some(map) = entry.as_map() else {
        return malformed;
    };
    let Some(class) = map.get("class").and_then(Value::as_str) else {
        return malformed;
    };

    let arguments = match map.get("arguments") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::List(items)) => items.iter().map(argument_from_value).collect(),
        Some(_) => return malformed,
    };
    let calls = match map.get("calls") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::List(items)) => items.iter().map(call_from_value).collect(),
        Some(_) => return malformed,
    };

    ServiceDefinition {
        class: Some(class.to_string()),
        arguments,
        calls,
    }
}

/// Converts one untyped argument, recognising `@service` and `%parameter%`.
pub fn argument_from_value(value: &Value) -> Argument {
    let Some(text) = value.as_str() else {
        return Argument::Literal(value.clone());
    };

    if let Some(rest) = text.strip_prefix('@') {
        return if rest.starts_with('@') || rest.is_empty() {
            Argument::literal(rest_or_whole(rest, text))
        } else {
            Argument::service(rest)
        };
    }

    if let Some(inner) = text.strip_prefix('%').and_then(|t| t.strip_suffix('%')) {
        if inner.is_empty() {
            return Argument::literal(text);
        }
        if inner.starts_with('%') && inner.ends_with('%') {
            return Argument::literal(inner);
        }
        return Argument::parameter(inner);
    }

    Argument::literal(text)
}

// "@@x" unescapes to "@x"; a lone "@" stays as written.
fn rest_or_whole<'a>(rest: &'a str, whole: &'a str) -> &'a str {
    if rest.is_empty() {
        whole
    } else {
        rest
    }
}

fn call_from_value(value: &Value) -> MethodCall {
    match value {
        Value::Map(map) => MethodCall {
            method: map.get("method").and_then(Value::as_str).map(str::to_string),
            arguments: arguments_of(map.get("arguments")),
        },
        Value::List(items) => MethodCall {
            method: items.first().and_then(Value::as_str).map(str::to_string),
            arguments: arguments_of(items.get(1)),
        },
        _ => MethodCall::default(),
    }
}

fn arguments_of(value: Option<&Value>) -> Vec<Argument> {
    value
        .and_then(Value::as_list)
        .map(|items| items.iter().map(argument_from_value).collect())
        .unwrap_or_default()
}
