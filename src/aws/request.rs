//! Operation requests and results passed through the executor

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Result of an AWS operation, passed through without interpretation
pub type OperationOutput = Map<String, Value>;

/// A single named argument value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Text(String),
    List(Vec<String>),
    Bool(bool),
    Int(i64),
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for ArgValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<&[&str]> for ArgValue {
    fn from(value: &[&str]) -> Self {
        Self::List(value.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ArgValue {
    fn from(value: [&str; N]) -> Self {
        Self::List(value.iter().map(|s| s.to_string()).collect())
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// A call to `operation` on `service`, with arguments keyed the way the
/// structured client names them (`StackName`, `TemplateBody`, ...)
///
/// Arguments are kept sorted by key so the CLI command line is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    service: String,
    operation: String,
    arguments: BTreeMap<String, ArgValue>,
}

impl OperationRequest {
    pub fn new(service: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            operation: operation.into(),
            arguments: BTreeMap::new(),
        }
    }

    pub fn arg(mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn arguments(&self) -> &BTreeMap<String, ArgValue> {
        &self.arguments
    }

    /// Text argument by key
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.arguments.get(key) {
            Some(ArgValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// List argument by key; a single text value is treated as a one-item list
    pub fn list(&self, key: &str) -> Option<Vec<&str>> {
        match self.arguments.get(key) {
            Some(ArgValue::List(items)) => Some(items.iter().map(String::as_str).collect()),
            Some(ArgValue::Text(s)) => Some(vec![s.as_str()]),
            _ => None,
        }
    }
}
