//! Wire-level parameter filtering.
//!
//! Optional request fields are modelled as `Option`, so an unset field is
//! simply absent. The service additionally treats an explicit zero, empty
//! string or empty object as "not provided" on the wire; the predicates here
//! drop those values too so a caller's zero never overrides a service default.

use std::collections::BTreeMap;

#[cfg(test)]
#[path = "params_tests.rs"]
mod tests;

/// `skip_serializing_if` predicate for optional numbers
pub(crate) fn is_unset_or_zero(value: &Option<u32>) -> bool {
    matches!(value, None | Some(0))
}

/// `skip_serializing_if` predicate for optional strings
pub(crate) fn is_unset_or_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// Query string parameters with zero values filtered out
#[derive(Debug, Default)]
pub(crate) struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn number(mut self, key: &str, value: Option<u32>) -> Self {
        if let Some(value) = value.filter(|v| *v != 0) {
            self.0.insert(key.to_string(), value.to_string());
        }
        self
    }

    pub(crate) fn flag(mut self, key: &str, value: Option<bool>) -> Self {
        if value == Some(true) {
            self.0.insert(key.to_string(), "true".to_string());
        }
        self
    }

    pub(crate) fn text(mut self, key: &str, value: &str) -> Self {
        if !value.is_empty() {
            self.0.insert(key.to_string(), value.to_string());
        }
        self
    }

    pub(crate) fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}
