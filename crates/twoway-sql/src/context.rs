/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Named parameters supplied by the caller.
//!
//! A [`Parameters`] set is owned by the caller and only read during
//! rendering; loop variables live in the per-render
//! [`EvaluationContext`](crate::eval_context::EvaluationContext) instead.

use crate::value::{TypedValue, Value, ValueType};
use std::collections::HashMap;

/// Named values with their declared types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    values: HashMap<String, TypedValue>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, typed by its runtime type.
    ///
    /// A null inserted this way has type [`ValueType::Unknown`]; use
    /// [`insert_typed`](Self::insert_typed) to declare the type of a null.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values
            .insert(name.into(), TypedValue::inferred(value));
    }

    /// Insert a value with a declared type.
    pub fn insert_typed(&mut self, name: impl Into<String>, value: impl Into<Value>, ty: ValueType) {
        self.values
            .insert(name.into(), TypedValue::new(value.into(), ty));
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Merge `other` into this set; values from `other` win.
    pub fn extend(&mut self, other: Parameters) {
        self.values.extend(other.values);
    }
}

/// Each member of a JSON object becomes one parameter.
impl From<serde_json::Map<String, serde_json::Value>> for Parameters {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter()
            .map(|(name, json)| (name, Value::from(json)))
            .collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Parameters::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}
