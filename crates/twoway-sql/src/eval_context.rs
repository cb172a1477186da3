/*
 * eval_context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Evaluation context for template rendering.
//!
//! [`EvaluationContext`] is created fresh for every render. It layers loop
//! bindings over the caller's [`Parameters`] without modifying them, so a
//! single parameter set can be shared by concurrent renders.

use crate::context::Parameters;
use crate::value::TypedValue;
use std::collections::HashMap;

/// Name lookup scope for directive expressions.
#[derive(Debug)]
pub struct EvaluationContext<'a> {
    /// Caller-supplied parameters.
    parameters: &'a Parameters,

    /// Loop bindings; shadow parameters with the same name.
    locals: HashMap<String, TypedValue>,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(parameters: &'a Parameters) -> Self {
        Self {
            parameters,
            locals: HashMap::new(),
        }
    }

    /// Look up a name, checking loop bindings first.
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.locals
            .get(name)
            .or_else(|| self.parameters.get(name))
    }

    /// Bind a loop variable, returning the binding it replaces.
    pub fn bind(&mut self, name: impl Into<String>, value: TypedValue) -> Option<TypedValue> {
        self.locals.insert(name.into(), value)
    }

    /// Put back a binding saved from [`bind`](Self::bind) or
    /// [`unbind`](Self::unbind).
    pub fn restore(&mut self, name: &str, saved: Option<TypedValue>) {
        match saved {
            Some(value) => {
                self.locals.insert(name.to_string(), value);
            }
            None => {
                self.locals.remove(name);
            }
        }
    }

    /// Remove a loop binding, returning it.
    pub fn unbind(&mut self, name: &str) -> Option<TypedValue> {
        self.locals.remove(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_locals_shadow_parameters() {
        let params = Parameters::new().with("x", "param");
        let mut ctx = EvaluationContext::new(&params);

        assert_eq!(ctx.get("x").map(|t| &t.value), Some(&Value::from("param")));

        let saved = ctx.bind("x", TypedValue::inferred("local"));
        assert_eq!(ctx.get("x").map(|t| &t.value), Some(&Value::from("local")));
        assert_eq!(saved, None);

        ctx.restore("x", saved);
        assert_eq!(ctx.get("x").map(|t| &t.value), Some(&Value::from("param")));
    }

    #[test]
    fn test_restore_nested_binding() {
        let params = Parameters::new();
        let mut ctx = EvaluationContext::new(&params);
        ctx.bind("i", TypedValue::inferred(1_i64));

        let saved = ctx.unbind("i");
        ctx.bind("i", TypedValue::inferred(2_i64));
        assert_eq!(ctx.get("i").map(|t| &t.value), Some(&Value::Int(2)));

        ctx.restore("i", saved);
        assert_eq!(ctx.get("i").map(|t| &t.value), Some(&Value::Int(1)));
    }

    #[test]
    fn test_parameters_are_not_modified() {
        let params = Parameters::new().with("x", 1_i64);
        {
            let mut ctx = EvaluationContext::new(&params);
            ctx.bind("x", TypedValue::inferred(2_i64));
        }
        assert_eq!(params.get("x").map(|t| &t.value), Some(&Value::Int(1)));
    }
}
