/*
 * formatter.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Value-to-literal formatting.
//!
//! A [`ValueFormatter`] turns a value into SQL literal text. It is used for
//! the log stream (every bound value is shown inline there) and for
//! literal-value directives. Dialect-specific encodings belong in a custom
//! formatter supplied by the caller.

use crate::value::{Value, ValueType};

pub trait ValueFormatter: Send + Sync {
    fn format(&self, value: &Value, ty: ValueType) -> String;
}

/// Dialect-neutral SQL literals.
///
/// - `null`, `true`/`false`, numbers as written
/// - strings single-quoted, with embedded quotes doubled
/// - lists as `(a, b)`, or `(null)` when empty
/// - maps as a quoted JSON string
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlLiteralFormatter;

impl ValueFormatter for SqlLiteralFormatter {
    fn format(&self, value: &Value, _ty: ValueType) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(x) => format!("{x:?}"),
            Value::String(s) => quote_string(s),
            Value::List(items) if items.is_empty() => "(null)".to_string(),
            Value::List(items) => {
                let items: Vec<String> = items
                    .iter()
                    .map(|item| self.format(item, item.value_type()))
                    .collect();
                format!("({})", items.join(", "))
            }
            Value::Map(_) => quote_string(&value.to_string()),
        }
    }
}

/// Single-quote a string, doubling embedded quotes.
pub fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
