/*
 * sql.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Render output: the [`Sql`] record and the buffer that builds it.

use crate::formatter::ValueFormatter;
use crate::value::TypedValue;
use serde::Serialize;
use std::fmt;

/// A rendered statement.
///
/// `text` contains one placeholder per entry of `values`, in the same
/// order. `log` is the same statement with every bound value inlined as a
/// literal; it is meant for logging, never for execution.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Sql {
    pub text: String,
    pub values: Vec<TypedValue>,
    pub log: String,
}

impl fmt::Display for Sql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Placeholder style used in [`Sql::text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placeholder {
    /// `?`
    #[default]
    Question,
    /// `$1`, `$2`, ... numbered in bind order.
    Dollar,
}

impl Placeholder {
    /// Placeholder text for the `n`th bound value (1-based).
    pub fn render(self, n: usize) -> String {
        match self {
            Placeholder::Question => "?".to_string(),
            Placeholder::Dollar => format!("${n}"),
        }
    }
}

/// Accumulates SQL text, log text and bound values during a render.
///
/// Clauses render into a [`child`](SqlBuffer::child) buffer that is either
/// [`append`](SqlBuffer::append)ed or dropped. Placeholder numbers are
/// derived from the values already kept, so dropping a child never leaves a
/// gap.
pub struct SqlBuffer<'a> {
    sql: String,
    log: String,
    values: Vec<TypedValue>,
    placeholder: Placeholder,
    formatter: &'a dyn ValueFormatter,
    /// Number of values bound before this buffer was opened.
    offset: usize,
}

impl<'a> SqlBuffer<'a> {
    pub fn new(placeholder: Placeholder, formatter: &'a dyn ValueFormatter) -> Self {
        Self {
            sql: String::new(),
            log: String::new(),
            values: Vec::new(),
            placeholder,
            formatter,
            offset: 0,
        }
    }

    /// A new empty buffer that continues this buffer's placeholder numbering.
    pub fn child(&self) -> SqlBuffer<'a> {
        SqlBuffer {
            offset: self.offset + self.values.len(),
            ..SqlBuffer::new(self.placeholder, self.formatter)
        }
    }

    /// Append text to both the SQL and the log.
    pub fn push_text(&mut self, text: &str) {
        self.sql.push_str(text);
        self.log.push_str(text);
    }

    /// Bind a value: a placeholder goes into the SQL, the formatted literal
    /// into the log.
    pub fn push_value(&mut self, value: TypedValue) {
        let n = self.offset + self.values.len() + 1;
        self.sql.push_str(&self.placeholder.render(n));
        self.log
            .push_str(&self.formatter.format(&value.value, value.ty));
        self.values.push(value);
    }

    /// Append a child buffer created by [`child`](Self::child).
    pub fn append(&mut self, child: SqlBuffer<'_>) {
        debug_assert_eq!(child.offset, self.offset + self.values.len());
        self.sql.push_str(&child.sql);
        self.log.push_str(&child.log);
        self.values.extend(child.values);
    }

    pub fn finish(self) -> Sql {
        Sql {
            text: self.sql,
            values: self.values,
            log: self.log,
        }
    }
}
