/*
 * location.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Source locations for tokens, nodes and errors.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A position in template text.
///
/// Lines and columns are 1-based; columns count characters, not bytes.
/// The full template text is shared between all locations created from it
/// so that diagnostics can show the surrounding source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// The template text this location points into.
    #[serde(skip)]
    pub source: Arc<str>,
    /// Byte offset from the start of the template.
    pub offset: usize,
    /// Line number (1-based).
    pub line: usize,
    /// Column number (1-based, in characters).
    pub column: usize,
}

impl Location {
    pub fn new(source: Arc<str>, offset: usize, line: usize, column: usize) -> Self {
        Self {
            source,
            offset,
            line,
            column,
        }
    }

    /// Character offset from the start of the template.
    pub fn char_offset(&self) -> usize {
        self.source[..self.offset].chars().count()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}
