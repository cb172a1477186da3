/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for template compilation and rendering.

use crate::location::Location;
use thiserror::Error;

/// Errors that can occur while compiling or rendering a SQL template.
///
/// Every variant carries the [`Location`] of the construct that failed, and
/// the location is part of the displayed message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    /// The template text could not be split into tokens.
    #[error("Lex error at {location}: {message}")]
    Lex { message: String, location: Location },

    /// The token stream does not form a valid template.
    #[error("Syntax error at {location}: {message}")]
    Syntax { message: String, location: Location },

    /// A directive expression could not be evaluated.
    #[error("Evaluation error at {location}: {message}")]
    Eval { message: String, location: Location },

    /// A directive expression evaluated to a value of the wrong shape.
    #[error("Type error at {location}: {message}")]
    Type { message: String, location: Location },

    /// The parser reached a state it should never be in.
    #[error("Internal error at {location}: {message}")]
    Internal { message: String, location: Location },
}

impl TemplateError {
    pub(crate) fn lex(message: impl Into<String>, location: Location) -> Self {
        TemplateError::Lex {
            message: message.into(),
            location,
        }
    }

    pub(crate) fn syntax(message: impl Into<String>, location: Location) -> Self {
        TemplateError::Syntax {
            message: message.into(),
            location,
        }
    }

    pub(crate) fn eval(message: impl Into<String>, location: Location) -> Self {
        TemplateError::Eval {
            message: message.into(),
            location,
        }
    }

    pub(crate) fn type_error(message: impl Into<String>, location: Location) -> Self {
        TemplateError::Type {
            message: message.into(),
            location,
        }
    }

    pub(crate) fn internal(message: impl Into<String>, location: Location) -> Self {
        TemplateError::Internal {
            message: message.into(),
            location,
        }
    }

    /// Where in the template the error originated.
    pub fn location(&self) -> &Location {
        match self {
            TemplateError::Lex { location, .. }
            | TemplateError::Syntax { location, .. }
            | TemplateError::Eval { location, .. }
            | TemplateError::Type { location, .. }
            | TemplateError::Internal { location, .. } => location,
        }
    }

    /// The message without the location prefix.
    pub fn message(&self) -> &str {
        match self {
            TemplateError::Lex { message, .. }
            | TemplateError::Syntax { message, .. }
            | TemplateError::Eval { message, .. }
            | TemplateError::Type { message, .. }
            | TemplateError::Internal { message, .. } => message,
        }
    }

    /// Short name of the error kind, used as a diagnostic title.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TemplateError::Lex { .. } => "Lex error",
            TemplateError::Syntax { .. } => "Syntax error",
            TemplateError::Eval { .. } => "Evaluation error",
            TemplateError::Type { .. } => "Type error",
            TemplateError::Internal { .. } => "Internal error",
        }
    }
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;
