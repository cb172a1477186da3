/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Two-way SQL template engine.
//!
//! A two-way SQL template is plain SQL that stays runnable as written: the
//! dynamic parts live in comments. Rendering a template with a set of
//! parameters produces parameterized SQL, the values to bind, and a log
//! rendering with the values inlined.
//!
//! - Bind values: `name = /*name*/'test'` becomes `name = ?`; a list
//!   becomes `(?, ?, ?)`
//! - Literal values: `/*^name*/'test'` inlines the value as a literal
//! - Embedded values: `/*#order*/` splices text verbatim
//! - Conditionals: `/*%if cond*/...` with `/*%elseif*/`, `/*%else*/` and
//!   `/*%end*/`
//! - Loops: `/*%for item in items*/.../*%end*/`, with `item_index` and
//!   `item_has_next`
//! - Column expansion: `/*%expand*/*` or `/*%expand "alias"*/*`
//!
//! The value that follows a bind or literal directive (the *probe*) is only
//! there so the template runs as plain SQL; it is never rendered.
//!
//! `WHERE`, `AND` and the other clause keywords are dropped automatically
//! when the content that follows them renders nothing.
//!
//! # Architecture
//!
//! Text is split by the [`tokenizer`], folded into an [`AstNode`] tree by
//! the [`parser`], and rendered in a single pass by the [`evaluator`].
//! Expressions, literal formatting and column lists are delegated to the
//! [`ExpressionEvaluator`], [`ValueFormatter`] and [`ColumnExpander`]
//! traits, which callers can replace.
//!
//! # Example
//!
//! ```
//! use twoway_sql::{Parameters, SqlTemplate};
//!
//! let template = SqlTemplate::compile(
//!     "select * from person where /*%if name != null*/name = /*name*/'test'/*%end*/",
//! )?;
//!
//! let sql = template.render(&Parameters::new().with("name", "aaa"))?;
//! assert_eq!(sql.text, "select * from person where name = ?");
//! assert_eq!(sql.log, "select * from person where name = 'aaa'");
//!
//! let sql = template.render(&Parameters::new())?;
//! assert_eq!(sql.text, "select * from person ");
//! # Ok::<(), twoway_sql::TemplateError>(())
//! ```

pub mod ast;
pub mod context;
pub mod error;
pub mod eval_context;
pub mod evaluator;
pub mod expander;
pub mod expression;
pub mod formatter;
pub mod location;
pub mod parser;
pub mod sql;
pub mod token;
pub mod tokenizer;
pub mod value;

// Re-export main types at crate root
pub use ast::AstNode;
pub use context::Parameters;
pub use error::{TemplateError, TemplateResult};
pub use eval_context::EvaluationContext;
pub use evaluator::{Renderer, render};
pub use expander::{ColumnExpander, StaticColumns};
pub use expression::{ExpressionError, ExpressionEvaluator, StandardEvaluator};
pub use formatter::{SqlLiteralFormatter, ValueFormatter};
pub use location::Location;
pub use parser::{SqlTemplate, compile};
pub use sql::{Placeholder, Sql};
pub use tokenizer::{Tokenizer, tokenize};
pub use value::{TypedValue, Value, ValueType};
