/*
 * ast.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template AST types.
//!
//! This module defines the abstract syntax tree for parsed SQL templates.
//! Each node includes its source location for error reporting. Nodes are
//! immutable once the parser has built them.

use crate::location::Location;
use crate::token::{ClauseKind, JoinerKind};
use std::fmt;

/// A node in the template AST.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// The root of a compiled template.
    Statement(Statement),

    /// `SELECT ...`, `WHERE ...` and the other droppable clauses.
    KeywordClause(KeywordClause),

    /// `AND ...` / `OR ...` inside a clause.
    Joiner(Joiner),

    /// `( ... )`
    Brackets(Brackets),

    /// Words, quoted literals and punctuation.
    Literal(Text),

    /// Spaces, tabs and line breaks.
    Whitespace(Text),

    /// Line and block comments that are not directives.
    Comment(Text),

    /// `/*expr*/probe`
    BindValueDirective(ValueDirective),

    /// `/*^expr*/probe`
    LiteralValueDirective(ValueDirective),

    /// `/*#expr*/`
    EmbeddedValueDirective(EmbeddedValueDirective),

    /// `/*%expand [expr]*/*`
    ExpandDirective(ExpandDirective),

    /// `/*%if*/ ... /*%elseif*/ ... /*%else*/ ... /*%end*/`
    IfBlock(IfBlock),

    /// `/*%for id in expr*/ ... /*%end*/`
    ForBlock(ForBlock),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub children: Vec<AstNode>,
    pub location: Location,
}

/// A clause that is dropped, keyword included, when its content renders
/// nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordClause {
    pub kind: ClauseKind,
    /// The keyword as written in the template.
    pub keyword_text: String,
    pub children: Vec<AstNode>,
    pub location: Location,
}

/// `AND`/`OR` and the condition that follows it.
#[derive(Debug, Clone, PartialEq)]
pub struct Joiner {
    pub kind: JoinerKind,
    /// The keyword as written in the template.
    pub keyword_text: String,
    pub children: Vec<AstNode>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Brackets {
    pub inner: Vec<AstNode>,
    pub location: Location,
}

/// Verbatim template text.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub text: String,
    pub location: Location,
}

/// A bind-value or literal-value directive.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueDirective {
    pub expression: String,
    /// The test value that makes the template runnable as plain SQL. It is
    /// kept for tooling and never rendered.
    pub probe: Box<AstNode>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedValueDirective {
    pub expression: String,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpandDirective {
    /// Table alias expression; `None` for an unqualified column list.
    pub expression: Option<String>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfBlock {
    /// `%if` followed by every `%elseif`, in template order.
    pub branches: Vec<ConditionBranch>,
    pub else_children: Option<Vec<AstNode>>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionBranch {
    pub expression: String,
    pub children: Vec<AstNode>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForBlock {
    pub identifier: String,
    pub expression: String,
    pub children: Vec<AstNode>,
    pub location: Location,
}

impl AstNode {
    pub fn location(&self) -> &Location {
        match self {
            AstNode::Statement(n) => &n.location,
            AstNode::KeywordClause(n) => &n.location,
            AstNode::Joiner(n) => &n.location,
            AstNode::Brackets(n) => &n.location,
            AstNode::Literal(n) | AstNode::Whitespace(n) | AstNode::Comment(n) => &n.location,
            AstNode::BindValueDirective(n) | AstNode::LiteralValueDirective(n) => &n.location,
            AstNode::EmbeddedValueDirective(n) => &n.location,
            AstNode::ExpandDirective(n) => &n.location,
            AstNode::IfBlock(n) => &n.location,
            AstNode::ForBlock(n) => &n.location,
        }
    }

    /// Short name of the node kind.
    pub fn name(&self) -> &'static str {
        match self {
            AstNode::Statement(_) => "statement",
            AstNode::KeywordClause(_) => "clause",
            AstNode::Joiner(_) => "joiner",
            AstNode::Brackets(_) => "brackets",
            AstNode::Literal(_) => "literal",
            AstNode::Whitespace(_) => "whitespace",
            AstNode::Comment(_) => "comment",
            AstNode::BindValueDirective(_) => "bind-value",
            AstNode::LiteralValueDirective(_) => "literal-value",
            AstNode::EmbeddedValueDirective(_) => "embedded-value",
            AstNode::ExpandDirective(_) => "expand",
            AstNode::IfBlock(_) => "if",
            AstNode::ForBlock(_) => "for",
        }
    }

    /// Number of nodes in this subtree, probes included.
    pub fn node_count(&self) -> usize {
        let nested = |nodes: &[AstNode]| nodes.iter().map(AstNode::node_count).sum::<usize>();
        1 + match self {
            AstNode::Statement(n) => nested(&n.children),
            AstNode::KeywordClause(n) => nested(&n.children),
            AstNode::Joiner(n) => nested(&n.children),
            AstNode::Brackets(n) => nested(&n.inner),
            AstNode::BindValueDirective(n) | AstNode::LiteralValueDirective(n) => {
                n.probe.node_count()
            }
            AstNode::IfBlock(n) => {
                n.branches.iter().map(|b| nested(&b.children)).sum::<usize>()
                    + n.else_children.as_deref().map_or(0, nested)
            }
            AstNode::ForBlock(n) => nested(&n.children),
            AstNode::Literal(_)
            | AstNode::Whitespace(_)
            | AstNode::Comment(_)
            | AstNode::EmbeddedValueDirective(_)
            | AstNode::ExpandDirective(_) => 0,
        }
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        let loc = self.location();
        write!(f, "{indent}{} @{}:{}", self.name(), loc.line, loc.column)?;
        match self {
            AstNode::Statement(n) => {
                writeln!(f)?;
                write_children(f, &n.children, depth + 1)
            }
            AstNode::KeywordClause(n) => {
                writeln!(f, " {}", n.kind)?;
                write_children(f, &n.children, depth + 1)
            }
            AstNode::Joiner(n) => {
                writeln!(f, " {}", n.kind)?;
                write_children(f, &n.children, depth + 1)
            }
            AstNode::Brackets(n) => {
                writeln!(f)?;
                write_children(f, &n.inner, depth + 1)
            }
            AstNode::Literal(n) | AstNode::Whitespace(n) | AstNode::Comment(n) => {
                writeln!(f, " {:?}", n.text)
            }
            AstNode::BindValueDirective(n) | AstNode::LiteralValueDirective(n) => {
                writeln!(f, " {:?}", n.expression)?;
                n.probe.write_tree(f, depth + 1)
            }
            AstNode::EmbeddedValueDirective(n) => writeln!(f, " {:?}", n.expression),
            AstNode::ExpandDirective(n) => match &n.expression {
                Some(expression) => writeln!(f, " {expression:?}"),
                None => writeln!(f),
            },
            AstNode::IfBlock(n) => {
                writeln!(f)?;
                for branch in &n.branches {
                    writeln!(f, "{indent}  branch {:?}", branch.expression)?;
                    write_children(f, &branch.children, depth + 2)?;
                }
                if let Some(else_children) = &n.else_children {
                    writeln!(f, "{indent}  else")?;
                    write_children(f, else_children, depth + 2)?;
                }
                Ok(())
            }
            AstNode::ForBlock(n) => {
                writeln!(f, " {} in {:?}", n.identifier, n.expression)?;
                write_children(f, &n.children, depth + 1)
            }
        }
    }
}

fn write_children(f: &mut fmt::Formatter<'_>, nodes: &[AstNode], depth: usize) -> fmt::Result {
    nodes.iter().try_for_each(|n| n.write_tree(f, depth))
}

/// Indented tree dump, one node per line.
impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}
