/*
 * token.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Token types produced by the tokenizer.

use crate::location::Location;
use std::fmt;

/// A token: a kind tag plus the raw text it was scanned from.
///
/// Tokens borrow from the template text and only live until the parser
/// has folded them into AST nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub text: &'a str,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind<'a> {
    /// Spaces, tabs and form feeds.
    Whitespace,
    /// A single line break: CR, LF or CRLF.
    Eol,
    /// Identifier, number or quoted identifier.
    Word,
    /// Single-quoted string literal.
    Quote,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// Any other single character.
    Other,
    /// `-- ...` up to the end of the line.
    LineComment,
    /// `/* ... */` that is not a directive.
    BlockComment,
    /// A clause keyword, joiner or set operator.
    Keyword(Keyword),
    /// A directive comment.
    Directive(Directive<'a>),
}

impl TokenKind<'_> {
    /// Short name used when dumping token streams.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::Eol => "eol",
            TokenKind::Word => "word",
            TokenKind::Quote => "quote",
            TokenKind::OpenParen => "open-paren",
            TokenKind::CloseParen => "close-paren",
            TokenKind::Other => "other",
            TokenKind::LineComment => "line-comment",
            TokenKind::BlockComment => "block-comment",
            TokenKind::Keyword(_) => "keyword",
            TokenKind::Directive(d) => d.name(),
        }
    }
}

/// Keywords recognized by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Select,
    From,
    Where,
    Having,
    GroupBy,
    OrderBy,
    ForUpdate,
    Option,
    And,
    Or,
    Union,
    Minus,
    Intersect,
    Except,
}

impl Keyword {
    /// Keyword spellings in the order the tokenizer tries them.
    ///
    /// A space inside a spelling matches exactly one space or tab. Longer
    /// spellings sharing a prefix come first.
    pub(crate) const SPELLINGS: &'static [(&'static str, Keyword)] = &[
        ("select", Keyword::Select),
        ("from", Keyword::From),
        ("where", Keyword::Where),
        ("having", Keyword::Having),
        ("group by", Keyword::GroupBy),
        ("order by", Keyword::OrderBy),
        ("or", Keyword::Or),
        ("for update", Keyword::ForUpdate),
        ("option", Keyword::Option),
        ("and", Keyword::And),
        ("union", Keyword::Union),
        ("minus", Keyword::Minus),
        ("intersect", Keyword::Intersect),
        ("except", Keyword::Except),
    ];

    /// The clause this keyword opens, if it opens one.
    pub fn clause_kind(self) -> Option<ClauseKind> {
        match self {
            Keyword::Select => Some(ClauseKind::Select),
            Keyword::From => Some(ClauseKind::From),
            Keyword::Where => Some(ClauseKind::Where),
            Keyword::Having => Some(ClauseKind::Having),
            Keyword::GroupBy => Some(ClauseKind::GroupBy),
            Keyword::OrderBy => Some(ClauseKind::OrderBy),
            Keyword::ForUpdate => Some(ClauseKind::ForUpdate),
            Keyword::Option => Some(ClauseKind::Option),
            _ => None,
        }
    }

    /// The joiner this keyword continues with, if it is one.
    pub fn joiner_kind(self) -> Option<JoinerKind> {
        match self {
            Keyword::And => Some(JoinerKind::And),
            Keyword::Or => Some(JoinerKind::Or),
            _ => None,
        }
    }

    /// Whether this keyword combines two queries.
    pub fn is_set_operator(self) -> bool {
        matches!(
            self,
            Keyword::Union | Keyword::Minus | Keyword::Intersect | Keyword::Except
        )
    }
}

/// Clause keywords that open a droppable clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    Select,
    From,
    Where,
    Having,
    GroupBy,
    OrderBy,
    ForUpdate,
    Option,
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClauseKind::Select => "SELECT",
            ClauseKind::From => "FROM",
            ClauseKind::Where => "WHERE",
            ClauseKind::Having => "HAVING",
            ClauseKind::GroupBy => "GROUP BY",
            ClauseKind::OrderBy => "ORDER BY",
            ClauseKind::ForUpdate => "FOR UPDATE",
            ClauseKind::Option => "OPTION",
        };
        f.write_str(name)
    }
}

/// Logical continuations inside a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinerKind {
    And,
    Or,
}

impl fmt::Display for JoinerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinerKind::And => f.write_str("AND"),
            JoinerKind::Or => f.write_str("OR"),
        }
    }
}

/// A directive comment with its payload already split out.
///
/// Expression slices are trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    /// `/*expr*/`
    BindValue(&'a str),
    /// `/*^expr*/`
    LiteralValue(&'a str),
    /// `/*#expr*/`
    EmbeddedValue(&'a str),
    /// `/*%if expr*/`
    If(&'a str),
    /// `/*%elseif expr*/`
    ElseIf(&'a str),
    /// `/*%else*/`
    Else,
    /// `/*%end*/`
    End,
    /// `/*%for identifier in expr*/`
    For {
        identifier: &'a str,
        expression: &'a str,
    },
    /// `/*%expand [expr]*/`; the expression may be empty.
    Expand(&'a str),
}

impl Directive<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Directive::BindValue(_) => "bind-value",
            Directive::LiteralValue(_) => "literal-value",
            Directive::EmbeddedValue(_) => "embedded-value",
            Directive::If(_) => "if",
            Directive::ElseIf(_) => "elseif",
            Directive::Else => "else",
            Directive::End => "end",
            Directive::For { .. } => "for",
            Directive::Expand(_) => "expand",
        }
    }
}
