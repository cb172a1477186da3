/*
 * tokenizer.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Tokenizer for two-way SQL templates.
//!
//! The tokenizer splits template text into whitespace, line breaks, words,
//! quoted literals, punctuation, comments, clause keywords and directive
//! comments. It is lazy: tokens are produced as the parser asks for them,
//! and scanning stops at the first error.
//!
//! Keywords are matched case-insensitively and only as whole words. Two-word
//! keywords (`group by`, `order by`, `for update`) allow exactly one space or
//! tab between the words, which keeps the lookahead at ten characters or
//! fewer.

use crate::error::{TemplateError, TemplateResult};
use crate::location::Location;
use crate::token::{Directive, Keyword, Token, TokenKind};
use std::sync::Arc;

/// Tokenize template text.
pub fn tokenize(input: &str) -> Tokenizer<'_> {
    Tokenizer::new(input)
}

/// Lazy token stream over template text.
pub struct Tokenizer<'a> {
    /// Shared copy of the input, referenced by every [`Location`].
    source: Arc<str>,
    input: &'a str,
    /// Current byte position in the input.
    pos: usize,
    line: usize,
    column: usize,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_source(input, Arc::from(input))
    }

    /// Create a tokenizer whose locations share an existing copy of `input`.
    pub fn with_source(input: &'a str, source: Arc<str>) -> Self {
        debug_assert_eq!(&*source, input);
        Self {
            source,
            input,
            pos: 0,
            line: 1,
            column: 1,
            failed: false,
        }
    }

    /// The shared template text.
    pub fn source(&self) -> &Arc<str> {
        &self.source
    }

    /// Location of the current position.
    pub fn location(&self) -> Location {
        Location::new(self.source.clone(), self.pos, self.line, self.column)
    }

    /// Returns the remaining input from the current position.
    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Advances the position by `len` bytes, tracking lines and columns.
    fn advance(&mut self, len: usize) {
        let mut chars = self.input[self.pos..self.pos + len].chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    self.line += 1;
                    self.column = 1;
                }
                '\n' => {
                    self.line += 1;
                    self.column = 1;
                }
                _ => self.column += 1,
            }
        }
        self.pos += len;
    }

    fn next_token(&mut self) -> Option<TemplateResult<Token<'a>>> {
        let rest = self.remaining();
        let c = rest.chars().next()?;
        let location = self.location();

        let scanned = match c {
            '\r' | '\n' => Ok((TokenKind::Eol, if rest.starts_with("\r\n") { 2 } else { 1 })),
            c if is_blank(c) => Ok((TokenKind::Whitespace, span_while(rest, is_blank))),
            '\'' => quoted_len(rest, '\'')
                .map(|len| (TokenKind::Quote, len))
                .ok_or_else(|| TemplateError::lex("the string literal is not closed", location.clone())),
            '"' => quoted_len(rest, '"')
                .map(|len| (TokenKind::Word, len))
                .ok_or_else(|| {
                    TemplateError::lex("the quoted identifier is not closed", location.clone())
                }),
            '-' if rest.starts_with("--") => Ok((
                TokenKind::LineComment,
                rest.find(['\r', '\n']).unwrap_or(rest.len()),
            )),
            '/' if rest.starts_with("/*") => scan_block_comment(rest, &location),
            '(' => Ok((TokenKind::OpenParen, 1)),
            ')' => Ok((TokenKind::CloseParen, 1)),
            c if is_word_char(c) => Ok(scan_word(rest)),
            c => Ok((TokenKind::Other, c.len_utf8())),
        };

        match scanned {
            Ok((kind, len)) => {
                let text = &rest[..len];
                self.advance(len);
                Some(Ok(Token {
                    kind,
                    text,
                    location,
                }))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = TemplateResult<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.next_token()
    }
}

/// Blank characters that do not end a line.
fn is_blank(c: char) -> bool {
    c.is_whitespace() && c != '\r' && c != '\n'
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '$' | '@')
}

/// First character of a directive expression or loop identifier.
pub(crate) fn is_expression_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn span_while(rest: &str, pred: impl Fn(char) -> bool) -> usize {
    rest.find(|c: char| !pred(c)).unwrap_or(rest.len())
}

/// Length of a quoted span starting at `rest[0]`, where a doubled quote
/// character stands for itself. `None` if the closing quote is missing.
fn quoted_len(rest: &str, quote: char) -> Option<usize> {
    let mut chars = rest.char_indices().skip(1).peekable();
    while let Some((i, c)) = chars.next() {
        if c == quote {
            if chars.peek().is_some_and(|&(_, next)| next == quote) {
                chars.next();
                continue;
            }
            return Some(i + c.len_utf8());
        }
    }
    None
}

fn scan_word(rest: &str) -> (TokenKind<'_>, usize) {
    if rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        if let Some((keyword, len)) = match_keyword(rest) {
            return (TokenKind::Keyword(keyword), len);
        }
    }
    (TokenKind::Word, span_while(rest, is_word_char))
}

fn match_keyword(rest: &str) -> Option<(Keyword, usize)> {
    Keyword::SPELLINGS.iter().find_map(|&(spelling, keyword)| {
        let len = match_spelling(rest, spelling)?;
        let next = rest[len..].chars().next();
        let at_boundary = if keyword == Keyword::Option {
            next == Some('(')
        } else {
            !next.is_some_and(is_word_char)
        };
        at_boundary.then_some((keyword, len))
    })
}

/// Case-insensitive prefix match where a space in `spelling` matches one
/// space or tab.
fn match_spelling(rest: &str, spelling: &str) -> Option<usize> {
    let bytes = rest.as_bytes().get(..spelling.len())?;
    let matched = bytes.iter().zip(spelling.bytes()).all(|(&actual, expected)| {
        if expected == b' ' {
            actual == b' ' || actual == b'\t'
        } else {
            actual.eq_ignore_ascii_case(&expected)
        }
    });
    matched.then_some(spelling.len())
}

fn scan_block_comment<'a>(
    rest: &'a str,
    location: &Location,
) -> TemplateResult<(TokenKind<'a>, usize)> {
    let end = rest[2..]
        .find("*/")
        .ok_or_else(|| TemplateError::lex("the block comment is not closed", location.clone()))?;
    let content = &rest[2..2 + end];
    Ok((classify_block_comment(content, location)?, end + 4))
}

/// Decide whether a block comment is a directive from its first non-blank
/// character.
fn classify_block_comment<'a>(
    content: &'a str,
    location: &Location,
) -> TemplateResult<TokenKind<'a>> {
    let content = content.trim_start();
    let Some(first) = content.chars().next() else {
        return Ok(TokenKind::BlockComment);
    };
    let directive = match first {
        c if is_expression_start(c) => Directive::BindValue(content.trim()),
        '^' => Directive::LiteralValue(required_expression(
            &content[1..],
            "literal value",
            location,
        )?),
        '#' => Directive::EmbeddedValue(required_expression(
            &content[1..],
            "embedded value",
            location,
        )?),
        '%' => control_directive(&content[1..], location)?,
        _ => return Ok(TokenKind::BlockComment),
    };
    Ok(TokenKind::Directive(directive))
}

fn control_directive<'a>(body: &'a str, location: &Location) -> TemplateResult<Directive<'a>> {
    let (name, rest) = body.split_at(span_while(body, |c| c.is_ascii_alphabetic()));
    match name {
        "if" => Ok(Directive::If(required_expression(rest, "%if", location)?)),
        "elseif" => Ok(Directive::ElseIf(required_expression(
            rest, "%elseif", location,
        )?)),
        "else" => no_arguments(rest, "%else", location).map(|()| Directive::Else),
        "end" => no_arguments(rest, "%end", location).map(|()| Directive::End),
        "for" => for_header(rest, location),
        "expand" => Ok(Directive::Expand(rest.trim())),
        _ => Err(TemplateError::lex(
            format!("unsupported directive `%{name}`"),
            location.clone(),
        )),
    }
}

fn required_expression<'a>(
    text: &'a str,
    directive: &str,
    location: &Location,
) -> TemplateResult<&'a str> {
    let expression = text.trim();
    if expression.is_empty() {
        return Err(TemplateError::lex(
            format!("the {directive} directive requires an expression"),
            location.clone(),
        ));
    }
    Ok(expression)
}

fn no_arguments(text: &str, directive: &str, location: &Location) -> TemplateResult<()> {
    if text.trim().is_empty() {
        Ok(())
    } else {
        Err(TemplateError::lex(
            format!("the {directive} directive takes no arguments"),
            location.clone(),
        ))
    }
}

/// Split `<identifier> in <expression>`.
fn for_header<'a>(text: &'a str, location: &Location) -> TemplateResult<Directive<'a>> {
    let header = text.trim();
    let (identifier, after) = header.split_at(span_while(header, is_identifier_char));
    let expression = after
        .strip_prefix(char::is_whitespace)
        .map(str::trim_start)
        .and_then(|s| s.strip_prefix("in"))
        .filter(|s| s.starts_with(char::is_whitespace))
        .map(str::trim);

    match (identifier.chars().next(), expression) {
        (Some(c), Some(expression)) if is_expression_start(c) && !expression.is_empty() => {
            Ok(Directive::For {
                identifier,
                expression,
            })
        }
        _ => Err(TemplateError::lex(
            "the %for directive must have the form `%for <identifier> in <expression>`",
            location.clone(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<(TokenKind<'_>, &str)> {
        tokenize(input)
            .map(|t| t.map(|t| (t.kind, t.text)))
            .collect::<TemplateResult<Vec<_>>>()
            .expect("input should tokenize")
    }

    fn first_error(input: &str) -> TemplateError {
        tokenize(input)
            .find_map(Result::err)
            .expect("input should fail to tokenize")
    }

    // ========================================================================
    // Plain SQL
    // ========================================================================

    #[test]
    fn test_simple_select() {
        assert_eq!(
            kinds("select * from person"),
            vec![
                (TokenKind::Keyword(Keyword::Select), "select"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Other, "*"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Keyword(Keyword::From), "from"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Word, "person"),
            ]
        );
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(
            kinds("SeLeCt"),
            vec![(TokenKind::Keyword(Keyword::Select), "SeLeCt")]
        );
        assert_eq!(
            kinds("ORDER BY"),
            vec![(TokenKind::Keyword(Keyword::OrderBy), "ORDER BY")]
        );
    }

    #[test]
    fn test_keywords_need_word_boundary() {
        assert_eq!(kinds("selected"), vec![(TokenKind::Word, "selected")]);
        assert_eq!(kinds("order_no"), vec![(TokenKind::Word, "order_no")]);
        assert_eq!(kinds("p.from"), vec![(TokenKind::Word, "p.from")]);
        assert_eq!(kinds("android"), vec![(TokenKind::Word, "android")]);
    }

    #[test]
    fn test_two_word_keywords() {
        assert_eq!(
            kinds("group\tby"),
            vec![(TokenKind::Keyword(Keyword::GroupBy), "group\tby")]
        );
        assert_eq!(
            kinds("for update"),
            vec![(TokenKind::Keyword(Keyword::ForUpdate), "for update")]
        );
        // two spaces: not a keyword
        assert_eq!(
            kinds("order  by"),
            vec![
                (TokenKind::Word, "order"),
                (TokenKind::Whitespace, "  "),
                (TokenKind::Word, "by"),
            ]
        );
    }

    #[test]
    fn test_option_requires_paren() {
        assert_eq!(
            kinds("option(x)"),
            vec![
                (TokenKind::Keyword(Keyword::Option), "option"),
                (TokenKind::OpenParen, "("),
                (TokenKind::Word, "x"),
                (TokenKind::CloseParen, ")"),
            ]
        );
        assert_eq!(kinds("option"), vec![(TokenKind::Word, "option")]);
    }

    #[test]
    fn test_joiners_and_set_operators() {
        let tokens = kinds("a and b or c union d");
        let keywords: Vec<_> = tokens
            .iter()
            .filter_map(|(kind, _)| match kind {
                TokenKind::Keyword(k) => Some(*k),
                _ => None,
            })
            .collect();
        assert_eq!(keywords, vec![Keyword::And, Keyword::Or, Keyword::Union]);
    }

    #[test]
    fn test_string_literal_with_escaped_quote() {
        assert_eq!(
            kinds("'it''s' x"),
            vec![
                (TokenKind::Quote, "'it''s'"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Word, "x"),
            ]
        );
    }

    #[test]
    fn test_keyword_inside_string_is_not_keyword() {
        assert_eq!(kinds("'select'"), vec![(TokenKind::Quote, "'select'")]);
        assert_eq!(kinds("\"where\""), vec![(TokenKind::Word, "\"where\"")]);
    }

    #[test]
    fn test_numbers_and_qualified_names_are_words() {
        assert_eq!(kinds("1.5"), vec![(TokenKind::Word, "1.5")]);
        assert_eq!(kinds("p.name"), vec![(TokenKind::Word, "p.name")]);
    }

    #[test]
    fn test_punctuation_is_one_char_each() {
        assert_eq!(
            kinds("<>"),
            vec![(TokenKind::Other, "<"), (TokenKind::Other, ">")]
        );
    }

    #[test]
    fn test_line_comment_stops_before_line_break() {
        assert_eq!(
            kinds("-- note\r\nx"),
            vec![
                (TokenKind::LineComment, "-- note"),
                (TokenKind::Eol, "\r\n"),
                (TokenKind::Word, "x"),
            ]
        );
    }

    // ========================================================================
    // Directives
    // ========================================================================

    #[test]
    fn test_plain_block_comments() {
        assert_eq!(kinds("/* 1 note */"), vec![(TokenKind::BlockComment, "/* 1 note */")]);
        assert_eq!(kinds("/*+ INDEX */"), vec![(TokenKind::BlockComment, "/*+ INDEX */")]);
        assert_eq!(kinds("/**/"), vec![(TokenKind::BlockComment, "/**/")]);
        assert_eq!(kinds("/*   */"), vec![(TokenKind::BlockComment, "/*   */")]);
    }

    #[test]
    fn test_directives_after_leading_blanks() {
        assert_eq!(
            kinds("/* name */"),
            vec![(TokenKind::Directive(Directive::BindValue("name")), "/* name */")]
        );
        assert_eq!(
            kinds("/*\t^ name */"),
            vec![(TokenKind::Directive(Directive::LiteralValue("name")), "/*\t^ name */")]
        );
        assert_eq!(
            kinds("/* #expr */"),
            vec![(TokenKind::Directive(Directive::EmbeddedValue("expr")), "/* #expr */")]
        );
        assert_eq!(
            kinds("/* %if c *//* %end */"),
            vec![
                (TokenKind::Directive(Directive::If("c")), "/* %if c */"),
                (TokenKind::Directive(Directive::End), "/* %end */"),
            ]
        );
    }

    #[test]
    fn test_unsupported_directive_after_blank() {
        let err = first_error("select /* %bogus */1");
        assert!(matches!(err, TemplateError::Lex { .. }));
        assert_eq!(err.message(), "unsupported directive `%bogus`");
        assert_eq!(err.location().column, 8);
    }

    #[test]
    fn test_value_directives() {
        assert_eq!(
            kinds("/*name*/"),
            vec![(TokenKind::Directive(Directive::BindValue("name")), "/*name*/")]
        );
        assert_eq!(
            kinds("/*^ name */"),
            vec![(TokenKind::Directive(Directive::LiteralValue("name")), "/*^ name */")]
        );
        assert_eq!(
            kinds("/*# \"or\" */"),
            vec![(TokenKind::Directive(Directive::EmbeddedValue("\"or\"")), "/*# \"or\" */")]
        );
    }

    #[test]
    fn test_block_directives() {
        let tokens = kinds("/*%if a != null*//*%elseif b*//*%else*//*%end*/");
        let directives: Vec<_> = tokens
            .into_iter()
            .map(|(kind, _)| match kind {
                TokenKind::Directive(d) => d,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            directives,
            vec![
                Directive::If("a != null"),
                Directive::ElseIf("b"),
                Directive::Else,
                Directive::End,
            ]
        );
    }

    #[test]
    fn test_for_and_expand_directives() {
        assert_eq!(
            kinds("/*%for item in items*/"),
            vec![(
                TokenKind::Directive(Directive::For {
                    identifier: "item",
                    expression: "items",
                }),
                "/*%for item in items*/"
            )]
        );
        assert_eq!(
            kinds("/*%expand*/"),
            vec![(TokenKind::Directive(Directive::Expand("")), "/*%expand*/")]
        );
        assert_eq!(
            kinds("/*%expand \"e\"*/"),
            vec![(TokenKind::Directive(Directive::Expand("\"e\"")), "/*%expand \"e\"*/")]
        );
    }

    // ========================================================================
    // Errors and locations
    // ========================================================================

    #[test]
    fn test_unsupported_directive_reports_location() {
        let err = first_error("select *\n  from t /*%bogus*/");
        assert!(matches!(err, TemplateError::Lex { .. }));
        assert_eq!(err.location().line, 2);
        assert_eq!(err.location().column, 10);
        assert!(err.message().contains("%bogus"));
    }

    #[test]
    fn test_unterminated_string() {
        let err = first_error("select 'abc");
        assert!(matches!(err, TemplateError::Lex { .. }));
        assert_eq!(err.location().column, 8);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = first_error("select /* abc");
        assert!(err.message().contains("block comment"));
    }

    #[test]
    fn test_malformed_directives() {
        assert!(first_error("/*%if*/").message().contains("requires an expression"));
        assert!(first_error("/*%else x*/").message().contains("no arguments"));
        assert!(first_error("/*%for x items*/").message().contains("%for"));
        assert!(first_error("/*%for in items*/").message().contains("%for"));
        assert!(first_error("/*^ */").message().contains("literal value"));
    }

    #[test]
    fn test_tokenizer_stops_after_error() {
        let results: Vec<_> = tokenize("'open x y").collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }

    #[test]
    fn test_line_tracking() {
        let tokens: Vec<Token<'_>> = tokenize("a\r\nb\rc\nd")
            .collect::<TemplateResult<_>>()
            .unwrap();
        let positions: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Word)
            .map(|t| (t.text, t.location.line, t.location.column))
            .collect();
        assert_eq!(
            positions,
            vec![("a", 1, 1), ("b", 2, 1), ("c", 3, 1), ("d", 4, 1)]
        );
    }

    #[test]
    fn test_columns_count_characters() {
        let tokens: Vec<Token<'_>> = tokenize("'é' x").collect::<TemplateResult<_>>().unwrap();
        let x = tokens.last().unwrap();
        assert_eq!(x.location.column, 5);
        assert_eq!(x.location.offset, 5);
    }
}
