/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template parser.
//!
//! Tokens are folded into the AST with a stack of reducers. Each reducer
//! collects the children of one open construct (a clause, a bracket, a
//! branch of an `%if` block, ...) and is reduced into an AST node when the
//! construct closes. A new clause keyword closes the open clause, `)`
//! closes everything back to its `(`, and `%end` closes everything back to
//! its block.

use crate::ast::{
    AstNode, Brackets, ConditionBranch, EmbeddedValueDirective, ExpandDirective, ForBlock,
    IfBlock, Joiner, KeywordClause, Statement, Text, ValueDirective,
};
use crate::context::Parameters;
use crate::error::{TemplateError, TemplateResult};
use crate::evaluator::Renderer;
use crate::location::Location;
use crate::sql::Sql;
use crate::token::{ClauseKind, Directive, JoinerKind, Keyword, Token, TokenKind};
use crate::tokenizer::Tokenizer;
use std::sync::Arc;

const MISSING_PROBE: &str = "the test value must follow the directive";
const MISSING_STAR: &str = "the expand directive must be followed by `*`";

/// A compiled template ready for rendering.
///
/// Compiling is pure, so a compiled template can be cached by its text and
/// shared between threads.
#[derive(Debug, Clone)]
pub struct SqlTemplate {
    root: AstNode,
    source: Arc<str>,
}

impl SqlTemplate {
    /// Compile a template from source text.
    pub fn compile(source: &str) -> TemplateResult<Self> {
        let tokenizer = Tokenizer::new(source);
        let source = tokenizer.source().clone();
        let root = parse(tokenizer)?;
        tracing::debug!(nodes = root.node_count(), "compiled SQL template");
        Ok(Self { root, source })
    }

    /// The root `Statement` node.
    pub fn ast(&self) -> &AstNode {
        &self.root
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render with the default evaluator, formatter and placeholder style.
    pub fn render(&self, parameters: &Parameters) -> TemplateResult<Sql> {
        Renderer::new().render(self, parameters)
    }
}

/// Compile a template into its AST.
pub fn compile(source: &str) -> TemplateResult<AstNode> {
    SqlTemplate::compile(source).map(|template| template.root)
}

/// Fold a token stream into a `Statement` node.
pub fn parse(mut tokenizer: Tokenizer<'_>) -> TemplateResult<AstNode> {
    let mut parser = Parser::new(tokenizer.location());
    for token in tokenizer.by_ref() {
        parser.token(token?)?;
    }
    parser.finish(tokenizer.location())
}

#[derive(Debug)]
enum BranchKind {
    If(String),
    ElseIf(String),
    Else,
}

#[derive(Debug)]
enum ReducerKind {
    Clause {
        kind: ClauseKind,
        keyword_text: String,
    },
    Joiner {
        kind: JoinerKind,
        keyword_text: String,
    },
    Brackets,
    IfBlock {
        branches: Vec<ConditionBranch>,
        else_children: Option<Vec<AstNode>>,
    },
    Branch(BranchKind),
    ForBlock {
        identifier: String,
        expression: String,
    },
    BindValue {
        expression: String,
    },
    LiteralValue {
        expression: String,
    },
    Expand {
        expression: Option<String>,
    },
}

/// An open construct and the children collected for it so far.
#[derive(Debug)]
struct Reducer {
    kind: ReducerKind,
    children: Vec<AstNode>,
    location: Location,
}

/// What the top reducer needs from the very next token.
enum Pending {
    Probe,
    Star,
}

struct Parser {
    /// Children of the top-level statement.
    statement: Vec<AstNode>,
    start: Location,
    stack: Vec<Reducer>,
    /// Location of the token being processed.
    here: Location,
}

impl Parser {
    fn new(start: Location) -> Self {
        Self {
            statement: Vec::new(),
            here: start.clone(),
            start,
            stack: Vec::new(),
        }
    }

    fn push(&mut self, kind: ReducerKind, location: Location) {
        self.stack.push(Reducer {
            kind,
            children: Vec::new(),
            location,
        });
    }

    fn top_kind(&self) -> Option<&ReducerKind> {
        self.stack.last().map(|r| &r.kind)
    }

    fn pending(&self) -> Option<(Pending, Location)> {
        let top = self.stack.last()?;
        match top.kind {
            ReducerKind::BindValue { .. } | ReducerKind::LiteralValue { .. } => {
                Some((Pending::Probe, top.location.clone()))
            }
            ReducerKind::Expand { .. } => Some((Pending::Star, top.location.clone())),
            _ => None,
        }
    }

    fn token(&mut self, token: Token<'_>) -> TemplateResult<()> {
        self.here = token.location.clone();

        match self.pending() {
            Some((Pending::Probe, directive)) => {
                return match token.kind {
                    TokenKind::Word | TokenKind::Quote => self.add(text_node(AstNode::Literal, &token)),
                    TokenKind::OpenParen => {
                        self.push(ReducerKind::Brackets, token.location);
                        Ok(())
                    }
                    _ => Err(TemplateError::syntax(MISSING_PROBE, directive)),
                };
            }
            Some((Pending::Star, directive)) => {
                return if token.kind == TokenKind::Other && token.text == "*" {
                    self.reduce_top()
                } else {
                    Err(TemplateError::syntax(MISSING_STAR, directive))
                };
            }
            None => {}
        }

        match token.kind {
            TokenKind::Whitespace | TokenKind::Eol => self.add(text_node(AstNode::Whitespace, &token)),
            TokenKind::LineComment | TokenKind::BlockComment => {
                self.add(text_node(AstNode::Comment, &token))
            }
            TokenKind::Word | TokenKind::Quote | TokenKind::Other => {
                self.add(text_node(AstNode::Literal, &token))
            }
            TokenKind::OpenParen => {
                self.push(ReducerKind::Brackets, token.location);
                Ok(())
            }
            TokenKind::CloseParen => self.close_bracket(),
            TokenKind::Keyword(keyword) => self.keyword(keyword, &token),
            TokenKind::Directive(directive) => self.directive(directive, token.location),
        }
    }

    fn keyword(&mut self, keyword: Keyword, token: &Token<'_>) -> TemplateResult<()> {
        let keyword_text = token.text.to_string();
        if let Some(kind) = keyword.clause_kind() {
            self.reduce_clauses()?;
            self.push(ReducerKind::Clause { kind, keyword_text }, token.location.clone());
        } else if let Some(kind) = keyword.joiner_kind() {
            while matches!(self.top_kind(), Some(ReducerKind::Joiner { .. })) {
                self.reduce_top()?;
            }
            self.push(ReducerKind::Joiner { kind, keyword_text }, token.location.clone());
        } else {
            // set operators end the query on their left
            self.reduce_clauses()?;
            self.add(text_node(AstNode::Literal, token))?;
        }
        Ok(())
    }

    fn directive(&mut self, directive: Directive<'_>, location: Location) -> TemplateResult<()> {
        match directive {
            Directive::BindValue(expression) => {
                self.push(
                    ReducerKind::BindValue {
                        expression: expression.to_string(),
                    },
                    location,
                );
                Ok(())
            }
            Directive::LiteralValue(expression) => {
                self.push(
                    ReducerKind::LiteralValue {
                        expression: expression.to_string(),
                    },
                    location,
                );
                Ok(())
            }
            Directive::EmbeddedValue(expression) => {
                self.add(AstNode::EmbeddedValueDirective(EmbeddedValueDirective {
                    expression: expression.to_string(),
                    location,
                }))
            }
            Directive::Expand(expression) => {
                let expression = (!expression.is_empty()).then(|| expression.to_string());
                self.push(ReducerKind::Expand { expression }, location);
                Ok(())
            }
            Directive::If(expression) => {
                self.push(
                    ReducerKind::IfBlock {
                        branches: Vec::new(),
                        else_children: None,
                    },
                    location.clone(),
                );
                self.push(
                    ReducerKind::Branch(BranchKind::If(expression.to_string())),
                    location,
                );
                Ok(())
            }
            Directive::ElseIf(expression) => {
                self.next_branch(BranchKind::ElseIf(expression.to_string()), location)
            }
            Directive::Else => self.next_branch(BranchKind::Else, location),
            Directive::End => self.end(),
            Directive::For {
                identifier,
                expression,
            } => {
                self.push(
                    ReducerKind::ForBlock {
                        identifier: identifier.to_string(),
                        expression: expression.to_string(),
                    },
                    location,
                );
                Ok(())
            }
        }
    }

    fn close_bracket(&mut self) -> TemplateResult<()> {
        self.reduce_clauses()?;
        match self.top_kind() {
            Some(ReducerKind::Brackets) => self.reduce_top(),
            _ => Err(TemplateError::syntax(
                "`)` has no matching `(`",
                self.here.clone(),
            )),
        }
    }

    fn next_branch(&mut self, kind: BranchKind, location: Location) -> TemplateResult<()> {
        let name = match kind {
            BranchKind::Else => "%else",
            _ => "%elseif",
        };
        self.reduce_clauses()?;
        match self.top_kind() {
            Some(ReducerKind::Branch(BranchKind::Else)) => Err(TemplateError::syntax(
                format!("`{name}` cannot follow `%else`"),
                location,
            )),
            Some(ReducerKind::Branch(_)) => {
                self.reduce_top()?;
                self.push(ReducerKind::Branch(kind), location);
                Ok(())
            }
            Some(ReducerKind::Brackets) => Err(self.unclosed()),
            _ => Err(TemplateError::syntax(
                format!("`{name}` without an open `%if`"),
                location,
            )),
        }
    }

    fn end(&mut self) -> TemplateResult<()> {
        self.reduce_clauses()?;
        match self.top_kind() {
            Some(ReducerKind::Branch(_)) => {
                // the branch into its block, then the block itself
                self.reduce_top()?;
                self.reduce_top()
            }
            Some(ReducerKind::ForBlock { .. }) => self.reduce_top(),
            Some(ReducerKind::Brackets) => Err(self.unclosed()),
            _ => Err(TemplateError::syntax(
                "`%end` without an open `%if` or `%for`",
                self.here.clone(),
            )),
        }
    }

    /// Reduce open clauses and joiners down to the nearest boundary.
    fn reduce_clauses(&mut self) -> TemplateResult<()> {
        while matches!(
            self.top_kind(),
            Some(ReducerKind::Clause { .. } | ReducerKind::Joiner { .. })
        ) {
            self.reduce_top()?;
        }
        Ok(())
    }

    /// Error for the unterminated construct on top of the stack.
    fn unclosed(&self) -> TemplateError {
        let Some(top) = self.stack.last() else {
            return TemplateError::internal("no open construct", self.here.clone());
        };
        let message = match top.kind {
            ReducerKind::Brackets => "the `(` is never closed",
            ReducerKind::IfBlock { .. } | ReducerKind::Branch(_) => {
                "the `%if` block is never closed with `%end`"
            }
            ReducerKind::ForBlock { .. } => "the `%for` block is never closed with `%end`",
            ReducerKind::BindValue { .. } | ReducerKind::LiteralValue { .. } => MISSING_PROBE,
            ReducerKind::Expand { .. } => MISSING_STAR,
            ReducerKind::Clause { .. } | ReducerKind::Joiner { .. } => {
                return TemplateError::internal("open clause at a block boundary", top.location.clone());
            }
        };
        TemplateError::syntax(message, top.location.clone())
    }

    /// Add a finished node to the top reducer.
    fn add(&mut self, node: AstNode) -> TemplateResult<()> {
        let Some(top) = self.stack.last_mut() else {
            self.statement.push(node);
            return Ok(());
        };
        match top.kind {
            ReducerKind::IfBlock { .. } => Err(TemplateError::internal(
                format!("an if block cannot hold a {} node", node.name()),
                node.location().clone(),
            )),
            ReducerKind::BindValue { .. } | ReducerKind::LiteralValue { .. } => {
                // the probe completes the directive
                top.children.push(node);
                self.reduce_top()
            }
            _ => {
                top.children.push(node);
                Ok(())
            }
        }
    }

    /// Hand a finished branch to the enclosing if block.
    fn add_branch(&mut self, kind: BranchKind, children: Vec<AstNode>, location: Location) -> TemplateResult<()> {
        let Some(Reducer {
            kind: ReducerKind::IfBlock {
                branches,
                else_children,
            },
            ..
        }) = self.stack.last_mut()
        else {
            return Err(TemplateError::internal("a branch outside of an if block", location));
        };
        match kind {
            BranchKind::If(expression) | BranchKind::ElseIf(expression) => {
                branches.push(ConditionBranch {
                    expression,
                    children,
                    location,
                });
            }
            BranchKind::Else => *else_children = Some(children),
        }
        Ok(())
    }

    /// Pop the top reducer and add its node to the reducer below.
    fn reduce_top(&mut self) -> TemplateResult<()> {
        let Some(Reducer {
            kind,
            children,
            location,
        }) = self.stack.pop()
        else {
            return Err(TemplateError::internal("reducer stack is empty", self.here.clone()));
        };

        let node = match kind {
            ReducerKind::Clause { kind, keyword_text } => AstNode::KeywordClause(KeywordClause {
                kind,
                keyword_text,
                children,
                location,
            }),
            ReducerKind::Joiner { kind, keyword_text } => AstNode::Joiner(Joiner {
                kind,
                keyword_text,
                children,
                location,
            }),
            ReducerKind::Brackets => AstNode::Brackets(Brackets {
                inner: children,
                location,
            }),
            ReducerKind::IfBlock {
                branches,
                else_children,
            } => AstNode::IfBlock(IfBlock {
                branches,
                else_children,
                location,
            }),
            ReducerKind::Branch(kind) => return self.add_branch(kind, children, location),
            ReducerKind::ForBlock {
                identifier,
                expression,
            } => AstNode::ForBlock(ForBlock {
                identifier,
                expression,
                children,
                location,
            }),
            ReducerKind::BindValue { expression } => {
                AstNode::BindValueDirective(value_directive(expression, children, location)?)
            }
            ReducerKind::LiteralValue { expression } => {
                AstNode::LiteralValueDirective(value_directive(expression, children, location)?)
            }
            ReducerKind::Expand { expression } => {
                AstNode::ExpandDirective(ExpandDirective {
                    expression,
                    location,
                })
            }
        };
        self.add(node)
    }

    fn finish(mut self, end: Location) -> TemplateResult<AstNode> {
        self.here = end;
        self.reduce_clauses()?;
        if !self.stack.is_empty() {
            return Err(self.unclosed());
        }
        Ok(AstNode::Statement(Statement {
            children: self.statement,
            location: self.start,
        }))
    }
}

fn text_node(wrap: fn(Text) -> AstNode, token: &Token<'_>) -> AstNode {
    wrap(Text {
        text: token.text.to_string(),
        location: token.location.clone(),
    })
}

fn value_directive(
    expression: String,
    children: Vec<AstNode>,
    location: Location,
) -> TemplateResult<ValueDirective> {
    let Some(probe) = children.into_iter().next() else {
        return Err(TemplateError::syntax(MISSING_PROBE, location));
    };
    Ok(ValueDirective {
        expression,
        probe: Box::new(probe),
        location,
    })
}
