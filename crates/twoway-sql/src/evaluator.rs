/*
 * evaluator.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template rendering.
//!
//! The renderer walks the AST once, depth-first and left to right, writing
//! into a [`SqlBuffer`]. Every node reports whether its scope is
//! *available*, meaning real content has been written to it. Clauses,
//! joiners and brackets render into child buffers, and a clause or joiner
//! is dropped together with its keyword when its content turns out not to
//! be available. A joiner with nothing available on its left loses only
//! its keyword; its content stays but does not make the scope available.

use crate::ast::{AstNode, ForBlock, IfBlock, ValueDirective};
use crate::context::Parameters;
use crate::error::{TemplateError, TemplateResult};
use crate::eval_context::EvaluationContext;
use crate::expander::ColumnExpander;
use crate::expression::{ExpressionError, ExpressionEvaluator, StandardEvaluator};
use crate::formatter::{SqlLiteralFormatter, ValueFormatter};
use crate::location::Location;
use crate::parser::SqlTemplate;
use crate::sql::{Placeholder, Sql, SqlBuffer};
use crate::value::{TypedValue, Value, ValueType};

/// Render configuration: the collaborators used for expressions, literals
/// and column lists, and the placeholder style.
///
/// A renderer holds no per-render state and can be shared.
#[derive(Clone, Copy)]
pub struct Renderer<'a> {
    evaluator: &'a dyn ExpressionEvaluator,
    formatter: &'a dyn ValueFormatter,
    expander: Option<&'a dyn ColumnExpander>,
    placeholder: Placeholder,
}

impl Default for Renderer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Renderer<'a> {
    /// A renderer with [`StandardEvaluator`], [`SqlLiteralFormatter`], no
    /// column expander and `?` placeholders.
    pub fn new() -> Self {
        Self {
            evaluator: &StandardEvaluator,
            formatter: &SqlLiteralFormatter,
            expander: None,
            placeholder: Placeholder::Question,
        }
    }

    pub fn with_evaluator(mut self, evaluator: &'a dyn ExpressionEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn with_formatter(mut self, formatter: &'a dyn ValueFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_expander(mut self, expander: &'a dyn ColumnExpander) -> Self {
        self.expander = Some(expander);
        self
    }

    pub fn with_placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn render(&self, template: &SqlTemplate, parameters: &Parameters) -> TemplateResult<Sql> {
        self.render_ast(template.ast(), parameters)
    }

    /// Render an AST produced by [`compile`](crate::parser::compile).
    pub fn render_ast(&self, ast: &AstNode, parameters: &Parameters) -> TemplateResult<Sql> {
        let mut run = RenderRun {
            renderer: self,
            context: EvaluationContext::new(parameters),
        };
        let mut out = SqlBuffer::new(self.placeholder, self.formatter);
        run.render_node(ast, &mut out, false)?;
        let sql = out.finish();
        tracing::debug!(values = sql.values.len(), "rendered SQL template");
        Ok(sql)
    }
}

/// Render an AST with the default evaluator and `?` placeholders.
pub fn render(
    ast: &AstNode,
    parameters: &Parameters,
    formatter: &dyn ValueFormatter,
    expander: Option<&dyn ColumnExpander>,
) -> TemplateResult<Sql> {
    let renderer = Renderer {
        formatter,
        expander,
        ..Renderer::new()
    };
    renderer.render_ast(ast, parameters)
}

/// State of a single render call.
struct RenderRun<'r, 'a, 'p> {
    renderer: &'r Renderer<'a>,
    context: EvaluationContext<'p>,
}

impl RenderRun<'_, '_, '_> {
    fn render_nodes(
        &mut self,
        nodes: &[AstNode],
        out: &mut SqlBuffer<'_>,
        mut available: bool,
    ) -> TemplateResult<bool> {
        for node in nodes {
            available = self.render_node(node, out, available)?;
        }
        Ok(available)
    }

    /// Render one node; returns the availability of the enclosing scope.
    fn render_node(
        &mut self,
        node: &AstNode,
        out: &mut SqlBuffer<'_>,
        available: bool,
    ) -> TemplateResult<bool> {
        match node {
            AstNode::Statement(n) => self.render_nodes(&n.children, out, available),

            AstNode::KeywordClause(n) => {
                let mut child = out.child();
                if self.render_nodes(&n.children, &mut child, false)? {
                    out.push_text(&n.keyword_text);
                    out.append(child);
                    Ok(true)
                } else {
                    Ok(available)
                }
            }

            AstNode::Joiner(n) => {
                let mut child = out.child();
                if self.render_nodes(&n.children, &mut child, false)? {
                    // with nothing on its left only the keyword goes
                    if available {
                        out.push_text(&n.keyword_text);
                    }
                    out.append(child);
                }
                Ok(available)
            }

            AstNode::Brackets(n) => {
                let mut child = out.child();
                self.render_nodes(&n.inner, &mut child, false)?;
                out.push_text("(");
                out.append(child);
                out.push_text(")");
                Ok(true)
            }

            AstNode::Literal(n) => {
                out.push_text(&n.text);
                Ok(true)
            }

            AstNode::Whitespace(n) | AstNode::Comment(n) => {
                out.push_text(&n.text);
                Ok(available)
            }

            AstNode::BindValueDirective(n) => {
                self.bind_value(n, out)?;
                Ok(true)
            }

            AstNode::LiteralValueDirective(n) => {
                let typed = self.evaluate(&n.expression, &n.location)?;
                let text = self.literal_text(&typed.value, typed.ty, &n.location)?;
                out.push_text(&text);
                Ok(true)
            }

            AstNode::EmbeddedValueDirective(n) => {
                let typed = self.evaluate(&n.expression, &n.location)?;
                match typed.value {
                    Value::Null => Ok(available),
                    Value::List(_) | Value::Map(_) => Err(TemplateError::type_error(
                        format!(
                            "an embedded value must be a scalar, but `{}` is a {}",
                            n.expression, typed.ty
                        ),
                        n.location.clone(),
                    )),
                    value => {
                        let text = value.to_string();
                        if text.is_empty() {
                            Ok(available)
                        } else {
                            out.push_text(&text);
                            Ok(true)
                        }
                    }
                }
            }

            AstNode::ExpandDirective(n) => {
                let prefix = match &n.expression {
                    None => String::new(),
                    Some(expression) => match self.evaluate(expression, &n.location)?.value {
                        Value::Null => String::new(),
                        Value::String(alias) => format!("{alias}."),
                        other => {
                            return Err(TemplateError::type_error(
                                format!(
                                    "the expand alias must be a string, but `{expression}` is a {}",
                                    other.value_type()
                                ),
                                n.location.clone(),
                            ));
                        }
                    },
                };
                let Some(expander) = self.renderer.expander else {
                    return Err(TemplateError::eval(
                        "no column expander is configured for `%expand`",
                        n.location.clone(),
                    ));
                };
                let columns = expander.expand(&prefix);
                if columns.is_empty() {
                    return Err(TemplateError::eval(
                        "the column expander returned no columns",
                        n.location.clone(),
                    ));
                }
                out.push_text(&columns.join(", "));
                Ok(true)
            }

            AstNode::IfBlock(n) => self.if_block(n, out, available),

            AstNode::ForBlock(n) => self.for_block(n, out, available),
        }
    }

    fn evaluate(&self, expression: &str, location: &Location) -> TemplateResult<TypedValue> {
        tracing::trace!(expression, line = location.line, "evaluating directive");
        self.renderer
            .evaluator
            .evaluate(expression, &self.context)
            .map_err(|err| {
                let message = match err {
                    ExpressionError::Parse { .. } => err.to_string(),
                    _ => format!("`{expression}`: {err}"),
                };
                TemplateError::eval(message, location.clone())
            })
    }

    fn bind_value(&self, n: &ValueDirective, out: &mut SqlBuffer<'_>) -> TemplateResult<()> {
        let typed = self.evaluate(&n.expression, &n.location)?;
        match typed.value {
            Value::List(items) if items.is_empty() => out.push_text("(null)"),
            Value::List(items) => {
                out.push_text("(");
                for (i, item) in items.into_iter().enumerate() {
                    if i > 0 {
                        out.push_text(", ");
                    }
                    out.push_value(TypedValue::inferred(item));
                }
                out.push_text(")");
            }
            value => out.push_value(TypedValue::new(value, typed.ty)),
        }
        Ok(())
    }

    /// Inline text for a literal-value directive.
    fn literal_text(&self, value: &Value, ty: ValueType, location: &Location) -> TemplateResult<String> {
        match value {
            Value::String(s) if s.contains('\'') => Err(TemplateError::eval(
                format!("the literal value {s:?} contains a single quote"),
                location.clone(),
            )),
            Value::String(s) => Ok(format!("'{s}'")),
            Value::List(items) if items.is_empty() => Ok("(null)".to_string()),
            Value::List(items) => {
                let items = items
                    .iter()
                    .map(|item| self.literal_text(item, item.value_type(), location))
                    .collect::<TemplateResult<Vec<_>>>()?;
                Ok(format!("({})", items.join(", ")))
            }
            other => Ok(self.renderer.formatter.format(other, ty)),
        }
    }

    fn if_block(&mut self, n: &IfBlock, out: &mut SqlBuffer<'_>, available: bool) -> TemplateResult<bool> {
        for branch in &n.branches {
            let condition = self.evaluate(&branch.expression, &branch.location)?;
            match condition.value {
                Value::Bool(true) => return self.render_nodes(&branch.children, out, available),
                Value::Bool(false) => {}
                other => {
                    return Err(TemplateError::type_error(
                        format!(
                            "the condition `{}` must be a bool, but it is a {}",
                            branch.expression,
                            other.value_type()
                        ),
                        branch.location.clone(),
                    ));
                }
            }
        }
        match &n.else_children {
            Some(children) => self.render_nodes(children, out, available),
            None => Ok(available),
        }
    }

    fn for_block(&mut self, n: &ForBlock, out: &mut SqlBuffer<'_>, mut available: bool) -> TemplateResult<bool> {
        let items = match self.evaluate(&n.expression, &n.location)?.value {
            Value::List(items) => items,
            other => {
                return Err(TemplateError::type_error(
                    format!(
                        "`%for` needs a list, but `{}` is a {}",
                        n.expression,
                        other.value_type()
                    ),
                    n.location.clone(),
                ));
            }
        };

        let names = [
            n.identifier.clone(),
            format!("{}_index", n.identifier),
            format!("{}_has_next", n.identifier),
        ];
        let saved = names.clone().map(|name| self.context.unbind(&name));

        let count = items.len();
        for (index, item) in items.into_iter().enumerate() {
            self.context.bind(names[0].as_str(), TypedValue::inferred(item));
            self.context.bind(names[1].as_str(), TypedValue::inferred(index));
            self.context
                .bind(names[2].as_str(), TypedValue::inferred(index + 1 < count));
            available = self.render_nodes(&n.children, out, available)?;
        }

        for (name, previous) in names.iter().zip(saved) {
            self.context.restore(name, previous);
        }
        Ok(available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expander::StaticColumns;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn compile(source: &str) -> SqlTemplate {
        SqlTemplate::compile(source).expect("template should compile")
    }

    fn ctx(json: serde_json::Value) -> Parameters {
        match json {
            serde_json::Value::Object(map) => Parameters::from(map),
            other => panic!("expected an object, got {other}"),
        }
    }

    fn render(source: &str, params: serde_json::Value) -> Sql {
        compile(source)
            .render(&ctx(params))
            .expect("template should render")
    }

    fn render_err(source: &str, params: serde_json::Value) -> TemplateError {
        compile(source)
            .render(&ctx(params))
            .expect_err("template should fail to render")
    }

    fn values(sql: &Sql) -> Vec<Value> {
        sql.values.iter().map(|t| t.value.clone()).collect()
    }

    const PERSON_QUERY: &str = "select name, age from person where /*%if name != null*/name = /*name*/'test'/*%end*/ and 1 = 1";

    // ========================================================================
    // Plain SQL
    // ========================================================================

    #[test]
    fn test_no_directives_renders_unchanged() {
        let sql = render("select * from person", json!({}));
        assert_eq!(sql.text, "select * from person");
        assert_eq!(sql.log, "select * from person");
        assert!(sql.values.is_empty());
    }

    #[test]
    fn test_plain_sql_keeps_comments_and_layout() {
        let source = "select a -- first\n  , b /* 2nd */\nfrom t\nwhere (a = 1 or b = 2)";
        assert_eq!(render(source, json!({})).text, source);
    }

    // ========================================================================
    // Clause dropping
    // ========================================================================

    #[test]
    fn test_false_condition_drops_clause_and_joiner() {
        let sql = render(PERSON_QUERY, json!({}));
        assert_eq!(sql.text, "select name, age from person ");
        assert!(sql.values.is_empty());
    }

    #[test]
    fn test_true_condition_keeps_clause() {
        let sql = render(PERSON_QUERY, json!({"name": "aaa"}));
        assert_eq!(sql.text, "select name, age from person where name = ? and 1 = 1");
        assert_eq!(sql.log, "select name, age from person where name = 'aaa' and 1 = 1");
        assert_eq!(sql.values, vec![TypedValue::new(Value::from("aaa"), ValueType::String)]);
    }

    #[test]
    fn test_leading_joiner_is_dropped() {
        let source = "select * from t where /*%if a*/x = 1/*%end*/ and y = /*y*/0";
        let sql = render(source, json!({"a": false, "y": 5}));
        assert_eq!(sql.text, "select * from t ");
        assert!(sql.values.is_empty());

        let sql = render(source, json!({"a": true, "y": 5}));
        assert_eq!(sql.text, "select * from t where x = 1 and y = ?");
        assert_eq!(values(&sql), vec![Value::Int(5)]);
    }

    #[test]
    fn test_joiner_inside_branch() {
        let source = "where a = 1 /*%if b != null*/and b = /*b*/0/*%end*/";
        assert_eq!(render(source, json!({})).text, "where a = 1 ");
        assert_eq!(render(source, json!({"b": 2})).text, "where a = 1 and b = ?");
    }

    #[test]
    fn test_leading_joiner_in_brackets_keeps_predicate() {
        let sql = render(
            "select * from t where (/*%if false*/a = 1/*%end*/ and b = /*b*/2) or c = 3",
            json!({"b": 5}),
        );
        assert_eq!(sql.text, "select * from t where ( b = ?) or c = 3");
        assert_eq!(values(&sql), vec![Value::Int(5)]);
    }

    #[test]
    fn test_leading_joiner_at_top_level_keeps_predicate() {
        let sql = render("/*%if false*/a = 1/*%end*/ and b = 2", json!({}));
        assert_eq!(sql.text, "  b = 2");
    }

    #[test]
    fn test_empty_joiner_is_dropped() {
        let sql = render("(a = 1 and /*%if false*/b = 2/*%end*/)", json!({}));
        assert_eq!(sql.text, "(a = 1 )");
    }

    #[test]
    fn test_brackets_keep_clause_available() {
        let sql = render("where (/*%if false*/x/*%end*/)", json!({}));
        assert_eq!(sql.text, "where ()");
    }

    #[test]
    fn test_clause_with_only_whitespace_is_dropped() {
        let sql = render("select * from t where /*%if false*/x/*%end*/ order by a", json!({}));
        assert_eq!(sql.text, "select * from t order by a");
    }

    // ========================================================================
    // Bind values
    // ========================================================================

    #[test]
    fn test_bind_list_expands_placeholders() {
        let sql = render(
            "select * from t where name in /*names*/('a', 'b')",
            json!({"names": ["x", "y", "z"]}),
        );
        assert_eq!(sql.text, "select * from t where name in (?, ?, ?)");
        assert_eq!(sql.log, "select * from t where name in ('x', 'y', 'z')");
        assert_eq!(values(&sql), vec![Value::from("x"), Value::from("y"), Value::from("z")]);
        assert!(sql.values.iter().all(|t| t.ty == ValueType::String));
    }

    #[test]
    fn test_bind_empty_list_is_null() {
        let sql = render("where name in /*names*/('a')", json!({"names": []}));
        assert_eq!(sql.text, "where name in (null)");
        assert!(sql.values.is_empty());
    }

    #[test]
    fn test_bind_null_uses_unknown_type() {
        let sql = render("where name = /*name*/'x'", json!({}));
        assert_eq!(sql.text, "where name = ?");
        assert_eq!(sql.values, vec![TypedValue::null()]);
        assert_eq!(sql.log, "where name = null");
    }

    #[test]
    fn test_bind_null_keeps_declared_type() {
        let mut params = Parameters::new();
        params.insert_typed("name", Value::Null, ValueType::String);
        let sql = compile("where name = /*name*/'x'").render(&params).unwrap();
        assert_eq!(sql.values, vec![TypedValue::new(Value::Null, ValueType::String)]);
    }

    #[test]
    fn test_dollar_placeholders() {
        let template = compile(
            "where a = /*a*/1 /*%if false*/and b = /*b*/2/*%end*/ and c in /*c*/(3)",
        );
        let params = ctx(json!({"a": 1, "b": 2, "c": [3, 4]}));
        let sql = Renderer::new()
            .with_placeholder(Placeholder::Dollar)
            .render(&template, &params)
            .unwrap();
        assert_eq!(sql.text, "where a = $1  and c in ($2, $3)");
        assert_eq!(values(&sql), vec![Value::Int(1), Value::Int(3), Value::Int(4)]);
    }

    // ========================================================================
    // Literal and embedded values
    // ========================================================================

    #[test]
    fn test_literal_value_never_binds() {
        let sql = render("where name = /*^name*/'test'", json!({"name": "aaa"}));
        assert_eq!(sql.text, "where name = 'aaa'");
        assert_eq!(sql.log, "where name = 'aaa'");
        assert!(sql.values.is_empty());
    }

    #[test]
    fn test_literal_value_kinds() {
        let sql = render(
            "/*^n*/0 /*^ids*/(0) /*^none*/(0) /*^flag*/true",
            json!({"n": 42, "ids": [1, "a"], "none": [], "flag": false}),
        );
        assert_eq!(sql.text, "42 (1, 'a') (null) false");
    }

    #[test]
    fn test_literal_value_rejects_quotes() {
        let err = render_err("where name = /*^name*/'x'", json!({"name": "o'brien"}));
        assert!(matches!(err, TemplateError::Eval { .. }));
        assert_eq!(err.location().column, 14);
    }

    #[test]
    fn test_embedded_value() {
        let sql = render("select * from t /*# order */", json!({"order": "order by id"}));
        assert_eq!(sql.text, "select * from t order by id");

        let sql = render("select * from t /*# order */", json!({}));
        assert_eq!(sql.text, "select * from t ");
    }

    #[test]
    fn test_embedded_value_sets_available() {
        let sql = render("select * from t where /*# cond */", json!({"cond": "x = 1"}));
        assert_eq!(sql.text, "select * from t where x = 1");

        let sql = render("select * from t where /*# cond */", json!({"cond": ""}));
        assert_eq!(sql.text, "select * from t ");
    }

    #[test]
    fn test_embedded_list_is_type_error() {
        let err = render_err("/*# cols */", json!({"cols": ["a"]}));
        assert!(matches!(err, TemplateError::Type { .. }));
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    #[test]
    fn test_if_branches_are_exclusive() {
        let source = "/*%if n > 10*/big/*%elseif n > 5*/medium/*%else*/small/*%end*/";
        assert_eq!(render(source, json!({"n": 20})).text, "big");
        assert_eq!(render(source, json!({"n": 7})).text, "medium");
        assert_eq!(render(source, json!({"n": 1})).text, "small");
    }

    #[test]
    fn test_if_without_else_renders_nothing() {
        assert_eq!(render("a/*%if false*/b/*%end*/c", json!({})).text, "ac");
    }

    #[test]
    fn test_if_requires_bool() {
        let err = render_err("/*%if name*/x/*%end*/", json!({"name": "aaa"}));
        assert!(matches!(err, TemplateError::Type { .. }));
        assert!(err.message().contains("must be a bool"));
    }

    #[test]
    fn test_for_loop() {
        let sql = render(
            "select name, age from person where /*%for i in list*/age = /*i*/0 /*%if i_has_next*//*# \"or\" */ /*%end*//*%end*/",
            json!({"list": [1, 2, 3]}),
        );
        assert_eq!(
            sql.text,
            "select name, age from person where age = ? or age = ? or age = ? "
        );
        assert_eq!(values(&sql), vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn test_for_loop_index() {
        let sql = render(
            "/*%for c in cols*//*# c */ /*# c_index */;/*%end*/",
            json!({"cols": ["a", "b"]}),
        );
        assert_eq!(sql.text, "a 0;b 1;");
    }

    #[test]
    fn test_for_loop_restores_bindings() {
        let sql = render(
            "/*%for i in outer*//*%for i in inner*//*# i */,/*%end*//*# i */;/*%end*/ /*# i */",
            json!({"outer": ["x", "y"], "inner": [1, 2], "i": "top"}),
        );
        assert_eq!(sql.text, "1,2,x;1,2,y; top");
    }

    #[test]
    fn test_for_over_empty_list_keeps_availability() {
        let sql = render("select * from t where /*%for i in l*/x/*%end*/", json!({"l": []}));
        assert_eq!(sql.text, "select * from t ");
    }

    #[test]
    fn test_for_requires_list() {
        let err = render_err("/*%for i in n*/x/*%end*/", json!({"n": 3}));
        assert!(matches!(err, TemplateError::Type { .. }));
    }

    // ========================================================================
    // Expand
    // ========================================================================

    #[test]
    fn test_expand_columns() {
        let template = compile("select /*%expand*/* from emp e, /*%expand \"e\"*/* x");
        let columns = StaticColumns::new(["id", "name"]);
        let sql = Renderer::new()
            .with_expander(&columns)
            .render(&template, &Parameters::new())
            .unwrap();
        assert_eq!(sql.text, "select id, name from emp e, e.id, e.name x");
    }

    #[test]
    fn test_expand_errors() {
        let template = compile("select /*%expand*/* from emp");
        let err = template.render(&Parameters::new()).unwrap_err();
        assert!(matches!(err, TemplateError::Eval { .. }));

        let empty = StaticColumns::default();
        let err = Renderer::new()
            .with_expander(&empty)
            .render(&template, &Parameters::new())
            .unwrap_err();
        assert!(err.message().contains("no columns"));

        let template = compile("select /*%expand alias*/* from emp");
        let columns = StaticColumns::new(["id"]);
        let err = Renderer::new()
            .with_expander(&columns)
            .render(&template, &ctx(json!({"alias": 1})))
            .unwrap_err();
        assert!(matches!(err, TemplateError::Type { .. }));
    }

    // ========================================================================
    // Collaborators
    // ========================================================================

    struct UpperFormatter;

    impl ValueFormatter for UpperFormatter {
        fn format(&self, value: &Value, _ty: ValueType) -> String {
            format!("<{}>", value.to_string().to_uppercase())
        }
    }

    #[test]
    fn test_free_render_function_uses_formatter_for_log() {
        let ast = crate::parser::compile("where a = /*a*/0 and b = /*^b*/0").unwrap();
        let params = ctx(json!({"a": "x", "b": true}));
        let sql = super::render(&ast, &params, &UpperFormatter, None).unwrap();
        assert_eq!(sql.text, "where a = ? and b = <TRUE>");
        assert_eq!(sql.log, "where a = <X> and b = <TRUE>");
    }

    struct FixedEvaluator;

    impl ExpressionEvaluator for FixedEvaluator {
        fn evaluate(
            &self,
            expression: &str,
            _context: &EvaluationContext<'_>,
        ) -> Result<TypedValue, ExpressionError> {
            Ok(TypedValue::inferred(expression.len() as i64))
        }
    }

    #[test]
    fn test_custom_evaluator() {
        let template = compile("x = /*abc*/0");
        let sql = Renderer::new()
            .with_evaluator(&FixedEvaluator)
            .render(&template, &Parameters::new())
            .unwrap();
        assert_eq!(values(&sql), vec![Value::Int(3)]);
    }

    #[test]
    fn test_comment_that_is_not_a_directive() {
        // `1` cannot start an expression, so this stays a comment
        let sql = render("a = /*1 +*/0", json!({}));
        assert_eq!(sql.text, "a = /*1 +*/0");
    }

    #[test]
    fn test_expression_errors_carry_directive_location() {
        let err = render_err("select *\nfrom t where a = /*a +*/0", json!({}));
        assert!(matches!(err, TemplateError::Eval { .. }));
        assert_eq!((err.location().line, err.location().column), (2, 18));
    }
}
