/*
 * property_tests.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Property tests for placeholder numbering and pass-through of plain SQL.
 */

use proptest::prelude::*;
use twoway_sql::{Parameters, Placeholder, Renderer, SqlTemplate, Value};

/// One optional condition of a generated `where` clause.
#[derive(Debug, Clone)]
enum Condition {
    /// `/*%if on*/and c = /*v*/0/*%end*/`
    Scalar { on: bool, value: i64 },
    /// `/*%if on*/and c in /*v*/(0)/*%end*/`
    List { on: bool, values: Vec<i64> },
}

fn condition() -> impl Strategy<Value = Condition> {
    prop_oneof![
        (any::<bool>(), any::<i64>()).prop_map(|(on, value)| Condition::Scalar { on, value }),
        (any::<bool>(), prop::collection::vec(any::<i64>(), 0..5))
            .prop_map(|(on, values)| Condition::List { on, values }),
    ]
}

/// Build a template and its parameters from generated conditions.
fn build(conditions: &[Condition]) -> (String, Parameters) {
    let mut source = String::from("select * from t where 1 = 1");
    let mut params = Parameters::new();
    for (i, condition) in conditions.iter().enumerate() {
        let (on, value, clause) = match condition {
            Condition::Scalar { on, value } => (*on, Value::from(*value), "="),
            Condition::List { on, values } => (*on, Value::from(values.clone()), "in"),
        };
        source.push_str(&format!(
            " /*%if on{i}*/and c{i} {clause} /*v{i}*/(0)/*%end*/"
        ));
        params.insert(format!("on{i}"), on);
        params.insert(format!("v{i}"), value);
    }
    (source, params)
}

fn expected_values(conditions: &[Condition]) -> Vec<Value> {
    let mut expected = Vec::new();
    for condition in conditions {
        match condition {
            Condition::Scalar { on: true, value } => expected.push(Value::Int(*value)),
            Condition::List { on: true, values } => {
                expected.extend(values.iter().map(|v| Value::Int(*v)))
            }
            _ => {}
        }
    }
    expected
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn question_placeholders_match_values(conditions in prop::collection::vec(condition(), 0..6)) {
        let (source, params) = build(&conditions);
        let template = SqlTemplate::compile(&source).unwrap();
        let sql = template.render(&params).unwrap();

        prop_assert_eq!(sql.text.matches('?').count(), sql.values.len());
        let values: Vec<_> = sql.values.into_iter().map(|t| t.value).collect();
        prop_assert_eq!(values, expected_values(&conditions));
    }

    #[test]
    fn dollar_placeholders_are_sequential(conditions in prop::collection::vec(condition(), 0..6)) {
        let (source, params) = build(&conditions);
        let template = SqlTemplate::compile(&source).unwrap();
        let sql = Renderer::new()
            .with_placeholder(Placeholder::Dollar)
            .render(&template, &params)
            .unwrap();

        let numbers: Vec<usize> = sql
            .text
            .split('$')
            .skip(1)
            .map(|rest| {
                let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
                digits.parse().unwrap()
            })
            .collect();
        let expected: Vec<usize> = (1..=sql.values.len()).collect();
        prop_assert_eq!(numbers, expected);
    }

    #[test]
    fn plain_sql_renders_unchanged(
        words in prop::collection::vec(
            prop::sample::select(vec!["a", "b1", "t.c", "42", "=", ",", "'x y'", "-- note\n", "/*+ c */"]),
            1..12,
        )
    ) {
        let source = words.join(" ");
        let template = SqlTemplate::compile(&source).unwrap();
        let sql = template.render(&Parameters::new()).unwrap();

        prop_assert_eq!(&sql.text, &source);
        prop_assert_eq!(&sql.log, &source);
        prop_assert!(sql.values.is_empty());
    }
}
