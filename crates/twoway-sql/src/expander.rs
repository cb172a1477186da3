/*
 * expander.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Column expansion for `/*%expand*/*`.

/// Supplies the explicit column list that replaces a `*` wildcard.
///
/// `prefix` is empty or a table alias followed by `.`; every returned column
/// should already carry it.
pub trait ColumnExpander: Send + Sync {
    fn expand(&self, prefix: &str) -> Vec<String>;
}

impl<F> ColumnExpander for F
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    fn expand(&self, prefix: &str) -> Vec<String> {
        self(prefix)
    }
}

/// A fixed column list, qualified with the prefix on expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticColumns {
    columns: Vec<String>,
}

impl StaticColumns {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl ColumnExpander for StaticColumns {
    fn expand(&self, prefix: &str) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| format!("{prefix}{column}"))
            .collect()
    }
}
