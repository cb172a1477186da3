/*
 * diagnostics.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Source-context error reports for template errors.
 */

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use twoway_sql::TemplateError;

/// Render `err` as a report that points into `source`.
///
/// Falls back to the plain error message if the report cannot be written.
pub fn render_report(name: &str, source: &str, err: &TemplateError, color: bool) -> String {
    let len = source.chars().count();
    let start = err.location().char_offset().min(len);
    let end = (start + 1).min(len);

    let mut output = Vec::new();
    let written = Report::build(ReportKind::Error, name, start)
        .with_config(Config::default().with_color(color))
        .with_message(err.kind_name())
        .with_label(
            Label::new((name, start..end))
                .with_message(err.message())
                .with_color(Color::Red),
        )
        .finish()
        .write((name, Source::from(source)), &mut output);

    match written {
        Ok(()) => String::from_utf8_lossy(&output).into_owned(),
        Err(_) => err.to_string(),
    }
}
