/*
 * params.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Parameter loading for the command line.
 */

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use twoway_sql::{Parameters, Value};

/// Build the parameter set from an optional JSON file and `NAME=VALUE`
/// assignments. Assignments override values from the file.
pub fn collect(file: Option<&Path>, assignments: &[String]) -> Result<Parameters> {
    let mut params = match file {
        Some(path) => load_file(path)?,
        None => Parameters::new(),
    };
    for assignment in assignments {
        let (name, value) = parse_assignment(assignment)?;
        params.insert(name, value);
    }
    Ok(params)
}

/// Load a JSON object whose members become parameters.
pub fn load_file(path: &Path) -> Result<Parameters> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameters file: {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Invalid JSON in parameters file: {}", path.display()))?;
    match json {
        serde_json::Value::Object(map) => Ok(Parameters::from(map)),
        _ => bail!(
            "Parameters file must contain a JSON object: {}",
            path.display()
        ),
    }
}

/// Parse `NAME=VALUE`. The value is read as JSON when it parses as JSON,
/// and taken as a plain string otherwise, so `-P name=aaa` works unquoted.
pub fn parse_assignment(assignment: &str) -> Result<(String, Value)> {
    let Some((name, raw)) = assignment.split_once('=') else {
        bail!("Expected NAME=VALUE, got `{}`", assignment);
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("Missing parameter name in `{}`", assignment);
    }
    let value = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) => Value::from(json),
        Err(_) => Value::String(raw.to_string()),
    };
    Ok((name.to_string(), value))
}
