/*
 * main.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Command-line front end for two-way SQL templates
 */

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use twoway_sql::{Placeholder, Renderer, SqlTemplate, StaticColumns, TemplateError, Tokenizer};

mod diagnostics;
mod params;

#[derive(Parser, Debug)]
#[command(name = "twoway-sql-cli")]
#[command(version)]
#[command(about = "Render and check two-way SQL templates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a template to parameterized SQL
    Render {
        /// Template file ('-' for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// JSON file with an object of parameters
        #[arg(short = 'p', long = "params", value_name = "JSON_FILE")]
        params_file: Option<PathBuf>,

        /// Parameter value (NAME=VALUE, VALUE is JSON or a plain string)
        #[arg(short = 'P', long = "param", value_name = "NAME=VALUE")]
        param: Vec<String>,

        /// Columns substituted for `/*%expand*/*` (comma-separated)
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Placeholder style for bound values
        #[arg(long, value_enum, default_value_t = PlaceholderArg::Question)]
        placeholder: PlaceholderArg,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Print the log rendering (values inlined) instead of the SQL text
        #[arg(long)]
        log: bool,
    },

    /// Compile templates and report errors without rendering
    Check {
        /// Template files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Print the token stream of a template
    Tokens {
        /// Template file ('-' for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print the syntax tree of a template
    Ast {
        /// Template file ('-' for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PlaceholderArg {
    /// `?`
    Question,
    /// `$1`, `$2`, ...
    Dollar,
}

impl From<PlaceholderArg> for Placeholder {
    fn from(arg: PlaceholderArg) -> Self {
        match arg {
            PlaceholderArg::Question => Placeholder::Question,
            PlaceholderArg::Dollar => Placeholder::Dollar,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "twoway_sql=warn,twoway_sql_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let ok = match cli.command {
        Commands::Render {
            input,
            params_file,
            param,
            columns,
            placeholder,
            format,
            log,
        } => {
            let params = params::collect(params_file.as_deref(), &param)?;
            let source = read_source(&input)?;
            let expander = StaticColumns::new(columns);
            let mut renderer = Renderer::new().with_placeholder(placeholder.into());
            if !expander.columns().is_empty() {
                renderer = renderer.with_expander(&expander);
            }

            let rendered = SqlTemplate::compile(&source)
                .and_then(|template| renderer.render(&template, &params));
            match rendered {
                Ok(sql) => {
                    match format {
                        OutputFormat::Text if log => println!("{}", sql.log),
                        OutputFormat::Text => println!("{}", sql.text),
                        OutputFormat::Json => println!(
                            "{}",
                            serde_json::to_string_pretty(&sql).context("Failed to serialize output")?
                        ),
                    }
                    true
                }
                Err(err) => {
                    report(&input, &source, &err);
                    false
                }
            }
        }

        Commands::Check { inputs } => {
            let mut failures = 0;
            for input in &inputs {
                let source = read_source(input)?;
                match SqlTemplate::compile(&source) {
                    Ok(_) => tracing::info!(file = %input.display(), "ok"),
                    Err(err) => {
                        report(input, &source, &err);
                        failures += 1;
                    }
                }
            }
            if failures > 0 {
                eprintln!("{} of {} templates failed to compile", failures, inputs.len());
            }
            failures == 0
        }

        Commands::Tokens { input } => {
            let source = read_source(&input)?;
            let mut ok = true;
            for token in Tokenizer::new(&source) {
                match token {
                    Ok(token) => println!(
                        "{}:{}\t{:?}\t{:?}",
                        token.location.line, token.location.column, token.kind, token.text
                    ),
                    Err(err) => {
                        report(&input, &source, &err);
                        ok = false;
                    }
                }
            }
            ok
        }

        Commands::Ast { input } => {
            let source = read_source(&input)?;
            match SqlTemplate::compile(&source) {
                Ok(template) => {
                    print!("{}", template.ast());
                    true
                }
                Err(err) => {
                    report(&input, &source, &err);
                    false
                }
            }
        }
    };

    if !ok {
        std::process::exit(1);
    }

    Ok(())
}

fn read_source(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read template from stdin")?;
        return Ok(source);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read template: {}", path.display()))
}

fn report(path: &Path, source: &str, err: &TemplateError) {
    let name = path.display().to_string();
    let color = std::io::stderr().is_terminal();
    eprint!("{}", diagnostics::render_report(&name, source, err, color));
}
