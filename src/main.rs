use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use jotsync::{json_to_markdown, json_to_text, markdown_to_json, text_to_json, ParseError};

#[derive(Parser)]
#[command(name = "jotsync")]
#[command(about = "Structured text / Markdown <-> JSON converter", long_about = None)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Dialect {
    /// YAML-subset structured text
    Yaml,
    /// Markdown-bullet text
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert structured text or Markdown to JSON
    ToJson {
        /// Input file path (use '-' for stdin)
        input: String,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Input dialect
        #[arg(long, value_enum, default_value_t = Dialect::Yaml)]
        dialect: Dialect,

        /// Emit compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Convert JSON to structured text or Markdown
    FromJson {
        /// Input file path (use '-' for stdin)
        input: String,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output dialect
        #[arg(long, value_enum, default_value_t = Dialect::Yaml)]
        dialect: Dialect,
    },
    /// Validate text without converting it
    Check {
        /// Input file path (use '-' for stdin)
        input: String,

        /// Input dialect
        #[arg(long, value_enum, default_value_t = Dialect::Yaml)]
        dialect: Dialect,

        /// Print a machine-readable validation report
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::ToJson {
            input,
            output,
            dialect,
            compact,
        } => run_to_json(&input, output, dialect, compact),
        Commands::FromJson {
            input,
            output,
            dialect,
        } => run_from_json(&input, output, dialect),
        Commands::Check {
            input,
            dialect,
            json,
        } => run_check(&input, dialect, json),
    }
}

fn run_to_json(
    input: &str,
    output: Option<PathBuf>,
    dialect: Dialect,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(input)?;
    tracing::debug!(bytes = text.len(), "read input");

    let value = parse_dialect(dialect, &text).map_err(|e| format_parse_error(&e))?;

    let mut rendered = if compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };
    rendered.push('\n');
    tracing::debug!(bytes = rendered.len(), "converted to JSON");
    write_output(output, &rendered)
}

fn run_from_json(
    input: &str,
    output: Option<PathBuf>,
    dialect: Dialect,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(input)?;
    tracing::debug!(bytes = text.len(), "read input");

    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| format!("Invalid JSON: {}", e))?;
    let rendered = match dialect {
        Dialect::Yaml => json_to_text(&value),
        Dialect::Markdown => json_to_markdown(&value),
    };
    tracing::debug!(bytes = rendered.len(), "rendered dialect text");
    write_output(output, &rendered)
}

fn run_check(input: &str, dialect: Dialect, as_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(input)?;

    match parse_dialect(dialect, &text) {
        Ok(_) => {
            if as_json {
                println!("{}", serde_json::json!({ "isValid": true }));
            } else {
                println!("✓ input is valid");
            }
            Ok(())
        }
        Err(err) => {
            if as_json {
                let mut report = serde_json::json!({ "isValid": false, "message": err.message });
                if let Some(line) = err.line {
                    report["line"] = line.into();
                }
                if let Some(column) = err.column {
                    report["column"] = column.into();
                }
                println!("{}", report);
            } else {
                eprintln!("{}", format_parse_error(&err));
            }
            std::process::exit(1);
        }
    }
}

fn parse_dialect(dialect: Dialect, text: &str) -> Result<serde_json::Value, ParseError> {
    match dialect {
        Dialect::Yaml => text_to_json(text),
        Dialect::Markdown => markdown_to_json(text),
    }
}

fn format_parse_error(err: &ParseError) -> String {
    match (err.line, err.column) {
        (Some(line), Some(column)) => format!("{} (line {}, column {})", err.message, line, column),
        (Some(line), None) => format!("{} (line {})", err.message, line),
        _ => err.message.clone(),
    }
}

fn read_input(input: &str) -> io::Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        fs::read_to_string(input)
    }
}

fn write_output(output: Option<PathBuf>, data: &str) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => fs::write(path, data)?,
        None => {
            io::stdout().write_all(data.as_bytes())?;
            io::stdout().flush()?;
        }
    }
    Ok(())
}
