//! dynamodb-serde CLI - decode DynamoDB export rows into typed JSON
//!
//! Reads one row per input line, the way the host's text input format
//! splits export files.

use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process;

use dynamodb_serde::{
    decompose_row, DynamoDbSerDe, JsonArrayWriter, NdjsonWriter, SerDeProperties, TypedRow,
};
use tracing_subscriber::EnvFilter;

const TIMESTAMP_FORMAT_ENV: &str = "DYNAMODB_SERDE_TIMESTAMP_FORMAT";

#[derive(Parser)]
#[command(name = "dynamodb-serde")]
#[command(version, about = "Decode DynamoDB export rows into typed columns", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct SchemaArgs {
    /// YAML file with `columns`, `columns.types` and optional `input.timestamp.format`
    #[arg(short, long, conflicts_with_all = ["columns", "types"])]
    config: Option<PathBuf>,

    /// Comma-separated column names
    #[arg(long, requires = "types")]
    columns: Option<String>,

    /// Column types, parallel to --columns (e.g. "string,int,timestamp")
    #[arg(long, requires = "columns")]
    types: Option<String>,

    /// Joda-style timestamp pattern; overrides the config file
    #[arg(short, long)]
    timestamp_format: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Ndjson,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode rows into JSON objects keyed by column name
    Decode {
        #[command(flatten)]
        schema: SchemaArgs,

        /// Input file (defaults to stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "ndjson")]
        format: OutputFormat,

        /// Stop at the first malformed row instead of skipping it
        #[arg(long)]
        fail_fast: bool,
    },

    /// Print the raw attribute map of each row
    Inspect {
        /// Input file (defaults to stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Validate a schema definition and print the resolved columns
    Validate {
        #[command(flatten)]
        schema: SchemaArgs,
    },
}

fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decode {
            schema,
            input,
            format,
            fail_fast,
        } => decode(schema, input, format, fail_fast),
        Commands::Inspect { input } => inspect(input),
        Commands::Validate { schema } => validate(schema),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Resolve properties with precedence: CLI flags > config file > environment
fn load_properties(args: SchemaArgs) -> Result<SerDeProperties, String> {
    let mut properties = match (args.config, args.columns, args.types) {
        (Some(path), _, _) => SerDeProperties::load_from_file(&path)
            .map_err(|e| format!("Failed to load {}: {}", path.display(), e))?,
        (None, Some(columns), Some(types)) => SerDeProperties::new(columns, types),
        _ => return Err("Either --config or both --columns and --types are required".to_string()),
    };

    if let Some(pattern) = args.timestamp_format {
        properties.timestamp_format = Some(pattern);
    } else if properties.timestamp_format.is_none() {
        if let Ok(pattern) = std::env::var(TIMESTAMP_FORMAT_ENV) {
            tracing::info!("Using timestamp format from {}", TIMESTAMP_FORMAT_ENV);
            properties.timestamp_format = Some(pattern);
        }
    }

    Ok(properties)
}

fn open_input(input: Option<PathBuf>) -> Result<Box<dyn BufRead>, String> {
    match input {
        Some(path) => {
            let file = File::open(&path)
                .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

/// Decode every input line and write the typed rows
fn decode(
    schema: SchemaArgs,
    input: Option<PathBuf>,
    format: OutputFormat,
    fail_fast: bool,
) -> Result<(), String> {
    let properties = load_properties(schema)?;
    let serde = DynamoDbSerDe::initialize(&properties).map_err(|e| e.to_string())?;
    let reader = open_input(input)?;

    let stdout = io::stdout();
    let mut ndjson = None;
    let mut array = None;
    match format {
        OutputFormat::Ndjson => ndjson = Some(NdjsonWriter::new(stdout.lock())),
        OutputFormat::Json => {
            array = Some(JsonArrayWriter::new(stdout.lock()).map_err(|e| e.to_string())?)
        }
    }

    let mut row = TypedRow::default();
    let mut decoded = 0usize;
    let mut skipped = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| format!("Failed to read line {}: {}", index + 1, e))?;

        if let Err(e) = serde.deserialize_into(&line, &mut row) {
            if fail_fast {
                return Err(format!("Line {}: {}", index + 1, e));
            }
            tracing::warn!("Skipping line {}: {}", index + 1, e);
            skipped += 1;
            continue;
        }

        let written = match (&mut ndjson, &mut array) {
            (Some(writer), _) => writer.write_row(serde.schema(), &row),
            (_, Some(writer)) => writer.write_row(serde.schema(), &row),
            _ => Ok(()),
        };
        written.map_err(|e| e.to_string())?;
        decoded += 1;
    }

    if let Some(mut writer) = ndjson {
        writer.flush().map_err(|e| e.to_string())?;
    }
    if let Some(writer) = array {
        writer.finish().map_err(|e| e.to_string())?;
    }

    tracing::info!("Decoded {} rows, skipped {}", decoded, skipped);
    Ok(())
}

/// Print each line's attribute map as a JSON object
fn inspect(input: Option<PathBuf>) -> Result<(), String> {
    let reader = open_input(input)?;
    let mut writer = NdjsonWriter::new(io::stdout().lock());

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| format!("Failed to read line {}: {}", index + 1, e))?;
        let attributes =
            decompose_row(&line).map_err(|e| format!("Line {}: {}", index + 1, e))?;
        writer.write(&attributes).map_err(|e| e.to_string())?;
    }

    writer.flush().map_err(|e| e.to_string())
}

/// Initialize the SerDe and print the resolved schema
fn validate(schema: SchemaArgs) -> Result<(), String> {
    let properties = load_properties(schema)?;
    let serde = DynamoDbSerDe::initialize(&properties).map_err(|e| e.to_string())?;

    println!("✓ {} columns", serde.schema().len());
    for (index, column) in serde.schema().iter().enumerate() {
        println!("  [{}] {}: {}", index, column.name, column.semantic_type);
    }
    match serde.timestamp_format().pattern() {
        Some(pattern) => println!("  timestamp format: {}", pattern),
        None => println!("  timestamp format: canonical (YYYY-MM-DD HH:MM:SS[.fraction])"),
    }

    Ok(())
}
