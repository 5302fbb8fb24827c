use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::colors::{ColorMode, ThemeMode};
use crate::{generator::postprocess::DEFAULT_FORMATTER, ui::Colors};

#[derive(Parser, Debug)]
#[command(name = "oas3-pyclient-gen")]
#[command(author, version, about = "OpenAPI to typed Python client generator")]
#[command(styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information from an OpenAPI specification
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Maintain the endpoint to resource class mapping file
  Mapping {
    #[command(subcommand)]
    mapping_command: MappingCommands,
  },
  /// Generate Python client code from an OpenAPI specification
  Generate {
    #[command(subcommand)]
    generate_command: GenerateCommands,
  },
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List all operations defined in the OpenAPI specification
  Operations {
    /// Path to the OpenAPI JSON or YAML specification file
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Mapping file; adds the resource class and method of each operation
    #[arg(short, long, value_name = "FILE")]
    mapping: Option<PathBuf>,
  },
}

#[derive(Subcommand, Debug)]
pub enum MappingCommands {
  /// Add entries for every operation missing from the mapping file
  Update {
    /// Path to the OpenAPI JSON or YAML specification file
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Mapping file to update (must exist; start from `{}`)
    #[arg(short, long, value_name = "FILE")]
    mapping: PathBuf,

    /// Confirm or override each suggestion on the terminal
    #[arg(long, default_value_t = false)]
    interactive: bool,
  },
}

#[derive(Subcommand, Debug)]
pub enum GenerateCommands {
  /// Generate the whole package: schemas, resource classes and the facade
  Package {
    #[command(flatten)]
    source: SourceArgs,

    /// Mapping file; updated with new operations before generating
    #[arg(short, long, value_name = "FILE")]
    mapping: PathBuf,

    /// Package directory the generated modules are written to
    #[arg(short, long, value_name = "DIR")]
    output: PathBuf,

    /// Confirm or override mapping suggestions on the terminal
    #[arg(long, default_value_t = false)]
    interactive: bool,

    #[command(flatten)]
    options: OutputOptions,
  },
  /// Generate the resource module for a single API path
  Resource {
    #[command(flatten)]
    source: SourceArgs,

    /// Mapping file used to name the class and its methods (not updated)
    #[arg(short, long, value_name = "FILE")]
    mapping: PathBuf,

    /// API path as written in the specification, e.g. `/widgets/{id}`
    #[arg(long, value_name = "API_PATH")]
    path: String,

    /// File the module is written to
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    #[command(flatten)]
    options: OutputOptions,
  },
  /// Generate a single schema module
  Schemas {
    #[command(flatten)]
    source: SourceArgs,

    /// Dotted module relative to the package, e.g. `schemas.call`
    #[arg(long, value_name = "DOTTED.MODULE")]
    module: String,

    /// File the module is written to
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    #[command(flatten)]
    options: OutputOptions,
  },
}

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
  /// Path to the OpenAPI JSON or YAML specification file
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct OutputOptions {
  /// Python package the generated imports are rooted at
  #[arg(long, value_name = "NAME", default_value = "api_client")]
  pub package: String,

  /// Formatter command run on every written file (the file path is appended)
  #[arg(long, value_name = "CMD", default_value = DEFAULT_FORMATTER)]
  pub formatter: String,

  /// Write files without running the formatter
  #[arg(long, default_value_t = false, conflicts_with = "formatter")]
  pub no_format: bool,

  /// Enable verbose output with detailed progress information
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false, conflicts_with = "verbose")]
  pub quiet: bool,
}
