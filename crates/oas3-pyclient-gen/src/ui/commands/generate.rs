use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context;
use crossterm::style::Stylize;
use serde_json::Value;

use crate::{
  generator::{
    CodegenConfig,
    mapping::{MappingChange, MappingStore},
    metrics::{GenerationStats, GenerationWarning},
    naming::identifiers::is_valid_identifier,
    orchestrator::{GeneratedOutput, Orchestrator},
    postprocess::Formatter,
  },
  ui::{
    Colors, GenerateCommands,
    cli::OutputOptions,
    commands::{
      format_timestamp,
      mapping::{print_changes, run_mapping_update},
    },
  },
  utils::spec::SpecLoader,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateTarget {
  Package {
    mapping: PathBuf,
    output: PathBuf,
    interactive: bool,
  },
  Resource {
    mapping: PathBuf,
    path: String,
    output: PathBuf,
  },
  Schemas {
    module: String,
    output: PathBuf,
  },
}

impl GenerateTarget {
  fn output(&self) -> &Path {
    match self {
      Self::Package { output, .. } | Self::Resource { output, .. } | Self::Schemas { output, .. } => output,
    }
  }
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub target: GenerateTarget,
  pub input: PathBuf,
  pub codegen: CodegenConfig,
  pub formatter: Option<Formatter>,
  pub verbose: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommands) -> anyhow::Result<Self> {
    let (target, input, options) = match command {
      GenerateCommands::Package {
        source,
        mapping,
        output,
        interactive,
        options,
      } => (
        GenerateTarget::Package {
          mapping,
          output,
          interactive,
        },
        source.input,
        options,
      ),
      GenerateCommands::Resource {
        source,
        mapping,
        path,
        output,
        options,
      } => (GenerateTarget::Resource { mapping, path, output }, source.input, options),
      GenerateCommands::Schemas {
        source,
        module,
        output,
        options,
      } => (GenerateTarget::Schemas { module, output }, source.input, options),
    };

    let OutputOptions {
      package,
      formatter,
      no_format,
      verbose,
      quiet,
    } = options;

    anyhow::ensure!(
      package.split('.').all(is_valid_identifier),
      "'{package}' is not a valid Python package name"
    );
    let formatter = if no_format {
      None
    } else {
      Some(Formatter::parse(&formatter).context("formatter command is empty; use --no-format to skip formatting")?)
    };

    Ok(Self {
      target,
      input,
      codegen: CodegenConfig::builder().package_name(package).build(),
      formatter,
      verbose,
      quiet,
    })
  }

  async fn load_document(&self) -> anyhow::Result<Arc<Value>> {
    SpecLoader::open(&self.input).await?.parse()
  }
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        message.with(self.colors.primary())
      );
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {} {}",
        format!("{label:<25}").with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_loading(&self) {
    self.info(&format!("Loading OpenAPI spec from: {}", self.config.input.display()));
  }

  fn log_mapping(&self, store: &MappingStore, changes: &[MappingChange]) {
    if changes.is_empty() {
      self.info(&format!("Mapping {} is up to date", store.path().display()));
      return;
    }
    self.info(&format!(
      "Added {} entries to mapping {}",
      changes.len(),
      store.path().display()
    ));
    if self.config.verbose {
      print_changes(changes, self.colors);
    }
  }

  fn log_generating(&self) {
    let message = match &self.config.target {
      GenerateTarget::Package { .. } => "Generating Python client package...".to_string(),
      GenerateTarget::Resource { path, .. } => format!("Generating resource module for {path}..."),
      GenerateTarget::Schemas { module, .. } => format!("Generating schema module {module}..."),
    };
    self.info(&message);
  }

  fn log_writing(&self) {
    self.info(&format!("Writing to: {}", self.config.target.output().display()));
    if let Some(formatter) = &self.config.formatter {
      self.info(&format!("Formatting with: {}", formatter.program()));
    }
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    if !self.config.quiet {
      self.stat("Types generated:", stats.types_generated.to_string());
      self.stat("", format!("{} records", stats.records_generated));
      self.stat("", format!("{} aliases", stats.aliases_generated));
      self.stat("Operations converted:", stats.operations_converted.to_string());
      self.stat("Resource classes:", stats.classes_generated.to_string());
      self.stat("Files written:", stats.files_written.to_string());
      if !stats.warnings.is_empty() {
        self.stat("Warnings:", stats.warnings.len().to_string());
      }
      self.print_cycles(stats);
    }

    self.print_warnings(stats);
  }

  fn print_cycles(&self, stats: &GenerationStats) {
    if stats.cycles_detected == 0 {
      return;
    }

    self.stat("Cycles:", stats.cycles_detected.to_string());

    if self.config.verbose {
      for (i, cycle) in stats.cycle_details.iter().enumerate() {
        println!(
          "              {}: {}",
          format!("Cycle {}", i + 1).with(self.colors.accent()),
          cycle.join(" -> ").with(self.colors.info())
        );
      }
    }
  }

  /// Skipped items are always reported, `--quiet` included; advisory
  /// warnings only when verbose.
  fn reported_warnings<'s>(&self, stats: &'s GenerationStats) -> Vec<(&'static str, &'s GenerationWarning)> {
    stats
      .warnings
      .iter()
      .filter_map(|warning| {
        if warning.is_skipped_item() {
          Some(("Skipped:", warning))
        } else {
          self.config.verbose.then_some(("Warning:", warning))
        }
      })
      .collect()
  }

  fn print_warnings(&self, stats: &GenerationStats) {
    let reported = self.reported_warnings(stats);
    if reported.is_empty() {
      return;
    }

    if !self.config.quiet {
      println!();
    }
    for (label, warning) in reported {
      eprintln!(
        "{} {}",
        label.with(self.colors.accent()),
        warning.to_string().with(self.colors.primary())
      );
    }
  }

  fn log_success(&self) {
    if !self.config.quiet {
      let message = match self.config.target {
        GenerateTarget::Package { .. } => "Successfully generated Python client package",
        GenerateTarget::Resource { .. } => "Successfully generated resource module",
        GenerateTarget::Schemas { .. } => "Successfully generated schema module",
      };
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        message.with(self.colors.success())
      );
    }
  }
}

/// Runs one generation command end to end.
///
/// Skipped schemas, operations or classes do not stop generation, but the
/// command still fails afterwards so scripts notice the incomplete output.
pub async fn generate_code(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);

  logger.log_loading();
  let document = config.load_document().await?;
  let orchestrator = Orchestrator::new(document, config.codegen.clone());
  let formatter = config.formatter.as_ref();

  let output = match &config.target {
    GenerateTarget::Package {
      mapping,
      output,
      interactive,
    } => {
      let mut store = MappingStore::load(mapping).await?;
      let changes = run_mapping_update(&orchestrator, &mut store, *interactive).await?;
      logger.log_mapping(&store, &changes);

      logger.log_generating();
      let mut generated = orchestrator.generate_package(&store);
      logger.log_writing();
      generated.write_to(output, formatter).await?;
      generated
    }
    GenerateTarget::Resource { mapping, path, output } => {
      let store = MappingStore::load(mapping).await?;
      logger.log_generating();
      let generated = orchestrator
        .generate_resource(&store, path)
        .with_context(|| format!("path '{path}' is not declared in {}", config.input.display()))?;
      write_single(&logger, generated, output, formatter).await?
    }
    GenerateTarget::Schemas { module, output } => {
      logger.log_generating();
      let generated = orchestrator
        .generate_schema_module(module)
        .with_context(|| format!("no component schema lives in module '{module}'"))?;
      write_single(&logger, generated, output, formatter).await?
    }
  };

  logger.print_statistics(&output.stats);

  let skipped = output.stats.skipped_count();
  anyhow::ensure!(skipped == 0, "{skipped} item(s) were skipped during generation");

  logger.log_success();
  Ok(())
}

async fn write_single(
  logger: &GenerateLogger<'_>,
  mut generated: GeneratedOutput,
  output: &Path,
  formatter: Option<&Formatter>,
) -> anyhow::Result<GeneratedOutput> {
  logger.log_writing();
  generated.write_single(output, formatter).await?;
  Ok(generated)
}
