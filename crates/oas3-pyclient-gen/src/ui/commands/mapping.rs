use std::path::Path;

use crossterm::style::Stylize;

use crate::{
  generator::{
    CodegenConfig,
    errors::GeneratorResult,
    mapping::{AutoAccept, InteractivePrompter, MappingChange, MappingStore},
    orchestrator::Orchestrator,
  },
  ui::{Colors, commands::format_timestamp},
  utils::spec::SpecLoader,
};

/// Runs the mapping update with the terminal prompter or by accepting every
/// suggestion.
pub(crate) async fn run_mapping_update(
  orchestrator: &Orchestrator,
  store: &mut MappingStore,
  interactive: bool,
) -> GeneratorResult<Vec<MappingChange>> {
  if interactive {
    orchestrator.update_mapping(store, &mut InteractivePrompter).await
  } else {
    orchestrator.update_mapping(store, &mut AutoAccept).await
  }
}

pub(crate) fn print_changes(changes: &[MappingChange], colors: &Colors) {
  for change in changes {
    println!(
      "            {} {} {}",
      format!("{:<7}", change.method.as_upper()).with(colors.accent()),
      format!("{:<40}", change.path).with(colors.primary()),
      format!("{}.{}", change.entry.resource_class, change.entry.method_name).with(colors.value())
    );
  }
}

pub async fn update_mapping(input: &Path, mapping: &Path, interactive: bool, colors: &Colors) -> anyhow::Result<()> {
  let document = SpecLoader::open(input).await?.parse()?;
  let orchestrator = Orchestrator::new(document, CodegenConfig::default());
  let mut store = MappingStore::load(mapping).await?;

  let changes = run_mapping_update(&orchestrator, &mut store, interactive).await?;

  let summary = match changes.len() {
    0 => "Mapping is up to date".to_string(),
    1 => "Added 1 mapping entry".to_string(),
    count => format!("Added {count} mapping entries"),
  };
  println!(
    "{} {}",
    format_timestamp().with(colors.timestamp()),
    summary.with(colors.success())
  );
  print_changes(&changes, colors);

  let skipped = orchestrator.unsupported_methods();
  for warning in &skipped {
    eprintln!(
      "{} {}",
      "Skipped:".with(colors.accent()),
      warning.to_string().with(colors.primary())
    );
  }
  anyhow::ensure!(skipped.is_empty(), "{} item(s) were skipped while mapping", skipped.len());
  Ok(())
}
