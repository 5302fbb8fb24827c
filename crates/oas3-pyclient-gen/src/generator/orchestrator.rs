//! Entry point of the generation pipeline.
//!
//! The [`Orchestrator`] owns the parsed document and the settings, asks the
//! assembler for a file plan and renders every planned module. Writing is a
//! separate step on [`GeneratedOutput`] so callers can inspect sources first.
//!
//! ```no_run
//! # async fn example(document: std::sync::Arc<serde_json::Value>) -> anyhow::Result<()> {
//! let orchestrator = Orchestrator::new(document, CodegenConfig::default());
//! let mut store = MappingStore::load("mapping.json").await?;
//! orchestrator.update_mapping(&mut store, &mut AutoAccept).await?;
//!
//! let mut output = orchestrator.generate_package(&store);
//! output.write_to(Path::new("api_client"), Some(&Formatter::default())).await?;
//! # Ok(())
//! # }
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context;
use serde_json::Value;

use crate::generator::{
  CodegenConfig,
  assembler::{
    PackagePlan,
    resource_packages::{plan_path_resource, plan_resource_package},
    schema_packages::{component_schemas, plan_schema_module, plan_schema_package},
  },
  codegen::{PythonRenderer, SourceRenderer},
  converter::unsupported_methods,
  errors::GeneratorResult,
  mapping::{MappingChange, MappingPrompter, MappingStore},
  metrics::{GenerationStats, GenerationWarning},
  postprocess::Formatter,
  schema_node::SchemaNode,
};

/// One rendered file, relative to the package directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
  pub path: PathBuf,
  pub source: String,
}

#[derive(Debug, Default)]
pub struct GeneratedOutput {
  pub files: Vec<GeneratedFile>,
  pub stats: GenerationStats,
}

impl GeneratedOutput {
  #[cfg(test)]
  pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
    self.files.iter().find(|file| file.path == Path::new(path))
  }

  /// Writes every file under `root` in plan order, creating directories as
  /// needed, then runs `formatter` on it.
  pub async fn write_to(&mut self, root: &Path, formatter: Option<&Formatter>) -> anyhow::Result<()> {
    for file in &self.files {
      write_source(&root.join(&file.path), &file.source, formatter, &mut self.stats).await?;
    }
    Ok(())
  }

  /// Writes the only planned file to `target`, ignoring its planned path.
  pub async fn write_single(&mut self, target: &Path, formatter: Option<&Formatter>) -> anyhow::Result<()> {
    let file = self.files.first().context("nothing was generated")?;
    write_source(target, &file.source, formatter, &mut self.stats).await
  }
}

async fn write_source(
  target: &Path,
  source: &str,
  formatter: Option<&Formatter>,
  stats: &mut GenerationStats,
) -> anyhow::Result<()> {
  if let Some(parent) = target.parent()
    && !parent.as_os_str().is_empty()
  {
    tokio::fs::create_dir_all(parent)
      .await
      .with_context(|| format!("creating directory {}", parent.display()))?;
  }
  tokio::fs::write(target, source)
    .await
    .with_context(|| format!("writing {}", target.display()))?;
  stats.record_file();

  if let Some(formatter) = formatter
    && let Err(warning) = formatter.run(target).await
  {
    stats.record_warning(warning);
  }
  Ok(())
}

pub struct Orchestrator {
  document: SchemaNode,
  config: CodegenConfig,
  renderer: PythonRenderer,
}

impl Orchestrator {
  pub fn new(document: Arc<Value>, config: CodegenConfig) -> Self {
    let renderer = PythonRenderer::new(&config);
    Self {
      document: SchemaNode::root(document),
      config,
      renderer,
    }
  }

  /// Maps every endpoint the store does not know yet and persists it.
  pub async fn update_mapping(
    &self,
    store: &mut MappingStore,
    prompter: &mut impl MappingPrompter,
  ) -> GeneratorResult<Vec<MappingChange>> {
    store.update(&self.document, &self.config, prompter).await
  }

  /// Path-item keys that are not HTTP verbs. They never get a mapping entry.
  pub fn unsupported_methods(&self) -> Vec<GenerationWarning> {
    unsupported_methods(&self.document)
  }

  /// Schema package, then one module per resource class, then the facade.
  pub fn generate_package(&self, store: &MappingStore) -> GeneratedOutput {
    let mut plan = plan_schema_package(component_schemas(&self.document, &self.config), &self.config, &self.renderer);
    plan.extend(plan_resource_package(store, &self.document, &self.config, &self.renderer));
    self.render(plan)
  }

  /// The module for the class handling `path`; `None` when the document
  /// has no such path.
  pub fn generate_resource(&self, store: &MappingStore, path: &str) -> Option<GeneratedOutput> {
    plan_path_resource(store, &self.document, path, &self.config, &self.renderer).map(|plan| self.render(plan))
  }

  /// The single schema module at dotted `module`; `None` when no schema
  /// lives there.
  pub fn generate_schema_module(&self, module: &str) -> Option<GeneratedOutput> {
    plan_schema_module(&self.document, module, &self.config, &self.renderer).map(|plan| self.render(plan))
  }

  fn render(&self, plan: PackagePlan) -> GeneratedOutput {
    let files = plan
      .files
      .iter()
      .map(|planned| GeneratedFile {
        path: planned.path.clone(),
        source: self.renderer.render_module(&planned.module),
      })
      .collect();
    GeneratedOutput {
      files,
      stats: plan.stats,
    }
  }
}
