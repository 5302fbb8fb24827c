//! Persisted assignment of `(path, method)` endpoints to resource classes.
//!
//! The table is the only source of grouping once it exists. Endpoints present
//! in the document but absent from the table get a suggested entry, which a
//! [`MappingPrompter`] may override, and the whole table is written back.

mod prompt;
mod suggest;

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use self::prompt::{AutoAccept, InteractivePrompter, MappingPrompter};
pub(crate) use self::suggest::{suggest_class_name, suggest_method_name};
use crate::generator::{
  CodegenConfig,
  ast::HttpMethod,
  converter::operations::path_item_operations,
  errors::{GeneratorError, GeneratorResult},
  schema_node::SchemaNode,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
  pub resource_class: String,
  pub method_name: String,
}

/// `path -> lowercase method -> entry`, in file order.
pub type MappingTable = IndexMap<String, IndexMap<String, MappingEntry>>;

/// An entry added by [`MappingStore::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingChange {
  pub path: String,
  pub method: HttpMethod,
  pub entry: MappingEntry,
}

#[derive(Debug, Clone)]
pub struct MappingStore {
  path: PathBuf,
  table: MappingTable,
}

impl MappingStore {
  /// Reads the table at `path`. A missing or malformed file is an error:
  /// there is no safe default grouping.
  pub async fn load(path: impl Into<PathBuf>) -> GeneratorResult<Self> {
    let path = path.into();
    let content = tokio::fs::read_to_string(&path)
      .await
      .map_err(|err| GeneratorError::MappingLoadError {
        path: path.clone(),
        reason: err.to_string(),
      })?;
    let table = serde_json::from_str::<MappingTable>(&content).map_err(|err| GeneratorError::MappingLoadError {
      path: path.clone(),
      reason: err.to_string(),
    })?;
    Ok(Self { path, table })
  }

  #[cfg(test)]
  pub fn from_table(path: impl Into<PathBuf>, table: MappingTable) -> Self {
    Self {
      path: path.into(),
      table,
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn table(&self) -> &MappingTable {
    &self.table
  }

  pub fn entry(&self, path: &str, method: HttpMethod) -> Option<&MappingEntry> {
    self.table.get(path)?.get(&method.to_string())
  }

  pub fn insert(&mut self, path: &str, method: HttpMethod, entry: MappingEntry) {
    self
      .table
      .entry(path.to_string())
      .or_default()
      .insert(method.to_string(), entry);
  }

  /// Deterministic suggestion for an endpoint, based on the current table.
  pub fn suggest(&self, path: &str, method: HttpMethod, config: &CodegenConfig) -> MappingEntry {
    MappingEntry {
      resource_class: suggest_class_name(
        &self.table,
        path,
        &config.resource_class_suffix,
        &config.root_resource_name,
      ),
      method_name: suggest_method_name(path, method),
    }
  }

  /// Endpoints under `paths` with no entry yet, in document order. Keys that
  /// are not HTTP verbs are left to `converter::unsupported_methods`.
  pub fn unmapped(&self, document: &SchemaNode) -> Vec<(String, HttpMethod)> {
    let mut missing = vec![];
    for path_item in document.join("paths").children() {
      let Some(path) = path_item.last_segment() else { continue };
      for (method, _) in path_item_operations(&path_item, |_| {}) {
        if self.entry(path, method).is_none() {
          missing.push((path.to_string(), method));
        }
      }
    }
    missing
  }

  /// Adds an entry for every unmapped endpoint and persists the table.
  ///
  /// Suggestions see the entries added earlier in the same run, so sibling
  /// paths share a class. Returns only the new entries; a second run against
  /// an unchanged document returns none and rewrites identical content.
  pub async fn update(
    &mut self,
    document: &SchemaNode,
    config: &CodegenConfig,
    prompter: &mut impl MappingPrompter,
  ) -> GeneratorResult<Vec<MappingChange>> {
    let mut changes = vec![];
    for (path, method) in self.unmapped(document) {
      let suggestion = self.suggest(&path, method, config);
      let entry = prompter.confirm(&path, method, suggestion)?;
      self.insert(&path, method, entry.clone());
      changes.push(MappingChange { path, method, entry });
    }
    self.persist().await?;
    Ok(changes)
  }

  /// Pretty-printed JSON with a trailing newline.
  pub fn to_json(&self) -> GeneratorResult<String> {
    let mut json = serde_json::to_string_pretty(&self.table).map_err(|err| self.persist_error(&err))?;
    json.push('\n');
    Ok(json)
  }

  pub async fn persist(&self) -> GeneratorResult<()> {
    let json = self.to_json()?;
    tokio::fs::write(&self.path, json)
      .await
      .map_err(|err| self.persist_error(&err))
  }

  fn persist_error(&self, err: &dyn std::error::Error) -> GeneratorError {
    GeneratorError::MappingPersistError {
      path: self.path.clone(),
      reason: err.to_string(),
    }
  }

  /// Mapped endpoints grouped by resource class, classes in first-seen order.
  pub fn classes(&self) -> IndexMap<&str, Vec<(&str, HttpMethod, &MappingEntry)>> {
    let mut classes: IndexMap<&str, Vec<_>> = IndexMap::new();
    for (path, methods) in &self.table {
      for (method, entry) in methods {
        let Ok(method) = method.parse::<HttpMethod>() else { continue };
        classes
          .entry(entry.resource_class.as_str())
          .or_default()
          .push((path.as_str(), method, entry));
      }
    }
    classes
  }
}
