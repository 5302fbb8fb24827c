//! Groups declarations into modules and lays those out as files.
//!
//! Nothing here touches the file system: the assembler returns
//! [`PlannedFile`]s (relative path plus module declaration) and the
//! orchestrator renders and writes them in order.

pub(crate) mod resource_packages;
pub(crate) mod schema_packages;

use std::path::PathBuf;

use crate::generator::{ast::ModuleDecl, codegen::SourceRenderer, metrics::GenerationStats};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlannedFile {
  /// Relative to the package output directory.
  pub path: PathBuf,
  pub module: ModuleDecl,
}

#[derive(Debug, Default)]
pub(crate) struct PackagePlan {
  pub files: Vec<PlannedFile>,
  pub stats: GenerationStats,
}

impl PackagePlan {
  pub(crate) fn extend(&mut self, other: Self) {
    self.files.extend(other.files);
    self.stats.merge(other.stats);
  }

  #[cfg(test)]
  pub(crate) fn file(&self, path: &str) -> Option<&PlannedFile> {
    self.files.iter().find(|file| file.path == PathBuf::from(path))
  }
}

/// `a.b.c` -> `a/b/c.py`.
pub(crate) fn module_file_path(segments: &[String], renderer: &dyn SourceRenderer) -> PathBuf {
  let mut path = PathBuf::new();
  if let Some((last, dirs)) = segments.split_last() {
    for dir in dirs {
      path.push(dir);
    }
    path.push(format!("{last}{}", renderer.file_extension()));
  }
  path
}

/// Marker (or index) file of the package at `segments`.
pub(crate) fn package_marker_path(segments: &[String], renderer: &dyn SourceRenderer) -> Option<PathBuf> {
  let marker = renderer.package_marker()?;
  let mut path = PathBuf::new();
  for segment in segments {
    path.push(segment);
  }
  path.push(marker);
  Some(path)
}

#[cfg(test)]
mod tests;
