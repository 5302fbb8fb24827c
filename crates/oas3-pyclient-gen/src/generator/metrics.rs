use strum::Display;

use crate::generator::ast::SchemaDecl;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub types_generated: usize,
  pub records_generated: usize,
  pub aliases_generated: usize,
  pub operations_converted: usize,
  pub classes_generated: usize,
  pub files_written: usize,
  pub cycles_detected: usize,
  pub cycle_details: Vec<Vec<String>>,
  pub warnings: Vec<GenerationWarning>,
}

impl GenerationStats {
  pub fn record_schema(&mut self, decl: &SchemaDecl) {
    self.types_generated += 1;
    match decl {
      SchemaDecl::Record(_) => self.records_generated += 1,
      SchemaDecl::Alias(_) => self.aliases_generated += 1,
    }
  }

  pub fn record_operations(&mut self, count: usize) {
    self.operations_converted += count;
  }

  pub fn record_class(&mut self) {
    self.classes_generated += 1;
  }

  pub fn record_file(&mut self) {
    self.files_written += 1;
  }

  pub fn record_cycle(&mut self, cycle: Vec<String>) {
    self.cycles_detected += 1;
    self.cycle_details.push(cycle);
  }

  pub fn record_cycles(&mut self, cycles: Vec<Vec<String>>) {
    for cycle in cycles {
      self.record_cycle(cycle);
    }
  }

  pub fn record_warning(&mut self, warning: GenerationWarning) {
    self.warnings.push(warning);
  }

  pub fn record_warnings(&mut self, warnings: impl IntoIterator<Item = GenerationWarning>) {
    self.warnings.extend(warnings);
  }

  /// Folds the counters and warnings of a sub-run into this one.
  pub fn merge(&mut self, other: Self) {
    self.types_generated += other.types_generated;
    self.records_generated += other.records_generated;
    self.aliases_generated += other.aliases_generated;
    self.operations_converted += other.operations_converted;
    self.classes_generated += other.classes_generated;
    self.files_written += other.files_written;
    self.record_cycles(other.cycle_details);
    self.warnings.extend(other.warnings);
  }

  pub fn skipped_count(&self) -> usize {
    self.warnings.iter().filter(|warning| warning.is_skipped_item()).count()
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GenerationWarning {
  #[strum(to_string = "Failed to convert schema '{schema_name}': {error}")]
  SchemaConversionFailed { schema_name: String, error: String },
  #[strum(to_string = "Failed to convert operation '{method} {path}': {error}")]
  OperationConversionFailed {
    method: String,
    path: String,
    error: String,
  },
  #[strum(to_string = "Unsupported HTTP method '{method}' under '{path}'")]
  UnsupportedMethod { path: String, method: String },
  #[strum(to_string = "Failed to generate class '{class_name}': {error}")]
  ClassGenerationFailed { class_name: String, error: String },
  #[strum(to_string = "[{class_name}] method '{method_name}' already defined, dropping '{method} {path}'")]
  DuplicateMethodName {
    class_name: String,
    method_name: String,
    method: String,
    path: String,
  },
  #[strum(to_string = "Formatter failed on '{file}': {error}")]
  FormatterFailed { file: String, error: String },
}

impl GenerationWarning {
  pub fn is_skipped_item(&self) -> bool {
    matches!(
      self,
      Self::SchemaConversionFailed { .. }
        | Self::OperationConversionFailed { .. }
        | Self::UnsupportedMethod { .. }
        | Self::ClassGenerationFailed { .. }
        | Self::DuplicateMethodName { .. }
    )
  }
}
