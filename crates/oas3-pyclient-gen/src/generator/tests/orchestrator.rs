use std::{path::PathBuf, sync::Arc};

use super::fixtures::{widgets_json, widgets_mapping};
use crate::generator::{
  CodegenConfig,
  mapping::{AutoAccept, MappingStore},
  metrics::GenerationWarning,
  orchestrator::Orchestrator,
  postprocess::Formatter,
};

fn orchestrator() -> Orchestrator {
  Orchestrator::new(Arc::new(widgets_json()), CodegenConfig::default())
}

#[test]
fn test_package_writes_schemas_then_resources_then_facade() {
  let output = orchestrator().generate_package(&widgets_mapping());
  let paths = output.files.iter().map(|file| file.path.clone()).collect::<Vec<_>>();
  assert_eq!(
    paths,
    vec![
      PathBuf::from("schemas.py"),
      PathBuf::from("resources/widgets_resource.py"),
      PathBuf::from("resources/__init__.py"),
    ]
  );
}

#[test]
fn test_package_statistics() {
  let stats = orchestrator().generate_package(&widgets_mapping()).stats;
  assert_eq!(stats.records_generated, 1);
  assert_eq!(stats.aliases_generated, 0);
  assert_eq!(stats.operations_converted, 2);
  assert_eq!(stats.classes_generated, 1);
  assert_eq!(stats.files_written, 0);
  assert!(stats.warnings.is_empty());
}

#[test]
fn test_package_resource_imports_widget_from_schema_module() {
  let output = orchestrator().generate_package(&widgets_mapping());
  let resource = output.file("resources/widgets_resource.py").unwrap();
  assert!(resource.source.contains("from api_client.schemas import Widget\n"));
  assert!(resource.source.contains("from api_client.resources.base import BaseResource\n"));
  assert!(resource.source.contains("    def get(self, id: int) -> Widget:\n"));
  assert!(resource.source.contains("    def list(self) -> Iterator[Widget]:\n"));
}

#[test]
fn test_package_name_roots_every_import() {
  let orchestrator = Orchestrator::new(Arc::new(widgets_json()), CodegenConfig::builder().package_name("acme").build());
  let output = orchestrator.generate_package(&widgets_mapping());
  let facade = output.file("resources/__init__.py").unwrap();
  assert!(facade.source.contains("from acme.resources.widgets_resource import WidgetsResource\n"));
  let resource = output.file("resources/widgets_resource.py").unwrap();
  assert!(resource.source.contains("from acme.schemas import Widget\n"));
}

#[tokio::test]
async fn test_write_to_creates_the_package_tree() {
  let dir = tempfile::tempdir().unwrap();
  let mut output = orchestrator().generate_package(&widgets_mapping());
  output.write_to(dir.path(), None).await.unwrap();

  assert_eq!(output.stats.files_written, 3);
  for file in &output.files {
    let written = tokio::fs::read_to_string(dir.path().join(&file.path)).await.unwrap();
    assert_eq!(written, file.source);
  }
  assert!(!dir.path().join("__init__.py").exists());
}

#[tokio::test]
async fn test_formatter_failure_keeps_files_and_warns() {
  let dir = tempfile::tempdir().unwrap();
  let formatter = Formatter::parse("definitely-not-a-formatter-binary").unwrap();
  let mut output = orchestrator().generate_package(&widgets_mapping());
  output.write_to(dir.path(), Some(&formatter)).await.unwrap();

  assert_eq!(output.stats.files_written, 3);
  assert_eq!(output.stats.warnings.len(), 3);
  assert!(
    output
      .stats
      .warnings
      .iter()
      .all(|warning| matches!(warning, GenerationWarning::FormatterFailed { .. }))
  );
  assert_eq!(output.stats.skipped_count(), 0);
  assert!(dir.path().join("schemas.py").exists());
}

#[test]
fn test_generate_resource_for_mapped_path() {
  let output = orchestrator().generate_resource(&widgets_mapping(), "/widgets/{id}").unwrap();
  assert_eq!(output.files.len(), 1);
  assert_eq!(output.files[0].path, PathBuf::from("resources/widgets_resource.py"));

  let source = &output.files[0].source;
  assert!(source.contains("class WidgetsResource(BaseResource):"));
  assert!(source.contains("def get(self, id: int) -> Widget:"));
  assert!(!source.contains("def list"));
  assert_eq!(output.stats.operations_converted, 1);
}

#[test]
fn test_generate_resource_for_unmapped_path_uses_suggestions() {
  let store = MappingStore::from_table("mapping.json", Default::default());
  let output = orchestrator().generate_resource(&store, "/widgets").unwrap();
  let source = &output.files[0].source;
  assert!(source.contains("class WidgetsResource(BaseResource):"));
  assert!(source.contains("def list(self) -> Iterator[Widget]:"));
}

#[test]
fn test_generate_resource_for_unknown_path() {
  assert!(orchestrator().generate_resource(&widgets_mapping(), "/gadgets").is_none());
}

#[test]
fn test_generate_schema_module() {
  let output = orchestrator().generate_schema_module("schemas").unwrap();
  assert_eq!(output.files.len(), 1);
  assert!(output.files[0].source.contains("class Widget(TypedDict):"));
  assert!(orchestrator().generate_schema_module("schemas.missing").is_none());
}

#[tokio::test]
async fn test_write_single_creates_parent_directories() {
  let dir = tempfile::tempdir().unwrap();
  let target = dir.path().join("nested").join("widgets.py");
  let mut output = orchestrator().generate_schema_module("schemas").unwrap();
  output.write_single(&target, None).await.unwrap();

  let written = tokio::fs::read_to_string(&target).await.unwrap();
  assert_eq!(written, output.files[0].source);
  assert_eq!(output.stats.files_written, 1);
}

#[tokio::test]
async fn test_update_mapping_then_generate() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("mapping.json");
  tokio::fs::write(&path, "{}").await.unwrap();

  let orchestrator = orchestrator();
  let mut store = MappingStore::load(&path).await.unwrap();
  let changes = orchestrator.update_mapping(&mut store, &mut AutoAccept).await.unwrap();
  assert_eq!(changes.len(), 2);

  let persisted = MappingStore::load(&path).await.unwrap();
  assert_eq!(persisted.table(), store.table());

  let output = orchestrator.generate_package(&persisted);
  assert_eq!(output.stats.classes_generated, 1);
  let resource = output.file("resources/widgets_resource.py").unwrap();
  assert!(resource.source.contains("def get(self, id: int) -> Widget:"));
  assert!(resource.source.contains("def list(self) -> Iterator[Widget]:"));
}

#[tokio::test]
async fn test_unsupported_verb_is_never_mapped_but_always_reported() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("mapping.json");
  tokio::fs::write(&path, "{}").await.unwrap();

  let document = serde_json::json!({
    "paths": {
      "/ping": {
        "get": { "responses": {} },
        "trace": { "responses": {} }
      }
    }
  });
  let orchestrator = Orchestrator::new(Arc::new(document), CodegenConfig::default());
  let mut store = MappingStore::load(&path).await.unwrap();
  let changes = orchestrator.update_mapping(&mut store, &mut AutoAccept).await.unwrap();
  assert_eq!(changes.len(), 1);

  let expected = GenerationWarning::UnsupportedMethod {
    path: "/ping".to_string(),
    method: "trace".to_string(),
  };
  assert_eq!(orchestrator.unsupported_methods(), vec![expected.clone()]);

  let output = orchestrator.generate_package(&store);
  assert_eq!(output.stats.warnings, vec![expected]);
  assert_eq!(output.stats.skipped_count(), 1);
}
