use std::{path::PathBuf, sync::Arc};

use indexmap::IndexMap;
use serde_json::json;

use super::super::resource_packages::{
  build_facade_module, mapped_operations, plan_path_resource, plan_resource_package,
};
use crate::generator::{
  CodegenConfig,
  ast::{HttpMethod, ImportDecl, ModuleItem},
  codegen::{PythonRenderer, SourceRenderer},
  mapping::{MappingStore, MappingTable},
  metrics::GenerationWarning,
  schema_node::SchemaNode,
  tests::fixtures::{entry, widgets_document, widgets_json, widgets_mapping},
};

const WIDGETS_RESOURCE: &str = "\
# This file is generated from an OpenAPI document. Do not edit by hand.

from __future__ import annotations

from typing import Iterator

from api_client.resources.base import BaseResource
from api_client.schemas import Widget


class WidgetsResource(BaseResource):
    \"\"\"Resource class for the following API paths:

        /widgets
        /widgets/{id}
    \"\"\"

    def get(self, id: int) -> Widget:
        \"\"\"Fetch a widget.

        Args:
            id: No description available.

        Returns:
            The widget.
        \"\"\"
        return self._request(method='GET', sub_path=f'/widgets/{id}')

    def list(self) -> Iterator[Widget]:
        \"\"\"List widgets.

        Returns:
            An iterator of items from A page of widgets.
        \"\"\"
        return self._iter_request(method='GET', sub_path='/widgets')
";

fn renderer() -> PythonRenderer {
  PythonRenderer::new(&CodegenConfig::default())
}

#[test]
fn test_resource_module_source() {
  let config = CodegenConfig::default();
  let plan = plan_resource_package(&widgets_mapping(), &widgets_document(), &config, &renderer());
  let file = plan.file("resources/widgets_resource.py").unwrap();
  assert_eq!(renderer().render_module(&file.module), WIDGETS_RESOURCE);
}

#[test]
fn test_facade_comes_last() {
  let config = CodegenConfig::default();
  let plan = plan_resource_package(&widgets_mapping(), &widgets_document(), &config, &renderer());
  let paths = plan.files.iter().map(|file| file.path.clone()).collect::<Vec<_>>();
  assert_eq!(
    paths,
    vec![
      PathBuf::from("resources/widgets_resource.py"),
      PathBuf::from("resources/__init__.py")
    ]
  );
  assert_eq!(plan.stats.classes_generated, 1);
  assert_eq!(plan.stats.operations_converted, 2);
}

#[test]
fn test_facade_module_is_sorted() {
  let config = CodegenConfig::default();
  let module = build_facade_module(
    &[
      ("WidgetsResource".to_string(), "widgets_resource".to_string()),
      ("AccountsResource".to_string(), "accounts_resource".to_string()),
    ],
    &config,
  );
  assert_eq!(
    module.imports,
    vec![
      ImportDecl::new("api_client.resources.accounts_resource", ["AccountsResource"]),
      ImportDecl::new("api_client.resources.widgets_resource", ["WidgetsResource"]),
    ]
  );

  let [ModuleItem::Facade(facade), ModuleItem::Exports(exports)] = module.items.as_slice() else {
    panic!("expected a facade followed by exports");
  };
  let accessors = facade
    .accessors
    .iter()
    .map(|accessor| accessor.name.as_str())
    .collect::<Vec<_>>();
  assert_eq!(accessors, vec!["accounts", "widgets"]);
  assert_eq!(exports, &["AccountsResource", "WidgetsResource", "ResourcesMixin"]);
}

#[test]
fn test_empty_mapping_still_writes_facade() {
  let store = MappingStore::from_table("mapping.json", MappingTable::new());
  let config = CodegenConfig::default();
  let plan = plan_resource_package(&store, &widgets_document(), &config, &renderer());
  assert_eq!(plan.files.len(), 1);
  let source = renderer().render_module(&plan.files[0].module);
  assert!(source.contains("class ResourcesMixin:\n"));
  assert!(source.contains("__all__ = [\n    'ResourcesMixin',\n]\n"));
}

#[test]
fn test_stale_mapping_entries_are_ignored() {
  let mut store = widgets_mapping();
  store.insert("/gone", HttpMethod::Get, entry("GoneResource", "get"));
  store.insert(
    "/widgets",
    HttpMethod::Delete,
    entry("WidgetsResource", "clear"),
  );

  let classes = mapped_operations(&store, &widgets_document());
  assert_eq!(classes.len(), 1);
  let (class_name, operations) = &classes[0];
  assert_eq!(class_name, "WidgetsResource");
  let names = operations.iter().map(|op| op.method_name.as_str()).collect::<Vec<_>>();
  assert_eq!(names, vec!["get", "list"]);
}

#[test]
fn test_class_without_convertible_operations_is_skipped() {
  let mut document = widgets_json();
  document["paths"]["/tokens"] = json!({
    "get": {
      "parameters": [{ "name": "id", "in": "query", "schema": { "type": "string", "format": "uuid" } }],
      "responses": {}
    }
  });
  let document = SchemaNode::root(Arc::new(document));

  let mut table = widgets_mapping().table().clone();
  table.insert(
    "/tokens".to_string(),
    IndexMap::from([("get".to_string(), entry("TokensResource", "list"))]),
  );
  let store = MappingStore::from_table("mapping.json", table);

  let config = CodegenConfig::default();
  let plan = plan_resource_package(&store, &document, &config, &renderer());

  assert!(plan.file("resources/tokens_resource.py").is_none());
  assert!(plan.file("resources/widgets_resource.py").is_some());
  assert_eq!(plan.stats.classes_generated, 1);
  assert!(matches!(
    &plan.stats.warnings[..],
    [
      GenerationWarning::OperationConversionFailed { .. },
      GenerationWarning::ClassGenerationFailed { class_name, .. },
    ] if class_name == "TokensResource"
  ));

  let facade = renderer().render_module(&plan.file("resources/__init__.py").unwrap().module);
  assert!(!facade.contains("TokensResource"));
}

#[test]
fn test_path_resource_for_root_path() {
  let document = SchemaNode::root(Arc::new(json!({
    "paths": {
      "/": { "get": { "summary": "Service status.", "responses": {} } }
    }
  })));
  let store = MappingStore::from_table("mapping.json", MappingTable::new());
  let config = CodegenConfig::default();
  let plan = plan_path_resource(&store, &document, "/", &config, &renderer()).unwrap();

  assert_eq!(plan.files[0].path, PathBuf::from("resources/root_resource.py"));
  let source = renderer().render_module(&plan.files[0].module);
  assert!(source.contains("class RootResource(BaseResource):\n"));
  assert!(source.contains("    def list(self) -> None:\n"));
  assert!(source.contains("        self._request(method='GET', sub_path='/')\n"));
}

#[test]
fn test_path_resource_prefers_mapped_class() {
  let config = CodegenConfig::default();
  let plan = plan_path_resource(&widgets_mapping(), &widgets_document(), "/widgets", &config, &renderer()).unwrap();
  let [ModuleItem::Class(class)] = plan.files[0].module.items.as_slice() else {
    panic!("expected one class");
  };
  assert_eq!(class.name, "WidgetsResource");
  assert_eq!(class.methods[0].name, "list");
  assert!(plan_path_resource(&widgets_mapping(), &widgets_document(), "/nope", &config, &renderer()).is_none());
}

#[test]
fn test_unsupported_verbs_are_reported() {
  let document = SchemaNode::root(Arc::new(json!({
    "paths": {
      "/ping": {
        "get": { "responses": {} },
        "trace": { "responses": {} }
      }
    }
  })));
  let mut table = MappingTable::new();
  table.insert(
    "/ping".to_string(),
    IndexMap::from([("get".to_string(), entry("PingResource", "list"))]),
  );
  let store = MappingStore::from_table("mapping.json", table);

  let config = CodegenConfig::default();
  let plan = plan_resource_package(&store, &document, &config, &renderer());

  assert!(plan.file("resources/ping_resource.py").is_some());
  assert_eq!(
    plan.stats.warnings,
    vec![GenerationWarning::UnsupportedMethod {
      path: "/ping".to_string(),
      method: "trace".to_string(),
    }]
  );
  assert_eq!(plan.stats.skipped_count(), 1);
}

fn classes_document() -> SchemaNode {
  SchemaNode::root(Arc::new(json!({
    "paths": {
      "/a": { "get": { "responses": {} } },
      "/b": { "get": { "responses": {} } },
      "/c": { "get": { "responses": {} } }
    }
  })))
}

fn classes_mapping(classes: [&str; 3]) -> MappingStore {
  let mut table = MappingTable::new();
  for (path, class_name) in ["/a", "/b", "/c"].into_iter().zip(classes) {
    table.insert(
      path.to_string(),
      IndexMap::from([("get".to_string(), entry(class_name, "list"))]),
    );
  }
  MappingStore::from_table("mapping.json", table)
}

#[test]
fn test_class_shadowing_base_module_is_skipped() {
  let config = CodegenConfig::default();
  let store = classes_mapping(["Base", "WidgetsResource", "Widgets_Resource"]);
  let plan = plan_resource_package(&store, &classes_document(), &config, &renderer());

  let paths = plan.files.iter().map(|file| file.path.clone()).collect::<Vec<_>>();
  assert_eq!(
    paths,
    vec![
      PathBuf::from("resources/widgets_resource.py"),
      PathBuf::from("resources/__init__.py")
    ]
  );
  assert_eq!(plan.stats.classes_generated, 1);
  assert_eq!(plan.stats.operations_converted, 1);

  let failed = plan
    .stats
    .warnings
    .iter()
    .map(|warning| warning.to_string())
    .collect::<Vec<_>>();
  assert_eq!(
    failed,
    vec![
      "Failed to generate class 'Base': module 'resources.base' already holds 'BaseResource'",
      "Failed to generate class 'Widgets_Resource': module 'resources.widgets_resource' already holds \
       'WidgetsResource'",
    ]
  );
}

#[test]
fn test_colliding_accessors_get_numbered() {
  let config = CodegenConfig::default();
  let store = classes_mapping(["Widgets", "WidgetsResource", "Gadgets"]);
  let plan = plan_resource_package(&store, &classes_document(), &config, &renderer());
  assert_eq!(plan.stats.classes_generated, 3);

  let facade = plan.file("resources/__init__.py").unwrap();
  let [ModuleItem::Facade(facade), _] = facade.module.items.as_slice() else {
    panic!("expected a facade followed by exports");
  };
  let accessors = facade
    .accessors
    .iter()
    .map(|accessor| (accessor.name.as_str(), accessor.class_name.as_str()))
    .collect::<Vec<_>>();
  assert_eq!(
    accessors,
    vec![
      ("gadgets", "Gadgets"),
      ("widgets", "Widgets"),
      ("widgets_2", "WidgetsResource"),
    ]
  );
}
