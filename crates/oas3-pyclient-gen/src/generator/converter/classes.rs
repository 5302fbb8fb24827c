use std::collections::{BTreeSet, HashSet};

use super::{
  methods::operation_to_method,
  operations::{OperationDescriptor, path_item_operations},
  type_resolver::{json_media_schema, paginated_items},
};
use crate::generator::{
  CodegenConfig,
  ast::{ClassDecl, Documentation, HttpMethod},
  mapping::suggest_method_name,
  metrics::GenerationWarning,
  schema_node::SchemaNode,
};

/// One operation routed to a class, with the method name it should get.
#[derive(Debug, Clone)]
pub(crate) struct MappedOperation {
  pub path: String,
  pub method: HttpMethod,
  pub node: SchemaNode,
  pub method_name: String,
}

#[derive(Debug, Clone)]
pub(crate) struct ClassOutput {
  pub decl: ClassDecl,
  /// Component schema keys referenced by the converted operations.
  pub referenced_schemas: BTreeSet<String>,
  pub operations_converted: usize,
  pub warnings: Vec<GenerationWarning>,
}

/// Builds one resource class from the operations mapped to it.
///
/// Each operation is converted on its own; one that fails is recorded as a
/// warning and left out. Methods come out sorted by name.
pub(crate) fn build_resource_class(
  class_name: &str,
  operations: &[MappedOperation],
  config: &CodegenConfig,
) -> ClassOutput {
  let mut warnings = vec![];
  let mut referenced_schemas = BTreeSet::new();
  let mut seen_names = HashSet::new();
  let mut methods = vec![];

  for mapped in operations {
    match OperationDescriptor::from_node(&mapped.path, mapped.method, mapped.node.clone()) {
      Ok(_) if seen_names.contains(mapped.method_name.as_str()) => {
        warnings.push(GenerationWarning::DuplicateMethodName {
          class_name: class_name.to_string(),
          method_name: mapped.method_name.clone(),
          method: mapped.method.as_upper(),
          path: mapped.path.clone(),
        });
      }
      Ok(op) => {
        seen_names.insert(mapped.method_name.as_str());
        referenced_schemas.extend(operation_schema_refs(&op.node));
        if op.paginated {
          referenced_schemas.extend(paginated_item_refs(&op.node));
        }
        methods.push(operation_to_method(&op, &mapped.method_name));
      }
      Err(err) => warnings.push(GenerationWarning::OperationConversionFailed {
        method: mapped.method.as_upper(),
        path: mapped.path.clone(),
        error: err.to_string(),
      }),
    }
  }

  methods.sort_by(|a, b| a.name.cmp(&b.name));

  let paths = operations
    .iter()
    .map(|mapped| mapped.path.as_str())
    .collect::<BTreeSet<_>>();
  let mut docs = Documentation::from_raw("Resource class for the following API paths:");
  docs.push_blank();
  docs.extend(paths.into_iter().map(|path| format!("    {path}")));

  ClassOutput {
    operations_converted: methods.len(),
    decl: ClassDecl {
      name: class_name.to_string(),
      base: config.base_resource_class.clone(),
      docs,
      methods,
    },
    referenced_schemas,
    warnings,
  }
}

/// Schemas referenced by an operation, including parameters inherited from
/// its path item and anything behind component `$ref`s.
fn operation_schema_refs(operation: &SchemaNode) -> BTreeSet<String> {
  let mut refs = operation.referenced_schemas(true);
  if let Some(path_item) = operation.parent() {
    refs.extend(path_item.join("parameters").referenced_schemas(true));
  }
  refs
}

/// A paginated method returns the page's item type, which the operation
/// itself only reaches through the page schema.
fn paginated_item_refs(operation: &SchemaNode) -> BTreeSet<String> {
  let Ok(content) = operation.join("responses").join("200").descend("content") else {
    return BTreeSet::new();
  };
  json_media_schema(&content)
    .and_then(|schema| paginated_items(&schema).ok().flatten())
    .map(|items| items.referenced_schemas(true))
    .unwrap_or_default()
}

/// Builds the class for a single path item: one method per valid verb, named
/// by `method_name` (or by the verb-based suggestion when it returns `None`).
/// Keys that are not HTTP verbs are reported and skipped.
pub(crate) fn resource_path_to_class_def(
  path_item: &SchemaNode,
  class_name: &str,
  mut method_name: impl FnMut(HttpMethod) -> Option<String>,
  config: &CodegenConfig,
) -> ClassOutput {
  let path = path_item.last_segment().unwrap_or_default().to_string();
  let mut invalid = vec![];
  let operations = path_item_operations(path_item, |key| invalid.push(unsupported_method(&path, key)))
    .into_iter()
    .map(|(method, node)| MappedOperation {
      path: path.clone(),
      method,
      node,
      method_name: method_name(method).unwrap_or_else(|| suggest_method_name(&path, method)),
    })
    .collect::<Vec<_>>();

  let mut output = build_resource_class(class_name, &operations, config);
  invalid.extend(output.warnings);
  output.warnings = invalid;
  output
}

/// Keys under any path item of `document` that are not HTTP verbs, in
/// document order. The mapping never holds these, so package generation
/// reports them here instead of per class.
pub(crate) fn unsupported_methods(document: &SchemaNode) -> Vec<GenerationWarning> {
  let mut warnings = vec![];
  for path_item in document.join("paths").children() {
    let path = path_item.last_segment().unwrap_or_default().to_string();
    path_item_operations(&path_item, |key| warnings.push(unsupported_method(&path, key)));
  }
  warnings
}

fn unsupported_method(path: &str, key: &str) -> GenerationWarning {
  GenerationWarning::UnsupportedMethod {
    path: path.to_string(),
    method: key.to_string(),
  }
}
