pub(crate) mod assembler;
pub(crate) mod ast;
pub(crate) mod codegen;
pub(crate) mod converter;
pub(crate) mod errors;
pub(crate) mod mapping;
pub(crate) mod metrics;
pub(crate) mod naming;
pub mod orchestrator;
pub(crate) mod postprocess;
pub(crate) mod schema_graph;
pub(crate) mod schema_node;

use self::naming::identifiers::to_module_segment;

/// Settings shared by every stage of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct CodegenConfig {
  /// Top-level Python package the generated modules live in.
  #[builder(into, default = String::from("api_client"))]
  pub package_name: String,
  /// Module for schema keys without a dotted namespace.
  #[builder(into, default = String::from("schemas"))]
  pub default_schema_module: String,
  /// Subpackage holding resource modules and the facade index.
  #[builder(into, default = String::from("resources"))]
  pub resources_package: String,
  /// Module of the base resource class, relative to the package.
  #[builder(into, default = String::from("resources.base"))]
  pub base_resource_module: String,
  #[builder(into, default = String::from("BaseResource"))]
  pub base_resource_class: String,
  #[builder(into, default = String::from("ResourcesMixin"))]
  pub facade_class_name: String,
  #[builder(into, default = String::from("_request"))]
  pub request_primitive: String,
  #[builder(into, default = String::from("_iter_request"))]
  pub paginated_request_primitive: String,
  #[builder(into, default = String::from("Resource"))]
  pub resource_class_suffix: String,
  #[builder(into, default = String::from("RootResource"))]
  pub root_resource_name: String,
}

impl Default for CodegenConfig {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl CodegenConfig {
  /// Absolute dotted path of a module inside the generated package.
  pub fn qualified(&self, module: &str) -> String {
    if module.is_empty() {
      self.package_name.clone()
    } else {
      format!("{}.{module}", self.package_name)
    }
  }

  /// Namespaced schema key: un-namespaced keys land in the default module.
  /// Namespace segments are made importable; the type name stays raw.
  pub fn schema_key_path(&self, key: &str) -> Vec<String> {
    let mut segments = key.split('.').map(String::from).collect::<Vec<_>>();
    let namespace = segments.len().saturating_sub(1);
    for segment in &mut segments[..namespace] {
      *segment = to_module_segment(segment);
    }
    if segments.len() < 2 {
      segments.insert(0, self.default_schema_module.clone());
    }
    segments
  }

  /// Dotted module that declares the schema stored under `key`.
  pub fn schema_module(&self, key: &str) -> String {
    let segments = self.schema_key_path(key);
    self.qualified(&segments[..segments.len() - 1].join("."))
  }
}

#[cfg(test)]
mod tests;
