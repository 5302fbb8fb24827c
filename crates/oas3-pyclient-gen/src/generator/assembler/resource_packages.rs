use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::{PackagePlan, PlannedFile, module_file_path, package_marker_path};
use crate::generator::{
  CodegenConfig,
  ast::{AccessorDecl, Documentation, FacadeDecl, ImportDecl, ModuleDecl, ModuleItem},
  codegen::SourceRenderer,
  converter::{ClassOutput, MappedOperation, build_resource_class, resource_path_to_class_def, unsupported_methods},
  mapping::{MappingStore, suggest_class_name},
  metrics::GenerationWarning,
  naming::identifiers::{accessor_name_for_class, module_name_for_class},
  schema_node::{SchemaNode, type_name_from_key},
};

/// Module declaring one resource class: the base class import, one import
/// per referenced schema module, then the class.
pub(crate) fn build_resource_module(output: &ClassOutput, config: &CodegenConfig) -> ModuleDecl {
  let mut imports = vec![ImportDecl::new(
    config.qualified(&config.base_resource_module),
    [config.base_resource_class.clone()],
  )];

  let mut schema_imports: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
  for key in &output.referenced_schemas {
    schema_imports
      .entry(config.schema_module(key))
      .or_default()
      .insert(type_name_from_key(key));
  }
  imports.extend(
    schema_imports
      .into_iter()
      .map(|(module, names)| ImportDecl::new(module, names)),
  );

  ModuleDecl {
    imports,
    items: vec![ModuleItem::Class(output.decl.clone())],
    ..ModuleDecl::default()
  }
}

/// Operations of `document` mapped to each class, skipping mapping entries
/// whose endpoint no longer exists.
pub(crate) fn mapped_operations(store: &MappingStore, document: &SchemaNode) -> Vec<(String, Vec<MappedOperation>)> {
  let paths = document.join("paths");
  store
    .classes()
    .into_iter()
    .map(|(class_name, endpoints)| {
      let operations = endpoints
        .into_iter()
        .filter_map(|(path, method, entry)| {
          let node = paths.join(path).join(method.to_string());
          node.exists().then(|| MappedOperation {
            path: path.to_string(),
            method,
            node,
            method_name: entry.method_name.clone(),
          })
        })
        .collect::<Vec<_>>();
      (class_name.to_string(), operations)
    })
    .filter(|(_, operations)| !operations.is_empty())
    .collect()
}

/// One module per mapped class plus the facade index, which comes last.
///
/// A class whose operations all fail, or whose module file would replace the
/// base resource module or another class's module, is reported and left out
/// of the facade; the other classes are unaffected.
pub(crate) fn plan_resource_package(
  store: &MappingStore,
  document: &SchemaNode,
  config: &CodegenConfig,
  renderer: &dyn SourceRenderer,
) -> PackagePlan {
  let mut plan = PackagePlan::default();
  plan.stats.record_warnings(unsupported_methods(document));

  let mut generated = vec![];
  let mut module_owners = HashMap::new();
  if let Some((package, base_module)) = config.base_resource_module.rsplit_once('.')
    && package == config.resources_package
  {
    module_owners.insert(base_module.to_string(), config.base_resource_class.clone());
  }

  for (class_name, operations) in mapped_operations(store, document) {
    let module_name = module_name_for_class(&class_name);
    if let Some(owner) = module_owners.get(&module_name) {
      plan.stats.record_warning(GenerationWarning::ClassGenerationFailed {
        class_name,
        error: format!("module '{}.{module_name}' already holds '{owner}'", config.resources_package),
      });
      continue;
    }

    let output = build_resource_class(&class_name, &operations, config);
    plan.stats.record_operations(output.operations_converted);
    plan.stats.record_warnings(output.warnings.iter().cloned());

    if output.decl.methods.is_empty() {
      plan.stats.record_warning(GenerationWarning::ClassGenerationFailed {
        class_name,
        error: "no operation could be converted".to_string(),
      });
      continue;
    }

    module_owners.insert(module_name.clone(), class_name.clone());
    plan.stats.record_class();
    plan.files.push(PlannedFile {
      path: module_file_path(&[config.resources_package.clone(), module_name.clone()], renderer),
      module: build_resource_module(&output, config),
    });
    generated.push((class_name, module_name));
  }

  if let Some(path) = package_marker_path(&[config.resources_package.clone()], renderer) {
    plan.files.push(PlannedFile {
      path,
      module: build_facade_module(&generated, config),
    });
  }

  plan
}

/// Index of the resources package: re-exports every class and defines the
/// mixin exposing each one as a cached property bound to the client.
pub(crate) fn build_facade_module(classes: &[(String, String)], config: &CodegenConfig) -> ModuleDecl {
  let mut classes = classes.to_vec();
  classes.sort();

  let imports = classes
    .iter()
    .map(|(class_name, module_name)| {
      ImportDecl::new(
        config.qualified(&format!("{}.{module_name}", config.resources_package)),
        [class_name.clone()],
      )
    })
    .collect();

  let mut used = BTreeSet::new();
  let accessors = classes
    .iter()
    .map(|(class_name, _)| {
      let base = accessor_name_for_class(class_name, &config.resource_class_suffix);
      let mut name = base.clone();
      let mut counter = 2;
      while !used.insert(name.clone()) {
        name = format!("{base}_{counter}");
        counter += 1;
      }
      AccessorDecl {
        name,
        class_name: class_name.clone(),
      }
    })
    .collect();

  let mut exports = classes.iter().map(|(class_name, _)| class_name.clone()).collect::<Vec<_>>();
  exports.push(config.facade_class_name.clone());

  ModuleDecl {
    docs: Documentation::default(),
    imports,
    items: vec![
      ModuleItem::Facade(FacadeDecl {
        name: config.facade_class_name.clone(),
        docs: Documentation::from_raw("Exposes every API resource as a lazily constructed property."),
        accessors,
      }),
      ModuleItem::Exports(exports),
    ],
  }
}

/// Module for the class that handles `path` alone, named after its mapping
/// entries (or suggestions when the path is unmapped).
pub(crate) fn plan_path_resource(
  store: &MappingStore,
  document: &SchemaNode,
  path: &str,
  config: &CodegenConfig,
  renderer: &dyn SourceRenderer,
) -> Option<PackagePlan> {
  let path_item = document.join("paths").join(path);
  if !path_item.exists() {
    return None;
  }

  let class_name = store
    .table()
    .get(path)
    .and_then(|methods| methods.values().next())
    .map_or_else(
      || suggest_class_name(store.table(), path, &config.resource_class_suffix, &config.root_resource_name),
      |entry| entry.resource_class.clone(),
    );

  let output = resource_path_to_class_def(
    &path_item,
    &class_name,
    |method| store.entry(path, method).map(|entry| entry.method_name.clone()),
    config,
  );

  let mut plan = PackagePlan::default();
  plan.stats.record_operations(output.operations_converted);
  plan.stats.record_warnings(output.warnings.iter().cloned());
  plan.stats.record_class();
  plan.files.push(PlannedFile {
    path: module_file_path(
      &[config.resources_package.clone(), module_name_for_class(&class_name)],
      renderer,
    ),
    module: build_resource_module(&output, config),
  });
  Some(plan)
}
