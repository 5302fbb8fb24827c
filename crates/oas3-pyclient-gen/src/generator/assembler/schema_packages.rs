use std::{
  collections::{BTreeMap, BTreeSet},
  path::PathBuf,
};

use super::{PackagePlan, PlannedFile, module_file_path, package_marker_path};
use crate::generator::{
  CodegenConfig,
  ast::{ImportDecl, ModuleDecl, ModuleItem},
  codegen::SourceRenderer,
  converter::schema_to_decl,
  metrics::{GenerationStats, GenerationWarning},
  naming::identifiers::to_module_segment,
  schema_graph::SchemaGraph,
  schema_node::{SCHEMA_COMPONENTS, SchemaNode, type_name_from_key},
};

/// A component schema with its namespace path (`["schemas", "call", "CallProto"]`).
#[derive(Debug, Clone)]
pub(crate) struct SchemaEntry {
  pub path: Vec<String>,
  pub node: SchemaNode,
}

impl SchemaEntry {
  fn module(&self) -> &[String] {
    &self.path[..self.path.len().saturating_sub(1)]
  }
}

/// Every `components.schemas` entry of the document, in declared order.
pub(crate) fn component_schemas(document: &SchemaNode, config: &CodegenConfig) -> Vec<SchemaEntry> {
  let [components, schemas] = SCHEMA_COMPONENTS;
  document
    .join(components)
    .join(schemas)
    .children()
    .into_iter()
    .filter_map(|node| {
      let path = config.schema_key_path(node.last_segment()?);
      Some(SchemaEntry { path, node })
    })
    .collect()
}

/// One module holding `nodes`, in dependency order, importing whatever the
/// members reference from other modules.
pub(crate) fn build_schema_module(
  module: &[String],
  nodes: Vec<SchemaNode>,
  config: &CodegenConfig,
) -> (ModuleDecl, GenerationStats) {
  let mut stats = GenerationStats::default();
  let graph = SchemaGraph::new(nodes);
  stats.record_cycles(graph.detect_cycles());

  let own_module = config.qualified(&module.join("."));
  let mut imports: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
  let mut items = vec![];

  for node in graph.sorted() {
    let key = node.last_segment().unwrap_or_default();
    match schema_to_decl(node) {
      Ok(decl) => {
        stats.record_schema(&decl);
        for referenced in node.referenced_schemas(false) {
          let target = config.schema_module(&referenced);
          if target != own_module {
            imports
              .entry(target)
              .or_default()
              .insert(type_name_from_key(&referenced));
          }
        }
        items.push(ModuleItem::Schema(decl));
      }
      Err(err) => stats.record_warning(GenerationWarning::SchemaConversionFailed {
        schema_name: key.to_string(),
        error: err.to_string(),
      }),
    }
  }

  let module = ModuleDecl {
    imports: imports
      .into_iter()
      .map(|(module, names)| ImportDecl::new(module, names))
      .collect(),
    items,
    ..ModuleDecl::default()
  };
  (module, stats)
}

/// Lays out every entry as a directory tree rooted at the output directory.
///
/// At each level entries are grouped by their first remaining segment. A
/// group whose members have exactly one segment left is a leaf module; deeper
/// members become a subdirectory with a package marker. A name used both ways
/// keeps its leaf declarations in the marker file. The root gets no marker.
pub(crate) fn plan_schema_package(
  entries: Vec<SchemaEntry>,
  config: &CodegenConfig,
  renderer: &dyn SourceRenderer,
) -> PackagePlan {
  let mut plan = PackagePlan::default();
  plan_level(&[], entries, config, renderer, &mut plan);
  plan
}

#[derive(Default)]
struct Group {
  leaves: Vec<SchemaNode>,
  nested: Vec<SchemaEntry>,
}

fn plan_level(
  prefix: &[String],
  entries: Vec<SchemaEntry>,
  config: &CodegenConfig,
  renderer: &dyn SourceRenderer,
  plan: &mut PackagePlan,
) {
  let mut groups: BTreeMap<String, Group> = BTreeMap::new();
  for entry in entries {
    let Some((head, rest)) = entry.path.split_first() else { continue };
    let group = groups.entry(head.clone()).or_default();
    match rest.len() {
      0 => {}
      1 => group.leaves.push(entry.node),
      _ => group.nested.push(SchemaEntry {
        path: rest.to_vec(),
        node: entry.node,
      }),
    }
  }

  for (head, group) in groups {
    let mut segments = prefix.to_vec();
    segments.push(head);

    if group.nested.is_empty() {
      if !group.leaves.is_empty() {
        push_module(&segments, group.leaves, module_file_path(&segments, renderer), config, plan);
      }
      continue;
    }

    match package_marker_path(&segments, renderer) {
      Some(marker) if group.leaves.is_empty() => plan.files.push(PlannedFile {
        path: marker,
        module: ModuleDecl::default(),
      }),
      Some(marker) => push_module(&segments, group.leaves, marker, config, plan),
      None if !group.leaves.is_empty() => {
        push_module(&segments, group.leaves, module_file_path(&segments, renderer), config, plan);
      }
      None => {}
    }
    plan_level(&segments, group.nested, config, renderer, plan);
  }
}

fn push_module(
  segments: &[String],
  nodes: Vec<SchemaNode>,
  path: PathBuf,
  config: &CodegenConfig,
  plan: &mut PackagePlan,
) {
  let (module, stats) = build_schema_module(segments, nodes, config);
  plan.stats.merge(stats);
  plan.files.push(PlannedFile { path, module });
}

/// The single module `module` (dotted, relative to the package), or `None`
/// when no schema lives there.
pub(crate) fn plan_schema_module(
  document: &SchemaNode,
  module: &str,
  config: &CodegenConfig,
  renderer: &dyn SourceRenderer,
) -> Option<PackagePlan> {
  let segments = module.split('.').map(to_module_segment).collect::<Vec<_>>();
  let nodes = component_schemas(document, config)
    .into_iter()
    .filter(|entry| entry.module() == segments.as_slice())
    .map(|entry| entry.node)
    .collect::<Vec<_>>();
  if nodes.is_empty() {
    return None;
  }

  let mut plan = PackagePlan::default();
  push_module(&segments, nodes, module_file_path(&segments, renderer), config, &mut plan);
  Some(plan)
}
