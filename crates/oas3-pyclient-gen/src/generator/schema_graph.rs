use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use petgraph::{algo::kosaraju_scc, graph::DiGraph};

use crate::generator::schema_node::SchemaNode;

/// Dependency graph over one batch of component schemas, keyed by schema key.
#[derive(Debug)]
pub(crate) struct SchemaGraph {
  /// Batch members in the order they were supplied
  schemas: IndexMap<String, SchemaNode>,
  /// schema_key -> [batch members it references]
  dependencies: BTreeMap<String, BTreeSet<String>>,
}

impl SchemaGraph {
  pub(crate) fn new(nodes: impl IntoIterator<Item = SchemaNode>) -> Self {
    let schemas = nodes
      .into_iter()
      .filter_map(|node| Some((node.last_segment()?.to_string(), node)))
      .collect::<IndexMap<_, _>>();

    let mut graph = Self {
      schemas,
      dependencies: BTreeMap::new(),
    };
    graph.build_dependencies();
    graph
  }

  /// Records every `$ref` reachable inside each schema, keeping only targets
  /// that belong to this batch.
  fn build_dependencies(&mut self) {
    for (key, node) in &self.schemas {
      let deps = node
        .referenced_schemas(false)
        .into_iter()
        .filter(|dep| self.schemas.contains_key(dep))
        .collect();
      self.dependencies.insert(key.clone(), deps);
    }
  }

  #[cfg(test)]
  pub(crate) fn dependencies(&self, key: &str) -> Option<&BTreeSet<String>> {
    self.dependencies.get(key)
  }

  #[cfg(test)]
  pub(crate) fn len(&self) -> usize {
    self.schemas.len()
  }

  /// Emission order: every schema comes after the batch members it references.
  ///
  /// Depth-first post-order. An edge back into a schema that is still being
  /// visited closes a cycle and is dropped, so cycle members still appear
  /// exactly once.
  pub(crate) fn sorted(&self) -> Vec<&SchemaNode> {
    let mut visited = BTreeSet::new();
    let mut in_progress = BTreeSet::new();
    let mut order = Vec::with_capacity(self.schemas.len());

    for key in self.schemas.keys() {
      self.visit(key, &mut visited, &mut in_progress, &mut order);
    }

    order.into_iter().filter_map(|key| self.schemas.get(key)).collect()
  }

  fn visit<'a>(
    &'a self,
    key: &'a str,
    visited: &mut BTreeSet<&'a str>,
    in_progress: &mut BTreeSet<&'a str>,
    order: &mut Vec<&'a str>,
  ) {
    if visited.contains(key) || in_progress.contains(key) {
      return;
    }
    in_progress.insert(key);

    if let Some(deps) = self.dependencies.get(key) {
      for dep in deps {
        self.visit(dep, visited, in_progress, order);
      }
    }

    in_progress.remove(key);
    visited.insert(key);
    order.push(key);
  }

  /// Strongly connected components with more than one member, plus
  /// self-referencing schemas. Members are sorted within each cycle.
  pub(crate) fn detect_cycles(&self) -> Vec<Vec<String>> {
    let mut graph = DiGraph::<&str, ()>::new();
    let indices = self
      .schemas
      .keys()
      .map(|key| (key.as_str(), graph.add_node(key.as_str())))
      .collect::<BTreeMap<_, _>>();

    for (key, deps) in &self.dependencies {
      let Some(&from) = indices.get(key.as_str()) else { continue };
      for dep in deps {
        if let Some(&to) = indices.get(dep.as_str()) {
          graph.add_edge(from, to, ());
        }
      }
    }

    let mut cycles = kosaraju_scc(&graph)
      .into_iter()
      .filter(|component| {
        component.len() > 1 || component.iter().any(|&index| graph.contains_edge(index, index))
      })
      .map(|component| {
        let mut members = component.into_iter().map(|index| graph[index].to_string()).collect::<Vec<_>>();
        members.sort();
        members
      })
      .collect::<Vec<_>>();
    cycles.sort();
    cycles
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use serde_json::{Value, json};

  use super::*;

  fn schema_nodes(schemas: Value) -> Vec<SchemaNode> {
    let keys = schemas
      .as_object()
      .map(|map| map.keys().cloned().collect::<Vec<_>>())
      .unwrap_or_default();
    let document = Arc::new(json!({ "components": { "schemas": schemas } }));
    let root = SchemaNode::root(document).join("components").join("schemas");
    keys.into_iter().map(|key| root.join(key)).collect()
  }

  fn object_with_ref(target: &str) -> Value {
    json!({
      "type": "object",
      "properties": { "other": { "$ref": format!("#/components/schemas/{target}") } }
    })
  }

  fn sorted_keys(graph: &SchemaGraph) -> Vec<String> {
    graph
      .sorted()
      .into_iter()
      .filter_map(|node| node.last_segment().map(String::from))
      .collect()
  }

  #[test]
  fn test_chain_orders_dependencies_first() {
    let graph = SchemaGraph::new(schema_nodes(json!({
      "A": object_with_ref("B"),
      "B": object_with_ref("C"),
      "C": { "type": "object", "properties": { "name": { "type": "string" } } }
    })));
    assert_eq!(sorted_keys(&graph), vec!["C", "B", "A"]);
    assert!(graph.detect_cycles().is_empty());
  }

  #[test]
  fn test_nested_refs_count_as_dependencies() {
    let graph = SchemaGraph::new(schema_nodes(json!({
      "Page": {
        "type": "object",
        "properties": {
          "items": { "type": "array", "items": { "oneOf": [{ "$ref": "#/components/schemas/Leaf" }] } }
        }
      },
      "Leaf": { "type": "object", "properties": {} }
    })));
    assert_eq!(sorted_keys(&graph), vec!["Leaf", "Page"]);
  }

  #[test]
  fn test_cycle_terminates_with_each_member_once() {
    let graph = SchemaGraph::new(schema_nodes(json!({
      "A": object_with_ref("B"),
      "B": object_with_ref("A")
    })));
    let keys = sorted_keys(&graph);
    assert_eq!(keys.len(), 2);
    assert!(keys.contains(&"A".to_string()));
    assert!(keys.contains(&"B".to_string()));
    assert_eq!(graph.detect_cycles(), vec![vec!["A".to_string(), "B".to_string()]]);
  }

  #[test]
  fn test_self_reference_is_a_cycle() {
    let graph = SchemaGraph::new(schema_nodes(json!({ "Tree": object_with_ref("Tree") })));
    assert_eq!(sorted_keys(&graph), vec!["Tree"]);
    assert_eq!(graph.detect_cycles(), vec![vec!["Tree".to_string()]]);
  }

  #[test]
  fn test_out_of_batch_refs_are_ignored() {
    let graph = SchemaGraph::new(schema_nodes(json!({
      "A": object_with_ref("Elsewhere"),
      "B": object_with_ref("A")
    })));
    assert_eq!(sorted_keys(&graph), vec!["A", "B"]);
    assert!(graph.dependencies("A").is_some_and(BTreeSet::is_empty));
    assert_eq!(graph.len(), 2);
  }
}
