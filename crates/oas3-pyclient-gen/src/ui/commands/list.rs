use std::path::Path;

use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};

use crate::{
  generator::{
    ast::HttpMethod, converter::operations::path_item_operations, mapping::MappingStore, schema_node::SchemaNode,
  },
  ui::{Colors, colors::comfy, term_width},
  utils::spec::SpecLoader,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct OperationRow {
  method: HttpMethod,
  path: String,
  operation_id: Option<String>,
  /// `Class.method` when a mapping was given and covers the operation.
  target: Option<String>,
}

/// Every operation in declared order, with its mapping target if known.
fn operation_rows(document: &SchemaNode, store: Option<&MappingStore>) -> Vec<OperationRow> {
  let mut rows = vec![];
  for path_item in document.join("paths").children() {
    let Some(path) = path_item.last_segment() else { continue };
    for (method, operation) in path_item_operations(&path_item, |_| {}) {
      let target = store
        .and_then(|store| store.entry(path, method))
        .map(|entry| format!("{}.{}", entry.resource_class, entry.method_name));
      rows.push(OperationRow {
        method,
        path: path.to_string(),
        operation_id: operation.own_str("operationId").map(String::from),
        target,
      });
    }
  }
  rows
}

pub async fn list_operations(input: &Path, mapping: Option<&Path>, colors: &Colors) -> anyhow::Result<()> {
  let document = SpecLoader::open(input).await?.parse()?;
  let store = match mapping {
    Some(path) => Some(MappingStore::load(path).await?),
    None => None,
  };
  let rows = operation_rows(&SchemaNode::root(document), store.as_ref());

  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut header = Row::new();
  header.add_cell(Cell::new("METHOD").fg(comfy(colors.label())));
  header.add_cell(Cell::new("PATH").fg(comfy(colors.label())));
  header.add_cell(Cell::new("OPERATION ID").fg(comfy(colors.label())));
  if store.is_some() {
    header.add_cell(Cell::new("MAPPED TO").fg(comfy(colors.label())));
  }
  table.set_header(header);

  for row in rows {
    let mut cells = Row::new();
    cells.add_cell(
      Cell::new(row.method.as_upper())
        .fg(comfy(colors.accent()))
        .set_alignment(CellAlignment::Right),
    );
    cells.add_cell(Cell::new(row.path).fg(comfy(colors.primary())));
    cells.add_cell(
      Cell::new(row.operation_id.unwrap_or_else(|| "-".to_string()))
        .fg(comfy(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    if store.is_some() {
      let target = row.target.unwrap_or_else(|| "unmapped".to_string());
      cells.add_cell(Cell::new(target).fg(comfy(colors.info())));
    }
    table.add_row(cells);
  }

  println!("{table}");

  Ok(())
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use indexmap::IndexMap;
  use serde_json::json;

  use super::*;
  use crate::generator::mapping::{MappingEntry, MappingTable};

  fn document() -> SchemaNode {
    SchemaNode::root(Arc::new(json!({
      "paths": {
        "/widgets": {
          "parameters": [],
          "get": { "operationId": "listWidgets", "responses": {} },
          "post": { "responses": {} }
        },
        "/widgets/{id}": {
          "x-internal": true,
          "delete": { "responses": {} }
        }
      }
    })))
  }

  #[test]
  fn test_rows_follow_declared_order() {
    let rows = operation_rows(&document(), None);
    let labels = rows
      .iter()
      .map(|row| format!("{} {}", row.method.as_upper(), row.path))
      .collect::<Vec<_>>();
    assert_eq!(labels, vec!["GET /widgets", "POST /widgets", "DELETE /widgets/{id}"]);
    assert_eq!(rows[0].operation_id.as_deref(), Some("listWidgets"));
    assert!(rows[1].operation_id.is_none());
    assert!(rows.iter().all(|row| row.target.is_none()));
  }

  #[test]
  fn test_rows_show_mapping_targets() {
    let mut table = MappingTable::new();
    table.insert(
      "/widgets".to_string(),
      IndexMap::from([(
        "get".to_string(),
        MappingEntry {
          resource_class: "WidgetsResource".to_string(),
          method_name: "list".to_string(),
        },
      )]),
    );
    let store = MappingStore::from_table("mapping.json", table);

    let rows = operation_rows(&document(), Some(&store));
    assert_eq!(rows[0].target.as_deref(), Some("WidgetsResource.list"));
    assert!(rows[1].target.is_none());
  }
}
