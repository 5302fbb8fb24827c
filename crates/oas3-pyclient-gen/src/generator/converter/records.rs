use super::type_resolver::{resolve, resolve_for_context};
use crate::generator::{
  ast::{AliasDecl, Documentation, FieldDecl, RecordDecl, SchemaDecl},
  errors::GeneratorResult,
  schema_node::{SchemaNode, type_name_from_key},
};

/// Converts the component schema at `node` into a declaration.
///
/// Object schemas (`type: object` or any schema declaring `properties`) become
/// records; everything else becomes an alias of its resolved type.
pub(crate) fn schema_to_decl(node: &SchemaNode) -> GeneratorResult<SchemaDecl> {
  if is_record_schema(node) {
    schema_to_record(node).map(SchemaDecl::Record)
  } else {
    schema_to_alias(node).map(SchemaDecl::Alias)
  }
}

pub(crate) fn is_record_schema(node: &SchemaNode) -> bool {
  !node.is_ref() && (node.own_has("properties") || node.own_str("type") == Some("object"))
}

pub(crate) fn schema_to_record(node: &SchemaNode) -> GeneratorResult<RecordDecl> {
  let name = decl_name(node);
  let fields = node
    .join("properties")
    .children()
    .iter()
    .map(property_to_field)
    .collect::<GeneratorResult<Vec<_>>>()?;

  Ok(RecordDecl {
    docs: schema_docs(node, &name),
    name,
    fields,
  })
}

fn property_to_field(property: &SchemaNode) -> GeneratorResult<FieldDecl> {
  let type_expr = resolve_for_context(property)?.expr;
  let docs = property
    .own_str("description")
    .map(|text| Documentation::from_raw(text).lines().join("\n"))
    .filter(|text| !text.is_empty());

  Ok(FieldDecl {
    name: property.last_segment().unwrap_or_default().to_string(),
    type_expr,
    docs,
  })
}

fn schema_to_alias(node: &SchemaNode) -> GeneratorResult<AliasDecl> {
  let name = decl_name(node);
  Ok(AliasDecl {
    docs: schema_docs(node, &name),
    target: resolve(node, Some(false), Some(false))?,
    name,
  })
}

fn decl_name(node: &SchemaNode) -> String {
  type_name_from_key(node.last_segment().unwrap_or_default())
}

fn schema_docs(node: &SchemaNode, name: &str) -> Documentation {
  let text = node
    .own_str("description")
    .filter(|text| !text.trim().is_empty())
    .or_else(|| node.own_str("title").filter(|text| !text.trim().is_empty()));
  match text {
    Some(text) => Documentation::from_raw(text),
    None => Documentation::from_raw(&format!("{name} schema.")),
  }
}
