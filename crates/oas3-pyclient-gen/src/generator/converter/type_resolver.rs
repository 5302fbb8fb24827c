use mediatype::MediaType;
use serde_json::Value;

use crate::generator::{
  ast::{LiteralValue, Primitive, TypeExpr},
  errors::{GeneratorError, GeneratorResult},
  schema_node::{SchemaNode, parse_ref, type_name_from_key},
};

/// Result of resolving a fragment in the context of where it sits in the document.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ContextType {
  pub expr: TypeExpr,
  /// Set for `200` responses shaped as `{items: [...], ...}` collections.
  pub paginated: bool,
}

impl ContextType {
  fn plain(expr: TypeExpr) -> Self {
    Self { expr, paginated: false }
  }
}

/// Converts one schema fragment into a [`TypeExpr`].
///
/// Checks in priority order: `enum`, `$ref`, `array`, `oneOf`, then the fixed
/// primitive table. Nullability defaults to `nullable: true` without a schema
/// `default`; omissibility defaults to `false`.
pub(crate) fn resolve(
  node: &SchemaNode,
  override_nullable: Option<bool>,
  override_omissible: Option<bool>,
) -> GeneratorResult<TypeExpr> {
  let core = resolve_core(node)?;
  let nullable = override_nullable.unwrap_or_else(|| node.own_bool("nullable") == Some(true) && !node.own_has("default"));
  let omissible = override_omissible.unwrap_or(false);
  Ok(core.wrapped(nullable, omissible))
}

fn resolve_core(node: &SchemaNode) -> GeneratorResult<TypeExpr> {
  let Some(schema) = node.own() else {
    return Err(unhandled(node));
  };

  if let Some(values) = schema.get("enum").and_then(Value::as_array) {
    let literals = values
      .iter()
      .map(|value| {
        LiteralValue::from_json(value).ok_or_else(|| GeneratorError::UnsupportedEnumValue {
          address: node.to_string(),
          value: value.to_string(),
        })
      })
      .collect::<GeneratorResult<Vec<_>>>()?;
    return Ok(TypeExpr::Literal(literals));
  }

  if let Some(reference) = node.ref_target() {
    let address = parse_ref(reference).ok_or_else(|| GeneratorError::UnresolvableRef {
      address: node.to_string(),
      reference: reference.to_string(),
    })?;
    let key = address.last().map_or(reference, String::as_str);
    return Ok(TypeExpr::named(type_name_from_key(key)));
  }

  let schema_type = schema.get("type").and_then(Value::as_str);
  if schema_type == Some("array") {
    let inner = resolve(&node.join("items"), None, None)?;
    return Ok(TypeExpr::list(inner));
  }

  if let Some(alternatives) = schema.get("oneOf").and_then(Value::as_array) {
    let members = (0..alternatives.len())
      .map(|index| resolve(&node.join("oneOf").join(index.to_string()), None, None))
      .collect::<GeneratorResult<Vec<_>>>()?;
    return Ok(TypeExpr::Union(members));
  }

  let format = schema.get("format").and_then(Value::as_str);
  let schema_type = schema_type.unwrap_or("none");
  Primitive::from_type_format(schema_type, format)
    .map(TypeExpr::Primitive)
    .ok_or_else(|| GeneratorError::UnsupportedPrimitive {
      address: node.to_string(),
      schema_type: schema_type.to_string(),
      format: format.unwrap_or("none").to_string(),
    })
}

/// Resolves a fragment according to its role, derived from its address:
/// parameter objects, request bodies, `responses` maps and record properties.
pub(crate) fn resolve_for_context(node: &SchemaNode) -> GeneratorResult<ContextType> {
  match (node.segment_from_end(1), node.last_segment()) {
    (Some("parameters"), _) => resolve_parameter(node).map(ContextType::plain),
    (_, Some("requestBody")) => resolve_request_body(node).map(ContextType::plain),
    (_, Some("responses")) => resolve_response(node),
    (Some("properties"), _) => resolve_property(node).map(ContextType::plain),
    _ => Err(unhandled(node)),
  }
}

fn resolve_parameter(node: &SchemaNode) -> GeneratorResult<TypeExpr> {
  let parameter = node.deref()?;
  let schema = parameter.join("schema");
  match parameter.own_str("in") {
    Some("path") => resolve(&schema, Some(false), Some(false)),
    Some(_) => {
      let required = parameter.own_bool("required").unwrap_or(false);
      resolve(&schema, None, Some(!required))
    }
    None => Err(unhandled(node)),
  }
}

fn resolve_request_body(node: &SchemaNode) -> GeneratorResult<TypeExpr> {
  let body = node.deref()?;
  let schema = json_media_schema(&body.join("content")).ok_or_else(|| unhandled(node))?;
  resolve(&schema, None, None)
}

fn resolve_response(node: &SchemaNode) -> GeneratorResult<ContextType> {
  let ok = node.join("200");
  if !ok.exists() {
    return Ok(ContextType::plain(TypeExpr::Null));
  }
  let ok = ok.deref()?;
  let Some(schema) = json_media_schema(&ok.join("content")) else {
    return Ok(ContextType::plain(TypeExpr::Null));
  };

  if let Some(items) = paginated_items(&schema)? {
    let item = resolve(&items.join("items"), None, None)?;
    return Ok(ContextType {
      expr: TypeExpr::list(item),
      paginated: true,
    });
  }

  resolve(&schema, None, None).map(ContextType::plain)
}

/// Field nullability is never trusted; omissibility follows the enclosing
/// object's `required` list. Reads the property's own fragment so a `$ref`
/// property stays a named reference.
fn resolve_property(node: &SchemaNode) -> GeneratorResult<TypeExpr> {
  let required = is_required_property(node);
  resolve(node, Some(false), Some(!required))
}

pub(crate) fn is_required_property(node: &SchemaNode) -> bool {
  let (Some(name), Some(object)) = (node.last_segment(), node.parent().and_then(|p| p.parent())) else {
    return false;
  };
  object
    .own()
    .and_then(|schema| schema.get("required"))
    .and_then(Value::as_array)
    .is_some_and(|required| required.iter().any(|entry| entry.as_str() == Some(name)))
}

/// For a collection-shaped schema (`type: object` with an `items` property of
/// `type: array`), returns the dereferenced `items` array node.
pub(crate) fn paginated_items(schema: &SchemaNode) -> GeneratorResult<Option<SchemaNode>> {
  let schema = schema.deref()?;
  if schema.own_str("type") != Some("object") {
    return Ok(None);
  }
  let items = schema.join("properties").join("items");
  if !items.exists() {
    return Ok(None);
  }
  let items = items.deref()?;
  Ok((items.own_str("type") == Some("array")).then_some(items))
}

/// Picks the schema of the first JSON-compatible media type under a `content`
/// map, falling back to the first declared media type.
pub(crate) fn json_media_schema(content: &SchemaNode) -> Option<SchemaNode> {
  let media_types = content.children();
  let chosen = media_types
    .iter()
    .find(|media| media.last_segment().is_some_and(is_json_media_type))
    .or_else(|| media_types.first())?;
  let schema = chosen.join("schema");
  schema.exists().then_some(schema)
}

fn is_json_media_type(content_type: &str) -> bool {
  let Ok(media) = MediaType::parse(content_type) else {
    return false;
  };
  media.subty.as_str() == "json" || media.suffix.as_ref().is_some_and(|suffix| suffix.as_str() == "json")
}

fn unhandled(node: &SchemaNode) -> GeneratorError {
  GeneratorError::UnhandledSchemaShape {
    address: node.to_string(),
  }
}
