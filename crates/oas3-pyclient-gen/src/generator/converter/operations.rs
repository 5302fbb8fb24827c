use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use super::type_resolver::resolve_for_context;
use crate::generator::{
  ast::{HttpMethod, LiteralValue, Primitive, TypeExpr},
  errors::{GeneratorError, GeneratorResult},
  schema_node::SchemaNode,
};

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").unwrap());

/// Placeholder names of a path template, in template order.
pub(crate) fn path_placeholders(path: &str) -> Vec<String> {
  PLACEHOLDER_RE
    .captures_iter(path)
    .map(|captures| captures[1].to_string())
    .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParamLocation {
  Path,
  Query,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParamDescriptor {
  /// Name as sent on the wire.
  pub name: String,
  pub location: ParamLocation,
  pub type_expr: TypeExpr,
  pub required: bool,
  pub default: Option<LiteralValue>,
  pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BodyDescriptor {
  pub type_expr: TypeExpr,
  pub required: bool,
  pub description: Option<String>,
}

/// One HTTP verb bound to one path, with every type already resolved.
#[derive(Debug, Clone)]
pub(crate) struct OperationDescriptor {
  pub method: HttpMethod,
  pub path: String,
  pub node: SchemaNode,
  pub operation_id: Option<String>,
  pub summary: Option<String>,
  pub description: Option<String>,
  pub path_params: Vec<ParamDescriptor>,
  pub query_params: Vec<ParamDescriptor>,
  pub request_body: Option<BodyDescriptor>,
  pub response: TypeExpr,
  pub response_description: Option<String>,
  pub paginated: bool,
}

impl OperationDescriptor {
  /// Builds the descriptor for the operation object at `node`
  /// (`paths.<path>.<method>`).
  pub(crate) fn from_node(path: &str, method: HttpMethod, node: SchemaNode) -> GeneratorResult<Self> {
    let (mut path_params, query_params) = Self::collect_parameters(&node)?;
    Self::synthesize_undeclared_path_params(path, &mut path_params);

    let request_body = Self::request_body(&node)?;

    let responses = node.join("responses");
    let response = resolve_for_context(&responses)?;
    let ok = responses.join("200");
    let response_description = if ok.exists() {
      ok.deref()?.own_str("description").map(String::from)
    } else {
      None
    };

    Ok(Self {
      method,
      path: path.to_string(),
      operation_id: node.own_str("operationId").map(String::from),
      summary: node.own_str("summary").map(String::from),
      description: node.own_str("description").map(String::from),
      path_params,
      query_params,
      request_body,
      response: response.expr,
      response_description,
      paginated: response.paginated,
      node,
    })
  }

  /// Path-item parameters apply to every operation; an operation parameter
  /// with the same `(name, in)` replaces it. Header and cookie parameters are
  /// not part of the method signature.
  fn collect_parameters(node: &SchemaNode) -> GeneratorResult<(Vec<ParamDescriptor>, Vec<ParamDescriptor>)> {
    let mut merged = IndexMap::new();
    let inherited = node.parent().map(|path_item| path_item.join("parameters"));
    let declared = node.join("parameters");
    for list in inherited.iter().chain([&declared]) {
      for parameter in list.children() {
        let resolved = parameter.deref()?;
        let name = resolved.own_str("name").unwrap_or_default().to_string();
        let location = resolved.own_str("in").unwrap_or_default().to_string();
        merged.insert((name, location), parameter);
      }
    }

    let mut path_params = vec![];
    let mut query_params = vec![];
    for ((name, location), parameter) in merged {
      let location = match location.as_str() {
        "path" => ParamLocation::Path,
        "query" => ParamLocation::Query,
        _ => continue,
      };
      let descriptor = Self::parameter(name, location, &parameter)?;
      match location {
        ParamLocation::Path => path_params.push(descriptor),
        ParamLocation::Query => query_params.push(descriptor),
      }
    }

    Ok((path_params, query_params))
  }

  fn parameter(name: String, location: ParamLocation, node: &SchemaNode) -> GeneratorResult<ParamDescriptor> {
    let resolved = node.deref()?;
    let type_expr = resolve_for_context(node)?.expr;
    let required = location == ParamLocation::Path || resolved.own_bool("required").unwrap_or(false);

    let schema = resolved.join("schema");
    let default = match schema.resolved()?.and_then(|schema| schema.get("default")) {
      Some(value) => Some(
        LiteralValue::from_json(value).ok_or_else(|| GeneratorError::UnsupportedDefault {
          address: schema.to_string(),
          value: value.to_string(),
        })?,
      ),
      None => None,
    };

    Ok(ParamDescriptor {
      name,
      location,
      type_expr,
      required,
      default,
      description: resolved.own_str("description").map(String::from),
    })
  }

  /// Template placeholders without a declared path parameter become required
  /// string parameters so the sub-path expression stays well formed.
  fn synthesize_undeclared_path_params(path: &str, path_params: &mut Vec<ParamDescriptor>) {
    for placeholder in path_placeholders(path) {
      if path_params.iter().any(|param| param.name == placeholder) {
        continue;
      }
      path_params.push(ParamDescriptor {
        name: placeholder,
        location: ParamLocation::Path,
        type_expr: TypeExpr::Primitive(Primitive::Str),
        required: true,
        default: None,
        description: None,
      });
    }
  }

  fn request_body(node: &SchemaNode) -> GeneratorResult<Option<BodyDescriptor>> {
    let body = node.join("requestBody");
    if !body.exists() {
      return Ok(None);
    }
    let type_expr = resolve_for_context(&body)?.expr;
    let resolved = body.deref()?;
    Ok(Some(BodyDescriptor {
      type_expr,
      required: resolved.own_bool("required").unwrap_or(false),
      description: resolved.own_str("description").map(String::from),
    }))
  }

  /// Display label used in warnings: `GET /widgets/{id}`.
  pub(crate) fn label(&self) -> String {
    format!("{} {}", self.method.as_upper(), self.path)
  }

  #[cfg(test)]
  pub(crate) fn query_param(&self, name: &str) -> Option<&ParamDescriptor> {
    self.query_params.iter().find(|param| param.name == name)
  }
}

/// Operation objects under one path item, in declared order. Path-item
/// fields (`parameters`, `summary`, ...) and `x-` extensions are skipped; any
/// other non-verb key is reported through `on_invalid`.
pub(crate) fn path_item_operations(
  path_item: &SchemaNode,
  mut on_invalid: impl FnMut(&str),
) -> Vec<(HttpMethod, SchemaNode)> {
  const PATH_ITEM_FIELDS: [&str; 5] = ["parameters", "summary", "description", "servers", "$ref"];

  let mut operations = vec![];
  for child in path_item.children() {
    let Some(key) = child.last_segment() else { continue };
    if PATH_ITEM_FIELDS.contains(&key) || key.starts_with("x-") {
      continue;
    }
    match key.parse::<HttpMethod>() {
      Ok(method) => operations.push((method, child)),
      Err(_) => on_invalid(key),
    }
  }
  operations
}
