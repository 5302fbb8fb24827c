use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;

use super::operations::{OperationDescriptor, ParamDescriptor, ParamLocation};
use crate::generator::{
  ast::{
    Documentation, LiteralValue, MethodDecl, ParamDecl, QueryArg, RequestCall, RequestPrimitive, SubPath, TypeExpr,
  },
  naming::identifiers::to_python_identifier,
};

pub(crate) const REQUEST_BODY_PARAM: &str = "request_body";
const MISSING_DESCRIPTION: &str = "No description available.";

/// Turns a resolved operation into a method declaration named `target_name`.
///
/// Parameter order: required path parameters, required query parameters and
/// a required body, then optional query parameters and an optional body. Each
/// group of parameters is sorted by name.
pub(crate) fn operation_to_method(op: &OperationDescriptor, target_name: &str) -> MethodDecl {
  let idents = ParamIdents::new(op);

  let path_params = sorted(&op.path_params);
  let (required_query, optional_query): (Vec<_>, Vec<_>) =
    sorted(&op.query_params).into_iter().partition(|param| param.required);

  let mut params = vec![];
  params.extend(path_params.iter().map(|param| required_param(idents.get(param), param)));
  params.extend(required_query.iter().map(|param| required_param(idents.get(param), param)));

  if let Some(body) = op.request_body.as_ref().filter(|body| body.required) {
    params.push(ParamDecl {
      name: REQUEST_BODY_PARAM.to_string(),
      type_expr: body.type_expr.clone().without_omissible(),
      default: None,
    });
  }

  params.extend(optional_query.iter().map(|param| optional_param(idents.get(param), param)));

  if let Some(body) = op.request_body.as_ref().filter(|body| !body.required) {
    params.push(ParamDecl {
      name: REQUEST_BODY_PARAM.to_string(),
      type_expr: nullable(body.type_expr.clone().without_omissible()),
      default: Some(LiteralValue::Null),
    });
  }

  let return_type = if op.paginated {
    TypeExpr::iterator(op.response.list_item().cloned().unwrap_or_else(|| op.response.clone()))
  } else {
    op.response.clone()
  };

  MethodDecl {
    name: target_name.to_string(),
    params,
    return_type,
    docs: method_docs(op, &idents),
    call: request_call(op, &idents),
  }
}

fn required_param(ident: &str, param: &ParamDescriptor) -> ParamDecl {
  ParamDecl {
    name: ident.to_string(),
    type_expr: param.type_expr.clone().without_omissible(),
    default: None,
  }
}

/// Optional parameters default to their schema default, or to null.
fn optional_param(ident: &str, param: &ParamDescriptor) -> ParamDecl {
  let default = param.default.clone().unwrap_or(LiteralValue::Null);
  let type_expr = param.type_expr.clone().without_omissible();
  let type_expr = if default == LiteralValue::Null {
    nullable(type_expr)
  } else {
    type_expr
  };
  ParamDecl {
    name: ident.to_string(),
    type_expr,
    default: Some(default),
  }
}

fn nullable(type_expr: TypeExpr) -> TypeExpr {
  if type_expr.is_optional() || type_expr == TypeExpr::Null {
    type_expr
  } else {
    type_expr.wrapped(true, false)
  }
}

fn sorted(params: &[ParamDescriptor]) -> Vec<&ParamDescriptor> {
  params.iter().sorted_by(|a, b| a.name.cmp(&b.name)).collect()
}

fn request_call(op: &OperationDescriptor, idents: &ParamIdents) -> RequestCall {
  let sub_path = if op.path_params.is_empty() {
    SubPath::Literal(op.path.clone())
  } else {
    let mut template = op.path.clone();
    for param in &op.path_params {
      template = template.replace(&format!("{{{}}}", param.name), &format!("{{{}}}", idents.get(param)));
    }
    SubPath::Formatted(template)
  };

  let query = sorted(&op.query_params)
    .into_iter()
    .map(|param| QueryArg {
      wire_name: param.name.clone(),
      ident: idents.get(param).to_string(),
    })
    .collect();

  RequestCall {
    primitive: if op.paginated {
      RequestPrimitive::Paginated
    } else {
      RequestPrimitive::Single
    },
    method: op.method,
    sub_path,
    query,
    body: op.request_body.as_ref().map(|_| REQUEST_BODY_PARAM.to_string()),
  }
}

fn method_docs(op: &OperationDescriptor, idents: &ParamIdents) -> Documentation {
  let headline = op
    .summary
    .as_deref()
    .or(op.operation_id.as_deref())
    .map_or_else(|| op.label(), String::from);
  let mut docs = Documentation::from_raw(&headline);
  if let Some(description) = &op.description {
    docs.push_paragraph(description);
  }

  let mut args = vec![];
  for param in sorted(&op.path_params).into_iter().chain(sorted(&op.query_params)) {
    args.push(format!("    {}: {}", idents.get(param), describe(param.description.as_deref())));
  }
  if let Some(body) = &op.request_body {
    args.push(format!(
      "    {REQUEST_BODY_PARAM}: {}",
      describe(body.description.as_deref())
    ));
  }
  if !args.is_empty() {
    docs.push_blank();
    docs.push("Args:");
    docs.extend(args);
  }

  if let Some(description) = &op.response_description {
    let description = Documentation::from_raw(description).joined();
    docs.push_blank();
    docs.push("Returns:");
    if op.paginated {
      docs.push(format!("    An iterator of items from {description}"));
    } else {
      docs.push(format!("    {description}"));
    }
  }

  docs
}

fn describe(description: Option<&str>) -> String {
  description
    .map(|text| Documentation::from_raw(text).joined())
    .filter(|text| !text.is_empty())
    .unwrap_or_else(|| MISSING_DESCRIPTION.to_string())
}

/// Python identifiers for every parameter of one operation, unique within the
/// method signature.
struct ParamIdents {
  by_wire_name: BTreeMap<(bool, String), String>,
}

impl ParamIdents {
  fn new(op: &OperationDescriptor) -> Self {
    let mut used = BTreeSet::from([REQUEST_BODY_PARAM.to_string()]);
    let mut by_wire_name = BTreeMap::new();
    for (is_path, param) in op
      .path_params
      .iter()
      .map(|param| (true, param))
      .chain(op.query_params.iter().map(|param| (false, param)))
    {
      let base = to_python_identifier(&param.name);
      let mut ident = base.clone();
      let mut counter = 2;
      while !used.insert(ident.clone()) {
        ident = format!("{base}_{counter}");
        counter += 1;
      }
      by_wire_name.insert((is_path, param.name.clone()), ident);
    }
    Self { by_wire_name }
  }

  fn get<'a>(&'a self, param: &'a ParamDescriptor) -> &'a str {
    let is_path = param.location == ParamLocation::Path;
    self
      .by_wire_name
      .get(&(is_path, param.name.clone()))
      .map_or(param.name.as_str(), String::as_str)
  }
}
