use std::sync::Arc;

use serde_json::{Value, json};

use super::super::operations::{OperationDescriptor, ParamLocation, path_item_operations, path_placeholders};
use crate::generator::{
  ast::{HttpMethod, LiteralValue, Primitive, TypeExpr},
  errors::GeneratorError,
  schema_node::SchemaNode,
};

fn describe(document: Value, path: &str, method: HttpMethod) -> Result<OperationDescriptor, GeneratorError> {
  let node = SchemaNode::root(Arc::new(document))
    .join("paths")
    .join(path)
    .join(method.to_string());
  OperationDescriptor::from_node(path, method, node)
}

fn items_document() -> Value {
  json!({
    "paths": {
      "/orgs/{org}/items/{id}": {
        "parameters": [
          { "name": "id", "in": "path", "required": true, "schema": { "type": "string" } },
          { "name": "limit", "in": "query", "schema": { "type": "integer", "default": 10 } },
          { "name": "X-Trace", "in": "header", "schema": { "type": "string" } }
        ],
        "get": {
          "operationId": "get_item",
          "summary": "Fetch an item.",
          "description": "Looks the item up by id.",
          "parameters": [
            { "name": "id", "in": "path", "required": true, "schema": { "type": "integer" }, "description": "Item id." },
            { "name": "session", "in": "cookie", "schema": { "type": "string" } },
            { "$ref": "#/components/parameters/Expand" }
          ],
          "requestBody": {
            "required": true,
            "description": "Filter to apply.",
            "content": { "application/json": { "schema": { "type": "object" } } }
          },
          "responses": { "200": { "$ref": "#/components/responses/Item" } }
        }
      }
    },
    "components": {
      "parameters": {
        "Expand": { "name": "expand", "in": "query", "required": true, "schema": { "type": "boolean" } }
      },
      "responses": {
        "Item": {
          "description": "The item.",
          "content": { "application/json": { "schema": { "type": "string" } } }
        }
      }
    }
  })
}

#[test]
fn test_path_placeholders_in_template_order() {
  assert_eq!(path_placeholders("/orgs/{org}/items/{id}"), vec!["org", "id"]);
  assert!(path_placeholders("/widgets").is_empty());
}

#[test]
fn test_operation_parameter_replaces_inherited_one() {
  let op = describe(items_document(), "/orgs/{org}/items/{id}", HttpMethod::Get).unwrap();
  let id = op.path_params.iter().find(|param| param.name == "id").unwrap();
  assert_eq!(id.type_expr, TypeExpr::Primitive(Primitive::Int));
  assert_eq!(id.description.as_deref(), Some("Item id."));
  assert_eq!(op.path_params.iter().filter(|param| param.name == "id").count(), 1);
}

#[test]
fn test_inherited_query_parameter_keeps_default() {
  let op = describe(items_document(), "/orgs/{org}/items/{id}", HttpMethod::Get).unwrap();
  let limit = op.query_param("limit").unwrap();
  assert_eq!(limit.location, ParamLocation::Query);
  assert!(!limit.required);
  assert_eq!(limit.default, Some(LiteralValue::Number(10.into())));
  assert_eq!(limit.type_expr, TypeExpr::Omissible(Box::new(TypeExpr::Primitive(Primitive::Int))));
}

#[test]
fn test_header_and_cookie_parameters_are_skipped() {
  let op = describe(items_document(), "/orgs/{org}/items/{id}", HttpMethod::Get).unwrap();
  let names = op
    .path_params
    .iter()
    .chain(&op.query_params)
    .map(|param| param.name.as_str())
    .collect::<Vec<_>>();
  assert!(!names.contains(&"X-Trace"));
  assert!(!names.contains(&"session"));
}

#[test]
fn test_referenced_parameter_is_resolved() {
  let op = describe(items_document(), "/orgs/{org}/items/{id}", HttpMethod::Get).unwrap();
  let expand = op.query_param("expand").unwrap();
  assert!(expand.required);
  assert_eq!(expand.type_expr, TypeExpr::Primitive(Primitive::Bool));
}

#[test]
fn test_undeclared_placeholder_becomes_required_string() {
  let op = describe(items_document(), "/orgs/{org}/items/{id}", HttpMethod::Get).unwrap();
  let org = op.path_params.iter().find(|param| param.name == "org").unwrap();
  assert!(org.required);
  assert_eq!(org.type_expr, TypeExpr::Primitive(Primitive::Str));
  assert!(org.description.is_none());
}

#[test]
fn test_body_response_and_headline_fields() {
  let op = describe(items_document(), "/orgs/{org}/items/{id}", HttpMethod::Get).unwrap();
  let body = op.request_body.as_ref().unwrap();
  assert!(body.required);
  assert_eq!(body.type_expr, TypeExpr::Primitive(Primitive::Map));
  assert_eq!(body.description.as_deref(), Some("Filter to apply."));

  assert_eq!(op.response, TypeExpr::Primitive(Primitive::Str));
  assert_eq!(op.response_description.as_deref(), Some("The item."));
  assert!(!op.paginated);
  assert_eq!(op.operation_id.as_deref(), Some("get_item"));
  assert_eq!(op.summary.as_deref(), Some("Fetch an item."));
  assert_eq!(op.label(), "GET /orgs/{org}/items/{id}");
}

#[test]
fn test_object_default_is_rejected() {
  let document = json!({
    "paths": {
      "/search": {
        "get": {
          "parameters": [
            { "name": "filter", "in": "query", "schema": { "type": "object", "default": { "a": 1 } } }
          ],
          "responses": {}
        }
      }
    }
  });
  let err = describe(document, "/search", HttpMethod::Get).unwrap_err();
  assert!(matches!(err, GeneratorError::UnsupportedDefault { .. }));
}

#[test]
fn test_operation_without_responses_returns_null() {
  let document = json!({ "paths": { "/ping": { "head": {} } } });
  let op = describe(document, "/ping", HttpMethod::Head).unwrap();
  assert_eq!(op.response, TypeExpr::Null);
  assert!(op.response_description.is_none());
  assert!(op.request_body.is_none());
}

#[test]
fn test_path_item_operations_skip_fields_and_report_unknown_keys() {
  let document = Arc::new(json!({
    "paths": {
      "/widgets": {
        "summary": "Widgets.",
        "parameters": [],
        "post": {},
        "x-internal": true,
        "trace": {},
        "GET": {}
      }
    }
  }));
  let path_item = SchemaNode::root(document).join("paths").join("/widgets");
  let mut invalid = vec![];
  let operations = path_item_operations(&path_item, |key| invalid.push(key.to_string()));

  let methods = operations.iter().map(|(method, _)| *method).collect::<Vec<_>>();
  assert_eq!(methods, vec![HttpMethod::Post, HttpMethod::Get]);
  assert_eq!(invalid, vec!["trace"]);
}
