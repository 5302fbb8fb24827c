use std::collections::{BTreeSet, HashSet};

use itertools::Itertools;

use super::{SourceRenderer, writer::CodeWriter};
use crate::generator::{
  CodegenConfig,
  ast::{
    AliasDecl, ClassDecl, Documentation, FacadeDecl, LiteralValue, MethodDecl, ModuleDecl, ModuleItem, ParamDecl,
    Primitive, RecordDecl, RequestCall, RequestPrimitive, SchemaDecl, SubPath, TypeExpr,
  },
  naming::identifiers::is_valid_identifier,
};

const GENERATED_HEADER: &str = "# This file is generated from an OpenAPI document. Do not edit by hand.";

/// Renders Python 3 modules: `TypedDict` records, plain aliases, resource
/// classes delegating to the client's request primitives, and the facade.
#[derive(Debug, Clone)]
pub(crate) struct PythonRenderer {
  request_primitive: String,
  paginated_request_primitive: String,
}

impl PythonRenderer {
  pub(crate) fn new(config: &CodegenConfig) -> Self {
    Self {
      request_primitive: config.request_primitive.clone(),
      paginated_request_primitive: config.paginated_request_primitive.clone(),
    }
  }
}

impl SourceRenderer for PythonRenderer {
  fn file_extension(&self) -> &'static str {
    ".py"
  }

  fn package_marker(&self) -> Option<&'static str> {
    Some("__init__.py")
  }

  fn render_module(&self, module: &ModuleDecl) -> String {
    let mut out = CodeWriter::default();
    out.line(GENERATED_HEADER);
    if !module.docs.is_empty() {
      out.blank();
      docstring(&mut out, &module.docs);
    }
    render_imports(&mut out, module);

    // Schema names declared further down this module; references to them
    // must be quoted until their declaration has been emitted.
    let mut pending = module
      .items
      .iter()
      .filter_map(|item| match item {
        ModuleItem::Schema(decl) => Some(decl.name().to_string()),
        _ => None,
      })
      .collect::<HashSet<_>>();

    for item in &module.items {
      out.separate(2);
      match item {
        ModuleItem::Schema(SchemaDecl::Record(record)) => {
          render_record(&mut out, record, &pending);
          pending.remove(&record.name);
        }
        ModuleItem::Schema(SchemaDecl::Alias(alias)) => {
          render_alias(&mut out, alias, &pending);
          pending.remove(&alias.name);
        }
        ModuleItem::Class(class) => self.render_class(&mut out, class),
        ModuleItem::Facade(facade) => render_facade(&mut out, facade),
        ModuleItem::Exports(names) => render_exports(&mut out, names),
      }
    }

    out.finish()
  }
}

impl PythonRenderer {
  fn render_class(&self, out: &mut CodeWriter, class: &ClassDecl) {
    let no_pending = HashSet::new();
    out.line(format!("class {}({}):", class.name, class.base));
    out.indented(|out| {
      docstring(out, &class.docs);
      if class.methods.is_empty() && class.docs.is_empty() {
        out.line("pass");
      }
      for method in &class.methods {
        out.blank();
        self.render_method(out, method, &no_pending);
      }
    });
  }

  fn render_method(&self, out: &mut CodeWriter, method: &MethodDecl, pending: &HashSet<String>) {
    let params = std::iter::once("self".to_string())
      .chain(method.params.iter().map(|param| parameter(param, pending)))
      .join(", ");
    out.line(format!(
      "def {}({params}) -> {}:",
      method.name,
      type_annotation(&method.return_type, pending)
    ));
    out.indented(|out| {
      docstring(out, &method.docs);
      let call = self.request_call(&method.call);
      if method.return_type == TypeExpr::Null {
        out.line(call);
      } else {
        out.line(format!("return {call}"));
      }
    });
  }

  fn request_call(&self, call: &RequestCall) -> String {
    let primitive = match call.primitive {
      RequestPrimitive::Single => &self.request_primitive,
      RequestPrimitive::Paginated => &self.paginated_request_primitive,
    };

    let mut args = vec![
      format!("method={}", py_str(&call.method.as_upper())),
      format!(
        "sub_path={}",
        match &call.sub_path {
          SubPath::Literal(path) => py_str(path),
          SubPath::Formatted(template) => format!("f{}", py_str(template)),
        }
      ),
    ];
    if !call.query.is_empty() {
      let entries = call
        .query
        .iter()
        .map(|arg| format!("{}: {}", py_str(&arg.wire_name), arg.ident))
        .join(", ");
      args.push(format!("params={{{entries}}}"));
    }
    if let Some(body) = &call.body {
      args.push(format!("body={body}"));
    }

    format!("self.{primitive}({})", args.join(", "))
  }
}

fn render_imports(out: &mut CodeWriter, module: &ModuleDecl) {
  let helpers = HelperImports::collect(module);

  // Method names such as `list` shadow builtins inside a class body, so
  // resource modules defer annotation evaluation.
  if helpers.future_annotations {
    out.separate(1);
    out.line("from __future__ import annotations");
  }

  let mut stdlib = vec![];
  if helpers.cached_property {
    stdlib.push("from functools import cached_property".to_string());
  }
  if !helpers.typing.is_empty() {
    stdlib.push(format!("from typing import {}", helpers.typing.iter().join(", ")));
  }
  if !helpers.typing_extensions.is_empty() {
    stdlib.push(format!(
      "from typing_extensions import {}",
      helpers.typing_extensions.iter().join(", ")
    ));
  }

  if !stdlib.is_empty() {
    out.separate(1);
    for line in stdlib {
      out.line(line);
    }
  }

  if !module.imports.is_empty() {
    out.separate(1);
    for import in &module.imports {
      out.line(format!("from {} import {}", import.module, import.names.join(", ")));
    }
  }
}

fn render_record(out: &mut CodeWriter, record: &RecordDecl, pending: &HashSet<String>) {
  if !record.fields.iter().all(|field| is_valid_identifier(&field.name)) {
    render_functional_record(out, record, pending);
    return;
  }

  out.line(format!("class {}(TypedDict):", record.name));
  out.indented(|out| {
    docstring(out, &record.docs);
    if record.fields.is_empty() {
      out.line("pass");
      return;
    }
    if !record.docs.is_empty() {
      out.blank();
    }
    for field in &record.fields {
      out.line(format!("{}: {}", field.name, type_annotation(&field.type_expr, pending)));
      if let Some(docs) = &field.docs {
        docstring(out, &Documentation::from_raw(docs));
      }
    }
  });
}

/// `TypedDict('Name', {...})` for records whose keys are not identifiers.
/// Field docs have nowhere to go in this form and are dropped.
fn render_functional_record(out: &mut CodeWriter, record: &RecordDecl, pending: &HashSet<String>) {
  out.line(format!("{} = TypedDict({}, {{", record.name, py_str(&record.name)));
  out.indented(|out| {
    for field in &record.fields {
      out.line(format!(
        "{}: {},",
        py_str(&field.name),
        type_annotation(&field.type_expr, pending)
      ));
    }
  });
  out.line("})");
  docstring(out, &record.docs);
}

fn render_alias(out: &mut CodeWriter, alias: &AliasDecl, pending: &HashSet<String>) {
  out.line(format!("{} = {}", alias.name, type_annotation(&alias.target, pending)));
  docstring(out, &alias.docs);
}

fn render_facade(out: &mut CodeWriter, facade: &FacadeDecl) {
  out.line(format!("class {}:", facade.name));
  out.indented(|out| {
    docstring(out, &facade.docs);
    if facade.accessors.is_empty() && facade.docs.is_empty() {
      out.line("pass");
    }
    for accessor in &facade.accessors {
      out.blank();
      out.line("@cached_property");
      out.line(format!("def {}(self) -> {}:", accessor.name, accessor.class_name));
      out.indented(|out| {
        out.line(format!("\"\"\"Returns an instance of {}.\"\"\"", accessor.class_name));
        out.line(format!("return {}(self)", accessor.class_name));
      });
    }
  });
}

fn render_exports(out: &mut CodeWriter, names: &[String]) {
  if names.is_empty() {
    out.line("__all__ = []");
    return;
  }
  out.line("__all__ = [");
  out.indented(|out| {
    for name in names {
      out.line(format!("{},", py_str(name)));
    }
  });
  out.line("]");
}

fn parameter(param: &ParamDecl, pending: &HashSet<String>) -> String {
  let annotation = type_annotation(&param.type_expr, pending);
  match &param.default {
    Some(default) => format!("{}: {annotation} = {}", param.name, literal(default)),
    None => format!("{}: {annotation}", param.name),
  }
}

/// Python annotation for a type expression. Names in `pending` are quoted.
pub(crate) fn type_annotation(expr: &TypeExpr, pending: &HashSet<String>) -> String {
  match expr {
    TypeExpr::Primitive(primitive) => match primitive {
      Primitive::Int => "int".to_string(),
      Primitive::Str => "str".to_string(),
      Primitive::Base64Str => "Annotated[str, 'base64']".to_string(),
      Primitive::Bool => "bool".to_string(),
      Primitive::Float => "float".to_string(),
      Primitive::Map => "dict".to_string(),
    },
    TypeExpr::Literal(values) => format!("Literal[{}]", values.iter().map(literal).join(", ")),
    TypeExpr::Named(name) if pending.contains(name) => py_str(name),
    TypeExpr::Named(name) => name.clone(),
    TypeExpr::List(inner) => format!("list[{}]", type_annotation(inner, pending)),
    TypeExpr::Union(members) => format!(
      "Union[{}]",
      members.iter().map(|member| type_annotation(member, pending)).join(", ")
    ),
    TypeExpr::Optional(inner) => format!("Optional[{}]", type_annotation(inner, pending)),
    TypeExpr::Omissible(inner) => format!("NotRequired[{}]", type_annotation(inner, pending)),
    TypeExpr::Iterator(inner) => format!("Iterator[{}]", type_annotation(inner, pending)),
    TypeExpr::Null => "None".to_string(),
  }
}

pub(crate) fn literal(value: &LiteralValue) -> String {
  match value {
    LiteralValue::Str(text) => py_str(text),
    LiteralValue::Number(number) => number.to_string(),
    LiteralValue::Bool(true) => "True".to_string(),
    LiteralValue::Bool(false) => "False".to_string(),
    LiteralValue::Null => "None".to_string(),
  }
}

/// Single-quoted Python string literal.
pub(crate) fn py_str(text: &str) -> String {
  let mut quoted = String::with_capacity(text.len() + 2);
  quoted.push('\'');
  for c in text.chars() {
    match c {
      '\\' => quoted.push_str("\\\\"),
      '\'' => quoted.push_str("\\'"),
      '\n' => quoted.push_str("\\n"),
      '\r' => quoted.push_str("\\r"),
      '\t' => quoted.push_str("\\t"),
      // Every `char::is_control` code point is below U+00A0.
      c if c.is_control() => quoted.push_str(&format!("\\x{:02x}", u32::from(c))),
      _ => quoted.push(c),
    }
  }
  quoted.push('\'');
  quoted
}

fn docstring(out: &mut CodeWriter, docs: &Documentation) {
  let mut lines = docs
    .lines()
    .iter()
    .map(|line| line.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\""))
    .collect::<Vec<_>>();
  let Some(last) = lines.last_mut() else { return };
  if last.ends_with('"') {
    last.pop();
    last.push_str("\\\"");
  }

  if let [only] = lines.as_slice() {
    out.line(format!("\"\"\"{only}\"\"\""));
    return;
  }
  let mut lines = lines.into_iter();
  out.line(format!("\"\"\"{}", lines.next().unwrap_or_default()));
  for line in lines {
    out.line(line);
  }
  out.line("\"\"\"");
}

#[derive(Debug, Default)]
struct HelperImports {
  typing: BTreeSet<&'static str>,
  typing_extensions: BTreeSet<&'static str>,
  cached_property: bool,
  future_annotations: bool,
}

impl HelperImports {
  fn collect(module: &ModuleDecl) -> Self {
    let mut helpers = Self::default();
    for item in &module.items {
      match item {
        ModuleItem::Schema(SchemaDecl::Record(record)) => {
          helpers.typing_extensions.insert("TypedDict");
          for field in &record.fields {
            helpers.visit(&field.type_expr);
          }
        }
        ModuleItem::Schema(SchemaDecl::Alias(alias)) => helpers.visit(&alias.target),
        ModuleItem::Class(class) => {
          helpers.future_annotations = true;
          for method in &class.methods {
            for param in &method.params {
              helpers.visit(&param.type_expr);
            }
            helpers.visit(&method.return_type);
          }
        }
        ModuleItem::Facade(_) => helpers.cached_property = true,
        ModuleItem::Exports(_) => {}
      }
    }
    helpers
  }

  fn visit(&mut self, expr: &TypeExpr) {
    match expr {
      TypeExpr::Primitive(Primitive::Base64Str) => {
        self.typing.insert("Annotated");
      }
      TypeExpr::Primitive(_) | TypeExpr::Named(_) | TypeExpr::Null => {}
      TypeExpr::Literal(_) => {
        self.typing.insert("Literal");
      }
      TypeExpr::List(inner) => self.visit(inner),
      TypeExpr::Union(members) => {
        self.typing.insert("Union");
        for member in members {
          self.visit(member);
        }
      }
      TypeExpr::Optional(inner) => {
        self.typing.insert("Optional");
        self.visit(inner);
      }
      TypeExpr::Omissible(inner) => {
        self.typing_extensions.insert("NotRequired");
        self.visit(inner);
      }
      TypeExpr::Iterator(inner) => {
        self.typing.insert("Iterator");
        self.visit(inner);
      }
    }
  }
}
