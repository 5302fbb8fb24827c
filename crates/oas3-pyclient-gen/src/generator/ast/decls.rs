use strum::{Display, EnumString};

use super::{Documentation, LiteralValue, TypeExpr};

/// The seven HTTP verbs an OpenAPI path item may declare operations for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum HttpMethod {
  Get,
  Put,
  Post,
  Delete,
  Options,
  Head,
  Patch,
}

impl HttpMethod {
  pub fn as_upper(self) -> String {
    self.to_string().to_uppercase()
  }
}

/// Which client primitive a method body delegates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPrimitive {
  /// One request, one parsed response.
  Single,
  /// Follows the cursor token page after page, yielding items.
  Paginated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubPath {
  Literal(String),
  /// Path template whose `{ident}` placeholders name method parameters.
  Formatted(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryArg {
  pub wire_name: String,
  pub ident: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestCall {
  pub primitive: RequestPrimitive,
  pub method: HttpMethod,
  pub sub_path: SubPath,
  pub query: Vec<QueryArg>,
  pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
  pub name: String,
  pub type_expr: TypeExpr,
  /// `Some` marks the parameter as optional with this default.
  pub default: Option<LiteralValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
  pub name: String,
  /// Parameters after the receiver, already in emission order.
  pub params: Vec<ParamDecl>,
  pub return_type: TypeExpr,
  pub docs: Documentation,
  pub call: RequestCall,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
  pub name: String,
  pub type_expr: TypeExpr,
  pub docs: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordDecl {
  pub name: String,
  pub docs: Documentation,
  pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AliasDecl {
  pub name: String,
  pub docs: Documentation,
  pub target: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaDecl {
  Record(RecordDecl),
  Alias(AliasDecl),
}

impl SchemaDecl {
  pub fn name(&self) -> &str {
    match self {
      Self::Record(def) => &def.name,
      Self::Alias(def) => &def.name,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
  pub name: String,
  pub base: String,
  pub docs: Documentation,
  pub methods: Vec<MethodDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorDecl {
  pub name: String,
  pub class_name: String,
}

/// Composition class exposing each resource as a lazily built property.
#[derive(Debug, Clone, PartialEq)]
pub struct FacadeDecl {
  pub name: String,
  pub docs: Documentation,
  pub accessors: Vec<AccessorDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ImportDecl {
  /// Dotted module path; a leading `.` marks a package-relative import.
  pub module: String,
  pub names: Vec<String>,
}

impl ImportDecl {
  pub fn new(module: impl Into<String>, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
    Self {
      module: module.into(),
      names: names.into_iter().map(Into::into).collect(),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModuleItem {
  Schema(SchemaDecl),
  Class(ClassDecl),
  Facade(FacadeDecl),
  Exports(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleDecl {
  pub docs: Documentation,
  pub imports: Vec<ImportDecl>,
  pub items: Vec<ModuleItem>,
}
