use serde_json::{Number, Value};
use strum::Display;

/// Primitive types reachable from the fixed `(type, format)` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Primitive {
  Int,
  Str,
  Base64Str,
  Bool,
  Float,
  Map,
}

impl Primitive {
  /// Maps an OpenAPI `(type, format)` pair onto a primitive.
  pub fn from_type_format(schema_type: &str, format: Option<&str>) -> Option<Self> {
    match (schema_type, format) {
      ("integer", None | Some("int32" | "int64")) => Some(Self::Int),
      ("string", None | Some("date-time")) => Some(Self::Str),
      ("string", Some("byte")) => Some(Self::Base64Str),
      ("boolean", None) => Some(Self::Bool),
      ("object", None) => Some(Self::Map),
      ("number", Some("double")) => Some(Self::Float),
      _ => None,
    }
  }
}

/// A source-level literal: enum members and parameter defaults.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
  Str(String),
  Number(Number),
  Bool(bool),
  Null,
}

impl LiteralValue {
  /// Converts scalar JSON values. Arrays and objects have no literal form.
  pub fn from_json(value: &Value) -> Option<Self> {
    match value {
      Value::String(s) => Some(Self::Str(s.clone())),
      Value::Number(n) => Some(Self::Number(n.clone())),
      Value::Bool(b) => Some(Self::Bool(*b)),
      Value::Null => Some(Self::Null),
      Value::Array(_) | Value::Object(_) => None,
    }
  }
}

/// Language-independent type expression produced by the type resolver.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
  Primitive(Primitive),
  Literal(Vec<LiteralValue>),
  Named(String),
  List(Box<TypeExpr>),
  Union(Vec<TypeExpr>),
  /// The value may be null.
  Optional(Box<TypeExpr>),
  /// The field may be absent from its containing record.
  Omissible(Box<TypeExpr>),
  /// A lazily produced sequence; only used for paginated method returns.
  Iterator(Box<TypeExpr>),
  /// No value at all (operations without a `200` body).
  Null,
}

impl TypeExpr {
  pub fn list(inner: TypeExpr) -> Self {
    Self::List(Box::new(inner))
  }

  pub fn iterator(inner: TypeExpr) -> Self {
    Self::Iterator(Box::new(inner))
  }

  pub fn named(name: impl Into<String>) -> Self {
    Self::Named(name.into())
  }

  /// Applies nullable / omissible wrappers in a fixed order: `Omissible(Optional(T))`.
  #[must_use]
  pub fn wrapped(self, nullable: bool, omissible: bool) -> Self {
    let inner = if nullable { Self::Optional(Box::new(self)) } else { self };
    if omissible {
      Self::Omissible(Box::new(inner))
    } else {
      inner
    }
  }

  pub fn is_optional(&self) -> bool {
    match self {
      Self::Optional(_) => true,
      Self::Omissible(inner) => inner.is_optional(),
      _ => false,
    }
  }

  /// Strips the omissible wrapper; parameters carry omissibility as a default instead.
  #[must_use]
  pub fn without_omissible(self) -> Self {
    match self {
      Self::Omissible(inner) => *inner,
      other => other,
    }
  }

  /// Item type of a list expression, looking through nullable wrappers.
  pub fn list_item(&self) -> Option<&TypeExpr> {
    match self {
      Self::List(inner) => Some(inner),
      Self::Optional(inner) | Self::Omissible(inner) => inner.list_item(),
      _ => None,
    }
  }
}
