//! Address-carrying views into the raw OpenAPI document.
//!
//! A [`SchemaNode`] never copies or mutates the document. It pairs a shared
//! handle to the parsed tree with the ordered key path that leads to one
//! fragment. Two read modes are kept apart on purpose:
//!
//! * [`SchemaNode::own`] returns the fragment exactly as written, so a `$ref`
//!   object stays a `$ref` object.
//! * [`SchemaNode::deref`] follows `$ref` chains and returns the node at the
//!   referent's address.
//!
//! The type resolver relies on the first mode for record fields: a property
//! whose schema is a `$ref` must resolve to a named reference, not to the
//! referent's inline shape.

use std::{collections::BTreeSet, fmt, sync::Arc};

use percent_encoding::percent_decode_str;
use serde_json::Value;

use crate::generator::{
  errors::{GeneratorError, GeneratorResult},
  naming::identifiers::to_type_name,
};

const MAX_REF_DEPTH: usize = 32;
pub(crate) const SCHEMA_COMPONENTS: [&str; 2] = ["components", "schemas"];

#[derive(Debug, Clone)]
pub struct SchemaNode {
  document: Arc<Value>,
  address: Vec<String>,
}

impl SchemaNode {
  pub fn root(document: Arc<Value>) -> Self {
    Self {
      document,
      address: vec![],
    }
  }

  pub fn at(document: Arc<Value>, address: Vec<String>) -> Self {
    Self { document, address }
  }

  #[cfg(test)]
  pub fn address(&self) -> &[String] {
    &self.address
  }

  #[must_use]
  pub fn join(&self, segment: impl Into<String>) -> Self {
    let mut address = self.address.clone();
    address.push(segment.into());
    Self {
      document: self.document.clone(),
      address,
    }
  }

  pub fn parent(&self) -> Option<Self> {
    let (_, rest) = self.address.split_last()?;
    Some(Self {
      document: self.document.clone(),
      address: rest.to_vec(),
    })
  }

  pub fn last_segment(&self) -> Option<&str> {
    self.address.last().map(String::as_str)
  }

  /// Segment `n` positions before the last one (`0` is the last segment).
  pub fn segment_from_end(&self, n: usize) -> Option<&str> {
    let len = self.address.len();
    if n >= len {
      return None;
    }
    Some(self.address[len - 1 - n].as_str())
  }

  /// The fragment exactly as written at this address, without following `$ref`.
  pub fn own(&self) -> Option<&Value> {
    lookup(&self.document, &self.address)
  }

  pub fn exists(&self) -> bool {
    self.own().is_some()
  }

  pub fn ref_target(&self) -> Option<&str> {
    self.own()?.get("$ref")?.as_str()
  }

  pub fn is_ref(&self) -> bool {
    self.ref_target().is_some()
  }

  pub fn own_str(&self, key: &str) -> Option<&str> {
    self.own()?.get(key)?.as_str()
  }

  pub fn own_bool(&self, key: &str) -> Option<bool> {
    self.own()?.get(key)?.as_bool()
  }

  pub fn own_has(&self, key: &str) -> bool {
    self.own().and_then(|value| value.get(key)).is_some()
  }

  /// Follows `$ref` chains starting at this node and returns the node at the
  /// final referent's address. Non-reference nodes return themselves.
  pub fn deref(&self) -> GeneratorResult<Self> {
    let mut current = self.clone();
    for _ in 0..MAX_REF_DEPTH {
      let Some(reference) = current.ref_target() else {
        return Ok(current);
      };
      let address = parse_ref(reference).ok_or_else(|| current.unresolvable(reference))?;
      if lookup(&self.document, &address).is_none() {
        return Err(current.unresolvable(reference));
      }
      current = Self::at(self.document.clone(), address);
    }
    Err(self.unresolvable(self.ref_target().unwrap_or_default()))
  }

  /// Follows any `$ref` at this node, then steps into `segment`.
  pub fn descend(&self, segment: impl Into<String>) -> GeneratorResult<Self> {
    Ok(self.deref()?.join(segment))
  }

  /// Reads the fragment after following any `$ref` at this node.
  pub fn resolved(&self) -> GeneratorResult<Option<&Value>> {
    let target = self.deref()?;
    Ok(lookup(&self.document, &target.address))
  }

  /// Child nodes of an object fragment in declared order, addressed through
  /// this node (not through any `$ref`).
  pub fn children(&self) -> Vec<Self> {
    match self.own() {
      Some(Value::Object(map)) => map.keys().map(|key| self.join(key.clone())).collect(),
      Some(Value::Array(items)) => (0..items.len()).map(|index| self.join(index.to_string())).collect(),
      _ => vec![],
    }
  }

  /// Names of `#/components/schemas` entries referenced anywhere inside this
  /// fragment. Schema references are recorded, never expanded. With
  /// `follow_components`, references to other component kinds (parameters,
  /// responses, request bodies) are followed and scanned as well.
  pub fn referenced_schemas(&self, follow_components: bool) -> BTreeSet<String> {
    let mut refs = BTreeSet::new();
    let mut visited = BTreeSet::new();
    if let Some(value) = self.own() {
      self.scan_refs(value, follow_components, &mut visited, &mut refs);
    }
    refs
  }

  fn scan_refs(
    &self,
    value: &Value,
    follow_components: bool,
    visited: &mut BTreeSet<String>,
    refs: &mut BTreeSet<String>,
  ) {
    match value {
      Value::Object(map) => {
        if let Some(Value::String(reference)) = map.get("$ref") {
          if let Some(name) = schema_name_from_ref(reference) {
            refs.insert(name);
          } else if follow_components
            && visited.insert(reference.clone())
            && let Some(address) = parse_ref(reference)
            && let Some(target) = lookup(&self.document, &address)
          {
            self.scan_refs(target, follow_components, visited, refs);
          }
        }
        for (key, child) in map {
          if key != "$ref" {
            self.scan_refs(child, follow_components, visited, refs);
          }
        }
      }
      Value::Array(items) => {
        for item in items {
          self.scan_refs(item, follow_components, visited, refs);
        }
      }
      _ => {}
    }
  }

  fn unresolvable(&self, reference: &str) -> GeneratorError {
    GeneratorError::UnresolvableRef {
      address: self.to_string(),
      reference: reference.to_string(),
    }
  }
}

impl fmt::Display for SchemaNode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.address.join("."))
  }
}

fn lookup<'a>(root: &'a Value, address: &[String]) -> Option<&'a Value> {
  address.iter().try_fold(root, |current, segment| match current {
    Value::Object(map) => map.get(segment),
    Value::Array(items) => segment.parse::<usize>().ok().and_then(|index| items.get(index)),
    _ => None,
  })
}

/// Splits an internal `$ref` (`#/a/b~1c`) into its decoded address segments.
/// External references yield `None`.
pub fn parse_ref(reference: &str) -> Option<Vec<String>> {
  let pointer = reference.strip_prefix('#')?;
  if pointer.is_empty() {
    return Some(vec![]);
  }
  let pointer = pointer.strip_prefix('/')?;
  Some(
    pointer
      .split('/')
      .map(|token| {
        let decoded = percent_decode_str(token).decode_utf8_lossy();
        decoded.replace("~1", "/").replace("~0", "~")
      })
      .collect(),
  )
}

/// Returns the component key for references into `#/components/schemas`.
pub fn schema_name_from_ref(reference: &str) -> Option<String> {
  match parse_ref(reference)?.as_slice() {
    [components, schemas, name] if *components == SCHEMA_COMPONENTS[0] && *schemas == SCHEMA_COMPONENTS[1] => {
      Some(name.clone())
    }
    _ => None,
  }
}

/// Type name for a schema key: the final dotted segment (`schemas.call.CallProto` -> `CallProto`).
pub fn type_name_from_key(key: &str) -> String {
  to_type_name(key.rsplit('.').next().unwrap_or(key))
}
