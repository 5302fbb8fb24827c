use std::{collections::HashSet, sync::LazyLock};

use any_ascii::any_ascii;
use inflections::Inflect;
use regex::Regex;

pub(crate) static PYTHON_KEYWORDS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  [
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del",
    "elif", "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda", "nonlocal",
    "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
    // Receiver of every generated method.
    "self",
  ]
  .into_iter()
  .collect()
});

static INVALID_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());
static MULTI_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());
static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Transliterates to ASCII, replaces invalid characters with underscores,
/// collapses consecutive underscores and trims leading or trailing ones.
pub(crate) fn sanitize(input: &str) -> String {
  if input.is_empty() {
    return String::new();
  }

  let ascii = any_ascii(input);
  let replaced = INVALID_CHARS_RE.replace_all(&ascii, "_");
  let collapsed = MULTI_UNDERSCORE_RE.replace_all(&replaced, "_");

  collapsed.trim_matches('_').to_string()
}

/// Whether `name` can be used verbatim as a Python identifier.
pub(crate) fn is_valid_identifier(name: &str) -> bool {
  IDENTIFIER_RE.is_match(name) && !PYTHON_KEYWORDS.contains(name)
}

/// Converts a wire name into a `snake_case` Python identifier.
///
/// # Rules:
/// 1. Sanitizes the base string and converts to `snake_case`.
/// 2. A leading digit gets a `_` prefix.
/// 3. Keywords (and `self`) get a `_` suffix.
/// 4. An empty result becomes `_`.
pub(crate) fn to_python_identifier(name: &str) -> String {
  let ident = sanitize(name).to_snake_case();

  if ident.is_empty() {
    return "_".to_string();
  }

  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    return format!("_{ident}");
  }

  if PYTHON_KEYWORDS.contains(ident.as_str()) {
    return format!("{ident}_");
  }

  ident
}

/// Converts an arbitrary string into a `PascalCase` class name.
pub(crate) fn to_class_name(name: &str) -> String {
  let class_name = sanitize(name).to_pascal_case();
  if class_name.starts_with(|c: char| c.is_ascii_digit()) {
    format!("_{class_name}")
  } else {
    class_name
  }
}

/// Schema type name: kept verbatim when it is already a usable identifier,
/// otherwise converted like [`to_class_name`]. `Widget-v2` -> `WidgetV2`.
pub(crate) fn to_type_name(name: &str) -> String {
  if is_valid_identifier(name) {
    return name.to_string();
  }

  let class_name = to_class_name(name);
  if class_name.is_empty() {
    "_".to_string()
  } else if PYTHON_KEYWORDS.contains(class_name.as_str()) {
    format!("{class_name}_")
  } else {
    class_name
  }
}

/// One segment of a dotted module path: kept verbatim when valid, otherwise
/// `snake_case`d. `call-log` -> `call_log`.
pub(crate) fn to_module_segment(name: &str) -> String {
  if is_valid_identifier(name) {
    name.to_string()
  } else {
    to_python_identifier(name)
  }
}

/// Python module (file stem) for a class: `WidgetsResource` -> `widgets_resource`.
pub(crate) fn module_name_for_class(class_name: &str) -> String {
  to_python_identifier(class_name)
}

/// Facade accessor name for a resource class: `WidgetsResource` -> `widgets`.
pub(crate) fn accessor_name_for_class(class_name: &str, suffix: &str) -> String {
  let stem = class_name.strip_suffix(suffix).filter(|stem| !stem.is_empty()).unwrap_or(class_name);
  to_python_identifier(stem)
}
