use super::MappingTable;
use crate::generator::{ast::HttpMethod, naming::identifiers::to_class_name};

fn is_parametric(segment: &str) -> bool {
  segment.starts_with('{') && segment.ends_with('}')
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
  path.split('/').filter(|segment| !segment.is_empty())
}

/// Class for a path not yet in the table.
///
/// The longest table key that is a string prefix of `path` wins, reusing the
/// class of its first entry. Without a match the last non-parametric segment
/// becomes `<Segment><suffix>`; a path made only of parameters maps to
/// `root_name`.
pub(crate) fn suggest_class_name(table: &MappingTable, path: &str, suffix: &str, root_name: &str) -> String {
  let inherited = table
    .iter()
    .filter(|(prefix, _)| path.starts_with(prefix.as_str()))
    .filter_map(|(prefix, methods)| Some((prefix.len(), methods.values().next()?)))
    .max_by_key(|(len, _)| *len)
    .map(|(_, entry)| entry.resource_class.clone());
  if let Some(class_name) = inherited {
    return class_name;
  }

  segments(path)
    .filter(|segment| !is_parametric(segment))
    .last()
    .map(to_class_name)
    .filter(|stem| !stem.is_empty())
    .map_or_else(|| root_name.to_string(), |stem| format!("{stem}{suffix}"))
}

/// Method name from the verb and whether the path ends in a parameter.
pub(crate) fn suggest_method_name(path: &str, method: HttpMethod) -> String {
  let ends_with_param = segments(path).last().is_some_and(is_parametric);
  match method {
    HttpMethod::Get if ends_with_param => "get".to_string(),
    HttpMethod::Get => "list".to_string(),
    HttpMethod::Post => "create".to_string(),
    HttpMethod::Put => "update".to_string(),
    HttpMethod::Patch => "partial_update".to_string(),
    HttpMethod::Delete => "delete".to_string(),
    HttpMethod::Head | HttpMethod::Options => method.to_string(),
  }
}
