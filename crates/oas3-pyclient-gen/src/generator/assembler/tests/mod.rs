use std::path::PathBuf;

use super::{module_file_path, package_marker_path};
use crate::generator::{CodegenConfig, codegen::PythonRenderer};

mod resource_packages;

fn segments(path: &[&str]) -> Vec<String> {
  path.iter().map(|segment| (*segment).to_string()).collect()
}

#[test]
fn test_module_file_path() {
  let renderer = PythonRenderer::new(&CodegenConfig::default());
  assert_eq!(
    module_file_path(&segments(&["schemas", "call"]), &renderer),
    PathBuf::from("schemas/call.py")
  );
  assert_eq!(module_file_path(&[], &renderer), PathBuf::new());
}

#[test]
fn test_package_marker_path() {
  let renderer = PythonRenderer::new(&CodegenConfig::default());
  assert_eq!(
    package_marker_path(&segments(&["schemas", "call"]), &renderer),
    Some(PathBuf::from("schemas/call/__init__.py"))
  );
}
