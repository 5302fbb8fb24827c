//! Turns the declaration model into concrete source text.

mod python;
mod writer;

use crate::generator::ast::ModuleDecl;

pub(crate) use python::PythonRenderer;

/// Target-language backend. Everything upstream is language neutral; only a
/// renderer knows about syntax, quoting and helper imports.
pub trait SourceRenderer {
  /// File name suffix of one module, including the dot.
  fn file_extension(&self) -> &'static str;

  /// File that marks a directory as a package, if the language needs one.
  fn package_marker(&self) -> Option<&'static str>;

  fn render_module(&self, module: &ModuleDecl) -> String;
}
