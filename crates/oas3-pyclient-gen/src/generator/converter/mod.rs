//! Schema fragments to declarations.
//!
//! [`type_resolver`] turns single fragments into type expressions,
//! [`operations`] gathers everything one HTTP verb needs, and the remaining
//! modules synthesize method, record and class declarations from those.

pub(crate) mod classes;
pub(crate) mod methods;
pub(crate) mod operations;
pub(crate) mod records;
pub(crate) mod type_resolver;

pub(crate) use classes::{
  ClassOutput, MappedOperation, build_resource_class, resource_path_to_class_def, unsupported_methods,
};
pub(crate) use records::schema_to_decl;

#[cfg(test)]
mod tests;
