//! Language-neutral declaration model.
//!
//! Converters produce these values; a [`crate::generator::codegen::SourceRenderer`]
//! turns them into concrete source text.

mod decls;
mod documentation;
mod types;

pub use decls::{
  AccessorDecl, AliasDecl, ClassDecl, FacadeDecl, FieldDecl, HttpMethod, ImportDecl, MethodDecl, ModuleDecl,
  ModuleItem, ParamDecl, QueryArg, RecordDecl, RequestCall, RequestPrimitive, SchemaDecl, SubPath,
};
pub use documentation::Documentation;
pub use types::{LiteralValue, Primitive, TypeExpr};

#[cfg(test)]
mod tests;
