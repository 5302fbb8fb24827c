use dialoguer::Input;

use super::MappingEntry;
use crate::generator::{
  ast::HttpMethod,
  errors::{GeneratorError, GeneratorResult},
  naming::identifiers::is_valid_identifier,
};

/// Decides the final entry for an unmapped endpoint, given the suggestion.
pub trait MappingPrompter {
  fn confirm(&mut self, path: &str, method: HttpMethod, suggestion: MappingEntry) -> GeneratorResult<MappingEntry>;
}

/// Batch mode: every suggestion is taken as is.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoAccept;

impl MappingPrompter for AutoAccept {
  fn confirm(&mut self, _path: &str, _method: HttpMethod, suggestion: MappingEntry) -> GeneratorResult<MappingEntry> {
    Ok(suggestion)
  }
}

/// Asks on the terminal, offering the suggestion as the default answer.
#[derive(Debug, Default, Clone, Copy)]
pub struct InteractivePrompter;

impl InteractivePrompter {
  fn ask(prompt: String, default: String) -> GeneratorResult<String> {
    Input::<String>::new()
      .with_prompt(prompt)
      .default(default)
      .validate_with(|input: &String| -> Result<(), &str> {
        if is_valid_identifier(input) {
          Ok(())
        } else {
          Err("not a valid Python identifier")
        }
      })
      .interact_text()
      .map_err(|err| GeneratorError::PromptFailed {
        reason: err.to_string(),
      })
  }
}

impl MappingPrompter for InteractivePrompter {
  fn confirm(&mut self, path: &str, method: HttpMethod, suggestion: MappingEntry) -> GeneratorResult<MappingEntry> {
    let label = format!("{} {path}", method.as_upper());
    let resource_class = Self::ask(format!("Resource class for {label}"), suggestion.resource_class)?;
    let method_name = Self::ask(format!("Method name for {label}"), suggestion.method_name)?;
    Ok(MappingEntry {
      resource_class,
      method_name,
    })
  }
}
