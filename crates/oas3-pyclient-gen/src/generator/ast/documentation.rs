#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Documentation {
  lines: Vec<String>,
}

impl Documentation {
  #[must_use]
  pub fn from_raw(input: &str) -> Self {
    let normalized = input.replace("\\n", "\n");
    Self {
      lines: normalized.trim().lines().map(|line| line.trim_end().to_string()).collect(),
    }
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  #[must_use]
  pub fn lines(&self) -> &[String] {
    &self.lines
  }

  pub fn push(&mut self, line: impl Into<String>) {
    self.lines.push(line.into());
  }

  pub fn extend(&mut self, lines: impl IntoIterator<Item = impl Into<String>>) {
    self.lines.extend(lines.into_iter().map(Into::into));
  }

  /// Appends a blank separator line unless the documentation is empty.
  pub fn push_blank(&mut self) {
    if !self.lines.is_empty() {
      self.lines.push(String::new());
    }
  }

  /// Appends a section of raw text as its own paragraph.
  pub fn push_paragraph(&mut self, text: &str) {
    let paragraph = Self::from_raw(text);
    if paragraph.is_empty() {
      return;
    }
    self.push_blank();
    self.lines.extend(paragraph.lines);
  }

  /// Single-line rendering for places that cannot hold multi-line text.
  pub fn joined(&self) -> String {
    self
      .lines
      .iter()
      .map(|line| line.trim())
      .filter(|line| !line.is_empty())
      .collect::<Vec<_>>()
      .join(" ")
  }
}

impl From<&str> for Documentation {
  fn from(s: &str) -> Self {
    Self::from_raw(s)
  }
}

impl From<String> for Documentation {
  fn from(s: String) -> Self {
    Self::from_raw(&s)
  }
}

impl<S: Into<String>> FromIterator<S> for Documentation {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    Self {
      lines: iter.into_iter().map(Into::into).collect(),
    }
  }
}
