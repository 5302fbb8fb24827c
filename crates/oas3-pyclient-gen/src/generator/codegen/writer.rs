const INDENT: &str = "    ";

/// Line-oriented text buffer with indentation tracking.
#[derive(Debug, Default)]
pub(super) struct CodeWriter {
  buffer: String,
  depth: usize,
}

impl CodeWriter {
  pub(super) fn line(&mut self, text: impl AsRef<str>) {
    let text = text.as_ref();
    if !text.is_empty() {
      for _ in 0..self.depth {
        self.buffer.push_str(INDENT);
      }
      self.buffer.push_str(text);
    }
    self.buffer.push('\n');
  }

  pub(super) fn blank(&mut self) {
    self.buffer.push('\n');
  }

  /// Ensures the buffer ends with exactly `count` blank lines, unless empty.
  pub(super) fn separate(&mut self, count: usize) {
    if self.buffer.is_empty() {
      return;
    }
    while self.buffer.ends_with("\n\n") {
      self.buffer.pop();
    }
    for _ in 0..count {
      self.buffer.push('\n');
    }
  }

  pub(super) fn indented(&mut self, body: impl FnOnce(&mut Self)) {
    self.depth += 1;
    body(self);
    self.depth -= 1;
  }

  pub(super) fn finish(mut self) -> String {
    while self.buffer.ends_with("\n\n") {
      self.buffer.pop();
    }
    if !self.buffer.is_empty() && !self.buffer.ends_with('\n') {
      self.buffer.push('\n');
    }
    self.buffer
  }
}
