use crate::generator::ast::Documentation;

#[test]
fn test_from_raw_splits_and_trims() {
  let docs = Documentation::from_raw("  First line\\nSecond line  \n");
  assert_eq!(docs.lines(), ["First line", "Second line"]);
}

#[test]
fn test_push_paragraph_separates_with_blank_line() {
  let mut docs = Documentation::from_raw("Summary");
  docs.push_paragraph("Details here.");
  docs.push_paragraph("   ");
  assert_eq!(docs.lines(), ["Summary", "", "Details here."]);
}

#[test]
fn test_push_blank_skips_empty_docs() {
  let mut docs = Documentation::default();
  docs.push_blank();
  assert!(docs.is_empty());
}

#[test]
fn test_joined() {
  let docs: Documentation = ["A widget", "", "  with parts"].into_iter().collect();
  assert_eq!(docs.joined(), "A widget with parts");
}
