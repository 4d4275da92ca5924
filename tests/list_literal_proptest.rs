//! Property-based tests for list literal extraction
//!
//! Generated responses wrap a file list in a heading and a python fence; whatever the
//! paths and formatting, the entries must come back unchanged and in order.

use codeparser::{parse_code, parse_file_list, parse_list_literal, ListSyntax};
use proptest::prelude::*;

/// Path-like strings without quotes, backslashes or newlines
fn path_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_./\\-]{1,24}|[任务列表知识库]{1,6}\\.py"
}

fn render_list(paths: &[String], single_quotes: bool, one_per_line: bool) -> String {
    let quote = if single_quotes { '\'' } else { '"' };
    let entries: Vec<String> = paths
        .iter()
        .map(|p| format!("{}{}{}", quote, p, quote))
        .collect();
    if one_per_line {
        let mut out = String::from("[\n");
        for entry in &entries {
            out.push_str(&format!("    {},\n", entry));
        }
        out.push(']');
        out
    } else {
        format!("[{}]", entries.join(", "))
    }
}

proptest! {
    #[test]
    fn file_lists_round_trip(
        paths in prop::collection::vec(path_strategy(), 0..12),
        single_quotes in any::<bool>(),
        one_per_line in any::<bool>(),
    ) {
        let list = render_list(&paths, single_quotes, one_per_line);
        let document = format!(
            "## Logic Analysis\nSee below.\n\n## Task list\n```python\ntask_list = {}\n```\n",
            list
        );

        let files = parse_file_list("Task list", &document, Some("python")).unwrap();
        prop_assert_eq!(&files, &paths);

        let code = parse_code("Task list", &document, Some("python")).unwrap();
        prop_assert!(document.contains(code));
        prop_assert_eq!(code, format!("task_list = {}\n", list));
    }

    #[test]
    fn literal_source_is_a_slice_of_the_section(
        paths in prop::collection::vec(path_strategy(), 1..8),
        prefix in "[a-z ]{0,20}",
    ) {
        let list = render_list(&paths, false, false);
        let document = format!("## Files\n{}{}\n", prefix, list);

        let literal = parse_list_literal("Files", &document, None).unwrap();
        prop_assert_eq!(literal.source, list.as_str());
        prop_assert_eq!(literal.len(), paths.len());
    }

    #[test]
    fn never_panics_on_arbitrary_text(text in "\\PC{0,200}") {
        let document = format!("## Task list\n{}", text);
        let _ = parse_file_list("Task list", &document, None);
        let _ = parse_code("Task list", &document, None);
        let _ = codeparser::parse_blocks(&text);
    }
}

#[test]
fn test_syntax_hint_changes_accepted_quotes() {
    let document = "## Files\n['a.py', 'b.py']\n";
    assert_eq!(
        parse_file_list("Files", document, Some("python")),
        Ok(vec!["a.py".to_string(), "b.py".to_string()])
    );
    assert!(parse_file_list("Files", document, Some("json")).is_err());
    assert_eq!(ListSyntax::from_lang(Some("json")), ListSyntax::Json);
}
