//! Patching the routes file with new resource registrations
//!
//! A rendered route goes, in order of preference:
//!
//! 1. before `// apigen:routes:end` when the file has a
//!    `// apigen:routes:begin` / `// apigen:routes:end` block, at the end
//!    marker's indentation;
//! 2. before the final line, indented four spaces, when that line is the
//!    configured closing line (`});` by default);
//! 3. at the end of the file.
//!
//! Every call adds an entry; nothing checks for an existing registration.

use std::fs;
use std::path::Path;

use crate::error::{GeneratorError, GeneratorResult};

pub const BLOCK_BEGIN: &str = "// apigen:routes:begin";
pub const BLOCK_END: &str = "// apigen:routes:end";

const CLOSING_INDENT: &str = "    ";

/// Where a route was inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    MarkerBlock,
    BeforeClosingLine,
    Appended,
}

impl std::fmt::Display for Insertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Insertion::MarkerBlock => write!(f, "inside the route block"),
            Insertion::BeforeClosingLine => write!(f, "before the closing line"),
            Insertion::Appended => write!(f, "at the end of the file"),
        }
    }
}

/// Insert `route` into `source`
pub fn insert_route(source: &str, route: &str, closing_line: &str) -> (String, Insertion) {
    let route = route.trim_end_matches(['\n', '\r']);
    let mut lines: Vec<String> = source.lines().map(str::to_string).collect();
    let trailing_newline = source.ends_with('\n');

    if let Some(end) = marker_block_end(&lines) {
        let indent = leading_whitespace(&lines[end]).to_string();
        lines.splice(end..end, indented(route, &indent));
        return (join(&lines, trailing_newline), Insertion::MarkerBlock);
    }

    let closes = lines.last().is_some_and(|last| {
        let closing = closing_line.trim();
        !closing.is_empty() && last.trim() == closing
    });
    if closes {
        let at = lines.len() - 1;
        lines.splice(at..at, indented(route, CLOSING_INDENT));
        return (join(&lines, trailing_newline), Insertion::BeforeClosingLine);
    }

    let mut output = source.to_string();
    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }
    output.push_str(route);
    output.push('\n');
    (output, Insertion::Appended)
}

/// Read, patch and rewrite the routes file; a missing file is
/// [`GeneratorError::NotFound`] and is not created
pub fn append_route(routes_file: &Path, route: &str, closing_line: &str) -> GeneratorResult<Insertion> {
    let source = fs::read_to_string(routes_file).map_err(|e| GeneratorError::io(routes_file, e))?;
    let (patched, insertion) = insert_route(&source, route, closing_line);
    fs::write(routes_file, patched).map_err(|e| GeneratorError::io(routes_file, e))?;

    log::debug!("Route added to {} {}", routes_file.display(), insertion);
    Ok(insertion)
}

/// Index of the end marker of the first complete marker block
fn marker_block_end(lines: &[String]) -> Option<usize> {
    let begin = lines.iter().position(|line| line.trim() == BLOCK_BEGIN)?;
    lines[begin + 1..]
        .iter()
        .position(|line| line.trim() == BLOCK_END)
        .map(|offset| begin + 1 + offset)
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

fn indented(text: &str, indent: &str) -> Vec<String> {
    text.lines()
        .map(|line| if line.trim().is_empty() { String::new() } else { format!("{}{}", indent, line) })
        .collect()
}

fn join(lines: &[String], trailing_newline: bool) -> String {
    let mut output = lines.join("\n");
    if trailing_newline {
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTE: &str = "router.resource(\"payers\", PayerController::default());\n";

    #[test]
    fn marker_block_keeps_end_marker_last() {
        let source = "fn routes() {\n    // apigen:routes:begin\n    a();\n    // apigen:routes:end\n}\n";
        let (once, insertion) = insert_route(source, ROUTE, "});");
        assert_eq!(insertion, Insertion::MarkerBlock);
        let (twice, _) = insert_route(&once, "b();", "});");

        assert_eq!(
            twice,
            "fn routes() {\n    // apigen:routes:begin\n    a();\n    \
             router.resource(\"payers\", PayerController::default());\n    b();\n    \
             // apigen:routes:end\n}\n"
        );
    }

    #[test]
    fn end_marker_without_begin_is_ignored() {
        let source = "x\n// apigen:routes:end\n";
        let (patched, insertion) = insert_route(source, "r();", "});");
        assert_eq!(insertion, Insertion::Appended);
        assert_eq!(patched, "x\n// apigen:routes:end\nr();\n");
    }

    #[test]
    fn legacy_closing_line() {
        let source = "Route::group(function () {\n    a();\n});\n";
        let (patched, insertion) = insert_route(source, "b();", "});");
        assert_eq!(insertion, Insertion::BeforeClosingLine);
        assert_eq!(patched, "Route::group(function () {\n    a();\n    b();\n});\n");
    }

    #[test]
    fn legacy_without_trailing_newline() {
        let (patched, _) = insert_route("group(|| {\n});", "b();", "});");
        assert_eq!(patched, "group(|| {\n    b();\n});");
    }

    #[test]
    fn fallback_appends() {
        let (patched, insertion) = insert_route("fn main() {}", "b();", "});");
        assert_eq!(insertion, Insertion::Appended);
        assert_eq!(patched, "fn main() {}\nb();\n");

        let (empty, _) = insert_route("", "b();", "});");
        assert_eq!(empty, "b();\n");
    }

    #[test]
    fn not_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("routes.rs");
        fs::write(&file, "// apigen:routes:begin\n// apigen:routes:end\n").unwrap();

        append_route(&file, ROUTE, "});").unwrap();
        append_route(&file, ROUTE, "});").unwrap();

        let content = fs::read_to_string(&file).unwrap();
        assert_eq!(content.matches("PayerController").count(), 2);
    }

    #[test]
    fn missing_routes_file_is_not_created() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("routes.rs");
        let err = append_route(&file, ROUTE, "});").unwrap_err();
        assert!(matches!(err, GeneratorError::NotFound { .. }));
        assert!(!file.exists());
    }
}
