// Devrs CSV Helpers
// Line splitting and quote-aware field splitting for the device table

/// Split raw table text into lines.
///
/// Either `\n` or `\r` (alone, consecutive, or combined) denotes a line
/// break, so `\r\n` sequences produce empty fragments; those are dropped
/// here rather than handed to the row parser.
pub fn split_lines(raw: &str) -> Vec<&str> {
    raw.split(['\n', '\r']).filter(|line| !line.is_empty()).collect()
}

/// Split a single line into fields on commas, ignoring commas inside a
/// pair of double quotes.
///
/// A comma is a split point only when the quotes before it and after it
/// are both balanced. No escaping of embedded quote characters is
/// supported.
///
/// Returns `None` when the line has no split points at all: an empty
/// line, a line without any unquoted comma, or a line with unbalanced
/// quotes (no comma can then leave both sides balanced). Callers skip
/// such lines.
pub fn split_fields(line: &str) -> Option<Vec<&str>> {
    if line.chars().filter(|&c| c == '"').count() % 2 != 0 {
        return None;
    }

    let mut fields = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    for (idx, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(&line[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }

    // No unquoted comma means no split points at all.
    if fields.is_empty() {
        return None;
    }
    fields.push(&line[start..]);
    Some(fields)
}

/// Strip one leading and one trailing literal double quote, if present.
///
/// Used on the model-names field, which is quoted in the source whenever
/// it contains commas.
pub fn strip_outer_quotes(field: &str) -> &str {
    let field = field.strip_prefix('"').unwrap_or(field);
    field.strip_suffix('"').unwrap_or(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_lf() {
        assert_eq!(split_lines("a\nb\nc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_lines_crlf() {
        assert_eq!(split_lines("a\r\nb\r\nc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_lines_mixed_and_consecutive() {
        assert_eq!(split_lines("a\r\n\n\rb\rc\n"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_lines_empty() {
        assert!(split_lines("").is_empty());
        assert!(split_lines("\r\n\r\n").is_empty());
    }

    #[test]
    fn test_split_fields_simple() {
        assert_eq!(split_fields("a,b,c"), Some(vec!["a", "b", "c"]));
    }

    #[test]
    fn test_split_fields_quoted_comma() {
        assert_eq!(
            split_fields("iPhone 13,\"iPhone14,2;iPhone14,3\",47"),
            Some(vec!["iPhone 13", "\"iPhone14,2;iPhone14,3\"", "47"])
        );
    }

    #[test]
    fn test_split_fields_empty_trailing_field() {
        assert_eq!(split_fields("a,b,"), Some(vec!["a", "b", ""]));
    }

    #[test]
    fn test_split_fields_no_comma() {
        assert_eq!(split_fields("just one field"), None);
    }

    #[test]
    fn test_split_fields_empty_line() {
        assert_eq!(split_fields(""), None);
    }

    #[test]
    fn test_split_fields_unbalanced_quotes() {
        assert_eq!(split_fields("a,\"b,c"), None);
        assert_eq!(split_fields("\"a,b"), None);
    }

    #[test]
    fn test_split_fields_comma_only_inside_quotes() {
        // The only comma is quoted, so there is no split point.
        assert_eq!(split_fields("\"a,b\""), None);
    }

    #[test]
    fn test_split_fields_adjacent_quoted_fields() {
        assert_eq!(split_fields("\"a,b\",\"c,d\""), Some(vec!["\"a,b\"", "\"c,d\""]));
    }

    #[test]
    fn test_strip_outer_quotes() {
        assert_eq!(strip_outer_quotes("\"a;b\""), "a;b");
        assert_eq!(strip_outer_quotes("a;b"), "a;b");
        assert_eq!(strip_outer_quotes("\"a"), "a");
        assert_eq!(strip_outer_quotes("a\""), "a");
        assert_eq!(strip_outer_quotes(""), "");
    }
}
