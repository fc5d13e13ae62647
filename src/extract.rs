//! Isolating a SQL statement from free-text model output.

const FENCE_OPEN: &str = "```sql";
const FENCE_CLOSE: &str = "```";

/// Extract a single SQL statement from raw model output.
///
/// Takes the content of the first ```sql fenced block when one exists
/// (fence tag matched case-insensitively), otherwise the whole trimmed
/// text. The candidate is then cut at the first semicolon, keeping it,
/// to drop trailing commentary. No SQL validity is checked.
///
/// Known limitation: the semicolon cut also truncates statements with a
/// semicolon inside a string literal, and multi-statement output.
pub fn extract_sql(raw: &str) -> String {
    let candidate = fenced_sql_block(raw).unwrap_or(raw).trim();
    match candidate.find(';') {
        Some(pos) => candidate[..=pos].to_string(),
        None => candidate.to_string(),
    }
}

/// Content of the first complete ```sql ... ``` block, if any.
fn fenced_sql_block(text: &str) -> Option<&str> {
    let open = find_ignore_ascii_case(text, FENCE_OPEN, 0)?;
    let body = open + FENCE_OPEN.len();
    let close = find_ignore_ascii_case(text, FENCE_CLOSE, body)?;
    Some(&text[body..close])
}

/// Byte offset of `needle` in `haystack[from..]`, ASCII case-insensitive.
///
/// Both fence markers are pure ASCII, so a byte-window scan cannot land on
/// a UTF-8 continuation byte at a match position.
fn find_ignore_ascii_case(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    haystack.as_bytes()[from..]
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle.as_bytes()))
        .map(|pos| pos + from)
}
