/// Returns the span from the first `{` to the last `}` of a completion.
///
/// This is a plain greedy cut, not a balanced-brace scan: `a {x} b {y}` yields
/// `{x} b {y}`. When no `}` follows the first `{` the text is returned unchanged.
pub fn extract_json_block(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}
