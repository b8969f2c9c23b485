//! Prompt construction for the rewrite model.

/// Source content is cut to this prefix before submission; enough for a
/// two-sentence summary without paying for the whole article.
pub const MAX_CONTENT_CHARS: usize = 500;

/// Build the rewrite request for one attempt. Attempts after the first
/// carry an explicit different-wording instruction, which is how retries
/// are expected to escape a literal or structural rejection.
pub fn rewrite_prompt(headline: &str, content: &str, source_name: &str, attempt: u32) -> String {
    let snippet = truncate_chars(content, MAX_CONTENT_CHARS);
    let emphasis = if attempt > 1 {
        "\n\nIMPORTANT: Use completely different words!"
    } else {
        ""
    };

    format!(
        r#"Rewrite this news in your own words.

Write:
1. New headline (don't copy original)
2. 2 sentence summary

Rules: Use different words. Be factual.{emphasis}

Headline: {headline}
Source: {source_name}
Content: {snippet}

JSON only: {{"newHeadline": "...", "summary": "..."}}"#
    )
}

// Char-boundary safe prefix.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
