//! Source text normalization and line-number gutter sizing
//!
//! Code blocks display a canonical form of their source: LF line endings
//! only, with trailing whitespace removed from the end of the whole text.
//! Interior lines keep their trailing whitespace.

/// Normalize source text for display and tokenization.
///
/// CRLF pairs become LF, any remaining lone CR also becomes LF, and
/// whitespace at the very end of the text is trimmed. Normalizing already
/// normalized text returns it unchanged.
pub fn normalize_source(code: &str) -> String {
    let unified = if code.contains('\r') {
        code.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        code.to_string()
    };

    let trimmed_len = unified.trim_end_matches(is_trailing_whitespace).len();
    let mut normalized = unified;
    normalized.truncate(trimmed_len);
    normalized
}

/// Whitespace removed from the end of a code block.
///
/// Matches Unicode `White_Space` plus the byte order mark, which editors
/// occasionally leave at the end of pasted snippets. NEL (U+0085) is kept,
/// as JavaScript's `trimEnd` keeps it.
fn is_trailing_whitespace(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

/// Number of lines in normalized text.
///
/// Counts `\n`-separated segments, so the empty string is one (empty) line.
pub fn line_count(normalized: &str) -> usize {
    normalized.split('\n').count()
}

/// Width in columns of every line-number label for a block of `line_count` lines.
pub fn line_number_width(line_count: usize) -> usize {
    let mut width = 1;
    let mut remaining = line_count / 10;
    while remaining > 0 {
        width += 1;
        remaining /= 10;
    }
    width
}

/// Format the 1-based label for the line at `line_index`, left-padded with
/// spaces to `width`.
pub fn format_line_number(line_index: usize, width: usize) -> String {
    format!("{:>width$}", line_index + 1, width = width)
}
