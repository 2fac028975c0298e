use std::borrow::Cow;

use crate::constants::{COMMENT_MARKER, ESCAPE_MARKER};

/// Truncates `line` after its first unescaped `%`, keeping its line terminator.
///
/// A `%` directly after a backslash is a literal percent sign. A `%` in the first
/// column has nothing before it and is always a comment. A line without a
/// terminator gains `\n`; a `\r\n` line keeps `\r\n`.
pub fn strip_comment(line: &str) -> Cow<'_, str> {
    let mut prev: Option<char> = None;
    for (idx, ch) in line.char_indices() {
        if ch == COMMENT_MARKER && prev != Some(ESCAPE_MARKER) {
            let end = idx + ch.len_utf8();
            let terminator = if line.ends_with("\r\n") { "\r\n" } else { "\n" };
            return Cow::Owned(format!("{}{}", &line[..end], terminator));
        }
        prev = Some(ch);
    }
    Cow::Borrowed(line)
}

/// Applies [`strip_comment`] to every line, keeping line order and count.
pub fn strip_comments<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines.iter().map(|line| strip_comment(line.as_ref()).into_owned()).collect()
}
