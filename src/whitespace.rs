//! Whitespace rules for JSX text children.
//!
//! Source indentation inside tagged blocks is layout, not content. Text that
//! is nothing but a line break plus indentation is dropped; other text keeps
//! its inline spacing and only loses the breaks and the indentation around
//! them.

use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;

lazy_static! {
    /// A text child that only carries a line break and indentation.
    static ref LAYOUT_WHITESPACE: Regex = Regex::new(r"^[ \t]*\n\s*$").unwrap();

    /// Indentation and line breaks opening a line.
    static ref LEADING_BREAK: Regex = Regex::new(r"(?m)^[ \t]*\n+[ \t]*").unwrap();

    /// Indentation and line breaks closing a line.
    static ref TRAILING_BREAK: Regex = Regex::new(r"(?m)[ \t]*\n+[ \t]*$").unwrap();

    /// Any remaining break between two runs of content.
    static ref INNER_BREAK: Regex = Regex::new(r"[ \t]*\n+[ \t]*").unwrap();
}

/// True for text that only exists to indent the surrounding markup, e.g. the
/// text between `<a>` and `<b/>` in `<a>\n  <b/>\n</a>`.
pub fn is_layout_whitespace(text: &str) -> bool {
    LAYOUT_WHITESPACE.is_match(text)
}

/// Normalize indentation inside a text child. Breaks at the edge of a line are
/// removed, breaks between content collapse to a single space.
pub fn trim_jsx_whitespace(text: &str) -> Cow<'_, str> {
    if !text.contains('\n') {
        return Cow::Borrowed(text);
    }
    let text = LEADING_BREAK.replace_all(text, "");
    let text = TRAILING_BREAK.replace_all(&text, "");
    Cow::Owned(INNER_BREAK.replace_all(&text, " ").into_owned())
}
