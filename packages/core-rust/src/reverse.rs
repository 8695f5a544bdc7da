//! Character-level string reversal.
//!
//! Reversal walks Unicode scalar values (`char`), so multi-byte UTF-8
//! sequences stay intact. Grapheme clusters built from several scalars
//! (combining marks, ZWJ emoji sequences) are reversed scalar by scalar.

/// Returns `text` with its sequence of characters reversed.
///
/// # Examples
///
/// ```
/// use greeter_core::reverse::reverse_chars;
///
/// assert_eq!(reverse_chars("World"), "dlroW");
/// assert_eq!(reverse_chars(""), "");
/// ```
#[must_use]
pub fn reverse_chars(text: &str) -> String {
    text.chars().rev().collect()
}
