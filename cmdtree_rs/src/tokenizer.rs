//! Shell-like splitting of a raw command line into tokens.
//!
//! The splitter knows nothing about the symbol tree. It only understands
//! whitespace, double quotes and the `\"` escape:
//!
//! - space and tab outside quotes separate tokens, runs of them collapse
//! - `"` toggles quoting and is dropped; it still starts a token, so `""`
//!   yields one empty token
//! - `\"` produces a literal `"`; any other backslash is kept as-is
//! - an unterminated quote closes implicitly at end of input
//!
//! Single quotes and caret escapes carry no meaning.

/// Split `raw` into tokens in a single pass.
///
/// ```
/// use cmdtree::tokenizer::split;
///
/// assert_eq!(split("One \"Two Three\" Four"), vec!["One", "Two Three", "Four"]);
/// assert_eq!(split("One\\\" Two"), vec!["One\"", "Two"]);
/// ```
pub fn split(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut started = false;
    let mut quoted = false;

    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
                started = true;
            }
            '"' => {
                quoted = !quoted;
                started = true;
            }
            ' ' | '\t' if !quoted => {
                if started {
                    tokens.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            other => {
                current.push(other);
                started = true;
            }
        }
    }

    if started {
        tokens.push(current);
    }

    tokens
}
