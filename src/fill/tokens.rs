//! Literal `{{TOKEN}}` substitution.

use crate::model::TokenMap;

/// Replace every token of `tokens` in `text`, in map order.
///
/// Returns `None` when the text is unchanged.
pub fn substitute(text: &str, tokens: &TokenMap) -> Option<String> {
    let mut current: Option<String> = None;
    for (token, value) in tokens.iter() {
        let haystack = current.as_deref().unwrap_or(text);
        if haystack.contains(token) {
            current = Some(haystack.replace(token, value));
        }
    }
    current.filter(|updated| updated != text)
}
