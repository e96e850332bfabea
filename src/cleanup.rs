//! Post-processing for model output.
//!
//! Models tend to wrap the rewritten prompt in meta-text such as
//! `Here's the enhanced prompt:` or a bold `**Enhanced Prompt:**` header, and
//! sometimes quote it. Each step below removes one of those artifacts and is
//! total: it never fails and only ever removes characters.

use std::sync::LazyLock;

use regex::Regex;

static META_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?:here's the|here is the|enhanced|improved|optimized|refined|better|the)\b)?\s*(?:(?:enhanced|improved|optimized|refined|version of the|version|prompt)\b)?:?\s*",
    )
    .expect("meta prefix pattern is valid")
});

static BOLD_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\*\*.*?\*\*:?\s*").expect("bold header pattern is valid")
});

const QUOTES: [char; 3] = ['"', '\'', '`'];

/// Cleans raw model output down to the bare prompt text.
///
/// Runs [`clean_pass`] until the text stops changing, so the result never
/// starts with another strippable prefix and cleaning it again is a no-op.
pub fn clean_model_output(raw: &str) -> String {
    let mut current = raw.trim().to_owned();
    loop {
        let next = clean_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// One ordered pass: meta prefix, quotes, bold header, whitespace.
pub fn clean_pass(text: &str) -> String {
    let text = strip_meta_prefix(text);
    let text = strip_quotes(&text);
    let text = strip_bold_header(&text);
    text.trim().to_owned()
}

/// Removes one leading `Here's the enhanced prompt:` style prefix.
pub fn strip_meta_prefix(text: &str) -> String {
    META_PREFIX.replace(text, "").into_owned()
}

/// Removes a single quote character at either end. The two ends are handled
/// independently and need not match.
pub fn strip_quotes(text: &str) -> String {
    let text = text.strip_prefix(&QUOTES[..]).unwrap_or(text);
    let text = text.strip_suffix(&QUOTES[..]).unwrap_or(text);
    text.to_owned()
}

/// Removes a leading `**Header**` together with an optional colon and the
/// whitespace after it.
pub fn strip_bold_header(text: &str) -> String {
    BOLD_HEADER.replace(text, "").into_owned()
}
