//! Response post-processing — strip prefatory filler from model output.
//!
//! DESIGN
//! ======
//! Local models love to open with "Based on the data you've provided, …".
//! Each known lead-in pattern is evaluated once, in order, against the
//! current prefix; a later pattern can still fire on what an earlier strip
//! exposed, but no pattern is retried. Leftover punctuation and a leading
//! conjunction are trimmed last.

use std::sync::OnceLock;

use regex::Regex;

const PREFATORY_PATTERNS: [&str; 5] = [
    r"^based on (the )?(data|information) (you've|you have|you) (provided|given)[\s,:-]*",
    r"^according to (the )?(data|information)[\s,:-]*",
    r"^from the provided (data|information)[\s,:-]*",
    r"^as per (the )?(data|information)[\s,:-]*",
    r"^note[:\-]?\s*",
];

fn prefatory_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        PREFATORY_PATTERNS
            .iter()
            .map(|p| Regex::new(&format!("(?i){p}")).expect("prefatory pattern"))
            .collect()
    })
}

fn leading_punctuation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[,;:\-\s]+").expect("punctuation pattern"))
}

fn leading_conjunction() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(so|therefore|thus)[\s,]+").expect("conjunction pattern"))
}

/// Remove known lead-in phrases so replies start with the actual answer.
#[must_use]
pub fn strip_prefatory(text: &str) -> String {
    let mut s = text.trim().to_string();
    for re in prefatory_patterns() {
        if re.is_match(&s) {
            s = re.replace(&s, "").trim().to_string();
        }
    }
    let s = leading_punctuation().replace(&s, "").into_owned();
    leading_conjunction().replace(&s, "").into_owned()
}

#[cfg(test)]
#[path = "sanitize_test.rs"]
mod tests;
