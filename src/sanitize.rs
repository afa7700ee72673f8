//! Free-text field sanitization.
//!
//! Names are length-limited and HTML-escaped; notes have script blocks
//! and markup tags stripped before being length-limited. Text loaded from
//! a document goes through the same rules, so a hand-edited or remote
//! document cannot bring in oversized or tagged fields.

use regex_lite::Regex;
use std::sync::OnceLock;

/// Maximum length of a player or character name, in characters.
pub const NAME_MAX_CHARS: usize = 50;

/// Maximum length of the notes field, in characters.
pub const NOTES_MAX_CHARS: usize = 500;

fn script_block() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("static pattern")
    })
}

fn markup_tag() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^>]*>").expect("static pattern"))
}

fn truncate_chars(input: &str, max: usize) -> String {
    input.chars().take(max).collect()
}

/// Escape `&`, `<` and `>`.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Undo [`escape_html`].
pub fn unescape_html(input: &str) -> String {
    input
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Sanitize a player or character name.
///
/// # Examples
///
/// ```rust
/// use diesheet::sanitize::sanitize_name;
///
/// assert_eq!(sanitize_name("Kai <Ace>"), "Kai &lt;Ace&gt;");
/// assert_eq!(sanitize_name(&"x".repeat(80)).len(), 50);
/// ```
pub fn sanitize_name(input: &str) -> String {
    escape_html(&truncate_chars(input, NAME_MAX_CHARS))
}

/// Sanitize a name read back from a stored document.
///
/// Stored names are already escaped, so they are unescaped first. A name
/// that went through [`sanitize_name`] comes back unchanged.
///
/// # Examples
///
/// ```rust
/// use diesheet::sanitize::{restore_name, sanitize_name};
///
/// let stored = sanitize_name("Kai & <Ace>");
/// assert_eq!(restore_name(&stored), stored);
/// assert_eq!(restore_name("<b>Vex</b>"), "&lt;b&gt;Vex&lt;/b&gt;");
/// ```
pub fn restore_name(stored: &str) -> String {
    sanitize_name(&unescape_html(stored))
}

/// Sanitize the notes field.
///
/// # Examples
///
/// ```rust
/// use diesheet::sanitize::sanitize_notes;
///
/// let notes = sanitize_notes("<b>Owes</b> a favor<script>alert(1)</script>");
/// assert_eq!(notes, "Owes a favor");
/// ```
pub fn sanitize_notes(input: &str) -> String {
    let without_scripts = script_block().replace_all(input, "");
    let without_tags = markup_tag().replace_all(&without_scripts, "");
    truncate_chars(&without_tags, NOTES_MAX_CHARS)
}
