//! Provider markup cleanup.

use regex::Regex;

/// Strip provider markup and collapse whitespace into single-spaced prose.
///
/// Order matters: annotation spans are removed whole *before* the generic tag
/// strip, otherwise their inner text would leak into the visible output.
pub fn clean(raw: &str) -> String {
    let strongs = Regex::new(r"<S>.*?</S>").expect("valid regex");
    let footnotes = Regex::new(r"<sup>.*?</sup>").expect("valid regex");
    let tags = Regex::new(r"<[^>]*>").expect("valid regex");
    let whitespace = Regex::new(r"\s+").expect("valid regex");

    let text = strongs.replace_all(raw, "");
    let text = footnotes.replace_all(&text, "");
    let text = tags.replace_all(&text, "");
    let text = whitespace.replace_all(&text, " ");
    text.trim().to_string()
}
