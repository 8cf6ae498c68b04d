//! Inbound command parsing.

use regex::Regex;

/// A recognized inbound command. Anything else is passed through
/// unrecognized (`None`) and ignored by the handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `/bible <reference>`
    Bible(String),
    /// `/search <keyword>`
    Search(String),
    /// `/help`
    Help,
    /// `/subscribe` to the daily verse broadcast
    Subscribe,
    /// `/unsubscribe` from the daily verse broadcast
    Unsubscribe,
}

pub fn parse_command(text: &str) -> Option<Command> {
    let trimmed = text.trim();

    let bible = Regex::new(r"(?i)^/bible\s+(.+)$").expect("valid regex");
    if let Some(caps) = bible.captures(trimmed) {
        return Some(Command::Bible(caps[1].trim().to_string()));
    }

    let search = Regex::new(r"(?i)^/search\s+(.+)$").expect("valid regex");
    if let Some(caps) = search.captures(trimmed) {
        return Some(Command::Search(caps[1].trim().to_string()));
    }

    match trimmed.to_lowercase().as_str() {
        "/help" => Some(Command::Help),
        "/subscribe" => Some(Command::Subscribe),
        "/unsubscribe" => Some(Command::Unsubscribe),
        _ => None,
    }
}

pub fn help_message() -> &'static str {
    r#"📖 ScriptureBot Commands:

/bible [reference]
  Get a specific verse or chapter
  Examples:
  • /bible John 3:16
  • /bible Psalm 23
  • /bible Romans 8:28-30

/search [keyword]
  Search for verses containing a word
  Examples:
  • /search love
  • /search faith

/subscribe
  Receive a daily verse every morning and evening

/unsubscribe
  Stop receiving the daily verse

Powered by API.bible 🙏"#
}
