use std::fmt;

/// Opaque Messenger recipient id (PSID). The core never interprets it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecipientId(pub String);

impl fmt::Display for RecipientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resolved passage as returned by the serving provider.
///
/// `reference` is the provider's human-readable label, `content` is already
/// normalized prose (see `normalize::clean`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassageResult {
    pub reference: String,
    pub content: String,
    pub attribution: Option<String>,
}

/// One keyword-search match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHit {
    pub reference: String,
    pub text: String,
}
