/// Core error type for ScriptureBot.
///
/// Adapter crates should map their specific errors into this type so the bot
/// core can handle failures consistently. Provider-level failures are *not*
/// errors here; they travel as `retrieval::ProviderOutcome` and are recovered
/// by fallback.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
