//! Concrete scripture content providers.
//!
//! Three adapters behind `scb_core::retrieval::ProviderAdapter`:
//! - [`BibleApiProvider`] — bible-api.com, no key required, verses only.
//! - [`ApiBibleProvider`] — API.bible, keyed, verses by passage identifier.
//! - [`BollsSearchProvider`] — bolls.life, keyword search only.

pub mod api_bible;
pub mod bible_api;
pub mod bolls;

pub use api_bible::ApiBibleProvider;
pub use bible_api::BibleApiProvider;
pub use bolls::BollsSearchProvider;
