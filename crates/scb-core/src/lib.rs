//! Core domain + application logic for ScriptureBot.
//!
//! This crate is intentionally framework-agnostic. The Messenger transport and
//! the scripture content providers live behind ports (traits) implemented in
//! adapter crates.

pub mod broadcast;
pub mod chunker;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod normalize;
pub mod reference;
pub mod retrieval;
pub mod subscription;
pub mod transport;

pub use errors::{Error, Result};
