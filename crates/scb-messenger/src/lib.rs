//! Facebook Messenger adapter: Graph API transport, webhook surface, and the
//! inbound message handler wiring the core together.

pub mod graph;
pub mod handlers;
pub mod page;
pub mod webhook;
