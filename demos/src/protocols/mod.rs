//! Standalone quantum protocol demos.
//!
//! These share no state with the thrust planner; each owns its generators.

pub mod entangled_key;

pub use entangled_key::{Basis, EntangledKeyExchange, KeyExchangeReport, ProtocolError, RoundRecord};
