//! Core logic for the Vitrine session hub.
//!
//! Owns the per-session state machine, the registry that isolates and
//! serializes sessions, and the broadcast bus that carries re-render updates
//! to subscribers. No I/O and no persistence live here; the api crate wires
//! this into an HTTP/WS boundary.

pub mod session;
pub mod update;
