//! Shared domain types for Vitrine.
//!
//! This crate contains the core domain types used across the Vitrine session
//! hub: sessions, chat turns, wire events, state patches, and their error
//! types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod event;
pub mod session;
