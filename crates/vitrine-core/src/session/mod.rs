//! Session state machine and registry.

pub mod registry;
pub mod state;

pub use registry::SessionRegistry;
pub use state::SessionState;
