//! Infrastructure layer
//!
//! Concrete adapters for the outbound ports.

pub mod events;
pub mod http;
pub mod identity;

pub use events::BroadcastLeadEvents;
pub use http::HttpLeadGateway;
pub use identity::{EnvUserProvider, StaticUserProvider};
