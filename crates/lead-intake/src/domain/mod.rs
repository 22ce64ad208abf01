//! Domain module
//!
//! Draft aggregate, value objects, validation rules and events.

pub mod aggregates;
pub mod value_objects;
pub mod events;
pub mod services;

pub use aggregates::*;
pub use value_objects::*;
pub use events::*;
pub use services::*;
