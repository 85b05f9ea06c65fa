//! Host adapter trait interfaces for healthsync
//!
//! This crate defines the boundary between the sync core and the outside
//! world: the device health provider, network connectivity, the remote
//! symptoms endpoint, and user notices. It contains no platform code
//! itself, only the traits, their record types, and mocks for tests.

mod mock;
mod records;
mod traits;

pub use mock::*;
pub use records::*;
pub use traits::*;
