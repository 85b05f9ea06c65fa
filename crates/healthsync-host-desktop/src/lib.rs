//! Desktop host adapters for healthsync
//!
//! Provides:
//! - Remote symptoms upsert over HTTP
//! - Connectivity probe against a configurable URL
//! - Health provider backed by a JSON export file
//! - Notices written to the log

mod connectivity;
mod export;
mod notify;
mod remote;

pub use connectivity::*;
pub use export::*;
pub use notify::*;
pub use remote::*;
