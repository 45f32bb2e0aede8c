//! Core types and service wiring for the tonnenwacht pickup watcher.

/// Domain models and calendar helpers shared by all adapters.
pub mod model;
/// Traits describing the adapter interfaces.
pub mod ports;
/// High-level watch service used by the binary.
pub mod service;

pub use model::*;
pub use ports::*;
pub use service::*;
