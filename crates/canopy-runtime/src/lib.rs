//! canopy Runtime - Wiring topology state to the transport layer
//!
//! This crate owns the pieces with lifecycle:
//! - Debounce timer coalescing structural-change bursts
//! - `DagResource`, the facade the request/response transport calls into
//! - `DagService`, the single-consumer event loop driving sweeps and
//!   change notifications

pub mod debounce;
pub mod resource;
pub mod service;

pub use debounce::*;
pub use resource::*;
pub use service::*;
