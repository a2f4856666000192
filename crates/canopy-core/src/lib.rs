//! canopy Core - Fundamental types and primitives
//!
//! This crate defines the types used throughout canopy:
//! - Mesh addresses and network prefixes
//! - Monotonic second-granularity timestamps
//! - Resource configuration
//! - Error taxonomy

pub mod addr;
pub mod config;
pub mod error;
pub mod time;

pub use addr::*;
pub use config::*;
pub use error::*;
pub use time::*;
