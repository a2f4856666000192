//! canopy Encode - Resumable chunked rendering of the topology document
//!
//! The full topology can exceed one transport datagram, so the document is
//! rendered as a stream of atomic tokens and delivered in caller-sized
//! chunks, with a cursor carried between exchanges:
//! - Token stream over `{"parent":[...],"children":[...]}`
//! - Cursor with fresh-invalidation semantics
//! - `encode_chunk`, the size-bounded incremental serializer

pub mod chunk;
pub mod cursor;
pub mod token;

pub use chunk::*;
pub use cursor::*;
pub use token::*;
