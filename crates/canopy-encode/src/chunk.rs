//! Size-bounded incremental serialization
//!
//! `encode_chunk` walks the logical token stream on every call: tokens that
//! begin before the cursor are skipped in full, tokens at or past it are
//! written until one no longer fits, and that one is deferred whole to the
//! next exchange. The returned cursor therefore always lands on a token
//! boundary, which is what makes concatenated chunks byte-identical to a
//! single-buffer encoding.

use canopy_core::{CanopyError, CanopyResult};
use canopy_topology::TopologySnapshot;

use crate::{document_tokens, Cursor};

/// Result of one `encode_chunk` call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunk {
    /// Bytes placed into the caller's buffer; zero on a continuation call
    /// means "nothing to deliver yet", not "done"
    pub written: usize,
    /// Where the next call should resume
    pub cursor: Cursor,
    /// True once the whole document has been delivered
    pub done: bool,
}

/// Render one chunk of the topology document into `buf`.
///
/// `fresh` marks the first fetch after a change notification: it discards any
/// in-flight cursor and restarts the document at offset zero. A fresh (or
/// start-of-document) call whose window cannot fit even the first token
/// fails with [`CanopyError::ChunkTooSmall`] so the transport can tell the
/// peer its requested chunk size cannot make progress.
pub fn encode_chunk(
    snapshot: &TopologySnapshot,
    buf: &mut [u8],
    cursor: Cursor,
    fresh: bool,
) -> CanopyResult<Chunk> {
    let start = if fresh {
        0
    } else {
        match cursor {
            Cursor::Offset(offset) => offset,
            Cursor::Done => {
                return Ok(Chunk {
                    written: 0,
                    cursor: Cursor::Done,
                    done: true,
                })
            }
        }
    };

    // Logical position in the unbounded document vs. bytes actually written.
    let mut pos = 0usize;
    let mut written = 0usize;

    for token in document_tokens(snapshot) {
        let bytes = token.as_bytes();

        // Fully delivered in an earlier exchange.
        if pos < start {
            pos += bytes.len();
            continue;
        }

        if written + bytes.len() > buf.len() {
            if start == 0 && written == 0 {
                return Err(CanopyError::ChunkTooSmall {
                    needed: bytes.len(),
                    capacity: buf.len(),
                });
            }
            return Ok(Chunk {
                written,
                cursor: Cursor::Offset(start + written),
                done: false,
            });
        }

        buf[written..written + bytes.len()].copy_from_slice(bytes);
        written += bytes.len();
        pos += bytes.len();
    }

    Ok(Chunk {
        written,
        cursor: Cursor::Done,
        done: true,
    })
}
