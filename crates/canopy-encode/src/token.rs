//! Atomic tokens of the topology document
//!
//! Structural delimiters, field labels and whole address strings are each one
//! token. A token is never split across a chunk boundary: either it fits in
//! the remaining window in full or it is deferred to the next exchange. Both
//! array fields hold addresses so the format can later carry more than one
//! parent (e.g. a backup relay) without changing shape.

use canopy_topology::TopologySnapshot;

/// Label of the upstream-relay field
pub const PARENT_LABEL: &str = "parent";

/// Label of the dependents field
pub const CHILD_LABEL: &str = "children";

/// Render the snapshot as the document's atomic token sequence
pub fn document_tokens(snapshot: &TopologySnapshot) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();

    tokens.push("{".into());
    tokens.push("\"".into());
    tokens.push(PARENT_LABEL.into());
    match snapshot.parent {
        Some(parent) => {
            tokens.push("\":[\"".into());
            tokens.push(parent.to_text());
            tokens.push("\"]".into());
        }
        None => tokens.push("\":[]".into()),
    }

    tokens.push(",\"".into());
    tokens.push(CHILD_LABEL.into());
    tokens.push("\":[".into());
    for (i, child) in snapshot.children.iter().enumerate() {
        if i > 0 {
            tokens.push(",".into());
        }
        tokens.push("\"".into());
        tokens.push(child.to_text());
        tokens.push("\"".into());
    }
    tokens.push("]}".into());

    tokens
}

/// Total length in bytes of the logical document
pub fn document_len(snapshot: &TopologySnapshot) -> usize {
    document_tokens(snapshot).iter().map(String::len).sum()
}
