//! ID prefixes and sequence allocation.
//!
//! Message ids are opaque strings of the form `msg-000042`. Each
//! [`IdSequence`] is monotonic, so ids allocated from one sequence sort in
//! allocation order and never repeat.

use serde::{Deserialize, Serialize};

pub const PREFIX_MESSAGE: &str = "msg";

/// Format a prefixed id from a sequence number.
#[must_use]
pub fn format_id(prefix: &str, seq: u64) -> String {
    format!("{prefix}-{seq:06}")
}

/// Monotonic id allocator for one prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdSequence {
    prefix: String,
    next: u64,
}

impl IdSequence {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    /// Allocate the next id.
    pub fn next_id(&mut self) -> String {
        let id = format_id(&self.prefix, self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    #[must_use]
    pub const fn allocated(&self) -> u64 {
        self.next - 1
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new(PREFIX_MESSAGE)
    }
}
