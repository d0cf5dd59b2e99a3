//! Server-assigned sequence numbers for push-channel ordering.
//!
//! The server tags every order-sensitive push message with a monotonically
//! increasing integer, assigned per session. [`SequenceGate`] implements the
//! acceptance rule: a message is applied only if its sequence is strictly
//! greater than the last accepted one, which makes duplicates and
//! out-of-order retransmissions no-ops.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonically increasing, server-assigned message sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceNumber(u64);

impl SequenceNumber {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SequenceNumber {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<SequenceNumber> for u64 {
    fn from(seq: SequenceNumber) -> Self {
        seq.0
    }
}

/// Tracks the last accepted sequence number for one session.
#[derive(Debug, Default, Clone)]
pub struct SequenceGate {
    last_accepted: Option<SequenceNumber>,
}

impl SequenceGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `sequence` if it advances past the last accepted value.
    ///
    /// Returns `true` and updates the gate when the message should be
    /// applied; returns `false` for duplicates and retransmissions.
    /// Messages without a sequence never pass through the gate.
    pub fn accept(&mut self, sequence: SequenceNumber) -> bool {
        match self.last_accepted {
            Some(last) if sequence <= last => false,
            _ => {
                self.last_accepted = Some(sequence);
                true
            },
        }
    }

    /// The last accepted sequence, used to resume after a reconnect.
    pub fn last_accepted(&self) -> Option<SequenceNumber> {
        self.last_accepted
    }

    /// Forget all accepted state (session teardown).
    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}
