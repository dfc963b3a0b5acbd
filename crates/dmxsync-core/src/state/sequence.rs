/// How far behind the last accepted sequence a packet may fall and still be
/// treated as stale. Anything further back starts a new epoch.
pub const SEQUENCE_WINDOW: u8 = 20;

/// Per-stream sequence filter for one universe.
///
/// A packet is accepted when its sequence is ahead of the last accepted one,
/// or when it is more than [`SEQUENCE_WINDOW`] behind it (8-bit wraparound).
/// A fresh gate accepts anything.
///
/// # Examples
/// ```
/// use dmxsync_core::SequenceGate;
///
/// let mut gate = SequenceGate::starting_at(250);
/// assert!(!gate.accept(240));
/// assert!(gate.accept(5));
/// assert_eq!(gate.last(), Some(5));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceGate {
    last: Option<u8>,
}

impl SequenceGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(last: u8) -> Self {
        Self { last: Some(last) }
    }

    pub fn last(&self) -> Option<u8> {
        self.last
    }

    pub fn admits(&self, sequence: u8) -> bool {
        match self.last {
            None => true,
            Some(last) => sequence > last || last.wrapping_sub(sequence) > SEQUENCE_WINDOW,
        }
    }

    /// Record `sequence` if admitted. Rejection leaves the gate untouched.
    pub fn accept(&mut self, sequence: u8) -> bool {
        if !self.admits(sequence) {
            return false;
        }
        self.last = Some(sequence);
        true
    }
}
