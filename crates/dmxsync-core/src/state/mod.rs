//! Resident per-universe state and the commit rules applied to it.
//!
//! - `universe`: double-buffered DMX frames plus sync binding and sequences
//! - `sequence`: wraparound-tolerant stale/duplicate filter
//! - `table`: the contiguous range of managed universes
//! - `commit`: staging, auto-commit and sync-triggered swaps
//! - `shared`: a locked table for multi-threaded receivers
//!
//! Only `commit` changes what consumers can see, and only by swapping.

pub mod commit;
pub mod sequence;
pub mod shared;
pub mod table;
pub mod universe;

pub use commit::{Applied, IgnoreReason};
pub use sequence::{SEQUENCE_WINDOW, SequenceGate};
pub use shared::SharedUniverseTable;
pub use table::{MAX_UNIVERSE, MIN_UNIVERSE, TableError, UniverseTable};
pub use universe::{DmxFrame, Universe};
