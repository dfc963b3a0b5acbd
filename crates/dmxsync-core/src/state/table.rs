use thiserror::Error;

use super::universe::Universe;

/// Lowest universe number an E1.31 sender may use.
pub const MIN_UNIVERSE: u16 = 1;
/// Highest universe number an E1.31 sender may use.
pub const MAX_UNIVERSE: u16 = 63999;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("universe table must manage at least one universe")]
    Empty,
    #[error("first universe {first} is outside {}..={}", MIN_UNIVERSE, MAX_UNIVERSE)]
    FirstOutOfRange { first: u16 },
    #[error("{count} universes starting at {first} extend past {}", MAX_UNIVERSE)]
    RangeOverflow { first: u16, count: usize },
}

/// Resident state for a contiguous range of universes.
///
/// The table is sized once at construction; entries are never added or
/// removed afterwards, only their buffers and metadata change.
///
/// # Examples
/// ```
/// use dmxsync_core::UniverseTable;
///
/// let table = UniverseTable::new(1, 4)?;
/// assert!(table.contains(4));
/// assert!(!table.contains(5));
/// # Ok::<(), dmxsync_core::TableError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniverseTable {
    first_addr: u16,
    universes: Vec<Universe>,
}

impl UniverseTable {
    /// Allocate `num_universes` zeroed universes starting at `first_addr`.
    pub fn new(first_addr: u16, num_universes: u16) -> Result<Self, TableError> {
        let universes = (0..num_universes).map(|_| Universe::new()).collect();
        Self::from_universes(first_addr, universes)
    }

    /// Take ownership of caller-provisioned universes, numbered from
    /// `first_addr` in order.
    pub fn from_universes(first_addr: u16, universes: Vec<Universe>) -> Result<Self, TableError> {
        if universes.is_empty() {
            return Err(TableError::Empty);
        }
        if !(MIN_UNIVERSE..=MAX_UNIVERSE).contains(&first_addr) {
            return Err(TableError::FirstOutOfRange { first: first_addr });
        }
        let last = usize::from(first_addr) + universes.len() - 1;
        if last > usize::from(MAX_UNIVERSE) {
            return Err(TableError::RangeOverflow {
                first: first_addr,
                count: universes.len(),
            });
        }
        Ok(Self {
            first_addr,
            universes,
        })
    }

    pub fn first_addr(&self) -> u16 {
        self.first_addr
    }

    pub fn num_universes(&self) -> usize {
        self.universes.len()
    }

    pub fn contains(&self, number: u16) -> bool {
        self.index_of(number).is_some()
    }

    pub fn universe(&self, number: u16) -> Option<&Universe> {
        self.index_of(number).map(|idx| &self.universes[idx])
    }

    /// Managed universes with their numbers, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &Universe)> + '_ {
        (self.first_addr..).zip(self.universes.iter())
    }

    pub(crate) fn universe_mut(&mut self, number: u16) -> Option<&mut Universe> {
        self.index_of(number).map(|idx| &mut self.universes[idx])
    }

    /// Swap every universe bound to `sync_address`; returns how many swapped.
    pub(crate) fn swap_bound(&mut self, sync_address: u16) -> usize {
        let mut swapped = 0;
        for universe in self
            .universes
            .iter_mut()
            .filter(|universe| universe.sync_address() == sync_address)
        {
            universe.swap();
            swapped += 1;
        }
        swapped
    }

    fn index_of(&self, number: u16) -> Option<usize> {
        let idx = usize::from(number.checked_sub(self.first_addr)?);
        (idx < self.universes.len()).then_some(idx)
    }
}
