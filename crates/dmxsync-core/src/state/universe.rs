use crate::protocols::e131::layout::DMX_MAX_SLOTS;

use super::sequence::SequenceGate;

/// One DMX512 frame: start code plus up to 512 channel values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DmxFrame {
    pub start_code: u8,
    pub slots: [u8; DMX_MAX_SLOTS],
}

impl Default for DmxFrame {
    fn default() -> Self {
        Self {
            start_code: 0,
            slots: [0; DMX_MAX_SLOTS],
        }
    }
}

impl DmxFrame {
    /// Overwrite the start code and the leading channels. Values past slot
    /// 512 are dropped; slots past `channels.len()` keep their content.
    pub fn write(&mut self, start_code: u8, channels: &[u8]) -> usize {
        let count = channels.len().min(DMX_MAX_SLOTS);
        self.start_code = start_code;
        self.slots[..count].copy_from_slice(&channels[..count]);
        count
    }
}

/// Double-buffered state of a single universe.
///
/// Consumers read `active`; updates land in `inactive` and become visible
/// only through a swap, which flips a selector and never copies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Universe {
    buffers: [DmxFrame; 2],
    active: usize,
    sync_address: u16,
    data_gate: SequenceGate,
    sync_gate: SequenceGate,
}

impl Universe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a universe around caller-provisioned buffers.
    pub fn from_buffers(active: DmxFrame, inactive: DmxFrame) -> Self {
        Self {
            buffers: [active, inactive],
            ..Self::default()
        }
    }

    pub fn active(&self) -> &DmxFrame {
        &self.buffers[self.active]
    }

    pub fn inactive(&self) -> &DmxFrame {
        &self.buffers[self.active ^ 1]
    }

    /// Sync address this universe is bound to; 0 means auto-commit.
    pub fn sync_address(&self) -> u16 {
        self.sync_address
    }

    pub fn last_data_sequence(&self) -> Option<u8> {
        self.data_gate.last()
    }

    pub fn last_sync_sequence(&self) -> Option<u8> {
        self.sync_gate.last()
    }

    pub(crate) fn inactive_mut(&mut self) -> &mut DmxFrame {
        &mut self.buffers[self.active ^ 1]
    }

    pub(crate) fn bind_sync_address(&mut self, sync_address: u16) {
        self.sync_address = sync_address;
    }

    pub(crate) fn data_gate_mut(&mut self) -> &mut SequenceGate {
        &mut self.data_gate
    }

    pub(crate) fn sync_gate_mut(&mut self) -> &mut SequenceGate {
        &mut self.sync_gate
    }

    pub(crate) fn swap(&mut self) {
        self.active ^= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{DmxFrame, Universe};

    #[test]
    fn write_truncates_to_universe_size() {
        let mut frame = DmxFrame::default();
        let written = frame.write(0xcc, &[9u8; 600]);
        assert_eq!(written, 512);
        assert_eq!(frame.start_code, 0xcc);
        assert!(frame.slots.iter().all(|v| *v == 9));
    }

    #[test]
    fn short_write_keeps_trailing_slots() {
        let mut frame = DmxFrame::default();
        frame.slots[5] = 77;
        frame.write(0, &[1, 2]);
        assert_eq!(&frame.slots[..3], &[1, 2, 0]);
        assert_eq!(frame.slots[5], 77);
    }

    #[test]
    fn swap_exchanges_buffers_without_copying() {
        let mut active = DmxFrame::default();
        active.slots[0] = 1;
        let mut inactive = DmxFrame::default();
        inactive.slots[0] = 2;
        let mut universe = Universe::from_buffers(active, inactive);

        universe.inactive_mut().slots[1] = 3;
        assert_eq!(universe.active().slots[..2], [1, 0]);

        universe.swap();
        assert_eq!(universe.active().slots[..2], [2, 3]);
        assert_eq!(universe.inactive().slots[..2], [1, 0]);
    }
}
