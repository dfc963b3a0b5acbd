//! Transport-facing constants for E1.31 receivers.
//!
//! The core never opens sockets; these values let a transport bind and join
//! the right groups, and let callers judge source liveness against their own
//! clock.

use std::net::Ipv4Addr;
use std::time::Duration;

/// UDP port E1.31 traffic is sent to.
pub const DEFAULT_PORT: u16 = 5568;
/// Priority a source uses when it does not choose one.
pub const DEFAULT_PRIORITY: u8 = 100;
/// Base of the per-universe multicast range, 239.255.0.0.
pub const MULTICAST_BASE: u32 = 0xefff_0000;
/// A source silent for longer than this is considered lost.
pub const NETWORK_DATA_LOSS_TIMEOUT: Duration = Duration::from_millis(2500);
/// Interval at which sources announce their universes. Discovery packets are
/// not decoded; the constant is exposed for transports that schedule joins.
pub const UNIVERSE_DISCOVERY_INTERVAL: Duration = Duration::from_secs(10);

/// Multicast group carrying `universe`: the universe number in the low 16
/// bits of 239.255.0.0.
///
/// # Examples
/// ```
/// use std::net::Ipv4Addr;
///
/// use dmxsync_core::multicast_group;
///
/// assert_eq!(multicast_group(1), Ipv4Addr::new(239, 255, 0, 1));
/// assert_eq!(multicast_group(63999), Ipv4Addr::new(239, 255, 249, 255));
/// ```
pub fn multicast_group(universe: u16) -> Ipv4Addr {
    Ipv4Addr::from(MULTICAST_BASE | u32::from(universe))
}

/// Whether a source last heard at `last_seen` has timed out at `now`
/// (both in seconds on the same clock).
pub fn is_data_lost(last_seen: f64, now: f64) -> bool {
    now - last_seen > NETWORK_DATA_LOSS_TIMEOUT.as_secs_f64()
}
