//! Network time.
//!
//! Message timestamps are whole seconds since the network epoch
//! (2021-01-01T00:00:00Z), which fits a `u32` until 2157.

use crate::errors::{HubError, HubResult};
use std::time::{SystemTime, UNIX_EPOCH};

/// Network epoch as Unix milliseconds.
pub const FARCASTER_EPOCH: u64 = 1_609_459_200_000;

/// Convert Unix milliseconds to network seconds.
pub fn to_farcaster_time(unix_ms: u64) -> HubResult<u32> {
    let since_epoch = unix_ms
        .checked_sub(FARCASTER_EPOCH)
        .ok_or_else(|| HubError::invalid_input("time precedes the network epoch"))?;

    u32::try_from(since_epoch / 1000)
        .map_err(|_| HubError::invalid_input("time is too far past the network epoch"))
}

/// Convert network seconds to Unix milliseconds.
#[must_use]
pub fn from_farcaster_time(time: u32) -> u64 {
    u64::from(time) * 1000 + FARCASTER_EPOCH
}

/// Current time in network seconds.
pub fn now_farcaster_time() -> HubResult<u32> {
    let unix_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| HubError::invalid_input("system clock precedes the Unix epoch"))?
        .as_millis();
    to_farcaster_time(u64::try_from(unix_ms).unwrap_or(u64::MAX))
}
