//! Blocking poll helpers shared by the HBA and port state machines.
//!
//! Both helpers sleep ≈1 ms between polls via [`Hal::sleep_ms`] rather than
//! busy-spinning; call sites supply a human-readable name for the condition
//! being awaited so a timeout can be logged meaningfully.

use log::warn;

use crate::{Hal, error::AhciError};

/// Poll `read_mask()` until none of `mask`'s bits are set, or `timeout_ms`
/// elapses.
pub(crate) fn wait_bit_clear<H: Hal>(
    mut read_mask: impl FnMut() -> u32,
    mask: u32,
    timeout_ms: u64,
    what: &'static str,
) -> Result<(), AhciError> {
    wait_until::<H>(|| read_mask() & mask == 0, timeout_ms, what)
}

/// Poll `read_mask()` until all of `mask`'s bits are set, or `timeout_ms`
/// elapses.
pub(crate) fn wait_bit_set<H: Hal>(
    mut read_mask: impl FnMut() -> u32,
    mask: u32,
    timeout_ms: u64,
    what: &'static str,
) -> Result<(), AhciError> {
    wait_until::<H>(|| read_mask() & mask == mask, timeout_ms, what)
}

/// Poll an arbitrary predicate until it is true, or `timeout_ms` elapses.
pub(crate) fn wait_until<H: Hal>(
    mut cond: impl FnMut() -> bool,
    timeout_ms: u64,
    what: &'static str,
) -> Result<(), AhciError> {
    let start = H::current_ms();
    loop {
        if cond() {
            return Ok(());
        }
        if H::current_ms().saturating_sub(start) >= timeout_ms {
            warn!("timeout waiting for {what}");
            return Err(AhciError::Timeout { what });
        }
        H::sleep_ms(1);
    }
}
