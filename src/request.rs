//! The request/response ABI the command-issue path consumes (§6), plus the
//! completion-probe struct NCQ polling returns.

use bitflags::bitflags;

bitflags! {
    /// Request flags (§6): only bits 0 and 3 are defined, the rest are
    /// reserved.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CommandFlags: u32 {
        const WRITE = 1 << 0;
        const NCQ   = 1 << 3;
    }
}

/// A single ATA command request, caller-owned. `tag` is an input for NCQ
/// (the caller picks a free tag, or passes `u8::MAX` to let the driver pick
/// the lowest free one) and an output in all cases: the tag actually used
/// for NCQ, always 0 for non-NCQ.
#[derive(Debug, Clone, Copy)]
pub struct CommandRequest {
    pub command: u8,
    pub features: u16,
    pub device: u8,
    /// 48-bit LBA; the upper 16 bits must be zero.
    pub lba: u64,
    pub count: u16,
    pub flags: CommandFlags,
    /// Client data buffer. Null/zero-length is valid for commands with no
    /// data phase.
    pub buffer: *mut u8,
    pub buffer_len: usize,
    /// 0 selects the default of 5000 ms.
    pub timeout_ms: u32,
    pub tag: u8,

    /// Result: status byte from the D2H/SDB FIS.
    pub status: u8,
    /// Result: error byte from the D2H/SDB FIS.
    pub error: u8,
    /// Result: device byte from the D2H FIS (non-NCQ only).
    pub device_out: u8,
    /// Result: LBA echoed back (SDB carries none, so this is the request's
    /// own `lba` for NCQ).
    pub lba_out: u64,
    pub count_out: u16,
}

impl Default for CommandRequest {
    fn default() -> Self {
        Self {
            command: 0,
            features: 0,
            device: 0,
            lba: 0,
            count: 0,
            flags: CommandFlags::empty(),
            buffer: core::ptr::null_mut(),
            buffer_len: 0,
            timeout_ms: 0,
            tag: 0,
            status: 0,
            error: 0,
            device_out: 0,
            lba_out: 0,
            count_out: 0,
        }
    }
}

impl CommandRequest {
    pub fn is_write(&self) -> bool {
        self.flags.contains(CommandFlags::WRITE)
    }

    pub fn is_ncq(&self) -> bool {
        self.flags.contains(CommandFlags::NCQ)
    }

    pub fn effective_timeout_ms(&self) -> u64 {
        if self.timeout_ms == 0 {
            5000
        } else {
            self.timeout_ms as u64
        }
    }
}

/// Result of `probe_cmd`: which NCQ slots are still active at the device,
/// which newly completed during this call, and their status/error bytes.
#[derive(Debug, Clone, Copy)]
pub struct CompletionProbe {
    /// Raw PxSACT snapshot at the time of the poll.
    pub sactive: u32,
    /// Bitmap of slots that transitioned `in_use ∧ ¬completed` →
    /// `in_use ∧ completed` during *this* call — not a cumulative snapshot.
    pub completed: u32,
    pub status: [u8; 32],
    pub error: [u8; 32],
}

impl Default for CompletionProbe {
    fn default() -> Self {
        Self {
            sactive: 0,
            completed: 0,
            status: [0; 32],
            error: [0; 32],
        }
    }
}
