//! The 32-slot command allocator shared by the non-NCQ (slot 0 only) and NCQ
//! (caller-chosen tag) issue paths (§4.5).

use core::sync::atomic::{AtomicU32, Ordering};

use spin::Mutex;

use crate::error::AhciError;

pub(crate) const NON_NCQ_SLOT: u8 = 0;

/// `CommandRequest::tag` sentinel meaning "let the driver pick the lowest
/// free NCQ tag" (§4.5 `allocate_slot`) rather than a caller-pinned one.
pub(crate) const NCQ_AUTO_TAG: u8 = u8::MAX;

/// Per-slot bookkeeping kept while a command is in flight, so the
/// completion path can echo the original request and know where to copy
/// read data back to.
#[derive(Clone, Copy)]
pub(crate) struct SlotRecord {
    pub ncq: bool,
    pub is_write: bool,
    pub buffer: *mut u8,
    pub buffer_len: usize,
    pub sg_count: usize,
    pub lba: u64,
    pub count: u16,
    pub status: u8,
    pub error: u8,
}

impl Default for SlotRecord {
    fn default() -> Self {
        Self {
            ncq: false,
            is_write: false,
            buffer: core::ptr::null_mut(),
            buffer_len: 0,
            sg_count: 0,
            lba: 0,
            count: 0,
            status: 0,
            error: 0,
        }
    }
}

/// `in_use`/`completed` are atomic so a single-bit membership test can use a
/// relaxed load without the lock (§5); claiming a slot and writing its
/// record is a single critical section under `records`.
pub(crate) struct SlotAllocator {
    in_use: AtomicU32,
    completed: AtomicU32,
    records: Mutex<[SlotRecord; 32]>,
}

impl SlotAllocator {
    pub const fn new() -> Self {
        Self {
            in_use: AtomicU32::new(0),
            completed: AtomicU32::new(0),
            records: Mutex::new(
                [SlotRecord {
                    ncq: false,
                    is_write: false,
                    buffer: core::ptr::null_mut(),
                    buffer_len: 0,
                    sg_count: 0,
                    lba: 0,
                    count: 0,
                    status: 0,
                    error: 0,
                }; 32],
            ),
        }
    }

    pub fn in_use_bits(&self) -> u32 {
        self.in_use.load(Ordering::Relaxed)
    }

    pub fn is_in_use(&self, slot: u8) -> bool {
        self.in_use.load(Ordering::Relaxed) & (1 << slot) != 0
    }

    /// Find the lowest clear bit in `in_use`, claim it and write `record`
    /// atomically with the claim. Used by the NCQ path when the caller
    /// hasn't pinned a tag.
    pub fn allocate_slot(&self, record: SlotRecord) -> Result<u8, AhciError> {
        let mut records = self.records.lock();
        let in_use = self.in_use.load(Ordering::Relaxed);
        if in_use == u32::MAX {
            return Err(AhciError::Busy);
        }
        let slot = in_use.trailing_ones() as u8;
        self.in_use.fetch_or(1 << slot, Ordering::Relaxed);
        records[slot as usize] = record;
        Ok(slot)
    }

    /// Claim a caller-chosen slot (NCQ with a pinned tag, or the fixed
    /// non-NCQ slot 0). Fails with `Busy` if already in use.
    pub fn claim_slot(&self, slot: u8, record: SlotRecord) -> Result<(), AhciError> {
        let mut records = self.records.lock();
        let mask = 1u32 << slot;
        if self.in_use.load(Ordering::Relaxed) & mask != 0 {
            return Err(AhciError::Busy);
        }
        self.in_use.fetch_or(mask, Ordering::Relaxed);
        records[slot as usize] = record;
        Ok(())
    }

    pub fn record(&self, slot: u8) -> SlotRecord {
        self.records.lock()[slot as usize]
    }

    /// Clear `slot` from both bitmaps and zero its record. Idempotent.
    pub fn free_slot(&self, slot: u8) {
        let mut records = self.records.lock();
        let mask = 1u32 << slot;
        self.in_use.fetch_and(!mask, Ordering::Relaxed);
        self.completed.fetch_and(!mask, Ordering::Relaxed);
        records[slot as usize] = SlotRecord::default();
    }

    /// Given a freshly-read PxSACT snapshot, determine which in-flight NCQ
    /// slots have just retired (bit cleared in `sact` but still `in_use` and
    /// not yet `completed`), mark them completed, and return only that delta
    /// — not the cumulative `completed` bitmap (§4.7, §9 open question).
    ///
    /// Restricted to slots with `records[i].ncq` set: PxSACT only tracks NCQ
    /// commands, so the non-NCQ slot (always 0) reads as permanently clear
    /// there. Without this gate, a `probe_cmd` racing a concurrent non-NCQ
    /// command on another thread (§5 permits parallel port operations) would
    /// spuriously report the in-flight non-NCQ slot as completed.
    pub fn newly_completed(&self, sact: u32) -> u32 {
        let records = self.records.lock();
        let in_use = self.in_use.load(Ordering::Relaxed);
        let completed = self.completed.load(Ordering::Relaxed);
        let mut ncq_mask = 0u32;
        for (i, record) in records.iter().enumerate() {
            if record.ncq {
                ncq_mask |= 1 << i;
            }
        }
        let candidates = in_use & !completed & !sact & ncq_mask;
        if candidates != 0 {
            self.completed.fetch_or(candidates, Ordering::Relaxed);
        }
        candidates
    }

    pub fn set_record_result(&self, slot: u8, status: u8, error: u8) {
        let mut records = self.records.lock();
        records[slot as usize].status = status;
        records[slot as usize].error = error;
    }
}
