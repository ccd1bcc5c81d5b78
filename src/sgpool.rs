//! The lazily grown pool of 128 KiB scatter-gather buffers each port draws
//! from when staging read/write data (§4.4).

use alloc::vec::Vec;

use spin::Mutex;

use crate::{
    Hal,
    dma::{DmaBuffer, DmaBufferView},
    error::AhciError,
    types::{AHCI_BYTES_PER_SG, AHCI_MAX_SG},
};

/// SG buffers only need to be contiguous and DMA-addressable; there is no
/// wire-format alignment requirement stronger than a cacheline, so 4 KiB
/// (a common page size) is used as a conservative, always-safe alignment.
const SG_BUFFER_ALIGN: usize = 4096;

pub(crate) struct SgPool<H> {
    buffers: Mutex<Vec<DmaBuffer<H>>>,
}

impl<H: Hal> SgPool<H> {
    pub fn new() -> Self {
        Self {
            buffers: Mutex::new(Vec::new()),
        }
    }

    pub fn count(&self) -> usize {
        self.buffers.lock().len()
    }

    /// Grow the pool to at least `n` buffers. Never shrinks; idempotent for
    /// `n` at or below the current count.
    pub fn ensure(&self, n: usize) -> Result<(), AhciError> {
        if n > AHCI_MAX_SG {
            return Err(AhciError::InvalidArgument {
                reason: "SG buffer count exceeds the 2048-buffer (256 MiB) cap",
            });
        }
        let mut buffers = self.buffers.lock();
        while buffers.len() < n {
            let buf = DmaBuffer::<H>::alloc(AHCI_BYTES_PER_SG, SG_BUFFER_ALIGN)?;
            buffers.push(buf);
        }
        Ok(())
    }

    /// A `Copy` view of buffer `i`'s address and length. Always taken under
    /// the pool's lock rather than racing an unsynchronized read against
    /// concurrent growth (see DESIGN.md).
    pub fn view(&self, i: usize) -> DmaBufferView {
        self.buffers.lock()[i].view()
    }

    /// Copy `data` into buffers `[0..)` in `AHCI_BYTES_PER_SG`-sized chunks.
    ///
    /// # Safety
    ///
    /// The caller must ensure no other thread is concurrently reading or
    /// writing the same buffers through their physical/DMA alias.
    pub unsafe fn stage_write(&self, data: &[u8]) {
        let mut offset = 0;
        let mut i = 0;
        while offset < data.len() {
            let view = self.view(i);
            let len = (data.len() - offset).min(view.len);
            unsafe {
                core::ptr::copy_nonoverlapping(data[offset..].as_ptr(), view.virt.as_ptr(), len);
            }
            offset += len;
            i += 1;
        }
    }

    /// Copy `[0..)` buffers back into `data` in `AHCI_BYTES_PER_SG`-sized
    /// chunks, the inverse of [`Self::stage_write`].
    ///
    /// # Safety
    ///
    /// The caller must ensure no other thread is concurrently reading or
    /// writing the same buffers through their physical/DMA alias.
    pub unsafe fn stage_read(&self, data: &mut [u8]) {
        let mut offset = 0;
        let mut i = 0;
        while offset < data.len() {
            let view = self.view(i);
            let len = (data.len() - offset).min(view.len);
            unsafe {
                core::ptr::copy_nonoverlapping(view.virt.as_ptr(), data[offset..].as_mut_ptr(), len);
            }
            offset += len;
            i += 1;
        }
    }
}
