//! A single DMA-coherent allocation, owned and freed through [`Hal`].

use core::{alloc::Layout, marker::PhantomData, ptr::NonNull};

use crate::{Hal, error::AhciError};

/// An owned DMA-coherent buffer. Frees itself via `Hal::dma_free` on drop.
pub(crate) struct DmaBuffer<H> {
    virt: NonNull<u8>,
    phys: usize,
    layout: Layout,
    _h: PhantomData<H>,
}

impl<H: Hal> DmaBuffer<H> {
    pub fn alloc(size: usize, align: usize) -> Result<Self, AhciError> {
        let layout = Layout::from_size_align(size, align).map_err(|_| AhciError::InvalidArgument {
            reason: "bad DMA buffer layout",
        })?;
        let virt = H::dma_alloc(layout).ok_or(AhciError::OutOfMemory)?;
        let phys = H::virt_to_phys(virt.as_ptr().addr());
        Ok(Self {
            virt,
            phys,
            layout,
            _h: PhantomData,
        })
    }

    pub fn virt_ptr(&self) -> NonNull<u8> {
        self.virt
    }

    pub fn phys_addr(&self) -> usize {
        self.phys
    }

    pub fn len(&self) -> usize {
        self.layout.size()
    }

    /// A small `Copy` view of this buffer's address and length, for callers
    /// that only need to read back an already-grown pool entry (§5).
    pub fn view(&self) -> DmaBufferView {
        DmaBufferView {
            virt: self.virt,
            phys: self.phys,
            len: self.layout.size(),
        }
    }
}

impl<H: Hal> Drop for DmaBuffer<H> {
    fn drop(&mut self) {
        unsafe { H::dma_free(self.virt, self.layout) };
    }
}

#[derive(Clone, Copy)]
pub(crate) struct DmaBufferView {
    pub virt: NonNull<u8>,
    pub phys: usize,
    pub len: usize,
}
