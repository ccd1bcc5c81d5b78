use core::{alloc::Layout, ptr::NonNull};

/// The host-abstraction boundary. Everything the core needs from its
/// embedder — address translation, timekeeping, cache maintenance, sleeping
/// and DMA-coherent allocation — is funnelled through this trait. There is no
/// other configuration surface: a `no_std` driver core has no files or
/// environment variables to read, so `Hal` plays that role.
pub trait Hal {
    /// Convert a virtual address to a physical address, as seen by the
    /// device doing the DMA.
    fn virt_to_phys(va: usize) -> usize;

    /// Current time in milliseconds, from a monotonic clock.
    fn current_ms() -> u64;

    /// Flush the data cache for outstanding DMA-visible writes.
    fn flush_dcache();

    /// Sleep the calling thread for approximately `ms` milliseconds. Used by
    /// the ≈1 kHz register polling loops; the core never busy-spins.
    fn sleep_ms(ms: u64);

    /// Allocate `layout.size()` bytes of DMA-coherent memory, aligned to
    /// `layout.align()`. Returns `None` on exhaustion rather than aborting.
    fn dma_alloc(layout: Layout) -> Option<NonNull<u8>>;

    /// Free memory previously returned by `dma_alloc` with the same layout.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `dma_alloc(layout)` and not freed
    /// already.
    unsafe fn dma_free(ptr: NonNull<u8>, layout: Layout);
}
