//! A scriptable `Hal` used only by this crate's own test suite. Real time is
//! replaced by a counter advanced once per `sleep_ms` call, so a test can
//! install a closure that mutates the simulated MMIO image on a given tick —
//! the same trick a mock HTTP clock uses to make "timeout after N ms" tests
//! run instantly.

use core::alloc::Layout;
use core::ptr::NonNull;

use alloc::boxed::Box;
use spin::Mutex;

use crate::Hal;

struct MockState {
    clock_ms: u64,
    on_tick: Option<Box<dyn FnMut(u64) + Send>>,
}

static STATE: Mutex<MockState> = Mutex::new(MockState {
    clock_ms: 0,
    on_tick: None,
});

pub struct TestHal;

impl TestHal {
    /// Reset the simulated clock and detach any scripted tick hook. Tests
    /// run single-threaded, but `STATE` is global, so every test using
    /// `TestHal` must call this first.
    pub fn reset() {
        let mut s = STATE.lock();
        s.clock_ms = 0;
        s.on_tick = None;
    }

    /// Install a closure run with the current simulated time on every
    /// `sleep_ms`. Used to flip register bits in a backing MMIO buffer after
    /// N simulated milliseconds, standing in for real hardware reacting to a
    /// request.
    pub fn on_tick(f: impl FnMut(u64) + Send + 'static) {
        STATE.lock().on_tick = Some(Box::new(f));
    }
}

impl Hal for TestHal {
    fn virt_to_phys(va: usize) -> usize {
        // The mock has no separate DMA address space; device and host share
        // one flat memory model.
        va
    }

    fn current_ms() -> u64 {
        STATE.lock().clock_ms
    }

    fn flush_dcache() {}

    fn sleep_ms(ms: u64) {
        let mut s = STATE.lock();
        s.clock_ms += ms.max(1);
        let now = s.clock_ms;
        if let Some(f) = s.on_tick.as_mut() {
            f(now);
        }
    }

    fn dma_alloc(layout: Layout) -> Option<NonNull<u8>> {
        // SAFETY: every call site in this crate builds `layout` with a
        // non-zero size.
        let ptr = unsafe { alloc::alloc::alloc_zeroed(layout) };
        NonNull::new(ptr)
    }

    unsafe fn dma_free(ptr: NonNull<u8>, layout: Layout) {
        unsafe { alloc::alloc::dealloc(ptr.as_ptr(), layout) };
    }
}

/// Raw byte offset of a register within the HBA's MMIO window, for tests
/// that poke bits directly to script hardware behavior. Mirrors the layout
/// asserted in `mmio.rs`.
pub mod offset {
    /// GHC, within the Generic Host Control block at offset 0.
    pub const GHC: usize = 0x04;
    /// PI (Ports Implemented), within the Generic Host Control block.
    pub const PI: usize = 0x0C;
    /// Start of the per-port register blocks.
    pub const PORTS: usize = 0x100;
    /// Port register block stride.
    pub const PORT_STRIDE: usize = 0x80;
    /// PxCMD, within a port's register block.
    pub const PX_CMD: usize = 0x18;
    /// PxSSTS, within a port's register block.
    pub const PX_SSTS: usize = 0x28;

    pub fn port(n: usize, reg: usize) -> usize {
        PORTS + n * PORT_STRIDE + reg
    }
}

/// Read/write a little-endian `u32` at `offset` within `buf`. The MMIO image
/// in these tests is plain host memory, so this is the same access a real
/// `VolatilePtr` read/write would perform.
pub fn read_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_ne_bytes(buf[offset..offset + 4].try_into().unwrap())
}

pub fn write_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_ne_bytes());
}

/// A zeroed, correctly sized and aligned stand-in for a controller's MMIO
/// window, freed on drop.
pub struct MmioImage {
    ptr: NonNull<u8>,
    layout: Layout,
}

impl MmioImage {
    pub fn new() -> Self {
        let layout = Layout::new::<crate::mmio::AhciMmio>();
        // SAFETY: `layout` is non-zero-sized.
        let ptr = unsafe { alloc::alloc::alloc_zeroed(layout) };
        Self {
            ptr: NonNull::new(ptr).expect("mock MMIO allocation failed"),
            layout,
        }
    }

    pub fn base(&self) -> usize {
        self.ptr.as_ptr().addr()
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: `ptr` is valid for `layout.size()` bytes and uniquely
        // borrowed through `&mut self`.
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.layout.size()) }
    }
}

impl Drop for MmioImage {
    fn drop(&mut self) {
        // SAFETY: `ptr`/`layout` were produced together by `alloc_zeroed` above.
        unsafe { alloc::alloc::dealloc(self.ptr.as_ptr(), self.layout) };
    }
}
