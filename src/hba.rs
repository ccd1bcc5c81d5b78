//! The HBA controller: global reset, AHCI-mode enable and port discovery
//! (§4.2), owning every port built on top of a single MMIO window.

use core::ptr::NonNull;

use log::{info, warn};
use volatile::VolatilePtr;

use crate::{
    Hal,
    error::AhciError,
    mmio::{AhciMmio, AhciMmioVolatileFieldAccess, GenericHostControlVolatileFieldAccess},
    port::Port,
    wait::{wait_bit_clear, wait_bit_set},
};

/// One AHCI controller and every port brought up under it. The HBA
/// exclusively owns the MMIO window and all ports indexed by it.
pub struct Hba<H> {
    mmio: VolatilePtr<'static, AhciMmio>,
    ports: [Option<Port<H>>; 32],
}

impl<H: Hal> Hba<H> {
    /// Bring up an HBA from its MMIO base: reset, enable AHCI mode, then
    /// bring up every port named in PI. A single port failing to come up is
    /// logged and left absent; it does not fail the whole HBA.
    ///
    /// # Safety
    ///
    /// `base` must be a valid, accessible virtual address for this
    /// controller's AHCI MMIO register block, mapped for the lifetime of
    /// the returned `Hba`, and not concurrently accessed by any other code.
    pub unsafe fn try_new(base: usize) -> Result<Self, AhciError> {
        let ptr = NonNull::new(base as *mut AhciMmio).ok_or(AhciError::InvalidArgument {
            reason: "null MMIO base",
        })?;
        // SAFETY: forwarded from the caller's contract above.
        let mmio = unsafe { VolatilePtr::new(ptr) };

        let mut hba = Self {
            mmio,
            ports: core::array::from_fn(|_| None),
        };

        hba.reset()?;
        hba.enable_ahci_mode()?;

        let vs = mmio.host().vs().read();
        let cap = mmio.host().cap().read();
        info!("AHCI HBA up: ver={vs} {cap}");

        let pi = hba.discover_ports();
        info!("ports implemented: {pi:#010x}");

        for i in 0..32u8 {
            if pi & (1 << i) == 0 {
                continue;
            }
            match Port::<H>::bring_up(&mmio, i) {
                Ok(p) => hba.ports[i as usize] = Some(p),
                Err(e) => warn!("port {i}: bring-up failed: {e}"),
            }
        }

        Ok(hba)
    }

    /// §4.2 `reset`: set GHC.HR, wait for hardware to clear it.
    pub fn reset(&self) -> Result<(), AhciError> {
        self.mmio.host().ghc().update(|g| g.with_HR(true));
        wait_bit_clear::<H>(
            || self.mmio.host().ghc().read().into_bits(),
            1 << 0, // HR is bit 0 of GHC (MSB-ordered: last field declared)
            1000,
            "GHC.HR clear",
        )
    }

    /// §4.2 `enable_ahci_mode`: set GHC.AE, wait for hardware to reflect it.
    pub fn enable_ahci_mode(&self) -> Result<(), AhciError> {
        self.mmio.host().ghc().update(|g| g.with_AE(true));
        wait_bit_set::<H>(
            || self.mmio.host().ghc().read().into_bits(),
            1 << 31, // AE is bit 31 of GHC (MSB-ordered: first field declared)
            50,
            "GHC.AE set",
        )
    }

    /// §4.2 `discover_ports`: the Ports Implemented bitmap.
    pub fn discover_ports(&self) -> u32 {
        self.mmio.host().pi().read()
    }

    pub fn port(&self, n: u8) -> Option<&Port<H>> {
        self.ports.get(n as usize)?.as_ref()
    }

    pub fn ports_implemented(&self) -> impl Iterator<Item = u8> + '_ {
        (0..32u8).filter(|&i| self.ports[i as usize].is_some())
    }
}
