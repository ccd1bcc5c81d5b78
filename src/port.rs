//! Per-port command pipeline: the state machine of §4.3, the DMA descriptor
//! builder and completion detector of §4.6/§4.7.

use core::{marker::PhantomData, ptr::NonNull, sync::atomic::{AtomicBool, Ordering}};

use log::{debug, info, warn};
use spin::Mutex;
use volatile::VolatilePtr;

use crate::{
    Hal,
    dma::DmaBuffer,
    error::AhciError,
    fis::{FIS_H2D_FLAG_CMD, FIS_TYPE_REG_H2D, RegH2D, RxFis, RxFisVolatileFieldAccess},
    mmio::{AhciMmio, AhciMmioVolatileFieldAccess, PortRegisters, PortRegistersVolatileFieldAccess, PxI},
    request::{CommandRequest, CompletionProbe},
    slot::{NCQ_AUTO_TAG, NON_NCQ_SLOT, SlotAllocator, SlotRecord},
    sgpool::SgPool,
    types::{
        AHCI_BYTES_PER_SG, AHCI_MAX_BYTES_PER_CMD, AHCI_MAX_SG, CMD_HDR_CFL, CMD_HDR_WRITE,
        PRDT_DBC_MASK, ahci_cmd_hdr, ahci_cmd_list, ahci_cmd_tbl, ahci_cmd_tblVolatileFieldAccess,
        ahci_prdt_entry,
    },
};

/// Initial SG buffers allocated at bring-up (§4.4): 8 × 128 KiB = 1 MiB.
const INITIAL_SG_BUFFERS: usize = 8;

pub struct Port<H> {
    num: u8,
    regs: VolatilePtr<'static, PortRegisters>,

    slots: SlotAllocator,
    ncq_used: AtomicBool,

    cmd_tables: Mutex<[Option<DmaBuffer<H>>; 32]>,
    sg_pool: SgPool<H>,

    fis: DmaBuffer<H>,
    cmd_list: DmaBuffer<H>,

    _h: PhantomData<H>,
}

impl<H: Hal> Port<H> {
    pub(crate) fn bring_up(host: &VolatilePtr<'static, AhciMmio>, num: u8) -> Result<Self, AhciError> {
        let regs = unsafe {
            host.ports()
                .map(|ports| ports.cast::<PortRegisters>().add(num as usize))
        };

        let cmd_list = DmaBuffer::<H>::alloc(size_of::<ahci_cmd_list>(), 1024)?;
        let fis = DmaBuffer::<H>::alloc(size_of::<RxFis>(), 256)?;

        let port = Self {
            num,
            regs,
            slots: SlotAllocator::new(),
            ncq_used: AtomicBool::new(false),
            cmd_tables: Mutex::new(core::array::from_fn(|_| None)),
            sg_pool: SgPool::new(),
            fis,
            cmd_list,
            _h: PhantomData,
        };

        // The port may already be running (left over from firmware); bring
        // it to Idle before programming anything. Best-effort: a stuck port
        // here is logged, not fatal, because setup_dma below will fail with
        // Busy if it really never reached Idle.
        if let Err(e) = port.stop() {
            warn!("port {num}: stop before bring-up: {e}");
        }

        port.setup_dma()?;
        port.comreset()?;
        port.init()?;
        port.sg_pool.ensure(INITIAL_SG_BUFFERS)?;
        port.start()?;

        info!("port {num}: up (sig={:#x})", port.regs.SIG().read().into_bits());
        Ok(port)
    }

    pub fn number(&self) -> u8 {
        self.num
    }

    fn is_idle(&self) -> bool {
        let cmd = self.regs.CMD().read();
        !cmd.ST() && !cmd.CR() && !cmd.FRE() && !cmd.FR()
    }

    pub fn is_running(&self) -> bool {
        let cmd = self.regs.CMD().read();
        cmd.ST() && cmd.CR()
    }

    /// §4.3 `stop`: clear ST, wait CR→0, clear FRE, wait FR→0.
    pub fn stop(&self) -> Result<(), AhciError> {
        self.regs.CMD().update(|c| c.with_ST(false));
        crate::wait::wait_until::<H>(|| !self.regs.CMD().read().CR(), 500, "PxCMD.CR clear")?;
        self.regs.CMD().update(|c| c.with_FRE(false));
        crate::wait::wait_until::<H>(|| !self.regs.CMD().read().FR(), 500, "PxCMD.FR clear")?;
        Ok(())
    }

    /// §4.3 `setup_dma`: program PxCLB/PxFB. Only legal from Idle.
    pub fn setup_dma(&self) -> Result<(), AhciError> {
        if !self.is_idle() {
            return Err(AhciError::Busy);
        }
        let clb = self.cmd_list.phys_addr();
        self.regs.CLB().write(clb as u32);
        self.regs.CLBU().write((clb >> 32) as u32);

        let fb = self.fis.phys_addr();
        self.regs.FB().write(fb as u32);
        self.regs.FBU().write((fb >> 32) as u32);
        Ok(())
    }

    /// §4.3 `comreset`: OOB SATA link reset.
    pub fn comreset(&self) -> Result<(), AhciError> {
        if self.regs.CMD().read().ST() {
            self.stop()?;
        }
        self.regs.SCTL().update(|s| s.with_DET(1));
        H::sleep_ms(10);
        self.regs.SCTL().update(|s| s.with_DET(0));
        crate::wait::wait_until::<H>(
            || self.regs.SSTS().read().DET() == 3,
            1000,
            "PxSSTS.DET link established",
        )?;
        self.regs.SERR().write(self.regs.SERR().read());
        debug!("port {}: link established", self.num);
        Ok(())
    }

    /// §4.3 `init`: clear SERR, permit the initial D2H FIS, enable FIS
    /// receive and the diagnostic interrupt set.
    pub fn init(&self) -> Result<(), AhciError> {
        self.regs.SERR().write(self.regs.SERR().read());
        self.regs.SERR().update(|s| s.with_DIAG_X(true));

        self.regs.CMD().update(|c| c.with_FRE(true));
        crate::wait::wait_until::<H>(|| self.regs.CMD().read().FR(), 500, "PxCMD.FR set")?;

        self.regs.IE().write(PxI::port_init_enable());
        self.regs.IS().write(self.regs.IS().read());
        Ok(())
    }

    /// §4.3 `start`: Idle → Running.
    pub fn start(&self) -> Result<(), AhciError> {
        if !self.regs.CMD().read().FRE() {
            self.regs.CMD().update(|c| c.with_FRE(true));
            crate::wait::wait_until::<H>(|| self.regs.CMD().read().FR(), 500, "PxCMD.FR set")?;
        }
        self.regs.IS().write(self.regs.IS().read());
        self.regs.CMD().update(|c| c.with_ST(true));
        crate::wait::wait_until::<H>(
            || {
                let tfd = self.regs.TFD().read();
                !tfd.STS_BSY() && !tfd.STS_DRQ()
            },
            1000,
            "PxTFD BSY/DRQ clear",
        )?;
        Ok(())
    }

    fn cmd_list_ptr(&self) -> VolatilePtr<'static, ahci_cmd_list> {
        unsafe { VolatilePtr::new(self.cmd_list.virt_ptr().cast()) }
    }

    fn fis_ptr(&self) -> VolatilePtr<'static, RxFis> {
        unsafe { VolatilePtr::new(self.fis.virt_ptr().cast()) }
    }

    /// Lazily allocate slot `slot`'s Command Table on first use; it then
    /// lives until port teardown and is reused on every later use of the
    /// same slot (§4.4, §5).
    fn cmd_table(&self, slot: u8) -> Result<(usize, VolatilePtr<'static, ahci_cmd_tbl>), AhciError> {
        let mut tables = self.cmd_tables.lock();
        if tables[slot as usize].is_none() {
            let buf = DmaBuffer::<H>::alloc(size_of::<ahci_cmd_tbl>(), 128)?;
            tables[slot as usize] = Some(buf);
        }
        let buf = tables[slot as usize].as_ref().unwrap();
        let phys = buf.phys_addr();
        let ptr: NonNull<ahci_cmd_tbl> = buf.virt_ptr().cast();
        Ok((phys, unsafe { VolatilePtr::new(ptr) }))
    }

    /// §4.6: assemble and arm a command. For NCQ requests this returns once
    /// the command is queued (`req.tag` set); completion is observed later
    /// via [`Self::probe_cmd`] + [`Self::reap_ncq`]. For non-NCQ requests
    /// this blocks until the device completes the command and the result
    /// fields in `req` are populated before returning.
    pub fn issue_cmd(&self, req: &mut CommandRequest) -> Result<(), AhciError> {
        if !self.is_running() {
            return Err(AhciError::Busy);
        }

        let is_write = req.is_write();
        let is_ncq = req.is_ncq();
        let buffer_len = req.buffer_len;

        if buffer_len > 0 && req.buffer.is_null() {
            return Err(AhciError::InvalidArgument {
                reason: "buffer_len > 0 with a null buffer pointer",
            });
        }
        if buffer_len > AHCI_MAX_BYTES_PER_CMD {
            return Err(AhciError::InvalidArgument {
                reason: "transfer exceeds the 256 MiB per-command limit",
            });
        }

        let sg_needed = buffer_len.div_ceil(AHCI_BYTES_PER_SG);
        if sg_needed > AHCI_MAX_SG {
            return Err(AhciError::InvalidArgument {
                reason: "transfer needs more SG buffers than the 2048-buffer cap",
            });
        }
        self.sg_pool.ensure(sg_needed)?;

        let record = SlotRecord {
            ncq: is_ncq,
            is_write,
            buffer: req.buffer,
            buffer_len,
            sg_count: sg_needed,
            lba: req.lba,
            count: req.count,
            status: 0,
            error: 0,
        };

        let slot = if is_ncq {
            let slot = if req.tag == NCQ_AUTO_TAG {
                self.slots.allocate_slot(record)?
            } else {
                if req.tag > 31 {
                    return Err(AhciError::InvalidArgument {
                        reason: "NCQ tag out of range 0..31",
                    });
                }
                self.slots.claim_slot(req.tag, record)?;
                req.tag
            };
            self.ncq_used.store(true, Ordering::Relaxed);
            slot
        } else {
            self.slots.claim_slot(NON_NCQ_SLOT, record)?;
            NON_NCQ_SLOT
        };

        if let Err(e) = self.issue_cmd_on_slot(req, slot, is_write, is_ncq, buffer_len, sg_needed) {
            self.slots.free_slot(slot);
            return Err(e);
        }

        if is_ncq {
            req.tag = slot;
        } else {
            self.slots.free_slot(slot);
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn issue_cmd_on_slot(
        &self,
        req: &mut CommandRequest,
        slot: u8,
        is_write: bool,
        is_ncq: bool,
        buffer_len: usize,
        sg_needed: usize,
    ) -> Result<(), AhciError> {
        if is_write && buffer_len > 0 {
            // SAFETY: the caller owns `req.buffer` for the duration of the
            // call and guarantees it is valid for `buffer_len` bytes.
            unsafe {
                self.sg_pool
                    .stage_write(core::slice::from_raw_parts(req.buffer, buffer_len));
            }
        }

        let (tbl_phys, tbl) = self.cmd_table(slot)?;

        let lba = req.lba;
        let count = req.count;
        let cfis = RegH2D {
            fis_type: FIS_TYPE_REG_H2D,
            flags: FIS_H2D_FLAG_CMD,
            command: req.command,
            features: req.features as u8,
            lba_low: lba as u8,
            lba_mid: (lba >> 8) as u8,
            lba_high: (lba >> 16) as u8,
            device: req.device,
            lba_low_exp: (lba >> 24) as u8,
            lba_mid_exp: (lba >> 32) as u8,
            lba_high_exp: (lba >> 40) as u8,
            features_exp: (req.features >> 8) as u8,
            count: count as u8,
            count_exp: (count >> 8) as u8,
            icc: 0,
            control: 0,
            res: [0; 4],
        };
        tbl.cfis().write(cfis);

        let mut remaining = buffer_len;
        for i in 0..sg_needed {
            let view = self.sg_pool.view(i);
            let len = remaining.min(AHCI_BYTES_PER_SG);
            let entry = ahci_prdt_entry {
                addr_lo: view.phys as u32,
                addr_hi: (view.phys >> 32) as u32,
                reserved: 0,
                dbc: (len as u32 - 1) & PRDT_DBC_MASK,
            };
            unsafe { tbl.prdt().map(|p| p.cast::<ahci_prdt_entry>().add(i)) }.write(entry);
            remaining -= len;
        }

        let opts = CMD_HDR_CFL | ((sg_needed as u32) << 16) | if is_write { CMD_HDR_WRITE } else { 0 };
        let hdr = ahci_cmd_hdr {
            opts,
            prdbc: 0,
            tbl_addr_lo: tbl_phys as u32,
            tbl_addr_hi: (tbl_phys >> 32) as u32,
            reserved: [0; 4],
        };
        unsafe {
            self.cmd_list_ptr()
                .map(|list| list.cast::<ahci_cmd_hdr>().add(slot as usize))
        }
        .write(hdr);

        // Release barrier: every DMA-visible write above must be observable
        // before the controller is armed below.
        H::flush_dcache();

        self.regs.IS().write(PxI::from_bits(0xFFFF_FFFF));
        if is_ncq {
            self.regs.SACT().update(|v| v | (1 << slot));
        }
        self.regs.CI().update(|v| v | (1 << slot));

        let timeout = req.effective_timeout_ms();
        if crate::wait::wait_until::<H>(
            || self.regs.CI().read() & (1 << slot) == 0,
            timeout,
            "command queuing",
        )
        .is_err()
        {
            return Err(AhciError::Timeout { what: "command queuing" });
        }

        if is_ncq {
            return Ok(());
        }

        // Acquire barrier: the completion bit above has been observed, so
        // the Received FIS area is now safe to read.
        H::flush_dcache();

        let d2h = self.fis_ptr().rfis().read();
        req.status = d2h.status;
        req.error = d2h.error;
        req.device_out = d2h.device;
        req.lba_out = (d2h.lba_low as u64)
            | (d2h.lba_mid as u64) << 8
            | (d2h.lba_high as u64) << 16
            | (d2h.lba_low_exp as u64) << 24
            | (d2h.lba_mid_exp as u64) << 32
            | (d2h.lba_high_exp as u64) << 40;
        req.count_out = (d2h.count as u16) | (d2h.count_exp as u16) << 8;

        let is = self.regs.IS().read();
        if is.TFE() || is.HBF() || is.HBD() || is.IF() {
            let tfd = self.regs.TFD().read();
            let serr = self.regs.SERR().read();
            self.regs.IS().write(is);
            self.regs.SERR().write(serr);
            warn!("port {}: command error IS={:#x}", self.num, is.into_bits());
            return Err(AhciError::IOError {
                is: is.into_bits(),
                tfd: tfd.into_bits(),
                serr: serr.into_bits(),
            });
        }

        if !is_write && buffer_len > 0 {
            // SAFETY: `req.buffer` is valid for `buffer_len` bytes, as above.
            unsafe {
                self.sg_pool
                    .stage_read(core::slice::from_raw_parts_mut(req.buffer, buffer_len));
            }
        }

        self.regs.IS().write(self.regs.IS().read());
        Ok(())
    }

    /// §4.7 `check_slot_completion`: poll PxSACT and classify newly-retired
    /// NCQ slots. Returns only the delta for this call.
    pub fn probe_cmd(&self) -> CompletionProbe {
        let sact = self.regs.SACT().read();
        let newly = self.slots.newly_completed(sact);

        let mut probe = CompletionProbe {
            sactive: sact,
            completed: newly,
            ..Default::default()
        };

        if newly != 0 {
            // Acquire barrier before reading the SDB FIS the device wrote.
            H::flush_dcache();
            let sdb = self.fis_ptr().sdbfis().read();
            for i in 0..32u8 {
                if newly & (1 << i) != 0 {
                    self.slots.set_record_result(i, sdb.status, sdb.error);
                    probe.status[i as usize] = sdb.status;
                    probe.error[i as usize] = sdb.error;
                }
            }
        }

        probe
    }

    /// Once `probe_cmd` reports a tag as completed, the caller finishes the
    /// NCQ command here: read-direction data is copied back from the SG
    /// pool and the slot is released. `free_slot` alone (§4.5) is enough to
    /// merely reclaim a tag without reading its result.
    pub fn reap_ncq(&self, tag: u8) -> Result<(u8, u8), AhciError> {
        if !self.slots.is_in_use(tag) {
            return Err(AhciError::InvalidArgument {
                reason: "tag is not in use",
            });
        }
        let record = self.slots.record(tag);
        if !record.is_write && record.buffer_len > 0 && !record.buffer.is_null() {
            unsafe {
                self.sg_pool
                    .stage_read(core::slice::from_raw_parts_mut(record.buffer, record.buffer_len));
            }
        }
        self.slots.free_slot(tag);
        Ok((record.status, record.error))
    }

    pub fn free_slot(&self, slot: u8) {
        self.slots.free_slot(slot);
    }

    pub fn in_use_bits(&self) -> u32 {
        self.slots.in_use_bits()
    }

    /// §4.8: stop the port, silence interrupts, clear pending status.
    /// Idempotent; a failure to stop cleanly is logged and teardown
    /// proceeds. DMA memory is released by ordinary `Drop` of the owned
    /// buffers once the port itself is dropped.
    pub fn teardown(&self) {
        if let Err(e) = self.stop() {
            warn!("port {}: stop during teardown: {e}", self.num);
        }
        self.regs.IE().write(PxI::new());
        self.regs.IS().write(self.regs.IS().read());
    }
}

impl<H: Hal> Drop for Port<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}
