//! DMA wire structures: Command List, Command Headers, Command Tables and
//! PRDT entries (AHCI 1.3.1 §4.2.2, §4.2.3).

#![allow(non_camel_case_types)]

use volatile::VolatileFieldAccess;

use crate::fis::RegH2D;

/// Command Header flags (word 0, low 16 bits): bits 4:0 CFL, bit 5 ATAPI,
/// bit 6 Write, bit 7 Prefetchable, bit 8 Reset, bit 10 Clear-Busy.
pub const CMD_HDR_WRITE: u32 = 1 << 6;

/// Command FIS length, in DWORDs, for a 20-byte Register H2D FIS.
pub const CMD_HDR_CFL: u32 = (size_of::<RegH2D>() / 4) as u32;

/// Command List entry (32 bytes, AHCI 1.3.1 §4.2.2).
#[derive(Debug, Default, Clone, Copy)]
#[repr(C)]
pub struct ahci_cmd_hdr {
    /// Low 16 bits: flags (CFL, ATAPI, W, ...). High 16 bits: PRDTL.
    pub opts: u32,
    /// PRD Byte Count: written back by hardware on completion.
    pub prdbc: u32,
    pub tbl_addr_lo: u32,
    pub tbl_addr_hi: u32,
    pub reserved: [u32; 4],
}

const _: () = assert!(size_of::<ahci_cmd_hdr>() == 32);

pub const AHCI_MAX_CMDS: usize = 32;

pub type ahci_cmd_list = [ahci_cmd_hdr; AHCI_MAX_CMDS];

const _: () = assert!(size_of::<ahci_cmd_list>() == 1024);

/// A single PRDT (Physical Region Descriptor Table) entry. `dbc` holds
/// "byte count minus one" in bits 21:0, with bit 31 as interrupt-on-completion.
#[derive(Debug, Default, Clone, Copy)]
#[repr(C)]
pub struct ahci_prdt_entry {
    pub addr_lo: u32,
    pub addr_hi: u32,
    pub reserved: u32,
    pub dbc: u32,
}

const _: () = assert!(size_of::<ahci_prdt_entry>() == 16);

/// `IOC` bit within a PRDT entry's `dbc` field.
pub const PRDT_IOC: u32 = 1 << 31;
/// Mask for the 22-bit data byte count.
pub const PRDT_DBC_MASK: u32 = 0x3f_ffff;

/// Size of one scatter-gather buffer. Each SG buffer the pool hands out is
/// exactly this large, so every PRDT entry but the last for a given request
/// is a full buffer.
pub const AHCI_BYTES_PER_SG: usize = 128 * 1024;

/// Hard cap on SG buffers per port (§4.4): 2048 buffers × 128 KiB = 256 MiB.
/// This is also the fixed PRDT array length of every Command Table — see
/// DESIGN.md for why a fixed-size table was chosen over dynamic growth.
pub const AHCI_MAX_SG: usize = 2048;

pub const AHCI_MAX_BYTES_PER_CMD: usize = AHCI_MAX_SG * AHCI_BYTES_PER_SG;

/// Command Table (AHCI 1.3.1 §4.2.3): 64-byte Command FIS area, 16-byte
/// ATAPI command, 48 bytes reserved, then a fixed PRDT array. 128-byte
/// aligned.
#[derive(Debug, Clone, VolatileFieldAccess)]
#[repr(C)]
pub struct ahci_cmd_tbl {
    pub cfis: RegH2D,
    _cfis_pad: [u8; 64 - size_of::<RegH2D>()],
    acmd: [u8; 16],
    _reserved: [u8; 48],
    pub prdt: [ahci_prdt_entry; AHCI_MAX_SG],
}

const _: () = assert!(core::mem::offset_of!(ahci_cmd_tbl, prdt) == 128);
