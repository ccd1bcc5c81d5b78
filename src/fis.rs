//! FIS (Frame Information Structure) wire layouts, AHCI 1.3.1 §10.5, and the
//! byte offsets at which each lands inside the 256-byte Received FIS area
//! (§4.2.1).

#![allow(non_camel_case_types)]

use volatile::VolatileFieldAccess;

/// Register FIS — Host to Device.
pub const FIS_TYPE_REG_H2D: u8 = 0x27;
/// Register FIS — Device to Host.
pub const FIS_TYPE_REG_D2H: u8 = 0x34;
/// DMA Activate FIS — Device to Host.
pub const FIS_TYPE_DMA_ACT: u8 = 0x39;
/// DMA Setup FIS — bidirectional.
pub const FIS_TYPE_DMA_SETUP: u8 = 0x41;
/// Data FIS — bidirectional.
pub const FIS_TYPE_DATA: u8 = 0x46;
/// BIST Activate FIS — bidirectional.
pub const FIS_TYPE_BIST: u8 = 0x58;
/// PIO Setup FIS — Device to Host.
pub const FIS_TYPE_PIO_SETUP: u8 = 0x5F;
/// Set Device Bits FIS — Device to Host.
pub const FIS_TYPE_DEV_BITS: u8 = 0xA1;

/// "Command" bit in a Register H2D FIS's flags byte: set for a command,
/// clear for a Control FIS.
pub const FIS_H2D_FLAG_CMD: u8 = 1 << 7;

/// Register FIS — Host to Device (§10.5.5). 20 bytes on the wire.
#[derive(Debug, Default, Clone, Copy)]
#[repr(C)]
pub struct RegH2D {
    pub fis_type: u8,
    /// bit 7: C (Command), bits 3:0: PM port.
    pub flags: u8,
    pub command: u8,
    pub features: u8,

    pub lba_low: u8,
    pub lba_mid: u8,
    pub lba_high: u8,
    pub device: u8,

    pub lba_low_exp: u8,
    pub lba_mid_exp: u8,
    pub lba_high_exp: u8,
    pub features_exp: u8,

    pub count: u8,
    pub count_exp: u8,
    pub icc: u8,
    pub control: u8,

    pub res: [u8; 4],
}

const _: () = assert!(size_of::<RegH2D>() == 20);

/// Register FIS — Device to Host (§10.5.6). 20 bytes on the wire.
#[derive(Debug, Default, Clone, Copy)]
#[repr(C)]
pub struct RegD2H {
    pub fis_type: u8,
    /// bit 6: I (Interrupt), bits 3:0: PM port.
    pub flags: u8,
    pub status: u8,
    pub error: u8,

    pub lba_low: u8,
    pub lba_mid: u8,
    pub lba_high: u8,
    pub device: u8,

    pub lba_low_exp: u8,
    pub lba_mid_exp: u8,
    pub lba_high_exp: u8,
    pub res1: u8,

    pub count: u8,
    pub count_exp: u8,
    pub res2: [u8; 2],

    pub res3: [u8; 4],
}

const _: () = assert!(size_of::<RegD2H>() == 20);

/// DMA Setup FIS (§10.5.9). 28 bytes on the wire.
#[derive(Debug, Default, Clone, Copy)]
#[repr(C)]
pub struct DmaSetup {
    pub fis_type: u8,
    pub flags: u8,
    pub res1: [u8; 2],
    pub dma_buffer_id_low: u32,
    pub dma_buffer_id_high: u32,
    pub res2: u32,
    pub dma_buffer_offset: u32,
    pub transfer_count: u32,
    pub res3: u32,
}

/// PIO Setup FIS (§10.5.11). 20 bytes on the wire.
#[derive(Debug, Default, Clone, Copy)]
#[repr(C)]
pub struct PioSetup {
    pub fis_type: u8,
    pub flags: u8,
    pub status: u8,
    pub error: u8,

    pub lba_low: u8,
    pub lba_mid: u8,
    pub lba_high: u8,
    pub device: u8,

    pub lba_low_exp: u8,
    pub lba_mid_exp: u8,
    pub lba_high_exp: u8,
    pub res1: u8,

    pub count: u8,
    pub count_exp: u8,
    pub res2: u8,
    pub e_status: u8,

    pub transfer_count: u16,
    pub res3: u16,
}

/// Set Device Bits FIS (§10.5.7). Carries only status/error for NCQ
/// completion notification — no LBA or count.
#[derive(Debug, Default, Clone, Copy)]
#[repr(C)]
pub struct SetDeviceBits {
    pub fis_type: u8,
    /// bit 6: I (Interrupt), bit 5: N (Notification), bits 3:0: PM port.
    pub flags: u8,
    /// Status bits 6:4 in the high nibble, bits 2:0 in the low nibble.
    pub status: u8,
    pub error: u8,
    pub protocol_specific: u32,
}

/// Received FIS area (§4.2.1), 256 bytes, 256-byte aligned. The DMA engine
/// writes each constituent FIS to its fixed offset as it arrives; the driver
/// only ever reads back through these sub-windows.
#[derive(Debug, Clone, Copy, VolatileFieldAccess)]
#[repr(C)]
pub struct RxFis {
    /// 0x00: DMA Setup FIS.
    pub dsfis: DmaSetup,
    pad0: [u8; 4],
    /// 0x20: PIO Setup FIS.
    pub psfis: PioSetup,
    pad1: [u8; 12],
    /// 0x40: Register D2H FIS.
    pub rfis: RegD2H,
    pad2: [u8; 4],
    /// 0x58: Set Device Bits FIS.
    pub sdbfis: SetDeviceBits,
    /// 0x60: unknown/vendor FIS.
    ufis: [u8; 64],
    res: [u8; 96],
}

const _: () = assert!(size_of::<RxFis>() == 256);
const _: () = assert!(core::mem::offset_of!(RxFis, rfis) == 0x40);
const _: () = assert!(core::mem::offset_of!(RxFis, sdbfis) == 0x58);
