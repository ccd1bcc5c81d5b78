//! Scenario and invariant tests run against the scriptable mock in
//! `mock.rs`. No `proptest`/`quickcheck` — hand-written scenarios only.

use core::ptr::NonNull;

use alloc::{vec, vec::Vec};
use volatile::VolatilePtr;

use crate::{
    ata::{ATA_ID_WORDS, ATA_CMD_READ_DMA_EXT},
    error::AhciError,
    hba::Hba,
    mmio::AhciMmio,
    mock::{self, MmioImage, TestHal},
    port::Port,
    request::CommandRequest,
    sgpool::SgPool,
    slot::{SlotAllocator, SlotRecord},
    types::{AHCI_BYTES_PER_SG, AHCI_MAX_SG},
    IdentifyData,
};

fn mmio_ptr(mmio: &MmioImage) -> VolatilePtr<'static, AhciMmio> {
    let ptr = NonNull::new(mmio.base() as *mut AhciMmio).expect("mock MMIO base is non-null");
    // SAFETY: `mmio` owns `size_of::<AhciMmio>()` zeroed, correctly aligned bytes
    // for the duration of the test.
    unsafe { VolatilePtr::new(ptr) }
}

/// A port is brought all the way to Running against the mock: PxSSTS.DET
/// reaches 3 after 15 simulated ms (comreset), PxCMD.FR/CR come up after 20
/// (init's FIS-receive engine, then command-list processing).
fn bring_up_mock_port() -> (MmioImage, Port<TestHal>) {
    TestHal::reset();
    let mmio = MmioImage::new();
    let base = mmio.base();

    TestHal::on_tick(move |now| {
        // SAFETY: `base` points at `size_of::<AhciMmio>()` zeroed bytes for
        // the lifetime of the enclosing test.
        unsafe {
            if now >= 15 {
                let p = (base + mock::offset::port(0, mock::offset::PX_SSTS)) as *mut u32;
                p.write_volatile(3);
            }
            if now >= 20 {
                let p = (base + mock::offset::port(0, mock::offset::PX_CMD)) as *mut u32;
                let v = p.read_volatile();
                // PxCMD.FR is bit 14, PxCMD.CR is bit 15.
                p.write_volatile(v | (1 << 14) | (1 << 15));
            }
        }
    });

    let host = mmio_ptr(&mmio);
    let port = Port::<TestHal>::bring_up(&host, 0).expect("port should come up");
    (mmio, port)
}

#[test]
fn hba_reset_succeeds_when_hr_clears_after_polls() {
    TestHal::reset();
    let mut mmio = MmioImage::new();
    let base = mmio.base();
    mock::write_u32(mmio.bytes_mut(), mock::offset::GHC, 1); // HR set, PI stays 0

    let mut ticks = 0u32;
    TestHal::on_tick(move |_now| {
        ticks += 1;
        if ticks == 3 {
            // SAFETY: `base` points at a live `AhciMmio` image for this test.
            unsafe {
                let p = (base + mock::offset::GHC) as *mut u32;
                let v = p.read_volatile();
                p.write_volatile(v & !1);
            }
        }
    });

    let hba = unsafe { Hba::<TestHal>::try_new(base) };
    assert!(hba.is_ok());
}

#[test]
fn hba_reset_times_out_when_hr_never_clears() {
    TestHal::reset();
    let mut mmio = MmioImage::new();
    let base = mmio.base();
    mock::write_u32(mmio.bytes_mut(), mock::offset::GHC, 1);
    // No tick hook installed: HR never clears.

    let result = unsafe { Hba::<TestHal>::try_new(base) };
    assert!(matches!(result, Err(AhciError::Timeout { .. })));
}

#[test]
fn port_bring_up_reaches_running_via_comreset_init_start() {
    let (_mmio, port) = bring_up_mock_port();
    assert!(port.is_running());
}

#[test]
fn transfer_size_rejection_without_touching_hardware() {
    let (_mmio, port) = bring_up_mock_port();
    let mut req = CommandRequest {
        command: ATA_CMD_READ_DMA_EXT,
        buffer: 1usize as *mut u8, // rejected before ever being dereferenced
        buffer_len: 257 * 1024 * 1024,
        ..Default::default()
    };
    let result = port.issue_cmd(&mut req);
    assert!(matches!(result, Err(AhciError::InvalidArgument { .. })));
    assert_eq!(port.in_use_bits(), 0, "a rejected request must not claim a slot");
}

#[test]
fn allocate_slot_picks_the_lowest_free_tag() {
    let slots = SlotAllocator::new();
    slots
        .claim_slot(0, SlotRecord { ncq: true, ..Default::default() })
        .unwrap();
    slots
        .claim_slot(1, SlotRecord { ncq: true, ..Default::default() })
        .unwrap();
    let picked = slots
        .allocate_slot(SlotRecord { ncq: true, ..Default::default() })
        .unwrap();
    assert_eq!(picked, 2);
    assert_eq!(slots.in_use_bits(), 0b111);
}

#[test]
fn ncq_probe_reports_only_the_newly_completed_delta() {
    let slots = SlotAllocator::new();
    for &tag in &[0u8, 5, 17, 31] {
        slots
            .claim_slot(tag, SlotRecord { ncq: true, ..Default::default() })
            .unwrap();
    }
    let in_use = slots.in_use_bits();
    assert_eq!(in_use, (1 << 0) | (1 << 5) | (1 << 17) | (1 << 31));

    // By the first poll, the device has already cleared SACT bits 5 and 31.
    let sact_after_first_poll = in_use & !((1 << 5) | (1 << 31));
    let newly_first = slots.newly_completed(sact_after_first_poll);
    assert_eq!(newly_first, (1 << 5) | (1 << 31));

    // By the second poll, 0 and 17 have cleared too.
    let newly_second = slots.newly_completed(0);
    assert_eq!(newly_second, (1 << 0) | (1 << 17));

    // A third poll against the same fully-retired snapshot reports nothing new.
    assert_eq!(slots.newly_completed(0), 0);

    for &tag in &[0u8, 5, 17, 31] {
        slots.free_slot(tag);
    }
    assert_eq!(slots.in_use_bits(), 0);
}

#[test]
fn completed_is_always_a_subset_of_in_use() {
    let slots = SlotAllocator::new();
    slots
        .claim_slot(2, SlotRecord { ncq: true, ..Default::default() })
        .unwrap();
    slots
        .claim_slot(9, SlotRecord { ncq: true, ..Default::default() })
        .unwrap();
    let newly = slots.newly_completed(1 << 9); // slot 2 retired, 9 still active
    assert_eq!(newly, 1 << 2);
    assert_eq!(newly & !slots.in_use_bits(), 0);
}

#[test]
fn non_ncq_slot_is_never_reported_by_sact_probing() {
    let slots = SlotAllocator::new();
    slots
        .claim_slot(0, SlotRecord { ncq: false, ..Default::default() })
        .unwrap();
    // PxSACT never tracks the non-NCQ slot, so it always reads as clear —
    // that must not be mistaken for completion.
    assert_eq!(slots.newly_completed(0), 0);
    assert_eq!(slots.in_use_bits(), 1);
}

#[test]
fn sg_pool_ensure_is_monotonic_and_caps_at_the_2048_buffer_limit() {
    TestHal::reset();
    let pool = SgPool::<TestHal>::new();
    pool.ensure(4).unwrap();
    assert_eq!(pool.count(), 4);
    pool.ensure(2).unwrap(); // never shrinks
    assert_eq!(pool.count(), 4);
    pool.ensure(6).unwrap();
    assert_eq!(pool.count(), 6);
    assert!(matches!(
        pool.ensure(AHCI_MAX_SG + 1),
        Err(AhciError::InvalidArgument { .. })
    ));
}

#[test]
fn write_staging_splits_across_sg_buffer_boundaries() {
    TestHal::reset();
    let pool = SgPool::<TestHal>::new();
    let len = 300 * 1024; // crosses two 128 KiB boundaries: 128 + 128 + 44 KiB
    let sg_needed = len.div_ceil(AHCI_BYTES_PER_SG);
    assert_eq!(sg_needed, 3);
    pool.ensure(sg_needed).unwrap();

    let data: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
    // SAFETY: single-threaded test, no concurrent access to the pool.
    unsafe { pool.stage_write(&data) };

    let mut readback = vec![0u8; len];
    // SAFETY: as above.
    unsafe { pool.stage_read(&mut readback) };
    assert_eq!(readback, data);

    let last = pool.view(2);
    assert_eq!(last.len, AHCI_BYTES_PER_SG);
    let last_chunk_used = len - 2 * AHCI_BYTES_PER_SG;
    assert_eq!(last_chunk_used, 44 * 1024); // buffer 2 only holds the final 44 KiB
}

#[test]
fn command_request_default_timeout_is_5000ms() {
    let req = CommandRequest::default();
    assert_eq!(req.effective_timeout_ms(), 5000);

    let req = CommandRequest { timeout_ms: 250, ..Default::default() };
    assert_eq!(req.effective_timeout_ms(), 250);
}

#[test]
fn identify_device_reports_lba48_and_sector_count() {
    let mut words = [0u16; ATA_ID_WORDS];
    words[83] = 1 << 10; // field-valid bit 10: LBA48 supported
    let sectors: u64 = 0x0001_2345_6789;
    words[100] = sectors as u16;
    words[101] = (sectors >> 16) as u16;
    words[102] = (sectors >> 32) as u16;
    words[103] = (sectors >> 48) as u16;

    let id = IdentifyData::from_words(words);
    assert!(id.lba48_supported());
    assert_eq!(id.sector_count(), sectors);
}

#[test]
fn identify_device_falls_back_to_28_bit_capacity_without_lba48() {
    let mut words = [0u16; ATA_ID_WORDS];
    // field-valid bit 10 left clear.
    words[60] = 0x5678;
    words[61] = 0x0001;
    let id = IdentifyData::from_words(words);
    assert!(!id.lba48_supported());
    assert_eq!(id.sector_count(), 0x0001_5678);
}

#[test]
fn identify_device_model_number_byte_swaps_each_word() {
    let mut words = [0u16; ATA_ID_WORDS];
    words[27] = ((b'A' as u16) << 8) | b'B' as u16;
    let id = IdentifyData::from_words(words);
    assert_eq!(&id.model_number()[0..2], b"AB");
}
