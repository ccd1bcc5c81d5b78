use thiserror::Error;

/// Every fault the core can report. Hardware is never trusted to self-heal;
/// every branch that observes a stuck bit or a controller-reported fault
/// returns one of these instead of retrying silently.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AhciError {
    /// A register bit did not transition within the allowed window.
    #[error("timeout waiting for {what}")]
    Timeout { what: &'static str },

    /// The command queued but the controller reported a fault
    /// (TFES/HBFS/HBDS/IFS). Carries the raw register snapshots observed at
    /// the moment of detection.
    #[error("command error: IS={is:#x} TFD={tfd:#x} SERR={serr:#x}")]
    IOError { is: u32, tfd: u32, serr: u32 },

    /// A precondition was violated: port not running, slot already in use,
    /// `setup_dma` called on a non-idle port.
    #[error("port or slot busy")]
    Busy,

    /// Slot out of range, transfer too large, or an otherwise malformed
    /// request.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: &'static str },

    /// DMA-coherent allocation failed.
    #[error("out of memory")]
    OutOfMemory,
}

pub type Result<T> = core::result::Result<T, AhciError>;
