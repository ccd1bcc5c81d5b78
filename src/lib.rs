#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod ata;
mod dma;
mod error;
mod fis;
mod hal;
mod hba;
mod mmio;
#[cfg(test)]
mod mock;
mod port;
mod request;
mod sgpool;
mod slot;
#[cfg(test)]
mod tests;
mod types;
mod wait;

pub use ata::IdentifyData;
pub use error::AhciError;
pub use hal::Hal;
pub use hba::Hba;
pub use port::Port;
pub use request::{CommandFlags, CommandRequest, CompletionProbe};
