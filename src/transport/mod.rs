//! Buses a [`Strip`](crate::Strip) can be shown on.
//!
//! - [`MemoryTransport`]: keeps every frame in memory, no hardware needed
//! - `LinuxSpiTransport`: a Linux spidev node (feature `linux-spi`)
//! - `EmbeddedSpiTransport`: any `embedded-hal` SPI bus, optionally with a chip select pin
//!   (feature `embedded-hal`)

use std::io;

#[cfg(feature = "embedded-hal")]
mod embedded;
#[cfg(all(feature = "linux-spi", target_os = "linux"))]
mod linux_spi;
mod memory;

#[cfg(feature = "embedded-hal")]
pub use embedded::{EmbeddedSpiTransport, NoChipSelect};
#[cfg(all(feature = "linux-spi", target_os = "linux"))]
pub use linux_spi::{LinuxSpiConfig, LinuxSpiTransport};
pub use memory::MemoryTransport;

/// Sends finished frames to the strip.
///
/// Opening the bus is the job of the constructor of each implementation, so a transport that
/// exists is ready to write.
pub trait Transport {
	/// What is left once the bus is released, e.g. the peripherals the transport was built from.
	type Released;

	/// Writes one frame. The three parts must reach the strip back to back and in this order.
	fn write(&mut self, header: &[u8], pixels: &[u8], footer: &[u8]) -> io::Result<()>;

	/// Releases the bus.
	fn teardown(self) -> io::Result<Self::Released>
	where
		Self: Sized;
}
