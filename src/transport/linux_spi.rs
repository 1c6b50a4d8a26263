use std::{io, path::PathBuf};

use spidev::{SpiModeFlags, Spidev, SpidevOptions, SpidevTransfer};
use tracing::debug;

use super::Transport;

pub const DEFAULT_SPEED_HZ: u32 = 5_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinuxSpiConfig {
	pub path:     PathBuf,
	pub speed_hz: u32,
}

impl LinuxSpiConfig {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path:     path.into(),
			speed_hz: DEFAULT_SPEED_HZ,
		}
	}

	pub fn speed_hz(mut self, speed_hz: u32) -> Self {
		self.speed_hz = speed_hz;
		self
	}
}

/// A spidev character device, e.g. `/dev/spidev0.0`.
pub struct LinuxSpiTransport {
	device: Spidev,
	path:   PathBuf,
}

impl LinuxSpiTransport {
	/// Opens the device and configures it for the strip: SPI mode 0, 8 bits per word.
	pub fn open(config: &LinuxSpiConfig) -> io::Result<Self> {
		let mut device = Spidev::open(&config.path)?;

		let options = SpidevOptions::new()
			.mode(SpiModeFlags::SPI_MODE_0)
			.bits_per_word(8)
			.max_speed_hz(config.speed_hz)
			.build();
		device.configure(&options)?;

		debug!(
			"opened spi device {} at {} Hz",
			config.path.display(),
			config.speed_hz
		);

		Ok(Self {
			device,
			path: config.path.clone(),
		})
	}
}

impl Transport for LinuxSpiTransport {
	fn write(&mut self, header: &[u8], pixels: &[u8], footer: &[u8]) -> io::Result<()> {
		// one message so the kernel sends the parts without a gap
		let mut transfers = [
			SpidevTransfer::write(header),
			SpidevTransfer::write(pixels),
			SpidevTransfer::write(footer),
		];
		self.device.transfer_multiple(&mut transfers)
	}

	type Released = ();

	fn teardown(self) -> io::Result<()> {
		debug!("closing spi device {}", self.path.display());
		drop(self.device);
		Ok(())
	}
}
