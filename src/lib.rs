//! Driver for APA102 style LED strips (4 bytes per LED, 5 bit global brightness) on an SPI bus.
//!
//! A [`Strip`] keeps the whole frame in memory; the pixel operations only touch that buffer and
//! [`Strip::show`] hands it to the [`Transport`] the strip was created with.

use std::io;
#[cfg(feature = "timings")]
use std::time::Duration;

mod buffer;
mod framing;
mod strip;
pub mod transport;

pub use buffer::PixelBuffer;
pub use framing::FrameFramer;
pub use spi_apa102_shared::{Pixel, MAX_BRIGHTNESS};
pub use strip::{Lifecycle, Strip};
pub use transport::{MemoryTransport, Transport};

#[cfg(feature = "timings")]
pub type ShowResult = Duration;
#[cfg(not(feature = "timings"))]
pub type ShowResult = ();

/// What to do when a pixel index is past the end of the strip.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutOfRange {
	/// Writes are dropped and reads return a zeroed [`Pixel`].
	#[default]
	Ignore,
	/// Fail with [`Error::IndexOutOfRange`].
	Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	pub leds:         usize,
	pub out_of_range: OutOfRange,
}

impl Config {
	pub fn new(leds: usize) -> Self {
		Self {
			leds,
			out_of_range: OutOfRange::default(),
		}
	}

	pub fn out_of_range(mut self, out_of_range: OutOfRange) -> Self {
		self.out_of_range = out_of_range;
		self
	}
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("a strip needs at least one led")]
	NoLeds,
	#[error("a frame for {leds} leds does not fit in memory")]
	TooManyLeds { leds: usize },
	#[error("failed to initialize transport: {0}")]
	Init(#[source] io::Error),
	#[error(transparent)]
	Io(#[from] io::Error),
	#[error("pixel {index} is out of range for a strip of {num_leds} leds")]
	IndexOutOfRange { index: usize, num_leds: usize },
	#[error("strip has been destroyed")]
	Destroyed,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
