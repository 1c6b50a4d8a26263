use std::io;
#[cfg(feature = "timings")]
use std::time::Instant;

#[cfg(feature = "embedded-hal")]
use embedded_hal::{digital::OutputPin, spi::SpiBus};
use spi_apa102_shared::{frame_len, Pixel};
use tracing::{info, trace, warn};

#[cfg(feature = "embedded-hal")]
use crate::transport::EmbeddedSpiTransport;
#[cfg(all(feature = "linux-spi", target_os = "linux"))]
use crate::transport::{LinuxSpiConfig, LinuxSpiTransport};
use crate::{
	Config,
	Error,
	FrameFramer,
	MemoryTransport,
	OutOfRange,
	PixelBuffer,
	Result,
	ShowResult,
	Transport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
	Ready,
	Destroyed,
}

struct Parts<T> {
	buffer:    PixelBuffer,
	framer:    FrameFramer,
	transport: T,
}

/// An LED strip bound to the transport it is shown on.
///
/// Every operation except [`Strip::show`] only changes the in-memory frame. After
/// [`Strip::destroy`] all operations fail with [`Error::Destroyed`]. Dropping a strip that was not
/// destroyed tears the transport down as well.
pub struct Strip<T: Transport> {
	config: Config,
	parts:  Option<Parts<T>>,
}

impl<T: Transport> Strip<T> {
	/// Creates a strip, `open` is only called once the config is known to be valid and the frame
	/// buffer is allocated after the bus is up.
	pub fn new<F>(config: Config, open: F) -> Result<Self>
	where
		F: FnOnce() -> io::Result<T>,
	{
		check_size(&config)?;

		let transport = open().map_err(Error::Init)?;

		Self::with_transport(config, transport)
	}

	/// Creates a strip on a transport that is already open, the buffer starts cleared.
	///
	/// If the strip cannot be created the transport is torn down before the error is returned.
	pub fn with_transport(config: Config, transport: T) -> Result<Self> {
		let len = match check_size(&config) {
			Ok(len) => len,
			Err(e) => {
				release(transport);
				return Err(e);
			}
		};

		let Some(buffer) = PixelBuffer::new(config.leds) else {
			release(transport);
			return Err(Error::TooManyLeds { leds: config.leds });
		};

		let framer = FrameFramer::new(config.leds);
		info!(
			"created strip with {} leds, {} byte frames",
			config.leds, len
		);

		Ok(Self {
			config,
			parts: Some(Parts {
				buffer,
				framer,
				transport,
			}),
		})
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn num_leds(&self) -> usize {
		self.config.leds
	}

	pub fn lifecycle(&self) -> Lifecycle {
		match self.parts {
			Some(_) => Lifecycle::Ready,
			None => Lifecycle::Destroyed,
		}
	}

	/// The encoded LED frames, as they will be sent on the next [`Strip::show`].
	pub fn pixels(&self) -> Result<&[u8]> {
		Ok(self.parts()?.buffer.as_bytes())
	}

	pub fn framer(&self) -> Result<&FrameFramer> {
		Ok(&self.parts()?.framer)
	}

	pub fn transport(&self) -> Result<&T> {
		Ok(&self.parts()?.transport)
	}

	pub fn transport_mut(&mut self) -> Result<&mut T> {
		Ok(&mut self.parts_mut()?.transport)
	}

	/// Writes the frame to the strip. Transport errors are returned as is, nothing is retried.
	pub fn show(&mut self) -> Result<ShowResult> {
		let parts = self.parts_mut()?;

		#[cfg(feature = "timings")]
		let start = Instant::now();

		parts.transport.write(
			parts.framer.header(),
			parts.buffer.as_bytes(),
			parts.framer.footer(),
		)?;
		trace!("showed {} leds", parts.buffer.len());

		#[cfg(feature = "timings")]
		return Ok(start.elapsed());

		#[cfg(not(feature = "timings"))]
		Ok(())
	}

	/// Tears down the transport, then frees the frame buffer. Returns what the transport handed
	/// back on teardown.
	pub fn destroy(&mut self) -> Result<T::Released> {
		let Parts {
			buffer,
			framer,
			transport,
		} = self.parts.take().ok_or(Error::Destroyed)?;

		let released = transport.teardown();
		drop(framer);
		drop(buffer);
		info!("destroyed strip with {} leds", self.config.leds);

		Ok(released?)
	}

	/// Resets every pixel to black at full brightness. Does not write to the strip.
	pub fn clear(&mut self) -> Result<()> {
		self.buffer_mut()?.clear();
		Ok(())
	}

	pub fn pixel(&self, index: usize) -> Result<Pixel> {
		match self.parts()?.buffer.get(index) {
			Some(pixel) => Ok(pixel),
			None => match self.config.out_of_range {
				OutOfRange::Ignore => Ok(Pixel::default()),
				OutOfRange::Reject => Err(self.out_of_range(index)),
			},
		}
	}

	/// Color of a pixel as `(red, green, blue)`.
	pub fn pixel_color(&self, index: usize) -> Result<(u8, u8, u8)> {
		let pixel = self.pixel(index)?;
		Ok((pixel.red, pixel.green, pixel.blue))
	}

	pub fn pixel_brightness(&self, index: usize) -> Result<u8> {
		Ok(self.pixel(index)?.brightness)
	}

	pub fn set_pixel(&mut self, index: usize, pixel: Pixel) -> Result<()> {
		self.write_pixel(index, |buffer| buffer.set(index, pixel))
	}

	/// Brightness is clamped to [`MAX_BRIGHTNESS`](crate::MAX_BRIGHTNESS).
	pub fn set_pixel_color_and_brightness(
		&mut self,
		index: usize,
		red: u8,
		green: u8,
		blue: u8,
		brightness: u8,
	) -> Result<()> {
		self.write_pixel(index, |buffer| {
			buffer.set_color_and_brightness(index, red, green, blue, brightness)
		})
	}

	/// Does not change the brightness of the pixel.
	pub fn set_pixel_color(&mut self, index: usize, red: u8, green: u8, blue: u8) -> Result<()> {
		self.write_pixel(index, |buffer| buffer.set_color(index, red, green, blue))
	}

	/// Does not change the color of the pixel.
	pub fn set_pixel_brightness(&mut self, index: usize, brightness: u8) -> Result<()> {
		self.write_pixel(index, |buffer| buffer.set_brightness(index, brightness))
	}

	pub fn set_color_and_brightness(
		&mut self,
		red: u8,
		green: u8,
		blue: u8,
		brightness: u8,
	) -> Result<()> {
		self.buffer_mut()?
			.fill(Pixel::new(red, green, blue, brightness));
		Ok(())
	}

	/// Sets the whole strip to one color, brightness of each pixel is kept.
	pub fn set_color(&mut self, red: u8, green: u8, blue: u8) -> Result<()> {
		self.buffer_mut()?.fill_color(red, green, blue);
		Ok(())
	}

	/// Sets the whole strip to one brightness, color of each pixel is kept.
	pub fn set_brightness(&mut self, brightness: u8) -> Result<()> {
		self.buffer_mut()?.fill_brightness(brightness);
		Ok(())
	}

	/// Inserts a pixel at index 0, the last pixel is dropped.
	pub fn push_front(&mut self, red: u8, green: u8, blue: u8, brightness: u8) -> Result<()> {
		self.buffer_mut()?
			.push_front(Pixel::new(red, green, blue, brightness));
		Ok(())
	}

	/// Appends a pixel at the end, the pixel at index 0 is dropped.
	pub fn push_back(&mut self, red: u8, green: u8, blue: u8, brightness: u8) -> Result<()> {
		self.buffer_mut()?
			.push_back(Pixel::new(red, green, blue, brightness));
		Ok(())
	}

	/// The pixel at index 0 moves to the end.
	pub fn rotate_left(&mut self) -> Result<()> {
		self.buffer_mut()?.rotate_left();
		Ok(())
	}

	/// The last pixel moves to index 0.
	pub fn rotate_right(&mut self) -> Result<()> {
		self.buffer_mut()?.rotate_right();
		Ok(())
	}

	fn parts(&self) -> Result<&Parts<T>> {
		self.parts.as_ref().ok_or(Error::Destroyed)
	}

	fn parts_mut(&mut self) -> Result<&mut Parts<T>> {
		self.parts.as_mut().ok_or(Error::Destroyed)
	}

	fn buffer_mut(&mut self) -> Result<&mut PixelBuffer> {
		Ok(&mut self.parts_mut()?.buffer)
	}

	fn write_pixel<F>(&mut self, index: usize, write: F) -> Result<()>
	where
		F: FnOnce(&mut PixelBuffer) -> bool,
	{
		let policy = self.config.out_of_range;
		if write(self.buffer_mut()?) || policy == OutOfRange::Ignore {
			Ok(())
		} else {
			Err(self.out_of_range(index))
		}
	}

	fn out_of_range(&self, index: usize) -> Error {
		Error::IndexOutOfRange {
			index,
			num_leds: self.config.leds,
		}
	}
}

impl Strip<MemoryTransport> {
	/// A strip that is not connected to anything, see [`MemoryTransport`].
	pub fn memory(config: Config) -> Result<Self> {
		Self::new(config, || Ok(MemoryTransport::new()))
	}
}

#[cfg(all(feature = "linux-spi", target_os = "linux"))]
impl Strip<LinuxSpiTransport> {
	pub fn linux_spi(spi: &LinuxSpiConfig, config: Config) -> Result<Self> {
		Self::new(config, || LinuxSpiTransport::open(spi))
	}
}

#[cfg(feature = "embedded-hal")]
impl<SPI: SpiBus> Strip<EmbeddedSpiTransport<SPI>> {
	pub fn embedded(spi: SPI, config: Config) -> Result<Self> {
		Self::new(config, || Ok(EmbeddedSpiTransport::new(spi)))
	}
}

#[cfg(feature = "embedded-hal")]
impl<SPI, CS> Strip<EmbeddedSpiTransport<SPI, CS>>
where
	SPI: SpiBus,
	CS: OutputPin,
{
	pub fn embedded_with_chip_select(spi: SPI, cs: CS, config: Config) -> Result<Self> {
		Self::new(config, || EmbeddedSpiTransport::with_chip_select(spi, cs))
	}
}

impl<T: Transport> Drop for Strip<T> {
	fn drop(&mut self) {
		if let Some(parts) = self.parts.take() {
			release(parts.transport);
		}
	}
}

/// Checks the strip length, returns the size of a frame on the wire.
fn check_size(config: &Config) -> Result<usize> {
	if config.leds == 0 {
		return Err(Error::NoLeds);
	}

	match frame_len(config.leds) {
		Some(len) if len <= isize::MAX as usize => Ok(len),
		_ => Err(Error::TooManyLeds { leds: config.leds }),
	}
}

/// Tears down a transport when there is no caller to report to.
fn release<T: Transport>(transport: T) {
	if let Err(e) = transport.teardown() {
		warn!("failed to tear down transport: {}", e);
	}
}
