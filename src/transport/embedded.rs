use std::{convert::Infallible, io};

use embedded_hal::{
	digital::{self, OutputPin},
	spi::SpiBus,
};
use tracing::debug;

use super::Transport;

/// Stand-in pin for strips without a chip select line, which is the usual APA102 wiring.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoChipSelect;

impl digital::ErrorType for NoChipSelect {
	type Error = Infallible;
}

impl OutputPin for NoChipSelect {
	fn set_low(&mut self) -> Result<(), Self::Error> {
		Ok(())
	}

	fn set_high(&mut self) -> Result<(), Self::Error> {
		Ok(())
	}
}

/// Any `embedded-hal` SPI bus. With a chip select pin, the pin is held low for the length of a
/// frame, useful when the strip sits behind a level shifter with an enable input.
pub struct EmbeddedSpiTransport<SPI, CS = NoChipSelect> {
	spi: SPI,
	cs:  CS,
}

impl<SPI: SpiBus> EmbeddedSpiTransport<SPI> {
	/// Takes a bus that is already clocked and set to SPI mode 0.
	pub fn new(spi: SPI) -> Self {
		debug!("embedded spi transport ready");
		Self {
			spi,
			cs: NoChipSelect,
		}
	}
}

impl<SPI, CS> EmbeddedSpiTransport<SPI, CS>
where
	SPI: SpiBus,
	CS: OutputPin,
{
	/// Like [`EmbeddedSpiTransport::new`], deselects the strip through `cs` until the first frame.
	pub fn with_chip_select(spi: SPI, mut cs: CS) -> io::Result<Self> {
		cs.set_high().map_err(pin_error)?;
		debug!("embedded spi transport ready, with chip select");

		Ok(Self { spi, cs })
	}

	fn write_frame(&mut self, header: &[u8], pixels: &[u8], footer: &[u8]) -> io::Result<()> {
		self.spi.write(header).map_err(bus_error)?;
		self.spi.write(pixels).map_err(bus_error)?;
		self.spi.write(footer).map_err(bus_error)?;
		self.spi.flush().map_err(bus_error)
	}
}

impl<SPI, CS> Transport for EmbeddedSpiTransport<SPI, CS>
where
	SPI: SpiBus,
	CS: OutputPin,
{
	/// The bus and the pin, the strip left deselected.
	type Released = (SPI, CS);

	fn write(&mut self, header: &[u8], pixels: &[u8], footer: &[u8]) -> io::Result<()> {
		self.cs.set_low().map_err(pin_error)?;
		let written = self.write_frame(header, pixels, footer);
		// deselect even if the bus failed
		let deselected = self.cs.set_high().map_err(pin_error);

		written.and(deselected)
	}

	fn teardown(mut self) -> io::Result<Self::Released> {
		debug!("releasing embedded spi transport");
		self.spi.flush().map_err(bus_error)?;
		self.cs.set_high().map_err(pin_error)?;

		Ok((self.spi, self.cs))
	}
}

fn bus_error(err: impl embedded_hal::spi::Error) -> io::Error {
	io::Error::other(format!("spi bus error: {:?}", err.kind()))
}

fn pin_error(err: impl embedded_hal::digital::Error) -> io::Error {
	io::Error::other(format!("chip select error: {:?}", err.kind()))
}

#[cfg(test)]
mod tests {
	use embedded_hal::spi;

	use super::*;

	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	enum Event {
		Low,
		High,
		Write(usize),
		Flush,
	}

	#[derive(Default)]
	struct Log {
		events: Vec<Event>,
		bytes:  Vec<u8>,
	}

	type Shared = std::rc::Rc<std::cell::RefCell<Log>>;

	struct FakeBus {
		log:  Shared,
		fail: bool,
	}

	#[derive(Debug)]
	struct FakeBusError;

	impl spi::Error for FakeBusError {
		fn kind(&self) -> spi::ErrorKind {
			spi::ErrorKind::Overrun
		}
	}

	impl spi::ErrorType for FakeBus {
		type Error = FakeBusError;
	}

	impl SpiBus for FakeBus {
		fn read(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
			Ok(())
		}

		fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
			if self.fail {
				return Err(FakeBusError);
			}
			let mut log = self.log.borrow_mut();
			log.events.push(Event::Write(words.len()));
			log.bytes.extend_from_slice(words);
			Ok(())
		}

		fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), Self::Error> {
			Ok(())
		}

		fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
			Ok(())
		}

		fn flush(&mut self) -> Result<(), Self::Error> {
			self.log.borrow_mut().events.push(Event::Flush);
			Ok(())
		}
	}

	struct FakePin {
		log: Shared,
	}

	impl digital::ErrorType for FakePin {
		type Error = Infallible;
	}

	impl OutputPin for FakePin {
		fn set_low(&mut self) -> Result<(), Self::Error> {
			self.log.borrow_mut().events.push(Event::Low);
			Ok(())
		}

		fn set_high(&mut self) -> Result<(), Self::Error> {
			self.log.borrow_mut().events.push(Event::High);
			Ok(())
		}
	}

	fn fake_transport(fail: bool) -> (EmbeddedSpiTransport<FakeBus, FakePin>, Shared) {
		let log = Shared::default();
		let bus = FakeBus {
			log: log.clone(),
			fail,
		};
		let pin = FakePin { log: log.clone() };
		(EmbeddedSpiTransport::with_chip_select(bus, pin).unwrap(), log)
	}

	#[test]
	fn test_frame_is_wrapped_in_chip_select() {
		let (mut transport, log) = fake_transport(false);
		transport.write(&[0; 4], &[0xFF, 1, 2, 3], &[0xFF]).unwrap();

		let log = log.borrow();
		assert_eq!(
			log.events,
			[
				Event::High,
				Event::Low,
				Event::Write(4),
				Event::Write(4),
				Event::Write(1),
				Event::Flush,
				Event::High,
			]
		);
		assert_eq!(log.bytes, [0, 0, 0, 0, 0xFF, 1, 2, 3, 0xFF]);
	}

	#[test]
	fn test_bus_error_still_deselects() {
		let (mut transport, log) = fake_transport(true);
		let err = transport.write(&[0; 4], &[], &[0xFF]).unwrap_err();

		assert_eq!(err.kind(), io::ErrorKind::Other);
		assert_eq!(log.borrow().events.last(), Some(&Event::High));
	}

	#[test]
	fn test_teardown_leaves_strip_deselected() {
		let (transport, log) = fake_transport(false);
		let (bus, _pin) = transport.teardown().unwrap();

		assert_eq!(log.borrow().events, [Event::High, Event::Flush, Event::High]);
		assert!(!bus.fail);
	}

	#[test]
	fn test_without_chip_select() {
		let log = Shared::default();
		let bus = FakeBus {
			log:  log.clone(),
			fail: false,
		};
		let mut transport = EmbeddedSpiTransport::new(bus);
		transport.write(&[0; 4], &[0xE1, 4, 5, 6], &[0xFF]).unwrap();
		transport.teardown().unwrap();

		let log = log.borrow();
		assert_eq!(
			log.events,
			[
				Event::Write(4),
				Event::Write(4),
				Event::Write(1),
				Event::Flush,
				Event::Flush,
			]
		);
		assert_eq!(log.bytes, [0, 0, 0, 0, 0xE1, 4, 5, 6, 0xFF]);
	}
}
