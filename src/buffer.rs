use spi_apa102_shared::{encode_brightness, Pixel, BYTES_PER_LED};

/// The LED frames of a strip, stored exactly as they go on the wire.
///
/// Index 0 is the LED closest to the controller. Writes past the end are ignored and reported
/// through the returned `bool`, reads past the end return `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
	bytes: Vec<u8>,
}

impl PixelBuffer {
	/// Creates a buffer with every pixel [`Pixel::OFF`]. Returns `None` for an empty strip or when
	/// the buffer cannot be allocated.
	pub fn new(num_leds: usize) -> Option<Self> {
		if num_leds == 0 {
			return None;
		}

		let len = num_leds.checked_mul(BYTES_PER_LED)?;
		let mut bytes = Vec::new();
		bytes.try_reserve_exact(len).ok()?;
		bytes.resize(len, 0);

		let mut buffer = Self { bytes };
		buffer.clear();

		Some(buffer)
	}

	pub fn len(&self) -> usize {
		self.bytes.len() / BYTES_PER_LED
	}

	/// Always false, a buffer holds at least one pixel.
	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	/// The encoded LED frames.
	pub fn as_bytes(&self) -> &[u8] {
		&self.bytes
	}

	pub fn iter(&self) -> impl Iterator<Item = Pixel> + '_ {
		self.bytes.chunks_exact(BYTES_PER_LED).map(decode)
	}

	pub fn get(&self, index: usize) -> Option<Pixel> {
		self.slot(index).map(decode)
	}

	/// Color of a pixel as `(red, green, blue)`.
	pub fn color(&self, index: usize) -> Option<(u8, u8, u8)> {
		self.get(index).map(|p| (p.red, p.green, p.blue))
	}

	pub fn brightness(&self, index: usize) -> Option<u8> {
		self.get(index).map(|p| p.brightness)
	}

	pub fn set(&mut self, index: usize, pixel: Pixel) -> bool {
		match self.slot_mut(index) {
			Some(slot) => {
				slot.copy_from_slice(&pixel.to_bytes());
				true
			}
			None => false,
		}
	}

	pub fn set_color_and_brightness(
		&mut self,
		index: usize,
		red: u8,
		green: u8,
		blue: u8,
		brightness: u8,
	) -> bool {
		self.set(index, Pixel::new(red, green, blue, brightness))
	}

	/// Changes the color, keeps the brightness already stored for that pixel.
	pub fn set_color(&mut self, index: usize, red: u8, green: u8, blue: u8) -> bool {
		match self.get(index) {
			Some(current) => self.set(index, Pixel::new(red, green, blue, current.brightness)),
			None => false,
		}
	}

	/// Changes the brightness, keeps the color already stored for that pixel.
	pub fn set_brightness(&mut self, index: usize, brightness: u8) -> bool {
		match self.get(index) {
			Some(current) => self.set(
				index,
				Pixel::new(current.red, current.green, current.blue, brightness),
			),
			None => false,
		}
	}

	/// Sets every pixel to black at full brightness.
	pub fn clear(&mut self) {
		self.fill(Pixel::OFF);
	}

	pub fn fill(&mut self, pixel: Pixel) {
		let bytes = pixel.to_bytes();
		for slot in self.bytes.chunks_exact_mut(BYTES_PER_LED) {
			slot.copy_from_slice(&bytes);
		}
	}

	pub fn fill_color(&mut self, red: u8, green: u8, blue: u8) {
		for slot in self.bytes.chunks_exact_mut(BYTES_PER_LED) {
			slot[1] = blue;
			slot[2] = green;
			slot[3] = red;
		}
	}

	pub fn fill_brightness(&mut self, brightness: u8) {
		let byte = encode_brightness(brightness);
		for slot in self.bytes.chunks_exact_mut(BYTES_PER_LED) {
			slot[0] = byte;
		}
	}

	/// Moves every pixel one position towards the back and puts `pixel` at index 0. The last
	/// pixel falls off.
	pub fn push_front(&mut self, pixel: Pixel) {
		let end = self.bytes.len() - BYTES_PER_LED;
		self.bytes.copy_within(..end, BYTES_PER_LED);
		self.set(0, pixel);
	}

	/// Moves every pixel one position towards the front and puts `pixel` at the last index. The
	/// first pixel falls off.
	pub fn push_back(&mut self, pixel: Pixel) {
		self.bytes.copy_within(BYTES_PER_LED.., 0);
		self.set(self.len() - 1, pixel);
	}

	/// Moves the first pixel to the end, everything else shifts down by one.
	pub fn rotate_left(&mut self) {
		if let Some(first) = self.get(0) {
			self.push_back(first);
		}
	}

	/// Moves the last pixel to the front, everything else shifts up by one.
	pub fn rotate_right(&mut self) {
		if let Some(last) = self.get(self.len() - 1) {
			self.push_front(last);
		}
	}

	fn slot(&self, index: usize) -> Option<&[u8]> {
		let start = index.checked_mul(BYTES_PER_LED)?;
		self.bytes.get(start..start.checked_add(BYTES_PER_LED)?)
	}

	fn slot_mut(&mut self, index: usize) -> Option<&mut [u8]> {
		let start = index.checked_mul(BYTES_PER_LED)?;
		self.bytes.get_mut(start..start.checked_add(BYTES_PER_LED)?)
	}
}

fn decode(slot: &[u8]) -> Pixel {
	Pixel::from_bytes([slot[0], slot[1], slot[2], slot[3]])
}
