#![no_std]

pub const HEADER_LEN: usize = 4;
pub const BYTES_PER_LED: usize = 4;

/// Start frame, 32 zero bits.
pub const HEADER: [u8; HEADER_LEN] = [0; HEADER_LEN];
pub const FOOTER_BYTE: u8 = 0xFF;

/// The global brightness field is 5 bits wide.
pub const MAX_BRIGHTNESS: u8 = 0x1F;
pub const BRIGHTNESS_MASK: u8 = 0x1F;
/// The strip only accepts a brightness byte with the top 3 bits set.
pub const BRIGHTNESS_HIGH_BITS: u8 = 0xE0;

/// Encodes a brightness value into the first byte of a LED frame, values above
/// [`MAX_BRIGHTNESS`] are clamped.
#[inline]
pub const fn encode_brightness(brightness: u8) -> u8 {
	let brightness = if brightness > MAX_BRIGHTNESS {
		MAX_BRIGHTNESS
	} else {
		brightness
	};

	brightness | BRIGHTNESS_HIGH_BITS
}

#[inline]
pub const fn decode_brightness(byte: u8) -> u8 {
	byte & BRIGHTNESS_MASK
}

/// Number of `0xFF` bytes in the end frame.
///
/// The datasheet asks for 32 bits, but every LED delays the clock by half a
/// cycle so longer strips need at least `num_leds / 2` extra clock edges.
#[inline]
pub const fn footer_len(num_leds: usize) -> usize {
	num_leds.div_ceil(16)
}

/// Total size of a frame on the wire: start frame, LED frames, end frame. `None` if it does not
/// fit in a `usize`.
#[inline]
pub const fn frame_len(num_leds: usize) -> Option<usize> {
	let Some(pixels) = num_leds.checked_mul(BYTES_PER_LED) else {
		return None;
	};
	let Some(framed) = pixels.checked_add(HEADER_LEN) else {
		return None;
	};
	framed.checked_add(footer_len(num_leds))
}

/// One LED: color plus its independent 5 bit brightness.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pixel {
	pub red:        u8,
	pub green:      u8,
	pub blue:       u8,
	pub brightness: u8,
}

impl Pixel {
	/// Black at full brightness, what a cleared strip holds.
	pub const OFF: Pixel = Pixel {
		red:        0,
		green:      0,
		blue:       0,
		brightness: MAX_BRIGHTNESS,
	};

	pub const fn new(red: u8, green: u8, blue: u8, brightness: u8) -> Self {
		Self {
			red,
			green,
			blue,
			brightness: decode_brightness(encode_brightness(brightness)),
		}
	}

	/// LED frame as sent on the wire: brightness, blue, green, red.
	#[inline]
	pub const fn to_bytes(self) -> [u8; BYTES_PER_LED] {
		[encode_brightness(self.brightness), self.blue, self.green, self.red]
	}

	#[inline]
	pub const fn from_bytes(bytes: [u8; BYTES_PER_LED]) -> Self {
		Self {
			red:        bytes[3],
			green:      bytes[2],
			blue:       bytes[1],
			brightness: decode_brightness(bytes[0]),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_brightness_clamps_and_sets_high_bits() {
		for brightness in 0..=MAX_BRIGHTNESS {
			let byte = encode_brightness(brightness);
			assert_eq!(byte & BRIGHTNESS_HIGH_BITS, BRIGHTNESS_HIGH_BITS);
			assert_eq!(decode_brightness(byte), brightness);
		}

		assert_eq!(encode_brightness(32), 0xFF);
		assert_eq!(encode_brightness(u8::MAX), 0xFF);
	}

	#[test]
	fn test_footer_len() {
		assert_eq!(footer_len(1), 1);
		assert_eq!(footer_len(16), 1);
		assert_eq!(footer_len(17), 2);
		assert_eq!(footer_len(300), 19);
		assert_eq!(footer_len(usize::MAX), usize::MAX / 16 + 1);
	}

	#[test]
	fn test_frame_len() {
		assert_eq!(frame_len(3), Some(4 + 12 + 1));
		assert_eq!(frame_len(300), Some(4 + 1200 + 19));
	}

	#[test]
	fn test_frame_len_overflow() {
		assert_eq!(frame_len(usize::MAX), None);
		assert_eq!(frame_len(usize::MAX / 4), None);
	}

	#[test]
	fn test_pixel_byte_order() {
		let pixel = Pixel::new(10, 20, 30, 7);
		assert_eq!(pixel.to_bytes(), [0xE7, 30, 20, 10]);
		assert_eq!(Pixel::from_bytes([0xE7, 30, 20, 10]), pixel);
	}

	#[test]
	fn test_off_pixel() {
		assert_eq!(Pixel::OFF.to_bytes(), [0xFF, 0, 0, 0]);
	}

	#[test]
	fn test_new_clamps_brightness() {
		assert_eq!(Pixel::new(1, 2, 3, 200).brightness, MAX_BRIGHTNESS);
	}
}
