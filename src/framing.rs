use spi_apa102_shared::{footer_len, FOOTER_BYTE, HEADER, HEADER_LEN};

/// Start and end frame surrounding the LED data, both fixed by the strip length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameFramer {
	header: [u8; HEADER_LEN],
	footer: Vec<u8>,
}

impl FrameFramer {
	pub fn new(num_leds: usize) -> Self {
		Self {
			header: HEADER,
			footer: vec![FOOTER_BYTE; footer_len(num_leds)],
		}
	}

	pub fn header(&self) -> &[u8] {
		&self.header
	}

	pub fn footer(&self) -> &[u8] {
		&self.footer
	}

	pub fn footer_len(&self) -> usize {
		self.footer.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_header_is_constant() {
		for num_leds in [1, 16, 17, 300] {
			assert_eq!(FrameFramer::new(num_leds).header(), &[0, 0, 0, 0]);
		}
	}

	#[test]
	fn test_footer_grows_with_strip() {
		let lens: Vec<_> = [1, 16, 17, 300]
			.into_iter()
			.map(|n| FrameFramer::new(n).footer_len())
			.collect();
		assert_eq!(lens, [1, 1, 2, 19]);

		assert!(FrameFramer::new(300).footer().iter().all(|&b| b == 0xFF));
	}
}
