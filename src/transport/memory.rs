use std::io;

use super::Transport;

/// Backend without hardware, every shown frame is kept as the bytes that would have been sent.
#[derive(Debug, Default)]
pub struct MemoryTransport {
	frames:    Vec<Vec<u8>>,
	fail_next: Option<io::ErrorKind>,
}

impl MemoryTransport {
	pub fn new() -> Self {
		Self::default()
	}

	/// All frames written so far, oldest first.
	pub fn frames(&self) -> &[Vec<u8>] {
		&self.frames
	}

	pub fn last_frame(&self) -> Option<&[u8]> {
		self.frames.last().map(Vec::as_slice)
	}

	pub fn shows(&self) -> usize {
		self.frames.len()
	}

	/// Makes the next write fail with `kind` without recording the frame.
	pub fn fail_next(&mut self, kind: io::ErrorKind) {
		self.fail_next = Some(kind);
	}
}

impl Transport for MemoryTransport {
	/// The recorded frames.
	type Released = Vec<Vec<u8>>;

	fn write(&mut self, header: &[u8], pixels: &[u8], footer: &[u8]) -> io::Result<()> {
		if let Some(kind) = self.fail_next.take() {
			return Err(io::Error::new(kind, "simulated write failure"));
		}

		self.frames.push([header, pixels, footer].concat());

		Ok(())
	}

	fn teardown(self) -> io::Result<Self::Released> {
		Ok(self.frames)
	}
}
