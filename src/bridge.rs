//! Render target to panel upload.
//!
//! Render targets keep row 0 at the bottom of the image, the panel scans
//! from the top. Two steps undo that together and only make sense as a
//! pair: the readback asks for the rows at `height - y - h`, and
//! `Ssd1963::blit` then streams the buffer's last row first. Net effect:
//! render target row `height - 1` lands on panel row 0.

use crate::bus::ParallelBus;
use crate::error::Error;
use crate::pixel::BYTES_PER_PIXEL;
use crate::ssd1963::Ssd1963;
use embedded_hal::delay::DelayNs;
use log::debug;
use log::error;
use log::trace;

pub trait RenderTarget {
	/// Copies the `w`x`h` region at `(x, y)` into `out` as packed RGB888,
	/// rows bottom-up with `y` counted from the bottom edge.
	fn read_pixels_rgb(
		&mut self,
		x: u32,
		y: u32,
		w: u32,
		h: u32,
		out: &mut [u8],
	) -> Result<(), Error>;
}

impl<T: RenderTarget + ?Sized> RenderTarget for &mut T {
	#[inline]
	fn read_pixels_rgb(
		&mut self,
		x: u32,
		y: u32,
		w: u32,
		h: u32,
		out: &mut [u8],
	) -> Result<(), Error> {
		T::read_pixels_rgb(self, x, y, w, h, out)
	}
}

#[derive(Default)]
pub struct FrameBridge {
	area: Vec<u8>,
}

impl FrameBridge {
	pub const fn new() -> Self {
		Self { area: Vec::new() }
	}

	#[inline]
	pub fn is_allocated(&self) -> bool {
		!self.area.is_empty()
	}

	pub fn release(&mut self) {
		if self.is_allocated() {
			debug!("#[bridge] release {} bytes", self.area.len());
		}
		self.area = Vec::new();
	}

	fn area_buffer(&mut self, width: u32, height: u32) -> Result<&mut [u8], Error> {
		if self.area.is_empty() {
			let bytes = width as usize * height as usize * BYTES_PER_PIXEL;
			let mut area = Vec::new();
			area.try_reserve_exact(bytes).map_err(|e| {
				error!("#[bridge] alloc {} bytes, err: {}", bytes, e);
				Error::OutOfMemory { bytes }
			})?;
			area.resize(bytes, 0);
			debug!("#[bridge] allocated {} bytes", bytes);
			self.area = area;
		}
		Ok(&mut self.area)
	}

	pub fn upload_full<B, D, R>(
		&mut self,
		display: &mut Ssd1963<B, D>,
		target: &mut R,
	) -> Result<(), Error>
	where
		B: ParallelBus,
		D: DelayNs,
		R: RenderTarget + ?Sized,
	{
		let (width, height) = (display.geometry().width(), display.geometry().height());
		self.upload_region(display, target, 0, 0, width, height)
	}

	pub fn upload_region<B, D, R>(
		&mut self,
		display: &mut Ssd1963<B, D>,
		target: &mut R,
		x: u32,
		y: u32,
		w: u32,
		h: u32,
	) -> Result<(), Error>
	where
		B: ParallelBus,
		D: DelayNs,
		R: RenderTarget + ?Sized,
	{
		let geometry = *display.geometry();
		let Some(rect) = geometry.clip(x, y, w, h) else {
			return Ok(());
		};
		if !display.is_ready() {
			trace!("#[bridge] display not initialized, skip");
			return Ok(());
		}

		let area = self.area_buffer(geometry.width(), geometry.height())?;
		let len = rect.area() * BYTES_PER_PIXEL;
		let area = &mut area[..len];

		let source_y = geometry.height() - rect.y - rect.h;
		trace!(
			"#[bridge] upload [{}, {}, {}, {}] from y {}",
			rect.x, rect.y, rect.w, rect.h, source_y
		);
		target.read_pixels_rgb(rect.x, source_y, rect.w, rect.h, area)?;

		display.blit(
			rect.x,
			rect.y,
			rect.w,
			rect.h,
			area,
			rect.w as usize * BYTES_PER_PIXEL,
		)
	}
}
