//! Software render target.
//!
//! Drawn through `embedded-graphics` in screen coordinates (y down), stored
//! bottom-up the way a GPU framebuffer is, so it can stand in for one.

use crate::bridge::RenderTarget;
use crate::error::Error;
use crate::pixel::BYTES_PER_PIXEL;
use embedded_graphics::Pixel;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use std::convert::Infallible;

pub struct Canvas {
	width: u32,
	height: u32,
	// RGB888, row 0 is the bottom of the image.
	rows: Vec<u8>,
}

impl Canvas {
	pub fn new(width: u32, height: u32) -> Self {
		Self {
			width,
			height,
			rows: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
		}
	}

	#[inline]
	fn offset(&self, x: u32, y: u32) -> Option<usize> {
		if x >= self.width || y >= self.height {
			return None;
		}
		let row = (self.height - 1 - y) as usize;
		Some((row * self.width as usize + x as usize) * BYTES_PER_PIXEL)
	}

	pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb888) {
		if let Some(at) = self.offset(x, y) {
			self.rows[at..at + BYTES_PER_PIXEL].copy_from_slice(&[color.r(), color.g(), color.b()]);
		}
	}

	pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
		let at = self.offset(x, y)?;
		match self.rows.get(at..at + BYTES_PER_PIXEL)? {
			[r, g, b] => Some(Rgb888::new(*r, *g, *b)),
			_ => None,
		}
	}
}

impl OriginDimensions for Canvas {
	fn size(&self) -> Size {
		Size::new(self.width, self.height)
	}
}

impl DrawTarget for Canvas {
	type Color = Rgb888;
	type Error = Infallible;

	fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
	where
		I: IntoIterator<Item = Pixel<Self::Color>>,
	{
		for Pixel(point, color) in pixels {
			if let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) {
				self.set_pixel(x, y, color);
			}
		}
		Ok(())
	}

	fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
		for px in self.rows.chunks_exact_mut(BYTES_PER_PIXEL) {
			px.copy_from_slice(&[color.r(), color.g(), color.b()]);
		}
		Ok(())
	}
}

impl RenderTarget for Canvas {
	fn read_pixels_rgb(
		&mut self,
		x: u32,
		y: u32,
		w: u32,
		h: u32,
		out: &mut [u8],
	) -> Result<(), Error> {
		if x.saturating_add(w) > self.width || y.saturating_add(h) > self.height {
			return Err(Error::Config("readback outside canvas"));
		}
		let row_bytes = w as usize * BYTES_PER_PIXEL;
		let needed = row_bytes * h as usize;
		if out.len() < needed {
			return Err(Error::ShortBuffer {
				needed,
				got: out.len(),
			});
		}

		let stride = self.width as usize * BYTES_PER_PIXEL;
		for (v, dst) in out[..needed].chunks_exact_mut(row_bytes).enumerate() {
			let start = (y as usize + v) * stride + x as usize * BYTES_PER_PIXEL;
			dst.copy_from_slice(&self.rows[start..start + row_bytes]);
		}
		Ok(())
	}
}
