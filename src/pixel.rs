use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::RgbColor;

pub const BYTES_PER_PIXEL: usize = 3;

#[inline]
pub const fn pack_rgb565(r: u8, g: u8, b: u8) -> u16 {
	((r as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (b as u16 >> 3)
}

#[inline]
pub fn rgb565(color: Rgb888) -> u16 {
	pack_rgb565(color.r(), color.g(), color.b())
}
