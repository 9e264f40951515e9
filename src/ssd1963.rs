//! SSD1963 TFT controller on a 16-bit parallel bus.

use crate::bus::ParallelBus;
use crate::error::Error;
use crate::geometry::PanelGeometry;
use crate::geometry::Rect;
use crate::pixel::BYTES_PER_PIXEL;
use crate::pixel::pack_rgb565;
use crate::pixel::rgb565;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::RgbColor;
use embedded_hal::delay::DelayNs;
use log::debug;
use log::info;
use log::trace;

pub mod cmd {
	pub const SOFT_RESET: u8 = 0x01;
	pub const DISPLAY_ON: u8 = 0x29;
	pub const SET_COLUMN_ADDRESS: u8 = 0x2A;
	pub const SET_PAGE_ADDRESS: u8 = 0x2B;
	pub const WRITE_MEMORY_START: u8 = 0x2C;
	pub const SET_ADDRESS_MODE: u8 = 0x36;
	pub const SET_LCD_MODE: u8 = 0xB0;
	pub const SET_HORI_PERIOD: u8 = 0xB4;
	pub const SET_VERT_PERIOD: u8 = 0xB6;
	pub const SET_GPIO_CONF: u8 = 0xB8;
	pub const SET_GPIO_VALUE: u8 = 0xBA;
	pub const SET_PWM_CONF: u8 = 0xBE;
	pub const SET_DBC_CONF: u8 = 0xD0;
	pub const SET_PLL: u8 = 0xE0;
	pub const SET_PLL_MN: u8 = 0xE2;
	pub const SET_LSHIFT_FREQ: u8 = 0xE6;
	pub const SET_PIXEL_DATA_INTERFACE: u8 = 0xF0;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
	pub code: u8,
	pub params: &'static [u8],
	pub settle_ms: u32,
}

impl Command {
	#[inline]
	const fn new(code: u8, params: &'static [u8]) -> Self {
		Self {
			code,
			params,
			settle_ms: 0,
		}
	}

	#[inline]
	const fn settle(mut self, ms: u32) -> Self {
		self.settle_ms = ms;
		self
	}
}

pub const POWER_SETTLE_MS: u32 = 100;

pub const RESET_PULSE: [(bool, u32); 3] = [(true, 5), (false, 15), (true, 15)];

/// 10MHz crystal, PLL to 120MHz, then a soft reset.
pub const PLL_BRINGUP: [Command; 4] = [
	Command::new(cmd::SET_PLL_MN, &[0x23, 0x02, 0x04]),
	Command::new(cmd::SET_PLL, &[0x01]).settle(10),
	Command::new(cmd::SET_PLL, &[0x03]).settle(10),
	Command::new(cmd::SOFT_RESET, &[]).settle(100),
];

/// Pixel clock and sync timings of the 800x480 panel.
pub const PANEL_TIMING: [Command; 6] = [
	Command::new(cmd::SET_LSHIFT_FREQ, &[0x04, 0x93, 0xE0]),
	// HDP 799, VDP 479
	Command::new(cmd::SET_LCD_MODE, &[0x00, 0x00, 0x03, 0x1F, 0x01, 0xDF, 0x00]),
	// HT 928, HPS 46, HPW 48, LPS 15
	Command::new(
		cmd::SET_HORI_PERIOD,
		&[0x03, 0xA0, 0x00, 0x2E, 0x30, 0x00, 0x0F, 0x00],
	),
	// VT 525, VPS 16, VPW 16, FPS 8
	Command::new(cmd::SET_VERT_PERIOD, &[0x02, 0x0D, 0x00, 0x10, 0x10, 0x00, 0x08]),
	Command::new(cmd::SET_GPIO_VALUE, &[0x05]),
	Command::new(cmd::SET_GPIO_CONF, &[0x07, 0x01]),
];

/// Address mode byte for landscape, landscape 180, portrait, portrait 180.
pub static ADDRESS_MODE: [[u8; 1]; 4] = [[0x03], [0x00], [0x21], [0x22]];

pub const PIXEL_INTERFACE: Command = Command::new(cmd::SET_PIXEL_DATA_INTERFACE, &[0x03]).settle(10);

pub const DBC_CONF: Command = Command::new(cmd::SET_DBC_CONF, &[0x0D]);

#[inline]
fn address_mode(portrait: bool, rotate180: bool) -> &'static [u8] {
	&ADDRESS_MODE[((portrait as usize) << 1) | rotate180 as usize]
}

pub fn bring_up_script(geometry: &PanelGeometry) -> Vec<Command> {
	let mut script = Vec::with_capacity(PLL_BRINGUP.len() + PANEL_TIMING.len() + 2);
	script.extend_from_slice(&PLL_BRINGUP);
	script.extend_from_slice(&PANEL_TIMING);
	script.push(Command::new(
		cmd::SET_ADDRESS_MODE,
		address_mode(geometry.orientation().is_portrait(), geometry.rotate180()),
	));
	script.push(PIXEL_INTERFACE);

	script
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
	Uninitialized,
	Ready,
}

pub struct Ssd1963<B, D> {
	bus: B,
	delay: D,
	geometry: PanelGeometry,
	state: State,
}

impl<B: ParallelBus, D: DelayNs> Ssd1963<B, D> {
	pub const fn new(bus: B, delay: D, geometry: PanelGeometry) -> Self {
		Self {
			bus,
			delay,
			geometry,
			state: State::Uninitialized,
		}
	}

	#[inline]
	pub const fn geometry(&self) -> &PanelGeometry {
		&self.geometry
	}

	#[inline]
	pub const fn is_ready(&self) -> bool {
		matches!(self.state, State::Ready)
	}

	#[inline]
	pub const fn state(&self) -> State {
		self.state
	}

	pub fn initialize(&mut self) -> Result<(), Error> {
		self.geometry.validate()?;
		info!(
			"#[ssd1963, {}x{}] init, {:?}, rotate180: {}",
			self.geometry.width(),
			self.geometry.height(),
			self.geometry.orientation(),
			self.geometry.rotate180()
		);

		self.bus.set_chip_select(false);
		self.delay.delay_ms(POWER_SETTLE_MS);

		debug!("#[ssd1963] reset...");
		for (level, hold_ms) in RESET_PULSE {
			self.bus.set_reset(level);
			self.delay.delay_ms(hold_ms);
		}

		for command in bring_up_script(&self.geometry) {
			self.run(&command);
		}

		self.set_address_window(0, 0, self.geometry.width(), self.geometry.height());
		self.bus.write_command(cmd::DISPLAY_ON);

		self.write_pwm(0);
		self.run(&DBC_CONF);

		self.state = State::Ready;
		info!("#[ssd1963] ready");

		// Whatever was in panel memory before reset is not ours to show.
		self.fill_rect(0, 0, self.geometry.width(), self.geometry.height(), Rgb888::WHITE);

		Ok(())
	}

	pub fn terminate(&mut self) {
		if self.is_ready() {
			debug!("#[ssd1963] terminate");
		}
		self.state = State::Uninitialized;
	}

	fn run(&mut self, command: &Command) {
		trace!("#[ssd1963] cmd {:#04x} {:02x?}", command.code, command.params);
		self.bus.write_command(command.code);
		for param in command.params {
			self.bus.write_data(*param);
		}
		if command.settle_ms > 0 {
			self.delay.delay_ms(command.settle_ms);
		}
	}

	#[inline]
	fn write_u16(&mut self, value: u32) {
		self.bus.write_data((value >> 8) as u8);
		self.bus.write_data(value as u8);
	}

	/// Pixels written afterwards fill the window row by row. In portrait the
	/// coordinates are swapped to the controller's native axes first.
	pub fn set_address_window(&mut self, mut x: u32, mut y: u32, mut w: u32, mut h: u32) {
		if self.geometry.orientation().is_portrait() {
			std::mem::swap(&mut x, &mut y);
			std::mem::swap(&mut w, &mut h);
		}
		let x1 = x.saturating_add(w).saturating_sub(1);
		let y1 = y.saturating_add(h).saturating_sub(1);

		self.bus.write_command(cmd::SET_COLUMN_ADDRESS);
		self.write_u16(x);
		self.write_u16(x1);
		self.bus.write_command(cmd::SET_PAGE_ADDRESS);
		self.write_u16(y);
		self.write_u16(y1);
		self.bus.write_command(cmd::WRITE_MEMORY_START);
	}

	fn clip(&self, x: u32, y: u32, w: u32, h: u32) -> Option<Rect> {
		if !self.is_ready() {
			trace!("#[ssd1963] not initialized, skip");
			return None;
		}
		self.geometry.clip(x, y, w, h)
	}

	pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgb888) {
		let Some(rect) = self.clip(x, y, w, h) else {
			return;
		};
		let pixel = rgb565(color);

		self.set_address_window(rect.x, rect.y, rect.w, rect.h);
		self.bus.repeat_pixel(pixel, rect.area());
	}

	/// `pixels` row `v` starts at `v * stride` and rows are bottom-up: the
	/// last row in the buffer is the top row on screen, so rows are sent
	/// from `h - 1` down to `0`.
	pub fn blit(
		&mut self,
		x: u32,
		y: u32,
		w: u32,
		h: u32,
		pixels: &[u8],
		stride: usize,
	) -> Result<(), Error> {
		let Some(rect) = self.clip(x, y, w, h) else {
			return Ok(());
		};

		let row_bytes = rect.w as usize * BYTES_PER_PIXEL;
		let needed = (rect.h as usize - 1)
			.checked_mul(stride)
			.and_then(|n| n.checked_add(row_bytes));
		match needed {
			Some(needed) if pixels.len() >= needed => {}
			needed => {
				return Err(Error::ShortBuffer {
					needed: needed.unwrap_or(usize::MAX),
					got: pixels.len(),
				});
			}
		}

		self.set_address_window(rect.x, rect.y, rect.w, rect.h);
		for v in (0..rect.h as usize).rev() {
			let row = &pixels[v * stride..v * stride + row_bytes];
			for px in row.chunks_exact(BYTES_PER_PIXEL) {
				self.bus.write_pixel(pack_rgb565(px[0], px[1], px[2]));
			}
		}

		Ok(())
	}

	pub fn set_backlight(&mut self, level: u8) {
		debug!("#[ssd1963] backlight {}", level);
		self.write_pwm(level);
	}

	fn write_pwm(&mut self, level: u8) {
		self.bus.write_command(cmd::SET_PWM_CONF);
		for param in [0x06, level, 0x01, 0xF0, 0x00, 0x00] {
			self.bus.write_data(param);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::geometry::Orientation;
	use crate::mock::BusLog;
	use crate::mock::BusOp;
	use crate::mock::BusOp::Command as C;
	use crate::mock::BusOp::Data as D;
	use crate::mock::FakeBus;
	use crate::mock::FakeDelay;

	fn panel(orientation: Orientation) -> PanelGeometry {
		PanelGeometry::new(800, 480, orientation, false)
	}

	fn ready(log: &BusLog, orientation: Orientation) -> Ssd1963<FakeBus, FakeDelay> {
		let mut lcd = Ssd1963::new(log.bus(), log.delay(), panel(orientation));
		lcd.initialize().unwrap();
		log.take();
		lcd
	}

	fn window(x0: u16, y0: u16, x1: u16, y1: u16) -> Vec<BusOp> {
		let [x0h, x0l] = x0.to_be_bytes();
		let [x1h, x1l] = x1.to_be_bytes();
		let [y0h, y0l] = y0.to_be_bytes();
		let [y1h, y1l] = y1.to_be_bytes();
		vec![
			C(0x2A),
			D(x0h),
			D(x0l),
			D(x1h),
			D(x1l),
			C(0x2B),
			D(y0h),
			D(y0l),
			D(y1h),
			D(y1l),
			C(0x2C),
		]
	}

	#[test]
	fn initialize_sequence() {
		let log = BusLog::default();
		let mut lcd = Ssd1963::new(log.bus(), log.delay(), panel(Orientation::Landscape));
		lcd.initialize().unwrap();
		assert!(lcd.is_ready());

		let mut expected = vec![
			BusOp::Select(false),
			BusOp::DelayMs(100),
			BusOp::Reset(true),
			BusOp::DelayMs(5),
			BusOp::Reset(false),
			BusOp::DelayMs(15),
			BusOp::Reset(true),
			BusOp::DelayMs(15),
			C(0xE2),
			D(0x23),
			D(0x02),
			D(0x04),
			C(0xE0),
			D(0x01),
			BusOp::DelayMs(10),
			C(0xE0),
			D(0x03),
			BusOp::DelayMs(10),
			C(0x01),
			BusOp::DelayMs(100),
			C(0xE6),
			D(0x04),
			D(0x93),
			D(0xE0),
			C(0xB0),
			D(0x00),
			D(0x00),
			D(0x03),
			D(0x1F),
			D(0x01),
			D(0xDF),
			D(0x00),
			C(0xB4),
			D(0x03),
			D(0xA0),
			D(0x00),
			D(0x2E),
			D(0x30),
			D(0x00),
			D(0x0F),
			D(0x00),
			C(0xB6),
			D(0x02),
			D(0x0D),
			D(0x00),
			D(0x10),
			D(0x10),
			D(0x00),
			D(0x08),
			C(0xBA),
			D(0x05),
			C(0xB8),
			D(0x07),
			D(0x01),
			C(0x36),
			D(0x03),
			C(0xF0),
			D(0x03),
			BusOp::DelayMs(10),
		];
		expected.extend(window(0, 0, 799, 479));
		expected.extend([
			C(0x29),
			C(0xBE),
			D(0x06),
			D(0x00),
			D(0x01),
			D(0xF0),
			D(0x00),
			D(0x00),
			C(0xD0),
			D(0x0D),
		]);
		expected.extend(window(0, 0, 799, 479));
		expected.push(BusOp::Fill(0xFFFF, 800 * 480));

		assert_eq!(log.take(), expected);
	}

	#[test]
	fn address_mode_table() {
		let pick = |orientation, rotate180| {
			let script = bring_up_script(&PanelGeometry::new(800, 480, orientation, rotate180));
			script
				.iter()
				.find(|c| c.code == cmd::SET_ADDRESS_MODE)
				.map(|c| c.params)
		};
		assert_eq!(pick(Orientation::Landscape, false), Some(&[0x03][..]));
		assert_eq!(pick(Orientation::Landscape, true), Some(&[0x00][..]));
		assert_eq!(pick(Orientation::Portrait, false), Some(&[0x21][..]));
		assert_eq!(pick(Orientation::Portrait, true), Some(&[0x22][..]));
	}

	#[test]
	fn bad_geometry_writes_nothing() {
		let log = BusLog::default();
		let mut lcd = Ssd1963::new(
			log.bus(),
			log.delay(),
			PanelGeometry::new(800, 0, Orientation::Landscape, false),
		);
		assert!(matches!(lcd.initialize(), Err(Error::Geometry { .. })));
		assert!(!lcd.is_ready());
		assert!(log.is_empty());
	}

	#[test]
	fn portrait_window_matches_swapped_landscape() {
		let log = BusLog::default();
		let mut portrait = ready(&log, Orientation::Portrait);
		portrait.set_address_window(10, 20, 30, 40);
		let portrait_ops = log.take();

		let mut landscape = ready(&log, Orientation::Landscape);
		landscape.set_address_window(20, 10, 40, 30);
		let landscape_ops = log.take();

		assert_eq!(portrait_ops, landscape_ops);
		assert_eq!(portrait_ops, window(20, 10, 59, 39));
	}

	#[test]
	fn fill_clamps_to_panel() {
		let log = BusLog::default();
		let mut lcd = ready(&log, Orientation::Landscape);

		lcd.fill_rect(790, 0, 50, 10, Rgb888::RED);

		let mut expected = window(790, 0, 799, 9);
		expected.push(BusOp::Fill(0xF800, 100));
		assert_eq!(log.take(), expected);
	}

	#[test]
	fn fill_outside_is_noop() {
		let log = BusLog::default();
		let mut lcd = ready(&log, Orientation::Landscape);

		lcd.fill_rect(900, 0, 50, 10, Rgb888::RED);
		lcd.fill_rect(0, 0, 0, 10, Rgb888::RED);
		assert!(log.is_empty());
	}

	#[test]
	fn uninitialized_is_silent() {
		let log = BusLog::default();
		let mut lcd = Ssd1963::new(log.bus(), log.delay(), panel(Orientation::Landscape));

		lcd.fill_rect(0, 0, 10, 10, Rgb888::RED);
		assert_eq!(lcd.blit(0, 0, 1, 1, &[0, 0, 0], 3), Ok(()));
		assert!(log.is_empty());

		lcd.initialize().unwrap();
		lcd.terminate();
		log.take();
		lcd.fill_rect(0, 0, 10, 10, Rgb888::RED);
		assert!(log.is_empty());
	}

	#[test]
	fn blit_streams_bottom_row_first() {
		let log = BusLog::default();
		let mut lcd = ready(&log, Orientation::Landscape);

		// Two rows of two pixels, buffer row 0 is the bottom of the image.
		let pixels = [
			0xFF, 0x00, 0x00, 0x00, 0xFF, 0x00, // bottom: red, green
			0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, // top: blue, white
		];
		lcd.blit(4, 6, 2, 2, &pixels, 6).unwrap();

		let mut expected = window(4, 6, 5, 7);
		expected.extend([
			BusOp::Pixel(0x001F),
			BusOp::Pixel(0xFFFF),
			BusOp::Pixel(0xF800),
			BusOp::Pixel(0x07E0),
		]);
		assert_eq!(log.take(), expected);
	}

	#[test]
	fn blit_keeps_stride_when_clipped() {
		let log = BusLog::default();
		let mut lcd = ready(&log, Orientation::Landscape);

		// 3 px wide source at x = 798 clips to 2 px, rows stay 9 bytes apart.
		let mut pixels = vec![0u8; 9 * 2];
		pixels[9..12].copy_from_slice(&[0xFF, 0xFF, 0xFF]);
		lcd.blit(798, 0, 3, 2, &pixels, 9).unwrap();

		let ops = log.take();
		assert_eq!(ops.len(), 11 + 4);
		assert_eq!(ops[11], BusOp::Pixel(0xFFFF));
		assert_eq!(ops[12], BusOp::Pixel(0x0000));
	}

	#[test]
	fn blit_rejects_short_buffer() {
		let log = BusLog::default();
		let mut lcd = ready(&log, Orientation::Landscape);

		assert_eq!(
			lcd.blit(0, 0, 2, 2, &[0u8; 11], 6),
			Err(Error::ShortBuffer { needed: 12, got: 11 })
		);
		assert!(log.is_empty());
	}

	#[test]
	fn blit_rejects_overflowing_stride() {
		let log = BusLog::default();
		let mut lcd = ready(&log, Orientation::Landscape);

		assert_eq!(
			lcd.blit(0, 0, 2, 3, &[0u8; 64], usize::MAX),
			Err(Error::ShortBuffer {
				needed: usize::MAX,
				got: 64
			})
		);
		assert!(log.is_empty());
	}

	#[test]
	fn backlight_sequence() {
		let log = BusLog::default();
		let mut lcd = ready(&log, Orientation::Landscape);

		lcd.set_backlight(128);
		assert_eq!(
			log.take(),
			vec![
				C(0xBE),
				D(0x06),
				D(128),
				D(0x01),
				D(0xF0),
				D(0x00),
				D(0x00)
			]
		);
	}
}
