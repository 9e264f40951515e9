use crate::geometry::Orientation;

// D0..D15 on consecutive GPIO12..GPIO27 (physical pins 32, 33, 8, 10, ...).
pub const LCD_DATA_PINS: [u8; 16] = [
	12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27,
];
pub const LCD_WR_PIN: u8 = 3; // Write strobe, latched on the rising edge.
pub const LCD_RS_PIN: u8 = 4; // Register select, low = command, high = data.
pub const LCD_CS_PIN: u8 = 5; // Chip select, active low.
pub const LCD_RESET_PIN: u8 = 6; // Reset, active low.

pub const LCD_WIDTH: u32 = 800; // Native panel width in pixels.
pub const LCD_HEIGHT: u32 = 480; // Native panel height in pixels.

// Largest width or height the render surface accepts.
pub const MAX_PANEL_DIMENSION: u32 = 2048;

// ~61kHz. Anything above ~122kHz gives unreliable ADC readings.
pub const TOUCH_SPI_CLOCK_HZ: u32 = 61_000;

pub const DEFAULT_TOUCH_SENSITIVITY: u32 = 100; // Minimum Z1 pressure, ADC units.
pub const TOUCH_OVERSAMPLE: usize = 8; // Samples averaged per X/Y/Z reading.
pub const TOUCH_PRESSURE_PRECHECK: usize = 1; // Samples for the fast pressure check.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMap {
	pub data: [u8; 16],
	pub wr: u8,
	pub rs: u8,
	pub cs: u8,
	pub reset: u8,
}

impl Default for PinMap {
	#[inline]
	fn default() -> Self {
		Self {
			data: LCD_DATA_PINS,
			wr: LCD_WR_PIN,
			rs: LCD_RS_PIN,
			cs: LCD_CS_PIN,
			reset: LCD_RESET_PIN,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriverConfig {
	pub pins: PinMap,
	pub panel_width: u32,
	pub panel_height: u32,
	pub orientation: Orientation,
	pub rotate180: bool,

	/// When false no SPI device is required and touch polling always reports no touch.
	pub touch_enabled: bool,
	pub touch_spi_clock_hz: u32,
	pub touch_sensitivity: u32,
}

impl Default for DriverConfig {
	fn default() -> Self {
		Self {
			pins: PinMap::default(),
			panel_width: LCD_WIDTH,
			panel_height: LCD_HEIGHT,
			orientation: Orientation::Landscape,
			rotate180: false,

			touch_enabled: true,
			touch_spi_clock_hz: TOUCH_SPI_CLOCK_HZ,
			touch_sensitivity: DEFAULT_TOUCH_SENSITIVITY,
		}
	}
}

impl DriverConfig {
	#[inline]
	pub const fn with_orientation(mut self, orientation: Orientation, rotate180: bool) -> Self {
		self.orientation = orientation;
		self.rotate180 = rotate180;
		self
	}

	#[inline]
	pub const fn without_touch(mut self) -> Self {
		self.touch_enabled = false;
		self
	}
}
