use crate::ads7843::Ads7843;
use crate::ads7843::RawSample;
use crate::ads7843::TouchEvent;
use crate::bridge::FrameBridge;
use crate::bridge::RenderTarget;
use crate::bus::ParallelBus;
use crate::calibration::CalibrationModel;
use crate::calibration::Corner;
use crate::config::DriverConfig;
use crate::error::BusKind;
use crate::error::Error;
use crate::error::ErrorCode;
use crate::geometry::PanelGeometry;
use crate::ssd1963::Ssd1963;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;
use log::error;
use log::info;

/// Panel, touch and upload path behind one handle.
///
/// Failing calls both return their error and park it in a single slot that
/// `take_last_error` reads and clears; the next failure overwrites it.
pub struct Tftgl<B, D, S> {
	config: DriverConfig,
	display: Ssd1963<B, D>,
	touch: Option<Ads7843<S>>,
	bridge: FrameBridge,
	last_error: Option<Error>,
}

impl<B, D, S> Tftgl<B, D, S>
where
	B: ParallelBus,
	D: DelayNs,
	S: SpiDevice<u8>,
{
	pub fn new(config: DriverConfig, bus: B, delay: D, spi: Option<S>) -> Self {
		let geometry = PanelGeometry::new(
			config.panel_width,
			config.panel_height,
			config.orientation,
			config.rotate180,
		);
		let touch = spi.map(|spi| {
			let mut touch = Ads7843::new(spi);
			touch.set_sensitivity(config.touch_sensitivity);
			touch
		});

		Self {
			config,
			display: Ssd1963::new(bus, delay, geometry),
			touch,
			bridge: FrameBridge::new(),
			last_error: None,
		}
	}

	#[inline]
	pub const fn config(&self) -> &DriverConfig {
		&self.config
	}

	#[inline]
	pub const fn display(&self) -> &Ssd1963<B, D> {
		&self.display
	}

	#[inline]
	pub const fn is_ready(&self) -> bool {
		self.display.is_ready()
	}

	fn record<T>(&mut self, result: Result<T, Error>) -> Result<T, Error> {
		if let Err(e) = &result {
			error!("#[tftgl] {}", e);
			self.last_error = Some(*e);
		}
		result
	}

	pub fn initialize(&mut self) -> Result<(), Error> {
		let result = if self.config.touch_enabled && self.touch.is_none() {
			Err(Error::Bus(BusKind::Spi))
		} else {
			self.display.initialize()
		};
		let result = self.record(result);
		if result.is_ok() {
			info!(
				"#[tftgl] ready, {}x{}, touch: {}",
				self.width(),
				self.height(),
				self.touch_active()
			);
		}
		result
	}

	pub fn terminate(&mut self) {
		self.display.terminate();
		self.bridge.release();
	}

	#[inline]
	pub const fn width(&self) -> u32 {
		self.display.geometry().width()
	}

	#[inline]
	pub const fn height(&self) -> u32 {
		self.display.geometry().height()
	}

	pub fn set_backlight(&mut self, level: u8) {
		if self.display.is_ready() {
			self.display.set_backlight(level);
		}
	}

	pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgb888) {
		self.display.fill_rect(x, y, w, h, color);
	}

	pub fn upload_full<R: RenderTarget + ?Sized>(&mut self, target: &mut R) -> Result<(), Error> {
		let result = self.bridge.upload_full(&mut self.display, target);
		self.record(result)
	}

	pub fn upload_region<R: RenderTarget + ?Sized>(
		&mut self,
		target: &mut R,
		x: u32,
		y: u32,
		w: u32,
		h: u32,
	) -> Result<(), Error> {
		let result = self
			.bridge
			.upload_region(&mut self.display, target, x, y, w, h);
		self.record(result)
	}

	#[inline]
	fn touch_active(&self) -> bool {
		self.config.touch_enabled && self.touch.is_some()
	}

	fn touch_mut(&mut self) -> Option<&mut Ads7843<S>> {
		match self.config.touch_enabled {
			true => self.touch.as_mut(),
			false => None,
		}
	}

	pub fn poll_touch(&mut self) -> Result<TouchEvent, Error> {
		let result = match self.touch_mut() {
			Some(touch) => touch.poll(),
			None => Ok(TouchEvent::NoTouch),
		};
		self.record(result)
	}

	pub fn poll_touch_raw(&mut self) -> Result<RawSample, Error> {
		let result = match self.touch_mut() {
			Some(touch) => touch.poll_raw(),
			None => Err(Error::Bus(BusKind::Spi)),
		};
		self.record(result)
	}

	pub fn set_sensitivity(&mut self, threshold: u32) {
		self.config.touch_sensitivity = threshold;
		if let Some(touch) = self.touch.as_mut() {
			touch.set_sensitivity(threshold);
		}
	}

	pub fn set_calibration(&mut self, corner: Corner, raw: u32, screen: u32) {
		if let Some(touch) = self.touch.as_mut() {
			touch.set_calibration(corner, raw, screen);
		}
	}

	pub fn set_calibration_model(&mut self, calibration: CalibrationModel) {
		if let Some(touch) = self.touch.as_mut() {
			touch.set_calibration_model(calibration);
		}
	}

	pub fn calibration(&self) -> Option<&CalibrationModel> {
		self.touch.as_ref().map(Ads7843::calibration)
	}

	#[inline]
	pub const fn last_error_peek(&self) -> Option<Error> {
		self.last_error
	}

	pub fn take_last_error(&mut self) -> ErrorCode {
		self.last_error
			.take()
			.map_or(ErrorCode::NoError, |e| e.code())
	}

	pub fn take_last_error_str(&mut self) -> &'static str {
		self.take_last_error().as_str()
	}
}
