use crate::calibration::CalibrationModel;
use crate::calibration::Corner;
use crate::config::DEFAULT_TOUCH_SENSITIVITY;
use crate::config::TOUCH_OVERSAMPLE;
use crate::config::TOUCH_PRESSURE_PRECHECK;
use crate::error::BusKind;
use crate::error::Error;
use embedded_hal::spi::Error as _;
use embedded_hal::spi::SpiDevice;
use log::error;
use log::trace;

const CMD_START: u8 = 0x80;
const CMD_12BIT: u8 = 0x00;
const CMD_DFR: u8 = 0x00;
const CMD_PWR: u8 = 0x03;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Channel {
	X = 0x5 << 4,
	Y = 0x1 << 4,
	Z1 = 0x3 << 4,
	Z2 = 0x4 << 4,
}

impl Channel {
	#[inline]
	pub const fn control_byte(self) -> u8 {
		CMD_START | CMD_12BIT | CMD_DFR | self as u8 | CMD_PWR
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawSample {
	pub x: u32,
	pub y: u32,
	pub z: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchEvent {
	NoTouch,
	Touched { x: u32, y: u32 },
}

impl TouchEvent {
	#[inline]
	pub const fn is_touched(&self) -> bool {
		matches!(self, Self::Touched { .. })
	}
}

pub struct Ads7843<S> {
	spi: S,
	sensitivity: u32,
	calibration: CalibrationModel,
}

impl<S: SpiDevice<u8>> Ads7843<S> {
	pub fn new(spi: S) -> Self {
		Self {
			spi,
			sensitivity: DEFAULT_TOUCH_SENSITIVITY,
			calibration: CalibrationModel::default(),
		}
	}

	#[inline]
	pub const fn sensitivity(&self) -> u32 {
		self.sensitivity
	}

	#[inline]
	pub fn set_sensitivity(&mut self, threshold: u32) {
		self.sensitivity = threshold;
	}

	#[inline]
	pub const fn calibration(&self) -> &CalibrationModel {
		&self.calibration
	}

	#[inline]
	pub fn set_calibration(&mut self, corner: Corner, raw: u32, screen: u32) {
		self.calibration.set(corner, raw, screen);
	}

	#[inline]
	pub fn set_calibration_model(&mut self, calibration: CalibrationModel) {
		self.calibration = calibration;
	}

	// 12-bit result, MSB first and three bits late in bytes 1..3.
	fn read_once(&mut self, control: u8) -> Result<u32, Error> {
		let write = [control, 0, 0];
		let mut read = [0u8; 3];
		self.spi.transfer(&mut read, &write).map_err(|e| {
			error!("#[ads7843, {:#04x}] transfer, err: {:?}", control, e.kind());
			Error::Bus(BusKind::Spi)
		})?;

		Ok((u16::from_be_bytes([read[1], read[2]]) >> 3) as u32)
	}

	/// Mean of `oversample` readings of `channel`, truncated. 0 reads once.
	pub fn sample_raw(&mut self, channel: Channel, oversample: usize) -> Result<u32, Error> {
		let count = oversample.max(1);
		let control = channel.control_byte();

		let mut sum = 0u64;
		for _ in 0..count {
			sum += self.read_once(control)? as u64;
		}

		Ok((sum / count as u64) as u32)
	}

	pub fn poll(&mut self) -> Result<TouchEvent, Error> {
		let pressure = self.sample_raw(Channel::Z1, TOUCH_PRESSURE_PRECHECK)?;
		if pressure <= self.sensitivity {
			return Ok(TouchEvent::NoTouch);
		}

		let raw_x = self.sample_raw(Channel::X, TOUCH_OVERSAMPLE)?;
		let raw_y = self.sample_raw(Channel::Y, TOUCH_OVERSAMPLE)?;
		let (x, y) = self.calibration.map(raw_x, raw_y);
		trace!(
			"#[ads7843] z: {}, raw: [{}, {}] => [{}, {}]",
			pressure, raw_x, raw_y, x, y
		);

		Ok(TouchEvent::Touched { x, y })
	}

	pub fn poll_raw(&mut self) -> Result<RawSample, Error> {
		let z = self.sample_raw(Channel::Z1, TOUCH_OVERSAMPLE)?;
		let x = self.sample_raw(Channel::X, TOUCH_OVERSAMPLE)?;
		let y = self.sample_raw(Channel::Y, TOUCH_OVERSAMPLE)?;

		Ok(RawSample { x, y, z })
	}
}
