//! Recording fakes for the hardware seams, test builds only.

use crate::bus::ParallelBus;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital;
use embedded_hal::spi;
use embedded_hal::spi::ErrorKind;
use embedded_hal::spi::Operation;
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

#[derive(Clone, Default)]
pub struct PinLog(Rc<RefCell<Vec<(u8, bool)>>>);

impl PinLog {
	pub fn pin(&self, id: u8) -> FakePin {
		FakePin {
			id,
			log: self.clone(),
		}
	}

	pub fn take(&self) -> Vec<(u8, bool)> {
		std::mem::take(&mut *self.0.borrow_mut())
	}

	pub fn clear(&self) {
		self.0.borrow_mut().clear();
	}
}

pub struct FakePin {
	id: u8,
	log: PinLog,
}

impl digital::ErrorType for FakePin {
	type Error = Infallible;
}

impl digital::OutputPin for FakePin {
	fn set_low(&mut self) -> Result<(), Self::Error> {
		self.log.0.borrow_mut().push((self.id, false));
		Ok(())
	}

	fn set_high(&mut self) -> Result<(), Self::Error> {
		self.log.0.borrow_mut().push((self.id, true));
		Ok(())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusOp {
	Command(u8),
	Data(u8),
	Pixel(u16),
	Fill(u16, usize),
	Reset(bool),
	Select(bool),
	DelayMs(u32),
}

#[derive(Clone, Default)]
pub struct BusLog(Rc<RefCell<Vec<BusOp>>>);

impl BusLog {
	pub fn bus(&self) -> FakeBus {
		FakeBus(self.clone())
	}

	pub fn delay(&self) -> FakeDelay {
		FakeDelay(self.clone())
	}

	#[inline]
	fn push(&self, op: BusOp) {
		self.0.borrow_mut().push(op);
	}

	pub fn take(&self) -> Vec<BusOp> {
		std::mem::take(&mut *self.0.borrow_mut())
	}

	pub fn is_empty(&self) -> bool {
		self.0.borrow().is_empty()
	}

	/// Number of pixels written, counting each fill by its repeat count.
	pub fn pixel_count(&self) -> usize {
		self.0
			.borrow()
			.iter()
			.map(|op| match op {
				BusOp::Pixel(_) => 1,
				BusOp::Fill(_, n) => *n,
				_ => 0,
			})
			.sum()
	}
}

pub struct FakeBus(BusLog);

impl ParallelBus for FakeBus {
	fn write_command(&mut self, command: u8) {
		self.0.push(BusOp::Command(command));
	}

	fn write_data(&mut self, data: u8) {
		self.0.push(BusOp::Data(data));
	}

	fn write_pixel(&mut self, rgb565: u16) {
		self.0.push(BusOp::Pixel(rgb565));
	}

	fn repeat_pixel(&mut self, rgb565: u16, count: usize) {
		self.0.push(BusOp::Fill(rgb565, count));
	}

	fn set_reset(&mut self, level: bool) {
		self.0.push(BusOp::Reset(level));
	}

	fn set_chip_select(&mut self, level: bool) {
		self.0.push(BusOp::Select(level));
	}
}

pub struct FakeDelay(BusLog);

impl DelayNs for FakeDelay {
	fn delay_ns(&mut self, _ns: u32) {}

	fn delay_ms(&mut self, ms: u32) {
		self.0.push(BusOp::DelayMs(ms));
	}
}

/// Readings for a control byte are consumed in order and the last one repeats.
#[derive(Clone, Default)]
pub struct FakeAdc {
	readings: Rc<RefCell<HashMap<u8, (Vec<u16>, usize)>>>,
	sent: Rc<RefCell<Vec<u8>>>,
	broken: Rc<RefCell<bool>>,
}

impl FakeAdc {
	pub fn answer(&self, control: u8, readings: &[u16]) {
		self.readings
			.borrow_mut()
			.insert(control, (readings.to_vec(), 0));
	}

	pub fn break_bus(&self) {
		*self.broken.borrow_mut() = true;
	}

	pub fn take_sent(&self) -> Vec<u8> {
		std::mem::take(&mut *self.sent.borrow_mut())
	}

	fn reading(&self, control: u8) -> u16 {
		let mut readings = self.readings.borrow_mut();
		match readings.get_mut(&control) {
			Some((values, next)) => {
				let value = values
					.get(*next)
					.or(values.last())
					.copied()
					.unwrap_or_default();
				*next += 1;
				value
			}
			None => 0,
		}
	}
}

impl spi::ErrorType for FakeAdc {
	type Error = ErrorKind;
}

impl spi::SpiDevice<u8> for FakeAdc {
	fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
		if *self.broken.borrow() {
			return Err(ErrorKind::Other);
		}
		for op in operations.iter_mut() {
			if let Operation::Transfer(read, write) = op {
				let control = write.first().copied().unwrap_or_default();
				self.sent.borrow_mut().push(control);

				// The conversion is clocked out MSB first, 3 bits late.
				let shifted = self.reading(control) << 3;
				read.fill(0);
				if let Some(hi) = read.get_mut(1) {
					*hi = (shifted >> 8) as u8;
				}
				if let Some(lo) = read.get_mut(2) {
					*lo = shifted as u8;
				}
			}
		}
		Ok(())
	}
}
