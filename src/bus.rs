//! Parallel bus seen by the display controller.
//!
//! The controller latches one word per rising edge of WR: RS low marks a
//! command byte, RS high a parameter byte or pixel. Commands and parameters
//! use D0..D7, pixels the full D0..D15.

use embedded_hal::digital::OutputPin;
use embedded_hal::digital::PinState;
use log::trace;
use std::convert::Infallible;

pub trait ParallelBus {
	fn write_command(&mut self, command: u8);
	fn write_data(&mut self, data: u8);
	fn write_pixel(&mut self, rgb565: u16);

	fn repeat_pixel(&mut self, rgb565: u16, count: usize) {
		for _ in 0..count {
			self.write_pixel(rgb565);
		}
	}

	fn set_reset(&mut self, level: bool);
	fn set_chip_select(&mut self, level: bool);
}

impl<T: ParallelBus + ?Sized> ParallelBus for &mut T {
	#[inline]
	fn write_command(&mut self, command: u8) {
		T::write_command(self, command)
	}

	#[inline]
	fn write_data(&mut self, data: u8) {
		T::write_data(self, data)
	}

	#[inline]
	fn write_pixel(&mut self, rgb565: u16) {
		T::write_pixel(self, rgb565)
	}

	#[inline]
	fn repeat_pixel(&mut self, rgb565: u16, count: usize) {
		T::repeat_pixel(self, rgb565, count)
	}

	#[inline]
	fn set_reset(&mut self, level: bool) {
		T::set_reset(self, level)
	}

	#[inline]
	fn set_chip_select(&mut self, level: bool) {
		T::set_chip_select(self, level)
	}
}

#[inline]
fn drive<P: OutputPin<Error = Infallible>>(pin: &mut P, level: bool) {
	match pin.set_state(PinState::from(level)) {
		Ok(()) => {}
		Err(never) => match never {},
	}
}

pub struct GpioParallelBus<P> {
	data: Vec<P>,
	wr: P,
	rs: P,
	cs: P,
	reset: P,

	// Last level written to RS, so pixel streams only touch it once.
	rs_level: Option<bool>,
}

impl<P: OutputPin<Error = Infallible>> GpioParallelBus<P> {
	/// `data[i]` drives bit `i`; up to 16 lines are used.
	pub fn new(data: Vec<P>, wr: P, rs: P, cs: P, reset: P) -> Self {
		trace!("#[bus] {} data lines", data.len());
		let mut bus = Self {
			data,
			wr,
			rs,
			cs,
			reset,
			rs_level: None,
		};
		drive(&mut bus.wr, true);

		bus
	}

	#[inline]
	fn select_register(&mut self, level: bool) {
		if self.rs_level != Some(level) {
			drive(&mut self.rs, level);
			self.rs_level = Some(level);
		}
	}

	#[inline]
	fn put_word(&mut self, word: u16, lines: usize) {
		for (bit, pin) in self.data.iter_mut().take(lines).enumerate() {
			drive(pin, (word >> bit) & 1 != 0);
		}
	}

	#[inline]
	fn strobe(&mut self) {
		drive(&mut self.wr, false);
		drive(&mut self.wr, true);
	}
}

impl<P: OutputPin<Error = Infallible>> ParallelBus for GpioParallelBus<P> {
	fn write_command(&mut self, command: u8) {
		self.select_register(false);
		self.put_word(command as u16, 8);
		self.strobe();
	}

	fn write_data(&mut self, data: u8) {
		self.select_register(true);
		self.put_word(data as u16, 8);
		self.strobe();
	}

	fn write_pixel(&mut self, rgb565: u16) {
		self.select_register(true);
		self.put_word(rgb565, 16);
		self.strobe();
	}

	fn repeat_pixel(&mut self, rgb565: u16, count: usize) {
		if count == 0 {
			return;
		}
		// The data lines hold their level, only WR needs to move.
		self.select_register(true);
		self.put_word(rgb565, 16);
		for _ in 0..count {
			self.strobe();
		}
	}

	fn set_reset(&mut self, level: bool) {
		drive(&mut self.reset, level);
	}

	fn set_chip_select(&mut self, level: bool) {
		drive(&mut self.cs, level);
	}
}
