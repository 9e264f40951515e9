//! Raspberry Pi backend: GPIO parallel bus and SPI touch through rppal.

use crate::bus::GpioParallelBus;
use crate::config::DriverConfig;
use crate::driver::Tftgl;
use crate::error::BusKind;
use crate::error::Error;
use log::error;
use log::info;
use rppal::gpio::Gpio;
use rppal::gpio::OutputPin;
use rppal::hal::Delay;
use rppal::spi::Bus;
use rppal::spi::Mode;
use rppal::spi::SimpleHalSpiDevice;
use rppal::spi::SlaveSelect;
use rppal::spi::Spi;

pub type RpiBus = GpioParallelBus<OutputPin>;
pub type RpiTftgl = Tftgl<RpiBus, Delay, SimpleHalSpiDevice>;

fn output(gpio: &Gpio, pin: u8) -> Result<OutputPin, Error> {
	gpio.get(pin).map(|p| p.into_output()).map_err(|e| {
		error!("#[pin, {:?}] init, output, err: {}", pin, e);
		Error::Bus(BusKind::Gpio)
	})
}

pub fn open_bus(config: &DriverConfig) -> Result<RpiBus, Error> {
	let gpio = Gpio::new().map_err(|e| {
		error!("#[gpio] init, err: {}", e);
		Error::Bus(BusKind::Gpio)
	})?;

	let pins = &config.pins;
	info!("#[gpio] init bus, data: {:?}", pins.data);
	let data = pins
		.data
		.iter()
		.map(|pin| output(&gpio, *pin))
		.collect::<Result<Vec<_>, _>>()?;

	Ok(GpioParallelBus::new(
		data,
		output(&gpio, pins.wr)?,
		output(&gpio, pins.rs)?,
		output(&gpio, pins.cs)?,
		output(&gpio, pins.reset)?,
	))
}

/// SPI0/CE0 in mode 0. `None` on failure, `Tftgl::initialize` reports it.
pub fn open_touch(config: &DriverConfig) -> Option<SimpleHalSpiDevice> {
	let clock = config.touch_spi_clock_hz;
	match Spi::new(Bus::Spi0, SlaveSelect::Ss0, clock, Mode::Mode0) {
		Ok(spi) => {
			info!("#[spi0, {}hz] touch ready", clock);
			Some(SimpleHalSpiDevice::new(spi))
		}
		Err(e) => {
			error!("#[spi0, {}hz] init, err: {}", clock, e);
			None
		}
	}
}

pub fn open(config: DriverConfig) -> Result<RpiTftgl, Error> {
	let bus = open_bus(&config)?;
	let spi = match config.touch_enabled {
		true => open_touch(&config),
		false => None,
	};

	Ok(Tftgl::new(config, bus, Delay::new(), spi))
}
