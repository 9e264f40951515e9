use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusKind {
	Gpio,
	Spi,
}

impl fmt::Display for BusKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Gpio => "GPIO",
			Self::Spi => "SPI",
		})
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
	Width,
	Height,
}

impl fmt::Display for Dimension {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Width => "width",
			Self::Height => "height",
		})
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
	#[error("{0} not initialized, are you running as root?")]
	Bus(BusKind),

	#[error("panel has invalid {dimension}: {value}")]
	Geometry { dimension: Dimension, value: u32 },

	#[error("out of memory allocating {bytes} byte upload buffer")]
	OutOfMemory { bytes: usize },

	#[error("render surface is invalid: {0}")]
	Config(&'static str),

	#[error("pixel buffer holds {got} bytes, {needed} required")]
	ShortBuffer { needed: usize, got: usize },
}

impl Error {
	pub const fn code(&self) -> ErrorCode {
		match self {
			Self::Bus(BusKind::Gpio) => ErrorCode::Gpio,
			Self::Bus(BusKind::Spi) => ErrorCode::Spi,
			Self::Geometry {
				dimension: Dimension::Width,
				..
			} => ErrorCode::BadWidth,
			Self::Geometry {
				dimension: Dimension::Height,
				..
			} => ErrorCode::BadHeight,
			Self::OutOfMemory { .. } => ErrorCode::OutOfMemory,
			Self::Config(_) => ErrorCode::Config,
			Self::ShortBuffer { .. } => ErrorCode::ShortBuffer,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ErrorCode {
	#[default]
	NoError = 1,
	Gpio = 2,
	Spi = 3,
	Config = 6,
	BadWidth = 10,
	BadHeight = 11,
	OutOfMemory = 12,
	ShortBuffer = 13,
}

impl ErrorCode {
	#[inline]
	pub const fn is_error(&self) -> bool {
		!matches!(self, Self::NoError)
	}

	pub const fn as_str(&self) -> &'static str {
		match self {
			Self::NoError => "NO_ERROR",
			Self::Gpio => "GPIO_ERROR (GPIO not initialized! Are you running as root/sudo?)",
			Self::Spi => "SPI_ERROR (SPI not initialized! Are you running as root/sudo?)",
			Self::Config => "BAD_CONFIG (Render surface config is invalid!)",
			Self::BadWidth => "BAD_WIDTH (LCD has invalid width!)",
			Self::BadHeight => "BAD_HEIGHT (LCD has invalid height!)",
			Self::OutOfMemory => "OUT_OF_MEM (System is out of memory!)",
			Self::ShortBuffer => "SHORT_BUFFER (Pixel buffer is smaller than the area!)",
		}
	}
}
