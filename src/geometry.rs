use crate::config::MAX_PANEL_DIMENSION;
use crate::error::Dimension;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
	#[default]
	Landscape,
	Portrait,
}

impl Orientation {
	#[inline]
	pub const fn is_portrait(&self) -> bool {
		matches!(self, Self::Portrait)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelGeometry {
	width: u32,
	height: u32,
	orientation: Orientation,
	rotate180: bool,
}

impl PanelGeometry {
	/// `native_width`/`native_height` describe the panel in landscape; portrait swaps them.
	pub const fn new(
		native_width: u32,
		native_height: u32,
		orientation: Orientation,
		rotate180: bool,
	) -> Self {
		let (width, height) = match orientation {
			Orientation::Landscape => (native_width, native_height),
			Orientation::Portrait => (native_height, native_width),
		};

		Self {
			width,
			height,
			orientation,
			rotate180,
		}
	}

	#[inline]
	pub const fn width(&self) -> u32 {
		self.width
	}

	#[inline]
	pub const fn height(&self) -> u32 {
		self.height
	}

	#[inline]
	pub const fn orientation(&self) -> Orientation {
		self.orientation
	}

	#[inline]
	pub const fn rotate180(&self) -> bool {
		self.rotate180
	}

	/// Both dimensions must lie in `(0, MAX_PANEL_DIMENSION]`, width is checked first.
	pub const fn validate(&self) -> Result<(), Error> {
		if self.width == 0 || self.width > MAX_PANEL_DIMENSION {
			return Err(Error::Geometry {
				dimension: Dimension::Width,
				value: self.width,
			});
		}
		if self.height == 0 || self.height > MAX_PANEL_DIMENSION {
			return Err(Error::Geometry {
				dimension: Dimension::Height,
				value: self.height,
			});
		}

		Ok(())
	}

	/// Returns `None` when nothing is left to draw: the origin is off-panel or
	/// the rectangle is empty. Otherwise width and height are clamped so the
	/// rectangle ends at the panel edge at most.
	pub const fn clip(&self, x: u32, y: u32, mut w: u32, mut h: u32) -> Option<Rect> {
		if x >= self.width || y >= self.height {
			return None;
		}
		if w == 0 || h == 0 {
			return None;
		}

		if x.saturating_add(w) >= self.width {
			w = self.width - x;
		}
		if y.saturating_add(h) >= self.height {
			h = self.height - y;
		}

		Some(Rect { x, y, w, h })
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
	pub x: u32,
	pub y: u32,
	pub w: u32,
	pub h: u32,
}

impl Rect {
	#[inline]
	pub const fn area(&self) -> usize {
		self.w as usize * self.h as usize
	}
}
