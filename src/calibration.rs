#[inline]
pub fn remap(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
	(value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
	MinX,
	MaxX,
	MinY,
	MaxY,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalibrationPoint {
	pub raw: f64,
	pub screen: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisCalibration {
	pub min: CalibrationPoint,
	pub max: CalibrationPoint,
}

impl AxisCalibration {
	pub fn new(raw_min: u32, screen_min: u32, raw_max: u32, screen_max: u32) -> Self {
		Self {
			min: CalibrationPoint {
				raw: raw_min as f64,
				screen: screen_min as f64,
			},
			max: CalibrationPoint {
				raw: raw_max as f64,
				screen: screen_max as f64,
			},
		}
	}

	/// False while both corners share the same raw value, the mapping divides by zero then.
	#[inline]
	pub fn is_usable(&self) -> bool {
		self.min.raw != self.max.raw
	}

	#[inline]
	pub fn weight(&self, raw: u32) -> f64 {
		remap(raw as f64, self.min.raw, self.max.raw, 0.0, 1.0)
	}

	/// Screen coordinate for `raw`; negative and NaN results become 0.
	#[inline]
	pub fn map(&self, raw: u32) -> u32 {
		remap(self.weight(raw), 0.0, 1.0, self.min.screen, self.max.screen) as u32
	}
}

/// The default is all zeros and maps everything to 0 until real corners are
/// set. Nothing checks that all four corners were supplied.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalibrationModel {
	pub x: AxisCalibration,
	pub y: AxisCalibration,
}

impl CalibrationModel {
	pub const fn new(x: AxisCalibration, y: AxisCalibration) -> Self {
		Self { x, y }
	}

	pub fn set(&mut self, corner: Corner, raw: u32, screen: u32) {
		let point = CalibrationPoint {
			raw: raw as f64,
			screen: screen as f64,
		};
		match corner {
			Corner::MinX => self.x.min = point,
			Corner::MaxX => self.x.max = point,
			Corner::MinY => self.y.min = point,
			Corner::MaxY => self.y.max = point,
		}
	}

	#[inline]
	pub fn is_usable(&self) -> bool {
		self.x.is_usable() && self.y.is_usable()
	}

	#[inline]
	pub fn map(&self, raw_x: u32, raw_y: u32) -> (u32, u32) {
		(self.x.map(raw_x), self.y.map(raw_y))
	}

	/// Builds a model from four raw readings taken at `targets()`.
	///
	/// Left targets give X min, right targets X max, top targets Y min and
	/// bottom targets Y max; each pair of readings is averaged.
	pub fn from_corner_samples(targets: &[(u32, u32); 4], raw: &[(u32, u32); 4]) -> Self {
		let [tl, tr, br, bl] = *raw;
		let mean = |a: u32, b: u32| ((a as u64 + b as u64) / 2) as u32;

		Self {
			x: AxisCalibration::new(mean(tl.0, bl.0), targets[0].0, mean(tr.0, br.0), targets[1].0),
			y: AxisCalibration::new(mean(tl.1, tr.1), targets[0].1, mean(br.1, bl.1), targets[3].1),
		}
	}
}

/// Four points 10% in from the edges: top-left, top-right, bottom-right, bottom-left.
pub const fn targets(width: u32, height: u32) -> [(u32, u32); 4] {
	let (dx, dy) = (width / 10, height / 10);
	[
		(dx, dy),
		(width - dx, dy),
		(width - dx, height - dy),
		(dx, height - dy),
	]
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::Rng;
	use rand::rng;

	#[test]
	fn midpoint_lands_mid_span() {
		let axis = AxisCalibration::new(100, 0, 900, 800);
		assert_eq!(axis.weight(500), 0.5);
		assert_eq!(axis.map(500), 400);
		assert_eq!(axis.map(100), 0);
		assert_eq!(axis.map(900), 800);
	}

	#[test]
	fn inverted_axis() {
		// Raw readings fall as the finger moves right.
		let axis = AxisCalibration::new(3617, 80, 430, 720);
		assert_eq!(axis.map(3617), 80);
		assert_eq!(axis.map(430), 720);
		assert!(axis.map(2000) > 80 && axis.map(2000) < 720);
	}

	#[test]
	fn out_of_span_saturates_at_zero() {
		let axis = AxisCalibration::new(100, 0, 900, 800);
		assert_eq!(axis.map(0), 0);
		assert_eq!(axis.map(1000), 900);
	}

	#[test]
	fn uncalibrated_maps_to_zero() {
		let model = CalibrationModel::default();
		assert!(!model.is_usable());
		assert_eq!(model.map(1234, 2345), (0, 0));
	}

	#[test]
	fn two_step_equals_one_step() {
		let mut rng = rng();
		for _ in 0..1000 {
			let raw_min = rng.random_range(0.0..2048.0);
			let raw_max = rng.random_range(2049.0..4096.0);
			let (raw_min, raw_max) = if rng.random_bool(0.5) {
				(raw_min, raw_max)
			} else {
				(raw_max, raw_min)
			};
			let screen_min = rng.random_range(0.0..400.0);
			let screen_max = rng.random_range(400.0..2048.0);
			let raw = rng.random_range(0.0..4096.0);

			let weight = remap(raw, raw_min, raw_max, 0.0, 1.0);
			let two_step = remap(weight, 0.0, 1.0, screen_min, screen_max);
			let one_step = remap(raw, raw_min, raw_max, screen_min, screen_max);
			assert!(
				(two_step - one_step).abs() < 1e-9,
				"{raw} in {raw_min}..{raw_max} -> {two_step} vs {one_step}"
			);
		}
	}

	#[test]
	fn set_corners() {
		let mut model = CalibrationModel::default();
		model.set(Corner::MinX, 100, 0);
		model.set(Corner::MaxX, 900, 800);
		model.set(Corner::MinY, 200, 0);
		model.set(Corner::MaxY, 600, 480);
		assert!(model.is_usable());
		assert_eq!(model.map(500, 400), (400, 240));
	}

	#[test]
	fn corner_samples_are_averaged() {
		let targets = targets(800, 480);
		assert_eq!(targets, [(80, 48), (720, 48), (720, 432), (80, 432)]);

		let raw = [(3600, 3540), (440, 3546), (420, 810), (3634, 814)];
		let model = CalibrationModel::from_corner_samples(&targets, &raw);
		assert_eq!(model.x, AxisCalibration::new(3617, 80, 430, 720));
		assert_eq!(model.y, AxisCalibration::new(3543, 48, 812, 432));
		assert_eq!(model.map(3617, 3543), (80, 48));
	}
}
