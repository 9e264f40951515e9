use anyhow::Context;
use anyhow::bail;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Circle;
use embedded_graphics::primitives::PrimitiveStyle;
use enclose::enc;
use log::error;
use log::info;
use log::trace;
use std::env::var_os;
use std::ffi::OsString;
use std::io::stdin;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::thread::sleep;
use std::thread::spawn;
use std::time::Duration;
use tftdrive_rs::DriverConfig;
use tftdrive_rs::Orientation;
use tftdrive_rs::TouchEvent;
use tftdrive_rs::calibration;
use tftdrive_rs::calibration::AxisCalibration;
use tftdrive_rs::calibration::CalibrationModel;
use tftdrive_rs::canvas::Canvas;
use tftdrive_rs::rpi;
use tftdrive_rs::rpi::RpiTftgl;

const TARGET_DIAMETER: u32 = 15;
const BRUSH_DIAMETER: u32 = 7;
const BRUSH_REGION: u32 = 20;
const CALIBRATION_HOLDOFF: Duration = Duration::from_millis(500);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

fn is_set(name: &str) -> bool {
	matches!(var_os(name), Some(a) if a == "1" || a == "true" || a == "yes")
}

fn var_str(name: &str) -> Option<String> {
	var_os(name).map(OsString::into_string).and_then(Result::ok)
}

fn config_from_env() -> anyhow::Result<DriverConfig> {
	let orientation = match var_os("TFT_ORIENTATION") {
		Some(a) if a == "PORTRAIT" || a == "portrait" || a == "P" => Orientation::Portrait,
		Some(a) if a == "LANDSCAPE" || a == "landscape" || a == "L" => Orientation::Landscape,
		Some(a) => bail!("TFT_ORIENTATION={:?}, expected PORTRAIT or LANDSCAPE", a),
		None => Orientation::Landscape,
	};
	let mut config = DriverConfig::default().with_orientation(orientation, is_set("TFT_ROTATE180"));
	if is_set("TFT_NO_TOUCH") {
		config = config.without_touch();
	}
	if let Some(a) = var_str("TFT_SENSITIVITY") {
		config.touch_sensitivity = a
			.trim()
			.parse()
			.with_context(|| format!("TFT_SENSITIVITY={:?}", a))?;
	}

	info!(
		"orientation: {:?}, rotate180: {}, touch: {}, sensitivity: {}",
		config.orientation, config.rotate180, config.touch_enabled, config.touch_sensitivity
	);
	Ok(config)
}

/// `TFT_CALIBRATION=xmin,xmax,ymin,ymax`, raw readings at the inset targets.
fn calibration_from_env(width: u32, height: u32) -> anyhow::Result<Option<CalibrationModel>> {
	let Some(a) = var_str("TFT_CALIBRATION") else {
		return Ok(None);
	};
	let raw = a
		.split(',')
		.map(|v| v.trim().parse::<u32>())
		.collect::<Result<Vec<_>, _>>()
		.with_context(|| format!("TFT_CALIBRATION={:?}", a))?;
	let [x_min, x_max, y_min, y_max] = raw[..] else {
		bail!("TFT_CALIBRATION={:?}, expected xmin,xmax,ymin,ymax", a);
	};

	let [top_left, _, bottom_right, _] = calibration::targets(width, height);
	Ok(Some(CalibrationModel::new(
		AxisCalibration::new(x_min, top_left.0, x_max, bottom_right.0),
		AxisCalibration::new(y_min, top_left.1, y_max, bottom_right.1),
	)))
}

fn dot(canvas: &mut Canvas, (x, y): (u32, u32), diameter: u32, color: Rgb888) {
	let center = Point::new(x as i32, y as i32);
	let _ = Circle::with_center(center, diameter)
		.into_styled(PrimitiveStyle::with_fill(color))
		.draw(canvas);
}

fn wait_press(tft: &mut RpiTftgl, stop: &AtomicBool) -> anyhow::Result<Option<(u32, u32)>> {
	let threshold = tft.config().touch_sensitivity;
	while !stop.load(Ordering::Relaxed) {
		let raw = tft.poll_touch_raw().context("touch read")?;
		if raw.z > threshold {
			trace!("#[calibrate] raw: {:?}", raw);
			return Ok(Some((raw.x, raw.y)));
		}
		sleep(POLL_INTERVAL);
	}
	Ok(None)
}

fn calibrate(
	tft: &mut RpiTftgl,
	canvas: &mut Canvas,
	stop: &AtomicBool,
) -> anyhow::Result<Option<CalibrationModel>> {
	let targets = calibration::targets(tft.width(), tft.height());
	let mut raw = [(0, 0); 4];

	for (target, sample) in targets.iter().zip(raw.iter_mut()) {
		info!("#[calibrate] touch the target at {:?}", target);
		dot(canvas, *target, TARGET_DIAMETER, Rgb888::RED);
		tft.upload_full(canvas).context("draw target")?;

		let Some(pressed) = wait_press(tft, stop)? else {
			return Ok(None);
		};
		*sample = pressed;

		dot(canvas, *target, TARGET_DIAMETER, Rgb888::WHITE);
		tft.upload_full(canvas).context("clear target")?;
		sleep(CALIBRATION_HOLDOFF);
	}

	info!(
		"#[calibrate] raw: {:?}, for TFT_CALIBRATION={},{},{},{}",
		raw,
		(raw[0].0 + raw[3].0) / 2,
		(raw[1].0 + raw[2].0) / 2,
		(raw[0].1 + raw[1].1) / 2,
		(raw[2].1 + raw[3].1) / 2,
	);
	Ok(Some(CalibrationModel::from_corner_samples(&targets, &raw)))
}

fn run(tft: &mut RpiTftgl, stop: &AtomicBool) -> anyhow::Result<()> {
	tft.initialize().context("panel init")?;
	tft.set_backlight(255);

	let mut canvas = Canvas::new(tft.width(), tft.height());
	let _ = canvas.clear(Rgb888::WHITE);

	if !tft.config().touch_enabled {
		info!("touch disabled, showing the canvas until stopped");
		tft.upload_full(&mut canvas).context("upload")?;
		while !stop.load(Ordering::Relaxed) {
			sleep(Duration::from_millis(100));
		}
		return Ok(());
	}

	let model = match calibration_from_env(tft.width(), tft.height())? {
		Some(model) => Some(model),
		None => calibrate(tft, &mut canvas, stop)?,
	};
	let Some(model) = model else {
		return Ok(());
	};
	if !model.is_usable() {
		error!("calibration has equal corners: {:?}", model);
	}
	tft.set_calibration_model(model);

	info!("draw with a finger, press enter to quit");
	while !stop.load(Ordering::Relaxed) {
		match tft.poll_touch().context("touch read")? {
			TouchEvent::Touched { x, y } => {
				trace!("#[touch] [{}, {}]", x, y);
				dot(&mut canvas, (x, y), BRUSH_DIAMETER, Rgb888::BLUE);
				let half = BRUSH_REGION / 2;
				tft.upload_region(
					&mut canvas,
					x.saturating_sub(half),
					y.saturating_sub(half),
					BRUSH_REGION,
					BRUSH_REGION,
				)
				.context("upload")?;
			}
			TouchEvent::NoTouch => sleep(POLL_INTERVAL),
		}
	}

	Ok(())
}

fn main() -> anyhow::Result<()> {
	env_logger::try_init()?;
	info!("tftdrive_rs: ");

	let config = config_from_env()?;
	let mut tft = rpi::open(config).context("open panel hardware")?;

	let stop = Arc::new(AtomicBool::new(false));
	spawn(enc!((stop) move || {
		let mut line = String::new();
		if let Err(e) = stdin().read_line(&mut line) {
			error!("#[stdin] read, err: {:?}", e);
		}
		stop.store(true, Ordering::Relaxed);
	}));

	let result = run(&mut tft, &stop);
	if let Err(ref e) = result {
		error!("{:#}, last error: {}", e, tft.take_last_error_str());
	}
	tft.terminate();

	result
}
