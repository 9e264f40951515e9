//! User-space driver for SSD1963 TFT panels on a 16-bit GPIO parallel bus,
//! with ADS7843 resistive touch on SPI and render-target upload.

pub mod ads7843;
pub mod bridge;
pub mod bus;
pub mod calibration;
pub mod canvas;
pub mod config;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod pixel;
pub mod rpi;
pub mod ssd1963;

#[cfg(test)]
mod mock;

pub use ads7843::TouchEvent;
pub use bridge::RenderTarget;
pub use config::DriverConfig;
pub use driver::Tftgl;
pub use error::Error;
pub use error::ErrorCode;
pub use geometry::Orientation;
