//! Sensor modules for the Asterix board
//!
//! This module provides types, constants, and configuration structures for
//! each sensor on the shared I2C bus:
//! - Magnetometer (3-axis, MMC5603NJ)
//! - Accelerometer/gyroscope (6-axis, LSM6DSO)
//! - Barometer (BMP390)
//!
//! Magnetometer operations are performed through methods on `Mmc5603njDriver`;
//! the other two chips are only touched by the boot prober.

pub mod accel_gyro;
pub mod barometer;
pub mod magnetometer;

// Re-export main types
pub use magnetometer::{AxisConfig, MagConfig, MagData, MagSample, MagSampleRate};
