//! Per-board sensor configuration
//!
//! Boards differ in how the chips are strapped (I2C addresses) and in how the
//! magnetometer is mounted relative to the watch axes. A board support crate
//! describes its layout once, usually as a `const`:
//!
//! ```ignore
//! const ASTERIX: BoardConfig = BoardConfig::DEFAULT.with_mag_axes(MAG_AXES);
//! ```

use crate::interface::I2cInterface;
use crate::sensors::accel_gyro::LSM6DSO_I2C_ADDRESS;
use crate::sensors::barometer::BMP390_I2C_ADDRESS;
use crate::sensors::magnetometer::MMC5603NJ_I2C_ADDRESS;
use crate::sensors::{AxisConfig, MagConfig};

/// Static sensor layout of one board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardConfig {
    /// MMC5603NJ 7-bit address
    pub mag_address: u8,
    /// BMP390 7-bit address
    pub baro_address: u8,
    /// LSM6DSO 7-bit address
    pub accel_gyro_address: u8,
    /// Magnetometer driver configuration
    pub mag: MagConfig,
}

impl BoardConfig {
    /// Default strapping, identity axis mapping
    pub const DEFAULT: Self = Self {
        mag_address: MMC5603NJ_I2C_ADDRESS,
        baro_address: BMP390_I2C_ADDRESS,
        accel_gyro_address: LSM6DSO_I2C_ADDRESS,
        mag: MagConfig::new(AxisConfig::IDENTITY),
    };

    /// Replace the magnetometer axis mapping
    #[must_use]
    pub const fn with_mag_axes(mut self, axes: AxisConfig) -> Self {
        self.mag.axes = axes;
        self
    }

    /// Create the magnetometer interface at this board's address
    pub const fn mag_interface<I2C>(&self, i2c: I2C) -> I2cInterface<I2C> {
        I2cInterface::new(i2c, self.mag_address)
    }

    /// Create the barometer interface at this board's address
    pub const fn baro_interface<I2C>(&self, i2c: I2C) -> I2cInterface<I2C> {
        I2cInterface::new(i2c, self.baro_address)
    }

    /// Create the accelerometer/gyroscope interface at this board's address
    pub const fn accel_gyro_interface<I2C>(&self, i2c: I2C) -> I2cInterface<I2C> {
        I2cInterface::new(i2c, self.accel_gyro_address)
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
