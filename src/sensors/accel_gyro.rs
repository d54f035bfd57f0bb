//! Accelerometer/gyroscope register constants
//!
//! The LSM6DSO is only probed and parked at boot.

/// LSM6DSO I2C address when SA0 is low
pub const LSM6DSO_I2C_ADDRESS: u8 = 0x6A;

/// LSM6DSO I2C address when SA0 is high
pub const LSM6DSO_I2C_ADDRESS_ALT: u8 = 0x6B;

/// LSM6DSO `FUNC_CFG_ACCESS` register address (embedded function bank select)
pub const LSM6DSO_REG_FUNC_CFG_ACCESS: u8 = 0x01;

/// LSM6DSO `WHO_AM_I` register address
pub const LSM6DSO_REG_WHO_AM_I: u8 = 0x0F;

/// Expected `WHO_AM_I` value for LSM6DSO
pub const LSM6DSO_WHO_AM_I_VALUE: u8 = 0x6C;

/// LSM6DSO accelerometer control register (ODR and full scale)
pub const LSM6DSO_REG_CTRL1_XL: u8 = 0x10;

/// LSM6DSO gyroscope control register (ODR and full scale)
pub const LSM6DSO_REG_CTRL2_G: u8 = 0x11;

/// LSM6DSO control register 4
pub const LSM6DSO_REG_CTRL4_C: u8 = 0x13;

/// `CTRL4_C` gyroscope sleep bit
pub const LSM6DSO_CTRL4_C_SLEEP_G: u8 = 0x40;

/// Register writes that park the LSM6DSO in its lowest-power state, in order
pub const LSM6DSO_LOW_POWER_SEQUENCE: [(u8, u8); 4] = [
    (LSM6DSO_REG_FUNC_CFG_ACCESS, 0x00),
    (LSM6DSO_REG_CTRL1_XL, 0x00),
    (LSM6DSO_REG_CTRL2_G, 0x00),
    (LSM6DSO_REG_CTRL4_C, LSM6DSO_CTRL4_C_SLEEP_G),
];
