//! Barometer register constants
//!
//! The BMP390 is only probed and parked at boot; nothing here reads pressure.

/// BMP390 I2C address when SDO is low
pub const BMP390_I2C_ADDRESS: u8 = 0x76;

/// BMP390 I2C address when SDO is high
pub const BMP390_I2C_ADDRESS_ALT: u8 = 0x77;

/// BMP390 `CHIP_ID` register address
pub const BMP390_REG_CHIP_ID: u8 = 0x00;

/// Expected `CHIP_ID` value for BMP390
pub const BMP390_CHIP_ID_VALUE: u8 = 0x60;

/// BMP390 Power Control register address
///
/// Writing zero disables both sensors and selects sleep mode.
pub const BMP390_REG_PWR_CTRL: u8 = 0x1B;
