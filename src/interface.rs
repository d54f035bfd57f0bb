//! Bus interface implementation for the Asterix sensors
//!
//! All three chips sit on the same I2C bus. Each chip gets its own
//! [`I2cInterface`] carrying its 7-bit address; share the bus between them with
//! an `embedded-hal-bus` device (or any other `I2c` implementation that
//! provides its own locking).

use crate::sensors::accel_gyro::{LSM6DSO_I2C_ADDRESS, LSM6DSO_I2C_ADDRESS_ALT};
use crate::sensors::barometer::{BMP390_I2C_ADDRESS, BMP390_I2C_ADDRESS_ALT};
use crate::sensors::magnetometer::MMC5603NJ_I2C_ADDRESS;

use device_driver::RegisterInterface;

/// Largest register write the interface will issue, in data bytes
///
/// Every register these chips are written through is a single byte.
pub const MAX_WRITE_LEN: usize = 8;

/// I2C interface for one sensor on the shared bus
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Create an interface for the MMC5603NJ magnetometer (0x30)
    pub const fn magnetometer(i2c: I2C) -> Self {
        Self::new(i2c, MMC5603NJ_I2C_ADDRESS)
    }

    /// Create an interface for the BMP390 barometer (0x76, SDO low)
    pub const fn barometer(i2c: I2C) -> Self {
        Self::new(i2c, BMP390_I2C_ADDRESS)
    }

    /// Create an interface for a BMP390 strapped with SDO high (0x77)
    pub const fn barometer_alternative(i2c: I2C) -> Self {
        Self::new(i2c, BMP390_I2C_ADDRESS_ALT)
    }

    /// Create an interface for the LSM6DSO accelerometer/gyroscope (0x6A, SA0 low)
    pub const fn accel_gyro(i2c: I2C) -> Self {
        Self::new(i2c, LSM6DSO_I2C_ADDRESS)
    }

    /// Create an interface for an LSM6DSO strapped with SA0 high (0x6B)
    pub const fn accel_gyro_alternative(i2c: I2C) -> Self {
        Self::new(i2c, LSM6DSO_I2C_ADDRESS_ALT)
    }

    /// Create an interface with a custom device address
    ///
    /// # Arguments
    /// * `i2c` - The I2C peripheral or shared bus device
    /// * `address` - The 7-bit I2C device address
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Get the device address used by this interface
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Consume the interface and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> RegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len() for I2C
        self.i2c.write_read(self.address, &[address], read_data)
    }

    /// Write `write_data` starting at register `address`
    ///
    /// Payloads longer than [`MAX_WRITE_LEN`] bytes are not supported; in
    /// release builds only the first `MAX_WRITE_LEN` bytes are sent.
    fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in write_data.len() for I2C
        debug_assert!(
            write_data.len() <= MAX_WRITE_LEN,
            "register write longer than MAX_WRITE_LEN"
        );
        let mut buffer = [0u8; MAX_WRITE_LEN + 1];
        buffer[0] = address;
        let len = write_data.len().min(MAX_WRITE_LEN);
        buffer[1..=len].copy_from_slice(&write_data[..len]);

        self.i2c.write(self.address, &buffer[..=len])
    }
}
