//! Register definitions for the MMC5603NJ
//!
//! Only the registers the driver touches are described here. The MMC5603NJ
//! control registers are write-only: every `write` starts from an all-zero
//! value, so writing one bit clears every other bit of the same register.
//!
//! The output registers 0x00-0x08 are read as a single 9-byte burst and are
//! accessed through the raw interface instead of typed registers.

device_driver::create_device!(
    device_name: Mmc5603nj,
    dsl: {
        config {
            type RegisterAddressType = u8;
            type DefaultByteOrder = BE;
        }

        /// STATUS1 - Device Status 1 (0x18)
        register Status1 {
            const ADDRESS = 0x18;
            const SIZE_BITS = 8;

            reserved_0: uint = 0..1,
            /// Magnetic data ready, sampled by the poll timer
            mag_ready: bool = 1,
            reserved_4_2: uint = 2..5,
            /// Temperature measurement done
            meas_t_done: bool = 5,
            /// Magnetic measurement done
            meas_m_done: bool = 6,
            reserved_7: uint = 7..8,
        },

        /// ODR - Output Data Rate (0x1A)
        ///
        /// Rate in Hz for continuous measurement mode.
        register Odr {
            const ADDRESS = 0x1A;
            const SIZE_BITS = 8;

            /// Output data rate in Hz
            odr: uint = 0..8,
        },

        /// INTERNAL_CONTROL_0 (0x1B)
        register InternalControl0 {
            const ADDRESS = 0x1B;
            const SIZE_BITS = 8;

            /// Take a magnetic measurement
            take_meas_m: bool = 0,
            /// Take a temperature measurement
            take_meas_t: bool = 1,
            reserved_2: uint = 2..3,
            /// SET operation
            do_set: bool = 3,
            /// RESET operation
            do_reset: bool = 4,
            /// Automatic set/reset enable
            auto_sr_en: bool = 5,
            /// Automatic self-test enable
            auto_st_en: bool = 6,
            /// Continuous mode frequency enable
            cmm_freq_en: bool = 7,
        },

        /// INTERNAL_CONTROL_2 (0x1D)
        ///
        /// Writing 0x00 leaves continuous mode (standby).
        register InternalControl2 {
            const ADDRESS = 0x1D;
            const SIZE_BITS = 8;

            /// Periodic set interval
            prd_set: uint = 0..3,
            /// Periodic set enable
            en_prd_set: bool = 3,
            /// Continuous measurement mode enable
            cmm_en: bool = 4,
            reserved_6_5: uint = 5..7,
            /// High power mode
            hpower: bool = 7,
        },

        /// PRODUCT_ID (0x39)
        /// Expected value: 0x10
        register ProductId {
            const ADDRESS = 0x39;
            const SIZE_BITS = 8;

            /// Product ID (should read 0x10)
            product_id: uint = 0..8,
        }
    }
);

pub use Mmc5603nj as RegisterDevice;

/// First output register (XOUT0); start of the 9-byte measurement burst.
pub const XOUT0: u8 = 0x00;

/// Length of the measurement burst in bytes.
pub const BURST_LEN: usize = 9;
