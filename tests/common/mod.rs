//! Common test utilities and mock implementations

pub mod mock_timer;
pub mod test_utils;

pub use mock_interface::{MockInterface, Operation};
pub use mock_timer::{MockTimer, TimerOp};
pub use test_utils::{create_initialized_driver, create_mock_driver, Harness};
