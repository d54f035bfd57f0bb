//! Locks used by the magnetometer driver
//!
//! The driver takes two locks, always in this order:
//!
//! 1. The controller lock ([`ControllerLock`]) is held for a whole public
//!    operation. That includes the standby settle delay (200 ms by default)
//!    and the power-on delay in `init()`. It must be a lock that lets other
//!    tasks and interrupts keep running while it is held, such as an RTOS
//!    mutex.
//! 2. The bus lock (an embassy [`RawMutex`]) is held for one register
//!    transaction at a time. The poll callback takes only this one, so a
//!    short critical section such as `CriticalSectionRawMutex` fits it.
//!
//! Every embassy [`RawMutex`] is also a [`ControllerLock`]. `NoopRawMutex` is
//! the right choice for tests and for drivers only used from one context. A
//! `CriticalSectionRawMutex` controller lock masks interrupts for the whole
//! settle delay; use it only with `standby_settle_ms` and `power_on_delay_ms`
//! short enough for the system to tolerate.
//!
//! # Example
//!
//! ```ignore
//! struct RtosLock;
//!
//! impl ControllerLock for RtosLock {
//!     type Cell<V> = rtos::Mutex<V>;
//!
//!     fn new_cell<V>(value: V) -> Self::Cell<V> {
//!         rtos::Mutex::new(value)
//!     }
//!
//!     fn with_mut<V, R, F>(cell: &Self::Cell<V>, f: F) -> R
//!     where
//!         F: FnOnce(&mut V) -> R,
//!     {
//!         f(&mut cell.lock())
//!     }
//! }
//!
//! let mag: Mmc5603njDriver<CriticalSectionRawMutex, RtosLock, _, _, _, _> =
//!     Mmc5603njDriver::new(interface, timers, delay, &MAG_EVENTS, MagConfig::default());
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

/// A family of locks guarding the controller state
///
/// Implemented on a marker type; [`Cell`](Self::Cell) is the lock wrapping a
/// value. Blocking while the lock is held must not stall unrelated work.
pub trait ControllerLock {
    /// A value of type `V` behind this lock
    type Cell<V>;

    /// Wrap `value` in a new lock
    fn new_cell<V>(value: V) -> Self::Cell<V>;

    /// Run `f` with exclusive access to the value in `cell`
    fn with_mut<V, R, F>(cell: &Self::Cell<V>, f: F) -> R
    where
        F: FnOnce(&mut V) -> R;
}

impl<M: RawMutex> ControllerLock for M {
    type Cell<V> = Mutex<M, RefCell<V>>;

    fn new_cell<V>(value: V) -> Self::Cell<V> {
        Mutex::new(RefCell::new(value))
    }

    fn with_mut<V, R, F>(cell: &Self::Cell<V>, f: F) -> R
    where
        F: FnOnce(&mut V) -> R,
    {
        cell.lock(|value| f(&mut value.borrow_mut()))
    }
}
